// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::permissions::{Organization, UserId};

/// Answers whether a user has asked to join an organisation but was not approved yet.
pub trait PendingApproval {
    fn is_pending_approval(&self, user_id: UserId, organization: &Organization) -> bool;
}

impl<F> PendingApproval for F
where
    F: Fn(UserId, &Organization) -> bool,
{
    fn is_pending_approval(&self, user_id: UserId, organization: &Organization) -> bool {
        self(user_id, organization)
    }
}
