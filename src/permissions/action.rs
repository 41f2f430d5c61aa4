// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::traits::PendingApproval;

pub type UserId = u64;

pub type OrganizationId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: UserId,
}

/// The signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// System admins may perform every action on every organisation they are not pending on.
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    pub data: UserData,
}

impl CurrentUser {
    pub fn new(id: UserId) -> Self {
        Self {
            is_admin: false,
            data: UserData { id },
        }
    }

    pub fn admin(id: UserId) -> Self {
        Self {
            is_admin: true,
            data: UserData { id },
        }
    }

    pub fn id(&self) -> UserId {
        self.data.id
    }
}

/// An organisation as fetched on behalf of the current user.
///
/// `requester_permissions` lists the actions the API allows the user it was fetched for, so an
/// organisation value must not be reused across users.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub requester_permissions: Option<Vec<String>>,
    /// Users who asked to join and await approval.
    #[serde(default)]
    pub pending_user_ids: Vec<UserId>,
}

impl Organization {
    pub fn new(id: OrganizationId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requester_permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_pending_user(mut self, user_id: UserId) -> Self {
        self.pending_user_ids.push(user_id);
        self
    }
}

/// Reads pending approvals from [`Organization::pending_user_ids`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PendingMembers;

impl PendingApproval for PendingMembers {
    fn is_pending_approval(&self, user_id: UserId, organization: &Organization) -> bool {
        organization.pending_user_ids.contains(&user_id)
    }
}

/// Returns `true` if the current user may perform the action on the organisation.
///
/// Pending approvals are read from the organisation itself, see [`user_can_with`] for the rules.
pub fn user_can(
    current_user: Option<&CurrentUser>,
    organization: Option<&Organization>,
    action_name: &str,
) -> bool {
    user_can_with(&PendingMembers, current_user, organization, action_name)
}

/// Returns `true` if the current user may perform the action on the organisation.
///
/// Checks run in this order:
///
/// 1. Without a user or an organisation the action is denied.
/// 2. Users pending approval on the organisation are denied, system admins included.
/// 3. System admins are allowed.
/// 4. Everyone else is allowed if the action is listed in the organisation's
///    `requester_permissions`. A missing list counts as empty.
pub fn user_can_with<P>(
    pending: &P,
    current_user: Option<&CurrentUser>,
    organization: Option<&Organization>,
    action_name: &str,
) -> bool
where
    P: PendingApproval + ?Sized,
{
    let (Some(current_user), Some(organization)) = (current_user, organization) else {
        warn!(
            has_user = current_user.is_some(),
            has_organization = organization.is_some(),
            action = action_name,
            "permission check without user or organization, denying"
        );
        return false;
    };

    if pending.is_pending_approval(current_user.id(), organization) {
        debug!(
            user = current_user.id(),
            organization = organization.id,
            action = action_name,
            "user is pending approval, denying"
        );
        return false;
    }

    if current_user.is_admin {
        return true;
    }

    let Some(permissions) = organization.requester_permissions.as_deref() else {
        warn!(
            organization = organization.id,
            "organization carries no requester_permissions, was it fetched for the current user?"
        );
        return false;
    };

    permissions.iter().any(|permission| permission == action_name)
}
