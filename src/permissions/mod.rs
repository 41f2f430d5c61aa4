// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decide what an actor may do within an organisation.
//!
//! Roles are ranked by a single integer weight, a higher weight being more privileged. There is
//! no role hierarchy beyond that linear order. Weights are only comparable between roles of the
//! same organisation, which callers are expected to ensure.
//!
//! All functions here are total: missing or malformed input denies, except where a system admin
//! bypass applies.
mod action;
mod role;

pub use action::{CurrentUser, Organization, OrganizationId, PendingMembers, UserData, UserId};
pub use action::{user_can, user_can_with};
pub use role::{OrganizationRole, RoleCatalog, RoleId, VIEWER_ROLE};
pub use role::{
    assignable_roles, org_role_can_change_org_role_to_org_role, org_role_can_manage_org_role,
};
