// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

pub type RoleId = u64;

/// Machine name of the read-only role.
pub const VIEWER_ROLE: &str = "viewer";

/// A role a user can hold within an organisation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationRole {
    pub id: RoleId,
    pub machine_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    weight: Option<i64>,
}

impl OrganizationRole {
    pub fn new(id: RoleId, machine_name: impl Into<String>, weight: i64) -> Self {
        Self {
            id,
            machine_name: machine_name.into(),
            name: None,
            weight: Some(weight),
        }
    }

    /// Role without a weight, ranks like weight `0`.
    pub fn unweighted(id: RoleId, machine_name: impl Into<String>) -> Self {
        Self {
            id,
            machine_name: machine_name.into(),
            name: None,
            weight: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Rank of this role, `0` when the API did not provide one.
    pub fn weight(&self) -> i64 {
        self.weight.unwrap_or(0)
    }

    pub fn is_viewer(&self) -> bool {
        self.machine_name == VIEWER_ROLE
    }
}

impl Display for OrganizationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.machine_name),
        }
    }
}

fn weight(role: Option<&OrganizationRole>) -> i64 {
    role.map_or(0, OrganizationRole::weight)
}

/// Returns `true` if an actor holding `actor_role` may manage relationships using `target_role`,
/// for example add someone to the organisation with it.
///
/// System admins always may. Without a role an actor may not. Otherwise the actor's role has to
/// weigh at least as much as the target role.
pub fn org_role_can_manage_org_role(
    actor_is_admin: bool,
    actor_role: Option<&OrganizationRole>,
    target_role: Option<&OrganizationRole>,
) -> bool {
    if actor_is_admin {
        return true;
    }

    let Some(actor_role) = actor_role else {
        return false;
    };

    actor_role.weight() >= weight(target_role)
}

/// Returns `true` if an actor may change a subject's role from `subject_role` to
/// `proposed_role`.
///
/// On top of [`org_role_can_manage_org_role`] for the subject's current role, the actor can never
/// hand out a role weighing more than their own, and never moves a non-viewer down to viewer.
/// The API accepts the latter; it is withheld from the interface only.
pub fn org_role_can_change_org_role_to_org_role(
    actor_is_admin: bool,
    actor_role: Option<&OrganizationRole>,
    subject_role: Option<&OrganizationRole>,
    proposed_role: Option<&OrganizationRole>,
) -> bool {
    if actor_is_admin {
        return true;
    }

    if !org_role_can_manage_org_role(actor_is_admin, actor_role, subject_role) {
        return false;
    }

    if weight(actor_role) < weight(proposed_role) {
        return false;
    }

    let proposes_viewer = proposed_role.is_some_and(OrganizationRole::is_viewer);
    let subject_is_viewer = subject_role.is_some_and(OrganizationRole::is_viewer);
    if proposes_viewer && !subject_is_viewer {
        return false;
    }

    true
}

/// Roles of one organisation as delivered by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCatalog(Vec<OrganizationRole>);

impl RoleCatalog {
    pub fn new(roles: Vec<OrganizationRole>) -> Self {
        Self(roles)
    }

    pub fn find_by_id(&self, id: RoleId) -> Option<&OrganizationRole> {
        self.0.iter().find(|role| role.id == id)
    }

    pub fn find_by_machine_name(&self, machine_name: &str) -> Option<&OrganizationRole> {
        self.0.iter().find(|role| role.machine_name == machine_name)
    }

    /// Roles from least to most privileged. Roles of equal weight keep their catalog order.
    pub fn sorted_by_weight(&self) -> Vec<&OrganizationRole> {
        let mut roles: Vec<_> = self.0.iter().collect();
        roles.sort_by_key(|role| role.weight());
        roles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrganizationRole> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<OrganizationRole> for RoleCatalog {
    fn from_iter<T: IntoIterator<Item = OrganizationRole>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RoleCatalog {
    type Item = &'a OrganizationRole;
    type IntoIter = std::slice::Iter<'a, OrganizationRole>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Roles the actor may move the subject to, least privileged first.
///
/// This is the option list of a role picker: every catalog role for which
/// [`org_role_can_change_org_role_to_org_role`] allows the change. The subject's current role is
/// included when the actor may manage it.
pub fn assignable_roles<'a>(
    actor_is_admin: bool,
    actor_role: Option<&OrganizationRole>,
    subject_role: Option<&OrganizationRole>,
    catalog: &'a RoleCatalog,
) -> Vec<&'a OrganizationRole> {
    catalog
        .sorted_by_weight()
        .into_iter()
        .filter(|proposed| {
            org_role_can_change_org_role_to_org_role(
                actor_is_admin,
                actor_role,
                subject_role,
                Some(*proposed),
            )
        })
        .collect()
}
