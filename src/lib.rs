// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared state and permission logic for the Programs front-end.
//!
//! Two independent parts live in this crate:
//!
//! - [`url_state`] mirrors fields of a view's state into the URL query string and back again, so
//!   pagination, filters and tabs survive reloads and the browser's back / forward buttons.
//! - [`permissions`] answers "may this actor do that to this organisation?" based on role weights
//!   and the per-organisation permission list handed out by the API.
//!
//! Neither touches a browser directly. The URL and history stack are reached through the
//! collaborator interfaces in [`traits`]; [`memory::MemoryHistory`] implements them in-process and
//! the `wasm` module binds them to `window.history` when compiled for the browser.
pub mod memory;
pub mod permissions;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;
pub mod url_state;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use permissions::{
    CurrentUser, Organization, OrganizationRole, RoleCatalog, assignable_roles,
    org_role_can_change_org_role_to_org_role, org_role_can_manage_org_role, user_can,
    user_can_with,
};
pub use traits::{History, Location, PendingApproval, PopStateTarget, StateSnapshot};
pub use url_state::{
    DefinitionError, FieldDefinition, FieldDefinitions, ParamValue, Params, PopStateSubscription,
    QueryPrefix, QueryString, Setters, UrlStateSync, UrlStateSyncBuilder, ValueType, listen,
    params_to_state, push_history, state_to_params,
};
