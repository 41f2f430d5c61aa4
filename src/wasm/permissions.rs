// SPDX-License-Identifier: MIT OR Apache-2.0

use js_sys::Function;
use serde::de::DeserializeOwned;
use tracing::warn;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::permissions::{self, CurrentUser, Organization, OrganizationRole, UserId};

/// Read an optional value handed over from JavaScript.
///
/// `null` and `undefined` are absent, anything which does not deserialize is an error.
fn optional_from_js<T>(value: JsValue, what: &'static str) -> Result<Option<T>, ()>
where
    T: DeserializeOwned,
{
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }

    serde_wasm_bindgen::from_value(value).map(Some).map_err(|err| {
        warn!(%err, what, "malformed value passed to permission check");
    })
}

/// Returns `true` if an actor holding `actorRole` may manage relationships using `targetRole`.
///
/// Malformed roles deny, unless the actor is a system admin.
#[wasm_bindgen(js_name = orgRoleCanManageOrgRole)]
pub fn org_role_can_manage_org_role(
    actor_is_admin: bool,
    actor_role: JsValue,
    target_role: JsValue,
) -> bool {
    let roles = (
        optional_from_js::<OrganizationRole>(actor_role, "actor role"),
        optional_from_js::<OrganizationRole>(target_role, "target role"),
    );

    let (Ok(actor_role), Ok(target_role)) = roles else {
        return actor_is_admin;
    };

    permissions::org_role_can_manage_org_role(
        actor_is_admin,
        actor_role.as_ref(),
        target_role.as_ref(),
    )
}

/// Returns `true` if an actor may change a subject's role from `subjectRole` to `proposedRole`.
///
/// Malformed roles deny, unless the actor is a system admin.
#[wasm_bindgen(js_name = orgRoleCanChangeOrgRoleToOrgRole)]
pub fn org_role_can_change_org_role_to_org_role(
    actor_is_admin: bool,
    actor_role: JsValue,
    subject_role: JsValue,
    proposed_role: JsValue,
) -> bool {
    let roles = (
        optional_from_js::<OrganizationRole>(actor_role, "actor role"),
        optional_from_js::<OrganizationRole>(subject_role, "subject role"),
        optional_from_js::<OrganizationRole>(proposed_role, "proposed role"),
    );

    let (Ok(actor_role), Ok(subject_role), Ok(proposed_role)) = roles else {
        return actor_is_admin;
    };

    permissions::org_role_can_change_org_role_to_org_role(
        actor_is_admin,
        actor_role.as_ref(),
        subject_role.as_ref(),
        proposed_role.as_ref(),
    )
}

/// Returns `true` if the current user may perform the named action on the organisation.
///
/// `isPendingApproval(userId, organization)` decides about pending memberships when given,
/// otherwise `organization.pending_user_ids` does. A predicate which throws counts as pending.
/// Malformed users, organisations and non-string action names deny.
#[wasm_bindgen(js_name = userCan)]
pub fn user_can(
    current_user: JsValue,
    organization: JsValue,
    action_name: JsValue,
    is_pending_approval: Option<Function>,
) -> bool {
    let Some(action_name) = action_name.as_string() else {
        warn!("action name passed to permission check is not a string, denying");
        return false;
    };

    let parsed_user = optional_from_js::<CurrentUser>(current_user, "current user")
        .ok()
        .flatten();
    let parsed_organization =
        optional_from_js::<Organization>(organization.clone(), "organization")
            .ok()
            .flatten();

    match is_pending_approval {
        Some(predicate) => {
            let pending = |user_id: UserId, _: &Organization| {
                predicate
                    .call2(&JsValue::NULL, &JsValue::from_f64(user_id as f64), &organization)
                    .map(|result| result.is_truthy())
                    .unwrap_or_else(|err| {
                        warn!(?err, "isPendingApproval threw, treating user as pending");
                        true
                    })
            };

            permissions::user_can_with(
                &pending,
                parsed_user.as_ref(),
                parsed_organization.as_ref(),
                &action_name,
            )
        }
        None => permissions::user_can(
            parsed_user.as_ref(),
            parsed_organization.as_ref(),
            &action_name,
        ),
    }
}
