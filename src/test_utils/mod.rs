// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::permissions::{OrganizationRole, RoleCatalog};
use crate::traits::StateSnapshot;
use crate::url_state::{FieldDefinition, ParamValue, Setters};

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

pub fn guest() -> OrganizationRole {
    OrganizationRole::new(1, "guest", 0).with_name("Guest")
}

pub fn viewer() -> OrganizationRole {
    OrganizationRole::new(2, "viewer", 50).with_name("Viewer")
}

pub fn team_member() -> OrganizationRole {
    OrganizationRole::new(3, "team_member", 100).with_name("Team Member")
}

pub fn program_manager() -> OrganizationRole {
    OrganizationRole::new(4, "program_manager", 300).with_name("Program Manager")
}

pub fn organization_admin() -> OrganizationRole {
    OrganizationRole::new(5, "org_admin", 500).with_name("Organization Admin")
}

/// Catalog of all fixture roles, deliberately not in weight order.
pub fn role_catalog() -> RoleCatalog {
    RoleCatalog::new(vec![
        program_manager(),
        guest(),
        organization_admin(),
        team_member(),
        viewer(),
    ])
}

/// Definitions of a paginated, searchable table.
pub fn table_definitions() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::num("page", "p", "1"),
        FieldDefinition::num("perPage", "pp", "25"),
        FieldDefinition::str("search", "s", ""),
        FieldDefinition::str("tab", "t", "overview"),
    ]
}

/// Stand-in for a view's state which the URL synchronizer reads from and writes to.
///
/// Clones share the same values.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    values: Rc<RefCell<BTreeMap<String, ParamValue>>>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, state_name: &str, value: impl Into<ParamValue>) {
        self.values
            .borrow_mut()
            .insert(state_name.to_string(), value.into());
    }

    pub fn get(&self, state_name: &str) -> Option<ParamValue> {
        self.values.borrow().get(state_name).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, ParamValue> {
        self.values.borrow().clone()
    }

    /// One setter per definition, each writing into the matching state field.
    pub fn setters(&self, definitions: &[FieldDefinition]) -> Setters<'static> {
        let mut setters = Setters::new();
        for definition in definitions {
            let state = self.clone();
            let state_name = definition.state_name.clone();
            setters.insert(definition.param_name.clone(), move |value| {
                state.set(&state_name, value);
            });
        }
        setters
    }
}

impl StateSnapshot for ViewState {
    fn value(&self, state_name: &str) -> Option<ParamValue> {
        self.get(state_name)
    }
}
