// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::traits::{History, Location, PopStateTarget, StateSnapshot};
use crate::url_state::builder::Builder;
use crate::url_state::{
    FieldDefinitions, Params, PopStateSubscription, QueryPrefix, Setters, listen, params_to_state,
    push_history, state_to_params,
};

/// One view's binding between its state and the URL: a query prefix plus the field definitions.
///
/// ```
/// use programs_core::{FieldDefinition, UrlStateSync};
///
/// let sync = UrlStateSync::builder()
///     .prefix("tbl_")
///     .field(FieldDefinition::num("page", "p", "1"))
///     .field(FieldDefinition::str("search", "s", ""))
///     .build()
///     .unwrap();
///
/// assert_eq!(sync.definitions().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlStateSync {
    prefix: QueryPrefix,
    definitions: FieldDefinitions,
}

impl UrlStateSync {
    pub fn new(prefix: QueryPrefix, definitions: FieldDefinitions) -> Self {
        Self {
            prefix,
            definitions,
        }
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn prefix(&self) -> &QueryPrefix {
        &self.prefix
    }

    pub fn definitions(&self) -> &FieldDefinitions {
        &self.definitions
    }

    pub fn state_to_params<S>(&self, state: &S) -> Params
    where
        S: StateSnapshot + ?Sized,
    {
        state_to_params(state, &self.definitions, &self.prefix)
    }

    pub fn params_to_state(&self, setters: &mut Setters<'_>, search: &str) -> usize {
        params_to_state(setters, search, &self.definitions, &self.prefix)
    }

    pub fn push_history<S, H>(
        &self,
        state: &S,
        location: &Location,
        history: &mut H,
    ) -> Result<bool, H::Error>
    where
        S: StateSnapshot + ?Sized,
        H: History + ?Sized,
    {
        push_history(state, location, history, &self.definitions, &self.prefix)
    }

    /// Apply URL state on every popstate event of `target` until the subscription is dropped.
    pub fn listen<T>(&self, target: T, setters: Setters<'static>) -> PopStateSubscription<T>
    where
        T: PopStateTarget,
    {
        let definitions = self.definitions.clone();
        listen(target, self.prefix.clone(), setters, move || definitions.to_vec())
    }
}
