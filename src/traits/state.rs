// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::url_state::ParamValue;

/// Read access to a view's state, keyed by state field name.
pub trait StateSnapshot {
    /// Current value of the given state field, `None` if it is not populated.
    fn value(&self, state_name: &str) -> Option<ParamValue>;
}

impl<S: BuildHasher> StateSnapshot for HashMap<String, ParamValue, S> {
    fn value(&self, state_name: &str) -> Option<ParamValue> {
        self.get(state_name).cloned()
    }
}

impl StateSnapshot for BTreeMap<String, ParamValue> {
    fn value(&self, state_name: &str) -> Option<ParamValue> {
        self.get(state_name).cloned()
    }
}

impl<T: StateSnapshot + ?Sized> StateSnapshot for &T {
    fn value(&self, state_name: &str) -> Option<ParamValue> {
        (**self).value(state_name)
    }
}
