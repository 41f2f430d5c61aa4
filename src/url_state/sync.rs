// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug};

use tracing::debug;

use crate::traits::{History, Location, StateSnapshot};
use crate::url_state::{FieldDefinition, ParamValue, QueryPrefix, QueryString};

/// URL parameters derived from a state snapshot, keyed by prefixed parameter name.
pub type Params = BTreeMap<String, ParamValue>;

/// Callbacks writing values back into a view's state, keyed by (unprefixed) parameter name.
#[derive(Default)]
pub struct Setters<'a> {
    setters: HashMap<String, Box<dyn FnMut(ParamValue) + 'a>>,
}

impl<'a> Setters<'a> {
    pub fn new() -> Self {
        Self {
            setters: HashMap::new(),
        }
    }

    /// Register the setter for a parameter, replacing any earlier one.
    pub fn with<F>(mut self, param_name: impl Into<String>, setter: F) -> Self
    where
        F: FnMut(ParamValue) + 'a,
    {
        self.insert(param_name, setter);
        self
    }

    pub fn insert<F>(&mut self, param_name: impl Into<String>, setter: F)
    where
        F: FnMut(ParamValue) + 'a,
    {
        self.setters.insert(param_name.into(), Box::new(setter));
    }

    pub fn contains(&self, param_name: &str) -> bool {
        self.setters.contains_key(param_name)
    }

    /// Hand a value to the setter registered for the parameter. Returns `false` if there is none.
    pub fn call(&mut self, param_name: &str, value: ParamValue) -> bool {
        match self.setters.get_mut(param_name) {
            Some(setter) => {
                setter(value);
                true
            }
            None => false,
        }
    }
}

impl Debug for Setters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.setters.keys().collect();
        names.sort();
        f.debug_struct("Setters").field("params", &names).finish()
    }
}

/// Derive URL parameters from the current state.
///
/// Every definition yields exactly one parameter. A state field which is missing or holds the
/// empty string is replaced by the definition's default value.
pub fn state_to_params<S>(
    state: &S,
    definitions: &[FieldDefinition],
    prefix: &QueryPrefix,
) -> Params
where
    S: StateSnapshot + ?Sized,
{
    definitions
        .iter()
        .map(|definition| {
            let value = match state.value(&definition.state_name) {
                Some(value) if !value.is_empty() => value,
                _ => ParamValue::Str(definition.default_param_value.clone()),
            };

            (prefix.key(&definition.param_name), value)
        })
        .collect()
}

/// Apply the parameters found in a query string to the view's state.
///
/// Missing parameters fall back to the definition's default, numeric fields are coerced (see
/// [`ParamValue::coerce`]). Definitions without a registered setter are skipped. Returns how many
/// setters were called.
pub fn params_to_state(
    setters: &mut Setters<'_>,
    search: &str,
    definitions: &[FieldDefinition],
    prefix: &QueryPrefix,
) -> usize {
    let query = QueryString::parse(search);
    let mut called = 0;

    for definition in definitions {
        let raw = query
            .get(&prefix.key(&definition.param_name))
            .unwrap_or(definition.default_param_value.as_str());
        let value = ParamValue::coerce(raw, definition.value_type);

        if setters.call(&definition.param_name, value) {
            called += 1;
        }
    }

    called
}

/// Write the current state into the URL.
///
/// The derived parameters are merged over the parameters already present in `location`, so
/// parameters of other prefixes survive. A new history entry is pushed only when the resulting
/// query differs from the current one; returns `true` if that happened.
pub fn push_history<S, H>(
    state: &S,
    location: &Location,
    history: &mut H,
    definitions: &[FieldDefinition],
    prefix: &QueryPrefix,
) -> Result<bool, H::Error>
where
    S: StateSnapshot + ?Sized,
    H: History + ?Sized,
{
    let new_params = state_to_params(state, definitions, prefix);
    let old_params = QueryString::parse(&location.search);

    let mut merged = old_params.clone();
    merged.merge(&new_params);

    // Compare canonical forms, the current URL might list the same parameters in another order.
    let search = merged.to_string();
    if search == old_params.to_string() {
        return Ok(false);
    }

    let next = Location::new(location.pathname.clone(), search);
    debug!(prefix = %prefix, location = %next, "push url state to history");
    history.push(next)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;

    use rstest::rstest;

    use crate::traits::{History, Location};
    use crate::url_state::{FieldDefinition, ParamValue, QueryPrefix};

    use super::{Setters, params_to_state, push_history, state_to_params};

    #[derive(Default)]
    struct RecordingHistory {
        pushed: Vec<Location>,
    }

    impl History for RecordingHistory {
        type Error = Infallible;

        fn push(&mut self, location: Location) -> Result<(), Self::Error> {
            self.pushed.push(location);
            Ok(())
        }
    }

    fn table_definitions() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::num("page", "p", "1"),
            FieldDefinition::num("perPage", "pp", "25"),
            FieldDefinition::str("search", "s", ""),
        ]
    }

    #[test]
    fn page_state_becomes_prefixed_param() {
        let definitions = vec![FieldDefinition::num("page", "p", "1")];
        let mut state = HashMap::new();
        state.insert("page".to_string(), ParamValue::Num(3.0));

        let params = state_to_params(&state, &definitions, &"tbl_".into());

        assert_eq!(params.len(), 1);
        assert_eq!(params.get("tbl_p"), Some(&ParamValue::Num(3.0)));
    }

    #[rstest]
    #[case::missing(None, ParamValue::Str("25".into()))]
    #[case::empty(Some(ParamValue::from("")), ParamValue::Str("25".into()))]
    #[case::zero(Some(ParamValue::Num(0.0)), ParamValue::Num(0.0))]
    #[case::set(Some(ParamValue::Num(50.0)), ParamValue::Num(50.0))]
    fn empty_state_falls_back_to_default(
        #[case] per_page: Option<ParamValue>,
        #[case] expected: ParamValue,
    ) {
        let mut state = HashMap::new();
        if let Some(value) = per_page {
            state.insert("perPage".to_string(), value);
        }

        let params = state_to_params(&state, &table_definitions(), &QueryPrefix::default());

        // One key per definition, whether or not the state is populated.
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("pp"), Some(&expected));
        assert_eq!(params.get("p"), Some(&ParamValue::Str("1".into())));
        assert_eq!(params.get("s"), Some(&ParamValue::Str("".into())));
    }

    #[test]
    fn applies_params_through_setters() {
        let received = RefCell::new(HashMap::new());
        let mut setters = Setters::new()
            .with("p", |value| {
                received.borrow_mut().insert("p", value);
            })
            .with("s", |value| {
                received.borrow_mut().insert("s", value);
            });

        let called = params_to_state(
            &mut setters,
            "?tbl_p=4&tbl_s=water&p=9",
            &table_definitions(),
            &"tbl_".into(),
        );
        drop(setters);

        // "pp" has no setter and is skipped.
        assert_eq!(called, 2);
        let received = received.into_inner();
        assert_eq!(received.get("p"), Some(&ParamValue::Num(4.0)));
        assert_eq!(received.get("s"), Some(&ParamValue::Str("water".into())));
    }

    #[test]
    fn missing_and_malformed_params() {
        let received = RefCell::new(Vec::new());
        let mut setters = Setters::new()
            .with("p", |value| received.borrow_mut().push(("p", value)))
            .with("pp", |value| received.borrow_mut().push(("pp", value)));

        params_to_state(&mut setters, "pp=lots", &table_definitions(), &"".into());
        drop(setters);

        let received = received.into_inner();
        assert_eq!(received[0], ("p", ParamValue::Num(1.0)));
        assert_eq!(received[1].0, "pp");
        assert!(received[1].1.as_num().unwrap().is_nan());
    }

    #[test]
    fn round_trips_through_query_string() {
        let definitions = table_definitions();
        let prefix = QueryPrefix::new("org_");

        let mut state = HashMap::new();
        state.insert("page".to_string(), ParamValue::Num(2.0));
        state.insert("perPage".to_string(), ParamValue::Num(100.0));
        state.insert("search".to_string(), ParamValue::from("after school & more"));

        let mut location = Location::new("/organizations", "");
        let mut history = RecordingHistory::default();
        assert!(push_history(&state, &location, &mut history, &definitions, &prefix).unwrap());
        location = history.pushed.pop().unwrap();

        let restored = RefCell::new(HashMap::new());
        let mut setters = Setters::new();
        for name in ["page", "perPage", "search"] {
            let param = definitions
                .iter()
                .find(|definition| definition.state_name == name)
                .unwrap()
                .param_name
                .clone();
            let restored = &restored;
            setters.insert(param, move |value| {
                restored.borrow_mut().insert(name.to_string(), value);
            });
        }
        params_to_state(&mut setters, &location.search, &definitions, &prefix);
        drop(setters);

        assert_eq!(restored.into_inner(), state);
    }

    #[test]
    fn pushes_only_on_change() {
        let definitions = table_definitions();
        let prefix = QueryPrefix::new("tbl_");
        let mut history = RecordingHistory::default();

        let mut state = HashMap::new();
        state.insert("page".to_string(), ParamValue::Num(2.0));

        let location = Location::new("/assessments", "?other_tab=2");
        assert!(push_history(&state, &location, &mut history, &definitions, &prefix).unwrap());
        assert_eq!(history.pushed.len(), 1);

        // Unchanged state on the new location is a no-op.
        let location = history.pushed[0].clone();
        assert!(!push_history(&state, &location, &mut history, &definitions, &prefix).unwrap());
        assert!(!push_history(&state, &location, &mut history, &definitions, &prefix).unwrap());
        assert_eq!(history.pushed.len(), 1);

        // Foreign parameters are preserved.
        let pushed = &history.pushed[0];
        assert_eq!(pushed.pathname, "/assessments");
        assert_eq!(pushed.search, "other_tab=2&tbl_p=2&tbl_pp=25&tbl_s=");
    }

    #[test]
    fn unordered_current_url_is_not_a_change() {
        let definitions = vec![FieldDefinition::num("page", "p", "1")];
        let mut state = HashMap::new();
        state.insert("page".to_string(), ParamValue::Num(1.0));
        let mut history = RecordingHistory::default();

        let location = Location::new("/teams", "?z=1&tbl_p=1&a=2");
        let pushed =
            push_history(&state, &location, &mut history, &definitions, &"tbl_".into()).unwrap();

        assert!(!pushed);
        assert!(history.pushed.is_empty());
    }
}
