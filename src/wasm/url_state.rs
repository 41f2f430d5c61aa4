// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use js_sys::{Function, Object, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use tracing::warn;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};

use crate::traits::StateSnapshot;
use crate::url_state::{FieldDefinitions, ParamValue, PopStateSubscription, Setters, UrlStateSync};
use crate::wasm::browser::BrowserHistory;
use crate::wasm::error::jserr;

fn to_js(value: &ParamValue) -> JsValue {
    match value {
        ParamValue::Num(value) => JsValue::from_f64(*value),
        ParamValue::Str(value) => JsValue::from_str(value),
    }
}

/// Plain JavaScript object (not a `Map`) holding the given parameters.
fn params_to_js(params: &BTreeMap<String, ParamValue>) -> Result<JsValue, JsValue> {
    let value = jserr!(params.serialize(&Serializer::json_compatible()));
    Ok(value)
}

/// State object of a view, read field by field.
///
/// Only fields holding a number or a string are taken, anything else (`null`, booleans, arrays
/// and objects) reads as absent so the definition's default applies.
struct JsState(JsValue);

impl StateSnapshot for JsState {
    fn value(&self, state_name: &str) -> Option<ParamValue> {
        if !self.0.is_object() {
            return None;
        }

        let value = Reflect::get(&self.0, &JsValue::from_str(state_name)).ok()?;
        if let Some(number) = value.as_f64() {
            Some(ParamValue::Num(number))
        } else {
            value.as_string().map(ParamValue::Str)
        }
    }
}

/// Wrap the functions found on a JavaScript object, keyed by parameter name, as setters.
fn setters_from_js(setters: &Object, definitions: &FieldDefinitions) -> Setters<'static> {
    let mut result = Setters::new();

    for definition in definitions {
        let key = JsValue::from_str(&definition.param_name);
        let Ok(setter) = Reflect::get(setters, &key) else {
            continue;
        };

        let Ok(setter) = setter.dyn_into::<Function>() else {
            continue;
        };

        result.insert(definition.param_name.clone(), move |value: ParamValue| {
            if let Err(err) = setter.call1(&JsValue::NULL, &to_js(&value)) {
                warn!(?err, "url state setter threw");
            }
        });
    }

    result
}

/// Derive prefixed URL parameters from a view's state object.
#[wasm_bindgen(js_name = stateToParams)]
pub fn state_to_params(
    state: JsValue,
    definitions: JsValue,
    prefix: String,
) -> Result<JsValue, JsValue> {
    let definitions: FieldDefinitions = jserr!(serde_wasm_bindgen::from_value(definitions));
    let params = crate::url_state::state_to_params(&JsState(state), &definitions, &prefix.into());
    params_to_js(&params)
}

/// Binding between one view's state and the browser URL.
#[wasm_bindgen(js_name = UrlStateSync)]
#[derive(Debug)]
pub struct JsUrlStateSync(UrlStateSync);

#[wasm_bindgen(js_class = UrlStateSync)]
impl JsUrlStateSync {
    /// Takes the query prefix and an array of
    /// `{ stateName, paramName, defaultParamValue, valueType }` definitions.
    #[wasm_bindgen(constructor)]
    pub fn new(prefix: String, definitions: JsValue) -> Result<JsUrlStateSync, JsValue> {
        let definitions: FieldDefinitions = jserr!(serde_wasm_bindgen::from_value(definitions));
        Ok(Self(UrlStateSync::new(prefix.into(), definitions)))
    }

    #[wasm_bindgen(js_name = stateToParams)]
    pub fn state_to_params(&self, state: JsValue) -> Result<JsValue, JsValue> {
        params_to_js(&self.0.state_to_params(&JsState(state)))
    }

    /// Push the state onto the browser history, returns `false` if the URL was up to date.
    #[wasm_bindgen(js_name = pushHistory)]
    pub fn push_history(&self, state: JsValue) -> Result<bool, JsValue> {
        let mut history = BrowserHistory::new();
        let location = jserr!(history.location());
        let pushed = jserr!(self.0.push_history(&JsState(state), &location, &mut history));
        Ok(pushed)
    }

    /// Hand the current URL parameters to the setter functions of `setters`, keyed by parameter
    /// name. Returns the number of setters called.
    #[wasm_bindgen(js_name = applyParams)]
    pub fn params_to_state(&self, setters: &Object) -> usize {
        let mut setters = setters_from_js(setters, self.0.definitions());
        let search = BrowserHistory::new().search();
        self.0.params_to_state(&mut setters, &search)
    }

    /// Apply URL parameters on every back / forward navigation until `unsubscribe` is called.
    pub fn listen(&self, setters: &Object) -> PopStateListener {
        let setters = setters_from_js(setters, self.0.definitions());
        PopStateListener(Some(self.0.listen(BrowserHistory::new(), setters)))
    }
}

/// Registration of a popstate listener, see `UrlStateSync.listen`.
#[wasm_bindgen]
#[derive(Debug)]
pub struct PopStateListener(Option<PopStateSubscription<BrowserHistory>>);

#[wasm_bindgen]
impl PopStateListener {
    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.0.take() {
            subscription.unsubscribe();
        }
    }
}
