// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use crate::traits::{History, Location, PopStateTarget};
use crate::wasm::{BrowserHistory, JsUrlStateSync, state_to_params};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn pushes_onto_window_history() {
    let mut history = BrowserHistory::new();
    let pathname = history.location().unwrap().pathname;

    history
        .push(Location::new(pathname.clone(), "tbl_p=2"))
        .unwrap();

    let location = history.location().unwrap();
    assert_eq!(location.pathname, pathname);
    assert_eq!(location.search, "?tbl_p=2");
}

fn window_location() -> JsValue {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("location")).unwrap()
}

#[wasm_bindgen_test]
fn push_keeps_the_fragment() {
    let mut history = BrowserHistory::new();
    let pathname = history.location().unwrap().pathname;

    let location = window_location();
    js_sys::Reflect::set(
        &location,
        &JsValue::from_str("hash"),
        &JsValue::from_str("#details"),
    )
    .unwrap();

    history.push(Location::new(pathname, "tbl_p=4")).unwrap();

    let hash = js_sys::Reflect::get(&window_location(), &JsValue::from_str("hash")).unwrap();
    assert_eq!(hash.as_string().as_deref(), Some("#details"));
    assert_eq!(history.location().unwrap().search, "?tbl_p=4");
}

#[wasm_bindgen_test]
fn registers_and_removes_listeners() {
    let history = BrowserHistory::new();
    let calls = Rc::new(RefCell::new(0));

    let id = {
        let calls = calls.clone();
        history.add_popstate_listener(Box::new(move |_: &str| {
            *calls.borrow_mut() += 1;
        }))
    };
    history.remove_popstate_listener(id);

    // Removing twice is harmless.
    history.remove_popstate_listener(id);
    assert_eq!(*calls.borrow(), 0);
}

#[wasm_bindgen_test]
fn derives_params_for_javascript() {
    let state = js_sys::JSON::parse(r#"{"page": 3}"#).unwrap();
    let definitions = js_sys::JSON::parse(
        r#"[{"stateName": "page", "paramName": "p", "defaultParamValue": "1", "valueType": "num"}]"#,
    )
    .unwrap();

    let params = state_to_params(state, definitions, "tbl_".to_string()).unwrap();
    let page = js_sys::Reflect::get(&params, &JsValue::from_str("tbl_p")).unwrap();
    assert_eq!(page.as_f64(), Some(3.0));
}

fn table_definitions() -> JsValue {
    js_sys::JSON::parse(
        r#"[
            {"stateName": "page", "paramName": "p", "defaultParamValue": "1", "valueType": "num"},
            {"stateName": "search", "paramName": "s", "defaultParamValue": ""}
        ]"#,
    )
    .unwrap()
}

#[wasm_bindgen_test]
fn unrelated_and_null_fields_fall_back_to_defaults() {
    let state = js_sys::JSON::parse(
        r#"{"page": null, "loading": true, "rows": [], "search": {"text": "x"}}"#,
    )
    .unwrap();

    let params = state_to_params(state, table_definitions(), "tbl_".to_string()).unwrap();

    let page = js_sys::Reflect::get(&params, &JsValue::from_str("tbl_p")).unwrap();
    let search = js_sys::Reflect::get(&params, &JsValue::from_str("tbl_s")).unwrap();
    assert_eq!(page.as_string().as_deref(), Some("1"));
    assert_eq!(search.as_string().as_deref(), Some(""));
}

#[wasm_bindgen_test]
fn pushes_state_of_a_real_view() {
    let sync = JsUrlStateSync::new("view_".to_string(), table_definitions()).unwrap();
    let state = js_sys::JSON::parse(
        r#"{"page": 2, "search": null, "loading": false, "rows": [{"id": 1}]}"#,
    )
    .unwrap();

    assert!(sync.push_history(state.clone()).unwrap());
    assert!(!sync.push_history(state).unwrap());

    let search = BrowserHistory::new().search();
    assert!(search.contains("view_p=2"));
    assert!(search.contains("view_s="));

    // Not an object at all.
    let params = sync.state_to_params(JsValue::NULL).unwrap();
    let page = js_sys::Reflect::get(&params, &JsValue::from_str("view_p")).unwrap();
    assert_eq!(page.as_string().as_deref(), Some("1"));
}
