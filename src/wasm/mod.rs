// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser bindings and methods exported for WebAssembly targets.
//!
//! [`BrowserHistory`] connects the URL synchronizer to `window.history`. The remaining exports
//! make the permission checks and the URL synchronizer callable from the JavaScript front-end.
mod browser;
pub mod error;
mod permissions;
#[cfg(test)]
mod tests;
mod url_state;

use std::panic;

use console_error_panic_hook::hook as panic_hook;
use wasm_bindgen::prelude::wasm_bindgen;

pub use browser::{BrowserHistory, BrowserListenerId};
pub use permissions::{
    org_role_can_change_org_role_to_org_role, org_role_can_manage_org_role, user_can,
};
pub use url_state::{JsUrlStateSync, PopStateListener, state_to_params};

/// Sets a [`panic hook`] for better error messages in NodeJS or web browser.
///
/// [`panic hook`]: https://crates.io/crates/console_error_panic_hook
#[wasm_bindgen(js_name = setWasmPanicHook)]
pub fn set_wasm_panic_hook() {
    panic::set_hook(Box::new(panic_hook));
}
