// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::rc::Rc;

use js_sys::{Function, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::traits::{History, Location, PopStateTarget};
use crate::wasm::error::BrowserError;

const POPSTATE: &str = "popstate";

fn window() -> JsValue {
    js_sys::global().into()
}

fn property(target: &JsValue, name: &'static str) -> Result<JsValue, BrowserError> {
    let value = Reflect::get(target, &JsValue::from_str(name))?;
    if value.is_undefined() || value.is_null() {
        return Err(BrowserError::MissingGlobal(name));
    }
    Ok(value)
}

fn method(target: &JsValue, name: &'static str) -> Result<Function, BrowserError> {
    property(target, name)?
        .dyn_into::<Function>()
        .map_err(|_| BrowserError::MissingGlobal(name))
}

fn string_property(target: &JsValue, name: &'static str) -> Result<String, BrowserError> {
    Ok(property(target, name)?.as_string().unwrap_or_default())
}

/// Handle of a popstate listener registered on the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BrowserListenerId(u32);

/// `window.history` and `window.location` of the page this module runs in.
///
/// Clones share their registered listeners.
#[derive(Clone, Default)]
pub struct BrowserHistory {
    listeners: Rc<RefCell<HashMap<BrowserListenerId, Closure<dyn FnMut()>>>>,
    next_listener_id: Rc<Cell<u32>>,
}

impl BrowserHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current `window.location`.
    pub fn location(&self) -> Result<Location, BrowserError> {
        let location = property(&window(), "location")?;
        Ok(Location::new(
            string_property(&location, "pathname")?,
            string_property(&location, "search")?,
        ))
    }

    /// Current `window.location.search`, empty if it can not be read.
    pub fn search(&self) -> String {
        current_search()
    }

    fn call_window(
        &self,
        name: &'static str,
        closure: &Closure<dyn FnMut()>,
    ) -> Result<(), BrowserError> {
        let window = window();
        method(&window, name)?.call2(&window, &JsValue::from_str(POPSTATE), closure.as_ref())?;
        Ok(())
    }
}

fn current_search() -> String {
    property(&window(), "location")
        .and_then(|location| string_property(&location, "search"))
        .unwrap_or_else(|err| {
            warn!(%err, "could not read window.location.search");
            String::new()
        })
}

impl History for BrowserHistory {
    type Error = BrowserError;

    fn push(&mut self, location: Location) -> Result<(), Self::Error> {
        // The fragment is not part of the synchronized state, keep the one of the current page.
        let hash = property(&window(), "location")
            .and_then(|current| string_property(&current, "hash"))
            .unwrap_or_default();
        let url = format!("{}{}", location, hash);

        let history = property(&window(), "history")?;
        method(&history, "pushState")?.call3(
            &history,
            &JsValue::NULL,
            &JsValue::from_str(""),
            &JsValue::from_str(&url),
        )?;
        Ok(())
    }
}

impl PopStateTarget for BrowserHistory {
    type ListenerId = BrowserListenerId;

    fn add_popstate_listener(&self, mut listener: Box<dyn FnMut(&str)>) -> Self::ListenerId {
        let id = BrowserListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0.wrapping_add(1));

        let closure = Closure::wrap(Box::new(move || {
            let search = current_search();
            listener(&search);
        }) as Box<dyn FnMut()>);

        match self.call_window("addEventListener", &closure) {
            Ok(()) => debug!(?id, "added window popstate listener"),
            Err(err) => warn!(%err, "could not add window popstate listener"),
        }

        // The closure has to outlive its registration on the window.
        self.listeners.borrow_mut().insert(id, closure);
        id
    }

    fn remove_popstate_listener(&self, id: Self::ListenerId) {
        let Some(closure) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };

        if let Err(err) = self.call_window("removeEventListener", &closure) {
            warn!(%err, "could not remove window popstate listener");
        }
    }
}

impl Debug for BrowserHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserHistory")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
