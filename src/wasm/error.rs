// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Convert any displayable error into a JavaScript `Error` and return early with it.
macro_rules! jserr {
    ($l:expr) => {
        $l.map_err::<wasm_bindgen::JsValue, _>(|err| {
            js_sys::Error::new(&format!("{}", err)).into()
        })?
    };
}

pub(crate) use jserr;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser global '{0}' is not available")]
    MissingGlobal(&'static str),

    #[error("javascript exception: {0}")]
    Exception(String),
}

impl From<JsValue> for BrowserError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        BrowserError::Exception(message)
    }
}
