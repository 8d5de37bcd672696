// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter errors.

use crate::config::ConfigError;

/// Failure to wire the runtime into a page.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// There is no `window` global.
    #[error("no window available")]
    NoWindow,
    /// The window has no document or the document has no root element.
    #[error("no document available")]
    NoDocument,
    /// The configuration could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A DOM call threw.
    #[error("DOM call failed: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(crate::dom::describe(&value))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<WebError> for wasm_bindgen::JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
