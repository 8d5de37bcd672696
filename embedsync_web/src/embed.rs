// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Embedding detection and the one-shot wire-up guard.

use wasm_bindgen::JsValue;
use web_sys::{Element, Window};

/// Root attribute marking a page that is already wired up.
pub(crate) const READY_ATTRIBUTE: &str = "data-embedsync-ready";

/// Returns `true` when `window` is not its own top-level browsing context.
///
/// A top window that cannot be read (cross-origin access denied) also counts as embedded.
pub(crate) fn is_embedded(window: &Window) -> bool {
    match window.top() {
        Ok(Some(top)) => {
            let own: &JsValue = window.as_ref();
            let top: &JsValue = top.as_ref();
            own != top
        }
        Ok(None) => false,
        Err(_) => true,
    }
}

/// Claim the page. Returns `false` if an earlier wire-up already did.
pub(crate) fn claim(root: &Element) -> bool {
    if root.has_attribute(READY_ATTRIBUTE) {
        return false;
    }
    if let Err(err) = root.set_attribute(READY_ATTRIBUTE, "") {
        tracing::warn!(err = %crate::dom::describe(&err), "could not mark page as wired");
    }
    true
}

/// Release the page so a later wire-up can claim it again.
pub(crate) fn release(root: &Element) {
    let _ = root.remove_attribute(READY_ATTRIBUTE);
}
