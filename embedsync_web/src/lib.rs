// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Embedsync Web: wires the embedsync channel and TOC highlighter into a browser page.
//!
//! Load the generated module on a documentation page. On start it installs the panic hook and
//! the console logger, reads the optional [`config::Config`] element, and checks whether the page
//! is embedded in another window:
//!
//! - Standalone pages are left untouched.
//! - Embedded pages accept `update-theme` messages from trusted origins and get
//!   visibility-driven navigation highlighting.
//!
//! The host page keeps the handle alive for the lifetime of the page; `teardown` removes every
//! listener, observer, and timer.
//!
//! Only [`anchor`], [`config`] and [`error`] are available off `wasm32`.

#![cfg_attr(
    target_arch = "wasm32",
    allow(unsafe_code, reason = "wasm-bindgen exports expand to FFI glue")
)]

pub mod anchor;
pub mod config;
pub mod error;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod embed;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod observer;
#[cfg(target_arch = "wasm32")]
mod runtime;

#[cfg(target_arch = "wasm32")]
pub use runtime::Runtime;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::default());
}

/// Module entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed, which is fine.
    let _ = console_log::init_with_level(log::Level::Trace);
    log::set_max_level(log::Level::from(config::LogLevel::default()).to_level_filter());
    attach();
}

/// Wire the page if it is not wired yet. Returns `true` if it is wired afterwards.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn attach() -> bool {
    RUNTIME.with(|slot| {
        let mut runtime = slot.borrow_mut();
        if !runtime.is_attached() {
            *runtime = Runtime::attach();
        }
        runtime.is_attached()
    })
}

/// Returns `true` while the page is wired.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = isAttached)]
pub fn is_attached() -> bool {
    RUNTIME.with(|slot| slot.borrow().is_attached())
}

/// Remove every listener, observer, and timer installed by [`attach`].
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn teardown() {
    RUNTIME.with(|slot| slot.borrow_mut().teardown());
}
