// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme messages through the gateway.
//!
//! A trusted parent switches the embedded page to dark; an untrusted frame and a malformed
//! message are rejected and leave the theme as it was.
//!
//! Run:
//! - `cargo run -p embedsync_demos --example theme_gateway`

use std::collections::BTreeMap;

use embedsync_channel::gateway::Gateway;
use embedsync_channel::message::{RawMessage, Rejection};
use embedsync_channel::origin::TrustedOrigins;
use embedsync_channel::theme::{PersistError, Theme, ThemeSink, ThemeStore};

#[derive(Debug, Default)]
struct Page {
    attributes: BTreeMap<String, String>,
    storage: BTreeMap<&'static str, String>,
}

impl ThemeSink for Page {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.into(), value.into());
    }

    fn persist(&mut self, key: &'static str, value: &str) -> Result<(), PersistError> {
        self.storage.insert(key, value.into());
        Ok(())
    }
}

fn main() {
    let origins = TrustedOrigins::new(["https://docs.example"]).unwrap();
    let mut gateway = Gateway::new(origins, ThemeStore::new(Page::default()));

    let dark = RawMessage {
        kind: Some("update-theme"),
        theme: Some("dark"),
    };
    let accepted = gateway.handle(&dark, "https://docs.example");
    println!("== Trusted ==\n  {accepted:?}");
    assert_eq!(accepted, Ok(Theme::Dark));

    let light = RawMessage {
        kind: Some("update-theme"),
        theme: Some("light"),
    };
    let spoofed = gateway.handle(&light, "https://evil.example");
    println!("== Untrusted ==\n  {spoofed:?}");
    assert_eq!(
        spoofed,
        Err(Rejection::UntrustedOrigin("https://evil.example".into()))
    );

    let blue = RawMessage {
        kind: Some("update-theme"),
        theme: Some("blue"),
    };
    let invalid = gateway.handle(&blue, "https://docs.example");
    println!("== Invalid ==\n  {invalid:?}");
    assert_eq!(invalid, Err(Rejection::InvalidTheme("blue".into())));

    let page = gateway.store().sink();
    println!("== Page ==\n  {:?}\n  {:?}", page.attributes, page.storage);
    assert_eq!(gateway.store().current(), Some(Theme::Dark));
    assert_eq!(page.attributes["data-theme"], "dark");
    assert_eq!(page.attributes["data-mode"], "dark");
    assert_eq!(page.storage["theme"], "dark");
    assert_eq!(page.storage["mode"], "dark");
}
