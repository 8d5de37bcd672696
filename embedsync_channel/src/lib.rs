// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Embedsync Channel: the trust boundary between a hosting page and an embedded document.
//!
//! ## Overview
//!
//! A hosting page may post control messages into an embedded documentation page.
//! This crate decides which of those messages are allowed to change anything.
//! It does not talk to a browser.
//! Instead, the platform extracts the string fields of an inbound message into a
//! [`RawMessage`](crate::message::RawMessage) together with the sender's origin, and the
//! [`Gateway`](crate::gateway::Gateway) either applies it or drops it.
//!
//! ## Acceptance
//!
//! A message is applied only when all of these hold:
//!
//! 1) its `type` is exactly `"update-theme"`,
//! 2) the sender origin is an exact member of the [`TrustedOrigins`](crate::origin::TrustedOrigins),
//! 3) its `theme` is exactly `"light"` or `"dark"`.
//!
//! Anything else is a [`Rejection`](crate::message::Rejection): logged at warning level and otherwise ignored.
//! A rejected message never touches the [`ThemeStore`](crate::theme::ThemeStore).
//!
//! ## Example
//!
//! ```
//! use embedsync_channel::gateway::Gateway;
//! use embedsync_channel::message::RawMessage;
//! use embedsync_channel::origin::TrustedOrigins;
//! use embedsync_channel::theme::{PersistError, Theme, ThemeSink, ThemeStore};
//!
//! #[derive(Default)]
//! struct Page { attributes: Vec<(String, String)> }
//!
//! impl ThemeSink for Page {
//!     fn set_attribute(&mut self, name: &str, value: &str) {
//!         self.attributes.push((name.into(), value.into()));
//!     }
//!     fn persist(&mut self, _key: &str, _value: &str) -> Result<(), PersistError> {
//!         Ok(())
//!     }
//! }
//!
//! let origins = TrustedOrigins::new(["https://portfolio.example.org"]).unwrap();
//! let mut gateway = Gateway::new(origins, ThemeStore::new(Page::default()));
//!
//! let msg = RawMessage { kind: Some("update-theme"), theme: Some("dark") };
//! assert_eq!(gateway.handle(&msg, "https://portfolio.example.org"), Ok(Theme::Dark));
//! assert!(gateway.handle(&msg, "https://evil.example.org").is_err());
//! assert_eq!(gateway.store().current(), Some(Theme::Dark));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod gateway;
pub mod message;
pub mod origin;
pub mod theme;
