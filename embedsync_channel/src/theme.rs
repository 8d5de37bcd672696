// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme values and the store that applies them to a document.
//!
//! ## Layout
//!
//! A resolved theme is written to two document attributes ([`THEME_ATTRIBUTES`]) and two
//! persistent storage keys ([`THEME_STORAGE_KEYS`]). Different downstream theme consumers read
//! different names, so all four are written on every apply and none may be dropped.
//!
//! Writes are last-write-wins: a newer apply overwrites whatever was persisted before.

use core::fmt;
use core::str::FromStr;

use tracing::{debug, warn};

/// Document attributes that carry the resolved theme.
pub const THEME_ATTRIBUTES: [&str; 2] = ["data-theme", "data-mode"];

/// Persistent storage keys that carry the resolved theme.
pub const THEME_STORAGE_KEYS: [&str; 2] = ["theme", "mode"];

/// The two supported themes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Theme {
    /// Light color scheme.
    Light,
    /// Dark color scheme.
    Dark,
}

impl Theme {
    /// Wire and storage spelling of the theme.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A theme string outside `{"light", "dark"}`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unsupported theme value {0:?}")]
pub struct InvalidTheme(pub alloc::string::String);

impl FromStr for Theme {
    type Err = InvalidTheme;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(InvalidTheme(other.into())),
        }
    }
}

/// Persistent storage refused a write (quota, privacy mode, or no storage at all).
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("could not persist {key:?}: {reason}")]
pub struct PersistError {
    /// Storage key that failed.
    pub key: &'static str,
    /// Platform-provided reason.
    pub reason: alloc::string::String,
}

/// Where a resolved theme lands: document attributes and page-local storage.
pub trait ThemeSink {
    /// Set a document attribute.
    fn set_attribute(&mut self, name: &str, value: &str);
    /// Persist a key so a standalone reload picks the theme back up.
    fn persist(&mut self, key: &'static str, value: &str) -> Result<(), PersistError>;
}

/// Applies validated themes to a [`ThemeSink`].
///
/// Only the [`Gateway`](crate::gateway::Gateway) feeds this store from outside input;
/// a platform may also call [`ThemeStore::apply`] directly on load.
#[derive(Clone, Debug, Default)]
pub struct ThemeStore<S> {
    sink: S,
    current: Option<Theme>,
}

impl<S: ThemeSink> ThemeStore<S> {
    /// Create a store over a sink. No theme is applied yet.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
        }
    }

    /// Write `theme` to every attribute and storage key.
    ///
    /// Re-applying the same value rewrites the same values; the outcome is identical.
    /// A failed storage write is logged and does not stop the remaining writes.
    pub fn apply(&mut self, theme: Theme) {
        let value = theme.as_str();
        for name in THEME_ATTRIBUTES {
            self.sink.set_attribute(name, value);
        }
        for key in THEME_STORAGE_KEYS {
            if let Err(err) = self.sink.persist(key, value) {
                warn!(%err, "theme applied without persistence");
            }
        }
        self.current = Some(theme);
        debug!(theme = value, "theme applied");
    }

    /// The last applied theme, if any.
    pub fn current(&self) -> Option<Theme> {
        self.current
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the store and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
