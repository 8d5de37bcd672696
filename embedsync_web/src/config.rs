// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-supplied configuration.
//!
//! A page may carry a `<script type="application/json" id="embedsync-config">` element. Every
//! field is optional; unknown fields are rejected so typos surface as warnings instead of being
//! silently ignored.
//!
//! ```
//! use embedsync_web::config::Config;
//!
//! let config = Config::from_json(r##"{ "toc_selector": "#toc", "log_level": "debug" }"##).unwrap();
//! assert_eq!(config.toc_selector, "#toc");
//! assert_eq!(config.active_class, "active");
//! ```

use embedsync_channel::origin::{OriginError, TrustedOrigins};
use embedsync_toc::arbiter::InputSignals;
use embedsync_toc::debounce::RESIZE_DEBOUNCE_MS;
use serde::Deserialize;

/// Id of the element holding the JSON configuration.
pub const CONFIG_ELEMENT_ID: &str = "embedsync-config";

/// Origins baked in at build time, comma separated.
const BUILD_TRUSTED_ORIGINS: Option<&str> = option_env!("EMBEDSYNC_TRUSTED_ORIGINS");

/// Failure to read the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON did not parse or named an unknown field.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// One of the trusted origins is not a concrete origin.
    #[error(transparent)]
    Origin(#[from] OriginError),
}

/// Verbosity of console logging.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Rejected messages and degraded setups.
    #[default]
    Warn,
    /// Lifecycle milestones.
    Info,
    /// Observer and chain activity.
    Debug,
    /// Everything.
    Trace,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// A kind of reader input that ends a click-driven suspension.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// `pointerdown`.
    Pointer,
    /// `keydown`.
    Key,
    /// `wheel`.
    Wheel,
    /// `touchstart`.
    Touch,
}

impl From<InputKind> for InputSignals {
    fn from(kind: InputKind) -> Self {
        match kind {
            InputKind::Pointer => Self::POINTER,
            InputKind::Key => Self::KEY,
            InputKind::Wheel => Self::WHEEL,
            InputKind::Touch => Self::TOUCH,
        }
    }
}

/// Runtime configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Exact origins allowed to send control messages.
    pub trusted_origins: Vec<String>,
    /// Selector of the navigation container.
    pub toc_selector: String,
    /// Selector of the element hosting the sections.
    pub content_selector: String,
    /// Class toggled on active links and their list items.
    pub active_class: String,
    /// Quiet period before a resize recomputes the zone.
    pub resize_debounce_ms: u32,
    /// Console verbosity.
    pub log_level: LogLevel,
    /// Input kinds that resume observation after a navigation click. Empty means all.
    pub resume_on: Vec<InputKind>,
    /// Body attributes that enable the page's own highlighter; removed when embedded.
    pub default_highlighter_attributes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trusted_origins: build_trusted_origins(BUILD_TRUSTED_ORIGINS),
            toc_selector: ".bd-toc-nav".into(),
            content_selector: "main".into(),
            active_class: "active".into(),
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            log_level: LogLevel::default(),
            resume_on: vec![
                InputKind::Pointer,
                InputKind::Key,
                InputKind::Wheel,
                InputKind::Touch,
            ],
            default_highlighter_attributes: vec!["data-bs-spy".into(), "data-bs-target".into()],
        }
    }
}

impl Config {
    /// Parse a configuration document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse `json` if present, falling back to defaults with a warning when it is malformed.
    pub fn from_page(json: Option<&str>) -> Self {
        let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
            return Self::default();
        };
        Self::from_json(json).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring page configuration");
            Self::default()
        })
    }

    /// The resume mask for the scroll arbiter.
    pub fn resume_signals(&self) -> InputSignals {
        let signals = self
            .resume_on
            .iter()
            .fold(InputSignals::empty(), |acc, &kind| acc | kind.into());
        if signals.is_empty() {
            InputSignals::all()
        } else {
            signals
        }
    }

    /// Validate the trusted origins.
    pub fn trusted(&self) -> Result<TrustedOrigins, ConfigError> {
        Ok(TrustedOrigins::new(&self.trusted_origins)?)
    }
}

fn build_trusted_origins(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
