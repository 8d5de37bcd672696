// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control message envelope and decoding.
//!
//! The wire shape is `{ type: "update-theme", theme: "light" | "dark" }`.
//! Hosting pages and embedded pages are built independently, so the spelling is fixed.

use alloc::string::String;

use crate::theme::Theme;

/// Discriminant of the theme update message.
pub const UPDATE_THEME: &str = "update-theme";

/// The string fields of an inbound message, as extracted by the platform.
///
/// A field that is absent or not a string is `None`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RawMessage<'a> {
    /// The `type` field.
    pub kind: Option<&'a str>,
    /// The `theme` field.
    pub theme: Option<&'a str>,
}

/// A message that passed shape and value validation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ControlMessage {
    /// Switch the document to the given theme.
    UpdateTheme(Theme),
}

/// Why an inbound message was dropped.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// The `type` field is missing or not a recognized kind.
    #[error("unrecognized message kind {0:?}")]
    UnknownKind(Option<String>),
    /// The sender origin is not in the trusted set.
    #[error("untrusted sender origin {0:?}")]
    UntrustedOrigin(String),
    /// A theme update without a string `theme` field.
    #[error("theme update without a theme value")]
    MissingTheme,
    /// A theme update whose value is not a supported theme.
    #[error("unsupported theme value {0:?}")]
    InvalidTheme(String),
}

impl ControlMessage {
    /// Check the discriminant only.
    ///
    /// Used by the gateway before the origin check, so unknown kinds are dropped first.
    pub fn recognize(raw: &RawMessage<'_>) -> Result<(), Rejection> {
        match raw.kind {
            Some(UPDATE_THEME) => Ok(()),
            other => Err(Rejection::UnknownKind(other.map(String::from))),
        }
    }

    /// Validate the shape and payload of `raw`. Does not look at the sender origin.
    pub fn decode(raw: &RawMessage<'_>) -> Result<Self, Rejection> {
        Self::recognize(raw)?;
        let value = raw.theme.ok_or(Rejection::MissingTheme)?;
        let theme = value
            .parse::<Theme>()
            .map_err(|_| Rejection::InvalidTheme(value.into()))?;
        Ok(Self::UpdateTheme(theme))
    }

    /// The message kind as it appears on the wire.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UpdateTheme(_) => UPDATE_THEME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_theme_update() {
        let raw = RawMessage {
            kind: Some("update-theme"),
            theme: Some("light"),
        };
        assert_eq!(
            ControlMessage::decode(&raw),
            Ok(ControlMessage::UpdateTheme(Theme::Light))
        );
        assert_eq!(ControlMessage::UpdateTheme(Theme::Light).kind(), UPDATE_THEME);
    }

    #[test]
    fn unknown_kinds_are_rejected_before_payload() {
        for kind in [None, Some(""), Some("update_theme"), Some("Update-Theme"), Some("resize")] {
            let raw = RawMessage {
                kind,
                theme: Some("dark"),
            };
            assert_eq!(
                ControlMessage::decode(&raw),
                Err(Rejection::UnknownKind(kind.map(String::from))),
                "kind {kind:?} must be unknown"
            );
        }
    }

    #[test]
    fn payload_must_be_a_known_theme() {
        let missing = RawMessage {
            kind: Some(UPDATE_THEME),
            theme: None,
        };
        assert_eq!(ControlMessage::decode(&missing), Err(Rejection::MissingTheme));

        let blue = RawMessage {
            kind: Some(UPDATE_THEME),
            theme: Some("blue"),
        };
        assert_eq!(
            ControlMessage::decode(&blue),
            Err(Rejection::InvalidTheme("blue".into()))
        );
    }
}
