// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single choke point for externally originated commands.
//!
//! ## Order of checks
//!
//! 1) Discriminant: anything but `"update-theme"` is dropped.
//! 2) Origin: the sender must be an exact member of the trusted set.
//! 3) Value: the theme must be `"light"` or `"dark"`.
//!
//! The checks are independent. Passing the origin check does not relax the value check and a
//! valid value does not relax the origin check. A failure at any step leaves the store untouched.

use tracing::warn;

use crate::message::{ControlMessage, RawMessage, Rejection};
use crate::origin::TrustedOrigins;
use crate::theme::{Theme, ThemeSink, ThemeStore};

/// Validates inbound messages and forwards accepted ones to a [`ThemeStore`].
#[derive(Clone, Debug)]
pub struct Gateway<S> {
    origins: TrustedOrigins,
    store: ThemeStore<S>,
}

impl<S: ThemeSink> Gateway<S> {
    /// Create a gateway over a fixed trusted set.
    pub fn new(origins: TrustedOrigins, store: ThemeStore<S>) -> Self {
        Self { origins, store }
    }

    /// Handle one inbound message from `sender_origin`.
    ///
    /// Returns the applied theme, or why the message was dropped. Rejections are logged at
    /// warning level; callers on the platform side are expected to discard the error.
    pub fn handle(&mut self, raw: &RawMessage<'_>, sender_origin: &str) -> Result<Theme, Rejection> {
        match self.admit(raw, sender_origin) {
            Ok(ControlMessage::UpdateTheme(theme)) => {
                self.store.apply(theme);
                Ok(theme)
            }
            Err(rejection) => {
                warn!(origin = sender_origin, %rejection, "control message dropped");
                Err(rejection)
            }
        }
    }

    fn admit(&self, raw: &RawMessage<'_>, sender_origin: &str) -> Result<ControlMessage, Rejection> {
        ControlMessage::recognize(raw)?;
        if !self.origins.contains(sender_origin) {
            return Err(Rejection::UntrustedOrigin(sender_origin.into()));
        }
        ControlMessage::decode(raw)
    }

    /// The trusted set this gateway checks against.
    pub fn origins(&self) -> &TrustedOrigins {
        &self.origins
    }

    /// Borrow the theme store.
    pub fn store(&self) -> &ThemeStore<S> {
        &self.store
    }

    /// Mutably borrow the theme store, e.g. to re-apply a persisted theme on load.
    pub fn store_mut(&mut self) -> &mut ThemeStore<S> {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::tests::Recorder;

    const TRUSTED: &str = "https://portfolio.example.org";

    fn gateway() -> Gateway<Recorder> {
        let origins = TrustedOrigins::new([TRUSTED]).unwrap();
        Gateway::new(origins, ThemeStore::new(Recorder::default()))
    }

    fn msg<'a>(kind: &'a str, theme: &'a str) -> RawMessage<'a> {
        RawMessage {
            kind: Some(kind),
            theme: Some(theme),
        }
    }

    #[test]
    fn accepts_trusted_valid_update() {
        let mut gw = gateway();
        assert_eq!(gw.handle(&msg("update-theme", "dark"), TRUSTED), Ok(Theme::Dark));
        assert_eq!(gw.store().current(), Some(Theme::Dark));
        assert!(gw.store().sink().storage.values().all(|v| v == "dark"));
    }

    #[test]
    fn unknown_kind_has_no_side_effect() {
        let mut gw = gateway();
        for kind in ["", "set-theme", "update-theme ", "UPDATE-THEME", "scroll"] {
            let before = gw.store().sink().clone();
            assert!(gw.handle(&msg(kind, "dark"), TRUSTED).is_err());
            assert_eq!(gw.store().sink(), &before, "kind {kind:?} must not write");
        }
        assert_eq!(gw.store().current(), None);
        assert_eq!(gw.store().sink().writes, 0);
    }

    #[test]
    fn untrusted_origin_is_rejected() {
        let mut gw = gateway();
        for origin in [
            "https://evil.example.org",
            "http://portfolio.example.org",
            "https://portfolio.example.org:8443",
            "https://portfolio.example.org.evil.net",
            "null",
            "",
        ] {
            assert_eq!(
                gw.handle(&msg("update-theme", "dark"), origin),
                Err(Rejection::UntrustedOrigin(origin.into())),
                "{origin:?} must be rejected"
            );
        }
        assert_eq!(gw.store().sink().writes, 0);
    }

    #[test]
    fn invalid_value_is_rejected_even_when_trusted() {
        let mut gw = gateway();
        for theme in ["blue", "Dark", "", "auto"] {
            assert_eq!(
                gw.handle(&msg("update-theme", theme), TRUSTED),
                Err(Rejection::InvalidTheme(theme.into()))
            );
        }
        let missing = RawMessage {
            kind: Some("update-theme"),
            theme: None,
        };
        assert_eq!(gw.handle(&missing, TRUSTED), Err(Rejection::MissingTheme));
        assert_eq!(gw.store().sink().writes, 0);
    }

    #[test]
    fn invalid_after_valid_keeps_prior_state() {
        let mut gw = gateway();
        assert!(gw.handle(&msg("update-theme", "dark"), TRUSTED).is_ok());
        let after_valid = gw.store().sink().clone();
        assert!(gw.handle(&msg("update-theme", "blue"), TRUSTED).is_err());
        assert_eq!(gw.store().sink(), &after_valid);
        assert_eq!(gw.store().current(), Some(Theme::Dark));
    }

    #[test]
    fn unknown_kind_checked_before_origin() {
        let mut gw = gateway();
        assert_eq!(
            gw.handle(&msg("ping", "dark"), "https://evil.example.org"),
            Err(Rejection::UnknownKind(Some("ping".into())))
        );
    }
}
