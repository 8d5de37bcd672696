// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer controller: owns the active zone and the subscription of every indexed section.
//!
//! ## Lifecycle
//!
//! - [`ObserverController::start`] subscribes all sections with the current zone.
//! - [`ObserverController::stop`] releases every subscription. Safe before any start.
//! - Both are idempotent.
//!
//! A zone change is never applied to a live subscription set: [`ObserverController::set_zone`]
//! stops, swaps the zone, and starts again, so observation never runs with mixed geometry.
//!
//! Resize signals go through a [`Debouncer`]. Only the newest token recomputes the zone.

use alloc::string::String;
use alloc::vec::Vec;

use tracing::debug;

use crate::debounce::{Debouncer, PendingToken};
use crate::zone::{ActiveZone, ZoneError};

/// A visibility-intersection facility.
///
/// `connect` must observe exactly the given sections with the given zone; `disconnect` must
/// release everything `connect` set up.
pub trait VisibilityBackend {
    /// Subscribe `sections` using `zone`.
    fn connect(&mut self, zone: &ActiveZone, sections: &[String]);
    /// Release every subscription.
    fn disconnect(&mut self);
    /// Current top edge of `section` in viewport coordinates.
    ///
    /// Reports only carry bounds for sections whose state changed, so intersecting sections are
    /// re-measured before a winner is chosen. `None` keeps the last reported edge.
    fn section_top(&self, section: &str) -> Option<f64> {
        let _ = section;
        None
    }
}

/// Owns the zone, the subscription state, and the pending resize recomputation.
#[derive(Debug)]
pub struct ObserverController<B> {
    backend: B,
    sections: Vec<String>,
    zone: Option<ActiveZone>,
    subscribed: bool,
    resize: Debouncer<f64>,
}

impl<B: VisibilityBackend> ObserverController<B> {
    /// Create a stopped controller over `sections`. No zone is known yet.
    pub fn new(backend: B, sections: Vec<String>) -> Self {
        Self {
            backend,
            sections,
            zone: None,
            subscribed: false,
            resize: Debouncer::new(),
        }
    }

    /// Sections this controller subscribes when started.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// The current zone, once a viewport height has been accepted.
    pub fn zone(&self) -> Option<&ActiveZone> {
        self.zone.as_ref()
    }

    /// Returns `true` while subscriptions are held.
    pub fn is_observing(&self) -> bool {
        self.subscribed
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Subscribe every section with the current zone.
    ///
    /// Returns `true` if subscriptions are held afterwards. Does nothing when there are no
    /// sections or no zone yet.
    pub fn start(&mut self) -> bool {
        if self.subscribed {
            return true;
        }
        if self.sections.is_empty() {
            return false;
        }
        let Some(zone) = self.zone else {
            return false;
        };
        self.backend.connect(&zone, &self.sections);
        self.subscribed = true;
        debug!(sections = self.sections.len(), margin = %zone.root_margin(), "observer started");
        true
    }

    /// Release every subscription.
    pub fn stop(&mut self) {
        if !self.subscribed {
            return;
        }
        self.backend.disconnect();
        self.subscribed = false;
        debug!("observer stopped");
    }

    /// Compute and install the zone for `viewport_height`.
    ///
    /// When observing, subscriptions are stopped and restarted around the swap. On error the
    /// previous zone and subscriptions are left as they were.
    pub fn set_zone(&mut self, viewport_height: f64) -> Result<&ActiveZone, ZoneError> {
        let zone = ActiveZone::compute(viewport_height)?;
        if self.zone == Some(zone) {
            return Ok(self.zone.insert(zone));
        }
        let was_observing = self.subscribed;
        self.stop();
        self.zone = Some(zone);
        if was_observing {
            self.start();
        }
        Ok(self.zone.insert(zone))
    }

    /// Record a resize signal. Supersedes any pending recomputation.
    pub fn on_resize(&mut self, viewport_height: f64) -> PendingToken {
        self.resize.schedule(viewport_height)
    }

    /// Returns `true` if a resize is waiting to settle.
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Take the settled height for `token`, if it is still the newest.
    pub fn take_settled(&mut self, token: PendingToken) -> Option<f64> {
        self.resize.take(token)
    }

    /// Stop and drop any pending recomputation.
    pub fn shutdown(&mut self) {
        self.resize.cancel();
        self.stop();
    }
}
