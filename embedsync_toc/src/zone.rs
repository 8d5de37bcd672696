// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The active zone: the band of the viewport where a section counts as current.
//!
//! ## Geometry
//!
//! For a viewport of height `h`:
//!
//! - the band starts `min(MAX_TOP_OFFSET, TOP_FRACTION * h)` below the viewport top;
//! - the bottom `clamp(90 - h / 20, MIN_BOTTOM_PERCENT, MAX_BOTTOM_PERCENT)` percent is excluded.
//!
//! Smaller viewports exclude a larger share of their height, leaving a proportionally smaller
//! band near the top. The band always has positive height: at least `h / 10`.

use alloc::format;
use alloc::string::String;

use kurbo::{Rect, Size};

/// Upper bound of the top offset, in CSS pixels.
pub const MAX_TOP_OFFSET: f64 = 72.0;
/// Share of the viewport height used as top offset below [`MAX_TOP_OFFSET`].
pub const TOP_FRACTION: f64 = 0.1;
/// Smallest excluded bottom share, reached on tall viewports.
pub const MIN_BOTTOM_PERCENT: f64 = 40.0;
/// Largest excluded bottom share, reached on short viewports.
pub const MAX_BOTTOM_PERCENT: f64 = 80.0;

/// The viewport has no usable height (zero, negative, or not finite).
///
/// Usually seen during initial layout; the computation is skipped and retried on the next resize.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ZoneError {
    /// Viewport height that could not produce a zone.
    #[error("viewport height {0} cannot hold an active zone")]
    DegenerateViewport(f64),
}

/// A viewport-relative active zone.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActiveZone {
    top_offset: f64,
    bottom_percent: f64,
}

impl ActiveZone {
    /// Compute the zone for a viewport of `viewport_height` CSS pixels.
    pub fn compute(viewport_height: f64) -> Result<Self, ZoneError> {
        if !viewport_height.is_finite() || viewport_height <= 0.0 {
            return Err(ZoneError::DegenerateViewport(viewport_height));
        }
        let top_offset = (viewport_height * TOP_FRACTION).min(MAX_TOP_OFFSET);
        let bottom_percent =
            (90.0 - viewport_height / 20.0).clamp(MIN_BOTTOM_PERCENT, MAX_BOTTOM_PERCENT);
        Ok(Self {
            top_offset,
            bottom_percent,
        })
    }

    /// Distance of the band's top edge below the viewport top, in CSS pixels.
    pub fn top_offset(&self) -> f64 {
        self.top_offset
    }

    /// Share of the viewport height excluded at the bottom, in percent.
    pub fn bottom_percent(&self) -> f64 {
        self.bottom_percent
    }

    /// The band in viewport coordinates.
    pub fn band(&self, viewport: Size) -> Rect {
        let bottom = viewport.height * (1.0 - self.bottom_percent / 100.0);
        Rect::new(0.0, self.top_offset, viewport.width, bottom)
    }

    /// The zone as a CSS margin for an intersection observer root (`top right bottom left`).
    pub fn root_margin(&self) -> String {
        format!(
            "-{:.1}px 0px -{:.1}% 0px",
            self.top_offset, self.bottom_percent
        )
    }
}
