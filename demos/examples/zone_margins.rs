// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active zone geometry across viewport heights.
//!
//! Short viewports get a proportionally smaller top offset and a narrower excluded bottom, so
//! the zone never collapses to nothing.
//!
//! Run:
//! - `cargo run -p embedsync_demos --example zone_margins`

use embedsync_toc::zone::{ActiveZone, ZoneError};
use kurbo::Size;

fn main() {
    println!("== Zones ==");
    for height in [320.0, 500.0, 900.0, 1200.0, 2160.0] {
        let zone = ActiveZone::compute(height).unwrap();
        let band = zone.band(Size::new(1280.0, height));
        println!(
            "  {height:>6}px  margin {:<24} band {:.1}..{:.1}",
            zone.root_margin(),
            band.y0,
            band.y1
        );
        assert!(band.height() > 0.0);
    }

    assert_eq!(
        ActiveZone::compute(500.0).unwrap().root_margin(),
        "-50.0px 0px -65.0% 0px"
    );
    assert_eq!(
        ActiveZone::compute(1200.0).unwrap().root_margin(),
        "-72.0px 0px -40.0% 0px"
    );

    println!("== Degenerate ==");
    let err = ActiveZone::compute(0.0).unwrap_err();
    println!("  {err}");
    assert!(matches!(err, ZoneError::DegenerateViewport(_)));
}
