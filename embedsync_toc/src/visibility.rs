// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility reports and the set of sections currently inside the active zone.
//!
//! ## Selection
//!
//! Visibility facilities report only the sections whose state changed, so the set keeps the
//! latest bounds of every section still intersecting. When several intersect at once, the one
//! whose top edge is nearest the top of the zone wins. Neither insertion order nor document order
//! decides, since sections of uneven height make both diverge from what the reader sees.
//! Exact distance ties fall back to document order so the choice is deterministic.

use alloc::collections::BTreeMap;
use alloc::string::String;

use kurbo::Rect;

use crate::types::EntryId;

/// One visibility report.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection {
    /// Anchor id of the reported section.
    pub section: String,
    /// Section bounds in viewport coordinates.
    pub bounds: Rect,
    /// Whether the section intersects the active zone.
    pub intersecting: bool,
}

/// Entries whose sections currently intersect the active zone, with their latest bounds.
#[derive(Clone, Debug, Default)]
pub struct VisibleSet {
    tops: BTreeMap<EntryId, f64>,
}

impl VisibleSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a report for `entry`.
    pub fn update(&mut self, entry: EntryId, bounds: Rect, intersecting: bool) {
        if intersecting {
            self.tops.insert(entry, bounds.y0);
        } else {
            self.tops.remove(&entry);
        }
    }

    /// Replace the recorded top of every entry `measure` can see now.
    pub fn refresh(&mut self, mut measure: impl FnMut(EntryId) -> Option<f64>) {
        for (&entry, top) in &mut self.tops {
            if let Some(fresh) = measure(entry) {
                *top = fresh;
            }
        }
    }

    /// The entry whose section top is nearest `zone_top` (viewport coordinates).
    pub fn nearest_to(&self, zone_top: f64) -> Option<EntryId> {
        let mut best: Option<(EntryId, f64)> = None;
        // Ascending id order, so a strict comparison keeps the earlier entry on ties.
        for (&entry, &top) in &self.tops {
            let offset = top - zone_top;
            let distance = if offset < 0.0 { -offset } else { offset };
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((entry, distance));
            }
        }
        best.map(|(entry, _)| entry)
    }

    /// Forget every report.
    pub fn clear(&mut self) {
        self.tops.clear();
    }

    /// Number of intersecting entries.
    pub fn len(&self) -> usize {
        self.tops.len()
    }

    /// Returns `true` if nothing intersects.
    pub fn is_empty(&self) -> bool {
        self.tops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y0: f64, y1: f64) -> Rect {
        Rect::new(0.0, y0, 600.0, y1)
    }

    #[test]
    fn topmost_wins_over_document_order() {
        let mut set = VisibleSet::new();
        // Entry 0 is a tall section that began far above the zone; entry 3 starts right at it.
        set.update(EntryId(0), at(-900.0, 120.0), true);
        set.update(EntryId(3), at(60.0, 400.0), true);
        assert_eq!(set.nearest_to(50.0), Some(EntryId(3)));
    }

    #[test]
    fn topmost_wins_over_report_order() {
        let mut set = VisibleSet::new();
        set.update(EntryId(2), at(180.0, 300.0), true);
        set.update(EntryId(1), at(55.0, 170.0), true);
        assert_eq!(set.nearest_to(50.0), Some(EntryId(1)));
    }

    #[test]
    fn leaving_removes() {
        let mut set = VisibleSet::new();
        set.update(EntryId(1), at(55.0, 170.0), true);
        set.update(EntryId(2), at(180.0, 300.0), true);
        set.update(EntryId(1), at(-200.0, -10.0), false);
        assert_eq!(set.nearest_to(50.0), Some(EntryId(2)));
        assert_eq!(set.len(), 1);
        set.clear();
        assert_eq!(set.nearest_to(50.0), None);
    }

    #[test]
    fn refresh_replaces_stale_tops() {
        let mut set = VisibleSet::new();
        // Both entered at the band bottom, at different scroll positions.
        set.update(EntryId(0), at(400.0, 2000.0), true);
        set.update(EntryId(1), at(400.0, 900.0), true);
        assert_eq!(set.nearest_to(72.0), Some(EntryId(0)));

        set.refresh(|entry| match entry.index() {
            0 => Some(-250.0),
            1 => Some(72.0),
            _ => None,
        });
        assert_eq!(set.nearest_to(72.0), Some(EntryId(1)));
    }

    #[test]
    fn refresh_keeps_unmeasured_tops() {
        let mut set = VisibleSet::new();
        set.update(EntryId(2), at(90.0, 300.0), true);
        set.update(EntryId(5), at(300.0, 600.0), true);
        set.refresh(|entry| (entry.index() == 5).then_some(-900.0));
        assert_eq!(set.nearest_to(72.0), Some(EntryId(2)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ties_prefer_document_order() {
        let mut set = VisibleSet::new();
        set.update(EntryId(4), at(40.0, 80.0), true);
        set.update(EntryId(2), at(60.0, 90.0), true);
        assert_eq!(set.nearest_to(50.0), Some(EntryId(2)));
    }
}
