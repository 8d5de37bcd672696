// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The highlighter: one owned instance wiring index, observer, arbiter and active chain.
//!
//! ## Event sources
//!
//! The platform feeds four kinds of events, each handled to completion before the next:
//!
//! - visibility reports → [`Highlighter::on_intersections`]
//! - content scrolling → [`Highlighter::on_scroll`]
//! - navigation clicks → [`Highlighter::on_link_click`]
//! - raw reader input → [`Highlighter::on_user_input`]
//! - viewport resizes → [`Highlighter::on_resize`], then [`Highlighter::on_resize_settled`]
//!   once the platform's timer for the returned token fires
//!
//! Intersecting sections are re-measured through the backend before a winner is chosen, so
//! nested sections that stay intersecting while their children pass the zone top still compete
//! with current geometry.
//!
//! Every path that changes highlighting goes through the same chain reducer, and the resulting
//! [`ChainEvent`](crate::chain::ChainEvent)s are applied to the [`TocHost`] before the handler returns.
//!
//! ## Failure behavior
//!
//! Nothing here fails loudly. No observable sections means the highlighter stays disabled; a
//! degenerate viewport defers observation to the next resize; unknown anchors fall through to
//! the platform's default navigation.

use tracing::debug;

use crate::arbiter::{InputSignals, ScrollArbiter, ScrollMode, Transition};
use crate::chain::{ActiveChain, EntryMarker, apply_events};
use crate::debounce::PendingToken;
use crate::index::SectionIndex;
use crate::observer::{ObserverController, VisibilityBackend};
use crate::types::EntryId;
use crate::visibility::{Intersection, VisibleSet};

/// Platform operations the highlighter drives.
pub trait TocHost: EntryMarker {
    /// Smoothly scroll the content so `section` comes into view.
    fn scroll_to(&mut self, section: &str);
}

/// Result of [`Highlighter::init`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Setup {
    /// Sections are being observed.
    Observing,
    /// No navigation entry resolves to an observable section; nothing is observed.
    Disabled,
    /// The viewport had no usable height; observation starts on the first usable resize.
    Deferred,
    /// `init` already ran; nothing was done.
    AlreadyInitialized,
}

/// Visibility-driven, hierarchy-aware navigation highlighter.
#[derive(Debug)]
pub struct Highlighter<B, H> {
    index: SectionIndex,
    chain: ActiveChain,
    visible: VisibleSet,
    observer: ObserverController<B>,
    arbiter: ScrollArbiter,
    host: H,
    initialized: bool,
}

impl<B: VisibilityBackend, H: TocHost> Highlighter<B, H> {
    /// Create an uninitialized highlighter.
    pub fn new(index: SectionIndex, backend: B, host: H) -> Self {
        let observer = ObserverController::new(backend, index.observed_sections().to_vec());
        Self {
            index,
            chain: ActiveChain::new(),
            visible: VisibleSet::new(),
            observer,
            arbiter: ScrollArbiter::new(),
            host,
            initialized: false,
        }
    }

    /// Replace the arbiter, e.g. to resume on fewer input kinds.
    pub fn with_arbiter(mut self, arbiter: ScrollArbiter) -> Self {
        self.arbiter = arbiter;
        self
    }

    /// Wire up observation for a viewport of `viewport_height`. A second call is a no-op.
    pub fn init(&mut self, viewport_height: f64) -> Setup {
        if self.initialized {
            return Setup::AlreadyInitialized;
        }
        self.initialized = true;

        if self.index.observed_sections().is_empty() {
            debug!(entries = self.index.len(), "no observable sections; highlighter disabled");
            return Setup::Disabled;
        }
        if let Err(err) = self.observer.set_zone(viewport_height) {
            debug!(%err, "observation deferred until resize");
            return Setup::Deferred;
        }
        self.observer.start();
        Setup::Observing
    }

    fn enabled(&self) -> bool {
        self.initialized && !self.index.observed_sections().is_empty()
    }

    fn activate(&mut self, entry: EntryId) {
        let events = self.chain.activate(entry, &self.index);
        apply_events(&events, &mut self.host);
    }

    /// Feed a batch of visibility reports.
    ///
    /// Ignored while suspended or stopped. Returns the entry activated by this batch, if the
    /// active chain changed.
    pub fn on_intersections(&mut self, batch: &[Intersection]) -> Option<EntryId> {
        if !self.enabled()
            || self.arbiter.mode() == ScrollMode::Suspended
            || !self.observer.is_observing()
        {
            return None;
        }
        for report in batch {
            if let Some(entry) = self.index.entry_for_section(&report.section) {
                self.visible.update(entry, report.bounds, report.intersecting);
            }
        }
        self.select()
    }

    /// The content scrolled without any section entering or leaving the zone.
    ///
    /// Ignored while suspended or stopped. Returns the entry activated, if the chain changed.
    pub fn on_scroll(&mut self) -> Option<EntryId> {
        if !self.enabled()
            || self.arbiter.mode() == ScrollMode::Suspended
            || !self.observer.is_observing()
        {
            return None;
        }
        self.select()
    }

    fn select(&mut self) -> Option<EntryId> {
        let index = &self.index;
        let backend = self.observer.backend();
        self.visible.refresh(|entry| {
            index
                .anchor_of(entry)
                .and_then(|section| backend.section_top(section))
        });
        let zone_top = self.observer.zone()?.top_offset();
        let target = self.visible.nearest_to(zone_top)?;
        if self.chain.leaf() == Some(target) {
            return None;
        }
        self.activate(target);
        Some(target)
    }

    /// A navigation link targeting `anchor` was clicked.
    ///
    /// Suspends observation, scrolls to the target and activates its chain directly. Returns
    /// `false` when the anchor is not in the navigation (or the highlighter is disabled); the
    /// platform should then let the default navigation happen.
    pub fn on_link_click(&mut self, anchor: &str) -> bool {
        if !self.enabled() {
            return false;
        }
        let Some(entry) = self.index.entry_for_anchor(anchor) else {
            return false;
        };
        if self.arbiter.on_click() == Transition::Suspend {
            self.observer.stop();
        }
        self.visible.clear();
        self.host.scroll_to(anchor);
        self.activate(entry);
        true
    }

    /// The reader produced raw input. Resumes observation if a click suspended it.
    pub fn on_user_input(&mut self, signal: InputSignals) {
        if self.arbiter.on_user_input(signal) == Transition::Resume && self.enabled() {
            self.visible.clear();
            self.observer.start();
        }
    }

    /// Record a viewport resize; arm a timer for the returned token.
    pub fn on_resize(&mut self, viewport_height: f64) -> PendingToken {
        self.observer.on_resize(viewport_height)
    }

    /// The timer for `token` fired. Recomputes the zone if `token` is still the newest.
    ///
    /// Returns `true` if the zone was recomputed.
    pub fn on_resize_settled(&mut self, token: PendingToken) -> bool {
        let Some(height) = self.observer.take_settled(token) else {
            return false;
        };
        if !self.enabled() {
            return false;
        }
        let before = self.observer.zone().copied();
        match self.observer.set_zone(height) {
            Ok(zone) => {
                if before.as_ref() != Some(zone) {
                    self.visible.clear();
                }
            }
            Err(err) => {
                debug!(%err, "zone recomputation skipped");
                return false;
            }
        }
        if self.arbiter.mode() == ScrollMode::Observing {
            self.observer.start();
        }
        true
    }

    /// Release every subscription and clear the highlighting. Safe at any time.
    ///
    /// A later [`Highlighter::init`] wires everything up again, starting in
    /// [`ScrollMode::Observing`].
    pub fn teardown(&mut self) {
        self.observer.shutdown();
        self.arbiter.reset();
        self.visible.clear();
        let events = self.chain.clear();
        apply_events(&events, &mut self.host);
        self.initialized = false;
    }

    /// The active entries, leaf first.
    pub fn active_chain(&self) -> &[EntryId] {
        self.chain.current()
    }

    /// Current scroll mode.
    pub fn mode(&self) -> ScrollMode {
        self.arbiter.mode()
    }

    /// Returns `true` while visibility subscriptions are held.
    pub fn is_observing(&self) -> bool {
        self.observer.is_observing()
    }

    /// The section–link index.
    pub fn index(&self) -> &SectionIndex {
        &self.index
    }

    /// The observer controller.
    pub fn observer(&self) -> &ObserverController<B> {
        &self.observer
    }

    /// Borrow the host.
    pub fn host(&self) -> &H {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::level;
    use crate::observer::tests::Recording;
    use crate::types::{NavNode, Section};
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use kurbo::Rect;

    #[derive(Debug, Default)]
    struct Page {
        active: BTreeSet<EntryId>,
        scrolls: Vec<String>,
    }

    impl EntryMarker for Page {
        fn set_active(&mut self, entry: EntryId, active: bool) {
            if active {
                self.active.insert(entry);
            } else {
                self.active.remove(&entry);
            }
        }
    }

    impl TocHost for Page {
        fn scroll_to(&mut self, section: &str) {
            self.scrolls.push(section.into());
        }
    }

    /// h2-intro
    /// h2-usage
    /// └── h3-install
    ///     └── h4-pip
    fn nav() -> Vec<NavNode> {
        vec![
            NavNode::link("#h2-intro"),
            NavNode::with_children(
                "#h2-usage",
                vec![NavNode::with_children(
                    "#h3-install",
                    vec![NavNode::link("#h4-pip")],
                )],
            ),
        ]
    }

    fn highlighter() -> Highlighter<Recording, Page> {
        let index = SectionIndex::build(&nav(), &level);
        Highlighter::new(index, Recording::default(), Page::default())
    }

    fn report(section: &str, y0: f64, intersecting: bool) -> Intersection {
        Intersection {
            section: section.into(),
            bounds: Rect::new(0.0, y0, 600.0, y0 + 200.0),
            intersecting,
        }
    }

    fn at(h: &Highlighter<Recording, Page>, tops: &[(&str, f64)]) {
        let mut geometry = h.observer().backend().geometry.borrow_mut();
        for &(section, top) in tops {
            geometry.insert(section.into(), top);
        }
    }

    fn set<'a>(anchors: &[&'a str]) -> BTreeSet<&'a str> {
        anchors.iter().copied().collect()
    }

    fn active_anchors(h: &Highlighter<Recording, Page>) -> BTreeSet<&str> {
        h.host()
            .active
            .iter()
            .map(|&e| h.index().anchor_of(e).unwrap())
            .collect()
    }

    #[test]
    fn visible_section_activates_its_chain() {
        let mut h = highlighter();
        assert_eq!(h.init(800.0), Setup::Observing);
        let pip = h.on_intersections(&[report("h4-pip", 80.0, true)]);
        assert_eq!(pip, h.index().entry_for_section("h4-pip"));
        assert_eq!(
            active_anchors(&h),
            set(&["h2-usage", "h3-install", "h4-pip"])
        );

        h.on_intersections(&[report("h4-pip", -300.0, false), report("h2-intro", 70.0, true)]);
        assert_eq!(active_anchors(&h), set(&["h2-intro"]));
    }

    #[test]
    fn nearest_to_zone_top_wins() {
        let mut h = highlighter();
        h.init(800.0);
        // Zone top is 72px; intro is tall and started well above, install starts close to it.
        h.on_intersections(&[
            report("h2-intro", -500.0, true),
            report("h3-install", 90.0, true),
        ]);
        assert_eq!(
            active_anchors(&h),
            set(&["h2-usage", "h3-install"])
        );
    }

    #[test]
    fn click_suspends_and_input_resumes_without_stale_section() {
        let mut h = highlighter();
        h.init(800.0);
        h.on_intersections(&[report("h2-intro", 75.0, true)]);
        assert_eq!(active_anchors(&h), set(&["h2-intro"]));

        assert!(h.on_link_click("h4-pip"));
        assert_eq!(h.mode(), ScrollMode::Suspended);
        assert!(!h.is_observing());
        assert_eq!(h.host().scrolls, ["h4-pip"]);
        assert_eq!(
            active_anchors(&h),
            set(&["h2-usage", "h3-install", "h4-pip"])
        );

        // Reports queued during the animation are ignored.
        assert_eq!(h.on_intersections(&[report("h3-install", 72.0, true)]), None);
        assert_eq!(
            h.active_chain().first(),
            h.index().entry_for_section("h4-pip").as_ref()
        );

        h.on_user_input(InputSignals::WHEEL);
        assert_eq!(h.mode(), ScrollMode::Observing);
        assert!(h.is_observing());
        assert_eq!(h.observer().backend().connects.len(), 2);

        // Only pip reports after re-subscription; intro's pre-click report must not win.
        h.on_intersections(&[report("h4-pip", 150.0, true)]);
        assert_eq!(
            active_anchors(&h),
            set(&["h2-usage", "h3-install", "h4-pip"])
        );
    }

    #[test]
    fn input_while_observing_changes_nothing() {
        let mut h = highlighter();
        h.init(800.0);
        h.on_user_input(InputSignals::KEY);
        h.on_user_input(InputSignals::POINTER);
        assert_eq!(h.observer().backend().connects.len(), 1);
        assert_eq!(h.observer().backend().disconnects, 0);
    }

    #[test]
    fn unknown_anchor_falls_through() {
        let mut h = highlighter();
        h.init(800.0);
        assert!(!h.on_link_click("elsewhere"));
        assert_eq!(h.mode(), ScrollMode::Observing);
        assert!(h.host().scrolls.is_empty());
    }

    #[test]
    fn all_dangling_links_disable_quietly() {
        let nav = vec![NavNode::with_children("#gone", vec![NavNode::link("#also-gone")])];
        let index = SectionIndex::build(&nav, &|_: &str| -> Option<Section> { None });
        let mut h = Highlighter::new(index, Recording::default(), Page::default());
        assert_eq!(h.init(800.0), Setup::Disabled);
        assert!(h.observer().backend().connects.is_empty());
        assert!(!h.on_link_click("gone"));
        let token = h.on_resize(600.0);
        assert!(!h.on_resize_settled(token));
        h.teardown();
        assert!(h.observer().backend().connects.is_empty());
    }

    #[test]
    fn second_init_is_noop() {
        let mut h = highlighter();
        assert_eq!(h.init(800.0), Setup::Observing);
        assert_eq!(h.init(800.0), Setup::AlreadyInitialized);
        assert_eq!(h.observer().backend().connects.len(), 1);
    }

    #[test]
    fn zero_height_defers_to_resize() {
        let mut h = highlighter();
        assert_eq!(h.init(0.0), Setup::Deferred);
        assert!(!h.is_observing());
        let token = h.on_resize(0.0);
        assert!(!h.on_resize_settled(token), "still degenerate");
        let token = h.on_resize(700.0);
        assert!(h.on_resize_settled(token));
        assert!(h.is_observing());
    }

    #[test]
    fn resize_storm_recomputes_once() {
        let mut h = highlighter();
        h.init(1200.0);
        let tokens: Vec<_> = (0..25).map(|i| h.on_resize(1200.0 - f64::from(i) * 28.0)).collect();
        let recomputed = tokens
            .into_iter()
            .filter(|&t| h.on_resize_settled(t))
            .count();
        assert_eq!(recomputed, 1);
        let backend = h.observer().backend();
        assert_eq!(backend.connects.len(), 2);
        assert_eq!(backend.disconnects, 1);
    }

    #[test]
    fn resize_while_suspended_waits_for_input() {
        let mut h = highlighter();
        h.init(1200.0);
        h.on_link_click("h2-intro");
        let token = h.on_resize(500.0);
        assert!(h.on_resize_settled(token));
        assert!(!h.is_observing(), "suspension outlives a resize");
        h.on_user_input(InputSignals::TOUCH);
        let backend = h.observer().backend();
        assert_eq!(backend.connects.last().map(|c| c.0.as_str()), Some("-50.0px 0px -65.0% 0px"));
    }

    #[test]
    fn nested_children_win_once_their_heading_reaches_the_zone() {
        let mut h = highlighter();
        h.init(800.0);
        // Zone spans 72..400. usage encloses install, which encloses pip.
        at(&h, &[("h2-usage", 400.0)]);
        h.on_intersections(&[report("h2-usage", 400.0, true)]);
        assert_eq!(active_anchors(&h), set(&["h2-usage"]));

        // install enters at the band bottom while usage is still intersecting.
        at(&h, &[("h2-usage", 100.0), ("h3-install", 400.0)]);
        h.on_intersections(&[report("h3-install", 400.0, true)]);
        assert_eq!(active_anchors(&h), set(&["h2-usage"]));

        // No report fires when install's heading reaches the zone top.
        at(&h, &[("h2-usage", -228.0), ("h3-install", 72.0)]);
        let install = h.on_scroll();
        assert_eq!(install, h.index().entry_for_section("h3-install"));
        assert_eq!(active_anchors(&h), set(&["h2-usage", "h3-install"]));

        at(&h, &[("h2-usage", -428.0), ("h3-install", -128.0), ("h4-pip", 400.0)]);
        h.on_intersections(&[report("h4-pip", 400.0, true)]);
        assert_eq!(active_anchors(&h), set(&["h2-usage", "h3-install"]));

        at(&h, &[("h2-usage", -700.0), ("h3-install", -400.0), ("h4-pip", 76.0)]);
        h.on_scroll();
        assert_eq!(
            active_anchors(&h),
            set(&["h2-usage", "h3-install", "h4-pip"])
        );
        assert_eq!(h.on_scroll(), None, "same geometry keeps the chain");
    }

    #[test]
    fn reports_use_current_geometry_of_earlier_sections() {
        let mut h = highlighter();
        h.init(800.0);
        at(&h, &[("h2-intro", 75.0)]);
        h.on_intersections(&[report("h2-intro", 75.0, true)]);
        assert_eq!(active_anchors(&h), set(&["h2-intro"]));

        // intro is tall and still intersecting, but its top is far above the zone by now.
        at(&h, &[("h2-intro", -500.0), ("h2-usage", 390.0)]);
        h.on_intersections(&[report("h2-usage", 390.0, true)]);
        assert_eq!(active_anchors(&h), set(&["h2-usage"]));
    }

    #[test]
    fn scroll_is_ignored_while_suspended() {
        let mut h = highlighter();
        h.init(800.0);
        h.on_intersections(&[report("h2-intro", 75.0, true)]);
        h.on_link_click("h4-pip");
        at(&h, &[("h2-intro", 72.0)]);
        assert_eq!(h.on_scroll(), None);
        assert_eq!(
            h.active_chain().first(),
            h.index().entry_for_section("h4-pip").as_ref()
        );
    }

    #[test]
    fn reinit_after_teardown_while_suspended_observes() {
        let mut h = highlighter();
        h.init(800.0);
        assert!(h.on_link_click("h2-usage"));
        assert_eq!(h.mode(), ScrollMode::Suspended);
        h.teardown();

        assert_eq!(h.init(800.0), Setup::Observing);
        assert_eq!(h.mode(), ScrollMode::Observing);
        assert!(h.is_observing());
        let intro = h.on_intersections(&[report("h2-intro", 80.0, true)]);
        assert_eq!(intro, h.index().entry_for_section("h2-intro"));
    }

    #[test]
    fn teardown_releases_everything() {
        let mut h = highlighter();
        h.teardown();
        assert_eq!(h.observer().backend().disconnects, 0, "teardown before init");

        h.init(800.0);
        h.on_intersections(&[report("h3-install", 80.0, true)]);
        let token = h.on_resize(640.0);
        h.teardown();
        assert!(!h.is_observing());
        assert!(!h.observer().backend().live);
        assert!(h.host().active.is_empty());
        assert!(!h.on_resize_settled(token), "pending recomputation dropped");
    }
}
