// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Embedsync TOC: a visibility-driven, hierarchy-aware table-of-contents highlighter.
//!
//! ## Overview
//!
//! This crate keeps a page's navigation highlighting in step with what the reader is looking at,
//! regardless of which document drives the scroll position.
//! It does not touch a DOM.
//! Platforms describe the navigation markup as a [`NavNode`](crate::types::NavNode) tree, resolve
//! anchors through a [`SectionLookup`](crate::types::SectionLookup), and implement two seams:
//! a [`VisibilityBackend`](crate::observer::VisibilityBackend) that subscribes sections to
//! visibility events, and a [`TocHost`](crate::highlighter::TocHost) that marks entries and scrolls.
//!
//! ## Pieces
//!
//! - [`SectionIndex`](crate::index::SectionIndex): one linear pass mapping sections to entries and entries to parents.
//! - [`ActiveZone`](crate::zone::ActiveZone): the viewport band counting as "current"; narrower on short viewports.
//! - [`ObserverController`](crate::observer::ObserverController): start/stop of every subscription, with debounced zone recomputation.
//! - [`ActiveChain`](crate::chain::ActiveChain): replaces the active entry and all its ancestors in one step.
//! - [`ScrollArbiter`](crate::arbiter::ScrollArbiter): suspends observation during click-driven scrolling.
//! - [`Highlighter`](crate::highlighter::Highlighter): the single owned instance feeding them all.
//!
//! ## Workflow
//!
//! 1) Build a [`SectionIndex`](crate::index::SectionIndex) from the navigation and the content.
//! 2) Create a [`Highlighter`](crate::highlighter::Highlighter) and call `init` with the viewport height.
//! 3) Forward visibility reports, clicks, raw input, and resizes to its `on_*` handlers.
//!    - Overlapping sections: the one whose top is nearest the zone top wins.
//!    - Clicks: observation is suspended until the reader's next input.
//!    - Resizes: only the newest [`PendingToken`](crate::debounce::PendingToken) recomputes.
//!
//! ## Example
//!
//! ```
//! use embedsync_toc::chain::EntryMarker;
//! use embedsync_toc::highlighter::{Highlighter, Setup, TocHost};
//! use embedsync_toc::index::SectionIndex;
//! use embedsync_toc::observer::VisibilityBackend;
//! use embedsync_toc::types::{EntryId, HeadingLevel, NavNode, Section};
//! use embedsync_toc::visibility::Intersection;
//! use embedsync_toc::zone::ActiveZone;
//! use kurbo::Rect;
//!
//! struct NoopBackend;
//! impl VisibilityBackend for NoopBackend {
//!     fn connect(&mut self, _zone: &ActiveZone, _sections: &[String]) {}
//!     fn disconnect(&mut self) {}
//! }
//!
//! #[derive(Default)]
//! struct Toc(Vec<EntryId>);
//! impl EntryMarker for Toc {
//!     fn set_active(&mut self, entry: EntryId, active: bool) {
//!         self.0.retain(|e| *e != entry);
//!         if active { self.0.push(entry); }
//!     }
//! }
//! impl TocHost for Toc {
//!     fn scroll_to(&mut self, _section: &str) {}
//! }
//!
//! let nav = vec![NavNode::with_children("#guide", vec![NavNode::link("#setup")])];
//! let sections = |_: &str| Some(Section { level: HeadingLevel::new(2) });
//! let index = SectionIndex::build(&nav, &sections);
//!
//! let mut h = Highlighter::new(index, NoopBackend, Toc::default());
//! assert_eq!(h.init(900.0), Setup::Observing);
//! h.on_intersections(&[Intersection {
//!     section: "setup".into(),
//!     bounds: Rect::new(0.0, 80.0, 600.0, 400.0),
//!     intersecting: true,
//! }]);
//! assert_eq!(h.active_chain().len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod arbiter;
pub mod chain;
pub mod debounce;
pub mod highlighter;
pub mod index;
pub mod observer;
pub mod types;
pub mod visibility;
pub mod zone;
