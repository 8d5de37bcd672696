// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active chain: the entry for the current section plus every ancestor up to the root.
//!
//! ## Usage
//!
//! 1) Pick the entry whose section is current (from visibility or a click).
//! 2) Call [`ActiveChain::activate`] with a [`ParentLookup`] such as the
//!    [`SectionIndex`](crate::index::SectionIndex).
//! 3) Hand the returned [`ChainEvent`]s to the platform, e.g. with [`apply_events`].
//!
//! ## Minimal example
//!
//! ```
//! use embedsync_toc::chain::{ActiveChain, ChainEvent};
//! use embedsync_toc::index::SectionIndex;
//! use embedsync_toc::types::{NavNode, Section};
//!
//! let nav = vec![NavNode::with_children("#a", vec![NavNode::link("#b")]), NavNode::link("#c")];
//! let index = SectionIndex::build(&nav, &|_: &str| Some(Section::default()));
//! let (a, b, c) = (
//!     index.entry_for_section("a").unwrap(),
//!     index.entry_for_section("b").unwrap(),
//!     index.entry_for_section("c").unwrap(),
//! );
//!
//! let mut chain = ActiveChain::new();
//! assert_eq!(chain.activate(b, &index), vec![ChainEvent::Activate(b), ChainEvent::Activate(a)]);
//! assert_eq!(
//!     chain.activate(c, &index),
//!     vec![ChainEvent::Deactivate(b), ChainEvent::Deactivate(a), ChainEvent::Activate(c)]
//! );
//! ```

use alloc::vec::Vec;

use crate::types::{EntryId, ParentLookup};

/// Upper bound on ancestor hops; navigation markup nests far less deeply than this.
pub const MAX_CHAIN_DEPTH: usize = 32;

/// A change of one entry's active marking.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChainEvent {
    /// Mark the entry active.
    Activate(EntryId),
    /// Clear the entry's active marking.
    Deactivate(EntryId),
}

/// Something that can show or hide an entry's active marking.
pub trait EntryMarker {
    /// Set whether `entry` is shown as active.
    fn set_active(&mut self, entry: EntryId, active: bool);
}

/// Apply `events` to a marker, in order.
pub fn apply_events(events: &[ChainEvent], marker: &mut impl EntryMarker) {
    for event in events {
        match *event {
            ChainEvent::Activate(e) => marker.set_active(e, true),
            ChainEvent::Deactivate(e) => marker.set_active(e, false),
        }
    }
}

/// The currently active chain, stored leaf first (insertion order).
///
/// The chain is always one entry followed by its ancestors; it never mixes two paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveChain {
    current: Vec<EntryId>,
}

impl ActiveChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// The active entries, leaf first.
    pub fn current(&self) -> &[EntryId] {
        &self.current
    }

    /// The deepest active entry.
    pub fn leaf(&self) -> Option<EntryId> {
        self.current.first().copied()
    }

    /// Returns `true` if `entry` is on the active chain.
    pub fn contains(&self, entry: EntryId) -> bool {
        self.current.contains(&entry)
    }

    /// Make `entry` and its ancestors the active chain.
    ///
    /// Deactivates the whole previous chain (deepest first), then activates `entry`, its parent,
    /// and so on up to the root. The stored chain is replaced only once the new one is complete.
    /// Activating the current leaf again is a no-op.
    pub fn activate(&mut self, entry: EntryId, parents: &impl ParentLookup) -> Vec<ChainEvent> {
        if self.leaf() == Some(entry) {
            return Vec::new();
        }

        let mut next = Vec::new();
        let mut cur = Some(entry);
        while let Some(e) = cur {
            if next.len() == MAX_CHAIN_DEPTH || next.contains(&e) {
                break;
            }
            next.push(e);
            cur = parents.parent_of(e);
        }

        let mut out: Vec<ChainEvent> = self
            .current
            .iter()
            .map(|&e| ChainEvent::Deactivate(e))
            .collect();
        out.extend(next.iter().map(|&e| ChainEvent::Activate(e)));
        self.current = next;
        out
    }

    /// Clear the chain, returning deactivations deepest first.
    pub fn clear(&mut self) -> Vec<ChainEvent> {
        self.current.drain(..).map(ChainEvent::Deactivate).collect()
    }
}
