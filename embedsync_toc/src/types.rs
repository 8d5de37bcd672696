// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: entry ids, heading levels, the navigation tree description, and platform lookups.

use alloc::string::String;
use alloc::vec::Vec;

/// Identifier of a navigation entry.
///
/// Ids are dense and assigned in document (pre-order) order by
/// [`SectionIndex::build`](crate::index::SectionIndex::build), so comparing two ids compares
/// their position in the navigation markup.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntryId(pub(crate) u32);

impl EntryId {
    /// Position of the entry in document order.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Heading level of a content section, `1..=6`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// The document title level. Sections at this level are never observed.
    pub const TITLE: Self = Self(1);

    /// Returns `None` outside `1..=6`.
    pub const fn new(level: u8) -> Option<Self> {
        if matches!(level, 1..=6) {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Parse a heading tag name such as `h2` or `H3`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.as_bytes() {
            [b'h' | b'H', d @ b'1'..=b'6'] => Self::new(d - b'0'),
            _ => None,
        }
    }

    /// The numeric level.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns `true` for the title level.
    pub const fn is_title(self) -> bool {
        self.0 == Self::TITLE.0
    }
}

/// A content section as seen by a [`SectionLookup`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Section {
    /// Level of the section's heading, when it has one.
    pub level: Option<HeadingLevel>,
}

/// Resolve an anchor id against the content document.
pub trait SectionLookup {
    /// Returns the section whose anchor is `id`, or `None` if nothing in the content has that id.
    fn lookup(&self, id: &str) -> Option<Section>;
}

impl<F: Fn(&str) -> Option<Section>> SectionLookup for F {
    fn lookup(&self, id: &str) -> Option<Section> {
        self(id)
    }
}

/// Look up the immediate ancestor of a navigation entry.
pub trait ParentLookup {
    /// Returns the parent of `entry`, or `None` if `entry` is top-level.
    fn parent_of(&self, entry: EntryId) -> Option<EntryId>;
}

/// One list item of the navigation markup.
///
/// `href` is the link's target. A list item without a link is `None`: it is not an entry, and its
/// children attach to the nearest enclosing entry instead.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NavNode {
    /// The link target, exactly as written in the markup.
    pub href: Option<String>,
    /// Nested list items.
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// A linked item without children.
    pub fn link(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            children: Vec::new(),
        }
    }

    /// A linked item with children.
    pub fn with_children(href: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            href: Some(href.into()),
            children,
        }
    }

    /// An unlinked grouping item.
    pub fn group(children: Vec<Self>) -> Self {
        Self {
            href: None,
            children,
        }
    }
}

/// Extract the section id of a same-page fragment link (`#intro` → `intro`).
///
/// Links to other documents and empty fragments have no target.
pub fn anchor_from_href(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some("") | None => None,
        Some(id) => Some(id),
    }
}
