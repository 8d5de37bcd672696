// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section–link index: which navigation entry belongs to which content section, and which
//! entry encloses which.
//!
//! ## Building
//!
//! [`SectionIndex::build`] walks the navigation tree once, in document order, and for each
//! linked list item records:
//!
//! - its parent, the nearest enclosing linked item (unlinked grouping items are skipped over);
//! - its target anchor, for click navigation;
//! - a section mapping, if the anchor resolves to a content section whose heading is not the
//!   title level. Only these sections are observed.
//!
//! Dangling links are expected while a document is being written: they keep their click entry
//! and contribute nothing to observation. No error is raised.
//!
//! ## Example
//!
//! ```
//! use embedsync_toc::index::SectionIndex;
//! use embedsync_toc::types::{HeadingLevel, NavNode, Section};
//!
//! let nav = vec![NavNode::with_children("#usage", vec![NavNode::link("#install")])];
//! let sections = |id: &str| match id {
//!     "usage" => Some(Section { level: HeadingLevel::new(2) }),
//!     "install" => Some(Section { level: HeadingLevel::new(3) }),
//!     _ => None,
//! };
//! let index = SectionIndex::build(&nav, &sections);
//! let usage = index.entry_for_section("usage").unwrap();
//! let install = index.entry_for_section("install").unwrap();
//! assert_eq!(index.parent_of(install), Some(usage));
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use tracing::debug;

use crate::types::{EntryId, NavNode, ParentLookup, SectionLookup, anchor_from_href};

#[derive(Clone, Debug)]
struct Entry {
    anchor: Option<String>,
    parent: Option<EntryId>,
    observed: bool,
}

/// The precomputed section→entry and entry→parent mappings.
///
/// Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct SectionIndex {
    entries: Vec<Entry>,
    by_section: BTreeMap<String, EntryId>,
    by_anchor: BTreeMap<String, EntryId>,
    observed: Vec<String>,
}

impl SectionIndex {
    /// Build the index from the navigation tree and the content document.
    ///
    /// Runs in time linear in the number of navigation items. When two entries target the same
    /// anchor, the first in document order owns it.
    pub fn build(nav: &[NavNode], sections: &impl SectionLookup) -> Self {
        let mut index = Self::default();
        // (node, nearest enclosing entry); children pushed in reverse to keep document order.
        let mut stack: Vec<(&NavNode, Option<EntryId>)> =
            nav.iter().rev().map(|n| (n, None)).collect();

        while let Some((node, enclosing)) = stack.pop() {
            let this = match &node.href {
                Some(href) => Some(index.push_entry(href, enclosing, sections)),
                None => None,
            };
            let parent_for_children = this.or(enclosing);
            stack.extend(node.children.iter().rev().map(|c| (c, parent_for_children)));
        }

        debug!(
            entries = index.entries.len(),
            observed = index.observed.len(),
            "section index built"
        );
        index
    }

    fn push_entry(
        &mut self,
        href: &str,
        parent: Option<EntryId>,
        sections: &impl SectionLookup,
    ) -> EntryId {
        let id = EntryId(u32::try_from(self.entries.len()).unwrap_or(u32::MAX));
        let anchor = anchor_from_href(href).map(String::from);
        let mut observed = false;

        if let Some(a) = &anchor {
            if self.by_anchor.contains_key(a) {
                debug!(anchor = a.as_str(), "duplicate navigation target; first entry kept");
            } else {
                self.by_anchor.insert(a.clone(), id);
                match sections.lookup(a) {
                    Some(section) if section.level.is_some_and(|l| l.is_title()) => {}
                    Some(_) => {
                        observed = true;
                        self.by_section.insert(a.clone(), id);
                        self.observed.push(a.clone());
                    }
                    None => debug!(anchor = a.as_str(), "navigation target not found"),
                }
            }
        }

        self.entries.push(Entry {
            anchor,
            parent,
            observed,
        });
        id
    }

    /// The entry observing section `id`, if any.
    pub fn entry_for_section(&self, id: &str) -> Option<EntryId> {
        self.by_section.get(id).copied()
    }

    /// The entry that click navigation to `anchor` should activate, including entries whose
    /// target does not resolve.
    pub fn entry_for_anchor(&self, anchor: &str) -> Option<EntryId> {
        self.by_anchor.get(anchor).copied()
    }

    /// The target anchor of `entry`.
    pub fn anchor_of(&self, entry: EntryId) -> Option<&str> {
        self.entries.get(entry.index())?.anchor.as_deref()
    }

    /// Returns `true` if `entry` maps to an observed section.
    pub fn is_observed(&self, entry: EntryId) -> bool {
        self.entries.get(entry.index()).is_some_and(|e| e.observed)
    }

    /// The immediate ancestor of `entry`.
    pub fn parent_of(&self, entry: EntryId) -> Option<EntryId> {
        self.entries.get(entry.index())?.parent
    }

    /// Sections to observe, in navigation order.
    pub fn observed_sections(&self) -> &[String] {
        &self.observed
    }

    /// All entries in document order.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "push_entry never assigns an id past u32::MAX"
    )]
    pub fn entries(&self) -> impl Iterator<Item = EntryId> + '_ {
        (0..self.entries.len()).map(|i| EntryId(i as u32))
    }

    /// Number of navigation entries (observed or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the navigation contained no links.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ParentLookup for SectionIndex {
    fn parent_of(&self, entry: EntryId) -> Option<EntryId> {
        Self::parent_of(self, entry)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{HeadingLevel, Section};
    use alloc::vec;

    pub(crate) fn level(id: &str) -> Option<Section> {
        // Ids encode their heading level: "h1-...", "h2-...", and so on.
        let tag = id.split('-').next()?;
        HeadingLevel::from_tag(tag).map(|l| Section { level: Some(l) })
    }

    /// h1-title
    /// ├── h2-a
    /// │   └── h3-a1
    /// │       └── h4-a1x
    /// └── h2-b
    ///     └── h3-b1
    pub(crate) fn three_level_nav() -> Vec<NavNode> {
        vec![NavNode::with_children(
            "#h1-title",
            vec![
                NavNode::with_children(
                    "#h2-a",
                    vec![NavNode::with_children(
                        "#h3-a1",
                        vec![NavNode::link("#h4-a1x")],
                    )],
                ),
                NavNode::with_children("#h2-b", vec![NavNode::link("#h3-b1")]),
            ],
        )]
    }

    #[test]
    fn builds_parent_links_structurally() {
        let index = SectionIndex::build(&three_level_nav(), &level);
        let e = |id: &str| index.entry_for_anchor(id).unwrap();
        assert_eq!(index.parent_of(e("h4-a1x")), Some(e("h3-a1")));
        assert_eq!(index.parent_of(e("h3-a1")), Some(e("h2-a")));
        assert_eq!(index.parent_of(e("h2-a")), Some(e("h1-title")));
        assert_eq!(index.parent_of(e("h3-b1")), Some(e("h2-b")));
        assert_eq!(index.parent_of(e("h1-title")), None);
    }

    #[test]
    fn ids_follow_document_order() {
        let index = SectionIndex::build(&three_level_nav(), &level);
        let anchors: Vec<_> = index
            .entries()
            .map(|e| index.anchor_of(e).unwrap())
            .collect();
        assert_eq!(
            anchors,
            ["h1-title", "h2-a", "h3-a1", "h4-a1x", "h2-b", "h3-b1"]
        );
    }

    #[test]
    fn title_section_is_never_observed() {
        let index = SectionIndex::build(&three_level_nav(), &level);
        assert_eq!(index.entry_for_section("h1-title"), None);
        let title = index.entry_for_anchor("h1-title").unwrap();
        assert!(!index.is_observed(title));
        assert_eq!(
            index.observed_sections(),
            ["h2-a", "h3-a1", "h4-a1x", "h2-b", "h3-b1"]
        );
    }

    #[test]
    fn dangling_links_stay_clickable() {
        let nav = vec![
            NavNode::link("#h2-present"),
            NavNode::link("#missing"),
            NavNode::link("other.html#h2-present"),
        ];
        let index = SectionIndex::build(&nav, &|id: &str| {
            (id == "h2-present").then(|| Section {
                level: HeadingLevel::new(2),
            })
        });
        assert_eq!(index.len(), 3);
        let missing = index.entry_for_anchor("missing").unwrap();
        assert!(!index.is_observed(missing));
        assert_eq!(index.entry_for_section("missing"), None);
        assert_eq!(index.observed_sections(), ["h2-present"]);
        // Cross-document links are entries without a target.
        assert_eq!(index.anchor_of(EntryId(2)), None);
    }

    #[test]
    fn grouping_items_are_transparent() {
        let nav = vec![NavNode::with_children(
            "#h2-a",
            vec![NavNode::group(vec![NavNode::link("#h3-a1")])],
        )];
        let index = SectionIndex::build(&nav, &level);
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.parent_of(index.entry_for_section("h3-a1").unwrap()),
            index.entry_for_section("h2-a")
        );
    }

    #[test]
    fn flat_list_has_no_parents() {
        let nav = vec![
            NavNode::link("#h2-a"),
            NavNode::link("#h2-b"),
            NavNode::link("#h2-c"),
        ];
        let index = SectionIndex::build(&nav, &level);
        assert!(index.entries().all(|e| index.parent_of(e).is_none()));
    }

    #[test]
    fn duplicate_targets_keep_first_entry() {
        let nav = vec![NavNode::link("#h2-a"), NavNode::link("#h2-a")];
        let index = SectionIndex::build(&nav, &level);
        assert_eq!(index.entry_for_section("h2-a"), Some(EntryId(0)));
        assert_eq!(index.observed_sections().len(), 1);
    }

    #[test]
    fn all_dangling_observes_nothing() {
        let nav = vec![NavNode::with_children("#x", vec![NavNode::link("#y")])];
        let index = SectionIndex::build(&nav, &|_: &str| -> Option<Section> { None });
        assert_eq!(index.len(), 2);
        assert!(index.observed_sections().is_empty());
    }
}
