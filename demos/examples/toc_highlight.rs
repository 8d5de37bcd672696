// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Highlighting a three-level table of contents.
//!
//! The reader scrolls into a nested section, clicks a link in another branch, and finally
//! scrolls with the wheel, which hands control back to visibility reports.
//!
//! Run:
//! - `cargo run -p embedsync_demos --example toc_highlight`

use std::collections::BTreeSet;

use embedsync_toc::arbiter::{InputSignals, ScrollMode};
use embedsync_toc::chain::EntryMarker;
use embedsync_toc::highlighter::{Highlighter, Setup, TocHost};
use embedsync_toc::index::SectionIndex;
use embedsync_toc::observer::VisibilityBackend;
use embedsync_toc::types::{EntryId, HeadingLevel, NavNode, Section};
use embedsync_toc::visibility::Intersection;
use embedsync_toc::zone::ActiveZone;
use kurbo::Rect;

#[derive(Debug, Default)]
struct Observer {
    margins: Vec<String>,
}

impl VisibilityBackend for Observer {
    fn connect(&mut self, zone: &ActiveZone, sections: &[String]) {
        println!("  connect {} sections, margin {}", sections.len(), zone.root_margin());
        self.margins.push(zone.root_margin());
    }

    fn disconnect(&mut self) {
        println!("  disconnect");
    }
}

#[derive(Debug, Default)]
struct Toc {
    active: BTreeSet<EntryId>,
    scrolled_to: Vec<String>,
}

impl EntryMarker for Toc {
    fn set_active(&mut self, entry: EntryId, active: bool) {
        if active {
            self.active.insert(entry);
        } else {
            self.active.remove(&entry);
        }
    }
}

impl TocHost for Toc {
    fn scroll_to(&mut self, section: &str) {
        self.scrolled_to.push(section.into());
    }
}

fn level(id: &str) -> Option<Section> {
    let depth = id.bytes().take_while(|b| *b == b'-').count();
    let level = u8::try_from(depth + 2).ok()?;
    Some(Section {
        level: HeadingLevel::new(level),
    })
}

fn report(section: &str, top: f64) -> Intersection {
    Intersection {
        section: section.into(),
        bounds: Rect::new(0.0, top, 800.0, top + 300.0),
        intersecting: true,
    }
}

fn main() {
    // Leading dashes encode nesting depth: `install` is an h2, `-linux` an h3, `--apt` an h4.
    let nav = vec![
        NavNode::with_children(
            "#install",
            vec![NavNode::with_children("#-linux", vec![NavNode::link("#--apt")])],
        ),
        NavNode::with_children("#usage", vec![NavNode::link("#-cli")]),
    ];
    let index = SectionIndex::build(&nav, &level);
    let id = |anchor: &str| index.entry_for_anchor(anchor).unwrap();
    let (install, linux, apt, usage, cli) =
        (id("install"), id("-linux"), id("--apt"), id("usage"), id("-cli"));

    let mut h = Highlighter::new(index, Observer::default(), Toc::default());
    println!("== Init ==");
    assert_eq!(h.init(900.0), Setup::Observing);

    println!("== Scroll into the apt section ==");
    h.on_intersections(&[report("-linux", -120.0), report("--apt", 75.0)]);
    println!("  active {:?}", h.host().active);
    assert_eq!(h.active_chain(), [apt, linux, install]);
    assert_eq!(h.host().active, BTreeSet::from([install, linux, apt]));

    println!("== Click `cli` ==");
    assert!(h.on_link_click("-cli"));
    assert_eq!(h.mode(), ScrollMode::Suspended);
    assert_eq!(h.host().active, BTreeSet::from([usage, cli]));
    // Reports produced by the programmatic scroll are ignored.
    h.on_intersections(&[report("usage", 60.0)]);
    assert_eq!(h.active_chain(), [cli, usage]);

    println!("== Wheel ==");
    h.on_user_input(InputSignals::WHEEL);
    assert_eq!(h.mode(), ScrollMode::Observing);
    h.on_intersections(&[report("usage", 66.0)]);
    println!("  active {:?}", h.host().active);
    assert_eq!(h.active_chain(), [usage]);
    // Subscribed at init and again on resume, both with the 900px zone.
    assert_eq!(h.observer().backend().margins, ["-72.0px 0px -45.0% 0px"; 2]);

    println!("== Teardown ==");
    h.teardown();
    assert!(h.host().active.is_empty());
    assert_eq!(h.host().scrolled_to, ["-cli"]);
}
