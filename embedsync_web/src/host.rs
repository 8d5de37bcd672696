// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM implementations of the theme sink and the TOC host.

use embedsync_channel::theme::{PersistError, ThemeSink};
use embedsync_toc::chain::EntryMarker;
use embedsync_toc::highlighter::TocHost;
use embedsync_toc::types::EntryId;
use tracing::{debug, warn};
use wasm_bindgen::JsValue;
use web_sys::{
    Document, Element, History, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Storage,
};

use crate::dom::describe;

/// Writes theme attributes on the root element and persists to `localStorage`.
#[derive(Debug)]
pub(crate) struct DomThemeSink {
    root: Element,
    storage: Option<Storage>,
}

impl DomThemeSink {
    pub(crate) fn new(root: Element, storage: Option<Storage>) -> Self {
        Self { root, storage }
    }
}

impl ThemeSink for DomThemeSink {
    fn set_attribute(&mut self, name: &str, value: &str) {
        if let Err(err) = self.root.set_attribute(name, value) {
            warn!(name, err = %describe(&err), "could not set theme attribute");
        }
    }

    fn persist(&mut self, key: &'static str, value: &str) -> Result<(), PersistError> {
        let Some(storage) = &self.storage else {
            return Err(PersistError {
                key,
                reason: "localStorage unavailable".into(),
            });
        };
        storage.set_item(key, value).map_err(|err| PersistError {
            key,
            reason: describe(&err),
        })
    }
}

/// Marks navigation entries and scrolls the document.
#[derive(Debug)]
pub(crate) struct DomToc {
    document: Document,
    links: Vec<Element>,
    active_class: String,
    history: Option<History>,
}

impl DomToc {
    pub(crate) fn new(
        document: Document,
        links: Vec<Element>,
        active_class: String,
        history: Option<History>,
    ) -> Self {
        Self {
            document,
            links,
            active_class,
            history,
        }
    }

    fn toggle(&self, el: &Element, active: bool) {
        if let Err(err) = el
            .class_list()
            .toggle_with_force(&self.active_class, active)
        {
            warn!(err = %describe(&err), "could not toggle active class");
        }
    }
}

impl EntryMarker for DomToc {
    fn set_active(&mut self, entry: EntryId, active: bool) {
        let Some(link) = self.links.get(entry.index()) else {
            return;
        };
        self.toggle(link, active);
        if let Ok(Some(item)) = link.closest("li") {
            self.toggle(&item, active);
        }
    }
}

impl TocHost for DomToc {
    fn scroll_to(&mut self, section: &str) {
        let Some(target) = self.document.get_element_by_id(section) else {
            debug!(section, "scroll target vanished");
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        target.scroll_into_view_with_scroll_into_view_options(&options);
        if let Some(history) = &self.history {
            let hash = format!("#{section}");
            if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(&hash)) {
                debug!(err = %describe(&err), "could not update location hash");
            }
        }
    }
}
