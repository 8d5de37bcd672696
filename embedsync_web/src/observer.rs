// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `IntersectionObserver` visibility backend.

use embedsync_toc::observer::VisibilityBackend;
use embedsync_toc::visibility::Intersection;
use embedsync_toc::zone::ActiveZone;
use js_sys::Array;
use kurbo::Rect;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::describe;

/// Visible-ratio steps at which the observer reports, so tall sections keep reporting while
/// they move through the zone.
const THRESHOLDS: [f64; 11] = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

/// Callback receiving every batch of intersection entries.
pub(crate) type IntersectionCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Creates one observer per `connect` and drops it on `disconnect`.
#[derive(Debug)]
pub(crate) struct DomObserver {
    document: Document,
    callback: IntersectionCallback,
    live: Option<IntersectionObserver>,
}

impl DomObserver {
    pub(crate) fn new(document: Document, callback: IntersectionCallback) -> Self {
        Self {
            document,
            callback,
            live: None,
        }
    }
}

impl VisibilityBackend for DomObserver {
    fn connect(&mut self, zone: &ActiveZone, sections: &[String]) {
        self.disconnect();
        let init = IntersectionObserverInit::new();
        init.set_root_margin(&zone.root_margin());
        let thresholds: Array = THRESHOLDS.iter().copied().map(JsValue::from_f64).collect();
        init.set_threshold(&thresholds);
        let observer =
            match IntersectionObserver::new_with_options(self.callback.as_ref().unchecked_ref(), &init) {
                Ok(observer) => observer,
                Err(err) => {
                    warn!(err = %describe(&err), "could not create intersection observer");
                    return;
                }
            };
        for id in sections {
            if let Some(el) = self.document.get_element_by_id(id) {
                observer.observe(&el);
            }
        }
        self.live = Some(observer);
    }

    fn disconnect(&mut self) {
        if let Some(observer) = self.live.take() {
            observer.disconnect();
        }
    }

    fn section_top(&self, section: &str) -> Option<f64> {
        let el = self.document.get_element_by_id(section)?;
        Some(el.get_bounding_client_rect().top())
    }
}

/// Convert a batch of entries into visibility reports.
pub(crate) fn read_entries(entries: &Array) -> Vec<Intersection> {
    entries
        .iter()
        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
        .map(|entry| {
            let r = entry.bounding_client_rect();
            Intersection {
                section: entry.target().id(),
                bounds: Rect::new(r.x(), r.y(), r.x() + r.width(), r.y() + r.height()),
                intersecting: entry.is_intersecting(),
            }
        })
        .collect()
}
