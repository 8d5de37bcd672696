// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page wire-up and teardown.
//!
//! Every listener and timer installed here is owned by [`Runtime`] and released when it is torn
//! down or dropped. Shared state lives in one `Rc<RefCell<_>>` per concern; callbacks that find it
//! borrowed drop their event instead of panicking.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use embedsync_channel::gateway::Gateway;
use embedsync_channel::message::RawMessage;
use embedsync_channel::origin::TrustedOrigins;
use embedsync_channel::theme::ThemeStore;
use embedsync_toc::arbiter::{InputSignals, ScrollArbiter};
use embedsync_toc::debounce::PendingToken;
use embedsync_toc::highlighter::{Highlighter, Setup};
use embedsync_toc::index::SectionIndex;
use embedsync_toc::types::anchor_from_href;
use js_sys::{Array, Function};
use tracing::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, IntersectionObserver,
    MessageEvent, Window,
};

use crate::anchor::decode_fragment;
use crate::config::{CONFIG_ELEMENT_ID, Config};
use crate::dom::{DomSections, NavMarkup, describe, string_field};
use crate::embed;
use crate::error::WebError;
use crate::host::{DomThemeSink, DomToc};
use crate::observer::{DomObserver, IntersectionCallback, read_entries};

type DomHighlighter = Highlighter<DomObserver, DomToc>;

const INPUT_EVENTS: [(&str, InputSignals); 4] = [
    ("pointerdown", InputSignals::POINTER),
    ("keydown", InputSignals::KEY),
    ("wheel", InputSignals::WHEEL),
    ("touchstart", InputSignals::TOUCH),
];

/// The wired-up page.
#[derive(Debug, Default)]
pub struct Runtime {
    attached: Option<Attached>,
}

impl Runtime {
    /// Wire the current page.
    ///
    /// Never fails: a standalone page, a page that is already wired, or a DOM failure all leave
    /// the page untouched and yield a detached runtime.
    pub fn attach() -> Self {
        match Attached::install() {
            Ok(attached) => Self { attached },
            Err(err) => {
                warn!(%err, "embedsync not attached");
                Self::default()
            }
        }
    }

    /// Returns `true` while listeners are installed.
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Remove every listener, disconnect the observer, and clear pending timers.
    pub fn teardown(&mut self) {
        if let Some(mut attached) = self.attached.take() {
            attached.teardown();
        }
    }
}

#[derive(Debug)]
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn install(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, WebError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    fn remove(self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            debug!(kind = self.kind, err = %describe(&err), "could not remove listener");
        }
    }
}

#[derive(Debug)]
struct Attached {
    window: Window,
    root: Element,
    listeners: Vec<Listener>,
    highlighter: Option<Rc<RefCell<DomHighlighter>>>,
    timer: Rc<Cell<Option<i32>>>,
    settle: Option<Closure<dyn FnMut()>>,
}

impl Attached {
    fn install() -> Result<Option<Self>, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let root = document.document_element().ok_or(WebError::NoDocument)?;

        let script = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());
        let config = Config::from_page(script.as_deref());
        log::set_max_level(log::Level::from(config.log_level).to_level_filter());

        if !embed::is_embedded(&window) {
            info!("standalone page; leaving it untouched");
            return Ok(None);
        }
        if !embed::claim(&root) {
            debug!("page already wired");
            return Ok(None);
        }

        let mut attached = Self {
            window,
            root,
            listeners: Vec::new(),
            highlighter: None,
            timer: Rc::default(),
            settle: None,
        };
        // On error `attached` is dropped, which releases whatever was installed.
        attached.wire_channel(&document, &config)?;
        attached.wire_highlighter(&document, &config)?;
        info!("embedsync attached");
        Ok(Some(attached))
    }

    fn wire_channel(&mut self, document: &Document, config: &Config) -> Result<(), WebError> {
        let origins = config.trusted().unwrap_or_else(|err| {
            warn!(%err, "invalid trusted origins; trusting none");
            TrustedOrigins::empty()
        });
        if origins.is_empty() {
            warn!("no trusted origins; theme messages will be rejected");
        }
        let storage = self.window.local_storage().ok().flatten();
        let sink = DomThemeSink::new(self.root.clone(), storage);
        let mut gateway = Gateway::new(origins, ThemeStore::new(sink));

        self.listeners.push(Listener::install(
            &self.window,
            "message",
            true,
            move |event: Event| {
                let Some(message) = event.dyn_ref::<MessageEvent>() else {
                    return;
                };
                let data = message.data();
                let kind = string_field(&data, "type");
                let theme = string_field(&data, "theme");
                let raw = RawMessage {
                    kind: kind.as_deref(),
                    theme: theme.as_deref(),
                };
                // The gateway logs its own rejections.
                let _ = gateway.handle(&raw, &message.origin());
            },
        )?);

        if let Some(body) = document.body() {
            for attribute in &config.default_highlighter_attributes {
                let _ = body.remove_attribute(attribute);
            }
        }
        Ok(())
    }

    fn wire_highlighter(&mut self, document: &Document, config: &Config) -> Result<(), WebError> {
        let Some(toc) = document.query_selector(&config.toc_selector)? else {
            info!(selector = %config.toc_selector, "no navigation container; highlighting off");
            return Ok(());
        };
        let Some(content) = document.query_selector(&config.content_selector)? else {
            info!(selector = %config.content_selector, "no content host; highlighting off");
            return Ok(());
        };

        let markup = NavMarkup::read(&toc);
        let index = SectionIndex::build(
            &markup.tree,
            &DomSections {
                document,
                content: &content,
            },
        );
        let host = DomToc::new(
            document.clone(),
            markup.links,
            config.active_class.clone(),
            self.window.history().ok(),
        );
        let observed = document.clone();
        let resume_on = config.resume_signals();
        let highlighter = Rc::new_cyclic(|weak: &Weak<RefCell<DomHighlighter>>| {
            let weak = weak.clone();
            let callback: IntersectionCallback =
                Closure::new(move |entries: Array, _: IntersectionObserver| {
                    let Some(cell) = weak.upgrade() else {
                        return;
                    };
                    let batch = read_entries(&entries);
                    if let Ok(mut h) = cell.try_borrow_mut() {
                        h.on_intersections(&batch);
                    }
                });
            RefCell::new(
                Highlighter::new(index, DomObserver::new(observed, callback), host)
                    .with_arbiter(ScrollArbiter::resuming_on(resume_on)),
            )
        });

        let setup = highlighter.borrow_mut().init(viewport_height(&self.window));
        match setup {
            Setup::Disabled => {
                info!("no observable sections; highlighting off");
                return Ok(());
            }
            Setup::Deferred => debug!("viewport has no height yet; waiting for a resize"),
            Setup::Observing | Setup::AlreadyInitialized => {}
        }

        let clicked = Rc::clone(&highlighter);
        self.listeners
            .push(Listener::install(&toc, "click", false, move |event: Event| {
                let Some(anchor) = clicked_anchor(&event) else {
                    return;
                };
                let handled = clicked
                    .try_borrow_mut()
                    .is_ok_and(|mut h| h.on_link_click(&anchor));
                if handled {
                    event.prevent_default();
                }
            })?);

        for (kind, signal) in INPUT_EVENTS {
            if !resume_on.contains(signal) {
                continue;
            }
            let input = Rc::clone(&highlighter);
            self.listeners
                .push(Listener::install(&self.window, kind, true, move |_: Event| {
                    if let Ok(mut h) = input.try_borrow_mut() {
                        h.on_user_input(signal);
                    }
                })?);
        }

        let scrolled = Rc::clone(&highlighter);
        self.listeners
            .push(Listener::install(&self.window, "scroll", true, move |_: Event| {
                if let Ok(mut h) = scrolled.try_borrow_mut() {
                    h.on_scroll();
                }
            })?);

        self.wire_resize(&highlighter, config.resize_debounce_ms)?;
        self.highlighter = Some(highlighter);
        Ok(())
    }

    /// Cancel-and-reschedule: every resize clears the previous timeout before setting a new one.
    fn wire_resize(
        &mut self,
        highlighter: &Rc<RefCell<DomHighlighter>>,
        delay_ms: u32,
    ) -> Result<(), WebError> {
        let pending: Rc<Cell<Option<PendingToken>>> = Rc::default();

        let settle = {
            let weak = Rc::downgrade(highlighter);
            let pending = Rc::clone(&pending);
            let timer = Rc::clone(&self.timer);
            Closure::<dyn FnMut()>::new(move || {
                timer.set(None);
                let (Some(token), Some(cell)) = (pending.take(), weak.upgrade()) else {
                    return;
                };
                if let Ok(mut h) = cell.try_borrow_mut() {
                    h.on_resize_settled(token);
                }
            })
        };
        let settle_fn: Function = settle.as_ref().unchecked_ref::<Function>().clone();
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);

        let resized = Rc::clone(highlighter);
        let timer = Rc::clone(&self.timer);
        let window = self.window.clone();
        self.listeners.push(Listener::install(
            &self.window,
            "resize",
            true,
            move |_: Event| {
                let height = viewport_height(&window);
                let Ok(mut h) = resized.try_borrow_mut() else {
                    return;
                };
                pending.set(Some(h.on_resize(height)));
                drop(h);
                if let Some(previous) = timer.take() {
                    window.clear_timeout_with_handle(previous);
                }
                match window.set_timeout_with_callback_and_timeout_and_arguments_0(&settle_fn, delay)
                {
                    Ok(handle) => timer.set(Some(handle)),
                    Err(err) => warn!(err = %describe(&err), "could not schedule zone recomputation"),
                }
            },
        )?);
        self.settle = Some(settle);
        Ok(())
    }

    fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.remove();
        }
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        self.settle = None;
        if let Some(cell) = self.highlighter.take() {
            match cell.try_borrow_mut() {
                Ok(mut h) => h.teardown(),
                Err(_) => warn!("highlighter busy during teardown"),
            }
        }
        embed::release(&self.root);
    }
}

impl Drop for Attached {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

fn clicked_anchor(event: &Event) -> Option<String> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let link = target.closest("a").ok()??;
    let href = link.get_attribute("href")?;
    let href = decode_fragment(&href);
    anchor_from_href(&href).map(String::from)
}
