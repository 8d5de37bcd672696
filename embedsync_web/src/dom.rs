// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading navigation markup and content sections out of the DOM.

use embedsync_toc::types::{HeadingLevel, NavNode, Section, SectionLookup};
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Node};

use crate::anchor::decode_fragment;

/// The navigation tree together with the link element of every entry.
///
/// `links[i]` belongs to the entry with index `i`: both are assigned in the same pre-order.
#[derive(Debug)]
pub(crate) struct NavMarkup {
    pub(crate) tree: Vec<NavNode>,
    pub(crate) links: Vec<Element>,
}

impl NavMarkup {
    /// Read the nested `ul > li > a` lists under `container`.
    pub(crate) fn read(container: &Element) -> Self {
        let mut links = Vec::new();
        let tree = if is_list(container) {
            list_items(container, &mut links)
        } else {
            let mut tree = Vec::new();
            for list in children(container).filter(is_list) {
                tree.extend(list_items(&list, &mut links));
            }
            tree
        };
        Self { tree, links }
    }
}

fn list_items(list: &Element, links: &mut Vec<Element>) -> Vec<NavNode> {
    children(list)
        .filter(|el| el.tag_name().eq_ignore_ascii_case("li"))
        .map(|li| item(&li, links))
        .collect()
}

fn item(li: &Element, links: &mut Vec<Element>) -> NavNode {
    // The link is recorded before descending so `links` stays in entry order.
    let link = children(li).find(|el| el.tag_name().eq_ignore_ascii_case("a"));
    let href = link
        .as_ref()
        .and_then(|a| a.get_attribute("href"))
        .map(|href| decode_fragment(&href).into_owned());
    if let (Some(a), Some(_)) = (link, &href) {
        links.push(a);
    }
    let mut nested = Vec::new();
    for list in children(li).filter(is_list) {
        nested.extend(list_items(&list, links));
    }
    NavNode {
        href,
        children: nested,
    }
}

fn is_list(el: &Element) -> bool {
    let tag = el.tag_name();
    tag.eq_ignore_ascii_case("ul") || tag.eq_ignore_ascii_case("ol")
}

/// Element children of `el` in document order.
pub(crate) fn children(el: &Element) -> impl Iterator<Item = Element> {
    let collection = el.children();
    (0..collection.length()).filter_map(move |i| collection.item(i))
}

/// Resolves section ids to elements inside the content host.
#[derive(Debug)]
pub(crate) struct DomSections<'a> {
    pub(crate) document: &'a Document,
    pub(crate) content: &'a Element,
}

impl SectionLookup for DomSections<'_> {
    fn lookup(&self, id: &str) -> Option<Section> {
        let el = self.document.get_element_by_id(id)?;
        let node: &Node = &el;
        if !self.content.contains(Some(node)) {
            return None;
        }
        Some(Section {
            level: heading_level(&el),
        })
    }
}

/// The element's own heading level, or that of its first direct heading child.
fn heading_level(el: &Element) -> Option<HeadingLevel> {
    HeadingLevel::from_tag(&el.tag_name())
        .or_else(|| children(el).find_map(|child| HeadingLevel::from_tag(&child.tag_name())))
}

/// Read `data[name]` as a string. Non-objects and non-string values give `None`.
pub(crate) fn string_field(data: &JsValue, name: &str) -> Option<String> {
    if !data.is_object() {
        return None;
    }
    Reflect::get(data, &JsValue::from_str(name)).ok()?.as_string()
}

/// Human-readable form of a thrown value.
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| string_field(value, "message"))
        .unwrap_or_else(|| format!("{value:?}"))
}
