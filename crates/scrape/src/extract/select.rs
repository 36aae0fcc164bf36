// ABOUTME: Structural lookup utilities for locating stat fields inside a parsed profile page.
// ABOUTME: Supports class/title anchors, ancestor and descendant hops, and document-order following matches.

//! Structural field location over a parsed document tree.
//!
//! Every lookup here returns `Option`: a missing node at any step of a
//! chain short-circuits that one field to its default and never fails the
//! surrounding parse.
//!
//! The "next element after an anchor" lookups ([`next_matching`],
//! [`stat_value`]) are a positional contract with tracker.gg's markup, not
//! a semantic one: they take the first element of the wanted kind that
//! follows the anchor in document order. When the site reorders its layout
//! these are the definitions that need updating, not parser control flow.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};

/// Normalizes whitespace in a string by collapsing runs of whitespace into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized inner text of an element.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

/// Trimmed attribute value of an element, `None` when absent or empty.
pub fn attr_of(el: ElementRef<'_>, name: &str) -> Option<String> {
    let value = el.value().attr(name)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// First element in document order matching a CSS selector.
pub fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector).next()
}

/// All elements in document order matching a CSS selector.
pub fn select_each<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => doc.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// First element with the given tag and an exact `title` attribute.
pub fn find_titled<'a>(doc: &'a Html, tag: &str, title: &str) -> Option<ElementRef<'a>> {
    select_first(doc, &format!("{}[title=\"{}\"]", tag, title))
}

/// First element matching a CSS selector whose visible text equals `text`.
pub fn find_text<'a>(doc: &'a Html, css: &str, text: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector).find(|el| text_of(*el) == text)
}

/// First descendant of `anchor` matching a CSS selector.
pub fn descendant<'a>(anchor: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    anchor.select(&selector).next()
}

/// All descendants of `anchor` matching a CSS selector, in document order.
pub fn descendant_each<'a>(anchor: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => anchor.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Nearest ancestor of `anchor` with the given tag and class.
pub fn ancestor<'a>(anchor: ElementRef<'a>, tag: &str, class: &str) -> Option<ElementRef<'a>> {
    anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| matches_tag_class(*el, tag, class))
}

/// The next node after `node` in pre-order document traversal.
fn next_in_document<'a>(node: NodeRef<'a, Node>) -> Option<NodeRef<'a, Node>> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }
    let mut cur = node;
    loop {
        if let Some(sibling) = cur.next_sibling() {
            return Some(sibling);
        }
        cur = cur.parent()?;
    }
}

fn matches_tag_class(el: ElementRef<'_>, tag: &str, class: &str) -> bool {
    el.value().name() == tag && el.value().classes().any(|c| c == class)
}

/// First element after `anchor` in document order with the given tag and class.
///
/// The anchor's own descendants count as "after": the walk continues the
/// pre-order traversal from the anchor's start tag.
pub fn next_matching<'a>(
    anchor: ElementRef<'a>,
    tag: &str,
    class: &str,
) -> Option<ElementRef<'a>> {
    let mut cursor = next_in_document(*anchor);
    while let Some(node) = cursor {
        if let Some(el) = ElementRef::wrap(node) {
            if matches_tag_class(el, tag, class) {
                return Some(el);
            }
        }
        cursor = next_in_document(node);
    }
    None
}

/// Text of the `span.value` that follows the stat label with the given
/// `title` attribute. This is the composite lookup behind every field in
/// the profile stat panels.
pub fn stat_value(doc: &Html, title: &str) -> Option<String> {
    let label = find_titled(doc, "span", title)?;
    let value = next_matching(label, "span", "value")?;
    Some(text_of(value))
}
