//! HTML reading for built decks.
//!
//! Tokenizing and tree construction are done by `scraper` (html5ever), which
//! recovers from malformed markup the way a browser does. Only what the deck
//! contract needs is copied into the [`Document`] arena: elements, attributes
//! and text. Comments, doctype and processing instructions are dropped, and
//! the bodies of `<script>` and `<style>` are not kept as text.

use scraper::{Html, Node};

use super::Document;

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(super) fn parse(source: &str) -> Document {
    let html = Html::parse_document(source);
    if !html.errors.is_empty() {
        log::debug!("recovered from {} HTML parse errors", html.errors.len());
        for error in &html.errors {
            log::trace!("html: {error}");
        }
    }

    let mut document = Document::new();
    let root = document.root();
    let mut stack: Vec<_> = html
        .tree
        .root()
        .children()
        .rev()
        .map(|child| (child, root))
        .collect();

    while let Some((node, parent)) = stack.pop() {
        let id = match node.value() {
            Node::Element(element) => {
                let name = element.name().to_string();
                let attrs = element
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect();
                let raw_text = RAW_TEXT_ELEMENTS.contains(&name.as_str());
                let id = document.push_element(parent, name, attrs);
                if raw_text {
                    continue;
                }
                id
            }
            Node::Text(text) => {
                if !text.trim().is_empty() {
                    document.append_text(parent, text);
                }
                continue;
            }
            _ => continue,
        };
        stack.extend(node.children().rev().map(|child| (child, id)));
    }

    document
}
