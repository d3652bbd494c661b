//! Slide and fragment navigation over a deck document.
//!
//! The controller owns a `(slide, fragment)` pair and projects it onto the
//! document as marker classes. Slides are the `.slide` descendants of the
//! `#deck` element; fragments are descendants of a slide carrying a numeric
//! `data-fragment-order`, revealed in ascending order.

use serde::Serialize;

use crate::document::{Document, NodeId};
use crate::location::{self, Location};

pub const DECK_ID: &str = "deck";
pub const SLIDE_CLASS: &str = "slide";
pub const FRAGMENT_ORDER_ATTR: &str = "data-fragment-order";

pub const ACTIVE_CLASS: &str = "is-active";
pub const BEFORE_CLASS: &str = "is-before";
pub const AFTER_CLASS: &str = "is-after";
pub const HIDDEN_CLASS: &str = "is-hidden";

/// Which slide is shown and how many of its fragments are revealed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub slide: usize,
    /// Index of the last revealed fragment, `None` when nothing is revealed.
    pub fragment: Option<usize>,
}

impl NavigationState {
    /// Fragment position as it appears in a location string, `-1` for none.
    pub fn fragment_index(&self) -> i64 {
        self.fragment.map_or(-1, |f| f as i64)
    }
}

#[derive(Debug, Clone)]
struct SlideEntry {
    node: NodeId,
    fragments: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct PresentationController {
    deck: NodeId,
    slides: Vec<SlideEntry>,
    state: NavigationState,
}

pub fn clamp<T: Ord>(value: T, min: T, max: T) -> T {
    value.max(min).min(max)
}

impl PresentationController {
    /// Capture the slides of the document's deck. Returns `None` when the
    /// document has no `#deck` element or the deck has no slides.
    pub fn attach(document: &Document) -> Option<Self> {
        let Some(deck) = document.element_by_id(DECK_ID) else {
            log::debug!("no #{DECK_ID} element, not attaching");
            return None;
        };
        let slides: Vec<SlideEntry> = document
            .descendants_with_class(deck, SLIDE_CLASS)
            .into_iter()
            .map(|node| SlideEntry {
                node,
                fragments: sorted_fragments(document, node),
            })
            .collect();
        if slides.is_empty() {
            log::debug!("#{DECK_ID} has no .{SLIDE_CLASS} elements, not attaching");
            return None;
        }
        log::debug!(
            "attached to deck with {} slides, {} fragments",
            slides.len(),
            slides.iter().map(|s| s.fragments.len()).sum::<usize>()
        );
        Some(Self {
            deck,
            slides,
            state: NavigationState::default(),
        })
    }

    pub fn deck(&self) -> NodeId {
        self.deck
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_node(&self, slide: usize) -> Option<NodeId> {
        self.slides.get(slide).map(|s| s.node)
    }

    /// Fragments of `slide` in reveal order. Empty for an unknown slide.
    pub fn fragments_of(&self, slide: usize) -> &[NodeId] {
        self.slides
            .get(slide)
            .map_or(&[], |s| s.fragments.as_slice())
    }

    /// Project the current state onto the document's marker classes.
    pub fn render(&self, document: &mut Document) {
        let current = self.state.slide;
        for (index, slide) in self.slides.iter().enumerate() {
            document.toggle_class(slide.node, ACTIVE_CLASS, index == current);
            document.toggle_class(slide.node, BEFORE_CLASS, index < current);
            document.toggle_class(slide.node, AFTER_CLASS, index > current);
        }
        for (index, &fragment) in self.fragments_of(current).iter().enumerate() {
            let hidden = self.state.fragment.is_none_or(|revealed| index > revealed);
            document.toggle_class(fragment, HIDDEN_CLASS, hidden);
        }
    }

    /// Write the canonical location for the current state. Returns whether
    /// the location changed.
    pub fn serialize_to_location(&self, location: &mut Location) -> bool {
        location.set_hash(&location::format(self.state))
    }

    /// Adopt the state addressed by the location, clamped to this deck, and
    /// render. A malformed location keeps the current state.
    pub fn apply_from_location(&mut self, document: &mut Document, location: &Location) {
        match location::parse(location.hash()) {
            Some(address) => {
                let slide = clamp(address.slide, 0, self.slides.len() - 1);
                let last = self.fragments_of(slide).len() as i64 - 1;
                let fragment = clamp(address.fragment.unwrap_or(-1), -1, last);
                self.state = NavigationState {
                    slide,
                    fragment: usize::try_from(fragment).ok(),
                };
            }
            None => log::debug!("ignoring malformed location {:?}", location.hash()),
        }
        self.render(document);
    }

    /// Reveal the next fragment, or move to the start of the next slide.
    /// Returns false at the last fragment of the last slide.
    pub fn next(&mut self, document: &mut Document, location: &mut Location) -> bool {
        let NavigationState { slide, fragment } = self.state;
        let upcoming = fragment.map_or(0, |f| f + 1);
        if upcoming < self.fragments_of(slide).len() {
            self.state.fragment = Some(upcoming);
        } else if slide + 1 < self.slides.len() {
            self.state = NavigationState {
                slide: slide + 1,
                fragment: None,
            };
        } else {
            return false;
        }
        self.commit(document, location);
        true
    }

    /// Hide the last revealed fragment, or move to the previous slide with
    /// all of its fragments revealed. Returns false at the very start.
    pub fn prev(&mut self, document: &mut Document, location: &mut Location) -> bool {
        let NavigationState { slide, fragment } = self.state;
        if let Some(revealed) = fragment {
            self.state.fragment = revealed.checked_sub(1);
        } else if slide > 0 {
            let previous = slide - 1;
            self.state = NavigationState {
                slide: previous,
                fragment: self.fragments_of(previous).len().checked_sub(1),
            };
        } else {
            return false;
        }
        self.commit(document, location);
        true
    }

    fn commit(&self, document: &mut Document, location: &mut Location) {
        log::debug!(
            "slide {} fragment {}",
            self.state.slide,
            self.state.fragment_index()
        );
        self.render(document);
        self.serialize_to_location(location);
    }
}

/// Fragment elements of a slide, ordered by their numeric order attribute.
/// Equal orders keep document order. A value that is not a number counts
/// as 0.
fn sorted_fragments(document: &Document, slide: NodeId) -> Vec<NodeId> {
    let mut keyed: Vec<(f64, NodeId)> = document
        .descendants_with_attr(slide, FRAGMENT_ORDER_ATTR)
        .into_iter()
        .map(|node| {
            let raw = document.attr(node, FRAGMENT_ORDER_ATTR).unwrap_or_default();
            let order = parse_order(raw).unwrap_or_else(|| {
                log::debug!("fragment order {raw:?} is not a number, using 0");
                0.0
            });
            (order, node)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, node)| node).collect()
}

/// Reads an order value the way JavaScript's `Number()` reads a string:
/// blank is 0, `0x`/`0o`/`0b` prefixes select a radix, and only the exact
/// spelling `Infinity` is infinite. `None` stands for NaN.
fn parse_order(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => 10,
    };
    if radix != 10 {
        let digits = &trimmed[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix)
                .map(|d| acc * f64::from(radix) + f64::from(d))
        });
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rules out Rust-only spellings such as `inf` and `NaN`.
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A deck whose slides carry fragments with the given order values.
    fn deck(slides: &[&[&str]]) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        let deck = doc.append_element(root, "main", &[("id", DECK_ID)]);
        for orders in slides {
            let slide = doc.append_element(deck, "section", &[("class", SLIDE_CLASS)]);
            let list = doc.append_element(slide, "ul", &[]);
            for &order in orders.iter() {
                let item = doc.append_element(
                    list,
                    "li",
                    &[("class", "fragment"), (FRAGMENT_ORDER_ATTR, order)],
                );
                doc.append_text(item, order);
            }
        }
        doc
    }

    fn deck_with_counts(counts: &[usize]) -> Document {
        let orders: Vec<Vec<String>> = counts
            .iter()
            .map(|&n| (1..=n).map(|i| i.to_string()).collect())
            .collect();
        let refs: Vec<Vec<&str>> = orders
            .iter()
            .map(|o| o.iter().map(String::as_str).collect())
            .collect();
        let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();
        deck(&slices)
    }

    fn state(slide: usize, fragment: i64) -> NavigationState {
        NavigationState {
            slide,
            fragment: usize::try_from(fragment).ok(),
        }
    }

    fn at(controller: &mut PresentationController, doc: &mut Document, hash: &str) {
        controller.apply_from_location(doc, &Location::new(hash));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-4, -1, 3), -1);
        assert_eq!(clamp(2, 0, 3), 2);
    }

    #[test]
    fn test_attach_requires_deck() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_element(root, "section", &[("class", SLIDE_CLASS)]);
        assert!(PresentationController::attach(&doc).is_none());
    }

    #[test]
    fn test_attach_requires_slides() {
        assert!(PresentationController::attach(&deck(&[])).is_none());
    }

    #[test]
    fn test_fragments_sorted_numerically() {
        let doc = deck(&[&["10", "2", "1"]]);
        let controller = PresentationController::attach(&doc).unwrap();
        let labels: Vec<String> = controller
            .fragments_of(0)
            .iter()
            .map(|&n| doc.text_content(n))
            .collect();
        assert_eq!(labels, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_fragment_ties_keep_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let deck = doc.append_element(root, "main", &[("id", DECK_ID)]);
        let slide = doc.append_element(deck, "section", &[("class", SLIDE_CLASS)]);
        let a = doc.append_element(slide, "p", &[(FRAGMENT_ORDER_ATTR, "2")]);
        let b = doc.append_element(slide, "p", &[(FRAGMENT_ORDER_ATTR, "1")]);
        let c = doc.append_element(slide, "p", &[(FRAGMENT_ORDER_ATTR, "2")]);
        let controller = PresentationController::attach(&doc).unwrap();
        assert_eq!(controller.fragments_of(0), &[b, a, c]);
    }

    #[test]
    fn test_non_numeric_order_counts_as_zero() {
        let doc = deck(&[&["3", "abc", "-1.5", ""]]);
        let controller = PresentationController::attach(&doc).unwrap();
        let labels: Vec<String> = controller
            .fragments_of(0)
            .iter()
            .map(|&n| doc.text_content(n))
            .collect();
        assert_eq!(labels, vec!["-1.5", "abc", "", "3"]);
    }

    #[test]
    fn test_order_values_read_like_js_numbers() {
        assert_eq!(parse_order(" 2.5 "), Some(2.5));
        assert_eq!(parse_order(""), Some(0.0));
        assert_eq!(parse_order("1e2"), Some(100.0));
        assert_eq!(parse_order(".5"), Some(0.5));
        assert_eq!(parse_order("0x10"), Some(16.0));
        assert_eq!(parse_order("0b11"), Some(3.0));
        assert_eq!(parse_order("0o17"), Some(15.0));
        assert_eq!(parse_order("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_order("-Infinity"), Some(f64::NEG_INFINITY));
        for nan in ["inf", "infinity", "NaN", "-0x10", "0x", "0xg", "1_000", "."] {
            assert_eq!(parse_order(nan), None, "{nan:?}");
        }
    }

    #[test]
    fn test_hex_and_word_orders_sort_as_numbers() {
        let doc = deck(&[&["20", "0x10", "inf", "Infinity"]]);
        let controller = PresentationController::attach(&doc).unwrap();
        let labels: Vec<String> = controller
            .fragments_of(0)
            .iter()
            .map(|&n| doc.text_content(n))
            .collect();
        assert_eq!(labels, vec!["inf", "0x10", "20", "Infinity"]);
    }

    #[test]
    fn test_fragments_of_unknown_slide_is_empty() {
        let doc = deck_with_counts(&[2]);
        let controller = PresentationController::attach(&doc).unwrap();
        assert!(controller.fragments_of(7).is_empty());
    }

    #[test]
    fn test_render_marks_slides() {
        let mut doc = deck_with_counts(&[0, 0, 0]);
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/1");
        let marks: Vec<(bool, bool, bool)> = (0..3)
            .map(|i| {
                let node = controller.slide_node(i).unwrap();
                (
                    doc.has_class(node, BEFORE_CLASS),
                    doc.has_class(node, ACTIVE_CLASS),
                    doc.has_class(node, AFTER_CLASS),
                )
            })
            .collect();
        assert_eq!(
            marks,
            vec![(true, false, false), (false, true, false), (false, false, true)]
        );
    }

    #[test]
    fn test_render_hides_unrevealed_fragments() {
        let mut doc = deck_with_counts(&[3]);
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/0/1");
        let hidden: Vec<bool> = controller
            .fragments_of(0)
            .iter()
            .map(|&n| doc.has_class(n, HIDDEN_CLASS))
            .collect();
        assert_eq!(hidden, vec![false, false, true]);

        at(&mut controller, &mut doc, "#/0/-1");
        assert!(
            controller
                .fragments_of(0)
                .iter()
                .all(|&n| doc.has_class(n, HIDDEN_CLASS))
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut doc = deck_with_counts(&[1, 2]);
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/1/0");
        let snapshot = format!("{doc:?}");
        controller.render(&mut doc);
        assert_eq!(format!("{doc:?}"), snapshot);
    }

    #[test]
    fn test_render_leaves_inactive_slide_fragments_alone() {
        let mut doc = deck_with_counts(&[2, 1]);
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/0/1");
        at(&mut controller, &mut doc, "#/1/-1");
        // Slide 0 keeps whatever it showed when it was last active.
        assert!(
            controller
                .fragments_of(0)
                .iter()
                .all(|&n| !doc.has_class(n, HIDDEN_CLASS))
        );
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut doc = deck_with_counts(&[0, 1, 2]);
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/2/1");
        assert_eq!(controller.state(), state(2, 1));

        let mut location = Location::default();
        assert!(controller.serialize_to_location(&mut location));
        assert_eq!(location.hash(), "#/2/1");
        assert!(!controller.serialize_to_location(&mut location));

        controller.apply_from_location(&mut doc, &location);
        assert_eq!(controller.state(), state(2, 1));
    }

    #[test]
    fn test_malformed_location_keeps_state() {
        let mut doc = deck_with_counts(&[0, 2]);
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/1/0");
        for bad in ["#/abc", "#nope", "", "#/1/x"] {
            at(&mut controller, &mut doc, bad);
            assert_eq!(controller.state(), state(1, 0), "{bad:?}");
        }
    }

    #[test]
    fn test_malformed_location_still_renders() {
        let mut doc = deck_with_counts(&[0, 0]);
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#nope");
        let first = controller.slide_node(0).unwrap();
        assert!(doc.has_class(first, ACTIVE_CLASS));
    }

    #[test]
    fn test_out_of_range_location_clamps() {
        let mut doc = deck_with_counts(&[0, 2, 0]);
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/99/0");
        assert_eq!(controller.state(), state(2, -1));
        at(&mut controller, &mut doc, "#/1/50");
        assert_eq!(controller.state(), state(1, 1));
        at(&mut controller, &mut doc, "#/1/-9");
        assert_eq!(controller.state(), state(1, -1));
        at(&mut controller, &mut doc, "#/1");
        assert_eq!(controller.state(), state(1, -1));
    }

    #[test]
    fn test_fragment_clamped_against_resolved_slide() {
        let mut doc = deck_with_counts(&[5, 1]);
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/40/3");
        assert_eq!(controller.state(), state(1, 0));
    }

    #[test]
    fn test_next_walks_fragments_then_slides() {
        let mut doc = deck_with_counts(&[0, 2]);
        let mut location = Location::default();
        let mut controller = PresentationController::attach(&doc).unwrap();
        assert_eq!(controller.state(), state(0, -1));

        let mut seen = Vec::new();
        for _ in 0..4 {
            let moved = controller.next(&mut doc, &mut location);
            seen.push((moved, controller.state(), location.hash().to_string()));
        }
        assert_eq!(
            seen,
            vec![
                (true, state(1, -1), "#/1/-1".to_string()),
                (true, state(1, 0), "#/1/0".to_string()),
                (true, state(1, 1), "#/1/1".to_string()),
                (false, state(1, 1), "#/1/1".to_string()),
            ]
        );
    }

    #[test]
    fn test_prev_enters_previous_slide_fully_revealed() {
        let mut doc = deck_with_counts(&[3, 0, 0]);
        let mut location = Location::default();
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/2");

        assert!(controller.prev(&mut doc, &mut location));
        assert_eq!(controller.state(), state(1, -1));
        assert!(controller.prev(&mut doc, &mut location));
        assert_eq!(controller.state(), state(0, 2));
        assert_eq!(location.hash(), "#/0/2");
        assert!(
            controller
                .fragments_of(0)
                .iter()
                .all(|&n| !doc.has_class(n, HIDDEN_CLASS))
        );
    }

    #[test]
    fn test_prev_hides_fragments_then_stops() {
        let mut doc = deck_with_counts(&[2]);
        let mut location = Location::default();
        let mut controller = PresentationController::attach(&doc).unwrap();
        at(&mut controller, &mut doc, "#/0/1");

        assert!(controller.prev(&mut doc, &mut location));
        assert_eq!(controller.state(), state(0, 0));
        assert!(controller.prev(&mut doc, &mut location));
        assert_eq!(controller.state(), state(0, -1));
        assert!(!controller.prev(&mut doc, &mut location));
        assert_eq!(controller.state(), state(0, -1));
        assert_eq!(location.hash(), "#/0/-1");
    }

    #[test]
    fn test_no_op_does_not_touch_location() {
        let mut doc = deck_with_counts(&[0]);
        let mut location = Location::default();
        let mut controller = PresentationController::attach(&doc).unwrap();
        assert!(!controller.next(&mut doc, &mut location));
        assert!(!controller.prev(&mut doc, &mut location));
        assert_eq!(location.hash(), "");
        assert!(!location.take_change());
    }

    #[derive(Debug, Clone)]
    enum Step {
        Next,
        Prev,
        Goto(usize, i64),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::Next),
            Just(Step::Prev),
            (0usize..12, -3i64..8).prop_map(|(s, f)| Step::Goto(s, f)),
        ]
    }

    proptest! {
        #[test]
        fn prop_state_stays_in_range(
            counts in prop::collection::vec(0usize..4, 1..6),
            steps in prop::collection::vec(step(), 0..40),
        ) {
            let mut doc = deck_with_counts(&counts);
            let mut location = Location::default();
            let mut controller = PresentationController::attach(&doc).unwrap();
            for step in steps {
                match step {
                    Step::Next => { controller.next(&mut doc, &mut location); }
                    Step::Prev => { controller.prev(&mut doc, &mut location); }
                    Step::Goto(s, f) => at(&mut controller, &mut doc, &format!("#/{s}/{f}")),
                }
                let current = controller.state();
                prop_assert!(current.slide < counts.len());
                let count = counts[current.slide];
                prop_assert!(current.fragment.is_none_or(|f| f < count));
            }
        }

        #[test]
        fn prop_next_then_prev_restores_state(
            counts in prop::collection::vec(0usize..4, 1..6),
            slide in 0usize..6,
            fragment in -1i64..4,
        ) {
            let mut doc = deck_with_counts(&counts);
            let mut location = Location::default();
            let mut controller = PresentationController::attach(&doc).unwrap();
            at(&mut controller, &mut doc, &format!("#/{slide}/{fragment}"));
            let before = controller.state();
            if controller.next(&mut doc, &mut location) {
                prop_assert!(controller.prev(&mut doc, &mut location));
                prop_assert_eq!(controller.state(), before);
            } else {
                prop_assert_eq!(before.slide, counts.len() - 1);
            }
        }

        #[test]
        fn prop_location_round_trip(
            counts in prop::collection::vec(0usize..4, 1..6),
            slide in 0usize..6,
            fragment in -1i64..4,
        ) {
            let mut doc = deck_with_counts(&counts);
            let mut controller = PresentationController::attach(&doc).unwrap();
            at(&mut controller, &mut doc, &format!("#/{slide}/{fragment}"));
            let before = controller.state();
            let mut location = Location::default();
            controller.serialize_to_location(&mut location);
            controller.apply_from_location(&mut doc, &location);
            prop_assert_eq!(controller.state(), before);
        }
    }
}
