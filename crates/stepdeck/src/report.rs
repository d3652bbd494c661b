//! Snapshots of a session for display.

use colored::Colorize;
use serde::Serialize;

use crate::controller::{ACTIVE_CLASS, AFTER_CLASS, BEFORE_CLASS, HIDDEN_CLASS};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideMarker {
    Before,
    Active,
    After,
    /// None of the marker classes are set.
    Unmarked,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// What triggered this report, e.g. `start` or `keydown ArrowRight`.
    pub event: String,
    pub slide: usize,
    /// `-1` when no fragment is revealed.
    pub fragment: i64,
    pub slide_count: usize,
    pub fragment_count: usize,
    pub location: String,
    /// Fragments of the current slide not carrying the hidden marker.
    pub visible_fragments: usize,
    pub title: String,
    pub markers: Vec<SlideMarker>,
}

impl Report {
    pub fn capture(session: &Session, event: impl Into<String>) -> Self {
        let state = session.state();
        let controller = session.controller();
        let document = session.document();
        let fragments = controller.fragments_of(state.slide);

        let markers = (0..controller.slide_count())
            .filter_map(|index| controller.slide_node(index))
            .map(|node| {
                if document.has_class(node, ACTIVE_CLASS) {
                    SlideMarker::Active
                } else if document.has_class(node, BEFORE_CLASS) {
                    SlideMarker::Before
                } else if document.has_class(node, AFTER_CLASS) {
                    SlideMarker::After
                } else {
                    SlideMarker::Unmarked
                }
            })
            .collect();

        let title = controller
            .slide_node(state.slide)
            .map(|node| slide_title(&document.text_content(node)))
            .unwrap_or_default();

        Self {
            event: event.into(),
            slide: state.slide,
            fragment: state.fragment_index(),
            slide_count: controller.slide_count(),
            fragment_count: fragments.len(),
            location: session.location().hash().to_string(),
            visible_fragments: fragments
                .iter()
                .filter(|&&node| !document.has_class(node, HIDDEN_CLASS))
                .count(),
            title,
            markers,
        }
    }

    /// One colored line, plus a marker strip when `markers` is set.
    pub fn to_text(&self, markers: bool) -> String {
        let position = format!("slide {}/{}", self.slide + 1, self.slide_count);
        let reveal = if self.fragment_count == 0 {
            "no fragments".dimmed().to_string()
        } else {
            format!("fragment {}/{}", self.fragment + 1, self.fragment_count)
        };
        let mut line = format!(
            "{:<24} {} {} {}",
            self.event.dimmed(),
            position.bold(),
            reveal,
            self.location.cyan()
        );
        if !self.title.is_empty() {
            line.push_str(&format!("  {}", self.title.italic()));
        }
        if markers {
            let strip: String = self
                .markers
                .iter()
                .map(|marker| match marker {
                    SlideMarker::Before => "\u{25cf}".dimmed().to_string(),
                    SlideMarker::Active => "\u{25c9}".green().bold().to_string(),
                    SlideMarker::After => "\u{25cb}".dimmed().to_string(),
                    SlideMarker::Unmarked => "?".red().to_string(),
                })
                .collect();
            line.push('\n');
            line.push_str(&format!("{:<24} {strip}", ""));
        }
        line
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// First words of a slide's text, shortened for a status line.
fn slide_title(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    if text.chars().count() <= MAX_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(MAX_CHARS - 1).collect();
    format!("{}\u{2026}", truncated.trim_end())
}
