//! The addressable location string, `#/<slide>/<fragment>`.

use std::sync::LazyLock;

use regex::Regex;

use crate::controller::NavigationState;

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/([0-9]+)(?:/(-?[0-9]+))?$").expect("address pattern is valid")
});

/// A location string that matched the address pattern, not yet clamped to
/// any deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub slide: usize,
    /// `None` when the fragment segment was absent.
    pub fragment: Option<i64>,
}

/// Parse a location string. A single leading `#` is ignored. Numbers too
/// large to represent saturate, so they still clamp to the last slide or
/// fragment.
pub fn parse(location: &str) -> Option<Address> {
    let path = location.strip_prefix('#').unwrap_or(location);
    let caps = ADDRESS.captures(path)?;
    let slide = caps[1].parse::<usize>().unwrap_or(usize::MAX);
    let fragment = caps.get(2).map(|m| {
        let digits = m.as_str();
        digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        })
    });
    Some(Address { slide, fragment })
}

/// Canonical location string for a navigation state.
pub fn format(state: NavigationState) -> String {
    format!("#/{}/{}", state.slide, state.fragment_index())
}

/// In-memory address bar.
///
/// Writes that change the value leave a pending change notification behind,
/// the way a browser fires `hashchange` after the current task finishes.
/// Writing the value already present notifies nobody.
#[derive(Debug, Clone, Default)]
pub struct Location {
    hash: String,
    pending_change: bool,
}

impl Location {
    pub fn new(hash: &str) -> Self {
        Self {
            hash: normalize(hash),
            pending_change: false,
        }
    }

    /// Current value, `""` or a string starting with `#`.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Replace the value. Returns whether it changed.
    pub fn set_hash(&mut self, hash: &str) -> bool {
        let hash = normalize(hash);
        if hash == self.hash {
            return false;
        }
        log::debug!("location {:?} -> {:?}", self.hash, hash);
        self.hash = hash;
        self.pending_change = true;
        true
    }

    /// Consume the pending change notification, if any.
    pub fn take_change(&mut self) -> bool {
        std::mem::take(&mut self.pending_change)
    }
}

fn normalize(hash: &str) -> String {
    match hash {
        "" | "#" => String::new(),
        h if h.starts_with('#') => h.to_string(),
        h => format!("#{h}"),
    }
}
