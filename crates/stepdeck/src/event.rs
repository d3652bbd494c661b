use std::fmt;

/// Key values as reported by a key press, following DOM `KeyboardEvent.key`
/// naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Space,
    PageDown,
    PageUp,
    Backspace,
    Other(String),
}

impl Key {
    /// Maps a DOM key value (`" "` for space) exactly. Anything else,
    /// including legacy names like `"Right"`, is an unbound key.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowRight" => Self::ArrowRight,
            "ArrowLeft" => Self::ArrowLeft,
            " " => Self::Space,
            "PageDown" => Self::PageDown,
            "PageUp" => Self::PageUp,
            "Backspace" => Self::Backspace,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn action(&self) -> Option<Action> {
        match self {
            Self::ArrowRight | Self::Space | Self::PageDown => Some(Action::Next),
            Self::ArrowLeft | Self::Backspace | Self::PageUp => Some(Action::Prev),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArrowRight => write!(f, "ArrowRight"),
            Self::ArrowLeft => write!(f, "ArrowLeft"),
            Self::Space => write!(f, "Space"),
            Self::PageDown => write!(f, "PageDown"),
            Self::PageUp => write!(f, "PageUp"),
            Self::Backspace => write!(f, "Backspace"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A discrete input event delivered to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    /// A pointer click anywhere in the document.
    Click,
    /// The location string changed.
    LocationChanged,
}

/// What the controller does in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Prev,
    ApplyLocation,
}

impl InputEvent {
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::KeyDown(key) => key.action(),
            Self::Click => Some(Action::Next),
            Self::LocationChanged => Some(Action::ApplyLocation),
        }
    }

    /// Navigation keys suppress the platform's default handling. Clicks and
    /// unbound keys do not.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::KeyDown(key) if key.action().is_some())
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyDown(key) => write!(f, "keydown {key}"),
            Self::Click => write!(f, "click"),
            Self::LocationChanged => write!(f, "locationchange"),
        }
    }
}
