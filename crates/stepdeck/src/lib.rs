//! Slide and fragment navigation for HTML slide decks.
//!
//! A [`Session`] attaches a [`PresentationController`] to a deck
//! [`Document`], feeds it input events one at a time and keeps the
//! addressable [`Location`] (`#/<slide>/<fragment>`) in sync.

pub mod config;
pub mod controller;
pub mod document;
pub mod event;
pub mod location;
pub mod report;
pub mod session;

pub use controller::{NavigationState, PresentationController};
pub use document::{Document, DocumentError, NodeId};
pub use event::{InputEvent, Key};
pub use location::Location;
pub use session::{Dispatched, Session};
