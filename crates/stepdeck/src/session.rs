//! Event ingress for a single presentation.
//!
//! Events are queued and handled one at a time, each to completion before
//! the next starts. Location writes that change the address enqueue a
//! [`InputEvent::LocationChanged`] behind whatever is already waiting, so a
//! navigation is always followed by the controller re-reading the location
//! it just wrote.

use std::collections::VecDeque;

use crate::controller::{NavigationState, PresentationController};
use crate::document::Document;
use crate::event::{Action, InputEvent};
use crate::location::Location;

/// Result of delivering one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    /// The platform's default handling of the event should be suppressed.
    pub default_prevented: bool,
    /// State once the queue has drained.
    pub state: NavigationState,
}

#[derive(Debug, Clone)]
pub struct Session {
    document: Document,
    location: Location,
    controller: PresentationController,
    queue: VecDeque<InputEvent>,
}

impl Session {
    /// Attach to the document and run the startup sequence: apply the
    /// location, render, write back the canonical location and focus the
    /// deck. Returns `None` when the document has no deck to present.
    pub fn start(document: Document, location: Location) -> Option<Self> {
        let controller = PresentationController::attach(&document)?;
        let mut session = Self {
            document,
            location,
            controller,
            queue: VecDeque::new(),
        };
        session
            .controller
            .apply_from_location(&mut session.document, &session.location);
        session.controller.serialize_to_location(&mut session.location);
        session.document.focus(session.controller.deck());
        session.run_queue();
        Some(session)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn controller(&self) -> &PresentationController {
        &self.controller
    }

    pub fn state(&self) -> NavigationState {
        self.controller.state()
    }

    /// Queue an event without handling it.
    pub fn enqueue(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    /// Number of events waiting to be handled.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Handle queued events in arrival order until none remain.
    pub fn run_queue(&mut self) {
        loop {
            if self.location.take_change() {
                self.queue.push_back(InputEvent::LocationChanged);
            }
            let Some(event) = self.queue.pop_front() else {
                break;
            };
            self.handle(&event);
        }
    }

    /// Queue an event and drain the queue.
    pub fn dispatch(&mut self, event: InputEvent) -> Dispatched {
        let default_prevented = event.prevents_default();
        self.enqueue(event);
        self.run_queue();
        Dispatched {
            default_prevented,
            state: self.state(),
        }
    }

    /// Change the location from outside the presentation, as a user editing
    /// the address bar or following a link would.
    pub fn visit(&mut self, hash: &str) -> NavigationState {
        self.location.set_hash(hash);
        self.run_queue();
        self.state()
    }

    fn handle(&mut self, event: &InputEvent) {
        log::trace!("handling {event}");
        match event.action() {
            Some(Action::Next) => {
                self.controller.next(&mut self.document, &mut self.location);
            }
            Some(Action::Prev) => {
                self.controller.prev(&mut self.document, &mut self.location);
            }
            Some(Action::ApplyLocation) => {
                self.controller
                    .apply_from_location(&mut self.document, &self.location);
            }
            None => log::trace!("ignoring {event}"),
        }
    }
}
