//! The transient "bot is working" marker shown while a request is in flight.
//!
//! Only one marker exists at a time. [`TypingIndicator::start`] hands out an
//! owned [`TypingHandle`]; the marker disappears when that handle is passed
//! back to [`TypingIndicator::stop`]. Animation is driven from outside by
//! calling [`TypingIndicator::tick`] on a fixed interval, and a tick with no
//! marker does nothing, so the animation ends on its own once the marker is
//! gone.

use crate::core::constants::INDICATOR_TEXT;

const MAX_DOTS: u8 = 3;

/// Proof of ownership for the live marker. Deliberately not `Clone`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the handle leaves the indicator on screen"]
pub struct TypingHandle {
    id: u64,
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    id: u64,
    dots: u8,
}

#[derive(Debug, Default)]
pub struct TypingIndicator {
    marker: Option<Marker>,
    next_id: u64,
}

impl TypingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put up a fresh marker. An existing marker is replaced and its handle
    /// goes stale.
    pub fn start(&mut self) -> TypingHandle {
        self.next_id += 1;
        let id = self.next_id;
        self.marker = Some(Marker { id, dots: 1 });
        TypingHandle { id }
    }

    /// Remove the marker owned by `handle`. Returns false when the handle is
    /// stale or nothing is showing.
    pub fn stop(&mut self, handle: TypingHandle) -> bool {
        match self.marker {
            Some(marker) if marker.id == handle.id => {
                self.marker = None;
                true
            }
            _ => false,
        }
    }

    /// Advance the dot cycle 1 → 2 → 3 → 1. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        match self.marker.as_mut() {
            Some(marker) => {
                marker.dots = marker.dots % MAX_DOTS + 1;
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.marker.is_some()
    }

    pub fn dots(&self) -> Option<u8> {
        self.marker.map(|marker| marker.dots)
    }

    /// The text to render, or `None` when no marker is up.
    pub fn label(&self) -> Option<String> {
        self.marker
            .map(|marker| format!("{INDICATOR_TEXT}{}", ".".repeat(marker.dots as usize)))
    }
}
