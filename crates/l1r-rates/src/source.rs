//! Event-source seam.
//!
//! The engine never reads files itself; whatever supplies events (an
//! ntuple reader, a decoded JSON stream, a test vector) implements
//! [`EventSource`].

use l1r_core::{Event, Result};

/// Supplier of events to the engine, one at a time.
pub trait EventSource {
    /// The next event, or `None` when the source is exhausted.
    fn next_event(&mut self) -> Result<Option<Event>>;
}

/// An in-memory event source, mainly for tests and small runs.
pub struct MemorySource {
    events: std::vec::IntoIter<Event>,
}

impl MemorySource {
    /// Wrap a vector of events.
    pub fn new(events: Vec<Event>) -> Self {
        Self { events: events.into_iter() }
    }
}

impl EventSource for MemorySource {
    fn next_event(&mut self) -> Result<Option<Event>> {
        Ok(self.events.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_drains() {
        let mut src = MemorySource::new(vec![Event::default(), Event::default()]);
        assert!(src.next_event().unwrap().is_some());
        assert!(src.next_event().unwrap().is_some());
        assert!(src.next_event().unwrap().is_none());
    }
}
