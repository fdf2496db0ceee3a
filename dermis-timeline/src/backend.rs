use std::convert::Infallible;

use crate::entry::TimelineEntry;

/// Durable storage for a timeline.
///
/// Backends only move entries to and from storage; ordering and creation
/// rules live in [`TimelineStore`](crate::TimelineStore).
pub trait TimelineBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads the whole persisted sequence, oldest first.
    fn load(&self) -> Result<Vec<TimelineEntry>, Self::Error>;

    /// Persists an append. `history` is the full sequence after the append;
    /// its last element is the new entry and everything before it matches
    /// what was persisted already.
    ///
    /// Must be durable when it returns.
    fn append(&mut self, history: &[TimelineEntry]) -> Result<(), Self::Error>;
}

impl<B: TimelineBackend> TimelineBackend for &mut B {
    type Error = B::Error;

    fn load(&self) -> Result<Vec<TimelineEntry>, Self::Error> {
        (**self).load()
    }

    fn append(&mut self, history: &[TimelineEntry]) -> Result<(), Self::Error> {
        (**self).append(history)
    }
}

/// An in-memory backend.
///
/// Useful for testing and as a reference implementation.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: Vec<TimelineEntry>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<TimelineEntry>) -> Self {
        Self { entries }
    }
}

impl TimelineBackend for MemoryBackend {
    type Error = Infallible;

    fn load(&self) -> Result<Vec<TimelineEntry>, Self::Error> {
        Ok(self.entries.clone())
    }

    fn append(&mut self, history: &[TimelineEntry]) -> Result<(), Self::Error> {
        if let Some(entry) = history.last() {
            self.entries.push(entry.clone());
        }
        Ok(())
    }
}
