use dermis_oracle::AnalysisResult;
use tracing::{debug, info, warn};

use crate::backend::TimelineBackend;
use crate::entry::TimelineEntry;

/// The append-only history of analysis sessions.
///
/// The store owns the sequence: it is read once when the store is opened
/// and every append is persisted before it returns. Entries are never
/// updated or removed.
pub struct TimelineStore<B> {
    backend: B,
    entries: Vec<TimelineEntry>,
}

impl<B: TimelineBackend> TimelineStore<B> {
    /// Opens the store, loading the persisted history.
    ///
    /// Unreadable history is logged and replaced by an empty sequence; the
    /// next append overwrites it.
    pub fn open(backend: B) -> Self {
        let entries = match backend.load() {
            Ok(entries) => {
                info!(count = entries.len(), "Loaded timeline");
                entries
            }
            Err(e) => {
                warn!(error = %e, "Persisted timeline is unreadable, starting empty");
                Vec::new()
            }
        };

        Self { backend, entries }
    }

    /// The full history, oldest first.
    pub fn load_all(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&TimelineEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an entry and persists it immediately.
    ///
    /// An entry stamped earlier than the current tail takes the tail's
    /// timestamp, so the history never goes back in time. On a persistence
    /// error the in-memory history is left unchanged.
    pub fn append(&mut self, mut entry: TimelineEntry) -> Result<&TimelineEntry, B::Error> {
        if let Some(last) = self.last() {
            entry.not_before(last.timestamp());
        }
        self.entries.push(entry);

        if let Err(e) = self.backend.append(&self.entries) {
            self.entries.pop();
            return Err(e);
        }

        let index = self.entries.len() - 1;
        debug!(index, "Appended timeline entry");
        Ok(&self.entries[index])
    }

    /// Creates an entry for a finished analysis, stamped with the current
    /// time, and appends it.
    pub fn record(
        &mut self,
        image_data: impl Into<String>,
        analysis: AnalysisResult,
    ) -> Result<&TimelineEntry, B::Error> {
        self.append(TimelineEntry::new(image_data, Some(analysis)))
    }

    /// Releases the backend, e.g. to reopen it.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chrono::Utc;
    use std::fmt;

    const IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn eczema() -> AnalysisResult {
        AnalysisResult {
            is_skin: true,
            disease_name: Some("Eczema".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn append_survives_reopen() {
        let mut store = TimelineStore::open(MemoryBackend::new());
        store.record(IMAGE, AnalysisResult::default()).unwrap();
        let before = store.len();

        let entry = store.record(IMAGE, eczema()).unwrap().clone();
        let reopened = TimelineStore::open(store.into_backend());

        assert_eq!(reopened.len(), before + 1);
        assert_eq!(reopened.last(), Some(&entry));
        assert_eq!(reopened.last().unwrap().label(), "Eczema");
    }

    #[test]
    fn lookup_by_index() {
        let mut store = TimelineStore::open(MemoryBackend::new());
        store.record(IMAGE, eczema()).unwrap();
        store.record(IMAGE, AnalysisResult::default()).unwrap();

        assert_eq!(store.get(0).unwrap().label(), "Eczema");
        assert_eq!(store.get(1).unwrap().label(), "Analysis");
        assert!(store.get(2).is_none());
        assert_eq!(store.load_all().len(), 2);
    }

    #[test]
    fn timestamps_never_decrease() {
        let future = Utc::now().timestamp_millis() + 60_000;
        let seeded = TimelineEntry::captured_at(IMAGE, None, future);
        let mut store = TimelineStore::open(MemoryBackend::with_entries(vec![seeded]));

        let recorded = store.record(IMAGE, eczema()).unwrap();

        assert_eq!(recorded.timestamp(), future);
    }

    #[test]
    fn append_never_goes_back_in_time() {
        let mut store = TimelineStore::open(MemoryBackend::new());
        store
            .append(TimelineEntry::captured_at(IMAGE, None, 10))
            .unwrap();

        let appended = store
            .append(TimelineEntry::captured_at(IMAGE, None, 5))
            .unwrap();
        assert_eq!(appended.timestamp(), 10);

        store
            .append(TimelineEntry::captured_at(IMAGE, None, 12))
            .unwrap();

        let times: Vec<i64> = store.load_all().iter().map(|e| e.timestamp()).collect();
        assert_eq!(times, [10, 10, 12]);

        let reopened = TimelineStore::open(store.into_backend());
        assert_eq!(reopened.get(1).unwrap().timestamp(), 10);
    }

    #[derive(Debug)]
    struct Unreadable;

    impl fmt::Display for Unreadable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "unreadable")
        }
    }

    impl std::error::Error for Unreadable {}

    /// Fails to load; appends fail when `full` is set.
    struct BrokenBackend {
        full: bool,
        appended: usize,
    }

    impl TimelineBackend for BrokenBackend {
        type Error = Unreadable;

        fn load(&self) -> Result<Vec<TimelineEntry>, Self::Error> {
            Err(Unreadable)
        }

        fn append(&mut self, _history: &[TimelineEntry]) -> Result<(), Self::Error> {
            if self.full {
                return Err(Unreadable);
            }
            self.appended += 1;
            Ok(())
        }
    }

    #[test]
    fn unreadable_history_starts_empty() {
        let mut store = TimelineStore::open(BrokenBackend {
            full: false,
            appended: 0,
        });
        assert!(store.is_empty());

        store.record(IMAGE, eczema()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.into_backend().appended, 1);
    }

    #[test]
    fn failed_append_leaves_history_unchanged() {
        let mut store = TimelineStore::open(BrokenBackend {
            full: true,
            appended: 0,
        });

        assert!(store.record(IMAGE, eczema()).is_err());
        assert!(store.is_empty());
    }
}
