//! Fjall-backed timeline storage.
//!
//! Each entry is stored as JSON under its index; a separate length record
//! says how many entries are valid. The entry is written before the length,
//! so an interrupted append leaves the previous sequence intact.

use std::path::Path;

use fjall::{Database, Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::backend::TimelineBackend;
use crate::entry::TimelineEntry;
use crate::error::TimelineError;

pub const DEFAULT_KEYSPACE: &str = "timeline";

const LENGTH_KEY: &[u8] = b"len";
const ENTRY_PREFIX: u8 = b'e';

fn entry_key(index: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(9);
    key.push(ENTRY_PREFIX);
    key.extend_from_slice(&index.to_be_bytes());
    key
}

/// A persistent timeline backed by Fjall.
pub struct FjallBackend {
    keyspace: Keyspace,
    database: Database,
}

impl FjallBackend {
    /// Opens a timeline at the given path using the default keyspace.
    ///
    /// Creates the database if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TimelineError> {
        Self::open_keyspace(path, DEFAULT_KEYSPACE)
    }

    /// Opens a timeline at the given path with a specific keyspace name.
    pub fn open_keyspace(path: impl AsRef<Path>, keyspace: &str) -> Result<Self, TimelineError> {
        let database = Database::builder(path.as_ref()).open()?;
        let keyspace = database.keyspace(keyspace, || KeyspaceCreateOptions::default())?;
        Ok(Self { keyspace, database })
    }

    fn stored_len(&self) -> Result<u64, TimelineError> {
        let Some(bytes) = self.keyspace.get(LENGTH_KEY)?.map(|v| v.to_vec()) else {
            return Ok(0);
        };
        let raw: [u8; 8] = bytes
            .try_into()
            .map_err(|_| TimelineError::Corrupt("length record is not 8 bytes".to_string()))?;
        Ok(u64::from_be_bytes(raw))
    }
}

impl TimelineBackend for FjallBackend {
    type Error = TimelineError;

    fn load(&self) -> Result<Vec<TimelineEntry>, Self::Error> {
        let len = self.stored_len()?;

        (0..len)
            .map(|index| {
                let bytes = self
                    .keyspace
                    .get(entry_key(index))?
                    .map(|v| v.to_vec())
                    .ok_or_else(|| TimelineError::Corrupt(format!("entry {index} is missing")))?;
                Ok(serde_json::from_slice(&bytes)?)
            })
            .collect()
    }

    fn append(&mut self, history: &[TimelineEntry]) -> Result<(), Self::Error> {
        let Some(entry) = history.last() else {
            return Ok(());
        };
        let index = (history.len() - 1) as u64;

        self.keyspace
            .insert(entry_key(index), serde_json::to_vec(entry)?)?;
        self.keyspace
            .insert(LENGTH_KEY, (index + 1).to_be_bytes().to_vec())?;
        self.database.persist(PersistMode::SyncAll)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_backend() -> (FjallBackend, TempDir) {
        let dir = TempDir::new().unwrap();
        let backend = FjallBackend::open(dir.path()).unwrap();
        (backend, dir)
    }

    #[test]
    fn empty_database_loads_nothing() {
        let (backend, _dir) = temp_backend();
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load() {
        let (mut backend, _dir) = temp_backend();
        let first = TimelineEntry::captured_at("data:image/png;base64,AAAA", None, 1);
        let second = TimelineEntry::captured_at("data:image/png;base64,BBBB", None, 2);

        backend.append(&[first.clone()]).unwrap();
        backend.append(&[first.clone(), second.clone()]).unwrap();

        assert_eq!(backend.load().unwrap(), vec![first, second]);
    }

    #[test]
    fn bad_length_record_is_corrupt() {
        let (backend, _dir) = temp_backend();
        backend.keyspace.insert(LENGTH_KEY, b"abc".to_vec()).unwrap();

        assert!(matches!(backend.load(), Err(TimelineError::Corrupt(_))));
    }

    #[test]
    fn missing_entry_is_corrupt() {
        let (backend, _dir) = temp_backend();
        backend
            .keyspace
            .insert(LENGTH_KEY, 2u64.to_be_bytes().to_vec())
            .unwrap();

        assert!(matches!(backend.load(), Err(TimelineError::Corrupt(_))));
    }

    #[test]
    fn garbage_entry_is_json_error() {
        let (backend, _dir) = temp_backend();
        backend.keyspace.insert(entry_key(0), b"{not json".to_vec()).unwrap();
        backend
            .keyspace
            .insert(LENGTH_KEY, 1u64.to_be_bytes().to_vec())
            .unwrap();

        assert!(matches!(backend.load(), Err(TimelineError::Json(_))));
    }
}
