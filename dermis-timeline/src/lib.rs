//! Durable, append-only history of skin analyses.
//!
//! A [`TimelineStore`] holds the ordered sequence of [`TimelineEntry`]
//! records and persists each append through a [`TimelineBackend`]:
//! - [`FjallBackend`]: one key per entry in a Fjall database
//! - [`JsonFileBackend`]: one JSON array document
//! - [`MemoryBackend`]: in-process only, for tests

mod backend;
mod entry;
mod error;
mod fjall_store;
mod json_file;
mod store;

pub use backend::{MemoryBackend, TimelineBackend};
pub use entry::{FALLBACK_LABEL, HEALTHY_LABEL, TimelineEntry, derive_label};
pub use error::TimelineError;
pub use fjall_store::{DEFAULT_KEYSPACE, FjallBackend};
pub use json_file::JsonFileBackend;
pub use store::TimelineStore;
