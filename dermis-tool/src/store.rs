use std::path::{Path, PathBuf};

use dermis_timeline::{
    FjallBackend, JsonFileBackend, TimelineBackend, TimelineEntry, TimelineError, TimelineStore,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Fjall,
    Json,
}

impl std::str::FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fjall" => Ok(StoreType::Fjall),
            "json" => Ok(StoreType::Json),
            _ => Err(format!("unknown store type: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Fjall => write!(f, "fjall"),
            StoreType::Json => write!(f, "json"),
        }
    }
}

pub enum AnyBackend {
    Fjall(FjallBackend),
    Json(JsonFileBackend),
}

impl AnyBackend {
    pub fn open(store_type: StoreType, path: impl AsRef<Path>) -> Result<Self, TimelineError> {
        match store_type {
            StoreType::Fjall => Ok(Self::Fjall(FjallBackend::open(path)?)),
            StoreType::Json => Ok(Self::Json(JsonFileBackend::new(path.as_ref()))),
        }
    }
}

impl TimelineBackend for AnyBackend {
    type Error = TimelineError;

    fn load(&self) -> Result<Vec<TimelineEntry>, Self::Error> {
        match self {
            AnyBackend::Fjall(b) => b.load(),
            AnyBackend::Json(b) => b.load(),
        }
    }

    fn append(&mut self, history: &[TimelineEntry]) -> Result<(), Self::Error> {
        match self {
            AnyBackend::Fjall(b) => b.append(history),
            AnyBackend::Json(b) => b.append(history),
        }
    }
}

pub struct AppContext {
    pub timeline: TimelineStore<AnyBackend>,
}

impl AppContext {
    pub fn open(store_type: StoreType, store_path: PathBuf) -> Result<Self, TimelineError> {
        info!(%store_type, path = %store_path.display(), "Opening timeline");
        let backend = AnyBackend::open(store_type, &store_path)?;
        let timeline = TimelineStore::open(backend);

        Ok(Self { timeline })
    }
}

pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dermis")
}

pub fn default_store_path(store_type: StoreType) -> PathBuf {
    match store_type {
        StoreType::Fjall => data_dir().join("timeline"),
        StoreType::Json => data_dir().join("timeline.json"),
    }
}
