use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Dataset, Station};
use crate::search::StationIndex;

/// Errors raised while reading the dataset document.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("failed to read dataset {path}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid dataset document.
    #[error("failed to parse dataset {path}")]
    Parse {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// A loaded dataset bundled with its prebuilt search index.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    /// The validated dataset.
    pub dataset: Dataset,
    /// Search keys built once at load time.
    pub index: StationIndex,
}

impl PreparedDataset {
    /// Rank stations against a free-text query (at most
    /// [`crate::search::MAX_SUGGESTIONS`] results).
    pub fn suggestions(&self, query: &str) -> Vec<&Station> {
        self.index.suggestions(&self.dataset.stations, query)
    }
}

/// Thread-safe loader that reads the dataset document once and caches the
/// prepared result.
pub struct DatasetLoader {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    path: PathBuf,
    cache: Option<Arc<PreparedDataset>>,
}

impl DatasetLoader {
    /// Build a loader for the dataset document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                path: path.into(),
                cache: None,
            })),
        }
    }

    /// Path of the dataset document.
    pub fn path(&self) -> PathBuf {
        self.inner.read().path.clone()
    }

    /// Point the loader at a new document and drop the cached dataset.
    pub fn refresh(&self, path: impl Into<PathBuf>) {
        let mut inner = self.inner.write();
        inner.path = path.into();
        inner.cache = None;
    }

    /// Return the prepared dataset, reading the document on first use.
    pub fn load(&self) -> Result<Arc<PreparedDataset>, DatasetError> {
        let mut inner = self.inner.write();
        if let Some(prepared) = &inner.cache {
            return Ok(Arc::clone(prepared));
        }
        let prepared = Arc::new(prepare(read_dataset(&inner.path)?));
        info!(
            stations = prepared.dataset.stations.len(),
            lines = prepared.dataset.lines.len(),
            "Dataset loaded"
        );
        inner.cache = Some(Arc::clone(&prepared));
        Ok(prepared)
    }
}

fn read_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let contents = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut dataset: Dataset =
        serde_json::from_str(&contents).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    dataset.loaded_at = Utc::now();
    Ok(dataset)
}

/// Validate the dataset and build the search index. Malformed stations are
/// skipped with a warning; referential oddities (unknown direction keys,
/// line codes missing from the line table) are warnings only and never
/// errors.
fn prepare(mut dataset: Dataset) -> PreparedDataset {
    dataset.stations.retain(|station| {
        if station.name.trim().is_empty() {
            warn!("Skipping station with empty name");
            return false;
        }
        if station.directions.is_empty() {
            warn!(station = %station.name, "Skipping station without directions");
            return false;
        }
        true
    });

    for station in &dataset.stations {
        for code in &station.lines {
            if !dataset.lines.contains_key(code) {
                warn!(station = %station.name, code = %code, "Unknown line code");
            }
        }
        for key in station.egress_by_dir.keys() {
            if !station.directions.iter().any(|dir| &dir.key == key) {
                warn!(station = %station.name, key = %key, "Egress direction has no matching direction entry");
            }
        }
    }

    let index = StationIndex::build(&dataset.stations);
    PreparedDataset { dataset, index }
}
