//! Dataset loading and validation.

/// JSON dataset reading, caching, and referential checks.
pub mod loader;

pub use loader::{DatasetError, DatasetLoader, PreparedDataset};
