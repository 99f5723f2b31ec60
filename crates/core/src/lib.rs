#![warn(clippy::all, missing_docs)]

//! Core domain logic for the raildoor lookup tool.
//!
//! This crate hosts the dataset models, loading/validation, query
//! normalization and suggestion ranking, selection state, view models, and
//! the clipboard export formatter used by the terminal UI and any future
//! frontends.

pub mod config;
pub mod dataset;
pub mod export;
pub mod models;
pub mod search;
pub mod selection;
pub mod view;

pub use config::AppConfig;
pub use dataset::{DatasetError, DatasetLoader, PreparedDataset};
pub use models::{Dataset, Direction, Door, Egress, EgressCategory, Line, Station};
pub use search::{normalize, StationIndex, MAX_SUGGESTIONS};
pub use selection::Selection;
pub use view::ResultsView;
