//! Error types for the packing engine.
//!
//! A box catalog that cannot hold an item is not an error: those items are
//! reported through `unfit_items`. The variants here cover caller contract
//! violations and catalog loading failures only.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    /// Every entry point needs at least one box to choose from.
    #[error("box catalog is empty")]
    EmptyCatalog,

    #[error("invalid item '{name}': {reason}")]
    InvalidItem { name: String, reason: String },

    #[error("invalid box '{name}': {reason}")]
    InvalidBox { name: String, reason: String },

    #[error("failed to read catalog file: {path}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {path}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
