//! Error types for the osmodel command line.

use osgrid::GridError;
use osgrid_data::DataError;
use osgrid_model::ModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by `osmodel` before it exits.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parsing GRID_REFERENCE: {0}")]
    GridRef(#[from] GridError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Opening {kind} database: {source}")]
    OpenDatabase {
        kind: &'static str,
        #[source]
        source: DataError,
    },

    #[error("Writing output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Reading config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("No {kind} database given: use {flag} or set {env}")]
    MissingDatabase {
        kind: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for the command line.
pub type Result<T> = std::result::Result<T, CliError>;
