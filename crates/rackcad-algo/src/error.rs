use crate::solid::Role;
use rackcad_core::error::ConfigError;
use rackcad_core::model::SectionSize;
use std::path::PathBuf;
use thiserror::Error;

/// A primitive could not be built from the given dimensions.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("{part} {dimension} must be a positive finite length, got {value}")]
    NonPositive {
        part: Role,
        dimension: &'static str,
        value: f64,
    },

    #[error("{part} wall thickness {wall} does not fit a {section} section")]
    WallTooThick {
        part: Role,
        wall: f64,
        section: SectionSize,
    },

    #[error(transparent)]
    Section(#[from] ConfigError),
}

/// The layout engine refused to place the rack.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("{what} must be at least {min}, got {value}")]
    TooFew {
        what: &'static str,
        min: u32,
        value: u32,
    },

    #[error("{what} must be at most {max}, got {value}")]
    TooMany {
        what: &'static str,
        max: u32,
        value: f64,
    },

    #[error("{what} must lie strictly between 0 and 1, got {value}")]
    BadFraction { what: &'static str, value: f64 },

    #[error("duplicate placement name: {0}")]
    DuplicateName(String),

    #[error("placement {name} refers to unknown shape #{shape}")]
    UnknownShape { name: String, shape: usize },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("assembly is empty, nothing to export")]
    EmptyAssembly,

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output file {0} does not exist after writing")]
    Missing(PathBuf),

    #[error("output file {path} is only {bytes} bytes (minimum {min})")]
    Undersized { path: PathBuf, bytes: u64, min: u64 },

    #[error("failed to format STEP data: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("failed to serialize metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}
