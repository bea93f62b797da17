// ⚠️ Error types for catalog I/O and record decoding

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure loading or writing a catalog/candidate document
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode catalog for {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A phone record that lacks a consumed field or carries the wrong type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("phone record is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("phone record field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("phone record field `{field}` is out of range for {range}")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
    },

    #[error("phone record must be a JSON object")]
    NotAnObject,
}

/// A catalog document whose top level does not hold a valid `smartphones` array
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("catalog is missing the `smartphones` field")]
    MissingSmartphones,

    #[error("catalog field `smartphones` must be an array")]
    SmartphonesNotArray,

    #[error("smartphones[{index}]: {source}")]
    InvalidPhone {
        index: usize,
        #[source]
        source: RecordError,
    },
}
