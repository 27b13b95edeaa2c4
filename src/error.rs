//! Error types for the Landsat STAC search client.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the search client and result navigation.
#[derive(Error, Debug)]
pub enum Error {
    /// A filter setter rejected its input before storing it.
    #[error("invalid value for {field}: {reason}")]
    Validation {
        /// Name of the filter that rejected the value.
        field: &'static str,
        reason: String,
    },

    /// The search endpoint answered with a non-200 status.
    #[error("search request failed with HTTP status {status}")]
    Request { status: u16 },

    /// A stored filter value is a multi-key object; only single-operator
    /// comparison objects ({"eq": ...}, {"lt": ...}) can be rendered.
    #[error("filter {key:?} is not a single-operator comparison object")]
    UnsupportedFilter { key: String },

    /// No fixed band list is known for this platform code.
    #[error("no band list known for platform {0:?}")]
    UnrecognizedPlatform(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed search response: {0}")]
    Response(#[from] serde_json::Error),

    #[error("failed to read vector file {}", .path.display())]
    Vector {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    #[error("vector file {} contains no geometries", .path.display())]
    EmptyVector { path: PathBuf },

    #[error("vector file {} starts with an unsupported {kind} shape", .path.display())]
    UnsupportedShape { path: PathBuf, kind: String },
}

/// Result alias for search operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
