//! Error types for vendor version resolution.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolutionError>;

#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The compatibility dataset has no entries at all for the vendor.
    #[error("unknown vendor '{vendor}': no entries in the compatibility dataset")]
    UnknownVendor { vendor: String },

    /// The query ran but nothing survived the vendor filter.
    #[error("no '{vendor}' version matches query '{query}'")]
    NoMatchingVersion { vendor: String, query: String },

    /// A dataset entry did not carry a numeric version.
    #[error("dataset entry '{entry}' has no numeric version")]
    UnparsableVersion { entry: String },

    /// The backing dataset rejected the query.
    #[error("compatibility query '{query}' failed: {message}")]
    Query { query: String, message: String },
}
