//! Error types for repository operations.

use criteria_core::{PathError, QueryError, RecordError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Result type for criteria operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by [`Repository`](crate::Repository) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A filter or order path does not resolve against the entity
    #[error("Path resolution error: {0}")]
    PathResolution(#[from] PathError),

    /// Counting or paging with a condition built without count support
    #[error("Condition on '{entity}' was built without count support")]
    NoCountSupport { entity: &'static str },

    /// Negative offset or limit
    #[error("Invalid pagination parameters: offset {offset}, limit {limit}")]
    InvalidPaginationParams { offset: i64, limit: i64 },

    /// No entity matched
    #[error("No '{entity}' found")]
    NotFound { entity: &'static str },

    /// Failure inside the storage engine
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// A stored row could not be mapped onto the entity
    #[error("Mapping error: {0}")]
    Mapping(#[from] RecordError),

    /// Relations nest deeper than the configured maximum
    #[error("Relations of '{entity}' nest deeper than {max_depth}")]
    RelationDepthExceeded {
        entity: &'static str,
        max_depth: usize,
    },

    /// Writing the entity would make its relations lead back to itself
    #[error("Relation '{field}' of '{entity}' {key} leads back to the entity itself")]
    CyclicReference {
        entity: &'static str,
        field: &'static str,
        key: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Path(err) => Self::PathResolution(err),
            QueryError::NoCountSupport { entity } => Self::NoCountSupport { entity },
        }
    }
}

#[cfg(feature = "rusqlite")]
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StoreError::Sqlite(err))
    }
}
