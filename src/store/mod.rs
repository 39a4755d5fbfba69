//! Storage engine seam.
//!
//! A [`Store`] hands out one scoped [`Session`] per repository operation.
//! Sessions execute descriptors and row operations; they see flat [`Row`]s
//! only, relation loading happens above them.

pub mod memory;
#[cfg(feature = "rusqlite")]
pub mod sqlite;

use std::sync::Arc;

use criteria_core::{CountDescriptor, EntityModel, Key, QueryDescriptor, Row, Value, Window};
use thiserror::Error;

pub use memory::MemoryStore;
#[cfg(feature = "rusqlite")]
pub use sqlite::SqliteStore;

/// Errors raised inside a storage engine. Passed through untouched as
/// [`Error::Storage`](crate::Error::Storage).
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "rusqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// `persist` of a row whose primary key is already stored
    #[error("Duplicate key {key} for '{entity}'")]
    DuplicateKey { entity: &'static str, key: String },

    /// A mandatory field holds `NULL`
    #[error("Field '{entity}.{field}' cannot be NULL")]
    NotNull {
        entity: &'static str,
        field: &'static str,
    },

    /// Writing or removing a row would break a reference
    #[error("Foreign key violation on '{entity}.{field}' for key {key}")]
    ForeignKey {
        entity: &'static str,
        field: &'static str,
        key: String,
    },

    /// A stored foreign key points at no row
    #[error("'{entity}.{field}' references missing key {key}")]
    DanglingReference {
        entity: &'static str,
        field: &'static str,
        key: String,
    },

    /// The primary key value is neither an integer nor text
    #[error("Unsupported {kind} key for '{entity}'")]
    UnsupportedKey {
        entity: &'static str,
        kind: &'static str,
    },

    /// A previous session panicked while holding the store lock
    #[error("{0} store lock poisoned")]
    Poisoned(&'static str),
}

/// One unit of work against a storage engine.
pub trait Session {
    /// Rows of the root entity matching `query`, ordered, within `window`.
    fn select(&mut self, query: &QueryDescriptor, window: Window) -> Result<Vec<Row>, StoreError>;

    /// Number of rows matching `query`.
    fn count(&mut self, query: &CountDescriptor) -> Result<u64, StoreError>;

    /// The row of `model` whose primary key equals `id`.
    fn find(&mut self, model: &'static EntityModel, id: &Value) -> Result<Option<Row>, StoreError>;

    /// Inserts a new row. Fails when the key exists.
    fn persist(&mut self, row: Row) -> Result<(), StoreError>;

    /// Inserts or replaces the row with the same key.
    fn merge(&mut self, row: Row) -> Result<(), StoreError>;

    /// Deletes the row with key `id`, if any.
    fn remove(&mut self, model: &'static EntityModel, id: &Value) -> Result<(), StoreError>;
}

/// Source of scoped sessions.
pub trait Store {
    /// Runs `f` with a session that is released when `f` returns, on every path.
    fn with_session<R>(&self, f: impl FnOnce(&mut dyn Session) -> crate::Result<R>) -> crate::Result<R>;
}

impl<T: Store> Store for &T {
    fn with_session<R>(&self, f: impl FnOnce(&mut dyn Session) -> crate::Result<R>) -> crate::Result<R> {
        (**self).with_session(f)
    }
}

impl<T: Store> Store for Arc<T> {
    fn with_session<R>(&self, f: impl FnOnce(&mut dyn Session) -> crate::Result<R>) -> crate::Result<R> {
        (**self).with_session(f)
    }
}

/// Stored key of `row`, rejecting kinds that cannot identify a row.
pub(crate) fn row_key(row: &Row) -> Result<Key, StoreError> {
    Key::coerce(row.id(), row.model.id_kind()).ok_or(StoreError::UnsupportedKey {
        entity: row.model.name,
        kind: row.id().kind_name(),
    })
}
