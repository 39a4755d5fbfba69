//! # criteria
//!
//! Generic condition builder and repository layer over relational entity stores.
//!
//! Compose filters, ordering and pagination against any entity without
//! per-entity query code. A condition generates a data query and, when built
//! with count support, a count query from the same predicate list, so page
//! totals always match the filtered result set.
//!
//! ## Quick Start
//!
//! ```rust
//! use criteria::prelude::*;
//!
//! #[derive(Entity, Debug, Clone, PartialEq)]
//! #[entity(table = "countries")]
//! struct Country {
//!     #[entity(id)]
//!     id: i64,
//!     code: String,
//! }
//!
//! #[derive(Entity, Debug, Clone, PartialEq)]
//! #[entity(table = "customers")]
//! struct Customer {
//!     #[entity(id)]
//!     id: i64,
//!     name: String,
//!     #[entity(relation)]
//!     country: Option<Country>,
//! }
//!
//! # fn main() -> criteria::Result<()> {
//! let store = SqliteStore::in_memory()?;
//! store.create_table::<Country>()?;
//! store.create_table::<Customer>()?;
//!
//! let countries = Repository::<Country, _>::new(&store);
//! let customers = Repository::<Customer, _>::new(&store);
//!
//! let pt = countries.save(&Country { id: 1, code: "PT".into() })?;
//! customers.insert(&Customer { id: 1, name: "Ana".into(), country: Some(pt) })?;
//! customers.insert(&Customer { id: 2, name: "Bob".into(), country: None })?;
//!
//! let portuguese = customers.condition_with_count().equal("country.code", "PT");
//! let page = customers.find_page_where(&portuguese, 0, 10, &OrderSpec::parse_all(["-name"]))?;
//! assert_eq!(page.total_count(), 1);
//! assert_eq!(page.results()[0].name, "Ana");
//! # Ok(())
//! # }
//! ```
//!
//! ## Stores
//!
//! | Store          | Feature Flag | Notes                               |
//! |----------------|--------------|-------------------------------------|
//! | `MemoryStore`  | always       | in-process, reference semantics     |
//! | `SqliteStore`  | `rusqlite`   | SQL rendered by `criteria-sqlite`   |

// Lets the derive's `criteria::` paths resolve inside this crate.
extern crate self as criteria;

pub mod config;
mod error;
mod hydrate;
mod pagination;
mod repository;
pub mod store;

// =============================================================================
// Root-level exports
// =============================================================================

pub use error::{Error, Result};
pub use pagination::Pagination;
pub use repository::Repository;

pub use config::{Config, ConfigError, RepositoryConfig, SqliteConfig};
pub use store::{MemoryStore, Session, Store, StoreError};
#[cfg(feature = "rusqlite")]
pub use store::SqliteStore;

/// Derive macro for [`Entity`](trait@Entity)
pub use criteria_macros::Entity;

pub use criteria_core::{
    Attribute, Cell, Column, Comparand, CompareOp, Condition, CountDescriptor, Entity,
    EntityModel, FieldKind, FieldModel, Join, Junction, Key, Number, OrderSpec, PathError,
    Predicate, QueryDescriptor, QueryError, Record, RecordError, RecordReader, ResolvedPredicate,
    Row, SortDirection, SortKey, Target, Value, ValueError, ValueKind, Window, relation_cell,
};

/// Core building blocks: values, model registry, paths, predicates, evaluation.
pub mod core {
    pub use criteria_core::*;
}

/// SQLite dialect: statements rendered from descriptors.
#[cfg(feature = "rusqlite")]
pub mod sqlite {
    pub use criteria_sqlite::*;
}

/// Everything needed to declare entities and query them.
pub mod prelude {
    pub use crate::{
        Condition, Entity, Error, MemoryStore, OrderSpec, Pagination, Repository,
        RepositoryConfig, Result, Store, Value,
    };

    #[cfg(feature = "rusqlite")]
    pub use crate::SqliteStore;
}
