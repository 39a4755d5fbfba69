//! SQLite dialect for criteria
//!
//! Renders query descriptors, row operations and table definitions into
//! parameterised SQLite statements. This crate only produces SQL text and
//! parameters; executing them is up to the caller.
//!
//! ```
//! use criteria_core::{Condition, Entity, Window};
//! # use criteria_core::{EntityModel, FieldModel, Record, RecordError, ValueKind};
//! # struct Tag;
//! # static FIELDS: [FieldModel; 2] = [
//! #     FieldModel::scalar("id", "id", ValueKind::Integer, false),
//! #     FieldModel::scalar("label", "label", ValueKind::Text, false),
//! # ];
//! # static MODEL: EntityModel = EntityModel { name: "Tag", table: "tags", primary_key: 0, fields: &FIELDS };
//! # impl Entity for Tag {
//! #     fn model() -> &'static EntityModel { &MODEL }
//! #     fn to_record(&self) -> Record { unimplemented!() }
//! #     fn from_record(_: Record) -> Result<Self, RecordError> { unimplemented!() }
//! # }
//!
//! let query = Condition::<Tag>::new(false)
//!     .like("label", "rust")
//!     .generate(&[])
//!     .unwrap();
//! let statement = criteria_sqlite::select(&query, Window::new(0, 10));
//! assert_eq!(
//!     statement.sql,
//!     r#"SELECT "tags"."id", "tags"."label" FROM "tags" WHERE "tags"."label" LIKE ? ORDER BY "tags"."id" ASC LIMIT ? OFFSET ?"#
//! );
//! ```

pub mod pragma;
pub mod query;
pub mod schema;
pub mod sql;
pub mod write;

#[cfg(test)]
mod tests;

use criteria_core::Value;

pub use query::{count, find, select};
pub use schema::create_table;
pub use write::{delete, insert, upsert};

/// Rendered SQL text with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl core::fmt::Display for Statement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.sql)
    }
}
