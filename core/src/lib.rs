//! Core of the criteria workspace: values, the entity model registry, field
//! path resolution, predicates, the fluent [`Condition`] builder and the
//! descriptors it generates for storage engines.

pub mod condition;
pub mod conversions;
pub mod descriptor;
pub mod error;
pub mod eval;
pub mod model;
pub mod order;
pub mod path;
pub mod predicate;
mod tracing;
pub mod value;

#[cfg(test)]
mod fixtures;

// Re-export key types and traits
pub use condition::Condition;
pub use conversions::Column;
pub use descriptor::{CountDescriptor, QueryDescriptor, SortKey, Window};
pub use error::{PathError, QueryError, RecordError, ValueError};
pub use eval::AttributeSource;
pub use model::{Cell, Entity, EntityModel, FieldKind, FieldModel, Record, RecordReader, Row, relation_cell};
pub use order::{OrderSpec, SortDirection};
pub use path::{Attribute, Join, Target};
pub use predicate::{CompareOp, Junction, Predicate, ResolvedPredicate};
pub use value::{Comparand, Key, Number, Value, ValueKind};
