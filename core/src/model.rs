//! Entity model registry and the record / row representations of entities.
//!
//! Every entity type carries one static [`EntityModel`] describing its table,
//! its primary key and its fields. Path resolution, descriptor evaluation,
//! SQL rendering and relation hydration all work from that model, never from
//! runtime reflection.

use crate::conversions::Column;
use crate::error::RecordError;
use crate::value::{Value, ValueKind};

// =============================================================================
// Registry
// =============================================================================

/// Static description of an entity type.
#[derive(Debug)]
pub struct EntityModel {
    /// Rust type name, used in errors and logs
    pub name: &'static str,
    pub table: &'static str,
    /// Index into `fields` of the primary key
    pub primary_key: usize,
    pub fields: &'static [FieldModel],
}

impl EntityModel {
    pub fn field(&self, name: &str) -> Option<&'static FieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn id_field(&self) -> &'static FieldModel {
        &self.fields[self.primary_key]
    }

    /// Kind of the primary key column.
    pub fn id_kind(&self) -> ValueKind {
        self.id_field().value_kind()
    }
}

impl PartialEq for EntityModel {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other) || (self.name == other.name && self.table == other.table)
    }
}

impl Eq for EntityModel {}

/// Static description of one entity field.
#[derive(Debug, Clone, Copy)]
pub struct FieldModel {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Scalar {
        kind: ValueKind,
        nullable: bool,
    },
    /// Many-to-one reference. The column stores the target's primary key.
    Relation {
        target: fn() -> &'static EntityModel,
        nullable: bool,
    },
}

impl FieldModel {
    pub const fn scalar(
        name: &'static str,
        column: &'static str,
        kind: ValueKind,
        nullable: bool,
    ) -> Self {
        Self {
            name,
            column,
            kind: FieldKind::Scalar { kind, nullable },
        }
    }

    pub const fn relation(
        name: &'static str,
        column: &'static str,
        target: fn() -> &'static EntityModel,
        nullable: bool,
    ) -> Self {
        Self {
            name,
            column,
            kind: FieldKind::Relation { target, nullable },
        }
    }

    #[inline]
    pub const fn is_relation(&self) -> bool {
        matches!(self.kind, FieldKind::Relation { .. })
    }

    #[inline]
    pub const fn nullable(&self) -> bool {
        match self.kind {
            FieldKind::Scalar { nullable, .. } | FieldKind::Relation { nullable, .. } => nullable,
        }
    }

    pub fn target(&self) -> Option<&'static EntityModel> {
        match self.kind {
            FieldKind::Relation { target, .. } => Some(target()),
            FieldKind::Scalar { .. } => None,
        }
    }

    /// Kind of the value stored in this field's column.
    pub fn value_kind(&self) -> ValueKind {
        match self.kind {
            FieldKind::Scalar { kind, .. } => kind,
            FieldKind::Relation { target, .. } => target().id_kind(),
        }
    }
}

impl PartialEq for FieldModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.column == other.column
    }
}

impl Eq for FieldModel {}

// =============================================================================
// Entity
// =============================================================================

/// A persisted entity type.
///
/// Usually implemented with `#[derive(Entity)]`.
pub trait Entity: Sized {
    fn model() -> &'static EntityModel;

    fn to_record(&self) -> Record;

    fn from_record(record: Record) -> Result<Self, RecordError>;

    /// Primary key value.
    fn id(&self) -> Value {
        self.to_record().id()
    }
}

/// Builds the cell of a relation field from the referenced entity.
pub fn relation_cell<E: Entity>(entity: Option<&E>) -> Cell {
    Cell::Relation(entity.map(|entity| Box::new(entity.to_record())))
}

// =============================================================================
// Record
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Value(Value),
    Relation(Option<Box<Record>>),
}

impl Default for Cell {
    fn default() -> Self {
        Self::Value(Value::Null)
    }
}

impl Cell {
    /// Stored form: relations collapse to the referenced primary key.
    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            Self::Relation(Some(record)) => record.id(),
            Self::Relation(None) => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<T> for Cell {
    fn from(value: T) -> Self {
        Self::Value(value.into())
    }
}

/// Hydrated entity: one cell per field in model order, relations nested.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: &'static EntityModel,
    cells: Vec<Cell>,
}

impl Record {
    pub fn new(model: &'static EntityModel, cells: Vec<Cell>) -> Self {
        Self { model, cells }
    }

    #[inline]
    pub fn model(&self) -> &'static EntityModel {
        self.model
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.model
            .field_index(name)
            .and_then(|index| self.cells.get(index))
    }

    pub fn id(&self) -> Value {
        self.cells
            .get(self.model.primary_key)
            .cloned()
            .map_or(Value::Null, Cell::into_value)
    }

    pub fn into_row(self) -> Row {
        Row::new(
            self.model,
            self.cells.into_iter().map(Cell::into_value).collect(),
        )
    }

    /// Field-by-field reader for building an entity of `model` from this record.
    pub fn reader(self, model: &'static EntityModel) -> Result<RecordReader, RecordError> {
        if self.model != model {
            return Err(RecordError::Model {
                expected: model.name,
                found: self.model.name,
            });
        }
        if self.cells.len() != model.fields.len() {
            return Err(RecordError::Arity {
                entity: model.name,
                expected: model.fields.len(),
                found: self.cells.len(),
            });
        }
        Ok(RecordReader {
            model,
            cells: self.cells,
        })
    }
}

/// Moves cells out of a [`Record`] by field name.
#[derive(Debug)]
pub struct RecordReader {
    model: &'static EntityModel,
    cells: Vec<Cell>,
}

impl RecordReader {
    fn take(&mut self, name: &str) -> Result<(&'static FieldModel, Cell), RecordError> {
        let index = self.model.field_index(name);
        match index.and_then(|index| self.cells.get_mut(index).map(|cell| (index, cell))) {
            Some((index, cell)) => Ok((&self.model.fields[index], core::mem::take(cell))),
            None => Err(RecordError::UnknownField {
                entity: self.model.name,
                field: name.to_owned(),
            }),
        }
    }

    pub fn value<T: Column>(&mut self, name: &str) -> Result<T, RecordError> {
        let (field, cell) = self.take(name)?;
        match cell {
            Cell::Value(value) => T::from_value(value).map_err(|source| RecordError::Value {
                entity: self.model.name,
                field: field.name,
                source,
            }),
            Cell::Relation(_) => Err(RecordError::CellKind {
                entity: self.model.name,
                field: field.name,
                expected: "scalar",
            }),
        }
    }

    pub fn relation<E: Entity>(&mut self, name: &str) -> Result<E, RecordError> {
        let entity = self.model.name;
        let field = self.model.field(name).map_or("", |field| field.name);
        self.optional_relation(name)?
            .ok_or(RecordError::MissingRelation { entity, field })
    }

    pub fn optional_relation<E: Entity>(&mut self, name: &str) -> Result<Option<E>, RecordError> {
        let (field, cell) = self.take(name)?;
        match cell {
            Cell::Relation(Some(record)) => E::from_record(*record).map(Some),
            Cell::Relation(None) => Ok(None),
            Cell::Value(_) => Err(RecordError::CellKind {
                entity: self.model.name,
                field: field.name,
                expected: "relation",
            }),
        }
    }
}

// =============================================================================
// Row
// =============================================================================

/// Flat stored form of an entity: one value per field in model order.
/// Relation fields hold the referenced primary key or `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub model: &'static EntityModel,
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(model: &'static EntityModel, values: Vec<Value>) -> Self {
        Self { model, values }
    }

    pub fn id(&self) -> &Value {
        self.values
            .get(self.model.primary_key)
            .unwrap_or(&Value::Null)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.model
            .field_index(name)
            .and_then(|index| self.values.get(index))
    }
}
