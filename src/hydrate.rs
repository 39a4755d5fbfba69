//! Relation hydration.
//!
//! Stores return flat [`Row`]s whose relation fields hold foreign keys.
//! [`Hydrator`] loads every referenced row through the same session,
//! recursively, and nests it into a [`Record`] the entity can be built from.

use std::collections::HashMap;

use criteria_core::{Cell, Entity, EntityModel, FieldModel, Key, Record, Row, Value};

use crate::error::{Error, Result};
use crate::store::{Session, StoreError};

/// Loads relations for the rows of one repository operation.
///
/// Referenced rows are cached per operation, so an entity referenced by
/// many rows is read once.
pub(crate) struct Hydrator<'s> {
    session: &'s mut dyn Session,
    max_depth: usize,
    cache: HashMap<(&'static str, Key), Record>,
}

impl<'s> Hydrator<'s> {
    pub(crate) fn new(session: &'s mut dyn Session, max_depth: usize) -> Self {
        Self {
            session,
            max_depth,
            cache: HashMap::new(),
        }
    }

    pub(crate) fn entity<E: Entity>(&mut self, row: Row) -> Result<E> {
        let record = self.record(row, 0)?;
        Ok(E::from_record(record)?)
    }

    pub(crate) fn entities<E: Entity>(&mut self, rows: Vec<Row>) -> Result<Vec<E>> {
        rows.into_iter().map(|row| self.entity(row)).collect()
    }

    fn record(&mut self, row: Row, depth: usize) -> Result<Record> {
        let model = row.model;
        let mut cells = Vec::with_capacity(model.fields.len());

        for (field, value) in model.fields.iter().zip(row.values) {
            let Some(target) = field.target() else {
                cells.push(Cell::Value(value));
                continue;
            };
            if value.is_null() {
                cells.push(Cell::Relation(None));
                continue;
            }
            if depth >= self.max_depth {
                return Err(Error::RelationDepthExceeded {
                    entity: model.name,
                    max_depth: self.max_depth,
                });
            }

            let related = self.load(model, field, target, value, depth + 1)?;
            cells.push(Cell::Relation(Some(Box::new(related))));
        }

        Ok(Record::new(model, cells))
    }

    fn load(
        &mut self,
        owner: &'static EntityModel,
        field: &'static FieldModel,
        target: &'static EntityModel,
        id: Value,
        depth: usize,
    ) -> Result<Record> {
        let key = Key::coerce(&id, target.id_kind()).ok_or(StoreError::UnsupportedKey {
            entity: target.name,
            kind: id.kind_name(),
        })?;
        if let Some(record) = self.cache.get(&(target.table, key.clone())) {
            return Ok(record.clone());
        }

        let row = self
            .session
            .find(target, &id)?
            .ok_or_else(|| StoreError::DanglingReference {
                entity: owner.name,
                field: field.name,
                key: key.to_string(),
            })?;
        let record = self.record(row, depth)?;
        self.cache.insert((target.table, key), record.clone());
        Ok(record)
    }
}
