//! In-process relational store.
//!
//! Tables are keyed by primary key, so storage order is key order. Writes
//! check `NOT NULL` and foreign keys the way SQLite does with
//! `foreign_keys` enabled, and descriptors are evaluated with the reference
//! semantics of [`criteria_core::eval`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use criteria_core::{
    Attribute, AttributeSource, CountDescriptor, EntityModel, Key, QueryDescriptor, Row, Value,
    Window,
};

use super::{Session, Store, StoreError, row_key};

/// Thread-safe in-memory store. Sessions are serialised through a mutex.
///
/// ```
/// use criteria::{MemoryStore, Repository};
/// # use criteria::Entity;
/// # #[derive(Entity, Debug, PartialEq)]
/// # struct Tag {
/// #     #[entity(id)]
/// #     id: i64,
/// #     label: String,
/// # }
///
/// let store = MemoryStore::new();
/// let tags = Repository::<Tag, _>::new(&store);
/// tags.insert(&Tag { id: 1, label: "rust".into() })?;
/// assert_eq!(tags.count_all()?, 1);
/// # Ok::<(), criteria::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn with_session<R>(&self, f: impl FnOnce(&mut dyn Session) -> crate::Result<R>) -> crate::Result<R> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| StoreError::Poisoned("memory"))?;
        criteria_core::criteria_trace_session!("acquire", "memory");
        let result = f(&mut *tables);
        criteria_core::criteria_trace_session!("release", "memory");
        result
    }
}

#[derive(Debug)]
struct Table {
    model: &'static EntityModel,
    rows: BTreeMap<Key, Vec<Value>>,
}

#[derive(Debug, Default)]
struct Tables {
    tables: HashMap<&'static str, Table>,
}

impl Tables {
    fn rows(&self, model: &EntityModel) -> impl Iterator<Item = &[Value]> {
        self.tables
            .get(model.table)
            .into_iter()
            .flat_map(|table| table.rows.values().map(Vec::as_slice))
    }

    fn get(&self, model: &EntityModel, key: &Key) -> Option<&[Value]> {
        self.tables
            .get(model.table)
            .and_then(|table| table.rows.get(key))
            .map(Vec::as_slice)
    }

    /// Checks `NOT NULL` and references of `row`, returning its key.
    fn check(&self, row: &Row) -> Result<Key, StoreError> {
        let model = row.model;
        let key = row_key(row)?;

        for (field, value) in model.fields.iter().zip(&row.values) {
            if value.is_null() {
                if !field.nullable() {
                    return Err(StoreError::NotNull {
                        entity: model.name,
                        field: field.name,
                    });
                }
                continue;
            }

            let Some(target) = field.target() else {
                continue;
            };
            let referenced = Key::coerce(value, target.id_kind());
            let exists = match &referenced {
                Some(fk) if target.table == model.table && *fk == key => true,
                Some(fk) => self.get(target, fk).is_some(),
                None => false,
            };
            if !exists {
                return Err(StoreError::ForeignKey {
                    entity: model.name,
                    field: field.name,
                    key: value.to_string(),
                });
            }
        }

        Ok(key)
    }

    /// Fails when any other stored row references `key` of `model`.
    fn check_unreferenced(&self, model: &EntityModel, key: &Key) -> Result<(), StoreError> {
        for table in self.tables.values() {
            for (index, field) in table.model.fields.iter().enumerate() {
                let referenced = field.target().is_some_and(|target| target.table == model.table);
                if !referenced {
                    continue;
                }
                let is_referenced = table.rows.iter().any(|(own, values)| {
                    let self_reference = table.model.table == model.table && own == key;
                    !self_reference
                        && values
                            .get(index)
                            .and_then(|value| Key::coerce(value, model.id_kind()))
                            .is_some_and(|fk| fk == *key)
                });
                if is_referenced {
                    return Err(StoreError::ForeignKey {
                        entity: table.model.name,
                        field: field.name,
                        key: key.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn table_mut(&mut self, model: &'static EntityModel) -> &mut Table {
        self.tables.entry(model.table).or_insert_with(|| Table {
            model,
            rows: BTreeMap::new(),
        })
    }
}

/// A stored row seen through its references.
struct Linked<'a> {
    tables: &'a Tables,
    values: &'a [Value],
}

impl AttributeSource for Linked<'_> {
    fn attribute(&self, attribute: &Attribute) -> Value {
        let mut values = self.values;
        for join in attribute.joins() {
            let next = join
                .from
                .field_index(join.field.name)
                .and_then(|index| values.get(index))
                .and_then(|value| Key::coerce(value, join.to.id_kind()))
                .and_then(|key| self.tables.get(join.to, &key));
            match next {
                Some(next) => values = next,
                None => return Value::Null,
            }
        }
        values.get(attribute.index()).cloned().unwrap_or(Value::Null)
    }
}

impl Session for Tables {
    fn select(&mut self, query: &QueryDescriptor, window: Window) -> Result<Vec<Row>, StoreError> {
        let tables = &*self;
        let mut matched: Vec<Linked<'_>> = tables
            .rows(query.entity)
            .map(|values| Linked { tables, values })
            .filter(|row| query.matches(row))
            .collect();
        // stable, so ties stay in key order
        matched.sort_by(|a, b| query.compare(a, b));

        Ok(window
            .apply(matched)
            .map(|row| Row::new(query.entity, row.values.to_vec()))
            .collect())
    }

    fn count(&mut self, query: &CountDescriptor) -> Result<u64, StoreError> {
        let tables = &*self;
        let count = tables
            .rows(query.entity)
            .filter(|values| query.matches(&Linked { tables, values: *values }))
            .count();
        Ok(count as u64)
    }

    fn find(&mut self, model: &'static EntityModel, id: &Value) -> Result<Option<Row>, StoreError> {
        Ok(Key::coerce(id, model.id_kind())
            .and_then(|key| self.get(model, &key))
            .map(|values| Row::new(model, values.to_vec())))
    }

    fn persist(&mut self, row: Row) -> Result<(), StoreError> {
        let key = self.check(&row)?;
        let table = self.table_mut(row.model);
        if table.rows.contains_key(&key) {
            return Err(StoreError::DuplicateKey {
                entity: row.model.name,
                key: key.to_string(),
            });
        }
        table.rows.insert(key, row.values);
        Ok(())
    }

    fn merge(&mut self, row: Row) -> Result<(), StoreError> {
        let key = self.check(&row)?;
        self.table_mut(row.model).rows.insert(key, row.values);
        Ok(())
    }

    fn remove(&mut self, model: &'static EntityModel, id: &Value) -> Result<(), StoreError> {
        let Some(key) = Key::coerce(id, model.id_kind()) else {
            return Ok(());
        };
        self.check_unreferenced(model, &key)?;
        if let Some(table) = self.tables.get_mut(model.table) {
            table.rows.remove(&key);
        }
        Ok(())
    }
}
