//! Generic repository over any [`Entity`].
//!
//! ```
//! use criteria::{Entity, MemoryStore, OrderSpec, Repository};
//!
//! #[derive(Entity, Debug, Clone, PartialEq)]
//! struct Book {
//!     #[entity(id)]
//!     id: i64,
//!     title: String,
//!     pages: i32,
//! }
//!
//! let store = MemoryStore::new();
//! let books = Repository::<Book, _>::new(&store);
//! for (id, title, pages) in [(1, "Dune", 412), (2, "Emma", 474), (3, "Ulysses", 730)] {
//!     books.insert(&Book { id, title: title.into(), pages })?;
//! }
//!
//! let long = books.condition_with_count().greater_than("pages", 450, false);
//! let page = books.find_page_where(&long, 0, 1, &[OrderSpec::desc("pages")])?;
//! assert_eq!(page.total_count(), 2);
//! assert_eq!(page.results()[0].title, "Ulysses");
//! # Ok::<(), criteria::Error>(())
//! ```

use std::collections::HashSet;
use std::marker::PhantomData;

use criteria_core::{Condition, Entity, EntityModel, Key, OrderSpec, QueryDescriptor, Row, Value, Window};

use crate::config::RepositoryConfig;
use crate::error::{Error, Result};
use crate::hydrate::Hydrator;
use crate::pagination::Pagination;
use crate::store::{Session, Store, row_key};

/// Repository of `E` entities over the store handle `S`.
///
/// `S` is usually a reference or an `Arc` to a [`MemoryStore`](crate::MemoryStore)
/// or [`SqliteStore`](crate::SqliteStore). Every operation runs in exactly one
/// session of the store.
#[derive(Debug)]
pub struct Repository<E, S> {
    store: S,
    config: RepositoryConfig,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: Store> Repository<E, S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, RepositoryConfig::default())
    }

    pub fn with_config(store: S, config: RepositoryConfig) -> Self {
        Self {
            store,
            config,
            _entity: PhantomData,
        }
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn config(&self) -> RepositoryConfig {
        self.config
    }

    // =========================================================================
    // Conditions
    // =========================================================================

    /// Fresh condition on `E`. Count support is fixed here.
    pub fn new_condition(&self, with_count: bool) -> Condition<E> {
        Condition::new(with_count)
    }

    pub fn condition(&self) -> Condition<E> {
        self.new_condition(false)
    }

    pub fn condition_with_count(&self) -> Condition<E> {
        self.new_condition(true)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts or replaces `entity`, then returns the persisted state.
    ///
    /// Related entities are referenced by key only and must already be stored.
    /// Fails with [`Error::CyclicReference`] when the references of `entity`
    /// lead back to it.
    pub fn save(&self, entity: &E) -> Result<E> {
        let model = E::model();
        criteria_core::criteria_trace_op!("save", model.name);
        let row = entity.to_record().into_row();
        let id = row.id().clone();

        self.store.with_session(|session| {
            ensure_acyclic(session, &row)?;
            session.merge(row)?;
            self.load(session, &id)?
                .ok_or(Error::NotFound { entity: model.name })
        })
    }

    /// Inserts `entity`. A stored entity with the same key is a storage error.
    pub fn insert(&self, entity: &E) -> Result<()> {
        criteria_core::criteria_trace_op!("insert", E::model().name);
        let row = entity.to_record().into_row();
        self.store.with_session(|session| {
            ensure_acyclic(session, &row)?;
            Ok(session.persist(row)?)
        })
    }

    pub fn remove(&self, entity: &E) -> Result<()> {
        let model = E::model();
        criteria_core::criteria_trace_op!("remove", model.name);
        let id = entity.id();
        self.store
            .with_session(|session| Ok(session.remove(model, &id)?))
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// The entity with primary key `id`, or [`Error::NotFound`].
    pub fn find_by_id(&self, id: impl Into<Value>) -> Result<E> {
        let id = id.into();
        criteria_core::criteria_trace_op!("find_by_id", E::model().name, id = id);
        self.store
            .with_session(|session| self.load(session, &id))?
            .ok_or(Error::NotFound {
                entity: E::model().name,
            })
    }

    pub fn exists_by_id(&self, id: impl Into<Value>) -> Result<bool> {
        match self.find_by_id(id) {
            Ok(_) => Ok(true),
            Err(Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    // =========================================================================
    // Counts
    // =========================================================================

    pub fn count_all(&self) -> Result<u64> {
        self.count(&self.condition_with_count())
    }

    /// Number of entities matching `condition`.
    ///
    /// Fails with [`Error::NoCountSupport`] when `condition` was built without
    /// count support.
    pub fn count(&self, condition: &Condition<E>) -> Result<u64> {
        criteria_core::criteria_trace_op!("count", E::model().name, predicates = condition.len());
        let count = condition.generate_count()?;
        self.store
            .with_session(|session| Ok(session.count(&count)?))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn find_all(&self, orders: &[OrderSpec]) -> Result<Vec<E>> {
        self.find_all_where(&self.condition(), orders)
    }

    pub fn find_all_where(&self, condition: &Condition<E>, orders: &[OrderSpec]) -> Result<Vec<E>> {
        criteria_core::criteria_trace_op!("find_all", E::model().name, predicates = condition.len());
        let query = condition.generate(orders)?;
        self.fetch(&query, Window::ALL)
    }

    pub fn find_page(&self, offset: i64, limit: i64, orders: &[OrderSpec]) -> Result<Pagination<E>> {
        self.find_page_where(&self.condition_with_count(), offset, limit, orders)
    }

    /// `limit` entities after skipping `offset`, with the total count of the
    /// condition. Both statements run in the same session.
    pub fn find_page_where(
        &self,
        condition: &Condition<E>,
        offset: i64,
        limit: i64,
        orders: &[OrderSpec],
    ) -> Result<Pagination<E>> {
        let entity = E::model().name;
        criteria_core::criteria_trace_op!("find_page", entity, offset = offset, limit = limit);

        if !condition.with_count() {
            return Err(Error::NoCountSupport { entity });
        }
        let (Ok(start), Ok(size)) = (u64::try_from(offset), u64::try_from(limit)) else {
            return Err(Error::InvalidPaginationParams { offset, limit });
        };

        let query = condition.generate(orders)?;
        let count = condition.generate_count()?;
        let window = Window::new(start, size);

        self.store.with_session(|session| {
            let rows = session.select(&query, window)?;
            let total = session.count(&count)?;
            let results = Hydrator::new(session, self.config.max_relation_depth).entities(rows)?;
            Ok(Pagination::new(results, total))
        })
    }

    pub fn find_first_n(&self, n: u64, orders: &[OrderSpec]) -> Result<Vec<E>> {
        self.find_first_n_where(&self.condition(), n, orders)
    }

    /// At most `n` entities, in order.
    pub fn find_first_n_where(
        &self,
        condition: &Condition<E>,
        n: u64,
        orders: &[OrderSpec],
    ) -> Result<Vec<E>> {
        criteria_core::criteria_trace_op!("find_first_n", E::model().name, n = n);
        let query = condition.generate(orders)?;
        self.fetch(&query, Window::first(n))
    }

    pub fn find_first(&self, orders: &[OrderSpec]) -> Result<E> {
        self.find_first_where(&self.condition(), orders)
    }

    /// The first entity in order, or [`Error::NotFound`] when nothing matches.
    pub fn find_first_where(&self, condition: &Condition<E>, orders: &[OrderSpec]) -> Result<E> {
        self.find_first_n_where(condition, 1, orders)?
            .into_iter()
            .next()
            .ok_or(Error::NotFound {
                entity: E::model().name,
            })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn fetch(&self, query: &QueryDescriptor, window: Window) -> Result<Vec<E>> {
        self.store.with_session(|session| {
            let rows = session.select(query, window)?;
            Hydrator::new(session, self.config.max_relation_depth).entities(rows)
        })
    }

    fn load(&self, session: &mut dyn Session, id: &Value) -> Result<Option<E>> {
        match session.find(E::model(), id)? {
            Some(row) => Hydrator::new(session, self.config.max_relation_depth)
                .entity(row)
                .map(Some),
            None => Ok(None),
        }
    }
}

/// Fails when following the stored references of `row` reaches `row` again.
///
/// Stored references never form a cycle; hydration relies on it.
fn ensure_acyclic(session: &mut dyn Session, row: &Row) -> Result<()> {
    let origin = (row.model.table, row_key(row)?);
    let mut visited = HashSet::new();

    for (field, value) in row.model.fields.iter().zip(&row.values) {
        let Some(target) = field.target() else {
            continue;
        };
        let mut pending: Vec<(&'static EntityModel, Value)> = vec![(target, value.clone())];
        while let Some((model, id)) = pending.pop() {
            let Some(key) = Key::coerce(&id, model.id_kind()) else {
                continue;
            };
            let node = (model.table, key);
            if node == origin {
                return Err(Error::CyclicReference {
                    entity: row.model.name,
                    field: field.name,
                    key: origin.1.to_string(),
                });
            }
            if !visited.insert(node) {
                continue;
            }
            let Some(next) = session.find(model, &id)? else {
                continue;
            };
            pending.extend(
                next.model
                    .fields
                    .iter()
                    .zip(next.values)
                    .filter_map(|(field, value)| Some((field.target()?, value))),
            );
        }
    }
    Ok(())
}
