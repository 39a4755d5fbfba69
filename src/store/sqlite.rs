//! SQLite store backed by rusqlite.
//!
//! Descriptors and row operations are rendered by `criteria-sqlite` and run
//! on a single connection guarded by a mutex.

use std::sync::Mutex;

use criteria_core::{CountDescriptor, Entity, EntityModel, QueryDescriptor, Row, Value, Window};
use criteria_sqlite::Statement;
use criteria_sqlite::pragma::Pragma;
use rusqlite::{Connection, params_from_iter};

use super::{Session, Store, StoreError};
use crate::config::SqliteConfig;

/// SQLite-backed store.
///
/// ```
/// use criteria::{Entity, Repository, SqliteStore};
///
/// #[derive(Entity, Debug, PartialEq)]
/// #[entity(table = "tags")]
/// struct Tag {
///     #[entity(id)]
///     id: i64,
///     label: String,
/// }
///
/// let store = SqliteStore::in_memory()?;
/// store.create_table::<Tag>()?;
///
/// let tags = Repository::<Tag, _>::new(&store);
/// tags.save(&Tag { id: 1, label: "rust".into() })?;
/// assert!(tags.exists_by_id(1)?);
/// # Ok::<(), criteria::Error>(())
/// ```
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens the database described by `config` and applies its pragmas.
    pub fn open(config: &SqliteConfig) -> crate::Result<Self> {
        let conn = match &config.path {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        Self::from_connection(conn, config)
    }

    /// In-memory database with the default configuration.
    pub fn in_memory() -> crate::Result<Self> {
        Self::open(&SqliteConfig::in_memory())
    }

    /// Wraps an open connection, applying the pragmas of `config`.
    pub fn from_connection(conn: Connection, config: &SqliteConfig) -> crate::Result<Self> {
        let pragmas = [
            Pragma::foreign_keys(config.foreign_keys),
            Pragma::case_sensitive_like(config.case_sensitive_like),
            Pragma::busy_timeout(config.busy_timeout_ms),
        ];
        for pragma in pragmas {
            apply(&conn, pragma)?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates the table of `E` when it does not exist yet.
    pub fn create_table<E: Entity>(&self) -> crate::Result<()> {
        self.create_table_for(E::model())
    }

    pub fn create_table_for(&self, model: &'static EntityModel) -> crate::Result<()> {
        let statement = criteria_sqlite::create_table(model);
        let conn = self.lock()?;
        execute(&conn, &statement)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Poisoned("sqlite.rusqlite"))
    }
}

impl Store for SqliteStore {
    fn with_session<R>(&self, f: impl FnOnce(&mut dyn Session) -> crate::Result<R>) -> crate::Result<R> {
        let mut conn = self.lock()?;
        criteria_core::criteria_trace_session!("acquire", "sqlite.rusqlite");
        let result = f(&mut *conn);
        criteria_core::criteria_trace_session!("release", "sqlite.rusqlite");
        result
    }
}

/// Runs a pragma, draining any row it reports back.
fn apply(conn: &Connection, pragma: Pragma) -> rusqlite::Result<()> {
    let sql = pragma.to_string();
    criteria_core::criteria_trace_query!(&sql, 0);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while rows.next()?.is_some() {}
    Ok(())
}

fn execute(conn: &Connection, statement: &Statement) -> rusqlite::Result<usize> {
    criteria_core::criteria_trace_query!(&statement.sql, statement.params.len());
    conn.execute(&statement.sql, params_from_iter(statement.params.iter()))
}

fn query_rows(
    conn: &Connection,
    model: &'static EntityModel,
    statement: &Statement,
) -> rusqlite::Result<Vec<Row>> {
    criteria_core::criteria_trace_query!(&statement.sql, statement.params.len());
    let mut stmt = conn.prepare_cached(&statement.sql)?;
    let width = model.fields.len();
    let rows = stmt.query_map(params_from_iter(statement.params.iter()), |row| {
        (0..width)
            .map(|index| row.get::<_, Value>(index))
            .collect::<rusqlite::Result<Vec<_>>>()
    })?;

    let mut results = Vec::new();
    for values in rows {
        results.push(Row::new(model, values?));
    }
    Ok(results)
}

impl Session for Connection {
    fn select(&mut self, query: &QueryDescriptor, window: Window) -> Result<Vec<Row>, StoreError> {
        let statement = criteria_sqlite::select(query, window);
        Ok(query_rows(self, query.entity, &statement)?)
    }

    fn count(&mut self, query: &CountDescriptor) -> Result<u64, StoreError> {
        let statement = criteria_sqlite::count(query);
        criteria_core::criteria_trace_query!(&statement.sql, statement.params.len());
        let count: i64 = self.query_row(
            &statement.sql,
            params_from_iter(statement.params.iter()),
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn find(&mut self, model: &'static EntityModel, id: &Value) -> Result<Option<Row>, StoreError> {
        let statement = criteria_sqlite::find(model, id);
        Ok(query_rows(self, model, &statement)?.into_iter().next())
    }

    fn persist(&mut self, row: Row) -> Result<(), StoreError> {
        execute(self, &criteria_sqlite::insert(&row))?;
        Ok(())
    }

    fn merge(&mut self, row: Row) -> Result<(), StoreError> {
        execute(self, &criteria_sqlite::upsert(&row))?;
        Ok(())
    }

    fn remove(&mut self, model: &'static EntityModel, id: &Value) -> Result<(), StoreError> {
        execute(self, &criteria_sqlite::delete(model, id))?;
        Ok(())
    }
}
