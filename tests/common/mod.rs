//! Shared fixtures: entities, seed data and store constructors.
#![allow(dead_code, unused_macros)]

use criteria::{Entity, MemoryStore, Repository, Store};

#[derive(Entity, Debug, Clone, PartialEq)]
#[entity(table = "countries")]
pub struct Country {
    #[entity(id)]
    pub id: i64,
    pub code: String,
}

#[derive(Entity, Debug, Clone, PartialEq)]
#[entity(table = "customers")]
pub struct Customer {
    #[entity(id)]
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
    pub active: bool,
    #[entity(relation)]
    pub country: Option<Country>,
}

#[derive(Entity, Debug, Clone, PartialEq)]
#[entity(table = "orders")]
pub struct Order {
    #[entity(id)]
    pub id: i64,
    pub total: f64,
    pub note: Option<String>,
    #[entity(relation)]
    pub customer: Box<Customer>,
}

#[derive(Entity, Debug, Clone, PartialEq)]
pub struct Ticket {
    #[entity(id)]
    pub code: String,
    pub title: String,
    #[entity(column = "priority_level")]
    pub priority: u8,
}

#[derive(Entity, Debug, Clone, PartialEq)]
#[entity(table = "employees")]
pub struct Employee {
    #[entity(id)]
    pub id: i64,
    pub name: String,
    #[entity(relation, column = "manager")]
    pub manager: Option<Box<Employee>>,
}

pub fn country(id: i64, code: &str) -> Country {
    Country {
        id,
        code: code.into(),
    }
}

const CUSTOMERS: [(i64, &str, Option<i32>, bool, Option<i64>); 10] = [
    (1, "Alice", Some(34), true, Some(1)),
    (2, "Bruno", Some(27), false, Some(1)),
    (3, "Carla", None, true, Some(2)),
    (4, "Diego", Some(45), true, Some(2)),
    (5, "Elena", Some(19), false, None),
    (6, "Fabio", Some(52), true, Some(3)),
    (7, "Gaia", Some(38), true, Some(3)),
    (8, "Hugo", None, false, None),
    (9, "Ines", Some(23), true, Some(1)),
    (10, "Joao", Some(61), false, Some(2)),
];

const ORDERS: [(i64, f64, Option<&str>, i64); 5] = [
    (1, 120.5, Some("gift"), 1),
    (2, 35.0, None, 1),
    (3, 99.99, Some("rush"), 4),
    (4, 250.0, None, 6),
    (5, 12.0, Some("gift wrap"), 9),
];

pub fn countries() -> Vec<Country> {
    vec![country(1, "PT"), country(2, "ES"), country(3, "FR")]
}

pub fn customers() -> Vec<Customer> {
    let countries = countries();
    CUSTOMERS
        .iter()
        .map(|&(id, name, age, active, country)| Customer {
            id,
            name: name.into(),
            age,
            active,
            country: country.map(|id| countries[(id - 1) as usize].clone()),
        })
        .collect()
}

pub fn orders() -> Vec<Order> {
    let customers = customers();
    ORDERS
        .iter()
        .map(|&(id, total, note, customer)| Order {
            id,
            total,
            note: note.map(Into::into),
            customer: Box::new(customers[(customer - 1) as usize].clone()),
        })
        .collect()
}

/// Inserts every fixture entity.
pub fn seed<S: Store>(store: &S) {
    let countries = Repository::<Country, _>::new(store);
    for entity in self::countries() {
        countries.insert(&entity).unwrap();
    }
    let customers = Repository::<Customer, _>::new(store);
    for entity in self::customers() {
        customers.insert(&entity).unwrap();
    }
    let orders = Repository::<Order, _>::new(store);
    for entity in self::orders() {
        orders.insert(&entity).unwrap();
    }
}

pub fn ids<E: Entity>(entities: &[E]) -> Vec<i64> {
    entities
        .iter()
        .map(|entity| match entity.id() {
            criteria::Value::Integer(id) => id,
            other => panic!("unexpected id {other}"),
        })
        .collect()
}

pub fn blank_memory_store() -> MemoryStore {
    MemoryStore::new()
}

pub fn memory_store() -> MemoryStore {
    let store = blank_memory_store();
    seed(&store);
    store
}

#[cfg(feature = "rusqlite")]
pub fn blank_sqlite_store() -> criteria::SqliteStore {
    let store = criteria::SqliteStore::in_memory().unwrap();
    store.create_table::<Country>().unwrap();
    store.create_table::<Customer>().unwrap();
    store.create_table::<Order>().unwrap();
    store.create_table::<Ticket>().unwrap();
    store.create_table::<Employee>().unwrap();
    store
}

#[cfg(feature = "rusqlite")]
pub fn sqlite_store() -> criteria::SqliteStore {
    let store = blank_sqlite_store();
    seed(&store);
    store
}

/// Runs each generic `fn(&impl Store)` against a seeded memory store and,
/// with `rusqlite`, a seeded SQLite store.
macro_rules! store_tests {
    ($($name:ident),* $(,)?) => {
        mod memory {
            $(
                #[test]
                fn $name() {
                    super::$name(&$crate::common::memory_store());
                }
            )*
        }

        #[cfg(feature = "rusqlite")]
        mod sqlite {
            $(
                #[test]
                fn $name() {
                    super::$name(&$crate::common::sqlite_store());
                }
            )*
        }
    };
}
