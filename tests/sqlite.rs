#![cfg(feature = "rusqlite")]
//! SQLite store specifics and parity with the in-memory reference store.

#[macro_use]
mod common;

use common::{Country, Customer, Order};
use criteria::{Condition, Config, OrderSpec, Repository, SqliteStore, Value, Window};

#[test]
fn rendered_query_joins_each_path_once() {
    let query = Condition::<Order>::new(false)
        .equal("customer.country.code", "PT")
        .is_true("customer.active")
        .generate(&[OrderSpec::desc("customer.name")])
        .unwrap();
    let statement = criteria::sqlite::select(&query, Window::new(0, 5));

    assert_eq!(
        statement.sql,
        concat!(
            r#"SELECT "orders"."id", "orders"."total", "orders"."note", "orders"."customer_id" "#,
            r#"FROM "orders" "#,
            r#"LEFT JOIN "customers" AS "t0" ON "t0"."id" = "orders"."customer_id" "#,
            r#"LEFT JOIN "countries" AS "t1" ON "t1"."id" = "t0"."country_id" "#,
            r#"WHERE "t1"."code" = ? AND "t0"."active" = 1 "#,
            r#"ORDER BY "t0"."name" DESC, "orders"."id" ASC LIMIT ? OFFSET ?"#
        )
    );
    assert_eq!(statement.params.len(), 3);
}

#[test]
fn file_backed_store_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("criteria.db");
    let config = Config::from_toml(&format!(
        "[sqlite]\npath = {:?}\nbusy_timeout_ms = 100\n",
        path.display().to_string()
    ))
    .unwrap();

    {
        let store = SqliteStore::open(&config.sqlite).unwrap();
        store.create_table::<Country>().unwrap();
        let countries = Repository::<Country, _>::with_config(&store, config.repository);
        countries.save(&common::country(1, "PT")).unwrap();
    }

    let store = SqliteStore::open(&config.sqlite).unwrap();
    let countries = Repository::<Country, _>::new(&store);
    assert_eq!(countries.find_by_id(1).unwrap().code, "PT");
}

#[test]
fn case_insensitive_like_when_configured() {
    let config = criteria::SqliteConfig {
        case_sensitive_like: false,
        ..criteria::SqliteConfig::in_memory()
    };
    let store = SqliteStore::open(&config).unwrap();
    store.create_table::<Country>().unwrap();
    store.create_table::<Customer>().unwrap();
    common::seed(&store);

    let repo = Repository::<Customer, _>::new(&store);
    let condition = repo.condition_with_count().like("name", "a");
    // Alice matches once LIKE ignores case
    assert_eq!(repo.count(&condition).unwrap(), 6);
}

/// Every condition must select the same ids, in the same order, with the
/// same count, on both stores.
#[test]
fn stores_agree() {
    let memory = common::memory_store();
    let sqlite = common::sqlite_store();
    let on_memory = Repository::<Customer, _>::new(&memory);
    let on_sqlite = Repository::<Customer, _>::new(&sqlite);

    let cases: Vec<(Condition<Customer>, Vec<OrderSpec>)> = vec![
        (Condition::new(true), vec![]),
        (
            Condition::new(true).greater_than("age", "30", false),
            OrderSpec::parse_all(["-age"]),
        ),
        (
            Condition::new(true).less_than("name", 50, false),
            vec![],
        ),
        (
            Condition::new(true).between("name", "B", "Gz"),
            OrderSpec::parse_all(["-name"]),
        ),
        (
            Condition::new(true).not_equal("age", 34).is_not_null("country"),
            OrderSpec::parse_all(["country.code", "-id"]),
        ),
        (
            Condition::new(true).is_in("country.code", ["ES", "FR"]),
            OrderSpec::parse_all(["country.code", "name"]),
        ),
        (
            Condition::new(true).or(Condition::new(false)
                .like("country.code", "P_")
                .is_false("active")),
            OrderSpec::parse_all(["-active", "age"]),
        ),
        (
            Condition::new(true)
                .and(Condition::new(false).is_true("active"))
                .or(Condition::new(false).is_null("age").greater_than("age", 50, true)),
            vec![],
        ),
        (
            Condition::new(true).equal("country", 2),
            OrderSpec::parse_all(["-name"]),
        ),
        (
            Condition::new(true).equal("", 7),
            vec![],
        ),
    ];

    for (condition, orders) in cases {
        let expected = on_memory.find_page_where(&condition, 1, 4, &orders).unwrap();
        let actual = on_sqlite.find_page_where(&condition, 1, 4, &orders).unwrap();
        assert_eq!(
            common::ids(actual.results()),
            common::ids(expected.results()),
            "{condition:?} {orders:?}"
        );
        assert_eq!(actual.total_count(), expected.total_count(), "{condition:?}");

        let all_memory = on_memory.find_all_where(&condition, &orders).unwrap();
        let all_sqlite = on_sqlite.find_all_where(&condition, &orders).unwrap();
        assert_eq!(all_sqlite, all_memory, "{condition:?} {orders:?}");
    }
}

/// Primary key lookups apply the same column affinity on both stores.
#[test]
fn stores_agree_on_lookups() {
    let memory = common::memory_store();
    let sqlite = common::sqlite_store();
    let on_memory = Repository::<Customer, _>::new(&memory);
    let on_sqlite = Repository::<Customer, _>::new(&sqlite);

    let ids = [
        Value::Integer(1),
        Value::from("1"),
        Value::from("10"),
        Value::Real(4.0),
        Value::Real(4.5),
        Value::from("x"),
        Value::Integer(42),
    ];
    for id in ids {
        let expected = on_memory.exists_by_id(id.clone()).unwrap();
        let actual = on_sqlite.exists_by_id(id.clone()).unwrap();
        assert_eq!(actual, expected, "{id:?}");

        if expected {
            assert_eq!(
                on_sqlite.find_by_id(id.clone()).unwrap(),
                on_memory.find_by_id(id).unwrap()
            );
        }
    }
    assert!(on_memory.exists_by_id("10").unwrap());
    assert!(!on_memory.exists_by_id(4.5).unwrap());
}
