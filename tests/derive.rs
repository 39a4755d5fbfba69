//! `#[derive(Entity)]` model registry and record mapping.

#[macro_use]
mod common;

use common::{Country, Customer, Employee, Order, Ticket};
use criteria::{Cell, Entity, FieldKind, Record, RecordError, Value, ValueKind};

#[test]
fn table_and_column_names() {
    assert_eq!(Customer::model().table, "customers");
    assert_eq!(Ticket::model().table, "ticket");

    let columns: Vec<_> = Customer::model().fields.iter().map(|f| f.column).collect();
    assert_eq!(columns, vec!["id", "name", "age", "active", "country_id"]);

    assert_eq!(Ticket::model().field("priority").unwrap().column, "priority_level");
    assert_eq!(Employee::model().field("manager").unwrap().column, "manager");
}

#[test]
fn primary_keys() {
    assert_eq!(Customer::model().primary_key, 0);
    assert_eq!(Ticket::model().id_field().name, "code");
    assert_eq!(Ticket::model().id_kind(), ValueKind::Text);
}

#[test]
fn field_kinds() {
    let model = Customer::model();
    assert!(matches!(
        model.field("age").unwrap().kind,
        FieldKind::Scalar {
            kind: ValueKind::Integer,
            nullable: true
        }
    ));
    assert!(matches!(
        model.field("active").unwrap().kind,
        FieldKind::Scalar {
            kind: ValueKind::Boolean,
            nullable: false
        }
    ));

    let country = model.field("country").unwrap();
    assert!(country.is_relation());
    assert!(country.nullable());
    assert_eq!(country.target(), Some(Country::model()));

    let customer = Order::model().field("customer").unwrap();
    assert!(!customer.nullable());
    assert_eq!(customer.target(), Some(Customer::model()));

    let manager = Employee::model().field("manager").unwrap();
    assert_eq!(manager.target(), Some(Employee::model()));
}

#[test]
fn records_nest_relations() {
    let order = common::orders().remove(0);
    let record = order.to_record();

    assert_eq!(record.id(), Value::Integer(1));
    match record.cell("customer") {
        Some(Cell::Relation(Some(customer))) => {
            assert_eq!(customer.model(), Customer::model());
            assert_eq!(customer.id(), Value::Integer(1));
        }
        other => panic!("unexpected cell {other:?}"),
    }

    let row = record.clone().into_row();
    assert_eq!(row.get("customer"), Some(&Value::Integer(1)));
    assert_eq!(row.get("note"), Some(&Value::from("gift")));

    assert_eq!(Order::from_record(record).unwrap(), order);
}

#[test]
fn missing_relations_are_reported() {
    let mut cells: Vec<Cell> = common::orders().remove(0).to_record().cells().to_vec();
    cells[3] = Cell::Relation(None);
    let err = Order::from_record(Record::new(Order::model(), cells)).unwrap_err();
    assert_eq!(
        err,
        RecordError::MissingRelation {
            entity: "Order",
            field: "customer"
        }
    );
}

#[test]
fn records_of_other_entities_are_rejected() {
    let record = common::country(1, "PT").to_record();
    let err = Customer::from_record(record).unwrap_err();
    assert!(matches!(err, RecordError::Model { expected: "Customer", found: "Country" }));

    let err = Country::from_record(Record::new(Country::model(), vec![Cell::from(1)])).unwrap_err();
    assert!(matches!(err, RecordError::Arity { expected: 2, found: 1, .. }));
}

#[test]
fn wrong_value_kinds_are_reported() {
    let cells = vec![
        Cell::from("T-1"),
        Cell::from("title"),
        Cell::from(300),
    ];
    let err = Ticket::from_record(Record::new(Ticket::model(), cells)).unwrap_err();
    assert!(matches!(err, RecordError::Value { field: "priority", .. }));
}

#[test]
fn ids_follow_the_id_field() {
    let ticket = Ticket {
        code: "T-9".into(),
        title: "x".into(),
        priority: 1,
    };
    assert_eq!(ticket.id(), Value::from("T-9"));
}
