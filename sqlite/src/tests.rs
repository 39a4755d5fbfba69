//! Entities used by the rendering tests. Only their models matter here.

use criteria_core::{Entity, EntityModel, FieldModel, Record, RecordError, ValueKind};

macro_rules! model_only {
    ($name:ident, $model:ident) => {
        pub struct $name;

        impl Entity for $name {
            fn model() -> &'static EntityModel {
                &$model
            }

            fn to_record(&self) -> Record {
                Record::new(&$model, Vec::new())
            }

            fn from_record(record: Record) -> Result<Self, RecordError> {
                record.reader(&$model).map(|_| $name)
            }
        }
    };
}

static COUNTRY: EntityModel = EntityModel {
    name: "Country",
    table: "countries",
    primary_key: 0,
    fields: &[
        FieldModel::scalar("id", "id", ValueKind::Integer, false),
        FieldModel::scalar("code", "code", ValueKind::Text, false),
    ],
};

static CUSTOMER: EntityModel = EntityModel {
    name: "Customer",
    table: "customers",
    primary_key: 0,
    fields: &[
        FieldModel::scalar("id", "id", ValueKind::Integer, false),
        FieldModel::scalar("name", "name", ValueKind::Text, false),
        FieldModel::scalar("age", "age", ValueKind::Integer, true),
        FieldModel::scalar("active", "active", ValueKind::Boolean, false),
        FieldModel::relation("country", "country_id", Country::model, true),
    ],
};

static ORDER: EntityModel = EntityModel {
    name: "Order",
    table: "orders",
    primary_key: 0,
    fields: &[
        FieldModel::scalar("id", "id", ValueKind::Integer, false),
        FieldModel::scalar("total", "total", ValueKind::Real, false),
        FieldModel::scalar("note", "note", ValueKind::Text, true),
        FieldModel::relation("customer", "customer_id", Customer::model, false),
    ],
};

static TICKET: EntityModel = EntityModel {
    name: "Ticket",
    table: "tickets",
    primary_key: 0,
    fields: &[
        FieldModel::scalar("code", "code", ValueKind::Text, false),
        FieldModel::scalar("title", "title", ValueKind::Text, false),
    ],
};

model_only!(Country, COUNTRY);
model_only!(Customer, CUSTOMER);
model_only!(Order, ORDER);
model_only!(Ticket, TICKET);
