//! Hand-written entities shared by the unit tests: `Order -> Customer -> Country`.

use crate::conversions::Column;
use crate::error::RecordError;
use crate::model::{Entity, EntityModel, FieldModel, Record, relation_cell};
use crate::value::ValueKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub id: i64,
    pub code: String,
}

impl Country {
    pub fn new(id: i64, code: &str) -> Self {
        Self {
            id,
            code: code.to_owned(),
        }
    }
}

static COUNTRY_FIELDS: [FieldModel; 2] = [
    FieldModel::scalar("id", "id", ValueKind::Integer, false),
    FieldModel::scalar("code", "code", ValueKind::Text, false),
];

static COUNTRY: EntityModel = EntityModel {
    name: "Country",
    table: "countries",
    primary_key: 0,
    fields: &COUNTRY_FIELDS,
};

impl Entity for Country {
    fn model() -> &'static EntityModel {
        &COUNTRY
    }

    fn to_record(&self) -> Record {
        Record::new(
            Self::model(),
            vec![self.id.to_value().into(), self.code.to_value().into()],
        )
    }

    fn from_record(record: Record) -> Result<Self, RecordError> {
        let mut reader = record.reader(Self::model())?;
        Ok(Self {
            id: reader.value("id")?,
            code: reader.value("code")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
    pub active: bool,
    pub country: Option<Country>,
}

static CUSTOMER_FIELDS: [FieldModel; 5] = [
    FieldModel::scalar("id", "id", ValueKind::Integer, false),
    FieldModel::scalar("name", "name", ValueKind::Text, false),
    FieldModel::scalar("age", "age", ValueKind::Integer, true),
    FieldModel::scalar("active", "active", ValueKind::Boolean, false),
    FieldModel::relation("country", "country_id", Country::model, true),
];

static CUSTOMER: EntityModel = EntityModel {
    name: "Customer",
    table: "customers",
    primary_key: 0,
    fields: &CUSTOMER_FIELDS,
};

impl Entity for Customer {
    fn model() -> &'static EntityModel {
        &CUSTOMER
    }

    fn to_record(&self) -> Record {
        Record::new(
            Self::model(),
            vec![
                self.id.to_value().into(),
                self.name.to_value().into(),
                self.age.to_value().into(),
                self.active.to_value().into(),
                relation_cell(self.country.as_ref()),
            ],
        )
    }

    fn from_record(record: Record) -> Result<Self, RecordError> {
        let mut reader = record.reader(Self::model())?;
        Ok(Self {
            id: reader.value("id")?,
            name: reader.value("name")?,
            age: reader.value("age")?,
            active: reader.value("active")?,
            country: reader.optional_relation("country")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub total: f64,
    pub note: Option<String>,
    pub customer: Customer,
}

static ORDER_FIELDS: [FieldModel; 4] = [
    FieldModel::scalar("id", "id", ValueKind::Integer, false),
    FieldModel::scalar("total", "total", ValueKind::Real, false),
    FieldModel::scalar("note", "note", ValueKind::Text, true),
    FieldModel::relation("customer", "customer_id", Customer::model, false),
];

static ORDER: EntityModel = EntityModel {
    name: "Order",
    table: "orders",
    primary_key: 0,
    fields: &ORDER_FIELDS,
};

impl Entity for Order {
    fn model() -> &'static EntityModel {
        &ORDER
    }

    fn to_record(&self) -> Record {
        Record::new(
            Self::model(),
            vec![
                self.id.to_value().into(),
                self.total.to_value().into(),
                self.note.to_value().into(),
                relation_cell(Some(&self.customer)),
            ],
        )
    }

    fn from_record(record: Record) -> Result<Self, RecordError> {
        let mut reader = record.reader(Self::model())?;
        Ok(Self {
            id: reader.value("id")?,
            total: reader.value("total")?,
            note: reader.value("note")?,
            customer: reader.relation("customer")?,
        })
    }
}
