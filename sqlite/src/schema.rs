//! Table definitions derived from entity models.

use criteria_core::{EntityModel, FieldKind, ValueKind};

use crate::Statement;
use crate::sql::{Sql, Token};

/// SQLite column type for a value kind. Booleans are stored as integers.
pub const fn column_type(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Integer | ValueKind::Boolean => "INTEGER",
        ValueKind::Real => "REAL",
        ValueKind::Text => "TEXT",
    }
}

/// `CREATE TABLE IF NOT EXISTS` for `model`.
///
/// Relation columns take the type of the target's primary key and reference it.
pub fn create_table(model: &'static EntityModel) -> Statement {
    let columns = model.fields.iter().enumerate().map(|(index, field)| {
        let mut column = Sql::ident(field.column).append(Sql::raw(column_type(field.value_kind())));
        if index == model.primary_key {
            column = column.push(Token::PRIMARY).push(Token::KEY);
        }
        if !field.nullable() {
            column = column.push(Token::NOT).push(Token::NULL);
        }
        if let FieldKind::Relation { target, .. } = field.kind {
            let target = target();
            column = column
                .push(Token::REFERENCES)
                .append(Sql::ident(target.table))
                .append(Sql::ident(target.id_field().column).parens());
        }
        column
    });

    Sql::token(Token::CREATE)
        .push(Token::TABLE)
        .push(Token::IF)
        .push(Token::NOT)
        .push(Token::EXISTS)
        .append(Sql::ident(model.table))
        .append(Sql::join(columns, Token::COMMA).parens())
        .build()
}
