//! Row writes: `INSERT`, upsert and `DELETE`.

use criteria_core::{EntityModel, Row, Value};

use crate::Statement;
use crate::sql::{Sql, Token};

fn column_list(model: &'static EntityModel) -> Sql {
    Sql::join(
        model.fields.iter().map(|field| Sql::ident(field.column)),
        Token::COMMA,
    )
    .parens()
}

fn insert_sql(row: &Row) -> Sql {
    Sql::token(Token::INSERT)
        .push(Token::INTO)
        .append(Sql::ident(row.model.table))
        .append(column_list(row.model))
        .push(Token::VALUES)
        .append(Sql::join(row.values.iter().cloned().map(Sql::param), Token::COMMA).parens())
}

/// Strict insert; a duplicate primary key is a constraint violation.
pub fn insert(row: &Row) -> Statement {
    insert_sql(row).build()
}

/// Insert, or update every non-key column when the primary key exists.
pub fn upsert(row: &Row) -> Statement {
    let model = row.model;
    let id = model.id_field().column;
    let assignments: Vec<Sql> = model
        .fields
        .iter()
        .filter(|field| field.column != id)
        .map(|field| {
            Sql::ident(field.column)
                .push(Token::EQ)
                .append(Sql::raw("excluded"))
                .push(Token::DOT)
                .append(Sql::ident(field.column))
        })
        .collect();

    let conflict = insert_sql(row)
        .push(Token::ON)
        .push(Token::CONFLICT)
        .append(Sql::ident(id).parens())
        .push(Token::DO);

    if assignments.is_empty() {
        conflict.push(Token::NOTHING).build()
    } else {
        conflict
            .push(Token::UPDATE)
            .push(Token::SET)
            .append(Sql::join(assignments, Token::COMMA))
            .build()
    }
}

pub fn delete(model: &'static EntityModel, id: &Value) -> Statement {
    Sql::token(Token::DELETE)
        .push(Token::FROM)
        .append(Sql::ident(model.table))
        .push(Token::WHERE)
        .append(Sql::ident(model.id_field().column))
        .push(Token::EQ)
        .append(Sql::param(id.clone()))
        .build()
}
