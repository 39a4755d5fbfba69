//! `SELECT` rendering for query, count and lookup descriptors.
//!
//! Joined relations become `LEFT JOIN`s, one per distinct relation path,
//! aliased `t0`, `t1`, ... in first-use order. The root table keeps its own
//! name. Rows are always ordered by the root primary key last, so equal sort
//! keys page deterministically.

use compact_str::{CompactString, format_compact};
use criteria_core::{
    Attribute, CompareOp, CountDescriptor, EntityModel, Join, Junction, Predicate, QueryDescriptor,
    ResolvedPredicate, SortDirection, Value, Window,
};

use crate::Statement;
use crate::sql::{Sql, Token};

/// Table aliases for one statement.
struct Scope<'a> {
    root: &'static EntityModel,
    joins: Vec<&'a Join>,
}

impl<'a> Scope<'a> {
    fn new(root: &'static EntityModel, joins: Vec<&'a Join>) -> Self {
        Self { root, joins }
    }

    fn alias_of(&self, path: &str) -> CompactString {
        match self.joins.iter().position(|join| join.path == path) {
            Some(index) => format_compact!("t{index}"),
            None => self.root.table.into(),
        }
    }

    fn table_of(&self, attribute: &Attribute) -> CompactString {
        match attribute.joins().last() {
            Some(join) => self.alias_of(&join.path),
            None => self.root.table.into(),
        }
    }

    fn column(&self, attribute: &Attribute) -> Sql {
        Sql::column(self.table_of(attribute), attribute.column())
    }

    /// `FROM "root" LEFT JOIN "target" AS "t0" ON "t0"."id" = "root"."fk" ...`
    fn from_clause(&self) -> Sql {
        let mut sql = Sql::token(Token::FROM).append(Sql::ident(self.root.table));
        for (index, join) in self.joins.iter().enumerate() {
            let alias = format_compact!("t{index}");
            let parent = match join.path.rsplit_once('.') {
                Some((parent, _)) => self.alias_of(parent),
                None => self.root.table.into(),
            };
            sql = sql
                .push(Token::LEFT)
                .push(Token::JOIN)
                .append(Sql::ident(join.to.table))
                .push(Token::AS)
                .append(Sql::ident(alias.clone()))
                .push(Token::ON)
                .append(Sql::column(alias, join.to.id_field().column))
                .push(Token::EQ)
                .append(Sql::column(parent, join.field.column));
        }
        sql
    }

    fn predicate(&self, predicate: &ResolvedPredicate) -> Sql {
        match predicate {
            Predicate::Equal { attribute, value } => self.binary(attribute, Token::EQ, value.clone()),
            Predicate::NotEqual { attribute, value } => {
                self.binary(attribute, Token::NE, value.clone())
            }
            Predicate::IsTrue(attribute) => self.column(attribute).push(Token::EQ).append(Sql::raw("1")),
            Predicate::IsFalse(attribute) => self.column(attribute).push(Token::EQ).append(Sql::raw("0")),
            Predicate::IsNull(attribute) => self.column(attribute).push(Token::IS).push(Token::NULL),
            Predicate::IsNotNull(attribute) => self
                .column(attribute)
                .push(Token::IS)
                .push(Token::NOT)
                .push(Token::NULL),
            Predicate::Compare {
                attribute,
                op,
                value,
            } => {
                let token = match op {
                    CompareOp::Greater => Token::GT,
                    CompareOp::GreaterOrEqual => Token::GE,
                    CompareOp::Less => Token::LT,
                    CompareOp::LessOrEqual => Token::LE,
                };
                self.binary(attribute, token, value.to_value())
            }
            Predicate::Between {
                attribute,
                low,
                high,
            } => self
                .column(attribute)
                .push(Token::BETWEEN)
                .append(Sql::param(low.to_value()))
                .push(Token::AND)
                .append(Sql::param(high.to_value())),
            Predicate::In { attribute, values } => self.column(attribute).push(Token::IN).append(
                Sql::join(values.iter().cloned().map(Sql::param), Token::COMMA).parens(),
            ),
            Predicate::Like { attribute, pattern } => self
                .column(attribute)
                .push(Token::LIKE)
                .append(Sql::param(pattern.as_str())),
            Predicate::Group {
                junction,
                predicates,
            } => {
                if predicates.is_empty() {
                    return Sql::raw(if junction.identity() { "1" } else { "0" });
                }
                let separator = match junction {
                    Junction::And => Token::AND,
                    Junction::Or => Token::OR,
                };
                Sql::join(predicates.iter().map(|p| self.predicate(p)), separator).parens()
            }
        }
    }

    fn binary(&self, attribute: &Attribute, op: Token, value: Value) -> Sql {
        self.column(attribute).push(op).append(Sql::param(value))
    }

    fn where_clause(&self, filters: &[ResolvedPredicate]) -> Sql {
        if filters.is_empty() {
            return Sql::empty();
        }
        Sql::token(Token::WHERE).append(Sql::join(
            filters.iter().map(|filter| self.predicate(filter)),
            Token::AND,
        ))
    }
}

fn root_columns(model: &'static EntityModel) -> Sql {
    Sql::join(
        model
            .fields
            .iter()
            .map(|field| Sql::column(model.table, field.column)),
        Token::COMMA,
    )
}

fn window(window: Window) -> Sql {
    if window == Window::ALL {
        return Sql::empty();
    }
    let limit = match window.limit {
        Some(limit) => Sql::param(clamp(limit)),
        None => Sql::raw("-1"),
    };
    Sql::token(Token::LIMIT)
        .append(limit)
        .push(Token::OFFSET)
        .append(Sql::param(clamp(window.offset)))
}

fn clamp(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// `SELECT` of every root column, filtered, ordered and windowed.
pub fn select(query: &QueryDescriptor, slice: Window) -> Statement {
    let scope = Scope::new(query.entity, query.joins());

    let mut keys: Vec<Sql> = query
        .orders
        .iter()
        .map(|key| {
            scope.column(&key.attribute).push(match key.direction {
                SortDirection::Asc => Token::ASC,
                SortDirection::Desc => Token::DESC,
            })
        })
        .collect();
    keys.push(Sql::column(query.entity.table, query.entity.id_field().column).push(Token::ASC));

    Sql::token(Token::SELECT)
        .append(root_columns(query.entity))
        .append(scope.from_clause())
        .append(scope.where_clause(&query.filters))
        .push(Token::ORDER)
        .push(Token::BY)
        .append(Sql::join(keys, Token::COMMA))
        .append(window(slice))
        .build()
}

/// `SELECT COUNT(*)` over the same joins and filters.
pub fn count(query: &CountDescriptor) -> Statement {
    let scope = Scope::new(query.entity, query.joins());
    Sql::token(Token::SELECT)
        .append(Sql::raw("COUNT(*)"))
        .append(scope.from_clause())
        .append(scope.where_clause(&query.filters))
        .build()
}

/// Lookup of one row by primary key.
pub fn find(model: &'static EntityModel, id: &Value) -> Statement {
    Sql::token(Token::SELECT)
        .append(root_columns(model))
        .push(Token::FROM)
        .append(Sql::ident(model.table))
        .push(Token::WHERE)
        .append(Sql::column(model.table, model.id_field().column))
        .push(Token::EQ)
        .append(Sql::param(id.clone()))
        .build()
}
