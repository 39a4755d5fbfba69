//! In-process evaluation of descriptors.
//!
//! These are the reference semantics every storage engine follows. They
//! agree with SQLite running with `case_sensitive_like` enabled: `NULL`
//! operands never match, comparisons use the attribute's affinity (see
//! [`Value::compare`]) and `LIKE` is case-sensitive.

use core::cmp::Ordering;

use crate::descriptor::{CountDescriptor, QueryDescriptor, SortKey};
use crate::model::{Cell, Record};
use crate::order::SortDirection;
use crate::path::{Attribute, Target};
use crate::predicate::{Junction, Predicate, ResolvedPredicate};
use crate::value::Value;

/// Anything that can produce the value of a resolved attribute.
///
/// Relations that are missing along the attribute's joins yield `NULL`.
pub trait AttributeSource {
    fn attribute(&self, attribute: &Attribute) -> Value;
}

impl<T: AttributeSource + ?Sized> AttributeSource for &T {
    fn attribute(&self, attribute: &Attribute) -> Value {
        (**self).attribute(attribute)
    }
}

impl AttributeSource for Record {
    fn attribute(&self, attribute: &Attribute) -> Value {
        let mut record = self;
        for join in attribute.joins() {
            match record.cell(join.field.name) {
                Some(Cell::Relation(Some(next))) => record = next,
                _ => return Value::Null,
            }
        }

        match attribute.target() {
            Target::Root => record.id(),
            Target::Field { .. } => record
                .cells()
                .get(attribute.index())
                .cloned()
                .map_or(Value::Null, Cell::into_value),
        }
    }
}

/// Whether `source` satisfies `predicate`.
pub fn evaluate<S: AttributeSource + ?Sized>(predicate: &ResolvedPredicate, source: &S) -> bool {
    let equals = |attribute: &Attribute, value: &Value| {
        source.attribute(attribute).compare(value) == Some(Ordering::Equal)
    };

    match predicate {
        Predicate::Equal { attribute, value } => equals(attribute, value),
        Predicate::NotEqual { attribute, value } => source
            .attribute(attribute)
            .compare(value)
            .is_some_and(Ordering::is_ne),
        Predicate::IsTrue(attribute) => equals(attribute, &Value::Integer(1)),
        Predicate::IsFalse(attribute) => equals(attribute, &Value::Integer(0)),
        Predicate::IsNull(attribute) => source.attribute(attribute).is_null(),
        Predicate::IsNotNull(attribute) => !source.attribute(attribute).is_null(),
        Predicate::Compare {
            attribute,
            op,
            value,
        } => source
            .attribute(attribute)
            .compare(&value.to_value())
            .is_some_and(|ordering| op.accepts(ordering)),
        Predicate::Between {
            attribute,
            low,
            high,
        } => {
            let actual = source.attribute(attribute);
            actual.compare(&low.to_value()).is_some_and(Ordering::is_ge)
                && actual.compare(&high.to_value()).is_some_and(Ordering::is_le)
        }
        Predicate::In { attribute, values } => {
            let actual = source.attribute(attribute);
            values
                .iter()
                .any(|value| actual.compare(value) == Some(Ordering::Equal))
        }
        Predicate::Like { attribute, pattern } => source
            .attribute(attribute)
            .to_text()
            .is_some_and(|text| like_matches(pattern, &text)),
        Predicate::Group {
            junction,
            predicates,
        } => match junction {
            Junction::And => predicates.iter().all(|p| evaluate(p, source)),
            Junction::Or => predicates.iter().any(|p| evaluate(p, source)),
        },
    }
}

/// SQL `LIKE` with `%` (any run) and `_` (one character), case-sensitive.
pub fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // position of the last `%` and the text index it currently absorbs up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some('_') => {
                p += 1;
                t += 1;
            }
            Some(c) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}

/// Orders two sources by `keys`, first key first.
pub fn compare_by<S: AttributeSource + ?Sized>(keys: &[SortKey], a: &S, b: &S) -> Ordering {
    keys.iter()
        .map(|key| {
            let ordering = a
                .attribute(&key.attribute)
                .sort_cmp(&b.attribute(&key.attribute));
            match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl QueryDescriptor {
    pub fn matches<S: AttributeSource + ?Sized>(&self, source: &S) -> bool {
        self.filters.iter().all(|filter| evaluate(filter, source))
    }

    pub fn compare<S: AttributeSource + ?Sized>(&self, a: &S, b: &S) -> Ordering {
        compare_by(&self.orders, a, b)
    }
}

impl CountDescriptor {
    pub fn matches<S: AttributeSource + ?Sized>(&self, source: &S) -> bool {
        self.filters.iter().all(|filter| evaluate(filter, source))
    }
}
