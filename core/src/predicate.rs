//! The predicate tree.
//!
//! A [`Predicate`] is generic over how it names its attribute: conditions
//! record raw path strings, descriptors carry resolved [`Attribute`]s.

use core::cmp::Ordering;

use crate::error::PathError;
use crate::path::{self, Attribute};
use crate::value::{Comparand, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl CompareOp {
    pub const fn new(greater: bool, or_equal: bool) -> Self {
        match (greater, or_equal) {
            (true, false) => Self::Greater,
            (true, true) => Self::GreaterOrEqual,
            (false, false) => Self::Less,
            (false, true) => Self::LessOrEqual,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        }
    }

    /// Whether `attribute.cmp(operand)` satisfies the operator.
    pub const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Greater => ordering.is_gt(),
            Self::GreaterOrEqual => ordering.is_ge(),
            Self::Less => ordering.is_lt(),
            Self::LessOrEqual => ordering.is_le(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Junction {
    And,
    Or,
}

impl Junction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Result of an empty group.
    pub const fn identity(self) -> bool {
        matches!(self, Self::And)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<A = String> {
    Equal {
        attribute: A,
        value: Value,
    },
    NotEqual {
        attribute: A,
        value: Value,
    },
    IsTrue(A),
    IsFalse(A),
    IsNull(A),
    IsNotNull(A),
    Compare {
        attribute: A,
        op: CompareOp,
        value: Comparand,
    },
    /// Inclusive range
    Between {
        attribute: A,
        low: Comparand,
        high: Comparand,
    },
    In {
        attribute: A,
        values: Vec<Value>,
    },
    /// `LIKE` pattern, `%` and `_` are wildcards
    Like {
        attribute: A,
        pattern: String,
    },
    Group {
        junction: Junction,
        predicates: Vec<Predicate<A>>,
    },
}

/// A predicate whose paths have been resolved against an entity model.
pub type ResolvedPredicate = Predicate<Attribute>;

impl<A> Predicate<A> {
    /// Rebuilds the tree with every attribute converted by `f`, stopping at the first error.
    pub fn try_map<B, E>(&self, f: &mut impl FnMut(&A) -> Result<B, E>) -> Result<Predicate<B>, E> {
        Ok(match self {
            Self::Equal { attribute, value } => Predicate::Equal {
                attribute: f(attribute)?,
                value: value.clone(),
            },
            Self::NotEqual { attribute, value } => Predicate::NotEqual {
                attribute: f(attribute)?,
                value: value.clone(),
            },
            Self::IsTrue(attribute) => Predicate::IsTrue(f(attribute)?),
            Self::IsFalse(attribute) => Predicate::IsFalse(f(attribute)?),
            Self::IsNull(attribute) => Predicate::IsNull(f(attribute)?),
            Self::IsNotNull(attribute) => Predicate::IsNotNull(f(attribute)?),
            Self::Compare {
                attribute,
                op,
                value,
            } => Predicate::Compare {
                attribute: f(attribute)?,
                op: *op,
                value: value.clone(),
            },
            Self::Between {
                attribute,
                low,
                high,
            } => Predicate::Between {
                attribute: f(attribute)?,
                low: low.clone(),
                high: high.clone(),
            },
            Self::In { attribute, values } => Predicate::In {
                attribute: f(attribute)?,
                values: values.clone(),
            },
            Self::Like { attribute, pattern } => Predicate::Like {
                attribute: f(attribute)?,
                pattern: pattern.clone(),
            },
            Self::Group {
                junction,
                predicates,
            } => Predicate::Group {
                junction: *junction,
                predicates: predicates
                    .iter()
                    .map(|predicate| predicate.try_map(f))
                    .collect::<Result<_, _>>()?,
            },
        })
    }

    /// Visits every attribute in declaration order, depth first.
    pub fn for_each_attribute<'a>(&'a self, f: &mut impl FnMut(&'a A)) {
        match self {
            Self::Equal { attribute, .. }
            | Self::NotEqual { attribute, .. }
            | Self::IsTrue(attribute)
            | Self::IsFalse(attribute)
            | Self::IsNull(attribute)
            | Self::IsNotNull(attribute)
            | Self::Compare { attribute, .. }
            | Self::Between { attribute, .. }
            | Self::In { attribute, .. }
            | Self::Like { attribute, .. } => f(attribute),
            Self::Group { predicates, .. } => {
                for predicate in predicates {
                    predicate.for_each_attribute(f);
                }
            }
        }
    }
}

impl Predicate<String> {
    pub fn resolve(&self, root: &Attribute) -> Result<ResolvedPredicate, PathError> {
        self.try_map(&mut |path: &String| path::resolve(path, root.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_ops_follow_ordering() {
        assert!(CompareOp::new(true, false).accepts(Ordering::Greater));
        assert!(!CompareOp::Greater.accepts(Ordering::Equal));
        assert!(CompareOp::GreaterOrEqual.accepts(Ordering::Equal));
        assert!(CompareOp::new(false, true).accepts(Ordering::Less));
        assert_eq!(CompareOp::LessOrEqual.as_str(), "<=");
    }

    #[test]
    fn attributes_are_visited_in_order() {
        let predicate = Predicate::Group {
            junction: Junction::Or,
            predicates: vec![
                Predicate::IsNull("a".to_owned()),
                Predicate::Group {
                    junction: Junction::And,
                    predicates: vec![Predicate::IsTrue("b".to_owned())],
                },
                Predicate::Like {
                    attribute: "c".to_owned(),
                    pattern: "%x%".into(),
                },
            ],
        };

        let mut seen = Vec::new();
        predicate.for_each_attribute(&mut |path| seen.push(path.as_str()));
        assert_eq!(seen, ["a", "b", "c"]);
    }
}
