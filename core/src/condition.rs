//! Fluent condition builder.
//!
//! A [`Condition`] records predicates over field paths of one entity type.
//! Nothing is resolved while chaining; paths are checked against the entity
//! model when the condition generates its descriptors. The data query and
//! the count query are both materialized from the same predicate list, so a
//! count always filters exactly like the query it accompanies.
//!
//! ```ignore
//! let condition = repository
//!     .condition_with_count()
//!     .equal("customer.country.code", "NZ")
//!     .greater_than("total", 100, true)
//!     .or(repository.condition().is_null("note").like("note", "urgent"));
//! let page = repository.find_page_where(&condition, 0, 20, &OrderSpec::parse_all(["-total"]))?;
//! ```

use core::fmt;
use core::marker::PhantomData;

use crate::descriptor::{CountDescriptor, QueryDescriptor, SortKey};
use crate::error::{PathError, QueryError};
use crate::model::Entity;
use crate::order::OrderSpec;
use crate::path::{self, Attribute};
use crate::predicate::{CompareOp, Junction, Predicate, ResolvedPredicate};
use crate::value::{Comparand, Value};

/// Wildcard wrapped around `like` substrings.
pub const LIKE_WILDCARD: char = '%';

pub struct Condition<E> {
    predicates: Vec<Predicate>,
    with_count: bool,
    entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Condition<E> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
            with_count: self.with_count,
            entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for Condition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("entity", &core::any::type_name::<E>())
            .field("with_count", &self.with_count)
            .field("predicates", &self.predicates)
            .finish()
    }
}

impl<E> Condition<E> {
    pub fn new(with_count: bool) -> Self {
        Self {
            predicates: Vec::new(),
            with_count,
            entity: PhantomData,
        }
    }

    #[inline]
    pub const fn with_count(&self) -> bool {
        self.with_count
    }

    #[inline]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    fn push(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn equal(self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Predicate::Equal {
            attribute: path.into(),
            value: value.into(),
        })
    }

    pub fn not_equal(self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Predicate::NotEqual {
            attribute: path.into(),
            value: value.into(),
        })
    }

    pub fn is_true(self, path: impl Into<String>) -> Self {
        self.push(Predicate::IsTrue(path.into()))
    }

    pub fn is_false(self, path: impl Into<String>) -> Self {
        self.push(Predicate::IsFalse(path.into()))
    }

    pub fn is_null(self, path: impl Into<String>) -> Self {
        self.push(Predicate::IsNull(path.into()))
    }

    pub fn is_not_null(self, path: impl Into<String>) -> Self {
        self.push(Predicate::IsNotNull(path.into()))
    }

    /// `path > value`, or `path >= value` when `or_equal` is set.
    ///
    /// Numbers compare by magnitude, strings lexicographically.
    pub fn greater_than(
        self,
        path: impl Into<String>,
        value: impl Into<Comparand>,
        or_equal: bool,
    ) -> Self {
        self.push(Predicate::Compare {
            attribute: path.into(),
            op: CompareOp::new(true, or_equal),
            value: value.into(),
        })
    }

    /// `path < value`, or `path <= value` when `or_equal` is set.
    pub fn less_than(
        self,
        path: impl Into<String>,
        value: impl Into<Comparand>,
        or_equal: bool,
    ) -> Self {
        self.push(Predicate::Compare {
            attribute: path.into(),
            op: CompareOp::new(false, or_equal),
            value: value.into(),
        })
    }

    /// Inclusive range.
    ///
    /// Both bounds are stringified here. The range is numeric when both look
    /// like numbers and lexical otherwise, so `between("age", 5, "x")`
    /// compares `"5"` and `"x"` as text.
    pub fn between(
        self,
        path: impl Into<String>,
        low: impl Into<Comparand>,
        high: impl Into<Comparand>,
    ) -> Self {
        let (low, high) = Comparand::range(low.into().to_string(), high.into().to_string());
        self.push(Predicate::Between {
            attribute: path.into(),
            low,
            high,
        })
    }

    /// Set membership. An empty set matches nothing.
    pub fn is_in<V: Into<Value>>(
        self,
        path: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.push(Predicate::In {
            attribute: path.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Case-sensitive substring match.
    ///
    /// `%` and `_` inside `value` are not escaped and keep their wildcard meaning.
    pub fn like(self, path: impl Into<String>, value: impl AsRef<str>) -> Self {
        let predicate = like(path.into(), value.as_ref());
        self.push(predicate)
    }

    /// Matches when any of `paths` contains `value`.
    ///
    /// Appends a single OR group; with no paths the group matches nothing.
    pub fn disjunction_like<P: Into<String>>(
        self,
        value: impl AsRef<str>,
        paths: impl IntoIterator<Item = P>,
    ) -> Self {
        let value = value.as_ref();
        self.push(Predicate::Group {
            junction: Junction::Or,
            predicates: paths
                .into_iter()
                .map(|path| like(path.into(), value))
                .collect(),
        })
    }

    /// Appends every predicate of `other` as one AND group.
    pub fn and(self, other: Condition<E>) -> Self {
        self.push(Predicate::Group {
            junction: Junction::And,
            predicates: other.predicates,
        })
    }

    /// Appends every predicate of `other` as one OR group.
    pub fn or(self, other: Condition<E>) -> Self {
        self.push(Predicate::Group {
            junction: Junction::Or,
            predicates: other.predicates,
        })
    }
}

impl<E: Entity> Condition<E> {
    fn resolve(&self) -> Result<Vec<ResolvedPredicate>, PathError> {
        let root = Attribute::root(E::model());
        self.predicates
            .iter()
            .map(|predicate| predicate.resolve(&root))
            .collect()
    }

    /// Resolves the data query: every predicate plus `orders`, in declaration order.
    pub fn generate(&self, orders: &[OrderSpec]) -> Result<QueryDescriptor, PathError> {
        let model = E::model();
        let root = Attribute::root(model);
        let orders = orders
            .iter()
            .map(|order| -> Result<SortKey, PathError> {
                Ok(SortKey {
                    attribute: path::resolve(&order.field, root.clone())?,
                    direction: order.direction(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let filters = self.resolve()?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            entity = model.name,
            filters = filters.len(),
            orders = orders.len(),
            "criteria.generate"
        );

        Ok(QueryDescriptor {
            entity: model,
            filters,
            orders,
        })
    }

    /// Resolves the count query carrying the same predicates as [`Self::generate`].
    pub fn generate_count(&self) -> Result<CountDescriptor, QueryError> {
        let model = E::model();
        if !self.with_count {
            return Err(QueryError::NoCountSupport { entity: model.name });
        }
        let filters = self.resolve()?;

        #[cfg(feature = "tracing")]
        tracing::trace!(entity = model.name, filters = filters.len(), "criteria.generate_count");

        Ok(CountDescriptor {
            entity: model,
            filters,
        })
    }
}

fn like(attribute: String, value: &str) -> Predicate {
    Predicate::Like {
        attribute,
        pattern: format!("{LIKE_WILDCARD}{value}{LIKE_WILDCARD}"),
    }
}
