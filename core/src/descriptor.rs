//! Storage-independent query descriptors handed to storage engines.

use crate::model::EntityModel;
use crate::order::SortDirection;
use crate::path::{Attribute, Join};
use crate::predicate::ResolvedPredicate;

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub attribute: Attribute,
    pub direction: SortDirection,
}

/// Resolved data query: filters plus sort keys over one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    pub entity: &'static EntityModel,
    pub filters: Vec<ResolvedPredicate>,
    pub orders: Vec<SortKey>,
}

impl QueryDescriptor {
    /// Every row of `entity`, in storage order.
    pub fn all(entity: &'static EntityModel) -> Self {
        Self {
            entity,
            filters: Vec::new(),
            orders: Vec::new(),
        }
    }

    /// Distinct join steps in first-use order, filters before sort keys.
    pub fn joins(&self) -> Vec<&Join> {
        let mut joins = Vec::new();
        for predicate in &self.filters {
            predicate.for_each_attribute(&mut |attribute| collect_joins(&mut joins, attribute));
        }
        for order in &self.orders {
            collect_joins(&mut joins, &order.attribute);
        }
        joins
    }
}

/// Resolved count query. Carries the same filters as its data query.
#[derive(Debug, Clone, PartialEq)]
pub struct CountDescriptor {
    pub entity: &'static EntityModel,
    pub filters: Vec<ResolvedPredicate>,
}

impl CountDescriptor {
    pub fn joins(&self) -> Vec<&Join> {
        let mut joins = Vec::new();
        for predicate in &self.filters {
            predicate.for_each_attribute(&mut |attribute| collect_joins(&mut joins, attribute));
        }
        joins
    }
}

impl From<&QueryDescriptor> for CountDescriptor {
    fn from(query: &QueryDescriptor) -> Self {
        Self {
            entity: query.entity,
            filters: query.filters.clone(),
        }
    }
}

fn collect_joins<'a>(joins: &mut Vec<&'a Join>, attribute: &'a Attribute) {
    for join in attribute.joins() {
        if !joins.iter().any(|known| known.path == join.path) {
            joins.push(join);
        }
    }
}

/// Slice of the ordered result set to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub offset: u64,
    /// `None` fetches everything after `offset`
    pub limit: Option<u64>,
}

impl Window {
    pub const ALL: Self = Self {
        offset: 0,
        limit: None,
    };

    pub const fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    pub const fn first(n: u64) -> Self {
        Self::new(0, n)
    }

    /// Applies the window to an already ordered sequence.
    pub fn apply<T>(self, items: impl IntoIterator<Item = T>) -> impl Iterator<Item = T> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        items.into_iter().skip(skip).take(take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_slices_in_order() {
        let page: Vec<_> = Window::new(2, 3).apply(1..=10).collect();
        assert_eq!(page, [3, 4, 5]);

        let tail: Vec<_> = Window { offset: 8, limit: None }.apply(1..=10).collect();
        assert_eq!(tail, [9, 10]);

        assert_eq!(Window::new(20, 3).apply(1..=10).count(), 0);
        assert_eq!(Window::first(0).apply(1..=10).count(), 0);
    }
}
