/// One page of results plus the number of entities matching the whole condition.
///
/// Only built by [`Repository::find_page`](crate::Repository::find_page) and
/// [`Repository::find_page_where`](crate::Repository::find_page_where), after
/// both the bounded fetch and the count succeeded.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pagination<T> {
    results: Vec<T>,
    total_count: u64,
}

impl<T> Pagination<T> {
    pub(crate) fn new(results: Vec<T>, total_count: u64) -> Self {
        Self {
            results,
            total_count,
        }
    }

    #[inline]
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Matching entities across all pages.
    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<T> {
        self.results
    }

    pub fn into_parts(self) -> (Vec<T>, u64) {
        (self.results, self.total_count)
    }
}

impl<T> IntoIterator for Pagination<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Pagination<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
