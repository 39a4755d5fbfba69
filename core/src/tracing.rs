//! Tracing utilities for query and session observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site. The `cfg` is evaluated in the calling crate, so the
//! caller needs its own `tracing` feature and dependency.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// criteria_trace_query!(&statement.sql, statement.params.len());
/// ```
#[macro_export]
macro_rules! criteria_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "criteria.query");
    };
}

/// Emit a debug-level tracing event for a repository operation.
///
/// ```ignore
/// criteria_trace_op!("find_page", E::model().name);
/// criteria_trace_op!("find_page", E::model().name, offset = offset, limit = limit);
/// ```
#[macro_export]
macro_rules! criteria_trace_op {
    ($op:literal, $entity:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(op = $op, entity = %$entity, "criteria.repository");
    };
    ($op:literal, $entity:expr, $($field:ident = $value:expr),+ $(,)?) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(op = $op, entity = %$entity, $($field = ?$value),+, "criteria.repository");
    };
}

/// Emit a trace-level tracing event for session lifecycle (acquire, release).
///
/// ```ignore
/// criteria_trace_session!("acquire", "memory");
/// criteria_trace_session!("release", "sqlite.rusqlite");
/// ```
#[macro_export]
macro_rules! criteria_trace_session {
    ($event:literal, $store:literal) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(event = $event, store = $store, "criteria.session");
    };
}
