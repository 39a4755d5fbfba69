use thiserror::Error;

/// Error resolving a dot-separated field path against an entity model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A path segment was empty (`"a..b"`, `"a."`, `".a"`)
    #[error("Empty segment in path '{path}'")]
    EmptySegment { path: String },

    /// A segment names no field of the entity it is applied to
    #[error("Unknown field '{segment}' on entity '{entity}'")]
    UnknownField {
        entity: &'static str,
        segment: String,
    },

    /// A non-terminal segment names a scalar field
    #[error("Field '{segment}' on entity '{entity}' is not a relation")]
    NotARelation {
        entity: &'static str,
        segment: String,
    },
}

/// Error converting a single [`Value`](crate::Value) into a Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("Expected {expected} value, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
}

/// Error mapping between an entity and its record form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// The record does not have one cell per declared field
    #[error("Entity '{entity}' expects {expected} fields, record has {found}")]
    Arity {
        entity: &'static str,
        expected: usize,
        found: usize,
    },

    /// No field with this name is declared on the entity
    #[error("Entity '{entity}' has no field '{field}'")]
    UnknownField {
        entity: &'static str,
        field: String,
    },

    /// A cell holds the wrong kind of value
    #[error("Field '{entity}.{field}': {source}")]
    Value {
        entity: &'static str,
        field: &'static str,
        #[source]
        source: ValueError,
    },

    /// A scalar cell was read as a relation or the other way round
    #[error("Field '{entity}.{field}' is not a {expected}")]
    CellKind {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    /// A mandatory relation was not loaded
    #[error("Relation '{entity}.{field}' is required but missing")]
    MissingRelation {
        entity: &'static str,
        field: &'static str,
    },

    /// A record of another entity was supplied
    #[error("Expected a record of '{expected}', found '{found}'")]
    Model {
        expected: &'static str,
        found: &'static str,
    },
}

/// Error generating descriptors from a condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Path(#[from] PathError),

    /// A count descriptor was requested from a condition built without count support
    #[error("Condition on '{entity}' was built without count support")]
    NoCountSupport { entity: &'static str },
}
