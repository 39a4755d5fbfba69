//! Field path resolution.
//!
//! A path such as `"customer.country.code"` is resolved against an entity
//! model one segment at a time. Every segment but the last must name a
//! relation and becomes an implicit join; the last segment is the terminal
//! attribute that predicates and sort keys compare.

use core::fmt;

use smallvec::SmallVec;

use crate::error::PathError;
use crate::model::{EntityModel, FieldModel};
use crate::value::ValueKind;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// One implicit join step synthesized while navigating a relation.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Path of the relation from the root entity, e.g. `customer.country`
    pub path: String,
    pub field: &'static FieldModel,
    pub from: &'static EntityModel,
    pub to: &'static EntityModel,
}

/// What a resolved attribute points at on its owning entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// The entity itself; compared through its primary key
    Root,
    /// A field of the owning entity and its position in the entity's rows
    Field {
        field: &'static FieldModel,
        index: usize,
    },
}

/// A resolved, comparable attribute: the joins leading to it plus its target.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    joins: SmallVec<[Join; 2]>,
    owner: &'static EntityModel,
    target: Target,
}

impl Attribute {
    /// The root entity itself.
    pub fn root(model: &'static EntityModel) -> Self {
        Self {
            joins: SmallVec::new(),
            owner: model,
            target: Target::Root,
        }
    }

    /// Steps into one field.
    ///
    /// From the root this selects a field of the root entity. From a field
    /// it first joins through that field, which must be a relation.
    pub fn navigate(&self, segment: &str) -> Result<Self, PathError> {
        if segment.is_empty() {
            return Err(PathError::EmptySegment {
                path: self.to_string(),
            });
        }

        let mut next = self.clone();
        if let Target::Field { field, .. } = self.target {
            let Some(to) = field.target() else {
                return Err(PathError::NotARelation {
                    entity: self.owner.name,
                    segment: field.name.to_owned(),
                });
            };
            next.joins.push(Join {
                path: self.to_string(),
                field,
                from: self.owner,
                to,
            });
            next.owner = to;
        }

        let index = next
            .owner
            .field_index(segment)
            .ok_or_else(|| PathError::UnknownField {
                entity: next.owner.name,
                segment: segment.to_owned(),
            })?;
        next.target = Target::Field {
            field: &next.owner.fields[index],
            index,
        };
        Ok(next)
    }

    #[inline]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Entity declaring the target field.
    #[inline]
    pub fn owner(&self) -> &'static EntityModel {
        self.owner
    }

    #[inline]
    pub fn target(&self) -> Target {
        self.target
    }

    /// Column compared for this attribute on its owning table.
    pub fn column(&self) -> &'static str {
        match self.target {
            Target::Root => self.owner.id_field().column,
            Target::Field { field, .. } => field.column,
        }
    }

    /// Index of the compared value in a row of the owning entity.
    pub fn index(&self) -> usize {
        match self.target {
            Target::Root => self.owner.primary_key,
            Target::Field { index, .. } => index,
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self.target {
            Target::Root => self.owner.id_kind(),
            Target::Field { field, .. } => field.value_kind(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(join) = self.joins.last() {
            write!(f, "{}{PATH_SEPARATOR}", join.path)?;
        }
        match self.target {
            Target::Root => Ok(()),
            Target::Field { field, .. } => f.write_str(field.name),
        }
    }
}

/// Resolves a dot-separated path starting at `from`.
///
/// A blank path resolves to `from` itself.
pub fn resolve(path: &str, from: Attribute) -> Result<Attribute, PathError> {
    if path.trim().is_empty() {
        return Ok(from);
    }
    if path.split(PATH_SEPARATOR).any(str::is_empty) {
        return Err(PathError::EmptySegment {
            path: path.to_owned(),
        });
    }

    match path.split_once(PATH_SEPARATOR) {
        Some((head, rest)) => resolve(rest, from.navigate(head)?),
        None => from.navigate(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Country, Customer, Order};
    use crate::model::Entity;

    fn root() -> Attribute {
        Attribute::root(Order::model())
    }

    #[test]
    fn blank_path_is_the_root() {
        assert_eq!(resolve("", root()).unwrap(), root());
        assert_eq!(resolve("  ", root()).unwrap(), root());
        assert_eq!(root().column(), "id");
    }

    #[test]
    fn single_segment_has_no_joins() {
        let attribute = resolve("total", root()).unwrap();
        assert!(attribute.joins().is_empty());
        assert_eq!(attribute.column(), "total");
        assert_eq!(attribute.to_string(), "total");
    }

    #[test]
    fn attributes_index_their_owner_rows() {
        assert_eq!(root().index(), Order::model().primary_key);
        assert_eq!(resolve("total", root()).unwrap().index(), 1);

        let nested = resolve("customer.country.code", root()).unwrap();
        assert_eq!(nested.index(), Country::model().field_index("code").unwrap());
        assert!(matches!(
            nested.target(),
            Target::Field { field, index: 1 } if field.name == "code"
        ));
    }

    #[test]
    fn nested_path_matches_navigation() {
        let resolved = resolve("customer.country.code", root()).unwrap();
        let navigated = root()
            .navigate("customer")
            .and_then(|a| a.navigate("country"))
            .and_then(|a| a.navigate("code"))
            .unwrap();
        assert_eq!(resolved, navigated);

        let joins = resolved.joins();
        assert_eq!(joins.len(), 2);
        assert_eq!(joins[0].path, "customer");
        assert_eq!(joins[0].to, Customer::model());
        assert_eq!(joins[1].path, "customer.country");
        assert_eq!(joins[1].to, Country::model());
        assert_eq!(resolved.owner(), Country::model());
        assert_eq!(resolved.to_string(), "customer.country.code");
    }

    #[test]
    fn terminal_relation_compares_foreign_key() {
        let attribute = resolve("customer", root()).unwrap();
        assert!(attribute.joins().is_empty());
        assert_eq!(attribute.column(), "customer_id");
        assert_eq!(attribute.value_kind(), ValueKind::Integer);
    }

    #[test]
    fn empty_segments_fail() {
        for path in ["customer..name", "customer.", ".customer"] {
            assert_eq!(
                resolve(path, root()),
                Err(PathError::EmptySegment { path: path.into() })
            );
        }
    }

    #[test]
    fn unknown_field_names_the_entity() {
        assert_eq!(
            resolve("customer.nope", root()),
            Err(PathError::UnknownField {
                entity: "Customer",
                segment: "nope".into(),
            })
        );
    }

    #[test]
    fn scalar_fields_cannot_be_traversed() {
        assert_eq!(
            resolve("total.amount", root()),
            Err(PathError::NotARelation {
                entity: "Order",
                segment: "total".into(),
            })
        );
    }
}
