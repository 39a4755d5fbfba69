#![recursion_limit = "128"]

extern crate proc_macro;

mod entity;
mod paths;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `criteria::Entity`: the static model registry of the struct plus
/// its record mappings.
///
/// # Attributes
///
/// - `#[entity(table = "...")]` on the struct. Defaults to the snake_case struct name.
/// - `#[entity(id)]` on exactly one scalar field, the primary key.
/// - `#[entity(column = "...")]` renames the column. Defaults to the field name,
///   or `<field>_id` for relations.
/// - `#[entity(relation)]` marks a many-to-one reference. The field type is
///   `T`, `Box<T>`, `Option<T>` or `Option<Box<T>>` with `T: Entity`; the
///   column stores the target's primary key.
///
/// Every other field type must implement `criteria::Column`.
///
/// # Example
///
/// ```ignore
/// use criteria::Entity;
///
/// #[derive(Entity, Debug, Clone, PartialEq)]
/// #[entity(table = "customers")]
/// struct Customer {
///     #[entity(id)]
///     id: i64,
///     name: String,
///     #[entity(relation)]
///     country: Option<Country>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match entity::generate_entity(input) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
