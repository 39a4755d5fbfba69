//! Parsing of `#[entity(...)]` attributes and relation field shapes.

use heck::ToSnakeCase;
use syn::{
    Attribute, DeriveInput, Error, Field, GenericArgument, Ident, LitStr, PathArguments, Result,
    Type,
};

/// How a relation field wraps its target entity.
pub(crate) enum RelationShape {
    /// `T`
    Direct(Type),
    /// `Box<T>`
    Boxed(Type),
    /// `Option<T>`
    Optional(Type),
    /// `Option<Box<T>>`
    OptionalBoxed(Type),
}

impl RelationShape {
    fn of(ty: &Type) -> Self {
        match generic_argument(ty, "Option") {
            Some(inner) => match generic_argument(inner, "Box") {
                Some(target) => Self::OptionalBoxed(target.clone()),
                None => Self::Optional(inner.clone()),
            },
            None => match generic_argument(ty, "Box") {
                Some(target) => Self::Boxed(target.clone()),
                None => Self::Direct(ty.clone()),
            },
        }
    }

    pub(crate) fn target(&self) -> &Type {
        match self {
            Self::Direct(ty) | Self::Boxed(ty) | Self::Optional(ty) | Self::OptionalBoxed(ty) => ty,
        }
    }

    pub(crate) const fn nullable(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::OptionalBoxed(_))
    }
}

/// `Some(T)` when `ty` is `Wrapper<T>` (matched on the last path segment).
fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn is_entity_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("entity")
}

/// Struct-level `#[entity(table = "...")]`.
pub(crate) fn table_name(input: &DeriveInput) -> Result<String> {
    let mut table = None;
    for attr in input.attrs.iter().filter(|attr| is_entity_attr(attr)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                table = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported entity attribute, expected `table = \"...\"`"))
            }
        })?;
    }
    Ok(table.unwrap_or_else(|| input.ident.to_string().to_snake_case()))
}

/// One parsed struct field.
pub(crate) struct FieldInfo {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) column: String,
    pub(crate) is_id: bool,
    pub(crate) relation: Option<RelationShape>,
}

impl FieldInfo {
    pub(crate) fn parse(field: &Field) -> Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Entity fields must be named"))?;

        let mut column = None;
        let mut is_id = false;
        let mut is_relation = false;

        for attr in field.attrs.iter().filter(|attr| is_entity_attr(attr)) {
            attr.parse_nested_meta(|meta| {
                let Some(key) = meta.path.get_ident() else {
                    return Err(meta.error("Expected identifier"));
                };
                match key.to_string().as_str() {
                    "id" => is_id = true,
                    "relation" => is_relation = true,
                    "column" => {
                        let lit: LitStr = meta.value()?.parse()?;
                        column = Some(lit.value());
                    }
                    _ => {
                        return Err(meta.error(
                            "unsupported entity attribute, expected `id`, `relation` or `column = \"...\"`",
                        ));
                    }
                }
                Ok(())
            })?;
        }

        if is_id && is_relation {
            return Err(Error::new_spanned(
                &ident,
                "a relation field cannot be the entity id",
            ));
        }

        let relation = is_relation.then(|| RelationShape::of(&field.ty));
        let column = column.unwrap_or_else(|| {
            if relation.is_some() {
                format!("{ident}_id")
            } else {
                ident.to_string()
            }
        });

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            column,
            is_id,
            relation,
        })
    }
}
