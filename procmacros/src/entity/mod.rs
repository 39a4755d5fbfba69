//! `#[derive(Entity)]` code generation.
//!
//! Emits the static model registry of the struct plus the record mappings:
//!
//! ```ignore
//! impl criteria::Entity for Customer {
//!     fn model() -> &'static criteria::EntityModel { /* static FIELDS + MODEL */ }
//!     fn to_record(&self) -> criteria::Record { /* one cell per field */ }
//!     fn from_record(record: criteria::Record) -> Result<Self, criteria::RecordError> { /* reader */ }
//!     fn id(&self) -> criteria::Value { /* id column value */ }
//! }
//! ```

mod attrs;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Result};

use crate::paths::{core as core_paths, std as std_paths};
use attrs::{FieldInfo, RelationShape, table_name};

pub(crate) fn generate_entity(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new_spanned(
                    struct_name,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                struct_name,
                "Entity can only be derived for structs",
            ));
        }
    };

    let table = table_name(&input)?;
    let fields = fields
        .iter()
        .map(FieldInfo::parse)
        .collect::<Result<Vec<_>>>()?;

    let mut ids = fields.iter().enumerate().filter(|(_, field)| field.is_id);
    let (primary_key, id_field) = match (ids.next(), ids.next()) {
        (Some(found), None) => found,
        (None, _) => {
            return Err(Error::new_spanned(
                struct_name,
                "Entity requires exactly one #[entity(id)] field",
            ));
        }
        (Some(_), Some((_, second))) => {
            return Err(Error::new_spanned(
                &second.ident,
                "Entity supports only one #[entity(id)] field",
            ));
        }
    };

    let entity = core_paths::entity();
    let entity_model = core_paths::entity_model();
    let field_model = core_paths::field_model();
    let column = core_paths::column();
    let record = core_paths::record();
    let record_error = core_paths::record_error();
    let cell = core_paths::cell();
    let relation_cell = core_paths::relation_cell();
    let value = core_paths::value();
    let option = std_paths::option();
    let result = std_paths::result();
    let boxed = std_paths::boxed();
    let vec = std_paths::vec();

    let field_count = fields.len();
    let name_str = struct_name.to_string();

    let field_models = fields.iter().map(|field| {
        let name = field.ident.to_string();
        let column_name = &field.column;
        let ty = &field.ty;
        match &field.relation {
            Some(shape) => {
                let target = shape.target();
                let nullable = shape.nullable();
                quote! {
                    #field_model::relation(#name, #column_name, <#target as #entity>::model, #nullable)
                }
            }
            None => quote! {
                #field_model::scalar(
                    #name,
                    #column_name,
                    <#ty as #column>::KIND,
                    <#ty as #column>::NULLABLE,
                )
            },
        }
    });

    let cells = fields.iter().map(|field| {
        let ident = &field.ident;
        match &field.relation {
            None => quote!(#cell::Value(#column::to_value(&self.#ident))),
            Some(RelationShape::Direct(_)) => quote!(#relation_cell(#option::Some(&self.#ident))),
            Some(RelationShape::Boxed(_)) => quote!(#relation_cell(#option::Some(&*self.#ident))),
            Some(RelationShape::Optional(_)) => quote!(#relation_cell(self.#ident.as_ref())),
            Some(RelationShape::OptionalBoxed(_)) => {
                quote!(#relation_cell(self.#ident.as_deref()))
            }
        }
    });

    let reads = fields.iter().map(|field| {
        let ident = &field.ident;
        let name = ident.to_string();
        let ty = &field.ty;
        let read = match &field.relation {
            None => quote!(reader.value::<#ty>(#name)?),
            Some(RelationShape::Direct(target)) => quote!(reader.relation::<#target>(#name)?),
            Some(RelationShape::Boxed(target)) => {
                quote!(#boxed::new(reader.relation::<#target>(#name)?))
            }
            Some(RelationShape::Optional(target)) => {
                quote!(reader.optional_relation::<#target>(#name)?)
            }
            Some(RelationShape::OptionalBoxed(target)) => {
                quote!(reader.optional_relation::<#target>(#name)?.map(#boxed::new))
            }
        };
        quote!(#ident: #read)
    });

    let id_ident = &id_field.ident;

    Ok(quote! {
        impl #entity for #struct_name {
            fn model() -> &'static #entity_model {
                static FIELDS: [#field_model; #field_count] = [#(#field_models),*];
                static MODEL: #entity_model = #entity_model {
                    name: #name_str,
                    table: #table,
                    primary_key: #primary_key,
                    fields: &FIELDS,
                };
                &MODEL
            }

            fn to_record(&self) -> #record {
                #record::new(
                    <Self as #entity>::model(),
                    #vec![#(#cells),*],
                )
            }

            fn from_record(record: #record) -> #result<Self, #record_error> {
                let mut reader = record.reader(<Self as #entity>::model())?;
                #result::Ok(Self {
                    #(#reads),*
                })
            }

            fn id(&self) -> #value {
                #column::to_value(&self.#id_ident)
            }
        }
    })
}
