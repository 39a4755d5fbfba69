//! Centralized path definitions for generated code.
//!
//! Using the `criteria::` prefix (without leading `::`) lets the `criteria`
//! crate use the derive on its own types through `extern crate self as criteria`.

use proc_macro2::TokenStream;
use quote::quote;

pub mod std {
    use super::*;

    pub fn option() -> TokenStream {
        quote!(::std::option::Option)
    }

    pub fn result() -> TokenStream {
        quote!(::std::result::Result)
    }

    pub fn boxed() -> TokenStream {
        quote!(::std::boxed::Box)
    }

    pub fn vec() -> TokenStream {
        quote!(::std::vec)
    }
}

pub mod core {
    use super::*;

    pub fn entity() -> TokenStream {
        quote!(criteria::Entity)
    }

    pub fn entity_model() -> TokenStream {
        quote!(criteria::EntityModel)
    }

    pub fn field_model() -> TokenStream {
        quote!(criteria::FieldModel)
    }

    pub fn column() -> TokenStream {
        quote!(criteria::Column)
    }

    pub fn record() -> TokenStream {
        quote!(criteria::Record)
    }

    pub fn record_error() -> TokenStream {
        quote!(criteria::RecordError)
    }

    pub fn cell() -> TokenStream {
        quote!(criteria::Cell)
    }

    pub fn relation_cell() -> TokenStream {
        quote!(criteria::relation_cell)
    }

    pub fn value() -> TokenStream {
        quote!(criteria::Value)
    }
}
