//! Paths used by the generated code.
//!
//! Everything goes through the run-time crate path passed in
//! [`CodegenOptions`](crate::CodegenOptions), so a renamed or re-exported
//! `jd_json` keeps working.

use proc_macro2::TokenStream;
use quote::quote;

#[inline]
pub(crate) fn macro_exports_(runtime: &syn::Path) -> TokenStream {
    quote! {
        #runtime::__macro_exports
    }
}

#[inline]
pub(crate) fn serde_(runtime: &syn::Path) -> TokenStream {
    quote! {
        #runtime::__macro_exports::serde
    }
}

#[inline]
pub(crate) fn auto_register_(runtime: &syn::Path) -> TokenStream {
    quote! {
        #runtime::__macro_exports::auto_register
    }
}

#[inline]
pub(crate) fn json_encoder_(runtime: &syn::Path) -> TokenStream {
    quote! {
        #runtime::JsonEncoder
    }
}

#[inline]
pub(crate) fn json_decoder_(runtime: &syn::Path) -> TokenStream {
    quote! {
        #runtime::JsonDecoder
    }
}

#[inline]
pub(crate) fn module_loader_(runtime: &syn::Path) -> TokenStream {
    quote! {
        #runtime::ModuleLoader
    }
}

#[inline]
pub(crate) fn json_module_(runtime: &syn::Path) -> TokenStream {
    quote! {
        #runtime::JsonModule
    }
}

/// Fully qualified prelude items, immune to user shadowing.
pub(crate) mod fp {
    use proc_macro2::TokenStream;
    use quote::{ToTokens, quote};

    macro_rules! full_path {
        ($($name:ident => { $($path:tt)* })*) => {$(
            pub(crate) struct $name;

            impl ToTokens for $name {
                fn to_tokens(&self, tokens: &mut TokenStream) {
                    quote!($($path)*).to_tokens(tokens);
                }
            }
        )*};
    }

    full_path! {
        OptionFP => { ::core::option::Option }
        ResultFP => { ::core::result::Result }
        DefaultFP => { ::core::default::Default }
    }
}
