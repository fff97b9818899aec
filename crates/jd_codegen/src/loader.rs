use core::fmt;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use crate::CodegenOptions;
use crate::path;
use crate::unit::GenerationUnit;

/// Which half of a codec pair a generated item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    Encoder,
    Decoder,
}

impl CodecKind {
    /// Simple name of the generated type for `unit`.
    pub(crate) fn ident(self, unit: &GenerationUnit<'_>) -> Ident {
        let schema = unit.schema();
        let name = match self {
            Self::Encoder => schema.encoder_name(),
            Self::Decoder => schema.decoder_name(),
        };
        format_ident!("{}", name, span = schema.ident().span())
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Encoder => "encoder",
            Self::Decoder => "decoder",
        })
    }
}

/// The unit struct standing for a generated codec.
pub(crate) fn codec_struct(unit: &GenerationUnit<'_>, kind: CodecKind) -> TokenStream {
    let schema = unit.schema();
    let vis = schema.vis();
    let codec = kind.ident(unit);
    let doc = format!(" Generated JSON {kind} of [`{}`].", schema.ident());

    quote! {
        #[doc = #doc]
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #codec;
    }
}

/// `ModuleLoader` impl of a generated codec, plus its inventory entry when
/// registration is enabled for the record.
pub(crate) fn module_loader(
    unit: &GenerationUnit<'_>,
    kind: CodecKind,
    options: &CodegenOptions,
) -> TokenStream {
    let runtime = &options.runtime_path;
    let module_loader_ = path::module_loader_(runtime);
    let json_module_ = path::json_module_(runtime);

    let record = unit.schema().ident();
    let codec = kind.ident(unit);
    let name = codec.to_string();
    let constructor = match kind {
        CodecKind::Encoder => quote!(encoder),
        CodecKind::Decoder => quote!(decoder),
    };

    let registration = if options.auto_register && unit.schema().register() {
        let auto_register_ = path::auto_register_(runtime);
        quote! {
            #auto_register_::inventory::submit! {
                #auto_register_::AutoRegisterLoader(&#codec)
            }
        }
    } else {
        TokenStream::new()
    };

    quote! {
        impl #module_loader_ for #codec {
            #[inline]
            fn name(&self) -> &'static str {
                ::core::concat!(::core::module_path!(), "::", #name)
            }

            fn module(&self) -> #json_module_ {
                #json_module_::#constructor::<#record, #codec>(
                    <Self as #module_loader_>::name(self),
                )
            }
        }

        #registration
    }
}
