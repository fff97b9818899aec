use proc_macro2::TokenStream;
use quote::quote;

use crate::CodegenOptions;
use crate::loader::{self, CodecKind};
use crate::path::{self, fp::DefaultFP, fp::OptionFP, fp::ResultFP};
use crate::reified::ReifiedCache;
use crate::schema::{ConstructorKind, DefaultValue};
use crate::shape::TypeShape;
use crate::unit::{ArgumentSource, GenerationUnit, UnitProperty};

/// Paths shared by every helper of one decoder.
struct Paths {
    serde_: TokenStream,
    macro_exports_: TokenStream,
}

/// Slot type of a property and the expression reading its value from
/// `__map`.
fn read_value(
    property: &UnitProperty<'_>,
    cache: &mut ReifiedCache,
    paths: &Paths,
) -> (TokenStream, TokenStream) {
    let Paths {
        serde_,
        macro_exports_,
    } = paths;
    let next_value = quote!(#serde_::de::MapAccess::next_value);
    let ty = property.schema.ty();

    if let Some(reified) = &property.reified {
        let alias = cache.alias(reified);
        return (
            quote!(#alias),
            quote!(#next_value::<#alias>(&mut __map)?),
        );
    }

    let read = match &property.shape {
        TypeShape::ByteSequence(_) => quote! {
            #macro_exports_::ByteBuf::into_inner(
                #next_value::<#macro_exports_::ByteBuf>(&mut __map)?
            )
        },
        TypeShape::Nullable(inner) if matches!(**inner, TypeShape::ByteSequence(_)) => quote! {
            #OptionFP::map(
                #next_value::<#OptionFP<#macro_exports_::ByteBuf>>(&mut __map)?,
                #macro_exports_::ByteBuf::into_inner,
            )
        },
        // An explicit `null` is read as an observed `None`.
        _ => quote!(#next_value::<#ty>(&mut __map)?),
    };
    (quote!(#ty), read)
}

fn default_value(default: &DefaultValue) -> Option<TokenStream> {
    match default {
        DefaultValue::Required => None,
        DefaultValue::Trait => Some(quote!(#DefaultFP::default())),
        DefaultValue::Expr(expr) => Some(quote!(#expr)),
    }
}

/// Assembles the constructor call from one expression per argument.
fn construct(unit: &GenerationUnit<'_>, arguments: Vec<Option<TokenStream>>) -> TokenStream {
    let schema = unit.schema();
    let record = schema.ident();

    match schema.constructor() {
        ConstructorKind::Fields => {
            // Arguments without a value are filled from the record's own
            // `Default`, which the schema guarantees to exist.
            let mut rest = TokenStream::new();
            let fields = unit
                .arguments
                .iter()
                .zip(arguments)
                .filter_map(|(argument, value)| {
                    let member = &argument.member;
                    match value {
                        Some(value) => Some(quote!(#member: #value)),
                        None => {
                            rest = quote!(..<#record as #DefaultFP>::default());
                            None
                        }
                    }
                })
                .collect::<Vec<_>>();
            quote!(#record { #(#fields,)* #rest })
        }
        ConstructorKind::Function(function) => {
            let arguments = arguments.into_iter().flatten();
            quote!(#function(#(#arguments),*))
        }
    }
}

/// Direct construction, every property observed.
fn fast_path(unit: &GenerationUnit<'_>) -> TokenStream {
    let record = unit.schema().ident();
    let positional = matches!(unit.schema().constructor(), ConstructorKind::Function(_));

    let arguments = unit
        .arguments
        .iter()
        .map(|argument| match argument.source {
            ArgumentSource::Property(index) => {
                let value = &unit.properties[index].value;
                Some(quote!(#value))
            }
            ArgumentSource::Ignored | ArgumentSource::Unbound => {
                let member = &argument.member;
                // Only a `#[json(default)]` record leaves an argument without
                // a default; a struct literal takes it from `..Default`.
                default_value(argument.default).or_else(|| {
                    positional.then(|| quote!(<#record as #DefaultFP>::default().#member))
                })
            }
        })
        .collect();
    construct(unit, arguments)
}

/// Fallback of a record with a `Default` impl.
///
/// An unobserved property takes its own declared default first, then the
/// value it has in `Name::default()`.
fn record_default_path(unit: &GenerationUnit<'_>) -> TokenStream {
    let record = unit.schema().ident();

    match unit.schema().constructor() {
        ConstructorKind::Fields => {
            let overlays = unit.arguments.iter().filter_map(|argument| {
                let member = &argument.member;
                let declared = default_value(argument.default);
                match argument.source {
                    ArgumentSource::Property(index) => {
                        let slot = &unit.properties[index].slot;
                        Some(match declared {
                            Some(value) => quote! {
                                __record.#member = match #slot {
                                    #OptionFP::Some(__value) => __value,
                                    #OptionFP::None => #value,
                                };
                            },
                            None => quote! {
                                if let #OptionFP::Some(__value) = #slot {
                                    __record.#member = __value;
                                }
                            },
                        })
                    }
                    ArgumentSource::Ignored => declared.map(|value| quote!(__record.#member = #value;)),
                    ArgumentSource::Unbound => None,
                }
            });
            quote! {
                let mut __record = <#record as #DefaultFP>::default();
                #(#overlays)*
                #ResultFP::Ok(__record)
            }
        }
        ConstructorKind::Function(_) => {
            // Every argument still goes through the declared constructor.
            let arguments = unit
                .arguments
                .iter()
                .map(|argument| {
                    let member = &argument.member;
                    let fallback = default_value(argument.default)
                        .unwrap_or_else(|| quote!(__default.#member));
                    Some(match argument.source {
                        ArgumentSource::Property(index) => {
                            let slot = &unit.properties[index].slot;
                            quote! {
                                match #slot {
                                    #OptionFP::Some(__value) => __value,
                                    #OptionFP::None => #fallback,
                                }
                            }
                        }
                        ArgumentSource::Ignored | ArgumentSource::Unbound => fallback,
                    })
                })
                .collect();
            let constructed = construct(unit, arguments);
            quote! {
                let __default = <#record as #DefaultFP>::default();
                #ResultFP::Ok(#constructed)
            }
        }
    }
}

/// Construction with at least one unobserved property.
fn fallback_path(unit: &GenerationUnit<'_>, paths: &Paths) -> TokenStream {
    let schema = unit.schema();
    let record = schema.ident();
    let record_name = record.to_string();
    let macro_exports_ = &paths.macro_exports_;

    if schema.record_default() {
        return record_default_path(unit);
    }

    let arguments = unit
        .arguments
        .iter()
        .map(|argument| match argument.source {
            ArgumentSource::Property(index) => {
                let property = &unit.properties[index];
                let slot = &property.slot;
                let missing = default_value(argument.default).unwrap_or_else(|| {
                    if property.shape.is_nullable() {
                        quote!(#OptionFP::None)
                    } else {
                        let field = property.schema.json_name();
                        quote! {
                            return #ResultFP::Err(
                                #macro_exports_::missing_field::<__A::Error>(#record_name, #field)
                            )
                        }
                    }
                });
                Some(quote! {
                    match #slot {
                        #OptionFP::Some(__value) => __value,
                        #OptionFP::None => #missing,
                    }
                })
            }
            ArgumentSource::Ignored | ArgumentSource::Unbound => default_value(argument.default),
        })
        .collect();
    let constructed = construct(unit, arguments);

    quote!(#ResultFP::Ok(#constructed))
}

/// Generates `<Name>_Deserializer`.
///
/// The decoder is a key-driven loop over the object (`AwaitField` →
/// `ReadValue` → `AwaitField` until the end of the object). Recognized fields
/// fill their slot, unknown ones are skipped whole. Afterwards the record is
/// built by the fast path when every slot is filled, and by the fallback path
/// otherwise.
pub(crate) fn generate_decoder(unit: &GenerationUnit<'_>, options: &CodegenOptions) -> TokenStream {
    let runtime = &options.runtime_path;
    let paths = Paths {
        serde_: path::serde_(runtime),
        macro_exports_: path::macro_exports_(runtime),
    };
    let serde_ = &paths.serde_;
    let macro_exports_ = &paths.macro_exports_;
    let json_decoder_ = path::json_decoder_(runtime);

    let record = unit.schema().ident();
    let record_name = record.to_string();
    let expecting = format!("struct {record_name}");
    let codec = CodecKind::Decoder.ident(unit);

    let mut cache = ReifiedCache::new();
    let mut slots = Vec::with_capacity(unit.field_count());
    let mut arms = Vec::with_capacity(unit.field_count());
    for property in &unit.properties {
        let (slot_ty, read) = read_value(property, &mut cache, &paths);
        let slot = &property.slot;
        let key = property.schema.json_name();
        slots.push(quote! {
            let mut #slot: #OptionFP<#slot_ty> = #OptionFP::None;
        });
        arms.push(quote! {
            #key => {
                #slot = #OptionFP::Some(#read);
            }
        });
    }
    let aliases = cache.definitions();
    let field_names = unit.properties.iter().map(|p| p.schema.json_name());

    // Every property may be ignored, leaving nothing to observe.
    let construction = if unit.properties.is_empty() {
        let constructed = fast_path(unit);
        quote!(#ResultFP::Ok(#constructed))
    } else {
        let slot_idents = unit.properties.iter().map(|p| &p.slot);
        let rebind = slot_idents.clone();
        let values = unit.properties.iter().map(|p| &p.value);
        let some = quote!(#OptionFP::Some);
        let fast = fast_path(unit);
        let fallback = fallback_path(unit, &paths);
        quote! {
            match (#(#slot_idents,)*) {
                (#(#some(#values),)*) => #ResultFP::Ok(#fast),
                (#(#rebind,)*) => { #fallback }
            }
        }
    };

    let codec_struct = loader::codec_struct(unit, CodecKind::Decoder);
    let module_loader = loader::module_loader(unit, CodecKind::Decoder, options);

    quote! {
        #codec_struct

        const _: () = {
            #aliases

            const __FIELDS: &[&str] = &[#(#field_names),*];

            struct __Visitor;

            impl<'de> #serde_::de::Visitor<'de> for __Visitor {
                type Value = #record;

                fn expecting(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    ::core::fmt::Formatter::write_str(formatter, #expecting)
                }

                fn visit_map<__A>(self, mut __map: __A) -> #ResultFP<#record, __A::Error>
                where
                    __A: #serde_::de::MapAccess<'de>,
                {
                    #(#slots)*
                    while let #OptionFP::Some(__key) =
                        #serde_::de::MapAccess::next_key::<#macro_exports_::FieldName<'de>>(&mut __map)?
                    {
                        match __key.as_str() {
                            #(#arms)*
                            _ => {
                                #serde_::de::MapAccess::next_value::<#serde_::de::IgnoredAny>(&mut __map)?;
                            }
                        }
                    }
                    #construction
                }
            }

            impl #json_decoder_<#record> for #codec {
                fn decode<'de, __D>(deserializer: __D) -> #ResultFP<#record, __D::Error>
                where
                    __D: #serde_::Deserializer<'de>,
                {
                    #serde_::Deserializer::deserialize_struct(
                        deserializer,
                        #record_name,
                        __FIELDS,
                        __Visitor,
                    )
                }
            }

            impl<'de> #serde_::Deserialize<'de> for #record {
                #[inline]
                fn deserialize<__D>(deserializer: __D) -> #ResultFP<Self, __D::Error>
                where
                    __D: #serde_::Deserializer<'de>,
                {
                    <#codec as #json_decoder_<#record>>::decode(deserializer)
                }
            }

            #module_loader
        };
    }
}

// -----------------------------------------------------------------------------
// Tests
