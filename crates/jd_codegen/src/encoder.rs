use proc_macro2::TokenStream;
use quote::quote;

use crate::CodegenOptions;
use crate::loader::{self, CodecKind};
use crate::path::{self, fp::OptionFP, fp::ResultFP};
use crate::reified::ReifiedType;
use crate::shape::TypeShape;
use crate::unit::{GenerationUnit, UnitProperty};

/// Statement writing one non-null value held by reference in `value`.
fn write_value(
    property: &UnitProperty<'_>,
    value: &TokenStream,
    serde_: &TokenStream,
    macro_exports_: &TokenStream,
) -> TokenStream {
    let key = property.schema.json_name();
    let serialize_field = quote!(#serde_::ser::SerializeStruct::serialize_field);

    // Element types are spelled out so collections of nested records resolve
    // through their own codecs.
    if let Some(reified) = ReifiedType::build(property.shape.non_null()) {
        return quote! {
            #serialize_field::<#reified>(&mut __state, #key, #value)?;
        };
    }

    match property.shape.non_null() {
        TypeShape::ByteSequence(_) => quote! {
            #serialize_field(&mut __state, #key, &#macro_exports_::Bytes::new(#value))?;
        },
        _ => quote! {
            #serialize_field(&mut __state, #key, #value)?;
        },
    }
}

fn write_property(
    property: &UnitProperty<'_>,
    serde_: &TokenStream,
    macro_exports_: &TokenStream,
) -> TokenStream {
    let member = property.schema.ident();
    let key = property.schema.json_name();

    if property.shape.is_nullable() {
        let some = write_value(property, &quote!(__value), serde_, macro_exports_);
        quote! {
            match &value.#member {
                #OptionFP::Some(__value) => { #some }
                #OptionFP::None => {
                    #serde_::ser::SerializeStruct::serialize_field(
                        &mut __state,
                        #key,
                        &#macro_exports_::JsonNull,
                    )?;
                }
            }
        }
    } else {
        write_value(property, &quote!(&value.#member), serde_, macro_exports_)
    }
}

/// Generates `<Name>_Serializer`.
///
/// The encoder writes a single JSON object whose fields are the non-ignored
/// properties, keyed by their JSON names, in declaration order. The record
/// also gets a `Serialize` impl forwarding to it.
pub(crate) fn generate_encoder(unit: &GenerationUnit<'_>, options: &CodegenOptions) -> TokenStream {
    let runtime = &options.runtime_path;
    let serde_ = path::serde_(runtime);
    let macro_exports_ = path::macro_exports_(runtime);
    let json_encoder_ = path::json_encoder_(runtime);

    let record = unit.schema().ident();
    let record_name = record.to_string();
    let codec = CodecKind::Encoder.ident(unit);
    let field_count = unit.field_count();

    let codec_struct = loader::codec_struct(unit, CodecKind::Encoder);
    let module_loader = loader::module_loader(unit, CodecKind::Encoder, options);
    let writes = unit
        .properties
        .iter()
        .map(|property| write_property(property, &serde_, &macro_exports_));

    quote! {
        #codec_struct

        const _: () = {
            impl #json_encoder_<#record> for #codec {
                fn encode<__S>(value: &#record, serializer: __S) -> #ResultFP<__S::Ok, __S::Error>
                where
                    __S: #serde_::Serializer,
                {
                    let mut __state = #serde_::Serializer::serialize_struct(
                        serializer,
                        #record_name,
                        #field_count,
                    )?;
                    #(#writes)*
                    #serde_::ser::SerializeStruct::end(__state)
                }
            }

            impl #serde_::Serialize for #record {
                #[inline]
                fn serialize<__S>(&self, serializer: __S) -> #ResultFP<__S::Ok, __S::Error>
                where
                    __S: #serde_::Serializer,
                {
                    <#codec as #json_encoder_<#record>>::encode(self, serializer)
                }
            }

            #module_loader
        };
    }
}

// -----------------------------------------------------------------------------
// Tests
