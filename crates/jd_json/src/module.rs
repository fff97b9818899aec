use alloc::boxed::Box;
use core::any::{Any, TypeId, type_name};
use core::fmt;

use serde_core::{Deserializer, Serialize, Serializer, de, ser};

use crate::{JsonDecoder, JsonEncoder};

// -----------------------------------------------------------------------------
// CodecKind

/// Which half of a codec pair a module is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    Encoder,
    Decoder,
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Encoder => "encoder",
            Self::Decoder => "decoder",
        })
    }
}

// -----------------------------------------------------------------------------
// JsonModule

#[derive(Clone, Copy)]
enum Codec {
    Encoder(fn(value: &dyn Any) -> Option<&dyn erased_serde::Serialize>),
    Decoder(
        fn(
            deserializer: &mut dyn erased_serde::Deserializer,
        ) -> Result<Box<dyn Any>, erased_serde::Error>,
    ),
}

/// A codec bound to its target type, usable without naming either.
///
/// Produced by [`ModuleLoader::module`] and stored in a
/// [`CodecRegistry`](crate::CodecRegistry).
#[derive(Clone, Copy)]
pub struct JsonModule {
    name: &'static str,
    target: TypeId,
    target_name: &'static str,
    codec: Codec,
}

impl JsonModule {
    /// Module of the encoder `E` of `T`.
    ///
    /// `T: Serialize` is the forwarding impl generated next to `E`.
    pub fn encoder<T, E>(name: &'static str) -> Self
    where
        T: Serialize + Any,
        E: JsonEncoder<T>,
    {
        Self {
            name,
            target: TypeId::of::<T>(),
            target_name: type_name::<T>(),
            codec: Codec::Encoder(|value| {
                value
                    .downcast_ref::<T>()
                    .map(|value| value as &dyn erased_serde::Serialize)
            }),
        }
    }

    /// Module of the decoder `D` of `T`.
    pub fn decoder<T, D>(name: &'static str) -> Self
    where
        T: Any,
        D: JsonDecoder<T>,
    {
        Self {
            name,
            target: TypeId::of::<T>(),
            target_name: type_name::<T>(),
            codec: Codec::Decoder(|deserializer| Ok(Box::new(D::decode(deserializer)?))),
        }
    }

    /// Fully qualified name of the generated codec.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn target(&self) -> TypeId {
        self.target
    }

    /// `core::any::type_name` of the target type.
    #[inline]
    pub fn target_name(&self) -> &'static str {
        self.target_name
    }

    #[inline]
    pub fn kind(&self) -> CodecKind {
        match self.codec {
            Codec::Encoder(_) => CodecKind::Encoder,
            Codec::Decoder(_) => CodecKind::Decoder,
        }
    }

    /// Type-erased view of `value` for this encoder.
    ///
    /// `None` if this is a decoder or `value` is not the target type.
    pub fn serializable<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn erased_serde::Serialize> {
        match self.codec {
            Codec::Encoder(func) => func(value),
            Codec::Decoder(_) => None,
        }
    }

    /// Encodes `value`, which must be of the target type.
    pub fn serialize<S: Serializer>(&self, value: &dyn Any, serializer: S) -> Result<S::Ok, S::Error> {
        match self.serializable(value) {
            Some(value) => value.serialize(serializer),
            None => Err(<S::Error as ser::Error>::custom(format_args!(
                "`{}` cannot encode this value as `{}`",
                self.name, self.target_name
            ))),
        }
    }

    /// Decodes a boxed value of the target type.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Box<dyn Any>, D::Error> {
        let Codec::Decoder(func) = self.codec else {
            return Err(<D::Error as de::Error>::custom(format_args!(
                "`{}` is not a decoder",
                self.name
            )));
        };
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        func(&mut erased).map_err(<D::Error as de::Error>::custom)
    }
}

impl fmt::Debug for JsonModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonModule")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("target", &self.target_name)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ModuleLoader

/// Factory and registration entry point of one generated codec.
///
/// Every `<Name>_Serializer` and `<Name>_Deserializer` implements it.
/// [`name`](ModuleLoader::name) is the fully qualified name also listed in the
/// service manifest.
pub trait ModuleLoader: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn module(&self) -> JsonModule;
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::any::TypeId;

    use super::{CodecKind, JsonModule};
    use crate::{JsonDecoder, JsonEncoder};

    struct Raw(String);

    impl serde_core::Serialize for Raw {
        fn serialize<S: serde_core::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            RawCodec::encode(self, serializer)
        }
    }

    struct RawCodec;

    impl JsonEncoder<Raw> for RawCodec {
        fn encode<S: serde_core::Serializer>(value: &Raw, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&value.0)
        }
    }

    impl JsonDecoder<Raw> for RawCodec {
        fn decode<'de, D: serde_core::Deserializer<'de>>(deserializer: D) -> Result<Raw, D::Error> {
            <String as serde_core::Deserialize>::deserialize(deserializer).map(Raw)
        }
    }

    #[test]
    fn erased_round_trip() {
        let encoder = JsonModule::encoder::<Raw, RawCodec>("tests::RawCodec");
        let decoder = JsonModule::decoder::<Raw, RawCodec>("tests::RawCodec");
        assert_eq!(encoder.kind(), CodecKind::Encoder);
        assert_eq!(decoder.target(), TypeId::of::<Raw>());

        let mut out = alloc::vec::Vec::new();
        encoder
            .serialize(&Raw("hi".into()), &mut serde_json::Serializer::new(&mut out))
            .unwrap();
        assert_eq!(out, b"\"hi\"");

        let boxed = decoder
            .deserialize(&mut serde_json::Deserializer::from_str("\"back\""))
            .unwrap();
        assert_eq!(boxed.downcast_ref::<Raw>().unwrap().0, "back");
    }

    #[test]
    fn wrong_value_or_direction() {
        let encoder = JsonModule::encoder::<Raw, RawCodec>("tests::RawCodec");
        assert!(encoder.serializable(&5_u32).is_none());
        assert!(
            encoder
                .deserialize(&mut serde_json::Deserializer::from_str("\"x\""))
                .is_err()
        );
    }
}
