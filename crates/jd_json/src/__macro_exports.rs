//! Items used by code generated with `#[derive(JsonData)]` and `jd_codegen`.
//!
//! Not public API.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;

use serde_core::de::{self, Visitor};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

pub use crate::bytes::{ByteBuf, Bytes};

pub use serde_core as serde;

/// Writes JSON `null`.
#[derive(Debug, Clone, Copy)]
pub struct JsonNull;

impl Serialize for JsonNull {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_none()
    }
}

/// Object key read by generated decoders, borrowed when the input allows.
#[derive(Debug)]
pub enum FieldName<'de> {
    Borrowed(&'de str),
    Owned(String),
}

impl FieldName<'_> {
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Borrowed(name) => name,
            Self::Owned(name) => name,
        }
    }
}

struct FieldNameVisitor;

impl<'de> Visitor<'de> for FieldNameVisitor {
    type Value = FieldName<'de>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a field name")
    }

    fn visit_borrowed_str<E: de::Error>(self, v: &'de str) -> Result<Self::Value, E> {
        Ok(FieldName::Borrowed(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(FieldName::Owned(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(FieldName::Owned(v))
    }
}

impl<'de> Deserialize<'de> for FieldName<'de> {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_identifier(FieldNameVisitor)
    }
}

/// Construction error for an absent field without a default.
#[cold]
pub fn missing_field<E: de::Error>(record: &'static str, field: &'static str) -> E {
    E::custom(crate::DecodeError::MissingField { record, field })
}

/// `inventory` plumbing for generated codecs.
#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::ModuleLoader;

    /// One generated codec, submitted by its own module.
    pub struct AutoRegisterLoader(pub &'static dyn ModuleLoader);

    inventory::collect!(AutoRegisterLoader);

    /// Submitted once by this crate; finding it proves that `inventory`
    /// works on the current platform.
    pub(crate) struct AvailableFlag;

    inventory::collect!(AvailableFlag);

    inventory::submit!(AvailableFlag);

    #[inline]
    pub(crate) fn available() -> bool {
        inventory::iter::<AvailableFlag>.into_iter().next().is_some()
    }

    pub(crate) fn loaders() -> impl Iterator<Item = &'static dyn ModuleLoader> {
        inventory::iter::<AutoRegisterLoader>
            .into_iter()
            .map(|loader| loader.0)
    }
}
