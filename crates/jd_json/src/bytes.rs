use alloc::vec::Vec;
use core::fmt;

use serde_core::de::{self, SeqAccess, Visitor};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

/// Writes a byte sequence through the writer's byte primitive.
#[derive(Debug, Clone, Copy)]
pub struct Bytes<'a>(&'a [u8]);

impl<'a> Bytes<'a> {
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Bytes<'_> {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

/// Reads a byte sequence written by [`Bytes`].
///
/// Accepts native byte values as well as sequences of integers, which is how
/// JSON represents them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuf(Vec<u8>);

impl ByteBuf {
    /// Converts into the declared byte container (`Vec<u8>`, `Box<[u8]>`).
    #[inline]
    pub fn into_inner<T: From<Vec<u8>>>(self) -> T {
        T::from(self.0)
    }
}

struct ByteBufVisitor;

impl<'de> Visitor<'de> for ByteBufVisitor {
    type Value = ByteBuf;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a byte sequence")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(ByteBuf(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(ByteBuf(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Ok(ByteBuf(bytes))
    }
}

impl<'de> Deserialize<'de> for ByteBuf {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_byte_buf(ByteBufVisitor)
    }
}

// -----------------------------------------------------------------------------
// Tests
