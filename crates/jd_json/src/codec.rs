use serde_core::{Deserializer, Serializer};

/// Writes a `T` as one JSON object.
///
/// Implemented by the `<Name>_Serializer` types generated by
/// [`#[derive(JsonData)]`](crate::derive::JsonData). Fields are written in
/// declaration order, so the output for a given value is always the same.
pub trait JsonEncoder<T: ?Sized> {
    fn encode<S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;
}

/// Reads a `T` from one JSON object.
///
/// Implemented by the generated `<Name>_Deserializer` types. Unknown fields are
/// skipped; absent fields take their declared default.
pub trait JsonDecoder<T> {
    fn decode<'de, D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>;
}
