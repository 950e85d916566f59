//! Serializer implementations and typed helpers.
//!
//! Business data crosses the storage boundary in two steps: the typed value
//! is mapped to a `serde_json::Value` (`to_value` / `from_value`), then a
//! [`Serializer`] turns that tree into bytes. The first step is where type
//! mismatches surface; the second is pure encoding.
//!
//! The value tree has no representation for non-finite floats (they become
//! `null`), so [`to_blob`] decodes the tree back into `D` before encoding and
//! refuses data that would not load again.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::interfaces::{SerializationError, Serializer};

/// Supported blob encodings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    #[default]
    Json,
    #[serde(alias = "msgpack")]
    MessagePack,
}

impl SerializationFormat {
    /// Build the serializer for this format.
    pub fn serializer(self) -> Box<dyn Serializer> {
        match self {
            SerializationFormat::Json => Box::new(JsonSerializer),
            SerializationFormat::MessagePack => Box::new(MessagePackSerializer),
        }
    }
}

/// UTF-8 JSON blobs. Human-readable in the database.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, value: &serde_json::Value) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(value).map_err(SerializationError::Encode)
    }

    fn deserialize(&self, blob: &[u8]) -> Result<serde_json::Value, SerializationError> {
        serde_json::from_slice(blob).map_err(SerializationError::Decode)
    }
}

/// Compact MessagePack blobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePackSerializer;

impl Serializer for MessagePackSerializer {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn serialize(&self, value: &serde_json::Value) -> Result<Vec<u8>, SerializationError> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    fn deserialize(&self, blob: &[u8]) -> Result<serde_json::Value, SerializationError> {
        Ok(rmp_serde::from_slice(blob)?)
    }
}

/// Encode typed data with `serializer`.
///
/// Fails with [`SerializationError::Unrepresentable`] when the value tree no
/// longer decodes into `D`, e.g. a required `f64` holding NaN.
pub fn to_blob<D: Serialize + DeserializeOwned>(
    serializer: &dyn Serializer,
    data: &D,
) -> Result<Vec<u8>, SerializationError> {
    let value = serde_json::to_value(data).map_err(SerializationError::Encode)?;
    D::deserialize(&value).map_err(|source| SerializationError::Unrepresentable {
        target: std::any::type_name::<D>(),
        source,
    })?;
    serializer.serialize(&value)
}

/// Decode a blob produced by [`to_blob`] back into `D`.
pub fn from_blob<D: DeserializeOwned>(
    serializer: &dyn Serializer,
    blob: &[u8],
) -> Result<D, SerializationError> {
    let value = serializer.deserialize(blob)?;
    serde_json::from_value(value).map_err(|source| SerializationError::TypeMismatch {
        target: std::any::type_name::<D>(),
        source,
    })
}
