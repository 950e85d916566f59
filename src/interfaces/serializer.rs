//! Blob serialization interface.

/// Errors raised while encoding or decoding process data.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("JSON encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("JSON decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("MessagePack encode error: {0}")]
    MessagePackEncode(#[from] rmp_serde::encode::Error),

    #[error("MessagePack decode error: {0}")]
    MessagePackDecode(#[from] rmp_serde::decode::Error),

    #[error("Stored data does not match {target}: {source}")]
    TypeMismatch {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{target} cannot be stored without loss: {source}")]
    Unrepresentable {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Converts business data (as a JSON value tree) to and from a blob.
///
/// The repository maps typed data to `serde_json::Value` first, so a
/// serializer only deals with one self-describing shape and stays
/// object-safe.
pub trait Serializer: Send + Sync {
    /// Short codec name used in logs (e.g., "json").
    fn name(&self) -> &'static str;

    fn serialize(&self, value: &serde_json::Value) -> Result<Vec<u8>, SerializationError>;

    fn deserialize(&self, blob: &[u8]) -> Result<serde_json::Value, SerializationError>;
}
