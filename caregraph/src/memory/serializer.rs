//! Serializer for stored sessions (value <-> bytes).

use crate::memory::StoreError;

/// Serializes and deserializes values for persistent session storage.
pub trait Serializer<S>: Send + Sync {
    fn serialize(&self, value: &S) -> Result<Vec<u8>, StoreError>;
    fn deserialize(&self, bytes: &[u8]) -> Result<S, StoreError>;
}

/// JSON-based serializer. Requires S: Serialize + serde::de::DeserializeOwned.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer;

impl<S> Serializer<S> for JsonSerializer
where
    S: serde::Serialize + serde::de::DeserializeOwned,
{
    fn serialize(&self, value: &S) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<S, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
