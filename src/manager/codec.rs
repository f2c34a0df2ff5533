//! JSON encoding of cache payloads.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};

/// Encodes a value as UTF-8 JSON bytes.
pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decodes a scalar entry. Malformed bytes are an error, never a miss.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decodes a list entry.
///
/// A zero-length blob or JSON `null` carries no sequence and yields `None`;
/// an empty JSON array is a real, empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<Vec<T>>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(serde_json::from_slice::<Option<Vec<T>>>(bytes)?)
}

/// Rejects a value whose JSON form is `null`.
pub(crate) fn ensure_present<T: Serialize + ?Sized>(name: &'static str, value: &T) -> Result<()> {
    if serde_json::to_value(value)?.is_null() {
        return Err(CacheError::invalid_argument(name, "must not be null"));
    }
    Ok(())
}
