//! Serialization layer. Defaults to pretty-printed JSON via serde_json.
//!
//! Implement [`Serializer`] if you need a different format.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts a collection (an ordered slice of records) to/from bytes.
pub trait Serializer: Send + Sync {
    /// Encode records as one array.
    fn serialize<T: Serialize>(&self, records: &[T]) -> Result<Vec<u8>>;

    /// Decode one array back into records, keeping file order.
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Vec<T>>;
}

/// JSON serializer, pretty-printed unless told otherwise.
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    pretty: bool,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::pretty()
    }
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Indented JSON, one field per line.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize>(&self, records: &[T]) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        };
        bytes.map_err(Error::from)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Vec<T>> {
        serde_json::from_slice(bytes).map_err(Error::from)
    }
}
