//! Unified error type for all collection operations.

use thiserror::Error;

/// Things that can go wrong when using a collection.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// One or more required fields were missing (or falsy) on create.
    #[error("missing required fields: {}", .missing.join(", "))]
    Validation {
        /// Field names, in declaration order.
        missing: Vec<&'static str>,
    },
    /// A business key is already taken by another record.
    #[error("{field} {value:?} already exists")]
    DuplicateKey {
        /// Name of the unique field.
        field: &'static str,
        /// The colliding value.
        value: String,
    },
    /// No record with that id.
    #[error("{collection} {id} not found")]
    NotFound {
        /// Collection the lookup ran against.
        collection: &'static str,
        /// The id that was asked for.
        id: u64,
    },
    /// A record already holds the largest possible id, so no new one can be
    /// assigned.
    #[error("no {collection} ids left")]
    IdsExhausted {
        /// Collection that ran out.
        collection: &'static str,
    },
    /// File system problem (read, write, rename).
    #[error("i/o error: {0}")]
    Io(String),
    /// Failed to serialize the collection to bytes.
    #[error("serialization error: {0}")]
    Serialize(String),
    /// Failed to deserialize bytes back into a collection.
    #[error("deserialization error: {0}")]
    Deserialize(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Deserialize(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_fields() {
        let err = Error::Validation {
            missing: vec!["title", "stock"],
        };
        assert_eq!(err.to_string(), "missing required fields: title, stock");
    }

    #[test]
    fn syntax_errors_map_to_deserialize() {
        let err = serde_json::from_str::<Vec<u8>>("[1,").unwrap_err();
        assert!(matches!(Error::from(err), Error::Deserialize(_)));
    }
}
