use thiserror::Error;

/// Failures raised by a [`KeyValueStorage`](crate::services::storage::KeyValueStorage) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("no window object")]
    NoWindow,
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation failed: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("stored configuration under `{namespace}` is not valid JSON")]
    Malformed {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored configuration under `{namespace}` is not a JSON object")]
    NotAnObject { namespace: String },
    #[error("value for `{key}` cannot be serialized to JSON")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("configuration under `{namespace}` cannot be encoded as JSON")]
    Encode {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("value for `{key}` does not have the requested type")]
    TypeMismatch {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
