use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ConfigurationError;
use crate::models::{ConfigurationBlob, NAMESPACE_KEY};
use crate::services::storage::KeyValueStorage;

/// Configuration values kept as one JSON object under a single storage key.
///
/// The blob is read once when the store is built. Every `set`/`remove` writes
/// the whole blob back, so memory and storage stay in lockstep for this
/// instance. Two stores over the same namespace do not see each other's
/// writes; the last one to write wins.
#[derive(Debug)]
pub struct LocalConfigurationStore<S> {
    storage: S,
    namespace: String,
    values: ConfigurationBlob,
}

impl<S: KeyValueStorage> LocalConfigurationStore<S> {
    pub fn new(storage: S) -> Result<Self, ConfigurationError> {
        Self::with_namespace(storage, NAMESPACE_KEY)
    }

    /// Same as [`new`](Self::new) but reads and writes under `namespace`.
    /// A missing or empty stored value starts an empty blob; anything else
    /// must be a JSON object.
    pub fn with_namespace(
        storage: S,
        namespace: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let namespace = namespace.into();
        let values = match storage.get_item(&namespace)? {
            Some(raw) if !raw.is_empty() => parse_blob(&namespace, &raw)?,
            _ => ConfigurationBlob::new(),
        };
        debug!(
            "Loaded {} configuration entries from `{}`",
            values.len(),
            namespace
        );

        Ok(Self {
            storage,
            namespace,
            values,
        })
    }

    /// Returns the stored value, or `default` if `key` was never set.
    /// A stored `null` counts as set.
    pub fn get(&self, key: &str, default: Value) -> Value {
        self.values.get(key).cloned().unwrap_or(default)
    }

    pub fn get_as<T: DeserializeOwned>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T, ConfigurationError> {
        match self.values.get(key) {
            Some(value) => serde_json::from_value(value.clone()).map_err(|source| {
                ConfigurationError::TypeMismatch {
                    key: key.to_string(),
                    source,
                }
            }),
            None => Ok(default),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set<V: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &V,
    ) -> Result<(), ConfigurationError> {
        let value = serde_json::to_value(value).map_err(|source| ConfigurationError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.values.insert(key.to_string(), value);
        self.persist()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), ConfigurationError> {
        self.values.remove(key);
        self.persist()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn blob(&self) -> &ConfigurationBlob {
        &self.values
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // Memory is already updated when this runs; a failed write is reported
    // but not rolled back.
    fn persist(&self) -> Result<(), ConfigurationError> {
        let json = encode_blob(&self.namespace, &self.values)?;
        trace!("Persisting {} bytes to `{}`", json.len(), self.namespace);
        self.storage.set_item(&self.namespace, &json)?;
        Ok(())
    }
}

fn parse_blob(namespace: &str, raw: &str) -> Result<ConfigurationBlob, ConfigurationError> {
    let document: Value =
        serde_json::from_str(raw).map_err(|source| ConfigurationError::Malformed {
            namespace: namespace.to_string(),
            source,
        })?;
    match document {
        Value::Object(values) => Ok(values),
        _ => Err(ConfigurationError::NotAnObject {
            namespace: namespace.to_string(),
        }),
    }
}

// A map of string keys to JSON values always serializes; the error arm only
// exists because serde_json's signature is fallible.
fn encode_blob(namespace: &str, values: &ConfigurationBlob) -> Result<String, ConfigurationError> {
    serde_json::to_string(values).map_err(|source| ConfigurationError::Encode {
        namespace: namespace.to_string(),
        source,
    })
}
