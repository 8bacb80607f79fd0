use serde_json::{Map, Value};

/// Storage key holding the whole configuration document.
pub const NAMESPACE_KEY: &str = "operaton";

/// In-memory mirror of the JSON object stored under the namespace key.
pub type ConfigurationBlob = Map<String, Value>;
