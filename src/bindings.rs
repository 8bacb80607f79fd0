use std::error::Error;

use js_sys::JSON;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::Storage;

use crate::error::ConfigurationError;
use crate::services::local_configuration::LocalConfigurationStore;
use crate::services::storage::BrowserStorage;

/// JavaScript view of the configuration store.
///
/// ```js
/// const config = new LocalConfiguration(window.localStorage);
/// config.set("theme", "dark");
/// config.get("theme", "light"); // "dark"
/// ```
#[wasm_bindgen]
pub struct LocalConfiguration {
    store: LocalConfigurationStore<BrowserStorage>,
}

#[wasm_bindgen]
impl LocalConfiguration {
    #[wasm_bindgen(constructor)]
    pub fn new(storage: Storage) -> Result<LocalConfiguration, JsValue> {
        let store =
            LocalConfigurationStore::new(BrowserStorage::new(storage)).map_err(to_js_error)?;
        Ok(Self { store })
    }

    #[wasm_bindgen(js_name = withNamespace)]
    pub fn with_namespace(
        storage: Storage,
        namespace: String,
    ) -> Result<LocalConfiguration, JsValue> {
        let store = LocalConfigurationStore::with_namespace(BrowserStorage::new(storage), namespace)
            .map_err(to_js_error)?;
        Ok(Self { store })
    }

    /// Missing keys hand back `default_value` itself, not a copy.
    pub fn get(&self, key: &str, default_value: JsValue) -> Result<JsValue, JsValue> {
        match self.store.blob().get(key) {
            Some(value) => to_js(value),
            None => Ok(default_value),
        }
    }

    /// Values `JSON.stringify` cannot represent (`undefined`, functions) are
    /// dropped from the blob, so setting one removes the key.
    pub fn set(&mut self, key: &str, value: JsValue) -> Result<(), JsValue> {
        let result = match from_js(&value)? {
            Some(value) => self.store.set(key, &value),
            None => self.store.remove(key),
        };
        result.map_err(to_js_error)
    }

    pub fn remove(&mut self, key: &str) -> Result<(), JsValue> {
        self.store.remove(key).map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn namespace(&self) -> String {
        self.store.namespace().to_string()
    }
}

fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value)
        .map_err(|err| JsValue::from(js_sys::Error::new(&err.to_string())))?;
    JSON::parse(&json)
}

fn from_js(value: &JsValue) -> Result<Option<Value>, JsValue> {
    match JSON::stringify(value)?.as_string() {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|err| JsValue::from(js_sys::Error::new(&err.to_string()))),
        None => Ok(None),
    }
}

fn to_js_error(err: ConfigurationError) -> JsValue {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    js_sys::Error::new(&message).into()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn local_storage() -> Storage {
        web_sys::window().unwrap().local_storage().unwrap().unwrap()
    }

    fn fresh(namespace: &str) -> LocalConfiguration {
        let storage = local_storage();
        storage.remove_item(namespace).unwrap();
        LocalConfiguration::with_namespace(storage, namespace.to_string()).unwrap()
    }

    #[wasm_bindgen_test]
    fn missing_key_returns_the_default_object() {
        let config = fresh("bindings_default");
        let default = js_sys::Object::new();
        let value = config.get("layout", default.clone().into()).unwrap();
        assert!(JsValue::from(default).loose_eq(&value));
    }

    #[wasm_bindgen_test]
    fn set_persists_and_get_reads_back() {
        let mut config = fresh("bindings_set");
        config.set("theme", JsValue::from_str("dark")).unwrap();

        let theme = config.get("theme", JsValue::from_str("light")).unwrap();
        assert_eq!(theme.as_string().as_deref(), Some("dark"));
        assert_eq!(
            local_storage().get_item("bindings_set").unwrap().as_deref(),
            Some(r#"{"theme":"dark"}"#)
        );
        local_storage().remove_item("bindings_set").unwrap();
    }

    #[wasm_bindgen_test]
    fn setting_undefined_removes_the_key() {
        let mut config = fresh("bindings_undefined");
        config.set("a", JsValue::from_f64(1.0)).unwrap();
        config.set("a", JsValue::UNDEFINED).unwrap();

        let a = config.get("a", JsValue::from_str("x")).unwrap();
        assert_eq!(a.as_string().as_deref(), Some("x"));
        assert_eq!(
            local_storage().get_item("bindings_undefined").unwrap().as_deref(),
            Some("{}")
        );
        local_storage().remove_item("bindings_undefined").unwrap();
    }

    #[wasm_bindgen_test]
    fn malformed_storage_throws_on_construction() {
        let storage = local_storage();
        storage.set_item("bindings_malformed", "{oops").unwrap();
        let result =
            LocalConfiguration::with_namespace(storage.clone(), "bindings_malformed".to_string());
        assert!(result.is_err());
        storage.remove_item("bindings_malformed").unwrap();
    }

    #[wasm_bindgen_test]
    fn empty_stored_value_constructs_an_empty_store() {
        let storage = local_storage();
        storage.set_item("bindings_empty", "").unwrap();
        let config =
            LocalConfiguration::with_namespace(storage.clone(), "bindings_empty".to_string())
                .unwrap();
        let theme = config.get("theme", JsValue::from_str("light")).unwrap();
        assert_eq!(theme.as_string().as_deref(), Some("light"));
        storage.remove_item("bindings_empty").unwrap();
    }
}
