use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, Storage};

use crate::error::StorageError;

/// The capability set the configuration store needs from its backend.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// A browser `Storage` object (usually `window.localStorage`).
#[derive(Clone, Debug)]
pub struct BrowserStorage {
    inner: Storage,
}

impl BrowserStorage {
    pub fn new(storage: Storage) -> Self {
        Self { inner: storage }
    }

    /// Resolves `window.localStorage`. Meant for the composition root; everything
    /// else should receive the handle it needs.
    pub fn local() -> Result<Self, StorageError> {
        let window = window().ok_or(StorageError::NoWindow)?;
        let storage = window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(describe(&err)))?
            .ok_or_else(|| StorageError::Unavailable("not provided by this context".to_string()))?;
        Ok(Self::new(storage))
    }

    #[cfg(test)]
    pub fn raw(&self) -> &Storage {
        &self.inner
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|err| StorageError::Backend(describe(&err)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|err| StorageError::Backend(describe(&err)))
    }
}

fn describe(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// In-memory storage. Clones share the same underlying map, the same way two
/// handles to `localStorage` do.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
