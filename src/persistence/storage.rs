//! Key/Value Storage
//!
//! The raw string store under the local backend: the browser's
//! `localStorage`, or an in-memory map for tests and for browsers where
//! `localStorage` is unavailable (private mode, disabled storage).

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{LookError, LookResult};

/// String key/value store with `localStorage` semantics
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> LookResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> LookResult<()>;
    fn remove_item(&self, key: &str) -> LookResult<()>;
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> LookResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> LookResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> LookResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage`
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// Open the page's local storage.
    pub fn open() -> LookResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| LookError::Storage("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| LookError::Storage("localStorage is unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> LookResult<Option<String>> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn set_item(&self, key: &str, value: &str) -> LookResult<()> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn remove_item(&self, key: &str) -> LookResult<()> {
        self.storage.remove_item(key).map_err(js_err)
    }
}

fn js_err(value: wasm_bindgen::JsValue) -> LookError {
    LookError::Storage(format!("{:?}", value))
}
