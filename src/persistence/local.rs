//! Local Backend
//!
//! Draft looks live in the browser until they are claimed. A namespace is a
//! single JSON object `{ "<id>": record, ... }` stored under the namespace
//! key, so every write rewrites the namespace.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::storage::KeyValueStorage;
use super::traits::PersistenceBackend;
use crate::error::{LookError, LookResult};
use crate::models::LookId;

/// Namespace used by the look editor.
pub const LOOK_NAMESPACE: &str = "edit_look";

/// Namespaced record store over a [`KeyValueStorage`].
///
/// Operations return `Ok(None)` when there is no record to act on; storage
/// failures are errors.
#[derive(Clone)]
pub struct LocalStore {
    namespace: String,
    storage: Rc<dyn KeyValueStorage>,
}

impl LocalStore {
    pub fn new(namespace: impl Into<String>, storage: Rc<dyn KeyValueStorage>) -> Self {
        Self {
            namespace: namespace.into(),
            storage,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn load(&self) -> LookResult<Map<String, Value>> {
        let Some(raw) = self.storage.get_item(&self.namespace)? else {
            return Ok(Map::new());
        };
        match serde_json::from_str::<Map<String, Value>>(&raw) {
            Ok(data) => Ok(data),
            Err(e) => {
                log::warn!("local store {}: discarding unreadable data: {}", self.namespace, e);
                Ok(Map::new())
            }
        }
    }

    /// Write the namespace back. An empty namespace is removed from storage.
    fn persist(&self, data: &Map<String, Value>) -> LookResult<()> {
        if data.is_empty() {
            return self.storage.remove_item(&self.namespace);
        }
        let raw = serde_json::to_string(data)?;
        self.storage.set_item(&self.namespace, &raw)
    }

    pub fn find(&self, id: &str) -> LookResult<Option<Value>> {
        Ok(self.load()?.remove(id))
    }

    pub fn find_all(&self) -> LookResult<Vec<Value>> {
        Ok(self.load()?.into_iter().map(|(_, record)| record).collect())
    }

    /// Store a new record, giving it a generated id when it has none.
    pub fn create(&self, record: &Value) -> LookResult<Option<Value>> {
        let Value::Object(fields) = record else {
            return Ok(None);
        };
        let mut fields = fields.clone();
        let key = match record_key(record) {
            Some(key) => key,
            None => {
                let key = uuid::Uuid::new_v4().to_string();
                fields.insert("id".to_string(), Value::String(key.clone()));
                key
            }
        };
        let stored = Value::Object(fields);
        let mut data = self.load()?;
        data.insert(key, stored.clone());
        self.persist(&data)?;
        Ok(Some(stored))
    }

    /// Insert or replace a record by its id.
    pub fn update(&self, record: &Value) -> LookResult<Option<Value>> {
        let Some(key) = record_key(record) else {
            return Ok(None);
        };
        let mut data = self.load()?;
        data.insert(key, record.clone());
        self.persist(&data)?;
        Ok(Some(record.clone()))
    }

    /// Remove a record. Returns the record given when something was removed.
    pub fn destroy(&self, record: &Value) -> LookResult<Option<Value>> {
        let Some(key) = record_key(record) else {
            return Ok(None);
        };
        let mut data = self.load()?;
        if data.remove(&key).is_none() {
            return Ok(None);
        }
        self.persist(&data)?;
        Ok(Some(record.clone()))
    }
}

/// Storage key of a record: its `id`, as text. Empty ids count as missing.
fn record_key(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// [`PersistenceBackend`] over a [`LocalStore`]: "no record" becomes
/// [`LookError::NotFound`].
#[derive(Clone)]
pub struct LocalBackend {
    store: LocalStore,
}

impl LocalBackend {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    fn found(&self, id: impl Into<String>, resp: Option<Value>) -> LookResult<Value> {
        resp.ok_or_else(|| LookError::not_found(self.store.namespace(), id))
    }
}

#[async_trait(?Send)]
impl PersistenceBackend for LocalBackend {
    async fn create(&self, record: &Value) -> LookResult<Value> {
        let resp = self.store.create(record)?;
        self.found(record_key(record).unwrap_or_default(), resp)
    }

    async fn read(&self, id: Option<&LookId>) -> LookResult<Value> {
        match id.and_then(LookId::key) {
            Some(key) => {
                let resp = self.store.find(&key)?;
                self.found(key, resp)
            }
            None => Ok(Value::Array(self.store.find_all()?)),
        }
    }

    async fn update(&self, id: &LookId, record: &Value) -> LookResult<Value> {
        let resp = self.store.update(record)?;
        self.found(id.to_string(), resp)
    }

    async fn destroy(&self, id: &LookId, record: &Value) -> LookResult<Value> {
        let resp = self.store.destroy(record)?;
        self.found(id.to_string(), resp)
    }
}
