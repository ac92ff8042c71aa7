//! Persistence Integration Tests
//!
//! Looks saving through both backends, with in-memory browser storage and a
//! scripted remote store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use super::{BackendProvider, LocalStore, MemoryStorage, RemoteStore, LOOK_NAMESPACE};
use crate::error::{LookError, LookResult};

/// Remote store double: keeps records in memory, or fails every call with a
/// preset message.
#[derive(Default)]
pub(crate) struct FakeRemote {
    pub records: RefCell<HashMap<u64, Value>>,
    pub failure: RefCell<Option<String>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeRemote {
    pub fn fail_with(&self, message: &str) {
        *self.failure.borrow_mut() = Some(message.to_string());
    }

    pub fn succeed(&self) {
        *self.failure.borrow_mut() = None;
    }

    fn check(&self, call: String) -> LookResult<()> {
        self.calls.borrow_mut().push(call);
        match self.failure.borrow().as_ref() {
            Some(message) => Err(LookError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl RemoteStore for FakeRemote {
    async fn create(&self, record: &Value) -> LookResult<Value> {
        self.check("create".to_string())?;
        let id = self.records.borrow().len() as u64 + 1;
        let mut stored = record.clone();
        stored["id"] = Value::from(id);
        self.records.borrow_mut().insert(id, stored.clone());
        Ok(stored)
    }

    async fn read(&self, id: u64) -> LookResult<Value> {
        self.check(format!("read {}", id))?;
        self.records
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| LookError::Transport("404 Not Found".to_string()))
    }

    async fn update(&self, id: u64, record: &Value) -> LookResult<Value> {
        self.check(format!("update {}", id))?;
        self.records.borrow_mut().insert(id, record.clone());
        Ok(record.clone())
    }

    async fn destroy(&self, id: u64, record: &Value) -> LookResult<Value> {
        self.check(format!("destroy {}", id))?;
        self.records.borrow_mut().remove(&id);
        Ok(record.clone())
    }
}

/// Provider over fresh in-memory storage and a [`FakeRemote`].
pub(crate) fn test_provider() -> (BackendProvider, Rc<FakeRemote>) {
    let local = LocalStore::new(LOOK_NAMESPACE, Rc::new(MemoryStorage::new()));
    let remote = Rc::new(FakeRemote::default());
    (BackendProvider::new(local, remote.clone()), remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use crate::models::{Look, LookComponent, LookId};
    use crate::persistence::{Backend, PersistenceBackend, SyncMethod};
    use serde_json::json;

    fn component(value: Value) -> LookComponent {
        LookComponent::from_value(value).expect("object component")
    }

    #[tokio::test]
    async fn test_remote_save_success_clears_dirty() {
        let (provider, remote) = test_provider();
        let mut look = Look::new(Some(42), "photo", &provider, EventBus::new());
        look.set_title("Office");
        assert!(look.is_dirty());

        let saved = look.save().await.expect("save should succeed");

        assert!(!look.is_dirty());
        assert_eq!(saved["title"], "Office");
        assert_eq!(remote.calls.borrow().as_slice(), ["update 42"]);
        assert_eq!(remote.records.borrow()[&42]["id"], json!(42));
    }

    #[tokio::test]
    async fn test_remote_save_failure_keeps_dirty() {
        let (provider, remote) = test_provider();
        let mut look = Look::new(Some(42), "photo", &provider, EventBus::new());
        look.set_title("Office");
        remote.fail_with("500 Internal Server Error");

        let err = look.save().await.expect_err("save should fail");

        assert_eq!(err, LookError::Transport("500 Internal Server Error".to_string()));
        assert!(look.is_dirty());
        assert_eq!(look.title(), "Office");
    }

    #[tokio::test]
    async fn test_failed_save_then_retry_by_caller() {
        let (provider, remote) = test_provider();
        let mut look = Look::new(Some(42), "photo", &provider, EventBus::new());
        look.components_mut().add(component(json!({"id": 1})));

        remote.fail_with("timeout");
        assert!(look.save().await.is_err());
        assert_eq!(remote.calls.borrow().len(), 1);

        remote.succeed();
        assert!(look.save().await.is_ok());
        assert!(!look.is_dirty());
        assert_eq!(look.components().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_during_save_stays_dirty() {
        let (provider, _) = test_provider();
        let mut look = Look::new(Some(42), "photo", &provider, EventBus::new());
        look.set_title("first");

        let pending = look.save();
        look.set_title("second");
        pending.await.expect("save should succeed");

        assert!(look.is_dirty());
    }

    #[tokio::test]
    async fn test_local_draft_save_fetch_destroy() {
        let (provider, remote) = test_provider();
        let mut look = Look::new(None, "C", &provider, EventBus::new());
        look.set_title("Draft");
        look.components_mut().add(component(json!({"id": 1})));
        look.components_mut().add(component(json!({"id": 2})));

        look.save().await.expect("local save");
        assert!(!look.is_dirty());

        let mut reopened = Look::new(None, "C", &provider, EventBus::new());
        let fetched = reopened.fetch().await;
        assert!(reopened.apply_fetched(fetched).unwrap());
        assert_eq!(reopened.title(), "Draft");
        assert_eq!(reopened.serialize(), look.serialize());
        assert!(!reopened.is_dirty());

        look.destroy().await.expect("destroy");
        assert!(matches!(reopened.fetch().await, Err(LookError::NotFound { .. })));
        assert!(remote.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_destroy_clears_dirty() {
        let (provider, _) = test_provider();
        let mut look = Look::new(None, "C", &provider, EventBus::new());
        look.save().await.expect("local save");

        look.set_title("changed my mind");
        assert!(look.is_dirty());

        look.destroy().await.expect("destroy");
        assert!(!look.is_dirty());
    }

    #[tokio::test]
    async fn test_apply_fetched_without_stored_draft() {
        let (provider, _) = test_provider();
        let mut look = Look::new(None, "C", &provider, EventBus::new());
        look.set_title("unsaved");

        let fetched = look.fetch().await;
        assert!(!look.apply_fetched(fetched).unwrap());
        assert_eq!(look.title(), "unsaved");

        let broken = look.apply_fetched(Ok(json!({"components": "nope"})));
        assert!(matches!(broken, Err(LookError::Malformed(_))));
        let offline = look.apply_fetched(Err(LookError::Transport("offline".to_string())));
        assert_eq!(offline, Err(LookError::Transport("offline".to_string())));
    }

    #[tokio::test]
    async fn test_new_look_is_created_and_takes_assigned_id() {
        let (provider, _) = test_provider();
        let mut look = Look::new(None, "", &provider, EventBus::new());
        look.set_title("untitled");
        assert!(look.is_new());

        let created = look.save().await.expect("create");

        let assigned = look.id();
        assert!(!look.is_new());
        assert!(!look.is_dirty());
        assert_eq!(created["id"], json!(assigned.to_string()));

        // Later saves update the same record.
        look.set_title("named");
        look.save().await.expect("update");
        let all = look.backend().read(None).await.expect("find all");
        assert_eq!(all.as_array().map(Vec::len), Some(1));
        assert_eq!(look.fetch().await.expect("stored")["title"], "named");
    }

    #[tokio::test]
    async fn test_local_destroy_missing_is_not_found() {
        let (provider, _) = test_provider();
        let mut look = Look::new(None, "C", &provider, EventBus::new());
        look.set_title("never saved");

        let err = look.destroy().await.expect_err("nothing to destroy");

        assert_eq!(err, LookError::not_found(LOOK_NAMESPACE, "C"));
        assert!(look.is_dirty());
    }

    #[tokio::test]
    async fn test_local_read_without_id_returns_all() {
        let (provider, _) = test_provider();
        let backend = provider.bind(&LookId::Client("C".to_string()));
        backend.update(&LookId::Client("C".into()), &json!({"id": "C"})).await.unwrap();
        backend.update(&LookId::Client("P".into()), &json!({"id": "P"})).await.unwrap();

        let all = backend.read(None).await.expect("find all");
        assert_eq!(all.as_array().map(Vec::len), Some(2));

        let none = backend.read(Some(&LookId::Client(String::new()))).await.unwrap();
        assert_eq!(none.as_array().map(Vec::len), Some(2));

        let one = backend.read(Some(&LookId::Client("P".into()))).await.unwrap();
        assert_eq!(one, json!({"id": "P"}));

        let missing = backend.read(Some(&LookId::Client("X".into()))).await;
        assert_eq!(missing, Err(LookError::not_found(LOOK_NAMESPACE, "X")));
    }

    #[tokio::test]
    async fn test_backends_never_cross() {
        let (provider, remote) = test_provider();
        let draft = Look::new(None, "photo", &provider, EventBus::new());
        let claimed = Look::new(Some(7), "photo", &provider, EventBus::new());

        draft.save().await.unwrap();
        claimed.save().await.unwrap();

        assert_eq!(remote.calls.borrow().as_slice(), ["update 7"]);
        assert!(matches!(draft.backend(), Backend::Local(_)));
    }

    #[tokio::test]
    async fn test_remote_create_and_read() {
        let (provider, remote) = test_provider();
        let backend = provider.bind(&LookId::Server(1));

        let created = backend.sync(SyncMethod::Create, &LookId::Server(1), &json!({"title": "new"})).await.unwrap();
        assert_eq!(created["id"], json!(1));

        let read = backend.read(Some(&LookId::Server(1))).await.unwrap();
        assert_eq!(read["title"], "new");

        let err = backend.read(Some(&LookId::Server(9))).await.unwrap_err();
        assert_eq!(err, LookError::Transport("404 Not Found".to_string()));
        assert_eq!(remote.calls.borrow().len(), 3);
    }
}
