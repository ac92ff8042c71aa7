//! Backend Binding
//!
//! A look is bound to exactly one backend when it is created. The binding is
//! part of the look's identity and never changes afterwards.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use super::local::{LocalBackend, LocalStore};
use super::remote::RemoteBackend;
use super::traits::{PersistenceBackend, RemoteStore, SyncMethod};
use crate::error::LookResult;
use crate::models::LookId;

/// The backend a look talks to
#[derive(Clone)]
pub enum Backend {
    /// Browser storage; anonymous drafts
    Local(LocalBackend),
    /// Server; looks owned by a user
    Remote(RemoteBackend),
}

impl Backend {
    pub fn is_local(&self) -> bool {
        matches!(self, Backend::Local(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Backend::Remote(_))
    }

    /// Run one CRUD method for the look `id` with its serialized `snapshot`.
    pub async fn sync(&self, method: SyncMethod, id: &LookId, snapshot: &Value) -> LookResult<Value> {
        log::debug!(
            "look sync {} id={} backend={}",
            method.as_str(),
            id,
            if self.is_local() { "client" } else { "server" }
        );
        match method {
            SyncMethod::Create => self.create(snapshot).await,
            SyncMethod::Read => self.read(Some(id)).await,
            SyncMethod::Update => self.update(id, snapshot).await,
            SyncMethod::Delete => self.destroy(id, snapshot).await,
        }
    }
}

#[async_trait(?Send)]
impl PersistenceBackend for Backend {
    async fn create(&self, record: &Value) -> LookResult<Value> {
        match self {
            Backend::Local(b) => b.create(record).await,
            Backend::Remote(b) => b.create(record).await,
        }
    }

    async fn read(&self, id: Option<&LookId>) -> LookResult<Value> {
        match self {
            Backend::Local(b) => b.read(id).await,
            Backend::Remote(b) => b.read(id).await,
        }
    }

    async fn update(&self, id: &LookId, record: &Value) -> LookResult<Value> {
        match self {
            Backend::Local(b) => b.update(id, record).await,
            Backend::Remote(b) => b.update(id, record).await,
        }
    }

    async fn destroy(&self, id: &LookId, record: &Value) -> LookResult<Value> {
        match self {
            Backend::Local(b) => b.destroy(id, record).await,
            Backend::Remote(b) => b.destroy(id, record).await,
        }
    }
}

/// Hands out the right backend for a look id.
#[derive(Clone)]
pub struct BackendProvider {
    local: LocalStore,
    remote: Rc<dyn RemoteStore>,
}

impl BackendProvider {
    pub fn new(local: LocalStore, remote: Rc<dyn RemoteStore>) -> Self {
        Self { local, remote }
    }

    /// Server ids go to the remote store, client tokens to local storage.
    pub fn bind(&self, id: &LookId) -> Backend {
        match id {
            LookId::Server(_) => Backend::Remote(RemoteBackend::new(self.remote.clone())),
            LookId::Client(_) => Backend::Local(LocalBackend::new(self.local.clone())),
        }
    }
}
