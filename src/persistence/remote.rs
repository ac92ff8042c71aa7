//! Remote Backend
//!
//! Claimed looks are stored on the server. The backend only maps look ids
//! to the remote store's numeric ids; results and failures pass through.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use super::traits::{PersistenceBackend, RemoteStore};
use crate::commands;
use crate::error::{LookError, LookResult};
use crate::models::LookId;

/// [`PersistenceBackend`] over a [`RemoteStore`].
#[derive(Clone)]
pub struct RemoteBackend {
    store: Rc<dyn RemoteStore>,
}

impl RemoteBackend {
    pub fn new(store: Rc<dyn RemoteStore>) -> Self {
        Self { store }
    }
}

fn server_id(id: &LookId) -> LookResult<u64> {
    id.server_id()
        .ok_or_else(|| LookError::Malformed(format!("look {} has no server id", id)))
}

#[async_trait(?Send)]
impl PersistenceBackend for RemoteBackend {
    async fn create(&self, record: &Value) -> LookResult<Value> {
        self.store.create(record).await
    }

    async fn read(&self, id: Option<&LookId>) -> LookResult<Value> {
        let id = id.ok_or_else(|| LookError::Malformed("remote read needs an id".to_string()))?;
        self.store.read(server_id(id)?).await
    }

    async fn update(&self, id: &LookId, record: &Value) -> LookResult<Value> {
        self.store.update(server_id(id)?, record).await
    }

    async fn destroy(&self, id: &LookId, record: &Value) -> LookResult<Value> {
        self.store.destroy(server_id(id)?, record).await
    }
}

/// [`RemoteStore`] speaking JSON over HTTP to `{origin}{url_root}`.
#[derive(Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    url_root: String,
}

impl HttpRemoteStore {
    pub fn new(origin: &str, url_root: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url_root: format!("{}{}", origin.trim_end_matches('/'), url_root),
        }
    }

    pub fn url_root(&self) -> &str {
        &self.url_root
    }
}

#[async_trait(?Send)]
impl RemoteStore for HttpRemoteStore {
    async fn create(&self, record: &Value) -> LookResult<Value> {
        commands::create_look(&self.client, &self.url_root, record).await
    }

    async fn read(&self, id: u64) -> LookResult<Value> {
        commands::fetch_look(&self.client, &self.url_root, id).await
    }

    async fn update(&self, id: u64, record: &Value) -> LookResult<Value> {
        commands::update_look(&self.client, &self.url_root, id, record).await
    }

    async fn destroy(&self, id: u64, record: &Value) -> LookResult<Value> {
        commands::delete_look(&self.client, &self.url_root, id, record).await
    }
}
