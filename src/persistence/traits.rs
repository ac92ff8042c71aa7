//! Persistence Layer - Core Traits
//!
//! A look is saved through one of two backends: the browser (drafts) or the
//! server (claimed looks). Both expose the same CRUD surface.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LookResult;
use crate::models::LookId;

/// The four operations a look can ask of its backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMethod {
    Create,
    Read,
    Update,
    Delete,
}

impl SyncMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMethod::Create => "create",
            SyncMethod::Read => "read",
            SyncMethod::Update => "update",
            SyncMethod::Delete => "delete",
        }
    }
}

/// CRUD over serialized look records.
///
/// Every call answers asynchronously, even when the backend is synchronous,
/// so callers cannot tell which backend answered.
#[async_trait(?Send)]
pub trait PersistenceBackend {
    /// Store a new record
    async fn create(&self, record: &Value) -> LookResult<Value>;

    /// Read one record by id, or every record when `id` is `None`
    async fn read(&self, id: Option<&LookId>) -> LookResult<Value>;

    /// Store the current state of an existing record
    async fn update(&self, id: &LookId, record: &Value) -> LookResult<Value>;

    /// Delete a record
    async fn destroy(&self, id: &LookId, record: &Value) -> LookResult<Value>;
}

/// Remote object store keyed by numeric id.
///
/// Failures are reported as the store sees them; nothing reinterprets them.
#[async_trait(?Send)]
pub trait RemoteStore {
    async fn create(&self, record: &Value) -> LookResult<Value>;
    async fn read(&self, id: u64) -> LookResult<Value>;
    async fn update(&self, id: u64, record: &Value) -> LookResult<Value>;
    async fn destroy(&self, id: u64, record: &Value) -> LookResult<Value>;
}
