//! Persistence Layer
//!
//! Backends a look can be saved to, and the storage under them.

mod backend;
mod local;
mod remote;
mod storage;
mod traits;

#[cfg(test)]
pub(crate) mod tests;

pub use backend::{Backend, BackendProvider};
pub use local::{LocalBackend, LocalStore, LOOK_NAMESPACE};
pub use remote::{HttpRemoteStore, RemoteBackend};
pub use storage::{BrowserStorage, KeyValueStorage, MemoryStorage};
pub use traits::{PersistenceBackend, RemoteStore, SyncMethod};
