//! Look Entity
//!
//! A styled outfit: a few attributes plus an ordered collection of placed
//! components. A look is bound to the browser or to the server when it is
//! created and saves through that backend for its whole life.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::component::{ChangeOrigin, LookComponent, LookComponentCollection};
use crate::bus::{EventBus, Subscription, Topic};
use crate::error::{LookError, LookResult};
use crate::persistence::{Backend, BackendProvider, SyncMethod};

/// Attributes with dedicated fields; everything else is kept verbatim.
const RESERVED_KEYS: &[&str] = &["id", "component", "components", "published", "description", "title"];

// ========================
// Identity
// ========================

/// What kind of look is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookKind {
    #[serde(rename = "P")]
    Photo,
    #[serde(rename = "C")]
    Collage,
}

impl LookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookKind::Photo => "P",
            LookKind::Collage => "C",
        }
    }

    /// Kind for a client type token; anything that is not a photo is a collage.
    pub fn from_token(token: &str) -> Self {
        match token {
            "photo" | "P" => LookKind::Photo,
            _ => LookKind::Collage,
        }
    }
}

/// Server-assigned id, or the client type token of an unclaimed draft
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookId {
    Server(u64),
    Client(String),
}

impl LookId {
    /// A positive server id wins; otherwise the look is a client draft.
    pub fn select(server_id: Option<i64>, type_token: &str) -> Self {
        match server_id.and_then(|id| u64::try_from(id).ok()).filter(|id| *id > 0) {
            Some(id) => LookId::Server(id),
            None => LookId::Client(type_token.to_string()),
        }
    }

    pub fn server_id(&self) -> Option<u64> {
        match self {
            LookId::Server(id) => Some(*id),
            LookId::Client(_) => None,
        }
    }

    /// Storage key; an empty client token means "no id".
    pub fn key(&self) -> Option<String> {
        match self {
            LookId::Server(id) => Some(id.to_string()),
            LookId::Client(token) if !token.is_empty() => Some(token.clone()),
            LookId::Client(_) => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            LookId::Server(id) => Value::from(*id),
            LookId::Client(token) => Value::String(token.clone()),
        }
    }
}

impl fmt::Display for LookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookId::Server(id) => write!(f, "{}", id),
            LookId::Client(token) => write!(f, "{}", token),
        }
    }
}

// ========================
// Attributes
// ========================

/// Look attributes as read from a record, without its components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LookAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LookId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<LookKind>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Attributes the editor does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Servers send `null` for unset fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ========================
// Dirty state
// ========================

/// Unsaved-change tracking.
///
/// Every tracked mutation bumps `revision`; a save clears only the revision it
/// sent, so edits made while a request is in flight keep the look dirty.
#[derive(Debug, Default)]
struct DirtyState {
    revision: Cell<u64>,
    clean: Cell<u64>,
}

impl DirtyState {
    fn mark(&self) {
        self.revision.set(self.revision.get() + 1);
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn mark_clean(&self, revision: u64) {
        if revision > self.clean.get() {
            self.clean.set(revision);
        }
    }

    fn is_dirty(&self) -> bool {
        self.revision.get() != self.clean.get()
    }
}

// ========================
// Look
// ========================

/// The look being edited
pub struct Look {
    /// Shared with in-flight requests: a create assigns the id.
    id: Rc<RefCell<LookId>>,
    kind: LookKind,
    published: bool,
    description: String,
    title: String,
    extra: Map<String, Value>,
    components: LookComponentCollection,
    backend: Backend,
    dirty: Rc<DirtyState>,
    bus: EventBus,
    _dirty_subscription: Subscription,
}

impl Look {
    /// Start a look session.
    ///
    /// `server_id` is the id of a claimed look (absent or non-positive for a
    /// draft); `type_token` is the client type token ("photo", "collage", ...).
    pub fn new(server_id: Option<i64>, type_token: &str, provider: &BackendProvider, bus: EventBus) -> Self {
        let id = LookId::select(server_id, type_token);
        let backend = provider.bind(&id);
        let dirty = Rc::new(DirtyState::default());

        let flag = dirty.clone();
        let subscription = bus.subscribe(Topic::LookDirty, move |_| flag.mark());

        log::debug!(
            "look initialize id={} backend={}",
            id,
            if backend.is_local() { "client" } else { "server" }
        );

        Self {
            id: Rc::new(RefCell::new(id)),
            kind: LookKind::from_token(type_token),
            published: false,
            description: String::new(),
            title: String::new(),
            extra: Map::new(),
            components: LookComponentCollection::new(bus.clone()),
            backend,
            dirty,
            bus,
            _dirty_subscription: subscription,
        }
    }

    pub fn id(&self) -> LookId {
        self.id.borrow().clone()
    }

    /// Never stored: the look has no usable id yet.
    pub fn is_new(&self) -> bool {
        self.id.borrow().key().is_none()
    }

    pub fn kind(&self) -> LookKind {
        self.kind
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn published(&self) -> bool {
        self.published
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn components(&self) -> &LookComponentCollection {
        &self.components
    }

    /// Component edits go through the collection, which reports them on the bus.
    pub fn components_mut(&mut self) -> &mut LookComponentCollection {
        &mut self.components
    }

    // ------------------------
    // Dirty tracking
    // ------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Flag unsaved changes. Safe to call any number of times.
    pub fn mark_dirty(&self) {
        self.dirty.mark();
    }

    // ------------------------
    // Attribute edits
    // ------------------------

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.bus.emit(Topic::LookDirty);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.bus.emit(Topic::LookDirty);
    }

    pub fn set_published(&mut self, published: bool) {
        self.published = published;
        self.bus.emit(Topic::LookDirty);
    }

    /// Set a free-form attribute. Keys with a dedicated setter, `id` and
    /// `component` are refused.
    pub fn set_attribute(&mut self, key: &str, value: Value) -> bool {
        if RESERVED_KEYS.contains(&key) {
            return false;
        }
        self.extra.insert(key.to_string(), value);
        self.bus.emit(Topic::LookDirty);
        true
    }

    // ------------------------
    // Serialization
    // ------------------------

    /// Read a record into the look.
    ///
    /// `None` or `null` means there is nothing to apply: the look is left
    /// alone and `Ok(None)` is returned. Otherwise the components replace the
    /// current ones without marking the look dirty, and the remaining
    /// attributes are returned for the caller to apply. `raw` is not modified.
    pub fn deserialize(&mut self, raw: Option<&Value>) -> LookResult<Option<LookAttributes>> {
        let Some(raw) = raw.filter(|raw| !raw.is_null()) else {
            return Ok(None);
        };
        let Value::Object(fields) = raw else {
            return Err(LookError::Malformed("expected an object".to_string()));
        };

        let mut fields = fields.clone();
        let components = parse_components(fields.remove("components"))?;
        let attributes: LookAttributes = serde_json::from_value(Value::Object(fields))?;

        self.components.reset(components, ChangeOrigin::Load);
        Ok(Some(attributes))
    }

    /// Deserialize `raw` and apply its attributes. `id` and `component` are
    /// fixed at creation and are not taken from the record.
    ///
    /// Returns whether anything was applied. A loaded look is clean.
    pub fn load(&mut self, raw: Option<&Value>) -> LookResult<bool> {
        let Some(attributes) = self.deserialize(raw)? else {
            return Ok(false);
        };
        let id = self.id();
        if attributes.id.as_ref().is_some_and(|record_id| *record_id != id) {
            log::debug!("look {}: ignoring record id {:?}", id, attributes.id);
        }
        self.published = attributes.published;
        self.description = attributes.description;
        self.title = attributes.title;
        self.extra.extend(attributes.extra);
        self.dirty.mark_clean(self.dirty.revision());
        Ok(true)
    }

    /// Flat record of the look: every attribute plus its components.
    pub fn serialize(&self) -> Value {
        let mut json = self.extra.clone();
        json.insert("id".to_string(), self.id.borrow().to_json());
        json.insert("published".to_string(), Value::Bool(self.published));
        json.insert("component".to_string(), Value::from(self.kind.as_str()));
        json.insert("description".to_string(), Value::String(self.description.clone()));
        json.insert("title".to_string(), Value::String(self.title.clone()));
        json.insert(
            "components".to_string(),
            Value::Array(self.components.map(LookComponent::to_json)),
        );
        Value::Object(json)
    }

    // ------------------------
    // Persistence
    // ------------------------

    /// Save the current state through the bound backend. A look that was
    /// never stored is created, and takes the id the backend assigns.
    pub fn save(&self) -> impl Future<Output = LookResult<Value>> + 'static {
        let method = if self.is_new() { SyncMethod::Create } else { SyncMethod::Update };
        self.sync(method)
    }

    /// Read the stored record.
    ///
    /// The future cannot touch the look; hand its output to
    /// [`Look::apply_fetched`].
    pub fn fetch(&self) -> impl Future<Output = LookResult<Value>> + 'static {
        self.sync(SyncMethod::Read)
    }

    /// Apply the outcome of [`Look::fetch`].
    ///
    /// A record is loaded; a record that does not exist yet is not an error
    /// and leaves the look as it is. Returns whether anything was applied.
    pub fn apply_fetched(&mut self, fetched: LookResult<Value>) -> LookResult<bool> {
        match fetched {
            Ok(record) => self.load(Some(&record)),
            Err(LookError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete the stored record.
    pub fn destroy(&self) -> impl Future<Output = LookResult<Value>> + 'static {
        self.sync(SyncMethod::Delete)
    }

    /// Send the current snapshot to the backend.
    ///
    /// The returned future does not borrow the look. A successful write marks
    /// the dispatched revision clean; a failure leaves the dirty state alone
    /// and is returned as reported by the backend.
    pub fn sync(&self, method: SyncMethod) -> impl Future<Output = LookResult<Value>> + 'static {
        let backend = self.backend.clone();
        let slot = self.id.clone();
        let id = self.id();
        let snapshot = self.serialize();
        let dirty = self.dirty.clone();
        let revision = dirty.revision();

        async move {
            let result = backend.sync(method, &id, &snapshot).await;
            match &result {
                Ok(record) if method == SyncMethod::Create => {
                    if let Some(assigned) = assigned_id(record) {
                        log::debug!("look {} stored as {}", id, assigned);
                        *slot.borrow_mut() = assigned;
                    }
                    dirty.mark_clean(revision);
                }
                Ok(_) if method != SyncMethod::Read => dirty.mark_clean(revision),
                Ok(_) => {}
                Err(LookError::NotFound { .. }) if method == SyncMethod::Read => {
                    log::debug!("look {} is not stored yet", id)
                }
                Err(e) => log::warn!("look {} {} failed: {}", id, method.as_str(), e),
            }
            result
        }
    }
}

/// Usable id of a freshly created record.
fn assigned_id(record: &Value) -> Option<LookId> {
    let id: LookId = serde_json::from_value(record.get("id")?.clone()).ok()?;
    id.key().map(|_| id)
}

fn parse_components(raw: Option<Value>) -> LookResult<Vec<LookComponent>> {
    let items = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(LookError::Malformed(format!(
                "components must be a list, got {}",
                other
            )))
        }
    };

    let mut components = Vec::with_capacity(items.len());
    for item in items {
        if item.is_null() {
            log::warn!("look: dropping null component");
            continue;
        }
        let component = LookComponent::from_value(item)
            .ok_or_else(|| LookError::Malformed("component must be an object".to_string()))?;
        components.push(component);
    }
    Ok(components)
}
