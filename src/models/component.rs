//! Look Components
//!
//! A look is built from an ordered collection of placed items. The editor
//! does not interpret component fields; it only keeps them in order and
//! hands them to the backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bus::{EventBus, Topic};

/// Client-side identity of a component, assigned on insertion.
///
/// Never serialized: the wire record only carries the component's own fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentCid(u32);

/// Where a collection change came from.
///
/// `Load` replaces content without notifying anyone; `UserEdit` is a tracked
/// mutation and marks the look dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    Load,
    UserEdit,
}

/// A single item placed in a look (product, position, size, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookComponent {
    attributes: Map<String, Value>,
}

impl LookComponent {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Build a component from a JSON object. Anything else is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(attributes) => Some(Self { attributes }),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

/// Ordered components of one look.
///
/// User edits publish [`Topic::LookDirty`] on the bus the collection was
/// created with.
pub struct LookComponentCollection {
    items: Vec<(ComponentCid, LookComponent)>,
    next_cid: u32,
    bus: EventBus,
}

impl LookComponentCollection {
    pub fn new(bus: EventBus) -> Self {
        Self {
            items: Vec::new(),
            next_cid: 1,
            bus,
        }
    }

    fn assign_cid(&mut self) -> ComponentCid {
        let cid = ComponentCid(self.next_cid);
        self.next_cid += 1;
        cid
    }

    fn changed(&self, origin: ChangeOrigin) {
        if origin == ChangeOrigin::UserEdit {
            self.bus.emit(Topic::LookDirty);
        }
    }

    /// Replace the whole content, keeping the given order.
    pub fn reset(&mut self, items: Vec<LookComponent>, origin: ChangeOrigin) {
        self.items.clear();
        for item in items {
            let cid = self.assign_cid();
            self.items.push((cid, item));
        }
        self.changed(origin);
    }

    /// Append a component and return its client id.
    pub fn add(&mut self, component: LookComponent) -> ComponentCid {
        let cid = self.assign_cid();
        self.items.push((cid, component));
        self.changed(ChangeOrigin::UserEdit);
        cid
    }

    /// Remove a component. Removing an unknown id changes nothing.
    pub fn remove(&mut self, cid: ComponentCid) -> Option<LookComponent> {
        let index = self.items.iter().position(|(c, _)| *c == cid)?;
        let (_, removed) = self.items.remove(index);
        self.changed(ChangeOrigin::UserEdit);
        Some(removed)
    }

    /// Edit a component in place (move, resize, ...). Returns false when the
    /// component is not in the collection.
    pub fn update<F>(&mut self, cid: ComponentCid, edit: F) -> bool
    where
        F: FnOnce(&mut LookComponent),
    {
        let Some((_, component)) = self.items.iter_mut().find(|(c, _)| *c == cid) else {
            return false;
        };
        edit(component);
        self.changed(ChangeOrigin::UserEdit);
        true
    }

    pub fn get(&self, cid: ComponentCid) -> Option<&LookComponent> {
        self.items.iter().find(|(c, _)| *c == cid).map(|(_, item)| item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentCid, &LookComponent)> {
        self.items.iter().map(|(cid, item)| (*cid, item))
    }

    /// Apply `f` to every component, in order.
    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: FnMut(&LookComponent) -> T,
    {
        self.items.iter().map(|(_, item)| item).map(f).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
