//! Editor Event Bus
//!
//! Single-threaded publish/subscribe hub shared by the look and the widgets
//! around it. Widgets that can change the look get a clone of the bus at
//! construction and report changes on [`Topic::LookDirty`]; they never hold
//! a reference to the look itself.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

// ========================
// Topics and events
// ========================

/// Named channels on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// A tracked mutation happened somewhere in the editor
    LookDirty,
    /// A product facet filter was picked (`{"type": .., "value": ..}`)
    ProductFacet,
    /// The product list needs (or no longer needs) a logged in user
    ProductListUnauthenticated,
    /// Close whatever popup is open
    PopupHide,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::LookDirty => "look:dirty",
            Topic::ProductFacet => "product:facet",
            Topic::ProductListUnauthenticated => "product_list:unauthenticated",
            Topic::PopupHide => "popup_dispatcher:hide",
        }
    }
}

/// A message published on the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    pub topic: Topic,
    /// Free-form JSON payload carrying topic-specific data.
    pub payload: serde_json::Value,
}

impl BusEvent {
    /// Create an event with a `null` payload.
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            payload: serde_json::Value::Null,
        }
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ========================
// EventBus
// ========================

type Handler = Rc<dyn Fn(&BusEvent)>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    handlers: HashMap<Topic, Vec<(u64, Handler)>>,
}

/// In-process event bus. Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every handler subscribed to its topic.
    ///
    /// Handlers run after the subscriber list is released, so a handler may
    /// publish or subscribe itself. Publishing with no subscribers is a no-op.
    pub fn publish(&self, event: BusEvent) {
        let handlers: Vec<Handler> = self
            .inner
            .borrow()
            .handlers
            .get(&event.topic)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();
        log::trace!("bus: {} -> {} handler(s)", event.topic.as_str(), handlers.len());
        for handler in handlers {
            handler(&event);
        }
    }

    /// Shorthand for publishing a payload-less event.
    pub fn emit(&self, topic: Topic) {
        self.publish(BusEvent::new(topic));
    }

    /// Register `handler` for `topic`. The handler stays registered until the
    /// returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(&BusEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .handlers
            .entry(topic)
            .or_default()
            .push((id, Rc::new(handler)));
        Subscription {
            bus: Rc::downgrade(&self.inner),
            topic,
            id,
        }
    }

    /// Number of live handlers on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(&topic)
            .map_or(0, Vec::len)
    }
}

/// Handle for a registered handler; unsubscribes on drop.
pub struct Subscription {
    bus: Weak<RefCell<BusInner>>,
    topic: Topic,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.bus.upgrade() else {
            return;
        };
        // Handlers are dropped after the borrow ends: a handler may own
        // further subscriptions, and those unsubscribe through this same bus.
        let removed: Vec<Handler> = match inner.try_borrow_mut() {
            Ok(mut inner) => match inner.handlers.get_mut(&self.topic) {
                Some(list) => {
                    let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(list)
                        .into_iter()
                        .partition(|(id, _)| *id == self.id);
                    *list = kept;
                    removed.into_iter().map(|(_, handler)| handler).collect()
                }
                None => Vec::new(),
            },
            Err(_) => {
                log::warn!("bus: {} handler {} left registered", self.topic.as_str(), self.id);
                Vec::new()
            }
        };
        drop(removed);
    }
}

// ========================
// Before-unload guard
// ========================

/// Message shown by the browser when leaving the page with unsaved changes.
pub const UNSAVED_CHANGES_MESSAGE: &str = "You have unsaved changes";

/// What the `beforeunload` hook should return for the given dirty state.
pub fn unsaved_changes_message(dirty: bool) -> Option<&'static str> {
    dirty.then_some(UNSAVED_CHANGES_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_publish_reaches_topic_subscribers_only() {
        let bus = EventBus::new();
        let dirty_hits = Rc::new(Cell::new(0));
        let facet_hits = Rc::new(Cell::new(0));

        let d = dirty_hits.clone();
        let _a = bus.subscribe(Topic::LookDirty, move |_| d.set(d.get() + 1));
        let f = facet_hits.clone();
        let _b = bus.subscribe(Topic::ProductFacet, move |_| f.set(f.get() + 1));

        bus.emit(Topic::LookDirty);
        bus.emit(Topic::LookDirty);

        assert_eq!(dirty_hits.get(), 2);
        assert_eq!(facet_hits.get(), 0);
    }

    #[test]
    fn test_payload_is_delivered() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        let _sub = bus.subscribe(Topic::ProductFacet, move |event| {
            *s.borrow_mut() = Some(event.payload.clone());
        });

        bus.publish(
            BusEvent::new(Topic::ProductFacet)
                .with_payload(serde_json::json!({"type": "color", "value": "3"})),
        );

        let payload = seen.borrow().clone().expect("handler should run");
        assert_eq!(payload["type"], "color");
        assert_eq!(payload["value"], "3");
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = bus.subscribe(Topic::PopupHide, move |_| h.set(h.get() + 1));
        assert_eq!(bus.subscriber_count(Topic::PopupHide), 1);

        drop(sub);
        bus.emit(Topic::PopupHide);

        assert_eq!(hits.get(), 0);
        assert_eq!(bus.subscriber_count(Topic::PopupHide), 0);
    }

    #[test]
    fn test_handler_can_publish_reentrantly() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));

        let inner_bus = bus.clone();
        let _forward = bus.subscribe(Topic::ProductListUnauthenticated, move |_| {
            inner_bus.emit(Topic::LookDirty);
        });
        let h = hits.clone();
        let _count = bus.subscribe(Topic::LookDirty, move |_| h.set(h.get() + 1));

        bus.emit(Topic::ProductListUnauthenticated);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_dropping_handler_releases_subscriptions_it_owns() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let inner = bus.subscribe(Topic::LookDirty, move |_| h.set(h.get() + 1));
        let outer = bus.subscribe(Topic::PopupHide, move |_| {
            let _owned = &inner;
        });
        assert_eq!(bus.subscriber_count(Topic::LookDirty), 1);

        drop(outer);
        bus.emit(Topic::LookDirty);

        assert_eq!(hits.get(), 0);
        assert_eq!(bus.subscriber_count(Topic::LookDirty), 0);
        assert_eq!(bus.subscriber_count(Topic::PopupHide), 0);
    }

    #[test]
    fn test_handler_can_drop_another_subscription() {
        let bus = EventBus::new();
        let holder: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let nested = bus.subscribe(Topic::LookDirty, |_| {});
        let slot = holder.clone();
        let outer = bus.subscribe(Topic::PopupHide, move |_| {
            slot.borrow_mut().take();
        });
        *holder.borrow_mut() = Some(nested);

        bus.emit(Topic::PopupHide);
        assert_eq!(bus.subscriber_count(Topic::LookDirty), 0);
        drop(outer);
        assert_eq!(bus.subscriber_count(Topic::PopupHide), 0);
    }

    #[test]
    fn test_publish_without_subscribers_does_not_panic() {
        EventBus::new().emit(Topic::LookDirty);
    }

    #[test]
    fn test_unsaved_changes_message() {
        assert_eq!(unsaved_changes_message(true), Some("You have unsaved changes"));
        assert_eq!(unsaved_changes_message(false), None);
    }
}
