//! Editor Context
//!
//! The look and the event bus are single-threaded, so they live in local
//! stored values; this handle is `Copy` and can be moved into any view
//! closure.

use std::future::Future;

use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;

use crate::bus::{BusEvent, EventBus};
use crate::error::LookResult;
use crate::models::Look;
use crate::store::{
    store_look_changed, store_request_finished, store_request_started, EditorStore, LookRequest, RequestFailure,
};

/// Editor-wide handles provided via context
#[derive(Clone, Copy)]
pub struct EditorContext {
    bus: StoredValue<EventBus, LocalStorage>,
    look: StoredValue<Look, LocalStorage>,
}

impl EditorContext {
    pub fn new(bus: EventBus, look: Look) -> Self {
        Self {
            bus: StoredValue::new_local(bus),
            look: StoredValue::new_local(look),
        }
    }

    /// Clone of the bus, for widgets that report changes
    pub fn bus(&self) -> EventBus {
        self.bus.get_value()
    }

    pub fn publish(&self, event: BusEvent) {
        self.bus.with_value(|bus| bus.publish(event));
    }

    pub fn with_look<R>(&self, f: impl FnOnce(&Look) -> R) -> R {
        self.look.with_value(f)
    }

    pub fn update_look(&self, f: impl FnOnce(&mut Look)) {
        self.look.update_value(f);
    }

    /// Save the look and report the outcome to the store.
    pub fn save(&self, store: EditorStore) {
        let request = self.with_look(|look| look.save());
        self.run(store, LookRequest::Save, request);
    }

    /// Delete the stored draft.
    pub fn discard(&self, store: EditorStore) {
        let request = self.with_look(|look| look.destroy());
        self.run(store, LookRequest::Discard, request);
    }

    /// Fetch the stored record and load it into the look.
    pub fn reload(&self, store: EditorStore) {
        let ctx = *self;
        let request = self.with_look(|look| look.fetch());
        spawn_local(async move {
            let fetched = request.await;
            let mut applied = Ok(false);
            ctx.update_look(|look| applied = look.apply_fetched(fetched));
            match applied {
                Ok(true) => store_look_changed(&store, false),
                Ok(false) => log::debug!("no stored look, starting a new draft"),
                Err(e) => {
                    let failure = RequestFailure {
                        request: LookRequest::Reload,
                        message: e.to_string(),
                    };
                    let dirty = ctx.with_look(|look| look.is_dirty());
                    store_request_finished(&store, Some(failure), dirty);
                }
            }
        });
    }

    fn run(
        &self,
        store: EditorStore,
        kind: LookRequest,
        request: impl Future<Output = LookResult<serde_json::Value>> + 'static,
    ) {
        let ctx = *self;
        store_request_started(&store);
        spawn_local(async move {
            let failure = request.await.err().map(|e| RequestFailure {
                request: kind,
                message: e.to_string(),
            });
            let dirty = ctx.with_look(|look| look.is_dirty());
            store_request_finished(&store, failure, dirty);
        });
    }
}

/// Get the editor context
pub fn use_editor() -> EditorContext {
    expect_context::<EditorContext>()
}
