//! Popup Dispatcher Component
//!
//! One modal slot shared by every popup in the editor. Popups register under
//! a name and are shown by name; ESC, a click outside the popup or a
//! `popup_dispatcher:hide` event close it.

use std::collections::HashMap;

use leptos::ev;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use wasm_bindgen::JsCast;

use crate::bus::Topic;
use crate::context::use_editor;

const POPUP_ID: &str = "popup-slim";
const ESCAPE_KEY: &str = "Escape";

/// Named popups and which one is open
#[derive(Debug, Clone)]
pub struct PopupRegistry<T> {
    content: HashMap<String, T>,
    active: Option<String>,
}

impl<T> Default for PopupRegistry<T> {
    fn default() -> Self {
        Self {
            content: HashMap::new(),
            active: None,
        }
    }
}

impl<T> PopupRegistry<T> {
    pub fn add(&mut self, name: impl Into<String>, popup: T) {
        self.content.insert(name.into(), popup);
    }

    /// Unregister a popup, closing it if it is open.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        self.content.remove(name)
    }

    /// Open a popup by name. Unknown names leave the current state alone.
    pub fn show(&mut self, name: &str) -> Option<&T> {
        let popup = self.content.get(name)?;
        self.active = Some(name.to_string());
        Some(popup)
    }

    /// Close the open popup and return it.
    pub fn hide(&mut self) -> Option<&T> {
        let name = self.active.take()?;
        self.content.get(&name)
    }

    pub fn active(&self) -> Option<&T> {
        self.active.as_ref().and_then(|name| self.content.get(name))
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

/// A popup the dispatcher can show
#[derive(Clone)]
pub struct Popup {
    pub title: Signal<String>,
    pub content: ViewFn,
    /// Called when the popup is closed
    pub on_hide: Option<Callback<()>>,
}

impl Popup {
    pub fn new(title: impl Into<Signal<String>>, content: impl Into<ViewFn>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            on_hide: None,
        }
    }
}

/// Close the active popup, running its hide hook.
pub fn hide_popup(registry: RwSignal<PopupRegistry<Popup>>) {
    let closed = registry
        .try_update(|r| r.hide().and_then(|popup| popup.on_hide.clone()))
        .flatten();
    if let Some(on_hide) = closed {
        on_hide.run(());
    }
}

/// Modal slot for the registered popups
#[component]
pub fn PopupDispatcher(registry: RwSignal<PopupRegistry<Popup>>) -> impl IntoView {
    let editor = use_editor();

    // Kept for the lifetime of the component; dropping it unsubscribes.
    let subscription = editor
        .bus()
        .subscribe(Topic::PopupHide, move |_| hide_popup(registry));
    let _subscription = StoredValue::<_, LocalStorage>::new_local(subscription);

    let _ = window_event_listener(ev::keydown, move |ev| {
        if ev.key() == ESCAPE_KEY && registry.with_untracked(|r| r.is_active()) {
            hide_popup(registry);
        }
    });
    let _ = window_event_listener(ev::click, move |ev| {
        if !registry.with_untracked(|r| r.is_active()) {
            return;
        }
        let inside = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.closest(&format!("#{}", POPUP_ID)).ok().flatten())
            .is_some();
        if !inside {
            hide_popup(registry);
        }
    });

    let title = move || registry.with(|r| r.active().map(|p| p.title.get()).unwrap_or_default());
    let content = move || registry.with(|r| r.active().map(|p| p.content.run()));

    view! {
        <Show when=move || registry.with(|r| r.is_active())>
            <div class="popup-overlay"></div>
            <div id=POPUP_ID class="popup">
                <div class="popup-header">
                    <span class="title">{title}</span>
                    <button class="close" on:click=move |ev| {
                        ev.stop_propagation();
                        hide_popup(registry);
                    }>"×"</button>
                </div>
                <div class="content">{content}</div>
            </div>
        </Show>
    }
}
