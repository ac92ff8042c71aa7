//! Look Editor App
//!
//! Wires the page config, the event bus and the look together and renders
//! the editor chrome around the look canvas.

use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;

use crate::bus::{unsaved_changes_message, EventBus, Topic};
use crate::components::{
    DiscardDraftButton, FilterProductColor, LookEditFilterTabs, Popup, PopupDispatcher, PopupRegistry,
};
use crate::config::EditorConfig;
use crate::context::{use_editor, EditorContext};
use crate::models::Look;
use crate::persistence::{BackendProvider, BrowserStorage, HttpRemoteStore, KeyValueStorage, LocalStore, MemoryStorage};
use crate::store::{
    store_dirty, store_is_dirty, store_is_saving, store_last_error, store_look_changed, store_reset_color_facets,
    store_revision, EditorState, EditorStore,
};

const SAVE_ERROR_POPUP: &str = "save_error";

/// Browser storage, or memory when the browser refuses to give us any.
fn open_storage() -> Rc<dyn KeyValueStorage> {
    match BrowserStorage::open() {
        Ok(storage) => Rc::new(storage),
        Err(e) => {
            log::warn!("drafts will not survive a reload: {}", e);
            Rc::new(MemoryStorage::new())
        }
    }
}

fn build_provider(config: &EditorConfig) -> BackendProvider {
    let local = LocalStore::new(config.storage_namespace.clone(), open_storage());
    let remote = HttpRemoteStore::new(&config.resolved_origin(), &config.url_root);
    BackendProvider::new(local, Rc::new(remote))
}

#[component]
pub fn App(config: EditorConfig) -> impl IntoView {
    let store = EditorStore::new(EditorState::default());
    store_reset_color_facets(&store, config.color_facets.clone());
    provide_context(store);

    let bus = EventBus::new();
    let look = Look::new(config.look_id, &config.look_type, &build_provider(&config), bus.clone());
    let is_draft = look.backend().is_local();
    let editor = EditorContext::new(bus.clone(), look);
    provide_context(editor);

    // Mirror look changes into the store so views re-render.
    let subscription = bus.subscribe(Topic::LookDirty, move |_| store_look_changed(&store, true));
    let _subscription = StoredValue::<_, LocalStorage>::new_local(subscription);

    let _ = window_event_listener(ev::beforeunload, move |ev| {
        if let Some(message) = unsaved_changes_message(store_is_dirty(&store)) {
            ev.prevent_default();
            ev.set_return_value(message);
        }
    });

    let popups = RwSignal::new(PopupRegistry::<Popup>::default());
    popups.update(|r| {
        r.add(
            SAVE_ERROR_POPUP,
            Popup::new(
                Signal::derive(move || {
                    store_last_error(&store)
                        .map(|failure| failure.request.failure_title().to_string())
                        .unwrap_or_default()
                }),
                move || {
                    view! {
                        <p class="save-error">
                            {move || store_last_error(&store).map(|failure| failure.message).unwrap_or_default()}
                        </p>
                    }
                },
            ),
        )
    });

    // Load the stored look on mount.
    Effect::new(move |_| editor.reload(store));

    // Show the error popup whenever a request fails.
    Effect::new(move |_| {
        if store_last_error(&store).is_some() {
            popups.update(|r| {
                r.show(SAVE_ERROR_POPUP);
            });
        }
    });

    view! {
        <div class="look-editor">
            <LookHeader store=store is_draft=is_draft />
            <aside class="product-filters">
                <LookEditFilterTabs likes_user=config.likes_user authenticated=config.authenticated />
                <FilterProductColor />
            </aside>
            <p class="component-count">
                {move || {
                    let _ = store_revision(&store);
                    let count = editor.with_look(|look| look.components().len());
                    format!("{} items", count)
                }}
            </p>
            <PopupDispatcher registry=popups />
        </div>
    }
}

/// Title, description, publish flag and the save / discard actions
#[component]
fn LookHeader(store: EditorStore, is_draft: bool) -> impl IntoView {
    let editor = use_editor();

    let title = move || {
        let _ = store_revision(&store);
        editor.with_look(|look| look.title().to_string())
    };
    let description = move || {
        let _ = store_revision(&store);
        editor.with_look(|look| look.description().to_string())
    };
    let published = move || {
        let _ = store_revision(&store);
        editor.with_look(|look| look.published())
    };
    let status = move || {
        if store_is_saving(&store) {
            "Saving…"
        } else if store_dirty(&store) {
            "Unsaved changes"
        } else {
            "Saved"
        }
    };

    view! {
        <header class="look-header">
            <input
                class="look-title"
                placeholder="Title"
                prop:value=title
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    editor.update_look(|look| look.set_title(value));
                }
            />
            <textarea
                class="look-description"
                placeholder="Description"
                prop:value=description
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    editor.update_look(|look| look.set_description(value));
                }
            />
            <label class="look-published">
                <input
                    type="checkbox"
                    prop:checked=published
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        editor.update_look(|look| look.set_published(checked));
                    }
                />
                "Published"
            </label>
            <button
                class="save-btn"
                disabled=move || store_is_saving(&store)
                on:click=move |_| editor.save(store)
            >
                "Save"
            </button>
            <Show when=move || is_draft>
                <DiscardDraftButton />
            </Show>
            <span class="look-status">{status}</span>
        </header>
    }
}
