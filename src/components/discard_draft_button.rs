//! Discard Draft Button Component
//!
//! Drafts only live in this browser, so throwing one away cannot be undone.
//! The button arms on the first click and discards on the second; any edit
//! to the look in between disarms it again.

use leptos::prelude::*;

use crate::context::use_editor;
use crate::store::{store_is_saving, store_revision, use_editor_store};

fn button_label(armed: bool) -> &'static str {
    if armed {
        "Discard for good"
    } else {
        "Discard draft"
    }
}

/// Two-click discard for a local draft
#[component]
pub fn DiscardDraftButton() -> impl IntoView {
    let editor = use_editor();
    let store = use_editor_store();
    let armed = RwSignal::new(false);

    Effect::new(move |_| {
        let _ = store_revision(&store);
        armed.set(false);
    });

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.stop_propagation();
        if armed.get_untracked() {
            armed.set(false);
            editor.discard(store);
        } else {
            armed.set(true);
        }
    };

    view! {
        <span class="discard-draft" class:armed=move || armed.get()>
            <button
                class="discard-btn"
                disabled=move || store_is_saving(&store)
                on:click=on_click
            >
                {move || button_label(armed.get())}
            </button>
            {move || armed.get().then(|| view! {
                <button class="keep-btn" on:click=move |_| armed.set(false)>"Keep"</button>
            })}
        </span>
    }
}
