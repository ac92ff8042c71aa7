//! Color Filter Component
//!
//! `<select>` over the product list's color facets. Picking a color
//! publishes a `product:facet` event; the product list does the filtering.

use leptos::prelude::*;
use serde_json::{json, Value};

use crate::bus::{BusEvent, Topic};
use crate::context::use_editor;
use crate::store::{store_color_facets, use_editor_store};

/// Payload of a facet pick
pub fn facet_payload(kind: &str, value: &str) -> Value {
    json!({ "type": kind, "value": value })
}

/// Color facet selector
#[component]
pub fn FilterProductColor() -> impl IntoView {
    let editor = use_editor();
    let store = use_editor_store();
    let (selected, set_selected) = signal(String::from("0"));

    let on_change = move |ev| {
        let value = event_target_value(&ev);
        set_selected.set(value.clone());
        editor.publish(BusEvent::new(Topic::ProductFacet).with_payload(facet_payload("color", &value)));
    };

    view! {
        <select class="filter-product-color" on:change=on_change>
            <option value="0">"COLOR"</option>
            {move || store_color_facets(&store).into_iter().map(|facet| {
                let id = facet.id.to_string();
                let is_selected = selected.get_untracked() == id;
                view! {
                    <option value=id selected=is_selected>{facet.label()}</option>
                }
            }).collect_view()}
        </select>
    }
}
