//! Product Filter Tabs Component
//!
//! "All products" / "Likes" tabs above the product list. The likes tab
//! filters by user; anonymous visitors are told to log in instead.

use leptos::prelude::*;
use serde_json::Value;

use crate::bus::{BusEvent, Topic};
use crate::context::use_editor;
use crate::store::{store_set_product_user, use_editor_store};

/// Product list tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductTab {
    All,
    Likes,
}

/// What a tab click does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAction {
    /// Filter by this user's likes
    SetUser(u32),
    /// Likes need a login
    Unauthenticated,
    /// Show everything
    ClearUser,
}

pub fn tab_action(tab: ProductTab, likes_user: Option<u32>, authenticated: bool) -> TabAction {
    match (tab, likes_user) {
        (ProductTab::Likes, Some(user)) => TabAction::SetUser(user),
        (ProductTab::Likes, None) if !authenticated => TabAction::Unauthenticated,
        _ => TabAction::ClearUser,
    }
}

/// Product filter tabs
///
/// # Arguments
/// * `likes_user` - User whose likes the likes tab shows, if any
/// * `authenticated` - Whether the visitor is logged in
/// * `initial` - Tab selected when the page was rendered
#[component]
pub fn LookEditFilterTabs(
    likes_user: Option<u32>,
    authenticated: bool,
    #[prop(default = ProductTab::All)] initial: ProductTab,
) -> impl IntoView {
    let editor = use_editor();
    let store = use_editor_store();
    let (selected, set_selected) = signal(initial);

    if initial == ProductTab::Likes {
        if let Some(user) = likes_user {
            store_set_product_user(&store, Some(user));
        }
    }

    let on_select = move |tab: ProductTab| {
        match tab_action(tab, likes_user, authenticated) {
            TabAction::SetUser(user) => store_set_product_user(&store, Some(user)),
            TabAction::Unauthenticated => {
                editor.publish(BusEvent::new(Topic::ProductListUnauthenticated).with_payload(Value::Bool(true)));
            }
            TabAction::ClearUser => {
                editor.publish(BusEvent::new(Topic::ProductListUnauthenticated).with_payload(Value::Bool(false)));
                store_set_product_user(&store, None);
            }
        }
        set_selected.set(tab);
    };

    let tab_class = move |tab: ProductTab| {
        move || if selected.get() == tab { "tab selected" } else { "tab" }
    };

    view! {
        <ul id="product-tabs" class="product-tabs">
            <li>
                <a href="#" class=tab_class(ProductTab::All) on:click=move |ev| {
                    ev.prevent_default();
                    on_select(ProductTab::All);
                }>"All products"</a>
            </li>
            <li>
                <a href="#" class=tab_class(ProductTab::Likes) on:click=move |ev| {
                    ev.prevent_default();
                    on_select(ProductTab::Likes);
                }>"Likes"</a>
            </li>
        </ul>
    }
}
