//! Editor State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The look itself
//! is not reactive; views re-read it when `revision` moves.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::ColorFacet;

/// Requests the editor sends on behalf of the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookRequest {
    Save,
    Discard,
    Reload,
}

impl LookRequest {
    /// Heading shown when this request fails
    pub fn failure_title(&self) -> &'static str {
        match self {
            LookRequest::Save => "Could not save",
            LookRequest::Discard => "Could not discard the draft",
            LookRequest::Reload => "Could not load the look",
        }
    }
}

/// A failed request and what the backend said
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestFailure {
    pub request: LookRequest,
    pub message: String,
}

/// Reactive view of the editor session
#[derive(Clone, Debug, Default, Store)]
pub struct EditorState {
    /// Unsaved changes exist
    pub dirty: bool,
    /// Bumped on every change to the look
    pub revision: u32,
    /// A save or delete is in flight
    pub saving: bool,
    /// Last failed request, for display
    pub last_error: Option<RequestFailure>,
    /// "Likes" product filter
    pub product_user_id: Option<u32>,
    /// Color facets of the current product list
    pub color_facets: Vec<ColorFacet>,
}

/// Type alias for the store
pub type EditorStore = Store<EditorState>;

/// Get the editor store from context
pub fn use_editor_store() -> EditorStore {
    expect_context::<EditorStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Record that the look changed
pub fn store_look_changed(store: &EditorStore, dirty: bool) {
    *store.dirty().write() = dirty;
    *store.revision().write() += 1;
}

/// Tracked read, for views
pub fn store_dirty(store: &EditorStore) -> bool {
    store.dirty().get()
}

/// Untracked read, for event handlers
pub fn store_is_dirty(store: &EditorStore) -> bool {
    store.dirty().get_untracked()
}

pub fn store_revision(store: &EditorStore) -> u32 {
    store.revision().get()
}

pub fn store_request_started(store: &EditorStore) {
    *store.saving().write() = true;
    *store.last_error().write() = None;
}

pub fn store_request_finished(store: &EditorStore, failure: Option<RequestFailure>, dirty: bool) {
    *store.saving().write() = false;
    *store.last_error().write() = failure;
    store_look_changed(store, dirty);
}

pub fn store_is_saving(store: &EditorStore) -> bool {
    store.saving().get()
}

pub fn store_last_error(store: &EditorStore) -> Option<RequestFailure> {
    store.last_error().get()
}

pub fn store_set_product_user(store: &EditorStore, user_id: Option<u32>) {
    *store.product_user_id().write() = user_id;
}

pub fn store_color_facets(store: &EditorStore) -> Vec<ColorFacet> {
    store.color_facets().get()
}

/// Replace the color facets (the product list was reloaded)
pub fn store_reset_color_facets(store: &EditorStore, facets: Vec<ColorFacet>) {
    *store.color_facets().write() = facets;
}
