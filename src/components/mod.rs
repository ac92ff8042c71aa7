//! UI Components
//!
//! Widgets around the look canvas. They talk to the look through the event
//! bus and the editor store.

mod discard_draft_button;
mod filter_product_color;
mod look_edit_filter_tabs;
mod popup_dispatcher;

pub use discard_draft_button::DiscardDraftButton;
pub use filter_product_color::FilterProductColor;
pub use look_edit_filter_tabs::{LookEditFilterTabs, ProductTab};
pub use popup_dispatcher::{hide_popup, Popup, PopupDispatcher, PopupRegistry};
