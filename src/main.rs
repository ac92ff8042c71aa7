//! Look Editor Frontend Entry Point

mod app;
mod bus;
mod commands;
mod components;
mod config;
mod context;
mod error;
mod models;
mod persistence;
mod store;

use app::App;
use config::EditorConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match EditorConfig::from_page() {
        Ok(config) => (config, None),
        Err(e) => (EditorConfig::default(), Some(e)),
    };
    if let Err(e) = console_logger::init(console_logger::parse_level(&config.log_level)) {
        web_sys::console::error_1(&format!("logger init failed: {}", e).into());
    }
    if let Some(e) = config_error {
        log::warn!("bad editor config, using defaults: {}", e);
    }

    log::info!("look editor starting, look {:?} ({})", config.look_id, config.look_type);
    mount_to_body(move || view! { <App config=config /> });
}
