//! Editor Configuration
//!
//! The page that hosts the editor describes the look being edited. Newer
//! pages set `window.LOOK_EDITOR_CONFIG`; older ones only set the globals
//! `external_look_id` and `external_look_type`.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::models::ColorFacet;
use crate::persistence::LOOK_NAMESPACE;

const CONFIG_GLOBAL: &str = "LOOK_EDITOR_CONFIG";
const LEGACY_ID_GLOBAL: &str = "external_look_id";
const LEGACY_TYPE_GLOBAL: &str = "external_look_type";

/// Editor settings read at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Id of a claimed look; absent or non-positive for a draft
    #[serde(default)]
    pub look_id: Option<i64>,
    /// Client type token ("photo" / "collage")
    #[serde(default = "default_look_type")]
    pub look_type: String,
    /// REST root of the look resource
    #[serde(default = "default_url_root")]
    pub url_root: String,
    /// Scheme and host of the API; the page origin when absent
    #[serde(default)]
    pub api_origin: Option<String>,
    /// localStorage namespace for drafts
    #[serde(default = "default_namespace")]
    pub storage_namespace: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Color facets rendered with the page
    #[serde(default)]
    pub color_facets: Vec<ColorFacet>,
    /// Visitor is logged in
    #[serde(default)]
    pub authenticated: bool,
    /// User whose likes the likes tab shows
    #[serde(default)]
    pub likes_user: Option<u32>,
}

fn default_look_type() -> String {
    "collage".to_string()
}

fn default_url_root() -> String {
    "/look/".to_string()
}

fn default_namespace() -> String {
    LOOK_NAMESPACE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            look_id: None,
            look_type: default_look_type(),
            url_root: default_url_root(),
            api_origin: None,
            storage_namespace: default_namespace(),
            log_level: default_log_level(),
            color_facets: Vec::new(),
            authenticated: false,
            likes_user: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json(value: serde_json::Value) -> Result<Self, String> {
        serde_json::from_value(value).map_err(|e| format!("Invalid editor config: {}", e))
    }

    /// Read the configuration from the page globals.
    pub fn from_page() -> Result<Self, String> {
        let global = js_sys::global();
        let config = js_sys::Reflect::get(&global, &JsValue::from_str(CONFIG_GLOBAL))
            .map_err(|e| format!("{:?}", e))?;
        if !config.is_undefined() && !config.is_null() {
            return serde_wasm_bindgen::from_value(config)
                .map_err(|e| format!("Invalid editor config: {}", e));
        }

        let look_id = js_sys::Reflect::get(&global, &JsValue::from_str(LEGACY_ID_GLOBAL))
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v as i64);
        let look_type = js_sys::Reflect::get(&global, &JsValue::from_str(LEGACY_TYPE_GLOBAL))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_else(default_look_type);
        Ok(Self {
            look_id,
            look_type,
            ..Self::default()
        })
    }

    /// API origin to prefix REST paths with.
    pub fn resolved_origin(&self) -> String {
        if let Some(origin) = &self.api_origin {
            return origin.clone();
        }
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::from_json(json!({})).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.url_root, "/look/");
        assert_eq!(config.storage_namespace, "edit_look");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_claimed_look() {
        let config = EditorConfig::from_json(json!({
            "look_id": 42,
            "look_type": "photo",
            "api_origin": "https://shop.example"
        }))
        .unwrap();
        assert_eq!(config.look_id, Some(42));
        assert_eq!(config.look_type, "photo");
        assert_eq!(config.resolved_origin(), "https://shop.example");
    }

    #[test]
    fn test_color_facets() {
        let config = EditorConfig::from_json(json!({
            "color_facets": [{"id": 1, "name": "Black", "count": 40}, {"id": 2, "name": "Blue"}]
        }))
        .unwrap();
        assert_eq!(config.color_facets.len(), 2);
        assert_eq!(config.color_facets[1].count, 0);
    }

    #[test]
    fn test_invalid_config() {
        let err = EditorConfig::from_json(json!({"look_id": "abc"})).unwrap_err();
        assert!(err.starts_with("Invalid editor config"));
    }
}
