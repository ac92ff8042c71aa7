//! Server Command Wrappers
//!
//! Frontend bindings to the look endpoints, organized by domain.

mod look;

pub use look::*;

/// Build the URL of one resource under `url_root` (`/look/` + `42`).
pub fn resource_url(url_root: &str, id: u64) -> String {
    if url_root.ends_with('/') {
        format!("{}{}", url_root, id)
    } else {
        format!("{}/{}", url_root, id)
    }
}
