//! Product Facets
//!
//! Filter values offered by the product list next to the look canvas.

use serde::{Deserialize, Serialize};

/// One color in the product list's color facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorFacet {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

impl ColorFacet {
    /// Option label, e.g. "Red 12"
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.count)
    }
}
