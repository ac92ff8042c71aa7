//! Look Models
//!
//! The look aggregate and the components it is built from.

mod component;
mod facet;
mod look;

pub use component::{ChangeOrigin, ComponentCid, LookComponent, LookComponentCollection};
pub use facet::ColorFacet;
pub use look::{Look, LookAttributes, LookId, LookKind};
