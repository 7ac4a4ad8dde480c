//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod art_style;
mod checkpoint;

pub use art_style::*;
pub use checkpoint::*;
