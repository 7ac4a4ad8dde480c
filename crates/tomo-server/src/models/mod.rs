//! Tomo Data Models (HTTP DTOs)
//!
//! - Companion: persona profile with embedded scene
//! - Chat: chat turn and history payloads
//! - Image: generation request and tagged result

mod chat;
mod companion;
mod image;

pub use chat::*;
pub use companion::*;
pub use image::*;
