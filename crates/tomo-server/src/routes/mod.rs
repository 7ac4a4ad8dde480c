//! Tomo API Routes
//!
//! - /tomo/companion - Companion profile management
//! - /tomo/companion/:id/scene - Current scene (read / wipe)
//! - /tomo/companion/:id/chat - Chat turn
//! - /tomo/companion/:id/chats - Chat history (read / forget)
//! - /tomo/companion/:id/analyze - On-demand context analysis
//! - /tomo/companion/:id/image - Image generation

pub mod chat;
pub mod companion;
pub mod image;
pub mod swagger;
