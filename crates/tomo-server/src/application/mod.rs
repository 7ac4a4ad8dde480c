//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod chat_service;
mod companion_service;
mod image_service;

pub use chat_service::{ChatService, ChatTurn};
pub use companion_service::CompanionService;
pub use image_service::ImageService;
