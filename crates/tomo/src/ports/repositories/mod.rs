//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod chat_log_repository;
mod companion_repository;

pub use chat_log_repository::*;
pub use companion_repository::*;
