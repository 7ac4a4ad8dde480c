//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod chat_completions;
pub mod postgres;
pub mod sd_forge;

// Re-exports
pub use chat_completions::ChatCompletionsProvider;
pub use postgres::{PgChatLogRepository, PgCompanionRepository};
pub use sd_forge::SdForgeClient;
