//! PostgreSQL Adapters
//!
//! sqlx-backed implementations of the repository ports.

mod chat_log_repository;
mod companion_repository;

pub use chat_log_repository::PgChatLogRepository;
pub use companion_repository::PgCompanionRepository;
