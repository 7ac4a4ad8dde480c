//! Chat Log Repository Port
//!
//! Abstract interface for the per-companion conversation memory.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, ChatLog};

/// Repository interface for chat history
#[async_trait]
pub trait ChatLogRepository: Send + Sync {
    /// Append a message to a companion's history
    async fn append(&self, log: &ChatLog) -> Result<ChatLog, DomainError>;

    /// The most recent `limit` messages in chronological order
    async fn recent(&self, companion_id: Uuid, limit: usize) -> Result<Vec<ChatLog>, DomainError>;

    /// Up to `limit` messages, newest first (for history listings)
    async fn history(&self, companion_id: Uuid, limit: usize)
        -> Result<Vec<ChatLog>, DomainError>;

    /// Delete all messages for a companion, returning the count removed
    async fn delete_for_companion(&self, companion_id: Uuid) -> Result<u64, DomainError>;
}
