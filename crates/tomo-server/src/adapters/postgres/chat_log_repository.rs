//! PostgreSQL implementation of ChatLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tomo::{ChatLog, ChatLogRepository, DomainError};

/// PostgreSQL implementation of ChatLogRepository
pub struct PgChatLogRepository {
    pool: PgPool,
}

impl PgChatLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ChatLogRow {
    id: Uuid,
    companion_id: Uuid,
    role: String,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ChatLogRow> for ChatLog {
    type Error = DomainError;

    fn try_from(row: ChatLogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            companion_id: row.companion_id,
            role: row
                .role
                .parse()
                .map_err(DomainError::Repository)?,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ChatLogRepository for PgChatLogRepository {
    async fn append(&self, log: &ChatLog) -> Result<ChatLog, DomainError> {
        let row = sqlx::query_as::<_, ChatLogRow>(
            r#"
            INSERT INTO chat_logs (id, companion_id, role, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(log.id)
        .bind(log.companion_id)
        .bind(log.role.as_str())
        .bind(&log.content)
        .bind(log.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn recent(&self, companion_id: Uuid, limit: usize) -> Result<Vec<ChatLog>, DomainError> {
        // Newest-first page, flipped back to chronological order
        let mut logs = self.history(companion_id, limit).await?;
        logs.reverse();
        Ok(logs)
    }

    async fn history(
        &self,
        companion_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ChatLog>, DomainError> {
        let rows = sqlx::query_as::<_, ChatLogRow>(
            r#"
            SELECT * FROM chat_logs
            WHERE companion_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(companion_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(ChatLog::try_from).collect()
    }

    async fn delete_for_companion(&self, companion_id: Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM chat_logs WHERE companion_id = $1")
            .bind(companion_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
