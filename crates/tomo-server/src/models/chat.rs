//! Chat DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use tomo::ChatLog;

use super::SceneResponse;

/// Chat turn request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

/// One persisted chat message
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatLogResponse {
    pub id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatLog> for ChatLogResponse {
    fn from(log: ChatLog) -> Self {
        Self {
            id: log.id,
            role: log.role.to_string(),
            content: log.content,
            created_at: log.created_at,
        }
    }
}

/// Chat turn response
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatTurnResponse {
    pub reply: ChatLogResponse,
    pub scene: SceneResponse,
    /// False when context analysis failed and the scene is stale
    pub scene_updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
    pub tokens_used: u32,
}
