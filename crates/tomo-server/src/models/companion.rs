//! Companion DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use tomo::{Companion, CompanionScene};

/// Create companion request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCompanionRequest {
    pub name: String,
    pub persona: String,
    pub appearance: String,
    pub user_name: String,
    pub header_image_url: Option<String>,
    /// "anime" (default) or "realistic"
    pub art_style: Option<String>,
}

/// Update companion request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCompanionRequest {
    pub name: Option<String>,
    pub persona: Option<String>,
    pub appearance: Option<String>,
    pub user_name: Option<String>,
    pub header_image_url: Option<String>,
    pub art_style: Option<String>,
}

/// Companion response with scene
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanionResponse {
    pub id: Uuid,
    pub name: String,
    pub persona: String,
    pub appearance: String,
    pub user_name: String,
    pub header_image_url: Option<String>,
    pub art_style: String,
    pub scene: SceneResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scene response
#[derive(Debug, Serialize, ToSchema)]
pub struct SceneResponse {
    pub outfit: String,
    pub location: String,
    pub action: String,
    pub expression: String,
    pub lighting: String,
    pub visual_tags: Vec<String>,
    pub is_user_present: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<CompanionScene> for SceneResponse {
    fn from(scene: CompanionScene) -> Self {
        Self {
            outfit: scene.outfit,
            location: scene.location,
            action: scene.action,
            expression: scene.expression,
            lighting: scene.lighting,
            visual_tags: scene.visual_tags,
            is_user_present: scene.is_user_present,
            updated_at: scene.updated_at,
        }
    }
}

impl CompanionResponse {
    pub fn from_pair(companion: Companion, scene: CompanionScene) -> Self {
        Self {
            id: companion.id,
            name: companion.name,
            persona: companion.persona,
            appearance: companion.appearance,
            user_name: companion.user_name,
            header_image_url: companion.header_image_url,
            art_style: companion.art_style.to_string(),
            scene: scene.into(),
            created_at: companion.created_at,
            updated_at: companion.updated_at,
        }
    }
}
