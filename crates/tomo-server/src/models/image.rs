//! Image Generation DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Image generation request; everything except the prompt is an override
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImageRequest {
    #[serde(default)]
    pub prompt: String,
    pub negative_prompt: Option<String>,
    /// "anime" or "realistic"; defaults to the companion's own style
    pub style: Option<String>,
    pub steps: Option<u32>,
    pub cfg_scale: Option<f32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub seed: Option<i64>,
    /// Append the companion's current scene tags to the prompt
    #[serde(default = "default_use_scene_tags")]
    pub use_scene_tags: bool,
}

fn default_use_scene_tags() -> bool {
    true
}

/// Tagged image generation result
#[derive(Debug, Serialize, ToSchema)]
pub struct ImageResponse {
    pub success: bool,
    /// `data:image/png;base64,...` URI when successful
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageResponse {
    pub fn ok(data_uri: String) -> Self {
        Self {
            success: true,
            image: Some(data_uri),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image: None,
            error: Some(error.into()),
        }
    }
}
