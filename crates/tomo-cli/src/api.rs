//! Tomo API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// API Client for Tomo
pub struct TomoClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct SceneResponse {
    pub outfit: String,
    pub location: String,
    pub action: String,
    pub expression: String,
    pub lighting: String,
    pub visual_tags: Vec<String>,
    pub is_user_present: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompanionResponse {
    pub id: Uuid,
    pub name: String,
    pub persona: String,
    pub appearance: String,
    pub user_name: String,
    pub art_style: String,
    pub scene: SceneResponse,
}

#[derive(Debug, Serialize)]
pub struct CreateCompanionRequest {
    pub name: String,
    pub persona: String,
    pub appearance: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art_style: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatLogResponse {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatTurnResponse {
    pub reply: ChatLogResponse,
    pub scene: SceneResponse,
    pub scene_updated: bool,
    pub analysis_error: Option<String>,
    pub tokens_used: u32,
}

#[derive(Debug, Serialize, Default)]
pub struct ImageRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f32>,
    pub use_scene_tags: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImageResponse {
    pub success: bool,
    pub image: Option<String>,
    pub error: Option<String>,
}

impl TomoClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn expect_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }
        resp.json().await.context("Failed to parse API response")
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// List all companions
    pub async fn list_companions(&self) -> Result<Vec<CompanionResponse>> {
        let resp = self
            .request(Method::GET, "/tomo/companion")
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        Self::expect_json(resp).await
    }

    /// Create a companion
    pub async fn create_companion(
        &self,
        request: &CreateCompanionRequest,
    ) -> Result<CompanionResponse> {
        let resp = self
            .request(Method::POST, "/tomo/companion")
            .json(request)
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        Self::expect_json(resp).await
    }

    /// Get a companion by ID
    pub async fn get_companion(&self, id: Uuid) -> Result<CompanionResponse> {
        let resp = self
            .request(Method::GET, &format!("/tomo/companion/{}", id))
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        Self::expect_json(resp).await
    }

    /// Delete a companion
    pub async fn delete_companion(&self, id: Uuid) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &format!("/tomo/companion/{}", id))
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        let _: serde_json::Value = Self::expect_json(resp).await?;
        Ok(())
    }

    /// Get the current scene
    pub async fn get_scene(&self, id: Uuid) -> Result<SceneResponse> {
        let resp = self
            .request(Method::GET, &format!("/tomo/companion/{}/scene", id))
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        Self::expect_json(resp).await
    }

    /// Reset the scene to defaults
    pub async fn wipe_scene(&self, id: Uuid) -> Result<SceneResponse> {
        let resp = self
            .request(Method::DELETE, &format!("/tomo/companion/{}/scene", id))
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        Self::expect_json(resp).await
    }

    /// Recompute the scene from recent history
    pub async fn analyze(&self, id: Uuid) -> Result<SceneResponse> {
        let resp = self
            .request(Method::POST, &format!("/tomo/companion/{}/analyze", id))
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        Self::expect_json(resp).await
    }

    /// Run one chat turn
    pub async fn chat(&self, id: Uuid, message: &str) -> Result<ChatTurnResponse> {
        let resp = self
            .request(Method::POST, &format!("/tomo/companion/{}/chat", id))
            .json(&ChatRequest { message })
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        Self::expect_json(resp).await
    }

    /// Get chat history (newest first)
    pub async fn chat_history(&self, id: Uuid, limit: usize) -> Result<Vec<ChatLogResponse>> {
        let resp = self
            .request(
                Method::GET,
                &format!("/tomo/companion/{}/chats?limit={}", id, limit),
            )
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        Self::expect_json(resp).await
    }

    /// Generate an image; returns the server's tagged result
    pub async fn generate_image(&self, id: Uuid, request: &ImageRequest) -> Result<ImageResponse> {
        let resp = self
            .request(Method::POST, &format!("/tomo/companion/{}/image", id))
            .json(request)
            .send()
            .await
            .context("Failed to connect to Tomo API")?;
        Self::expect_json(resp).await
    }
}
