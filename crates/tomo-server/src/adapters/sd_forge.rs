//! SD Forge Client
//!
//! Talks to a Stable Diffusion WebUI/Forge compatible API: one POST to
//! `/sdapi/v1/txt2img` per generation. Upstream error bodies are surfaced
//! verbatim; transport and decode failures collapse into a fixed
//! connection message with the original error only logged.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use tomo::{DomainError, GeneratedImage, GenerationParams, ImageGenerator};

/// Error message returned to callers when the backend is unreachable or
/// returns something unreadable.
pub const CONNECTION_ERROR: &str =
    "Failed to generate image. Please check your SD Forge connection.";

/// Client configuration
#[derive(Debug, Clone)]
pub struct SdForgeConfig {
    /// Per-request timeout; generation is slow, so this is generous
    pub request_timeout: Duration,
    /// Extra attempts after a transport failure (0 = single attempt)
    pub max_retries: u32,
    /// Base delay between retry attempts, doubled per attempt
    pub retry_base_delay: Duration,
}

impl Default for SdForgeConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            max_retries: 0,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

/// SD Forge txt2img client
pub struct SdForgeClient {
    client: Client,
    base_url: String,
    config: SdForgeConfig,
}

#[derive(Debug, Serialize)]
struct Txt2ImgRequest {
    prompt: String,
    negative_prompt: String,
    steps: u32,
    width: u32,
    height: u32,
    sampler_name: String,
    cfg_scale: f32,
    seed: i64,
}

impl From<&GenerationParams> for Txt2ImgRequest {
    fn from(params: &GenerationParams) -> Self {
        Self {
            prompt: params.prompt.clone(),
            negative_prompt: params.negative_prompt.clone(),
            steps: params.steps,
            width: params.width,
            height: params.height,
            sampler_name: params.sampler_name.clone(),
            cfg_scale: params.cfg_scale,
            seed: params.seed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Txt2ImgResponse {
    #[serde(default)]
    images: Vec<String>,
}

impl SdForgeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(base_url, SdForgeConfig::default())
    }

    pub fn with_config(base_url: impl Into<String>, config: SdForgeConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config,
        }
    }

    async fn send(&self, body: &Txt2ImgRequest) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}/sdapi/v1/txt2img", self.base_url);
        self.client.post(&url).json(body).send().await
    }

    /// Send with bounded transport-level retries. HTTP error statuses are
    /// terminal; only connect/timeout failures are retried.
    async fn send_with_retry(
        &self,
        body: &Txt2ImgRequest,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut delay = self.config.retry_base_delay;
        let mut attempt = 0;

        loop {
            match self.send(body).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "txt2img transport error (attempt {}/{}): {}",
                        attempt,
                        self.config.max_retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Take the first returned image and wrap it as a data URI.
fn wrap_first_image(images: &[String]) -> Result<GeneratedImage, DomainError> {
    let first = images.first().ok_or_else(|| {
        DomainError::ExternalService("Generation API returned no images".to_string())
    })?;

    // The backend hands back base64; reject anything that does not decode
    // rather than forwarding a broken data URI to the client.
    BASE64.decode(first).map_err(|e| {
        tracing::warn!("txt2img returned undecodable image payload: {}", e);
        DomainError::ExternalService(CONNECTION_ERROR.to_string())
    })?;

    Ok(GeneratedImage {
        data_uri: format!("data:image/png;base64,{}", first),
    })
}

#[async_trait]
impl ImageGenerator for SdForgeClient {
    async fn generate(&self, params: &GenerationParams) -> Result<GeneratedImage, DomainError> {
        let body = Txt2ImgRequest::from(params);

        tracing::info!(
            "txt2img: model={} steps={} cfg={} {}x{}",
            params.model_name,
            params.steps,
            params.cfg_scale,
            params.width,
            params.height
        );

        let response = self.send_with_retry(&body).await.map_err(|e| {
            tracing::warn!("txt2img request failed: {}", e);
            DomainError::ExternalService(CONNECTION_ERROR.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "No response body".to_string());
            tracing::warn!("txt2img returned {}: {}", status, body_text);
            return Err(DomainError::ExternalService(body_text));
        }

        let parsed: Txt2ImgResponse = response.json().await.map_err(|e| {
            tracing::warn!("txt2img response parse failed: {}", e);
            DomainError::ExternalService(CONNECTION_ERROR.to_string())
        })?;

        wrap_first_image(&parsed.images)
    }

    fn backend_name(&self) -> &str {
        "sd-forge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomo::GenerationRequest;

    #[test]
    fn test_request_body_field_names() {
        let params = GenerationParams::resolve(&GenerationRequest {
            prompt: "test".to_string(),
            ..Default::default()
        });
        let value = serde_json::to_value(Txt2ImgRequest::from(&params)).unwrap();

        for key in [
            "prompt",
            "negative_prompt",
            "steps",
            "width",
            "height",
            "sampler_name",
            "cfg_scale",
            "seed",
        ] {
            assert!(value.get(key).is_some(), "missing field {}", key);
        }
        assert_eq!(value.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_default_client_config() {
        let client = SdForgeClient::new("http://localhost:7860/");
        assert_eq!(client.base_url, "http://localhost:7860");
        assert_eq!(client.config.max_retries, 0);
        assert_eq!(client.backend_name(), "sd-forge");
    }

    #[test]
    fn test_wrap_first_image_builds_data_uri() {
        let payload = BASE64.encode(b"not really a png");
        let image = wrap_first_image(&[payload.clone()]).unwrap();
        assert_eq!(image.data_uri, format!("data:image/png;base64,{}", payload));
    }

    #[test]
    fn test_wrap_rejects_empty_and_garbage() {
        assert!(wrap_first_image(&[]).is_err());

        let err = wrap_first_image(&["!!! not base64 !!!".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), format!("External service error: {}", CONNECTION_ERROR));
    }
}
