//! Image Generator Port
//!
//! Abstract interface for txt2img backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{errors::DomainError, GenerationParams};

/// One generated image, ready for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// `data:image/png;base64,...` URI
    pub data_uri: String,
}

/// Image generation backend interface
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Run one generation call with fully resolved parameters
    async fn generate(&self, params: &GenerationParams) -> Result<GeneratedImage, DomainError>;

    /// Get the backend name (e.g., "sd-forge")
    fn backend_name(&self) -> &str;
}
