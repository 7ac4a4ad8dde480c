//! Generation Parameter Merging
//!
//! Turns a user-facing generation request into the final parameter set for
//! one txt2img call: checkpoint tags wrap the user prompt, user overrides
//! win over checkpoint recommendations, and process-wide constants fill the
//! rest. Exists only for the duration of a single call.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ArtStyle;

pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 768;
pub const DEFAULT_SAMPLER: &str = "Euler a";
/// -1 asks the backend for a random seed
pub const DEFAULT_SEED: i64 = -1;

/// User-supplied generation request; every field except the prompt is an
/// optional override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub style: Option<ArtStyle>,
    pub steps: Option<u32>,
    pub cfg_scale: Option<f32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub seed: Option<i64>,
}

/// Fully resolved parameters for one image generation call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub prompt: String,
    pub negative_prompt: String,
    pub steps: u32,
    pub width: u32,
    pub height: u32,
    pub sampler_name: String,
    pub cfg_scale: f32,
    pub seed: i64,
    pub model_name: String,
}

impl GenerationParams {
    /// Merge a request with the checkpoint config for its style.
    ///
    /// Positive prompt is `quality_tags + lora tag (if any) + user prompt`,
    /// negative prompt is `checkpoint negative + ", " + user negative`.
    pub fn resolve(request: &GenerationRequest) -> Self {
        let style = request.style.unwrap_or_default();
        let checkpoint = style.checkpoint();

        let mut pieces = vec![checkpoint.quality_tags.to_string()];
        if let Some(lora) = &checkpoint.lora {
            pieces.push(lora.tag());
        }
        if !request.prompt.trim().is_empty() {
            pieces.push(request.prompt.trim().to_string());
        }
        let prompt = pieces.join(", ");

        let negative_prompt = match request.negative_prompt.as_deref().map(str::trim) {
            Some(user) if !user.is_empty() => {
                format!("{}, {}", checkpoint.negative_prompt, user)
            }
            _ => checkpoint.negative_prompt.to_string(),
        };

        Self {
            prompt,
            negative_prompt,
            steps: request.steps.unwrap_or(checkpoint.steps),
            width: request.width.unwrap_or(DEFAULT_WIDTH),
            height: request.height.unwrap_or(DEFAULT_HEIGHT),
            sampler_name: DEFAULT_SAMPLER.to_string(),
            cfg_scale: request.cfg_scale.unwrap_or(checkpoint.cfg_scale),
            seed: request.seed.unwrap_or(DEFAULT_SEED),
            model_name: checkpoint.model_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_quality_tags_plus_lora_plus_user_prompt() {
        let request = GenerationRequest {
            prompt: "standing on a bridge at dusk".to_string(),
            style: Some(ArtStyle::Anime),
            ..Default::default()
        };
        let params = GenerationParams::resolve(&request);

        let checkpoint = ArtStyle::Anime.checkpoint();
        let lora = checkpoint.lora.expect("anime has a LoRA");
        assert_eq!(
            params.prompt,
            format!(
                "{}, {}, standing on a bridge at dusk",
                checkpoint.quality_tags,
                lora.tag()
            )
        );
    }

    #[test]
    fn test_prompt_without_lora_omits_the_tag() {
        let request = GenerationRequest {
            prompt: "portrait by a window".to_string(),
            style: Some(ArtStyle::Realistic),
            ..Default::default()
        };
        let params = GenerationParams::resolve(&request);
        let checkpoint = ArtStyle::Realistic.checkpoint();
        assert_eq!(
            params.prompt,
            format!("{}, portrait by a window", checkpoint.quality_tags)
        );
        assert!(!params.prompt.contains("<lora:"));
    }

    #[test]
    fn test_negative_prompt_appends_user_negative() {
        let request = GenerationRequest {
            prompt: "x".to_string(),
            negative_prompt: Some("umbrella".to_string()),
            style: Some(ArtStyle::Realistic),
            ..Default::default()
        };
        let params = GenerationParams::resolve(&request);
        assert_eq!(
            params.negative_prompt,
            format!("{}, umbrella", ArtStyle::Realistic.checkpoint().negative_prompt)
        );
    }

    #[test]
    fn test_absent_overrides_fall_back_to_checkpoint_defaults() {
        let request = GenerationRequest {
            prompt: "x".to_string(),
            style: Some(ArtStyle::Realistic),
            steps: None,
            cfg_scale: None,
            ..Default::default()
        };
        let params = GenerationParams::resolve(&request);
        assert_eq!(params.steps, 30);
        assert_eq!(params.cfg_scale, 7.0);
        assert_eq!(params.width, DEFAULT_WIDTH);
        assert_eq!(params.height, DEFAULT_HEIGHT);
        assert_eq!(params.sampler_name, DEFAULT_SAMPLER);
        assert_eq!(params.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_user_overrides_win() {
        let request = GenerationRequest {
            prompt: "x".to_string(),
            style: Some(ArtStyle::Anime),
            steps: Some(40),
            cfg_scale: Some(9.5),
            width: Some(1024),
            height: Some(1024),
            seed: Some(1234),
            ..Default::default()
        };
        let params = GenerationParams::resolve(&request);
        assert_eq!(params.steps, 40);
        assert_eq!(params.cfg_scale, 9.5);
        assert_eq!(params.width, 1024);
        assert_eq!(params.height, 1024);
        assert_eq!(params.seed, 1234);
    }

    #[test]
    fn test_missing_style_defaults_to_anime() {
        let request = GenerationRequest {
            prompt: "x".to_string(),
            ..Default::default()
        };
        let params = GenerationParams::resolve(&request);
        assert_eq!(params.model_name, ArtStyle::Anime.checkpoint().model_name);
    }
}
