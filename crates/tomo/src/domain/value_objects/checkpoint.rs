//! Checkpoint - Image generation model configuration
//!
//! Static, process-lifetime table mapping each art style to a base model,
//! an optional LoRA, prompt tags, and recommended sampling parameters.
//! Immutable at runtime; unknown styles cannot exist because `ArtStyle` is a
//! closed enum.

use super::ArtStyle;

/// A LoRA adapter appended to generation prompts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lora {
    pub name: &'static str,
    pub weight: f32,
}

impl Lora {
    /// Render the inline prompt tag, e.g. `<lora:detail-tweaker-xl:0.8>`
    pub fn tag(&self) -> String {
        format!("<lora:{}:{}>", self.name, self.weight)
    }
}

/// Image generation model configuration bundle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    pub model_name: &'static str,
    pub lora: Option<Lora>,
    /// Quality tags prepended to every positive prompt
    pub quality_tags: &'static str,
    /// Base negative prompt, always present
    pub negative_prompt: &'static str,
    /// Recommended CFG scale, used when the request carries no override
    pub cfg_scale: f32,
    /// Recommended step count, used when the request carries no override
    pub steps: u32,
}

const ANIME: Checkpoint = Checkpoint {
    model_name: "animagineXL_v31",
    lora: Some(Lora {
        name: "detail-tweaker-xl",
        weight: 0.8,
    }),
    quality_tags: "masterpiece, best quality, very aesthetic, absurdres",
    negative_prompt: "lowres, bad anatomy, bad hands, text, error, missing fingers, \
extra digit, fewer digits, cropped, worst quality, low quality, jpeg artifacts, \
signature, watermark, username, blurry",
    cfg_scale: 6.0,
    steps: 25,
};

const REALISTIC: Checkpoint = Checkpoint {
    model_name: "realisticVisionV60B1",
    lora: None,
    quality_tags: "RAW photo, photorealistic, 8k uhd, dslr, soft lighting, film grain",
    negative_prompt: "cartoon, anime, 3d render, painting, illustration, deformed iris, \
deformed pupils, mutated hands, worst quality, low quality, blurry",
    cfg_scale: 7.0,
    steps: 30,
};

impl ArtStyle {
    /// Look up the checkpoint config for this style. Pure accessor.
    pub fn checkpoint(&self) -> &'static Checkpoint {
        match self {
            ArtStyle::Anime => &ANIME,
            ArtStyle::Realistic => &REALISTIC,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoints_are_stable_across_calls() {
        let first = ArtStyle::Anime.checkpoint();
        let second = ArtStyle::Anime.checkpoint();
        assert_eq!(first, second);
        assert!(std::ptr::eq(first, second));

        assert_eq!(
            ArtStyle::Realistic.checkpoint(),
            ArtStyle::Realistic.checkpoint()
        );
    }

    #[test]
    fn test_realistic_recommendations() {
        let checkpoint = ArtStyle::Realistic.checkpoint();
        assert_eq!(checkpoint.steps, 30);
        assert_eq!(checkpoint.cfg_scale, 7.0);
        assert!(checkpoint.lora.is_none());
    }

    #[test]
    fn test_lora_tag_format() {
        let lora = ArtStyle::Anime.checkpoint().lora.expect("anime has a LoRA");
        assert_eq!(lora.tag(), "<lora:detail-tweaker-xl:0.8>");
    }
}
