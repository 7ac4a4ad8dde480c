//! Image Generation Application Service (Use Case)
//!
//! Rate-limit check, parameter resolution against the style checkpoint,
//! then exactly one backend call. A denied rate limit never reaches the
//! network.

use std::sync::Arc;
use uuid::Uuid;

use tomo::{
    CompanionRepository, DomainError, GeneratedImage, GenerationParams, GenerationRequest,
    ImageGenerator, RateLimitDecision, RateLimiter,
};

/// Application service for image generation
pub struct ImageService<R: CompanionRepository> {
    companions: Arc<R>,
    generator: Arc<dyn ImageGenerator>,
    limiter: Arc<dyn RateLimiter>,
}

impl<R: CompanionRepository> ImageService<R> {
    pub fn new(
        companions: Arc<R>,
        generator: Arc<dyn ImageGenerator>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            companions,
            generator,
            limiter,
        }
    }

    /// Generate one image of a companion.
    ///
    /// `use_scene_tags` appends the scene's visual tags to the user prompt
    /// so generated images track the current narrative state.
    pub async fn generate(
        &self,
        user: &str,
        companion_id: Uuid,
        mut request: GenerationRequest,
        use_scene_tags: bool,
    ) -> Result<GeneratedImage, DomainError> {
        if let RateLimitDecision::Denied { message } = self.limiter.check(user) {
            return Err(DomainError::RateLimited(message));
        }

        let companion = self
            .companions
            .find_by_id(companion_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Companion", companion_id))?;

        // Style preference: explicit request, then the companion's own
        request.style = request.style.or(Some(companion.art_style));

        if use_scene_tags {
            if let Some(scene) = self.companions.find_scene(companion_id).await? {
                if !scene.visual_tags.is_empty() {
                    let tags = scene.visual_tags.join(", ");
                    request.prompt = if request.prompt.trim().is_empty() {
                        tags
                    } else {
                        format!("{}, {}", request.prompt.trim(), tags)
                    };
                }
            }
        }

        let params = GenerationParams::resolve(&request);
        tracing::info!(
            "Generating image for {} ({} backend)",
            companion.name,
            self.generator.backend_name()
        );

        self.generator.generate(&params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tomo::{ArtStyle, Companion, CompanionScene, RateLimiter};

    struct OneCompanionRepo {
        companion: Companion,
        scene: CompanionScene,
    }

    #[async_trait]
    impl CompanionRepository for OneCompanionRepo {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Companion>, DomainError> {
            Ok((id == self.companion.id).then(|| self.companion.clone()))
        }
        async fn find_all(&self) -> Result<Vec<Companion>, DomainError> {
            Ok(vec![self.companion.clone()])
        }
        async fn save(&self, companion: &Companion) -> Result<Companion, DomainError> {
            Ok(companion.clone())
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, DomainError> {
            Ok(false)
        }
        async fn find_scene(
            &self,
            _companion_id: Uuid,
        ) -> Result<Option<CompanionScene>, DomainError> {
            Ok(Some(self.scene.clone()))
        }
        async fn save_scene(&self, scene: &CompanionScene) -> Result<CompanionScene, DomainError> {
            Ok(scene.clone())
        }
        async fn create_scene(&self, companion_id: Uuid) -> Result<CompanionScene, DomainError> {
            Ok(CompanionScene::new_for_companion(companion_id))
        }
    }

    struct CountingGenerator {
        calls: AtomicUsize,
        last_params: Mutex<Option<GenerationParams>>,
    }

    #[async_trait]
    impl ImageGenerator for CountingGenerator {
        async fn generate(
            &self,
            params: &GenerationParams,
        ) -> Result<GeneratedImage, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_params.lock().unwrap() = Some(params.clone());
            Ok(GeneratedImage {
                data_uri: "data:image/png;base64,AA==".to_string(),
            })
        }
        fn backend_name(&self) -> &str {
            "counting"
        }
    }

    struct DenyAll;

    impl RateLimiter for DenyAll {
        fn check(&self, _user: &str) -> RateLimitDecision {
            RateLimitDecision::Denied {
                message: "slow down".to_string(),
            }
        }
    }

    struct AllowAll;

    impl RateLimiter for AllowAll {
        fn check(&self, _user: &str) -> RateLimitDecision {
            RateLimitDecision::Allowed
        }
    }

    fn fixtures(
        limiter: Arc<dyn RateLimiter>,
    ) -> (ImageService<OneCompanionRepo>, Uuid, Arc<CountingGenerator>) {
        let companion = Companion::new(
            "Yuki".to_string(),
            "gentle".to_string(),
            "silver hair".to_string(),
            "Alex".to_string(),
            None,
            Some(ArtStyle::Realistic),
        );
        let id = companion.id;
        let mut scene = CompanionScene::new_for_companion(id);
        scene.visual_tags = vec!["rainy street".to_string(), "umbrella".to_string()];

        let generator = Arc::new(CountingGenerator {
            calls: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        });
        let service = ImageService::new(
            Arc::new(OneCompanionRepo { companion, scene }),
            generator.clone(),
            limiter,
        );
        (service, id, generator)
    }

    #[tokio::test]
    async fn test_rate_limit_denial_short_circuits() {
        let (service, id, generator) = fixtures(Arc::new(DenyAll));

        let result = service
            .generate("alice", id, GenerationRequest::default(), false)
            .await;

        match result {
            Err(DomainError::RateLimited(message)) => assert_eq!(message, "slow down"),
            other => panic!("expected rate limit error, got {:?}", other.map(|_| ())),
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_companion_style_is_the_default() {
        let (service, id, generator) = fixtures(Arc::new(AllowAll));

        service
            .generate(
                "alice",
                id,
                GenerationRequest {
                    prompt: "portrait".to_string(),
                    ..Default::default()
                },
                false,
            )
            .await
            .unwrap();

        let params = generator.last_params.lock().unwrap().clone().unwrap();
        assert_eq!(
            params.model_name,
            ArtStyle::Realistic.checkpoint().model_name
        );
        assert_eq!(params.steps, 30);
    }

    #[tokio::test]
    async fn test_scene_tags_extend_the_prompt() {
        let (service, id, generator) = fixtures(Arc::new(AllowAll));

        service
            .generate(
                "alice",
                id,
                GenerationRequest {
                    prompt: "portrait".to_string(),
                    ..Default::default()
                },
                true,
            )
            .await
            .unwrap();

        let params = generator.last_params.lock().unwrap().clone().unwrap();
        assert!(params.prompt.contains("portrait, rainy street, umbrella"));
    }
}
