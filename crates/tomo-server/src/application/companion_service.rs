//! Companion Application Service (Use Case)
//!
//! Orchestrates domain operations for companion management.

use std::sync::Arc;
use uuid::Uuid;

use tomo::{ArtStyle, Companion, CompanionRepository, CompanionScene, DomainError};

/// Application service for companion operations
pub struct CompanionService<R: CompanionRepository> {
    repo: Arc<R>,
}

impl<R: CompanionRepository> CompanionService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Get all companions with their scenes
    pub async fn list_all(&self) -> Result<Vec<(Companion, CompanionScene)>, DomainError> {
        let companions = self.repo.find_all().await?;
        let mut results = Vec::with_capacity(companions.len());

        for companion in companions {
            let scene = self
                .repo
                .find_scene(companion.id)
                .await?
                .unwrap_or_else(|| CompanionScene::new_for_companion(companion.id));
            results.push((companion, scene));
        }

        Ok(results)
    }

    /// Get a companion by ID with scene
    pub async fn get_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<(Companion, CompanionScene)>, DomainError> {
        let companion = match self.repo.find_by_id(id).await? {
            Some(c) => c,
            None => return Ok(None),
        };

        let scene = self
            .repo
            .find_scene(companion.id)
            .await?
            .unwrap_or_else(|| CompanionScene::new_for_companion(companion.id));

        Ok(Some((companion, scene)))
    }

    /// Create a new companion with its default scene
    pub async fn create(
        &self,
        name: String,
        persona: String,
        appearance: String,
        user_name: String,
        header_image_url: Option<String>,
        art_style: Option<ArtStyle>,
    ) -> Result<(Companion, CompanionScene), DomainError> {
        let companion = Companion::new(
            name,
            persona,
            appearance,
            user_name,
            header_image_url,
            art_style,
        );
        let saved = self.repo.save(&companion).await?;
        let scene = self.repo.create_scene(saved.id).await?;

        tracing::info!("Created companion: {} ({})", saved.name, saved.id);

        Ok((saved, scene))
    }

    /// Update a companion
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        persona: Option<String>,
        appearance: Option<String>,
        user_name: Option<String>,
        header_image_url: Option<String>,
        art_style: Option<ArtStyle>,
    ) -> Result<(Companion, CompanionScene), DomainError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Companion", id))?;

        let updated = Companion {
            id: current.id,
            name: name.unwrap_or(current.name),
            persona: persona.unwrap_or(current.persona),
            appearance: appearance.unwrap_or(current.appearance),
            user_name: user_name.unwrap_or(current.user_name),
            header_image_url: header_image_url.or(current.header_image_url),
            art_style: art_style.unwrap_or(current.art_style),
            created_at: current.created_at,
            updated_at: chrono::Utc::now(),
        };

        let saved = self.repo.save(&updated).await?;
        let scene = self
            .repo
            .find_scene(saved.id)
            .await?
            .unwrap_or_else(|| CompanionScene::new_for_companion(saved.id));

        Ok((saved, scene))
    }

    /// Delete a companion (scene and chat logs cascade)
    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!("Deleted companion: {}", id);
        }
        Ok(deleted)
    }

    /// Get the current scene for a companion
    pub async fn get_scene(&self, companion_id: Uuid) -> Result<Option<CompanionScene>, DomainError> {
        self.repo.find_scene(companion_id).await
    }

    /// Reset a companion's scene to defaults
    pub async fn wipe_scene(&self, companion_id: Uuid) -> Result<CompanionScene, DomainError> {
        let current = self
            .repo
            .find_scene(companion_id)
            .await?
            .ok_or_else(|| DomainError::not_found("CompanionScene", companion_id))?;

        let wiped = self.repo.save_scene(&current.wiped()).await?;
        tracing::info!("Wiped scene for companion {}", companion_id);
        Ok(wiped)
    }
}
