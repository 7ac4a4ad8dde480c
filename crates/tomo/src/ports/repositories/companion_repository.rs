//! Companion Repository Port
//!
//! Abstract interface for companion and scene persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Companion, CompanionScene};

/// Repository interface for Companion entities and their scenes
#[async_trait]
pub trait CompanionRepository: Send + Sync {
    /// Find a companion by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Companion>, DomainError>;

    /// Find all companions
    async fn find_all(&self) -> Result<Vec<Companion>, DomainError>;

    /// Save a companion (insert or update)
    async fn save(&self, companion: &Companion) -> Result<Companion, DomainError>;

    /// Delete a companion by ID (scenes and chat logs cascade)
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Find the scene for a companion
    async fn find_scene(&self, companion_id: Uuid) -> Result<Option<CompanionScene>, DomainError>;

    /// Persist a scene (last write wins)
    async fn save_scene(&self, scene: &CompanionScene) -> Result<CompanionScene, DomainError>;

    /// Create the initial scene for a new companion
    async fn create_scene(&self, companion_id: Uuid) -> Result<CompanionScene, DomainError>;
}
