//! Companion - AI Chat Persona
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::ArtStyle;

use super::ContextAnalysis;

/// Companion - a configurable AI chat persona
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    pub id: Uuid,
    pub name: String,
    /// Behavioral description: personality, speech style, quirks
    pub persona: String,
    /// Visual description used for prompt assembly and image generation
    pub appearance: String,
    /// Name the companion addresses the user by
    pub user_name: String,
    pub header_image_url: Option<String>,
    /// Preferred art style for generated images
    pub art_style: ArtStyle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Companion Scene - current outfit, location, action, expression
///
/// Rewritten on every chat turn by context analysis; last write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionScene {
    pub id: Uuid,
    pub companion_id: Uuid,
    pub outfit: String,
    pub location: String,
    pub action: String,
    pub expression: String,
    pub lighting: String,
    pub visual_tags: Vec<String>,
    pub is_user_present: bool,
    pub updated_at: DateTime<Utc>,
}

impl Companion {
    /// Create a new Companion with generated ID and timestamps
    pub fn new(
        name: String,
        persona: String,
        appearance: String,
        user_name: String,
        header_image_url: Option<String>,
        art_style: Option<ArtStyle>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            persona,
            appearance,
            user_name,
            header_image_url,
            art_style: art_style.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CompanionScene {
    /// Create the default scene for a freshly created companion
    pub fn new_for_companion(companion_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            companion_id,
            outfit: "casual clothes".to_string(),
            location: "at home".to_string(),
            action: "relaxing".to_string(),
            expression: "soft smile".to_string(),
            lighting: "soft ambient lighting".to_string(),
            visual_tags: Vec::new(),
            is_user_present: true,
            updated_at: Utc::now(),
        }
    }

    /// Overwrite the visual fields from a context analysis snapshot
    pub fn apply(&mut self, analysis: ContextAnalysis) {
        self.outfit = analysis.outfit;
        self.location = analysis.location;
        self.action = analysis.action;
        self.expression = analysis.expression;
        self.lighting = analysis.lighting;
        self.visual_tags = analysis.visual_tags;
        self.is_user_present = analysis.is_user_present;
        self.updated_at = Utc::now();
    }

    /// Reset the scene to defaults, keeping identity
    pub fn wiped(&self) -> Self {
        let mut scene = Self::new_for_companion(self.companion_id);
        scene.id = self.id;
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_values() {
        let companion_id = Uuid::new_v4();
        let scene = CompanionScene::new_for_companion(companion_id);
        assert_eq!(scene.companion_id, companion_id);
        assert_eq!(scene.outfit, "casual clothes");
        assert!(scene.is_user_present);
        assert!(scene.visual_tags.is_empty());
    }

    #[test]
    fn test_apply_overwrites_all_visual_fields() {
        let mut scene = CompanionScene::new_for_companion(Uuid::new_v4());
        scene.apply(ContextAnalysis {
            outfit: "red dress".to_string(),
            location: "rooftop bar".to_string(),
            action: "sipping a cocktail".to_string(),
            visual_tags: vec!["night city".to_string()],
            is_user_present: false,
            expression: "amused grin".to_string(),
            lighting: "neon glow".to_string(),
        });
        assert_eq!(scene.outfit, "red dress");
        assert_eq!(scene.location, "rooftop bar");
        assert_eq!(scene.action, "sipping a cocktail");
        assert_eq!(scene.expression, "amused grin");
        assert_eq!(scene.lighting, "neon glow");
        assert_eq!(scene.visual_tags, vec!["night city".to_string()]);
        assert!(!scene.is_user_present);
    }

    #[test]
    fn test_wiped_keeps_identity() {
        let mut scene = CompanionScene::new_for_companion(Uuid::new_v4());
        scene.outfit = "ball gown".to_string();
        let wiped = scene.wiped();
        assert_eq!(wiped.id, scene.id);
        assert_eq!(wiped.companion_id, scene.companion_id);
        assert_eq!(wiped.outfit, "casual clothes");
    }
}
