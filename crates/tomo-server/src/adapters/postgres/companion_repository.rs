//! PostgreSQL implementation of CompanionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tomo::{Companion, CompanionRepository, CompanionScene, DomainError};

/// PostgreSQL implementation of CompanionRepository
pub struct PgCompanionRepository {
    pool: PgPool,
}

impl PgCompanionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct CompanionRow {
    id: Uuid,
    name: String,
    persona: String,
    appearance: String,
    user_name: String,
    header_image_url: Option<String>,
    art_style: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<CompanionRow> for Companion {
    fn from(row: CompanionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            persona: row.persona,
            appearance: row.appearance,
            user_name: row.user_name,
            header_image_url: row.header_image_url,
            art_style: row.art_style.parse().unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SceneRow {
    id: Uuid,
    companion_id: Uuid,
    outfit: String,
    location: String,
    action: String,
    expression: String,
    lighting: String,
    visual_tags: Vec<String>,
    is_user_present: bool,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<SceneRow> for CompanionScene {
    fn from(row: SceneRow) -> Self {
        Self {
            id: row.id,
            companion_id: row.companion_id,
            outfit: row.outfit,
            location: row.location,
            action: row.action,
            expression: row.expression,
            lighting: row.lighting,
            visual_tags: row.visual_tags,
            is_user_present: row.is_user_present,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CompanionRepository for PgCompanionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Companion>, DomainError> {
        let row = sqlx::query_as::<_, CompanionRow>("SELECT * FROM companions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<Companion>, DomainError> {
        let rows =
            sqlx::query_as::<_, CompanionRow>("SELECT * FROM companions ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save(&self, companion: &Companion) -> Result<Companion, DomainError> {
        // Check if exists
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM companions WHERE id = $1)")
                .bind(companion.id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;

        let row = if exists {
            // Update
            sqlx::query_as::<_, CompanionRow>(
                r#"
                UPDATE companions
                SET name = $2, persona = $3, appearance = $4, user_name = $5,
                    header_image_url = $6, art_style = $7, updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(companion.id)
            .bind(&companion.name)
            .bind(&companion.persona)
            .bind(&companion.appearance)
            .bind(&companion.user_name)
            .bind(&companion.header_image_url)
            .bind(companion.art_style.to_string())
            .fetch_one(&self.pool)
            .await
        } else {
            // Insert
            sqlx::query_as::<_, CompanionRow>(
                r#"
                INSERT INTO companions (id, name, persona, appearance, user_name, header_image_url, art_style)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(companion.id)
            .bind(&companion.name)
            .bind(&companion.persona)
            .bind(&companion.appearance)
            .bind(&companion.user_name)
            .bind(&companion.header_image_url)
            .bind(companion.art_style.to_string())
            .fetch_one(&self.pool)
            .await
        }
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM companions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_scene(&self, companion_id: Uuid) -> Result<Option<CompanionScene>, DomainError> {
        let row = sqlx::query_as::<_, SceneRow>(
            "SELECT * FROM companion_scenes WHERE companion_id = $1",
        )
        .bind(companion_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn save_scene(&self, scene: &CompanionScene) -> Result<CompanionScene, DomainError> {
        let row = sqlx::query_as::<_, SceneRow>(
            r#"
            UPDATE companion_scenes
            SET outfit = $2, location = $3, action = $4, expression = $5,
                lighting = $6, visual_tags = $7, is_user_present = $8, updated_at = NOW()
            WHERE companion_id = $1
            RETURNING *
            "#,
        )
        .bind(scene.companion_id)
        .bind(&scene.outfit)
        .bind(&scene.location)
        .bind(&scene.action)
        .bind(&scene.expression)
        .bind(&scene.lighting)
        .bind(&scene.visual_tags)
        .bind(scene.is_user_present)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn create_scene(&self, companion_id: Uuid) -> Result<CompanionScene, DomainError> {
        let row = sqlx::query_as::<_, SceneRow>(
            r#"
            INSERT INTO companion_scenes (companion_id)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(companion_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }
}
