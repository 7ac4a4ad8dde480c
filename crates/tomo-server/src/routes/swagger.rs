//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    ChatLogResponse,
    ChatRequest,
    ChatTurnResponse,
    // Companion models
    CompanionResponse,
    CreateCompanionRequest,
    // Image models
    ImageRequest,
    ImageResponse,
    SceneResponse,
    UpdateCompanionRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Companion endpoints
        super::companion::list_companions,
        super::companion::create_companion,
        super::companion::get_companion,
        super::companion::update_companion,
        super::companion::delete_companion,
        super::companion::get_scene,
        super::companion::wipe_scene,
        // Chat endpoints
        super::chat::chat_turn,
        super::chat::chat_history,
        super::chat::forget_history,
        super::chat::analyze_scene,
        // Image endpoints
        super::image::generate_image,
    ),
    info(
        title = "Tomo API",
        version = "0.1.0",
        description = "Tomo - AI companion chat backend\n\nCompanion profiles, per-companion chat memory, LLM context analysis, and Stable Diffusion image generation.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Companion", description = "Companion profiles and scene state"),
        (name = "Chat", description = "Chat turns, history, and context analysis"),
        (name = "Image", description = "Image generation via SD Forge"),
    ),
    components(
        schemas(
            // Companion
            CreateCompanionRequest,
            UpdateCompanionRequest,
            CompanionResponse,
            SceneResponse,
            // Chat
            ChatRequest,
            ChatLogResponse,
            ChatTurnResponse,
            // Image
            ImageRequest,
            ImageResponse,
        )
    ),
)]
pub struct ApiDoc;
