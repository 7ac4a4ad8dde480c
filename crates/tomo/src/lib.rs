//! Tomo Domain Library
//!
//! Core domain types and interfaces for the Tomo AI companion system.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Companion, CompanionScene, ChatLog, ContextAnalysis)
//!   - `value_objects/`: Immutable value types (ArtStyle, Checkpoint)
//!   - `services/`: Pure domain services (prompt assembly, generation parameter merging)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service interfaces (LLM, image generation, rate limiting)
//!
//! # Usage
//!
//! ```rust,ignore
//! use tomo::domain::{Companion, CompanionScene, ContextAnalysis};
//! use tomo::ports::{CompanionRepository, LlmProvider, ImageGenerator};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ArtStyle, ChatLog, ChatRole, Checkpoint, Companion, CompanionScene, ContextAnalysis,
    DomainError, GenerationParams, GenerationRequest, Lora, RawContextAnalysis,
    build_context_analysis_prompt, build_system_prompt, HISTORY_WINDOW,
};
pub use ports::{
    // Repositories
    ChatLogRepository,
    ChatMessage,
    CompanionRepository,
    // Services
    CompletionOptions,
    CompletionResponse,
    GeneratedImage,
    ImageGenerator,
    LlmProvider,
    MessageRole,
    RateLimitDecision,
    RateLimiter,
    TokenUsage,
};
