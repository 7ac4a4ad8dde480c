//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Companion: Configurable AI chat persona
//! - CompanionScene: Current narrative/visual state of a companion
//! - ChatLog: Per-companion conversation memory
//! - ContextAnalysis: LLM-derived snapshot of the current scene

mod chat;
mod companion;
mod context;

pub use chat::*;
pub use companion::*;
pub use context::*;
