//! ChatLog Entity
//!
//! One message in a companion's conversation history. The bounded tail of
//! this log is the companion's working memory for both conversation and
//! context analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of recent messages fed to the conversational model and to
/// context analysis.
pub const HISTORY_WINDOW: usize = 10;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Companion,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Companion => "companion",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(ChatRole::User),
            "companion" => Ok(ChatRole::Companion),
            _ => Err(format!("Unknown chat role: {}", s)),
        }
    }
}

/// A single persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLog {
    pub id: Uuid,
    pub companion_id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatLog {
    /// Create a user-authored message
    pub fn user(companion_id: Uuid, content: impl Into<String>) -> Self {
        Self::new(companion_id, ChatRole::User, content)
    }

    /// Create a companion-authored message
    pub fn companion(companion_id: Uuid, content: impl Into<String>) -> Self {
        Self::new(companion_id, ChatRole::Companion, content)
    }

    fn new(companion_id: Uuid, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            companion_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("user".parse::<ChatRole>().unwrap(), ChatRole::User);
        assert_eq!(
            "companion".parse::<ChatRole>().unwrap(),
            ChatRole::Companion
        );
        assert!("assistant".parse::<ChatRole>().is_err());
    }
}
