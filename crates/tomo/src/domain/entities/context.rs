//! Context Analysis
//!
//! Structured snapshot of a companion's current narrative state, derived by
//! an LLM from recent chat history. Ephemeral: it only exists to be written
//! back onto the companion's scene.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Raw analysis shape as produced by the model.
///
/// Field names follow the model-facing JSON contract; `reasoning` is a
/// scratchpad the model fills before committing to answers and is dropped
/// during normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawContextAnalysis {
    #[serde(default)]
    pub reasoning: Option<String>,
    pub outfit: String,
    pub location: String,
    pub action_summary: String,
    pub is_user_present: bool,
    #[serde(default)]
    pub visual_tags: Vec<String>,
    pub expression: String,
    pub lighting: String,
}

/// Normalized context snapshot written back onto the companion scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextAnalysis {
    pub outfit: String,
    pub location: String,
    pub action: String,
    pub visual_tags: Vec<String>,
    pub is_user_present: bool,
    pub expression: String,
    pub lighting: String,
}

impl ContextAnalysis {
    /// Normalize the raw model output: drop `reasoning`, rename
    /// `action_summary` to `action`, pass everything else through.
    pub fn from_raw(raw: RawContextAnalysis) -> Self {
        Self {
            outfit: raw.outfit,
            location: raw.location,
            action: raw.action_summary,
            visual_tags: raw.visual_tags,
            is_user_present: raw.is_user_present,
            expression: raw.expression,
            lighting: raw.lighting,
        }
    }

    /// Parse a model reply into a normalized analysis.
    ///
    /// Models occasionally wrap the JSON object in code fences or prose, so
    /// the first balanced `{...}` span is extracted before deserializing.
    /// A reply with no parseable object is a hard failure; no retry happens
    /// at this layer.
    pub fn parse(response: &str) -> Result<Self, DomainError> {
        let json = extract_json_object(response).ok_or_else(|| {
            DomainError::Validation("Context analysis reply contains no JSON object".to_string())
        })?;

        let raw: RawContextAnalysis = serde_json::from_str(json).map_err(|e| {
            DomainError::Validation(format!("Malformed context analysis: {}", e))
        })?;

        Ok(Self::from_raw(raw))
    }
}

/// Extract the first balanced top-level JSON object from a string.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "reasoning": "She mentioned changing for the party before heading out.",
        "outfit": "black evening dress",
        "location": "hotel lobby",
        "action_summary": "waiting by the elevators",
        "is_user_present": true,
        "visual_tags": ["marble floor", "chandelier"],
        "expression": "expectant",
        "lighting": "warm indoor lighting"
    }"#;

    #[test]
    fn test_normalization_drops_reasoning_and_renames() {
        let analysis = ContextAnalysis::parse(REPLY).unwrap();
        assert_eq!(analysis.outfit, "black evening dress");
        assert_eq!(analysis.action, "waiting by the elevators");
        assert!(analysis.is_user_present);
        assert_eq!(analysis.visual_tags.len(), 2);
        assert_eq!(analysis.expression, "expectant");
        assert_eq!(analysis.lighting, "warm indoor lighting");
        // reasoning has no counterpart on the normalized struct
        let value = serde_json::to_value(&analysis).unwrap();
        assert!(value.get("reasoning").is_none());
        assert!(value.get("action_summary").is_none());
    }

    #[test]
    fn test_parse_tolerates_code_fences_and_prose() {
        let wrapped = format!("Here is the analysis:\n```json\n{}\n```\nDone.", REPLY);
        let analysis = ContextAnalysis::parse(&wrapped).unwrap();
        assert_eq!(analysis.location, "hotel lobby");
    }

    #[test]
    fn test_parse_handles_braces_inside_strings() {
        let tricky = r#"{"reasoning":"odd {brace} in text","outfit":"sweater","location":"library","action_summary":"reading","is_user_present":false,"visual_tags":[],"expression":"focused","lighting":"dim lamplight"}"#;
        let analysis = ContextAnalysis::parse(tricky).unwrap();
        assert_eq!(analysis.outfit, "sweater");
        assert!(!analysis.is_user_present);
    }

    #[test]
    fn test_garbage_is_a_hard_failure() {
        assert!(ContextAnalysis::parse("I cannot answer that.").is_err());
        assert!(ContextAnalysis::parse("{\"outfit\": \"dress\"}").is_err());
    }

    #[test]
    fn test_missing_visual_tags_defaults_to_empty() {
        let no_tags = r#"{"outfit":"apron","location":"kitchen","action_summary":"cooking dinner","is_user_present":true,"expression":"cheerful","lighting":"bright"}"#;
        let analysis = ContextAnalysis::parse(no_tags).unwrap();
        assert!(analysis.visual_tags.is_empty());
    }
}
