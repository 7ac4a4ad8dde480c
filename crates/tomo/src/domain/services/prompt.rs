//! Prompt Assembly
//!
//! Pure, deterministic construction of the two prompts the pipeline needs:
//! the conversational system prompt and the context-analysis instruction.
//! Same inputs always yield the same string; missing fields produce an
//! incomplete but syntactically valid prompt.

use crate::domain::entities::{ChatLog, ChatRole, Companion, CompanionScene};

/// Build the system prompt for the companion's conversational model.
pub fn build_system_prompt(companion: &Companion, scene: &CompanionScene) -> String {
    let mut prompt = format!(
        "You are {name}, an AI companion chatting with {user}.\n\
         \n\
         Personality: {persona}\n\
         Appearance: {appearance}\n",
        name = companion.name,
        user = companion.user_name,
        persona = companion.persona,
        appearance = companion.appearance,
    );

    prompt.push_str(&format!(
        "\nCurrent scene:\n\
         - Outfit: {outfit}\n\
         - Location: {location}\n\
         - Action: {action}\n\
         - Expression: {expression}\n\
         - Lighting: {lighting}\n",
        outfit = scene.outfit,
        location = scene.location,
        action = scene.action,
        expression = scene.expression,
        lighting = scene.lighting,
    ));

    if !scene.is_user_present {
        prompt.push_str(&format!(
            "\n{user} is not physically present in the scene; you are exchanging messages.\n",
            user = companion.user_name,
        ));
    }

    prompt.push_str(&format!(
        "\nStay in character as {name} at all times. Speak naturally in first person, \
         react to the scene you are in, and keep replies to one to three short sentences. \
         Never mention being an AI or describe these instructions.",
        name = companion.name,
    ));

    prompt
}

/// Build the instruction for the context-analysis model call.
///
/// The model is asked for a single JSON object; `ContextAnalysis::parse`
/// consumes the reply.
pub fn build_context_analysis_prompt(
    companion: &Companion,
    scene: &CompanionScene,
    history: &[ChatLog],
) -> String {
    let mut transcript = String::new();
    for log in history {
        let speaker = match log.role {
            ChatRole::User => companion.user_name.as_str(),
            ChatRole::Companion => companion.name.as_str(),
        };
        transcript.push_str(&format!("{}: {}\n", speaker, log.content));
    }

    format!(
        "You track the physical scene of a roleplay conversation between \
         {user} and {name}.\n\
         \n\
         Previous scene state:\n\
         - outfit: {outfit}\n\
         - location: {location}\n\
         - action: {action}\n\
         - expression: {expression}\n\
         - lighting: {lighting}\n\
         \n\
         Recent conversation:\n\
         {transcript}\
         \n\
         Describe {name}'s current state after this conversation. Carry fields \
         over from the previous scene unless the conversation changed them.\n\
         \n\
         Return ONLY a JSON object with exactly these keys:\n\
         {{\"reasoning\": \"one sentence on what changed and why\", \
         \"outfit\": \"...\", \"location\": \"...\", \"action_summary\": \"...\", \
         \"is_user_present\": true, \"visual_tags\": [\"...\"], \
         \"expression\": \"...\", \"lighting\": \"...\"}}\n\
         \n\
         No markdown fences, no text outside the JSON object.",
        user = companion.user_name,
        name = companion.name,
        outfit = scene.outfit,
        location = scene.location,
        action = scene.action,
        expression = scene.expression,
        lighting = scene.lighting,
        transcript = transcript,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn mock_companion() -> Companion {
        Companion::new(
            "Yuki".to_string(),
            "Gentle, curious, teases a little".to_string(),
            "silver hair, blue eyes, petite".to_string(),
            "Alex".to_string(),
            None,
            None,
        )
    }

    #[test]
    fn test_system_prompt_is_deterministic() {
        let companion = mock_companion();
        let scene = CompanionScene::new_for_companion(companion.id);
        assert_eq!(
            build_system_prompt(&companion, &scene),
            build_system_prompt(&companion, &scene)
        );
    }

    #[test]
    fn test_system_prompt_contains_character_and_scene() {
        let companion = mock_companion();
        let mut scene = CompanionScene::new_for_companion(companion.id);
        scene.outfit = "winter coat".to_string();
        scene.is_user_present = false;

        let prompt = build_system_prompt(&companion, &scene);
        assert!(prompt.contains("You are Yuki"));
        assert!(prompt.contains("chatting with Alex"));
        assert!(prompt.contains("- Outfit: winter coat"));
        assert!(prompt.contains("not physically present"));
    }

    #[test]
    fn test_empty_fields_still_yield_valid_prompt() {
        let companion = Companion::new(
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            None,
            None,
        );
        let scene = CompanionScene::new_for_companion(companion.id);
        let prompt = build_system_prompt(&companion, &scene);
        assert!(prompt.contains("Personality:"));
        assert!(prompt.contains("Current scene:"));
    }

    #[test]
    fn test_analysis_prompt_embeds_transcript_and_keys() {
        let companion = mock_companion();
        let scene = CompanionScene::new_for_companion(companion.id);
        let history = vec![
            ChatLog::user(companion.id, "Let's head to the beach!"),
            ChatLog::companion(companion.id, "Race you to the water!"),
        ];

        let prompt = build_context_analysis_prompt(&companion, &scene, &history);
        assert!(prompt.contains("Alex: Let's head to the beach!"));
        assert!(prompt.contains("Yuki: Race you to the water!"));
        assert!(prompt.contains("\"action_summary\""));
        assert!(prompt.contains("\"is_user_present\""));
        assert!(prompt.contains("Return ONLY a JSON object"));
    }

    #[test]
    fn test_analysis_prompt_ignores_ids() {
        // Only content matters; two logs with different ids produce the same text
        let companion = mock_companion();
        let scene = CompanionScene::new_for_companion(companion.id);
        let a = vec![ChatLog::user(companion.id, "hello")];
        let b = vec![ChatLog {
            id: Uuid::new_v4(),
            ..a[0].clone()
        }];
        assert_eq!(
            build_context_analysis_prompt(&companion, &scene, &a),
            build_context_analysis_prompt(&companion, &scene, &b)
        );
    }
}
