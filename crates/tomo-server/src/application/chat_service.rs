//! Chat Application Service (Use Case)
//!
//! One chat turn: build the system prompt from companion + scene, get a
//! reply from the LLM, persist both messages, then re-derive the scene via
//! context analysis and write it back (last write wins).

use std::sync::Arc;
use uuid::Uuid;

use tomo::{
    build_context_analysis_prompt, build_system_prompt, ChatLog, ChatLogRepository, ChatMessage,
    ChatRole, Companion, CompanionRepository, CompanionScene, CompletionOptions, ContextAnalysis,
    DomainError, LlmProvider, TokenUsage, HISTORY_WINDOW,
};

/// Result of one chat turn
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub reply: ChatLog,
    pub scene: CompanionScene,
    /// False when context analysis failed; `scene` is then the stale state
    pub scene_updated: bool,
    pub analysis_error: Option<String>,
    pub usage: TokenUsage,
}

/// Application service for the chat pipeline
pub struct ChatService<R: CompanionRepository, C: ChatLogRepository> {
    companions: Arc<R>,
    chat_logs: Arc<C>,
    llm: Arc<dyn LlmProvider>,
}

impl<R: CompanionRepository, C: ChatLogRepository> ChatService<R, C> {
    pub fn new(companions: Arc<R>, chat_logs: Arc<C>, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            companions,
            chat_logs,
            llm,
        }
    }

    /// Run one chat turn for a companion
    pub async fn chat(&self, companion_id: Uuid, message: String) -> Result<ChatTurn, DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::Validation("Message cannot be empty".to_string()));
        }

        let (companion, scene) = self.load(companion_id).await?;
        let history = self.chat_logs.recent(companion_id, HISTORY_WINDOW).await?;

        // 1. Conversational reply
        let mut messages = vec![ChatMessage::system(build_system_prompt(&companion, &scene))];
        for log in &history {
            messages.push(match log.role {
                ChatRole::User => ChatMessage::user(&log.content),
                ChatRole::Companion => ChatMessage::assistant(&log.content),
            });
        }
        messages.push(ChatMessage::user(&message));

        let completion = self
            .llm
            .complete(&messages, &CompletionOptions::conversation())
            .await?;

        tracing::info!(
            "Chat turn for {} via {} ({} tokens)",
            companion.name,
            self.llm.model_id(),
            completion.usage.total_tokens
        );

        // 2. Persist the exchange
        let user_log = self
            .chat_logs
            .append(&ChatLog::user(companion_id, message))
            .await?;
        let reply = self
            .chat_logs
            .append(&ChatLog::companion(companion_id, completion.content.clone()))
            .await?;

        // 3. Refresh the scene from the turn just taken
        let mut window = history;
        window.push(user_log);
        window.push(reply.clone());

        match self.refresh_scene(&companion, &scene, &window).await {
            Ok(updated) => Ok(ChatTurn {
                reply,
                scene: updated,
                scene_updated: true,
                analysis_error: None,
                usage: completion.usage,
            }),
            Err(e) => {
                tracing::warn!("Context analysis failed for {}: {}", companion.name, e);
                Ok(ChatTurn {
                    reply,
                    scene,
                    scene_updated: false,
                    analysis_error: Some(e.to_string()),
                    usage: completion.usage,
                })
            }
        }
    }

    /// Recompute the scene from recent history on demand.
    ///
    /// Unlike the in-turn refresh, a malformed analysis here is a hard
    /// failure for the caller.
    pub async fn analyze(&self, companion_id: Uuid) -> Result<CompanionScene, DomainError> {
        let (companion, scene) = self.load(companion_id).await?;
        let history = self.chat_logs.recent(companion_id, HISTORY_WINDOW).await?;
        self.refresh_scene(&companion, &scene, &history).await
    }

    /// Chat history for a companion, newest first
    pub async fn history(
        &self,
        companion_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ChatLog>, DomainError> {
        self.chat_logs.history(companion_id, limit).await
    }

    /// Delete all chat history for a companion
    pub async fn forget(&self, companion_id: Uuid) -> Result<u64, DomainError> {
        let removed = self.chat_logs.delete_for_companion(companion_id).await?;
        tracing::info!("Removed {} chat logs for companion {}", removed, companion_id);
        Ok(removed)
    }

    async fn load(
        &self,
        companion_id: Uuid,
    ) -> Result<(Companion, CompanionScene), DomainError> {
        let companion = self
            .companions
            .find_by_id(companion_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Companion", companion_id))?;
        let scene = self
            .companions
            .find_scene(companion_id)
            .await?
            .unwrap_or_else(|| CompanionScene::new_for_companion(companion_id));
        Ok((companion, scene))
    }

    async fn refresh_scene(
        &self,
        companion: &Companion,
        scene: &CompanionScene,
        window: &[ChatLog],
    ) -> Result<CompanionScene, DomainError> {
        let prompt = build_context_analysis_prompt(companion, scene, window);
        let completion = self
            .llm
            .complete(
                &[ChatMessage::user(prompt)],
                &CompletionOptions::context_analysis(),
            )
            .await?;

        let analysis = ContextAnalysis::parse(&completion.content)?;

        let mut updated = scene.clone();
        updated.apply(analysis);
        self.companions.save_scene(&updated).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tomo::CompletionResponse;

    struct InMemoryRepo {
        companion: Companion,
        scene: Mutex<CompanionScene>,
    }

    #[async_trait]
    impl CompanionRepository for InMemoryRepo {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Companion>, DomainError> {
            Ok((id == self.companion.id).then(|| self.companion.clone()))
        }
        async fn find_all(&self) -> Result<Vec<Companion>, DomainError> {
            Ok(vec![self.companion.clone()])
        }
        async fn save(&self, companion: &Companion) -> Result<Companion, DomainError> {
            Ok(companion.clone())
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, DomainError> {
            Ok(false)
        }
        async fn find_scene(
            &self,
            _companion_id: Uuid,
        ) -> Result<Option<CompanionScene>, DomainError> {
            Ok(Some(self.scene.lock().unwrap().clone()))
        }
        async fn save_scene(&self, scene: &CompanionScene) -> Result<CompanionScene, DomainError> {
            *self.scene.lock().unwrap() = scene.clone();
            Ok(scene.clone())
        }
        async fn create_scene(&self, companion_id: Uuid) -> Result<CompanionScene, DomainError> {
            Ok(CompanionScene::new_for_companion(companion_id))
        }
    }

    struct InMemoryLogs {
        logs: Mutex<Vec<ChatLog>>,
    }

    #[async_trait]
    impl ChatLogRepository for InMemoryLogs {
        async fn append(&self, log: &ChatLog) -> Result<ChatLog, DomainError> {
            self.logs.lock().unwrap().push(log.clone());
            Ok(log.clone())
        }
        async fn recent(
            &self,
            _companion_id: Uuid,
            limit: usize,
        ) -> Result<Vec<ChatLog>, DomainError> {
            let logs = self.logs.lock().unwrap();
            let start = logs.len().saturating_sub(limit);
            Ok(logs[start..].to_vec())
        }
        async fn history(
            &self,
            _companion_id: Uuid,
            limit: usize,
        ) -> Result<Vec<ChatLog>, DomainError> {
            let mut logs = self.logs.lock().unwrap().clone();
            logs.reverse();
            logs.truncate(limit);
            Ok(logs)
        }
        async fn delete_for_companion(&self, _companion_id: Uuid) -> Result<u64, DomainError> {
            let mut logs = self.logs.lock().unwrap();
            let n = logs.len() as u64;
            logs.clear();
            Ok(n)
        }
    }

    struct ScriptedLlm {
        replies: Mutex<VecDeque<String>>,
    }

    impl ScriptedLlm {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> Result<CompletionResponse, DomainError> {
            let content = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted LLM ran out of replies");
            Ok(CompletionResponse {
                content,
                model: "scripted".to_string(),
                usage: TokenUsage::default(),
                finish_reason: Some("stop".to_string()),
            })
        }
        fn provider_name(&self) -> &str {
            "scripted"
        }
        fn model_id(&self) -> &str {
            "scripted"
        }
    }

    const ANALYSIS: &str = r#"{"reasoning":"moved to the park","outfit":"sundress","location":"city park","action_summary":"walking along the path","is_user_present":true,"visual_tags":["sunny"],"expression":"happy","lighting":"golden hour"}"#;

    fn service(
        replies: &[&str],
    ) -> (
        ChatService<InMemoryRepo, InMemoryLogs>,
        Uuid,
        Arc<InMemoryRepo>,
        Arc<InMemoryLogs>,
    ) {
        let companion = Companion::new(
            "Yuki".to_string(),
            "gentle".to_string(),
            "silver hair".to_string(),
            "Alex".to_string(),
            None,
            None,
        );
        let id = companion.id;
        let repo = Arc::new(InMemoryRepo {
            scene: Mutex::new(CompanionScene::new_for_companion(id)),
            companion,
        });
        let logs = Arc::new(InMemoryLogs {
            logs: Mutex::new(Vec::new()),
        });
        let service = ChatService::new(
            repo.clone(),
            logs.clone(),
            Arc::new(ScriptedLlm::new(replies)),
        );
        (service, id, repo, logs)
    }

    #[tokio::test]
    async fn test_chat_turn_persists_messages_and_updates_scene() {
        let (service, id, repo, logs) = service(&["Let's walk in the park!", ANALYSIS]);

        let turn = service.chat(id, "want to go out?".to_string()).await.unwrap();

        assert_eq!(turn.reply.content, "Let's walk in the park!");
        assert_eq!(turn.reply.role, ChatRole::Companion);
        assert!(turn.scene_updated);
        assert_eq!(turn.scene.outfit, "sundress");
        assert_eq!(turn.scene.location, "city park");

        // both sides of the exchange are in memory
        assert_eq!(logs.logs.lock().unwrap().len(), 2);
        // and the scene write actually landed in the repository
        assert_eq!(repo.scene.lock().unwrap().outfit, "sundress");
    }

    #[tokio::test]
    async fn test_malformed_analysis_keeps_reply_and_stale_scene() {
        let (service, id, repo, logs) = service(&["Sure thing!", "no json here"]);

        let turn = service.chat(id, "hello".to_string()).await.unwrap();

        assert!(!turn.scene_updated);
        assert!(turn.analysis_error.is_some());
        assert_eq!(turn.scene.outfit, "casual clothes");
        assert_eq!(logs.logs.lock().unwrap().len(), 2);
        assert_eq!(repo.scene.lock().unwrap().outfit, "casual clothes");
    }

    #[tokio::test]
    async fn test_analyze_surfaces_hard_failure() {
        let (service, id, _repo, _logs) = service(&["not json"]);
        let result = service.analyze(id).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let (service, id, _repo, _logs) = service(&[]);
        let result = service.chat(id, "   ".to_string()).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_companion_is_not_found() {
        let (service, _id, _repo, _logs) = service(&[]);
        let result = service.chat(Uuid::new_v4(), "hi".to_string()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
