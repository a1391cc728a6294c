//! Deterministic mock provider
//!
//! The canned responses are part of the contract the lifecycle's tests lean
//! on: the first user turn always gets a clarification request, the second
//! always signals readiness to generate. The reply is derived from the
//! message history, so the mock itself is stateless.

use super::{CompletionClient, ProviderError};
use crate::model::{Message, MessageRole};
use async_trait::async_trait;

const CLARIFICATION_REPLY: &str = "Thank you for describing your project! To help me create \
the best solution, I have a few clarifying questions:\n\n\
1. What is your preferred tech stack?\n\
2. Do you need user authentication?\n\
3. What is the expected scale (users per day)?\n\n\
Please answer these questions so I can design the perfect solution for you.";

const READY_REPLY: &str = "Perfect! I now have all the information I need. I'll create:\n\n\
- A React frontend with modern UI\n\
- Requirement-driven components wired into the root view\n\
- Docker deployment configuration\n\n\
Ready to generate your project?";

const CONFIRM_REPLY: &str = "I'm ready to generate your project. Please confirm to proceed.";

#[derive(Debug, Default, Clone, Copy)]
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionClient for MockProvider {
    async fn complete(
        &self,
        _system_prompt: &str,
        messages: &[Message],
    ) -> Result<String, ProviderError> {
        let user_turns = messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count();

        let reply = match user_turns {
            0 | 1 => CLARIFICATION_REPLY,
            2 => READY_REPLY,
            _ => CONFIRM_REPLY,
        };

        Ok(reply.to_string())
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model_info(&self) -> Option<String> {
        Some("mock-model".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> Message {
        Message::new(MessageRole::User, content)
    }

    fn assistant(content: &str) -> Message {
        Message::new(MessageRole::Assistant, content)
    }

    #[tokio::test]
    async fn test_first_turn_asks_clarification() {
        let provider = MockProvider::new();
        let reply = provider
            .complete("system", &[user("build me a todo app")])
            .await
            .unwrap();

        assert!(reply.contains("clarifying questions"));
        assert!(!reply.to_lowercase().contains("ready to generate"));
    }

    #[tokio::test]
    async fn test_second_turn_signals_ready() {
        let provider = MockProvider::new();
        let history = vec![
            user("build me a todo app"),
            assistant(CLARIFICATION_REPLY),
            user("react and tailwind, no auth"),
        ];
        let reply = provider.complete("system", &history).await.unwrap();

        assert!(reply.contains("Ready to generate your project?"));
    }

    #[tokio::test]
    async fn test_later_turns_keep_confirming() {
        let provider = MockProvider::new();
        let history = vec![
            user("one"),
            assistant("a"),
            user("two"),
            assistant("b"),
            user("three"),
        ];
        let reply = provider.complete("system", &history).await.unwrap();

        assert_eq!(reply, CONFIRM_REPLY);
    }
}
