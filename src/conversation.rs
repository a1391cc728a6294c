//! Conversation engine
//!
//! Runs one assistant turn: builds the system prompt from the conversation
//! context, asks the completion provider, and interprets the free-text reply
//! into structured signals (clarification needed, ready to generate). The
//! interpretation is heuristic by design; providers stay free-text only.

use crate::model::{ConversationContext, ConversationStage, Message};
use crate::provider::{CompletionClient, ProviderError};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

/// Marker a provider can emit to signal generation readiness unambiguously
pub const READY_MARKER: &str = "READY_TO_GENERATE";

/// Structured interpretation of one assistant reply
#[derive(Debug, Clone)]
pub struct AssistantReply {
    pub content: String,
    pub requires_clarification: bool,
    pub clarification_questions: Vec<String>,
    pub ready_to_generate: bool,
    pub stage: ConversationStage,
}

pub struct ConversationEngine {
    client: Arc<dyn CompletionClient>,
}

impl ConversationEngine {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub fn provider_name(&self) -> &str {
        self.client.name()
    }

    /// Run one assistant turn over the message history
    pub async fn next_turn(
        &self,
        context: &ConversationContext,
        messages: &[Message],
    ) -> Result<AssistantReply, ProviderError> {
        let system_prompt = build_system_prompt(context);

        debug!(
            provider = self.client.name(),
            stage = ?context.stage,
            history_len = messages.len(),
            "Requesting assistant turn"
        );

        let content = self.client.complete(&system_prompt, messages).await?;
        let reply = parse_reply(&content, context.stage);

        info!(
            requires_clarification = reply.requires_clarification,
            ready_to_generate = reply.ready_to_generate,
            stage = ?reply.stage,
            "Assistant turn interpreted"
        );

        Ok(reply)
    }
}

/// Render the system prompt for the current conversation context
fn build_system_prompt(context: &ConversationContext) -> String {
    let mut prompt = String::from(
        "You are a software project planning assistant. Your job is to understand \
what the user wants to build, ask clarifying questions when requirements are \
ambiguous, and announce readiness once you have enough detail.\n\n\
When you still need information, ask numbered questions ending in '?'.\n\
When you have enough detail to generate the project, include the marker \
READY_TO_GENERATE and summarize what you will build.",
    );

    if !context.extracted_requirements.is_empty() {
        prompt.push_str("\n\nRequirements gathered so far:\n");
        for requirement in &context.extracted_requirements {
            prompt.push_str("- ");
            prompt.push_str(requirement);
            prompt.push('\n');
        }
    }

    if !context.clarification_needed.is_empty() {
        prompt.push_str("\nOutstanding clarifications:\n");
        for question in &context.clarification_needed {
            prompt.push_str("- ");
            prompt.push_str(question);
            prompt.push('\n');
        }
    }

    prompt
}

/// Interpret free assistant text into structured signals
///
/// Readiness wins over clarification when both patterns appear, matching the
/// provider contract: a reply that says "ready to generate" is an offer to
/// proceed even if it also recaps open questions.
fn parse_reply(content: &str, current_stage: ConversationStage) -> AssistantReply {
    let lower = content.to_lowercase();

    let ready_to_generate = content.contains(READY_MARKER)
        || (lower.contains("ready") && lower.contains("generate"));

    let requires_clarification = !ready_to_generate
        && (lower.contains("question") || lower.contains("clarify") || lower.contains("need to know"));

    let clarification_questions = if requires_clarification {
        extract_questions(content)
    } else {
        Vec::new()
    };

    let stage = if ready_to_generate {
        ConversationStage::Planning
    } else if requires_clarification {
        ConversationStage::Clarifying
    } else {
        current_stage
    };

    AssistantReply {
        content: content.to_string(),
        requires_clarification,
        clarification_questions,
        ready_to_generate,
        stage,
    }
}

/// Pull numbered questions ("1. What stack?") out of assistant text
fn extract_questions(content: &str) -> Vec<String> {
    let re = Regex::new(r"\d+\.\s+([^?]+\?)").expect("valid regex");
    re.captures_iter(content)
        .map(|c| c[1].trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageRole;
    use crate::provider::MockProvider;

    #[test]
    fn test_clarification_detected_with_questions() {
        let reply = parse_reply(
            "I have a few questions:\n\n1. What stack do you prefer?\n2. Do you need auth?",
            ConversationStage::Initial,
        );

        assert!(reply.requires_clarification);
        assert!(!reply.ready_to_generate);
        assert_eq!(reply.stage, ConversationStage::Clarifying);
        assert_eq!(
            reply.clarification_questions,
            vec!["What stack do you prefer?", "Do you need auth?"]
        );
    }

    #[test]
    fn test_ready_marker_detected() {
        let reply = parse_reply(
            "READY_TO_GENERATE\nI will build a React todo app.",
            ConversationStage::Clarifying,
        );

        assert!(reply.ready_to_generate);
        assert!(!reply.requires_clarification);
        assert_eq!(reply.stage, ConversationStage::Planning);
    }

    #[test]
    fn test_ready_phrase_detected() {
        let reply = parse_reply(
            "Perfect! Ready to generate your project?",
            ConversationStage::Clarifying,
        );

        assert!(reply.ready_to_generate);
        assert_eq!(reply.stage, ConversationStage::Planning);
    }

    #[test]
    fn test_ready_wins_over_clarification() {
        let reply = parse_reply(
            "One last question noted, but I'm ready to generate the project.",
            ConversationStage::Clarifying,
        );

        assert!(reply.ready_to_generate);
        assert!(!reply.requires_clarification);
        assert!(reply.clarification_questions.is_empty());
    }

    #[test]
    fn test_neutral_reply_keeps_stage() {
        let reply = parse_reply("Sounds good, noted.", ConversationStage::Clarifying);

        assert!(!reply.ready_to_generate);
        assert!(!reply.requires_clarification);
        assert_eq!(reply.stage, ConversationStage::Clarifying);
    }

    #[test]
    fn test_system_prompt_includes_context() {
        let mut context = ConversationContext::default();
        context.add_requirement("authentication");
        context.clarification_needed.push("What scale?".to_string());

        let prompt = build_system_prompt(&context);
        assert!(prompt.contains("- authentication"));
        assert!(prompt.contains("- What scale?"));
    }

    #[tokio::test]
    async fn test_engine_first_turn_over_mock() {
        let engine = ConversationEngine::new(Arc::new(MockProvider::new()));
        let context = ConversationContext::default();
        let history = vec![Message::new(MessageRole::User, "build me a todo app")];

        let reply = engine.next_turn(&context, &history).await.unwrap();

        assert!(reply.requires_clarification);
        assert_eq!(reply.clarification_questions.len(), 3);
        assert_eq!(reply.stage, ConversationStage::Clarifying);
    }

    #[tokio::test]
    async fn test_engine_second_turn_signals_ready() {
        let engine = ConversationEngine::new(Arc::new(MockProvider::new()));
        let context = ConversationContext {
            stage: ConversationStage::Clarifying,
            ..Default::default()
        };
        let history = vec![
            Message::new(MessageRole::User, "build me a todo app"),
            Message::new(MessageRole::Assistant, "questions..."),
            Message::new(MessageRole::User, "react, no auth"),
        ];

        let reply = engine.next_turn(&context, &history).await.unwrap();

        assert!(reply.ready_to_generate);
        assert_eq!(reply.stage, ConversationStage::Planning);
    }
}
