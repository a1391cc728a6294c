//! Conversation record and context
//!
//! One conversation per project (1:1), created at project creation and
//! appended to on every turn. The context accumulates what the assistant has
//! learned so far and which clarifications are still outstanding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStage {
    Initial,
    Clarifying,
    Planning,
    Implementing,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub stage: ConversationStage,
    pub extracted_requirements: Vec<String>,
    pub clarification_needed: Vec<String>,
    pub user_preferences: BTreeMap<String, serde_json::Value>,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self {
            stage: ConversationStage::Initial,
            extracted_requirements: Vec::new(),
            clarification_needed: Vec::new(),
            user_preferences: BTreeMap::new(),
        }
    }
}

impl ConversationContext {
    /// Merge a requirement tag, preserving first-seen order without duplicates
    pub fn add_requirement(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.extracted_requirements.contains(&tag) {
            self.extracted_requirements.push(tag);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub project_id: Uuid,
    pub messages: Vec<Message>,
    pub context: ConversationContext,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationRecord {
    pub fn new(project_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            messages: Vec::new(),
            context: ConversationContext::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Number of user turns so far
    pub fn user_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }

    /// Concatenated text of all messages, used by the requirement extractor
    pub fn combined_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation() {
        let project_id = Uuid::new_v4();
        let conversation = ConversationRecord::new(project_id);

        assert_eq!(conversation.project_id, project_id);
        assert!(conversation.messages.is_empty());
        assert_eq!(conversation.context.stage, ConversationStage::Initial);
    }

    #[test]
    fn test_user_turns() {
        let mut conversation = ConversationRecord::new(Uuid::new_v4());
        conversation.push(Message::new(MessageRole::User, "build me a todo app"));
        conversation.push(Message::new(MessageRole::Assistant, "what stack?"));
        conversation.push(Message::new(MessageRole::User, "react please"));

        assert_eq!(conversation.user_turns(), 2);
        assert_eq!(conversation.messages.len(), 3);
    }

    #[test]
    fn test_add_requirement_dedupes() {
        let mut context = ConversationContext::default();
        context.add_requirement("authentication");
        context.add_requirement("charts");
        context.add_requirement("authentication");

        assert_eq!(context.extracted_requirements, vec!["authentication", "charts"]);
    }

    #[test]
    fn test_combined_text() {
        let mut conversation = ConversationRecord::new(Uuid::new_v4());
        conversation.push(Message::new(MessageRole::User, "first"));
        conversation.push(Message::new(MessageRole::Assistant, "second"));

        assert_eq!(conversation.combined_text(), "first\nsecond");
    }
}
