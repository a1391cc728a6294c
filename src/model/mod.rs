//! Core data model shared across the pipeline
//!
//! Every type here is serde-serializable: the external record store persists
//! projects and conversations as JSON blobs, and notification payloads are
//! built from the same structures.

pub mod conversation;
pub mod project;

pub use conversation::{
    ConversationContext, ConversationRecord, ConversationStage, Message, MessageRole,
};
pub use project::{
    ArchitectureDescriptor, BuildOutcome, Component, ComponentKind, Coverage, FileNode,
    FileNodeKind, GeneratedFile, ProjectDescriptor, ProjectStatus, ProjectType, TechStack,
    TestCase, TestOutcome, TestStatus, TestSuite,
};
