//! intentforge - conversational project generation platform
//!
//! This library turns a natural-language description of a piece of software
//! into a complete, buildable project. A conversation engine gathers and
//! clarifies requirements through a pluggable AI provider, then a
//! deterministic pipeline extracts structured requirements, synthesizes an
//! architecture, generates source files, materializes them on disk, and can
//! build, test, and archive the result.
//!
//! # Core Concepts
//!
//! - **Lifecycle**: The status state machine owning every project
//!   (initializing -> gathering_requirements -> planning -> generating ->
//!   building -> testing -> ready, with failed as the error state)
//! - **Providers**: Pluggable completion backends (a deterministic mock and
//!   any OpenAI-compatible endpoint); everything that interprets provider
//!   text lives in the conversation engine
//! - **Generation**: Requirement extraction, architecture synthesis, and
//!   file generation are pure functions of the conversation text, so the
//!   same input always produces the same project
//!
//! # Example Usage
//!
//! ```ignore
//! use intentforge::lifecycle::ProjectLifecycle;
//! use intentforge::provider::MockProvider;
//! use intentforge::exec::HostExecutor;
//! use intentforge::notify::TracingSink;
//! use intentforge::store::{InMemoryConversationStore, InMemoryProjectStore};
//! use std::sync::Arc;
//!
//! async fn generate() -> Result<(), Box<dyn std::error::Error>> {
//!     let lifecycle = ProjectLifecycle::new(
//!         Arc::new(InMemoryProjectStore::new()),
//!         Arc::new(InMemoryConversationStore::new()),
//!         Arc::new(MockProvider::new()),
//!         Arc::new(HostExecutor),
//!         "./storage",
//!         Arc::new(TracingSink),
//!     );
//!
//!     let project = lifecycle
//!         .create_project("todo", "A todo app with dark mode")
//!         .await?;
//!     lifecycle.record_message(project.id, "keep it simple").await?;
//!     let project = lifecycle.request_generation(project.id, true).await?;
//!
//!     println!("Generated {} files", project.files.len());
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`lifecycle`]: Status state machine and pipeline orchestration
//! - [`conversation`]: Assistant turns and reply interpretation
//! - [`requirements`], [`architecture`], [`codegen`]: The pure pipeline stages
//! - [`materialize`], [`build`], [`archive`]: Filesystem, toolchain, export

// Public modules
pub mod architecture;
pub mod archive;
pub mod build;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod conversation;
pub mod error;
pub mod exec;
pub mod lifecycle;
pub mod materialize;
pub mod model;
pub mod notify;
pub mod provider;
pub mod requirements;
pub mod store;
pub mod util;

// Re-export key types for convenient access
pub use archive::{ArchiveExporter, ArchiveFormat};
pub use build::BuildRunner;
pub use config::{ConfigError, PlatformConfig};
pub use conversation::{AssistantReply, ConversationEngine};
pub use error::PlatformError;
pub use exec::{CommandExecutor, HostExecutor};
pub use lifecycle::ProjectLifecycle;
pub use materialize::ProjectMaterializer;
pub use model::{ProjectDescriptor, ProjectStatus, ProjectType};
pub use provider::{CompletionClient, MockProvider, OpenAiCompatibleClient, ProviderError};
pub use requirements::{Feature, RequirementsSet};
pub use store::{InMemoryConversationStore, InMemoryProjectStore};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
