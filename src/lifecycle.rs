//! Project lifecycle orchestration
//!
//! Owns the status state machine and drives the full pipeline: conversation
//! turns while gathering requirements, then extract -> synthesize -> generate
//! -> materialize on a confirmed generation request, then install/build/test
//! on a build request. Every status transition is persisted before it is
//! published, so observers never see a status the store does not hold.
//!
//! Pipelines run to completion on the caller's task; callers that want
//! fire-and-forget semantics spawn the call. A per-project lock covers every
//! read-modify-write (conversation turns included), so concurrent operations
//! fail fast with `Conflict` instead of losing each other's updates. A run
//! abandoned mid-pipeline (the caller dropped the future) leaves the status
//! parked at an in-flight value with the lock free; a fresh generation or
//! build request reclaims such a project.

use crate::archive::{ArchiveExporter, ArchiveFormat};
use crate::build::BuildRunner;
use crate::conversation::{AssistantReply, ConversationEngine};
use crate::error::PlatformError;
use crate::exec::CommandExecutor;
use crate::materialize::ProjectMaterializer;
use crate::model::{
    ConversationRecord, FileNode, Message, MessageRole, ProjectDescriptor, ProjectStatus,
};
use crate::notify::{events, NotificationSink};
use crate::provider::CompletionClient;
use crate::store::{ConversationStore, ProjectStore};
use crate::{architecture, codegen, requirements};
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub struct ProjectLifecycle {
    projects: Arc<dyn ProjectStore>,
    conversations: Arc<dyn ConversationStore>,
    engine: ConversationEngine,
    materializer: ProjectMaterializer,
    builder: BuildRunner,
    exporter: ArchiveExporter,
    sink: Arc<dyn NotificationSink>,
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl ProjectLifecycle {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        conversations: Arc<dyn ConversationStore>,
        client: Arc<dyn CompletionClient>,
        executor: Arc<dyn CommandExecutor>,
        storage_root: impl Into<PathBuf>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self::with_build_timeout(
            projects,
            conversations,
            client,
            executor,
            storage_root,
            sink,
            crate::build::DEFAULT_COMMAND_TIMEOUT,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_build_timeout(
        projects: Arc<dyn ProjectStore>,
        conversations: Arc<dyn ConversationStore>,
        client: Arc<dyn CompletionClient>,
        executor: Arc<dyn CommandExecutor>,
        storage_root: impl Into<PathBuf>,
        sink: Arc<dyn NotificationSink>,
        build_timeout: Duration,
    ) -> Self {
        let storage_root = storage_root.into();
        Self {
            projects,
            conversations,
            engine: ConversationEngine::new(client),
            materializer: ProjectMaterializer::new(storage_root.clone()),
            builder: BuildRunner::with_timeout(executor, build_timeout),
            exporter: ArchiveExporter::new(storage_root),
            sink,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a project and its conversation record
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
    ) -> Result<ProjectDescriptor, PlatformError> {
        if name.trim().is_empty() {
            return Err(PlatformError::validation("name", "must not be empty"));
        }
        if description.trim().is_empty() {
            return Err(PlatformError::validation(
                "description",
                "must not be empty",
            ));
        }

        let project = ProjectDescriptor::new(name.trim(), description.trim());
        let conversation = ConversationRecord::new(project.id);

        self.projects.put(project.clone()).await?;
        self.conversations.put(conversation).await?;

        info!(
            project_id = %project.id,
            name = %project.name,
            project_type = %project.project_type,
            "Project created"
        );

        Ok(project)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<ProjectDescriptor, PlatformError> {
        self.projects
            .get(id)
            .await?
            .ok_or_else(|| PlatformError::project_not_found(id))
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectDescriptor>, PlatformError> {
        self.projects.list().await
    }

    pub async fn get_conversation(
        &self,
        project_id: Uuid,
    ) -> Result<ConversationRecord, PlatformError> {
        self.conversations
            .get(project_id)
            .await?
            .ok_or_else(|| PlatformError::conversation_not_found(project_id))
    }

    /// Record a user turn and run the assistant's reply
    ///
    /// The provider runs before anything is persisted: if it fails, the
    /// conversation is left untouched and the user can simply retry.
    #[instrument(skip(self, content), fields(project_id = %project_id))]
    pub async fn record_message(
        &self,
        project_id: Uuid,
        content: &str,
    ) -> Result<AssistantReply, PlatformError> {
        if content.trim().is_empty() {
            return Err(PlatformError::validation("content", "must not be empty"));
        }

        // Turns read-modify-write both the conversation and the project, so
        // they hold the same per-project lock as the pipelines; an overlapping
        // turn gets Conflict instead of overwriting the other's put
        let _guard = self.acquire(project_id)?;

        let mut project = self.get_project(project_id).await?;
        if project.status.is_pipeline_active() {
            return Err(PlatformError::conflict(
                project_id,
                format!("cannot converse while project is {}", project.status),
            ));
        }

        let mut conversation = self.get_conversation(project_id).await?;

        let user_message = Message::new(MessageRole::User, content.trim());
        let mut history = conversation.messages.clone();
        history.push(user_message.clone());

        let reply = self.engine.next_turn(&conversation.context, &history).await?;

        conversation.push(user_message);
        conversation.push(Message::new(MessageRole::Assistant, reply.content.clone()));
        conversation.context.stage = reply.stage;
        conversation.context.clarification_needed = reply.clarification_questions.clone();

        let user_texts: Vec<String> = conversation
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .collect();
        let extracted = requirements::extract(&project.description, &user_texts);
        for tag in extracted.tags() {
            conversation.context.add_requirement(tag);
        }
        project.requirements = conversation.context.extracted_requirements.clone();

        self.conversations.put(conversation).await?;

        // Status only moves forward here; Ready/Failed projects keep their
        // status while the user iterates on the conversation
        if project.status == ProjectStatus::Initializing {
            self.transition(&mut project, ProjectStatus::GatheringRequirements)
                .await?;
        } else {
            project.touch();
            self.projects.put(project).await?;
        }

        Ok(reply)
    }

    /// Run the full generation pipeline for a confirmed request
    ///
    /// Requires the project to be gathering requirements, retrying from
    /// `failed`, or reclaiming an abandoned run. Returns once the project is
    /// `ready` or `failed`.
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn request_generation(
        &self,
        project_id: Uuid,
        confirmed: bool,
    ) -> Result<ProjectDescriptor, PlatformError> {
        if !confirmed {
            return Err(PlatformError::validation(
                "confirmed",
                "generation requires explicit confirmation",
            ));
        }

        let mut project = self.get_project(project_id).await?;
        match project.status {
            ProjectStatus::GatheringRequirements | ProjectStatus::Failed => {}
            // A dropped pipeline future leaves the project persisted
            // mid-pipeline with the lock free; a new confirmed request
            // reclaims it. A pipeline that is actually running still holds
            // the lock and the acquire below conflicts.
            ProjectStatus::Planning | ProjectStatus::Generating => {}
            status => {
                return Err(PlatformError::conflict(
                    project_id,
                    format!("cannot generate from status {}", status),
                ));
            }
        }

        let _guard = self.acquire(project_id)?;

        project.last_error = None;
        self.transition(&mut project, ProjectStatus::Planning).await?;

        match self.run_generation(&mut project).await {
            Ok(()) => {
                self.transition(&mut project, ProjectStatus::Ready).await?;
                Ok(project)
            }
            Err(e) => {
                error!(project_id = %project_id, error = %e, "Generation pipeline failed");
                self.fail(&mut project, &e).await?;
                Err(e)
            }
        }
    }

    async fn run_generation(&self, project: &mut ProjectDescriptor) -> Result<(), PlatformError> {
        let conversation = self.get_conversation(project.id).await?;
        let user_texts: Vec<String> = conversation
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .collect();

        let extracted = requirements::extract(&project.description, &user_texts);
        project.requirements = extracted.tags();
        project.touch();
        self.projects.put(project.clone()).await?;

        let mut arch = architecture::synthesize(project, &extracted);
        project.architecture = Some(arch.clone());
        self.transition(project, ProjectStatus::Generating).await?;

        let files = codegen::generate(project, &arch, &extracted);
        info!(project_id = %project.id, files = files.len(), "Files generated");

        for file in &files {
            self.sink.publish(
                project.id,
                events::FILE_GENERATED,
                json!({ "path": file.path, "language": file.language }),
            );
        }

        // Replace the synthesized skeleton with the tree the files actually form
        arch.file_structure = FileNode::from_files(&project.name, &files);
        project.architecture = Some(arch);
        project.files = files;
        project.touch();
        self.projects.put(project.clone()).await?;

        let dir = self.materializer.write(project.id, &project.files).await?;
        info!(project_id = %project.id, dir = %dir.display(), "Project materialized");

        Ok(())
    }

    /// Install dependencies, build, and test the materialized project
    ///
    /// Build and test failures are recorded in the outcomes and the project
    /// returns to `ready`; only internal errors move it to `failed`.
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn request_build(
        &self,
        project_id: Uuid,
    ) -> Result<ProjectDescriptor, PlatformError> {
        let mut project = self.get_project(project_id).await?;
        match project.status {
            ProjectStatus::Ready => {}
            // Same reclaim rule as generation: an abandoned build run left
            // the status mid-pipeline, and the free lock proves nothing is
            // actually running
            ProjectStatus::Building | ProjectStatus::Testing => {}
            status => {
                return Err(PlatformError::conflict(
                    project_id,
                    format!("cannot build from status {}", status),
                ));
            }
        }

        let _guard = self.acquire(project_id)?;
        let dir = self.materializer.project_dir(project_id);

        self.transition(&mut project, ProjectStatus::Building).await?;
        self.sink
            .publish(project_id, events::BUILD_STARTED, json!({}));

        let build = self.builder.build(&dir).await;
        let build_success = build.success;
        self.sink.publish(
            project_id,
            events::BUILD_PROGRESS,
            json!({ "logs": build.logs.len(), "warnings": build.warnings.len() }),
        );
        self.sink.publish(
            project_id,
            events::BUILD_COMPLETED,
            json!({ "success": build_success }),
        );
        project.build_output = Some(build);

        if build_success {
            self.transition(&mut project, ProjectStatus::Testing).await?;
            self.sink.publish(project_id, events::TEST_STARTED, json!({}));

            let tests = self.builder.test(&dir).await;
            self.sink.publish(
                project_id,
                events::TEST_COMPLETED,
                json!({
                    "success": tests.success,
                    "passed": tests.passed_tests,
                    "failed": tests.failed_tests,
                }),
            );
            project.test_results = Some(tests);
        } else {
            warn!(project_id = %project_id, "Build failed; skipping tests");
            project.test_results = None;
        }

        self.transition(&mut project, ProjectStatus::Ready).await?;
        Ok(project)
    }

    /// Export the project's generated files as a downloadable archive
    pub async fn export_archive(
        &self,
        project_id: Uuid,
        format: ArchiveFormat,
    ) -> Result<PathBuf, PlatformError> {
        let project = self.get_project(project_id).await?;
        if project.files.is_empty() {
            return Err(PlatformError::conflict(
                project_id,
                "project has no generated files to archive",
            ));
        }

        self.exporter.export(project_id, &project.files, format)
    }

    /// Delete the project, its conversation, materialized files, and archives
    pub async fn delete_project(&self, project_id: Uuid) -> Result<(), PlatformError> {
        let _guard = self.acquire(project_id)?;

        if !self.projects.delete(project_id).await? {
            return Err(PlatformError::project_not_found(project_id));
        }
        self.conversations.delete(project_id).await?;
        self.materializer.remove(project_id).await?;
        self.exporter.remove(project_id)?;
        self.locks.lock().unwrap().remove(&project_id);

        info!(project_id = %project_id, "Project deleted");
        Ok(())
    }

    /// Persist a status change, then publish it
    async fn transition(
        &self,
        project: &mut ProjectDescriptor,
        status: ProjectStatus,
    ) -> Result<(), PlatformError> {
        let previous = project.status;
        project.status = status;
        project.touch();
        self.projects.put(project.clone()).await?;

        info!(
            project_id = %project.id,
            from = %previous,
            to = %status,
            "Status changed"
        );
        self.sink.publish(
            project.id,
            events::STATUS_CHANGED,
            json!({ "from": previous, "to": status }),
        );
        Ok(())
    }

    async fn fail(
        &self,
        project: &mut ProjectDescriptor,
        cause: &PlatformError,
    ) -> Result<(), PlatformError> {
        project.last_error = Some(cause.to_string());
        self.transition(project, ProjectStatus::Failed).await
    }

    /// Grab the per-project lock without waiting
    fn acquire(&self, project_id: Uuid) -> Result<OwnedMutexGuard<()>, PlatformError> {
        let lock = self
            .locks
            .lock()
            .unwrap()
            .entry(project_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();

        lock.try_lock_owned().map_err(|_| {
            PlatformError::conflict(project_id, "another operation on this project is in progress")
        })
    }
}
