//! Command handlers
//!
//! Each handler wires the lifecycle service together from the environment
//! configuration, runs one command end to end, and returns a process exit
//! code. Errors are reported on stderr; `--quiet` suppresses the progress
//! narration but never the errors.

use crate::cli::commands::{ConfigArgs, GenerateArgs};
use crate::config::PlatformConfig;
use crate::exec::HostExecutor;
use crate::lifecycle::ProjectLifecycle;
use crate::model::ProjectStatus;
use crate::notify::{NoOpSink, TracingSink};
use crate::store::{InMemoryConversationStore, InMemoryProjectStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::error;

pub async fn handle_generate(args: &GenerateArgs, quiet: bool) -> i32 {
    match run_generate(args, quiet).await {
        Ok(()) => 0,
        Err(e) => {
            error!("Generation failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

async fn run_generate(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let mut config = PlatformConfig::default();
    if let Some(storage) = &args.storage {
        config.storage_path = storage.clone();
    }
    config.validate().context("Invalid configuration")?;

    let lifecycle = ProjectLifecycle::with_build_timeout(
        Arc::new(InMemoryProjectStore::new()),
        Arc::new(InMemoryConversationStore::new()),
        config.create_client(),
        Arc::new(HostExecutor),
        config.storage_path.clone(),
        if quiet {
            Arc::new(NoOpSink) as Arc<dyn crate::notify::NotificationSink>
        } else {
            Arc::new(TracingSink)
        },
        config.build_timeout(),
    );

    let project = lifecycle
        .create_project(&args.name, &args.description)
        .await
        .context("Failed to create project")?;

    // Seed the conversation: the description opens it, then any -m messages
    lifecycle
        .record_message(project.id, &args.description)
        .await
        .context("Conversation turn failed")?;
    for message in &args.message {
        lifecycle
            .record_message(project.id, message)
            .await
            .context("Conversation turn failed")?;
    }

    let project = lifecycle
        .request_generation(project.id, true)
        .await
        .context("Generation pipeline failed")?;

    if !quiet {
        println!("Project {} generated ({} files)", project.name, project.files.len());
        println!("  type:         {}", project.project_type);
        println!("  requirements: {}", project.requirements.join(", "));
    }

    if args.build {
        let project = lifecycle
            .request_build(project.id)
            .await
            .context("Build pipeline failed")?;

        let build = project
            .build_output
            .as_ref()
            .context("Build produced no output")?;
        if !quiet {
            println!("  build:        {}", if build.success { "ok" } else { "FAILED" });
            if let Some(tests) = &project.test_results {
                println!(
                    "  tests:        {} passed, {} failed",
                    tests.passed_tests, tests.failed_tests
                );
            }
        }
        if !build.success {
            for line in &build.errors {
                eprintln!("{}", line);
            }
            anyhow::bail!("build failed");
        }
    }

    if let Some(format) = args.archive {
        let path = lifecycle
            .export_archive(project.id, format.into())
            .await
            .context("Archive export failed")?;
        if !quiet {
            println!("  archive:      {}", path.display());
        }
    }

    let final_state = lifecycle.get_project(project.id).await?;
    debug_assert_eq!(final_state.status, ProjectStatus::Ready);

    Ok(())
}

pub async fn handle_config(args: &ConfigArgs) -> i32 {
    let config = PlatformConfig::default();
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return 1;
    }

    if args.json {
        let rendered = serde_json::json!({
            "provider": format!("{:?}", config.provider),
            "endpoint": config.endpoint,
            "model": config.model,
            "api_key_set": config.api_key.is_some(),
            "storage_path": config.storage_path,
            "build_timeout_secs": config.build_timeout_secs,
            "log_level": config.log_level,
        });
        println!("{}", serde_json::to_string_pretty(&rendered).unwrap());
    } else {
        print!("{}", config);
    }

    0
}
