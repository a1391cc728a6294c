//! Lifecycle event notifications
//!
//! The lifecycle service publishes progress events through this capability so
//! frontends (WebSocket bridges, CLIs) can observe long-running pipelines.
//! Publishing is fire-and-forget: a sink must never fail the pipeline.

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

pub mod events {
    pub const STATUS_CHANGED: &str = "project:status:changed";
    pub const FILE_GENERATED: &str = "project:file:generated";
    pub const BUILD_STARTED: &str = "project:build:started";
    pub const BUILD_PROGRESS: &str = "project:build:progress";
    pub const BUILD_COMPLETED: &str = "project:build:completed";
    pub const TEST_STARTED: &str = "project:test:started";
    pub const TEST_COMPLETED: &str = "project:test:completed";
}

pub trait NotificationSink: Send + Sync {
    fn publish(&self, project_id: Uuid, event: &str, payload: Value);
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl NotificationSink for NoOpSink {
    fn publish(&self, _project_id: Uuid, _event: &str, _payload: Value) {}
}

/// Emits every event as a structured log line
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn publish(&self, project_id: Uuid, event: &str, payload: Value) {
        info!(project_id = %project_id, event, payload = %payload, "Lifecycle event");
    }
}

/// Records events for test assertions
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: std::sync::Mutex<Vec<(Uuid, String, Value)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(Uuid, String, Value)> {
        self.events.lock().unwrap().clone()
    }

    /// Event names seen so far, in publish order
    pub fn event_names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, name, _)| name.clone())
            .collect()
    }
}

impl NotificationSink for CollectingSink {
    fn publish(&self, project_id: Uuid, event: &str, payload: Value) {
        self.events
            .lock()
            .unwrap()
            .push((project_id, event.to_string(), payload));
    }
}
