//! Blob store compaction after docker cleanups

use crate::client::NexusClient;
use crate::error::Lookup;
use crate::log::LogSink;
use crate::types::Task;

/// Task type of the blob store compaction job
pub const COMPACT_TASK_TYPE: &str = "blobstore.compact";

/// Default name of the compaction task to run
pub const DEFAULT_COMPACT_TASK: &str = "BlobStoreCleanUp";

/// What the compaction trigger did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompactionOutcome {
    /// The task was started
    Triggered { task_id: String },
    /// No task of that name exists
    TaskNotFound,
    /// Listing or starting the task failed
    Failed(String),
    /// Not attempted (maven repositories, dry runs)
    Skipped,
}

/// Find a compaction task by exact name
pub async fn find_task(client: &NexusClient, task_name: &str, log: &dyn LogSink) -> Lookup<Task> {
    let tasks = match client.list_tasks(COMPACT_TASK_TYPE).await {
        Ok(tasks) => tasks,
        Err(e) => {
            log.error(&format!("Failed to list {} tasks: {}", COMPACT_TASK_TYPE, e));
            return Lookup::TransportError(e.to_string());
        }
    };

    match tasks.into_iter().find(|t| t.name == task_name) {
        Some(task) => Lookup::Found(task),
        None => Lookup::NotFound,
    }
}

/// Run the named compaction task if it exists
///
/// A missing task is a no-op, and failures are reported but never escalate.
pub async fn compact(client: &NexusClient, task_name: &str, log: &dyn LogSink) -> CompactionOutcome {
    let task = match find_task(client, task_name, log).await {
        Lookup::Found(task) => task,
        Lookup::NotFound => {
            log.warn(&format!(
                "No {} task named '{}'; skipping compaction",
                COMPACT_TASK_TYPE, task_name
            ));
            return CompactionOutcome::TaskNotFound;
        }
        Lookup::TransportError(reason) => return CompactionOutcome::Failed(reason),
    };

    match client.run_task(&task.id).await {
        Ok(()) => {
            log.info(&format!("Started task '{}' (id {})", task.name, task.id));
            CompactionOutcome::Triggered { task_id: task.id }
        }
        Err(e) => {
            log.error(&format!(
                "Failed to start task '{}' (id {}): {}",
                task.name, task.id, e
            ));
            CompactionOutcome::Failed(e.to_string())
        }
    }
}
