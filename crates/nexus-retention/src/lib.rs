//! Retention cleanup for Nexus repositories
//!
//! This crate provides the engine behind `nexus-cleanup`:
//! - Paging through a repository's full component inventory
//! - Looking up a repository's format (`docker` or `maven2`)
//! - Grouping components by name and selecting versions beyond a keep count
//! - Best-effort deletion (maven) or un-tagging via nexus-cli (docker)
//! - Triggering blob store compaction after docker cleanups
//!
//! # Example
//!
//! ```no_run
//! use nexus_retention::{Cleanup, CleanupRequest, ProcessUntagger, TracingSink};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let log = Arc::new(TracingSink::default());
//!     let untagger = Arc::new(ProcessUntagger::from_tool("nexus-cli", log.clone()));
//!     let cleanup = Cleanup::new(log, untagger);
//!
//!     let outcome = cleanup
//!         .run(&CleanupRequest {
//!             repository: "maven-releases".to_string(),
//!             keep: "5".to_string(),
//!             component: None,
//!             host: "http://nexus.local:8081".to_string(),
//!             username: "admin".to_string(),
//!             password: "admin123".to_string(),
//!             task: "BlobStoreCleanUp".to_string(),
//!             dry_run: true,
//!         })
//!         .await;
//!
//!     println!("{:?}", outcome);
//! }
//! ```

pub mod classify;
pub mod client;
pub mod compaction;
pub mod config;
pub mod credentials;
pub mod deletion;
pub mod error;
pub mod inventory;
pub mod log;
pub mod orchestrator;
pub mod selection;
pub mod types;
pub mod untag;
pub mod validate;

// Re-export main types for convenience
pub use client::NexusClient;
pub use compaction::CompactionOutcome;
pub use config::CleanupSettings;
pub use credentials::{CredentialHandoff, Credentials};
pub use deletion::DeletionReport;
pub use error::{Error, Lookup, Result};
pub use log::{Level, LogSink, MemorySink, NoOpSink, TracingSink};
pub use orchestrator::{
    BranchSummary, Cleanup, CleanupRequest, HaltReason, RunOutcome, RunSummary,
};
pub use selection::{group_and_select, select_extra, ComponentGroups, Selection};
pub use types::{
    Component, ComponentVersion, Repository, RepositoryFormat, RetentionPolicy, Task, MAX_KEEP,
};
pub use untag::{ProcessUntagger, UntagExecutor};
