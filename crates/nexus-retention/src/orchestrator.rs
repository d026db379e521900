//! Sequencing of a cleanup run
//!
//! ```text
//! Validate -> ResolveFormat -> { Image | Maven } -> Done
//! ```
//!
//! Validation runs before any I/O. A repository that cannot be resolved, or
//! whose inventory cannot be fetched in full, halts the run before anything is
//! deleted.

use crate::classify::get_format;
use crate::client::NexusClient;
use crate::compaction::{compact, CompactionOutcome};
use crate::credentials::{CredentialHandoff, Credentials};
use crate::deletion::{delete_components, untag_images, DeletionReport};
use crate::error::{Lookup, Result};
use crate::inventory::fetch_components;
use crate::log::LogSink;
use crate::selection::{group_and_select, Selection};
use crate::types::{Component, RepositoryFormat, RetentionPolicy};
use crate::untag::UntagExecutor;
use crate::validate::{parse_keep, validate_host, validate_repository};
use std::sync::Arc;
use url::Url;

/// Raw, unvalidated input for one run
#[derive(Clone)]
pub struct CleanupRequest {
    pub repository: String,
    /// Retention count as typed by the user
    pub keep: String,
    /// Restrict the run to one component name
    pub component: Option<String>,
    pub host: String,
    pub username: String,
    pub password: String,
    /// Compaction task name (docker only)
    pub task: String,
    /// Report the selection without deleting anything
    pub dry_run: bool,
}

impl std::fmt::Debug for CleanupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupRequest")
            .field("repository", &self.repository)
            .field("keep", &self.keep)
            .field("component", &self.component)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("task", &self.task)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Input that passed the validation gate
#[derive(Debug, Clone)]
struct ValidatedRequest {
    repository: String,
    component: Option<String>,
    host: Url,
    policy: RetentionPolicy,
}

impl CleanupRequest {
    fn validate(&self) -> Result<ValidatedRequest> {
        validate_repository(&self.repository)?;
        let policy = parse_keep(&self.keep)?;
        let host = validate_host(&self.host)?;

        Ok(ValidatedRequest {
            repository: self.repository.clone(),
            component: self.component.clone().filter(|c| !c.is_empty()),
            host,
            policy,
        })
    }
}

/// Cleanup strategy picked from the repository format
enum Branch {
    Image,
    Maven,
}

/// Why a run stopped before reaching its branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// Bad input; no request was made
    InvalidInput(String),
    /// The repository does not exist at the host
    RepositoryNotFound(String),
    /// The repositories listing could not be fetched
    RepositoryLookupFailed(String),
    /// The component listing could not be fetched in full
    InventoryUnavailable(String),
    /// The credentials file for the un-tag tool could not be written
    CredentialHandoffFailed(String),
    /// The HTTP client could not be set up
    ClientUnavailable(String),
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaltReason::InvalidInput(m) => write!(f, "invalid input: {}", m),
            HaltReason::RepositoryNotFound(r) => write!(f, "repository '{}' not found", r),
            HaltReason::RepositoryLookupFailed(m) => write!(f, "repository lookup failed: {}", m),
            HaltReason::InventoryUnavailable(m) => write!(f, "inventory unavailable: {}", m),
            HaltReason::CredentialHandoffFailed(m) => {
                write!(f, "credential handoff failed: {}", m)
            }
            HaltReason::ClientUnavailable(m) => write!(f, "HTTP client unavailable: {}", m),
        }
    }
}

/// Per-branch result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchSummary {
    Image {
        /// Names selected for un-tagging
        selected: Vec<String>,
        /// Names the un-tag tool was invoked for (empty on dry runs)
        untagged: Vec<String>,
        compaction: CompactionOutcome,
    },
    Maven {
        /// Component versions selected for deletion
        selected: usize,
        report: DeletionReport,
    },
}

/// Summary of a run that reached its branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub repository: String,
    pub format: RepositoryFormat,
    pub keep: u32,
    pub components_fetched: usize,
    pub dry_run: bool,
    pub branch: BranchSummary,
}

/// Final state of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// The repository format has no cleanup strategy; nothing was done
    Skipped { repository: String, format: String },
    Halted(HaltReason),
}

impl RunOutcome {
    pub fn is_halted(&self) -> bool {
        matches!(self, RunOutcome::Halted(_))
    }
}

/// Runs cleanups with an injected log sink and un-tag capability
pub struct Cleanup {
    log: Arc<dyn LogSink>,
    untagger: Arc<dyn UntagExecutor>,
}

impl Cleanup {
    pub fn new(log: Arc<dyn LogSink>, untagger: Arc<dyn UntagExecutor>) -> Self {
        Self { log, untagger }
    }

    /// Execute one cleanup run
    pub async fn run(&self, request: &CleanupRequest) -> RunOutcome {
        let log = self.log.as_ref();

        let validated = match request.validate() {
            Ok(validated) => validated,
            Err(e) => {
                log.error(&e.to_string());
                return RunOutcome::Halted(HaltReason::InvalidInput(e.to_string()));
            }
        };

        log.info(&format!(
            "Cleaning '{}' at {}: keep {} per component{}{}",
            validated.repository,
            validated.host,
            validated.policy.keep(),
            validated
                .component
                .as_deref()
                .map(|c| format!(", component '{}'", c))
                .unwrap_or_default(),
            if request.dry_run { " (dry run)" } else { "" }
        ));

        let credentials = Credentials::new(&request.username, &request.password);
        let client = match NexusClient::new(validated.host.clone()) {
            Ok(client) => client.with_credentials(credentials.clone()),
            Err(e) => {
                log.error(&e.to_string());
                return RunOutcome::Halted(HaltReason::ClientUnavailable(e.to_string()));
            }
        };

        let format = match get_format(&client, &validated.repository, log).await {
            Lookup::Found(format) => format,
            Lookup::NotFound => {
                return RunOutcome::Halted(HaltReason::RepositoryNotFound(
                    validated.repository.clone(),
                ));
            }
            Lookup::TransportError(reason) => {
                return RunOutcome::Halted(HaltReason::RepositoryLookupFailed(reason));
            }
        };

        let branch = match &format {
            RepositoryFormat::Image => Branch::Image,
            RepositoryFormat::Maven => Branch::Maven,
            RepositoryFormat::Unsupported(tag) => {
                log.warn(&format!(
                    "Repository '{}' has unsupported format '{}'; nothing to do",
                    validated.repository, tag
                ));
                return RunOutcome::Skipped {
                    repository: validated.repository,
                    format: tag.clone(),
                };
            }
        };

        let components = match fetch_components(&client, &validated.repository, log).await {
            Ok(components) => components,
            Err(e) => return RunOutcome::Halted(HaltReason::InventoryUnavailable(e.to_string())),
        };

        let branch = match branch {
            Branch::Image => {
                let result = self
                    .image_branch(
                        &client,
                        &credentials,
                        &validated,
                        &components,
                        &request.task,
                        request.dry_run,
                    )
                    .await;
                match result {
                    Ok(branch) => branch,
                    Err(e) => {
                        log.error(&format!("Failed to write credentials file: {}", e));
                        return RunOutcome::Halted(HaltReason::CredentialHandoffFailed(
                            e.to_string(),
                        ));
                    }
                }
            }
            Branch::Maven => {
                self.maven_branch(&client, &validated, &components, request.dry_run)
                    .await
            }
        };

        RunOutcome::Completed(RunSummary {
            repository: validated.repository,
            format,
            keep: validated.policy.keep(),
            components_fetched: components.len(),
            dry_run: request.dry_run,
            branch,
        })
    }

    async fn image_branch(
        &self,
        client: &NexusClient,
        credentials: &Credentials,
        request: &ValidatedRequest,
        components: &[Component],
        task: &str,
        dry_run: bool,
    ) -> Result<BranchSummary> {
        let log = self.log.as_ref();
        let names = match group_and_select(
            components,
            request.component.as_deref(),
            &RepositoryFormat::Image,
            request.policy,
        ) {
            Some(Selection::Image(names)) => names,
            _ => Default::default(),
        };
        let selected: Vec<String> = names.iter().cloned().collect();

        if names.is_empty() {
            log.info("No matching images; nothing to un-tag");
        }

        if dry_run {
            for name in &names {
                log.info(&format!(
                    "[dry run] would un-tag '{}' keeping {}",
                    name,
                    request.policy.keep()
                ));
            }
            return Ok(BranchSummary::Image {
                selected,
                untagged: Vec::new(),
                compaction: CompactionOutcome::Skipped,
            });
        }

        let untagged = if names.is_empty() {
            Vec::new()
        } else {
            let handoff = CredentialHandoff::write(
                request.host.as_str().trim_end_matches('/'),
                credentials,
                &request.repository,
            )?;
            log.debug(&format!("Wrote credentials to {}", handoff.path()));

            untag_images(
                self.untagger.as_ref(),
                &handoff,
                &names,
                request.policy,
                log,
            )
            .await
        };

        let compaction = compact(client, task, log).await;

        Ok(BranchSummary::Image {
            selected,
            untagged,
            compaction,
        })
    }

    async fn maven_branch(
        &self,
        client: &NexusClient,
        request: &ValidatedRequest,
        components: &[Component],
        dry_run: bool,
    ) -> BranchSummary {
        let log = self.log.as_ref();
        let extras = match group_and_select(
            components,
            request.component.as_deref(),
            &RepositoryFormat::Maven,
            request.policy,
        ) {
            Some(Selection::Maven(extras)) => extras,
            _ => Default::default(),
        };
        let selected = extras.values().map(Vec::len).sum();

        if let Some(component) = &request.component {
            if extras.is_empty() {
                log.warn(&format!(
                    "Component '{}' not found in '{}'",
                    component, request.repository
                ));
            }
        }

        if dry_run {
            for (name, versions) in &extras {
                for entry in versions {
                    log.info(&format!(
                        "[dry run] would delete {} {} (id {})",
                        name, entry.version, entry.id
                    ));
                }
            }
            return BranchSummary::Maven {
                selected,
                report: DeletionReport::default(),
            };
        }

        let report = delete_components(client, &extras, log).await;
        if !report.is_clean() {
            log.warn(&format!(
                "{} of {} deletions failed",
                report.failed.len(),
                report.attempted()
            ));
        }

        BranchSummary::Maven { selected, report }
    }
}
