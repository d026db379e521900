//! Best-effort deletion of selected components

use crate::client::NexusClient;
use crate::credentials::CredentialHandoff;
use crate::error::Error;
use crate::log::LogSink;
use crate::selection::ComponentGroups;
use crate::types::RetentionPolicy;
use crate::untag::UntagExecutor;
use std::collections::BTreeSet;

/// What a maven deletion batch did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    /// Ids deleted successfully, in the order they were attempted
    pub deleted: Vec<String>,
    /// Ids that failed, with the reason
    pub failed: Vec<(String, String)>,
}

impl DeletionReport {
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete every selected version by id
///
/// A failed delete is logged and the batch moves on; nothing is retried and
/// nothing already deleted is rolled back. Within a group, deletes follow the
/// selection order (oldest first).
pub async fn delete_components(
    client: &NexusClient,
    extras: &ComponentGroups,
    log: &dyn LogSink,
) -> DeletionReport {
    let mut report = DeletionReport::default();

    for (name, versions) in extras {
        if versions.is_empty() {
            log.debug(&format!("Nothing to delete for '{}'", name));
            continue;
        }

        log.info(&format!(
            "Deleting {} old version(s) of '{}'",
            versions.len(),
            name
        ));

        for entry in versions {
            match client.delete_component(&entry.id).await {
                Ok(()) => {
                    log.info(&format!(
                        "Deleted {} {} (id {})",
                        name, entry.version, entry.id
                    ));
                    report.deleted.push(entry.id.clone());
                }
                Err(e) => {
                    let reason = e.to_string();
                    let err = Error::deletion(&entry.id, reason.as_str());
                    log.error(&format!("{} ({} {})", err, name, entry.version));
                    report.failed.push((entry.id.clone(), reason));
                }
            }
        }
    }

    report
}

/// Hand each selected image name to the un-tag tool
///
/// The tool's outcome is not observed here. Returns the names it was invoked
/// for.
pub async fn untag_images(
    untagger: &dyn UntagExecutor,
    handoff: &CredentialHandoff,
    names: &BTreeSet<String>,
    policy: RetentionPolicy,
    log: &dyn LogSink,
) -> Vec<String> {
    let mut invoked = Vec::with_capacity(names.len());

    for name in names {
        log.info(&format!(
            "Un-tagging '{}', keeping the newest {}",
            name,
            policy.keep()
        ));
        untagger
            .untag(name, policy.keep(), handoff.working_dir())
            .await;
        invoked.push(name.clone());
    }

    invoked
}
