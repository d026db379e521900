//! Full component inventory of a repository

use crate::client::NexusClient;
use crate::error::Result;
use crate::log::LogSink;
use crate::types::Component;

/// Fetch every component of `repository`
///
/// Pages are followed until the cursor runs out. Any failed page fails the
/// whole fetch; callers never see a partial inventory.
pub async fn fetch_components(
    client: &NexusClient,
    repository: &str,
    log: &dyn LogSink,
) -> Result<Vec<Component>> {
    log.debug(&format!(
        "Listing components of '{}' at {}",
        repository,
        client.base_url()
    ));

    match client.list_components(repository).await {
        Ok(components) => {
            log.info(&format!(
                "Fetched {} components from '{}'",
                components.len(),
                repository
            ));
            Ok(components)
        }
        Err(e) => {
            log.error(&format!(
                "Failed to list components of '{}': {}",
                repository, e
            ));
            Err(e)
        }
    }
}
