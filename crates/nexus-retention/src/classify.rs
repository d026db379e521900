//! Repository format lookup

use crate::client::NexusClient;
use crate::error::Lookup;
use crate::log::LogSink;
use crate::types::RepositoryFormat;

/// Look up the declared format of `repository` by exact name
pub async fn get_format(
    client: &NexusClient,
    repository: &str,
    log: &dyn LogSink,
) -> Lookup<RepositoryFormat> {
    let repositories = match client.list_repositories().await {
        Ok(repositories) => repositories,
        Err(e) => {
            log.error(&format!("Failed to list repositories: {}", e));
            return Lookup::TransportError(e.to_string());
        }
    };

    log.debug(&format!(
        "Scanning {} repositories for '{}'",
        repositories.len(),
        repository
    ));

    match repositories.into_iter().find(|r| r.name == repository) {
        Some(found) => {
            let format = RepositoryFormat::from_tag(&found.format);
            log.info(&format!("Repository '{}' has format '{}'", repository, format));
            Lookup::Found(format)
        }
        None => {
            log.error(&format!("Repository '{}' not found", repository));
            Lookup::NotFound
        }
    }
}
