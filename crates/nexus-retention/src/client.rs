//! HTTP client for the Nexus REST API (`service/rest/v1`)

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::types::{Component, Page, Repository, Task};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use url::Url;

const API_PREFIX: &[&str] = &["service", "rest", "v1"];

/// Query parameter carrying the pagination cursor
const CONTINUATION_PARAM: &str = "continuationToken";

/// Client for a single repository manager host
pub struct NexusClient {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl NexusClient {
    /// Create a new client for a validated host URL
    pub fn new(base_url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nexus-cleanup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network(base_url.as_str(), e))?;

        Ok(Self {
            client,
            base_url,
            credentials: None,
        })
    }

    /// Attach credentials sent with every request
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// List every repository visible at the host
    pub async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let url = self.endpoint(&["repositories"])?;
        let response = self
            .authorized(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|e| Error::network(url.as_str(), e))?;
        let response = ensure_success(&url, response).await?;

        response
            .json()
            .await
            .map_err(|e| Error::network(url.as_str(), e))
    }

    /// List all components of a repository, following the cursor to the end
    pub async fn list_components(&self, repository: &str) -> Result<Vec<Component>> {
        self.fetch_all_pages(&["components"], &[("repository", repository)])
            .await
    }

    /// List all tasks of the given type, following the cursor to the end
    pub async fn list_tasks(&self, task_type: &str) -> Result<Vec<Task>> {
        self.fetch_all_pages(&["tasks"], &[("type", task_type)])
            .await
    }

    /// Delete a component by id
    ///
    /// Credentials, when configured, travel in the URL authority.
    pub async fn delete_component(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["components", id])?;
        let mut target = url.clone();
        if let Some(credentials) = &self.credentials {
            // Only fails for URLs without a host, which validation rules out
            let _ = target.set_username(credentials.username());
            let _ = target.set_password(Some(credentials.password()));
        }

        let response = self
            .client
            .delete(target)
            .send()
            .await
            .map_err(|e| Error::network(url.as_str(), e.without_url()))?;
        ensure_success(&url, response).await?;
        Ok(())
    }

    /// Trigger a task run by id
    pub async fn run_task(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["tasks", id, "run"])?;
        let response = self
            .authorized(self.client.post(url.clone()))
            .send()
            .await
            .map_err(|e| Error::network(url.as_str(), e))?;
        ensure_success(&url, response).await?;
        Ok(())
    }

    /// Fetch every page of a cursor-paginated listing
    ///
    /// All-or-nothing: the first failing page discards everything gathered so
    /// far, so a truncated listing is never returned as complete. A cursor
    /// the server already sent fails the listing instead of looping.
    async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let endpoint = self.endpoint(segments)?;
        let mut items = Vec::new();
        let mut token: Option<String> = None;
        let mut seen = HashSet::new();

        loop {
            let mut url = endpoint.clone();
            {
                let mut pairs = url.query_pairs_mut();
                pairs.extend_pairs(query);
                if let Some(token) = &token {
                    pairs.append_pair(CONTINUATION_PARAM, token);
                }
            }

            let response = self
                .authorized(self.client.get(url.clone()))
                .send()
                .await
                .map_err(|e| Error::network(url.as_str(), e))?;
            let response = ensure_success(&url, response).await?;

            let page: Page<T> = response
                .json()
                .await
                .map_err(|e| Error::network(url.as_str(), e))?;

            token = page.next_token().map(str::to_string);
            items.extend(page.items);

            let Some(next) = &token else {
                break;
            };
            if !seen.insert(next.clone()) {
                return Err(Error::RepeatedCursor {
                    url: endpoint.to_string(),
                    token: next.clone(),
                });
            }
        }

        Ok(items)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                request.basic_auth(credentials.username(), Some(credentials.password()))
            }
            None => request,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::validation(
                    "host",
                    format!("{} cannot be used as a base URL", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(API_PREFIX.iter().copied().chain(segments.iter().copied()));
        Ok(url)
    }
}

/// Turn a non-2xx response into [`Error::Status`]
async fn ensure_success(url: &Url, response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Status {
        url: url.to_string(),
        status,
        body: if body.is_empty() {
            "(no response body)".to_string()
        } else {
            body
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(host: &str) -> NexusClient {
        NexusClient::new(Url::parse(host).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_at_root() {
        let url = client("http://nexus.local:8081")
            .endpoint(&["components"])
            .unwrap();
        assert_eq!(url.as_str(), "http://nexus.local:8081/service/rest/v1/components");
    }

    #[test]
    fn test_endpoint_under_context_path() {
        let with_slash = client("http://nexus.local/nexus/")
            .endpoint(&["tasks", "abc", "run"])
            .unwrap();
        assert_eq!(
            with_slash.as_str(),
            "http://nexus.local/nexus/service/rest/v1/tasks/abc/run"
        );

        let without_slash = client("http://nexus.local/nexus")
            .endpoint(&["repositories"])
            .unwrap();
        assert_eq!(
            without_slash.as_str(),
            "http://nexus.local/nexus/service/rest/v1/repositories"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let url = client("http://nexus.local")
            .endpoint(&["components", "a/b c"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://nexus.local/service/rest/v1/components/a%2Fb%20c"
        );
    }

    #[test]
    fn test_with_credentials() {
        let c = client("http://nexus.local");
        assert!(c.credentials().is_none());
        let c = c.with_credentials(Credentials::new("admin", "admin123"));
        assert_eq!(c.credentials().unwrap().username(), "admin");
    }
}
