//! Mock server helpers for the Nexus REST API
//!
//! Components and tasks are paged with `continuationToken`; page `i` is
//! requested with token `token-i` and the first page carries no token.

use nexus_retention::{Credentials, NexusClient};
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{
    header, method, path, path_regex, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

pub const REPOSITORIES_PATH: &str = "/service/rest/v1/repositories";
pub const COMPONENTS_PATH: &str = "/service/rest/v1/components";
pub const TASKS_PATH: &str = "/service/rest/v1/tasks";

/// Client for the mock server carrying the test credentials
pub fn client_for(server: &MockServer) -> NexusClient {
    NexusClient::new(Url::parse(&server.uri()).unwrap())
        .unwrap()
        .with_credentials(Credentials::new(USERNAME, PASSWORD))
}

/// JSON for one component as Nexus lists it
pub fn component_json(id: &str, name: &str, version: &str) -> Value {
    json!({
        "id": id,
        "repository": MAVEN_REPOSITORY,
        "format": "maven2",
        "group": "com.example",
        "name": name,
        "version": version,
        "assets": []
    })
}

/// `count` components of `name` with ids `{prefix}-{n}` and versions `1.{n}`
pub fn numbered_components(name: &str, prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|n| component_json(&format!("{prefix}-{n}"), name, &format!("1.{n}")))
        .collect()
}

fn page_body(items: Vec<Value>, index: usize, total: usize) -> Value {
    let token = if index + 1 < total {
        Value::String(format!("token-{}", index + 1))
    } else {
        Value::Null
    };
    json!({ "items": items, "continuationToken": token })
}

/// Serve the repositories listing
pub async fn mock_repositories(server: &MockServer, repositories: &[(&str, &str)]) {
    let body: Vec<Value> = repositories
        .iter()
        .map(|(name, format)| {
            json!({
                "name": name,
                "format": format,
                "type": "hosted",
                "url": format!("{}/repository/{}", server.uri(), name)
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(REPOSITORIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Make the repositories listing fail with `status`
pub async fn mock_repositories_failure(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(REPOSITORIES_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve `pages` of components for `repository`
pub async fn mock_component_pages(server: &MockServer, repository: &str, pages: Vec<Vec<Value>>) {
    let total = pages.len();
    for (index, items) in pages.into_iter().enumerate() {
        let mock = Mock::given(method("GET"))
            .and(path(COMPONENTS_PATH))
            .and(query_param("repository", repository));
        let mock = if index == 0 {
            mock.and(query_param_is_missing("continuationToken"))
        } else {
            mock.and(query_param("continuationToken", format!("token-{index}")))
        };

        mock.respond_with(ResponseTemplate::new(200).set_body_json(page_body(items, index, total)))
            .expect(1)
            .mount(server)
            .await;
    }
}

/// Make the component page requested with `token` fail with `status`
pub async fn mock_component_page_failure(
    server: &MockServer,
    repository: &str,
    token: &str,
    status: u16,
) {
    Mock::given(method("GET"))
        .and(path(COMPONENTS_PATH))
        .and(query_param("repository", repository))
        .and(query_param("continuationToken", token))
        .respond_with(ResponseTemplate::new(status).set_body_string("boom"))
        .mount(server)
        .await;
}

/// Guard: the components listing must never be requested
pub async fn forbid_component_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(COMPONENTS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Expect exactly `times` authenticated deletes of `id`, answering `status`
pub async fn mock_delete(server: &MockServer, id: &str, status: u16, times: u64) {
    Mock::given(method("DELETE"))
        .and(path(format!("{COMPONENTS_PATH}/{id}")))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

/// Guard: no delete may be issued at all
pub async fn forbid_deletes(server: &MockServer) {
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(server)
        .await;
}

/// Serve `pages` of `blobstore.compact` tasks given as `(id, name)`
pub async fn mock_task_pages(server: &MockServer, pages: Vec<Vec<(&str, &str)>>) {
    let total = pages.len();
    for (index, tasks) in pages.into_iter().enumerate() {
        let items: Vec<Value> = tasks
            .into_iter()
            .map(|(id, name)| {
                json!({
                    "id": id,
                    "name": name,
                    "type": "blobstore.compact",
                    "message": null,
                    "currentState": "WAITING"
                })
            })
            .collect();

        let mock = Mock::given(method("GET"))
            .and(path(TASKS_PATH))
            .and(query_param("type", "blobstore.compact"));
        let mock = if index == 0 {
            mock.and(query_param_is_missing("continuationToken"))
        } else {
            mock.and(query_param("continuationToken", format!("token-{index}")))
        };

        mock.respond_with(ResponseTemplate::new(200).set_body_json(page_body(items, index, total)))
            .mount(server)
            .await;
    }
}

/// Expect exactly `times` runs of task `id`, answering `status`
pub async fn mock_run_task(server: &MockServer, id: &str, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("{TASKS_PATH}/{id}/run")))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

/// Guard: no task endpoint may be touched
pub async fn forbid_tasks(server: &MockServer) {
    Mock::given(path_regex(format!("^{TASKS_PATH}")))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
