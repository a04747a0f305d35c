//! Mock HTTP backend for testing the REST capability implementation
//! without a real remote service.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockBackendServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockBackendServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    fn sentinel_route(project_id: &str) -> String {
        format!("/v1/projects/{}/system/connection_test", project_id)
    }

    /// Sentinel record present and readable
    pub async fn mock_sentinel_ok(&self, project_id: &str) {
        Mock::given(method("GET"))
            .and(path(Self::sentinel_route(project_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "client": "test",
                "timestamp": "2026-01-01T00:00:00Z"
            })))
            .mount(&self.server)
            .await;
    }

    /// Sentinel record missing (backend answers, record absent)
    pub async fn mock_sentinel_missing(&self, project_id: &str) {
        Mock::given(method("GET"))
            .and(path(Self::sentinel_route(project_id)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.server)
            .await;

        Mock::given(method("PATCH"))
            .and(path(Self::sentinel_route(project_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&self.server)
            .await;
    }

    /// Backend erroring on every sentinel read, limited to `times` requests
    /// so later mounts can take over
    pub async fn mock_sentinel_failing(&self, project_id: &str, times: u64) {
        Mock::given(method("GET"))
            .and(path(Self::sentinel_route(project_id)))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_sentinel_write_ok(&self, project_id: &str) {
        Mock::given(method("PATCH"))
            .and(path(Self::sentinel_route(project_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&self.server)
            .await;
    }
}
