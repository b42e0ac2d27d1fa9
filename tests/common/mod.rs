//! Common test utilities and fixtures shared by the integration tests.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Once;
use std::time::Duration;

use gnomebot::image_creator::{Credentials, SessionConfig};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initialize tracing for tests
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("gnomebot=debug")
            .with_test_writer()
            .init();
    });
}

/// Creates a new tokio runtime for driving the mock server from sync tests
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("Failed to create test runtime")
}

pub fn credentials() -> Credentials {
    Credentials::new("test-auth-cookie", "test-session-cookie").unwrap()
}

/// Session pointed at the mock server with short poll timings.
pub fn session_for(server: &MockServer) -> SessionConfig {
    SessionConfig::default()
        .with_base_url(server.uri())
        .with_poll_budget(Duration::from_secs(5))
        .with_poll_interval(Duration::from_millis(20))
}

/// Mounts the submit step: create POST redirecting to `job_id`, plus the
/// redirect target itself.
pub async fn mount_submission(server: &MockServer, prompt: &str, job_id: &str) {
    Mock::given(method("POST"))
        .and(path("/images/create"))
        .and(query_param("q", prompt))
        .and(query_param("rt", "4"))
        .and(query_param("FORM", "GENCRE"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            format!("/images/create?q={}&rt=4&FORM=GENCRE&id={}&nfy=1", urlencode(prompt), job_id),
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/images/create"))
        .and(query_param("id", job_id))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>creating</html>"))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a poll endpoint that always answers with `body`.
pub async fn mount_results(server: &MockServer, job_id: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/images/create/async/results/{job_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts image downloads for each `/img/{name}` path.
pub async fn mount_images(server: &MockServer, names: &[&str]) {
    for name in names {
        Mock::given(method("GET"))
            .and(path(format!("/img/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(fixtures::jpeg_bytes(name)))
            .mount(server)
            .await;
    }
}

fn urlencode(value: &str) -> String {
    value.replace(' ', "%20")
}
