//! Override source loading: remote list first, local file as the fallback.

mod helpers;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use endpoint_qualifier::error_handling::{ErrorType, ProcessingStats};
use endpoint_qualifier::sources::{load_sources, normalize};
use endpoint_qualifier::Config;
use helpers::write_source;

async fn mount_override(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/diy.txt"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn override_config(dir: &TempDir, server: &MockServer, override_lines: &[&str]) -> Config {
    Config {
        primary: vec![write_source(dir.path(), "ip.txt", &["1.2.3.4"])],
        override_url: Some(format!("{}/diy.txt", server.uri())),
        override_file: Some(write_source(dir.path(), "diy.txt", override_lines)),
        ..Default::default()
    }
}

async fn merged(config: &Config, stats: &ProcessingStats) -> Vec<String> {
    let blobs = load_sources(config, &reqwest::Client::new(), stats).await;
    normalize(&blobs).iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_override_url_takes_precedence_over_file() {
    let dir = TempDir::new().expect("tempdir");
    let server = MockServer::start().await;
    mount_override(
        &server,
        ResponseTemplate::new(200).set_body_string("1.2.3.4:8443\n9.9.9.9\n"),
    )
    .await;
    let config = override_config(&dir, &server, &["1.2.3.4:2053"]);
    let stats = ProcessingStats::new();

    let candidates = merged(&config, &stats).await;

    assert_eq!(candidates, vec!["1.2.3.4:8443", "9.9.9.9:443"]);
    assert_eq!(stats.get_error_count(ErrorType::SourceUnavailable), 0);
}

#[tokio::test]
async fn test_override_url_error_status_falls_back_to_file() {
    let dir = TempDir::new().expect("tempdir");
    let server = MockServer::start().await;
    mount_override(&server, ResponseTemplate::new(404)).await;
    let config = override_config(&dir, &server, &["1.2.3.4:2053"]);
    let stats = ProcessingStats::new();

    let candidates = merged(&config, &stats).await;

    assert_eq!(candidates, vec!["1.2.3.4:2053"]);
    assert_eq!(stats.get_error_count(ErrorType::SourceUnavailable), 1);
}

#[tokio::test]
async fn test_override_url_empty_body_falls_back_to_file() {
    let dir = TempDir::new().expect("tempdir");
    let server = MockServer::start().await;
    mount_override(&server, ResponseTemplate::new(200).set_body_string("# nothing yet\n")).await;
    let config = override_config(&dir, &server, &["1.2.3.4:2053", "8.8.8.8"]);
    let stats = ProcessingStats::new();

    let candidates = merged(&config, &stats).await;

    assert_eq!(candidates, vec!["1.2.3.4:2053", "8.8.8.8:443"]);
}

#[tokio::test]
async fn test_empty_override_url_and_file_are_skipped() {
    let dir = TempDir::new().expect("tempdir");
    let server = MockServer::start().await;
    mount_override(&server, ResponseTemplate::new(200)).await;
    let config = override_config(&dir, &server, &[]);
    let stats = ProcessingStats::new();

    let blobs = load_sources(&config, &reqwest::Client::new(), &stats).await;

    assert_eq!(blobs.len(), 1);
    assert_eq!(
        normalize(&blobs)
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>(),
        vec!["1.2.3.4:443"]
    );
    // One for the URL, one for the file
    assert_eq!(stats.get_error_count(ErrorType::SourceUnavailable), 2);
}
