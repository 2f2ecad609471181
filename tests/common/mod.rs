//! Common test utilities for integration tests
//!
//! Shared fixtures used across multiple integration test files.

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

use taric_official::domain::models::{Config, RemoteConfig};

/// Create a temporary test database
///
/// Returns the path to a SQLite database file in a temporary directory.
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("taric_live.db");
    (dir, db_path)
}

/// Configuration pointing at a mock endpoint and a temporary database.
pub fn test_config(endpoint: &str, db_path: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.database.path = db_path.to_string_lossy().into_owned();
    config.remote = RemoteConfig {
        endpoint: endpoint.to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
        soap_action: None,
    };
    config
}

/// Minimal SOAP answer as returned by the goods description service.
pub fn soap_body(description: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>
    <getGoodsDescriptionResponse>
      <description>{description}</description>
    </getGoodsDescriptionResponse>
  </soapenv:Body>
</soapenv:Envelope>"#
    )
}

/// Initializes a test-writer tracing subscriber; safe to call repeatedly.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Accepts TCP connections and never answers them.
///
/// Returns the base URL. The listener stops with the test runtime.
pub async fn silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    format!("http://{addr}")
}
