//! Tests for server module

use super::*;
use crate::projects::ProjectsController;

fn controllers() -> Vec<Box<dyn Controller>> {
    vec![Box::new(ProjectsController::new())]
}

#[test]
fn test_default_config() {
    let config = ApiConfig::default();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.host, "0.0.0.0");
}

#[test]
fn test_config_defaults_when_unset() {
    let config = ApiConfig::from_values(None, None).unwrap();
    assert_eq!(config, ApiConfig::default());
}

#[test]
fn test_config_reads_supplied_values() {
    let config =
        ApiConfig::from_values(Some("127.0.0.1".to_string()), Some("9090".to_string())).unwrap();

    assert_eq!(config.listen_host(), "127.0.0.1");
    assert_eq!(config.http_port(), "9090");
}

#[test]
fn test_config_rejects_invalid_port() {
    let err = ApiConfig::from_values(None, Some("eighty".to_string())).unwrap_err();
    assert_eq!(err, ConfigError::InvalidPort("eighty".to_string()));

    let err = ApiConfig::from_values(None, Some("70000".to_string())).unwrap_err();
    assert_eq!(err, ConfigError::InvalidPort("70000".to_string()));
}

#[test]
fn test_server_creation() {
    let server = ApiServer::new(ApiConfig::default(), controllers());

    assert_eq!(server.listen_address(), "0.0.0.0:8080");
    assert!(server.router().is_ok());
}

#[tokio::test]
async fn test_serve_fails_when_port_is_taken() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let config = ApiConfig {
        host: "127.0.0.1".to_string(),
        port,
    };
    let server = ApiServer::new(config, controllers());

    let err = server.serve().await.unwrap_err();
    assert!(err.to_string().contains("Failed to bind"), "{err}");
}

#[tokio::test]
async fn test_serve_fails_on_router_configuration_error() {
    let server = ApiServer::new(
        ApiConfig::default(),
        vec![
            Box::new(ProjectsController::new()) as Box<dyn Controller>,
            Box::new(ProjectsController::new()),
        ],
    );

    let err = server.serve().await.unwrap_err();
    assert!(err.to_string().contains("Failed to build router"), "{err}");
}
