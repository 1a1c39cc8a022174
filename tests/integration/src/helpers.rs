//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use bridge_api::{create_app, create_app_state};
use bridge_common::{
    AppConfig, AppSettings, CorsConfig, Environment, RateLimitConfig, ServerConfig, StorageConfig,
    TelegramConfig,
};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server on an ephemeral port
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        // Create app state
        let state = create_app_state(config)?;

        // Build application
        let app = create_app(state);

        // Bind to an ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Create HTTP client
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr: actual_addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.put(&url).json(body).send().await?)
    }

    /// Make a DELETE request with JSON body
    pub async fn delete<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).json(body).send().await?)
    }
}

/// Configuration for a throwaway server: dummy Telegram credentials and a
/// unique session directory. Nothing here talks to Telegram.
pub fn test_config() -> AppConfig {
    let session_dir = std::env::temp_dir()
        .join(format!("telebridge-test-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    AppConfig {
        app: AppSettings {
            name: "telebridge-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        telegram: TelegramConfig {
            api_id: 1,
            api_hash: "test-hash".to_string(),
        },
        storage: StorageConfig { session_dir },
        rate_limit: RateLimitConfig {
            requests_per_second: 100,
            burst: 200,
        },
        cors: CorsConfig {
            allowed_origins: vec![],
        },
    }
}

/// Assert the response status, consuming the response
pub async fn assert_status(response: Response, expected: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("expected {expected}, got {status}: {body}"));
    }
    Ok(())
}

/// Assert status and parse the JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected: StatusCode,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status != expected {
        return Err(anyhow!("expected {expected}, got {status}: {body}"));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Assert status and the `error.code` of the error envelope
pub async fn assert_error_code(
    response: Response,
    expected: StatusCode,
    expected_code: &str,
) -> Result<()> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status != expected {
        return Err(anyhow!("expected {expected}, got {status}: {body}"));
    }
    let json: serde_json::Value = serde_json::from_str(&body)?;
    let code = json["error"]["code"]
        .as_str()
        .ok_or_else(|| anyhow!("missing error.code in: {body}"))?;
    if code != expected_code {
        return Err(anyhow!("expected code {expected_code}, got {code}: {body}"));
    }
    Ok(())
}
