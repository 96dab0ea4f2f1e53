// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Notion pages API.
//!
//! Provides [`NotionClient`], the production [`RecordStore`] implementation.
//! The client performs a single attempt per call and classifies failures as
//! transient or validation; the intake reconciler owns the retry loop and
//! the per-call timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use markdone_core::error::{CreateRecordError, MarkdoneError};
use markdone_core::traits::RecordStore;
use markdone_core::types::RecordId;

use crate::types::{ApiErrorResponse, CreatePageRequest, CreatePageResponse};

/// Base URL for the Notion API.
const API_BASE_URL: &str = "https://api.notion.com";

/// HTTP client for Notion API communication.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    database_id: String,
    base_url: String,
}

impl NotionClient {
    /// Creates a new Notion API client.
    ///
    /// # Arguments
    /// * `api_token` - Notion integration token
    /// * `api_version` - API version string (e.g., "2022-06-28")
    /// * `database_id` - Target database for created task pages
    /// * `request_timeout` - Per-request HTTP timeout
    pub fn new(
        api_token: &str,
        api_version: &str,
        database_id: String,
        request_timeout: Duration,
    ) -> Result<Self, MarkdoneError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_token}"))
            .map_err(|e| MarkdoneError::Config(format!("invalid API token header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert(
            "notion-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                MarkdoneError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|e| MarkdoneError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            database_id,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn create_record(&self, title: &str) -> Result<RecordId, CreateRecordError> {
        let request = CreatePageRequest::new(&self.database_id, title);

        let response = self
            .client
            .post(format!("{}/v1/pages", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| CreateRecordError::Transient {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "create page response received");

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| CreateRecordError::Transient {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
            let page: CreatePageResponse =
                serde_json::from_str(&body).map_err(|e| CreateRecordError::Transient {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                })?;
            return Ok(RecordId(page.id));
        }

        let body = response.text().await.unwrap_or_default();
        let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
            format!("Notion API error ({}): {}", api_err.code, api_err.message)
        } else {
            format!("API returned {status}: {body}")
        };

        if is_transient_status(status) {
            warn!(status = %status, "transient Notion error");
            Err(CreateRecordError::Transient {
                message,
                source: None,
            })
        } else {
            Err(CreateRecordError::Validation { message })
        }
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_status(status: reqwest::StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> NotionClient {
        NotionClient::new(
            "secret_test_token",
            "2022-06-28",
            "db-test".into(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn create_record_returns_page_id() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "object": "page",
            "id": "page-abc-123",
            "created_time": "2026-01-01T00:00:00.000Z"
        });

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let id = client.create_record("Buy milk").await.unwrap();
        assert_eq!(id.0, "page-abc-123");
    }

    #[tokio::test]
    async fn create_record_sends_title_and_headers() {
        let server = MockServer::start().await;

        let expected_body = serde_json::json!({
            "parent": { "database_id": "db-test" },
            "properties": {
                "Name": { "title": [{ "text": { "content": "Write tests" } }] }
            }
        });

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .and(header("authorization", "Bearer secret_test_token"))
            .and(header("notion-version", "2022-06-28"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(&expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "page-1"
            })))
            .mount(&server)
            .await;

        let result = test_client(&server.uri()).create_record("Write tests").await;
        assert!(result.is_ok(), "request should match: {result:?}");
    }

    #[tokio::test]
    async fn validation_error_on_400() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "object": "error",
            "status": 400,
            "code": "validation_error",
            "message": "Name is not a property that exists"
        });

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .create_record("Buy milk")
            .await
            .unwrap_err();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("validation_error"), "got: {err}");
    }

    #[tokio::test]
    async fn transient_error_on_503() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .create_record("Buy milk")
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn transient_error_on_429() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "object": "error",
            "status": 429,
            "code": "rate_limited",
            "message": "Rate limited"
        });

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .create_record("Buy milk")
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("rate_limited"), "got: {err}");
    }

    #[tokio::test]
    async fn connection_failure_is_transient() {
        // Port 1 is never listening.
        let client = test_client("http://127.0.0.1:1");
        let err = client.create_record("Buy milk").await.unwrap_err();
        assert!(err.is_transient());
    }
}
