//! HTTP client wrapper - executes API calls and judges their envelopes

use std::time::{Duration, Instant};

use crate::error::ApiError;
use crate::network::api::{ApiCall, ApiReply, HttpMethod};

/// Client for the monitoring API rooted at a single base URL
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(create_client(timeout), base_url)
    }

    /// Reuse an existing [`reqwest::Client`]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request for a call without sending it
    pub fn build(&self, call: &ApiCall) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, call.path());

        let req_builder = match call.method() {
            HttpMethod::GET => self.client.get(&url).query(&call.query()),
            HttpMethod::POST => self.client.post(&url),
        };

        // Content-Type is set even on GET, matching what the server expects.
        let req_builder = req_builder.header("Content-Type", "application/json");

        match call.body() {
            Some(body) => req_builder.json(&body),
            None => req_builder,
        }
    }

    /// Execute a call. Transport, decode and rejection errors all collapse
    /// to [`ApiReply::Failure`] after being logged.
    pub async fn execute(&self, call: &ApiCall) -> ApiReply {
        let start = Instant::now();
        match self.try_execute(call).await {
            Ok(reply) => {
                tracing::debug!(
                    action = call.name(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "API call succeeded"
                );
                reply
            }
            Err(e) => {
                let reason = match &e {
                    ApiError::Transport(err) if err.is_timeout() => "timed out",
                    ApiError::Transport(err) if err.is_connect() => "connection failed",
                    ApiError::Transport(_) => "request failed",
                    ApiError::Decode(_) => "malformed response",
                    ApiError::Rejected { .. } => "rejected",
                };
                tracing::warn!(action = call.name(), reason, error = %e, "API call failed");
                ApiReply::Failure
            }
        }
    }

    async fn try_execute(&self, call: &ApiCall) -> Result<ApiReply, ApiError> {
        let resp = self.build(call).send().await?;
        let body = resp.text().await?;
        call.decode(&body)
    }
}

/// Create an HTTP client with default configuration
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:5005/", Duration::from_secs(5))
    }

    fn body_json(req: &reqwest::Request) -> Value {
        let bytes = req.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "http://localhost:5005");
    }

    #[test]
    fn test_login_request() {
        let call = ApiCall::Login {
            username: "anna".into(),
            password: "hunter2".into(),
        };
        let req = client().build(&call).build().unwrap();

        assert_eq!(req.method(), reqwest::Method::POST);
        assert_eq!(req.url().as_str(), "http://localhost:5005/login");
        assert_eq!(req.headers()["content-type"], "application/json");
        assert_eq!(body_json(&req), json!({ "username": "anna", "password": "hunter2" }));
    }

    #[test]
    fn test_scan_status_request_uses_query() {
        let call = ApiCall::GetScanStatus {
            device_id: "pi 42".into(),
        };
        let req = client().build(&call).build().unwrap();

        assert_eq!(req.method(), reqwest::Method::GET);
        assert_eq!(req.url().path(), "/get_scan_status");
        assert_eq!(req.url().query(), Some("device_id=pi+42"));
        assert!(req.body().is_none());
    }

    #[test]
    fn test_send_response_request() {
        let call = ApiCall::SendResponse {
            device_id: "pi-42".into(),
            youtube_url: "https://youtu.be/x".into(),
        };
        let req = client().build(&call).build().unwrap();
        assert_eq!(req.url().path(), "/send_response");
        assert_eq!(
            body_json(&req),
            json!({ "device_id": "pi-42", "youtube_url": "https://youtu.be/x" })
        );
    }
}
