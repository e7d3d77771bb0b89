//! Cloudflare Workers AI client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::AiProvider;
use crate::config::CloudflareConfig;
use crate::error::{Error, Result};

const API_BASE: &str = "https://api.cloudflare.com/client/v4";

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    #[serde(default)]
    success: bool,
    result: Option<RunResult>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct RunResult {
    response: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

pub struct CloudflareClient {
    client: Client,
    base_url: String,
    account_id: String,
    api_token: String,
    model: String,
}

impl CloudflareClient {
    pub fn new(config: &CloudflareConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: API_BASE.to_string(),
            account_id: config.account_id.clone(),
            api_token: config.api_token.clone(),
            model: config.model().to_string(),
        })
    }

    /// Point the client at another API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url.trim_end_matches('/'),
            self.account_id,
            self.model
        )
    }
}

fn error_detail(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "request was not successful".to_string();
    }
    errors
        .iter()
        .map(|e| match e.code {
            Some(code) => format!("{} ({})", e.message, code),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Pull the generated text out of a decoded API response.
fn extract_text(response: RunResponse) -> Result<String> {
    if !response.success {
        return Err(Error::Provider(format!(
            "Cloudflare AI: {}",
            error_detail(&response.errors)
        )));
    }

    match response.result.and_then(|r| r.response) {
        Some(Value::String(text)) => Ok(text),
        // Some models return the JSON object already decoded.
        Some(value @ Value::Object(_)) => Ok(value.to_string()),
        Some(other) => Err(Error::Provider(format!(
            "Cloudflare AI returned an unexpected response: {other}"
        ))),
        None => Err(Error::Provider(
            "Cloudflare AI returned no response text".to_string(),
        )),
    }
}

#[async_trait]
impl AiProvider for CloudflareClient {
    fn name(&self) -> &'static str {
        "Cloudflare AI"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = RunRequest {
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
        };

        debug!("Calling Cloudflare AI model {}", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let detail = match serde_json::from_str::<RunResponse>(&body) {
                Ok(decoded) if !decoded.errors.is_empty() => error_detail(&decoded.errors),
                _ => body,
            };
            return Err(Error::Provider(format!(
                "Cloudflare AI request failed with HTTP {status}: {detail}"
            )));
        }

        let decoded: RunResponse = serde_json::from_str(&body)?;
        extract_text(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> RunResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_endpoint() {
        let client = CloudflareClient::new(&CloudflareConfig {
            account_id: "abc123".to_string(),
            api_token: "t".to_string(),
            model: None,
        })
        .unwrap()
        .with_base_url("http://localhost:8787/");

        assert_eq!(
            client.endpoint(),
            "http://localhost:8787/accounts/abc123/ai/run/@cf/meta/llama-3.3-70b-instruct-fp8-fast"
        );
    }

    #[test]
    fn test_extract_text_string() {
        let response = decode(json!({
            "success": true,
            "result": { "response": "{\"commands\": [], \"explanation\": \"x\"}" },
            "errors": []
        }));
        assert_eq!(
            extract_text(response).unwrap(),
            "{\"commands\": [], \"explanation\": \"x\"}"
        );
    }

    #[test]
    fn test_extract_text_object() {
        let response = decode(json!({
            "success": true,
            "result": { "response": { "commands": ["magick a.png a.jpg"], "explanation": "x" } }
        }));
        let text = extract_text(response).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["commands"][0], "magick a.png a.jpg");
    }

    #[test]
    fn test_extract_text_errors() {
        let response = decode(json!({
            "success": false,
            "result": null,
            "errors": [{ "code": 10000, "message": "Authentication error" }]
        }));
        let err = extract_text(response).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Provider error: Cloudflare AI: Authentication error (10000)"
        );
    }

    #[test]
    fn test_extract_text_missing_response() {
        let response = decode(json!({ "success": true, "result": {} }));
        assert!(matches!(extract_text(response), Err(Error::Provider(_))));
    }

    #[test]
    fn test_request_serialization() {
        let request = RunRequest {
            messages: vec![
                Message {
                    role: "system",
                    content: "rules",
                },
                Message {
                    role: "user",
                    content: "convert a.mov",
                },
            ],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "messages": [
                { "role": "system", "content": "rules" },
                { "role": "user", "content": "convert a.mov" }
            ]})
        );
    }
}
