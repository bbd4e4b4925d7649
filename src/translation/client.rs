use futures_util::Stream;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::prompt::Prompt;
use super::retry::{RetryPolicy, with_retries};
use super::sse_parser::sse_to_text_stream;
use crate::config::EngineConfig;
use crate::error::{CompletionError, ConfigError};

/// Text increments of one completion, in arrival order.
///
/// Finite and consumed once; there is no way to restart it.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, CompletionError>> + Send>>;

/// A backend that turns a prompt into a streamed completion.
pub trait Completion {
    fn stream(
        &self,
        prompt: &Prompt,
    ) -> impl Future<Output = Result<TokenStream, CompletionError>> + Send;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for an OpenAI-compatible chat completion endpoint.
///
/// Every call is a fresh request; nothing is cached.
pub struct CompletionClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    retry: RetryPolicy,
}

impl CompletionClient {
    /// Builds a client from the engine configuration.
    ///
    /// Fails if the API key or model is missing, or the endpoint is not a
    /// valid URL.
    pub fn configure(config: &EngineConfig) -> Result<Self, ConfigError> {
        let api_key = non_blank(config.api_key.as_deref()).ok_or_else(|| {
            ConfigError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            }
        })?;
        let model = non_blank(config.model.as_deref()).ok_or(ConfigError::MissingModel)?;
        let url = completions_url(&config.endpoint)?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "http client".to_string(),
                value: e.to_string(),
            })?;

        Ok(Self {
            client,
            url,
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: config.temperature,
            retry: RetryPolicy::new(config.max_retries),
        })
    }

    /// Overrides the first backoff delay (later delays double from it).
    #[must_use]
    pub fn with_retry_delay(mut self, initial_delay: Duration) -> Self {
        self.retry.initial_delay = initial_delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self, request: &ChatCompletionRequest<'_>) -> Result<Response, CompletionError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| CompletionError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        Err(CompletionError::Status {
            status: status.as_u16(),
            body: error_message(&body),
            retry_after,
        })
    }
}

impl Completion for CompletionClient {
    async fn stream(&self, prompt: &Prompt) -> Result<TokenStream, CompletionError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: &prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            stream: true,
        };

        tracing::debug!(url = %self.url, model = %self.model, "requesting completion");

        let request = &request;
        let response = with_retries(&self.retry, move |_| self.send(request)).await?;

        Ok(Box::pin(sse_to_text_stream(response.bytes_stream())))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the chat completions URL for an endpoint.
///
/// Accepts both a bare host (`https://api.openai.com`) and a base URL that
/// already ends in `/v1`.
fn completions_url(endpoint: &str) -> Result<String, ConfigError> {
    let base = endpoint.trim().trim_end_matches('/');
    let url = if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}/v1/chat/completions")
    };

    match Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url),
        _ => Err(ConfigError::Invalid {
            key: "endpoint".to_string(),
            value: endpoint.to_string(),
        }),
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Extracts the message from an OpenAI-style error body, or returns the
/// body as-is when it is not one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| body.trim().to_string(), |r| r.error.message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn configured() -> EngineConfig {
        EngineConfig {
            api_key: Some("sk-test".to_string()),
            model: Some("gpt-4o-mini".to_string()),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_configure_requires_api_key() {
        let config = EngineConfig {
            api_key: None,
            ..configured()
        };

        let err = CompletionClient::configure(&config).err().unwrap();
        assert_eq!(
            err,
            ConfigError::MissingApiKey {
                env_var: "OPENAI_API_KEY".to_string()
            }
        );
    }

    #[test]
    fn test_configure_rejects_blank_api_key() {
        let config = EngineConfig {
            api_key: Some("   ".to_string()),
            ..configured()
        };

        assert!(matches!(
            CompletionClient::configure(&config),
            Err(ConfigError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn test_configure_requires_model() {
        let config = EngineConfig {
            model: Some(String::new()),
            ..configured()
        };

        assert!(matches!(
            CompletionClient::configure(&config),
            Err(ConfigError::MissingModel)
        ));
    }

    #[test]
    fn test_configure_rejects_invalid_endpoint() {
        let config = EngineConfig {
            endpoint: "not a url".to_string(),
            ..configured()
        };

        assert!(matches!(
            CompletionClient::configure(&config),
            Err(ConfigError::Invalid { key, .. }) if key == "endpoint"
        ));
    }

    #[test]
    fn test_configure_success() {
        let client = CompletionClient::configure(&configured()).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_completions_url_variants() {
        assert_eq!(
            completions_url("http://localhost:11434").unwrap(),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:11434/").unwrap(),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            completions_url("https://api.openai.com/v1").unwrap(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert!(completions_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: [
                Message {
                    role: "system",
                    content: "You are a translator.",
                },
                Message {
                    role: "user",
                    content: "Hello",
                },
            ],
            temperature: None,
            stream: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hello");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_request_serialization_with_temperature() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: [
                Message {
                    role: "system",
                    content: "",
                },
                Message {
                    role: "user",
                    content: "",
                },
            ],
            temperature: Some(0.5),
            stream: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
