use super::normalize::{normalize, RawClassification};
use super::prompt::{system_prompt, user_prompt};
use super::{
    ClassificationFailure, ClassificationRequest, Classifier, ClassifyError, Outcome, RetryPolicy,
};
use crate::config::ClassifierConfig;
use crate::constants::API_KEY_ENV;
use crate::errors::{ConfigError, Error, Result};
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use url::Url;

const TEMPERATURE: f32 = 0.2;
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// A classifier backed by an OpenAI-compatible chat completions endpoint.
///
/// One instance is shared by every planner worker; the underlying HTTP client
/// pools connections.
pub struct OpenAiClassifier {
    client: Client,
    endpoint: Url,
    model: String,
    categories: Vec<String>,
    system_prompt: String,
    retry: RetryPolicy,
}

impl OpenAiClassifier {
    /// Creates the classifier from validated settings.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingCredential` when no API key is configured and
    /// `Error::HttpClient` if the HTTP client cannot be built.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingCredential(API_KEY_ENV.to_string()))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
            ConfigError::InvalidValue {
                option: API_KEY_ENV.to_string(),
                reason: "contains characters that are not allowed in an HTTP header".to_string(),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("docsort/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout);
        // Local model servers are reached directly, never through a proxy.
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(Error::HttpClient)?;

        let endpoint = config
            .base_url
            .join("chat/completions")
            .map_err(|e| ConfigError::InvalidValue {
                option: "base URL".to_string(),
                reason: e.to_string(),
            })?;

        info!(
            "Classifier ready: model '{}' at {}",
            config.model,
            endpoint.as_str()
        );

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            system_prompt: system_prompt(&config.categories),
            categories: config.categories.clone(),
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                ..RetryPolicy::default()
            },
        })
    }

    /// Replaces the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn request_once(
        &self,
        prompt: &str,
    ) -> std::result::Result<RawClassification, ClassifyError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self.client.post(self.endpoint.clone()).json(&body).send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(ClassifyError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let chat: ChatResponse = serde_json::from_str(&text)?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ClassifyError::EmptyResponse)?;

        Ok(serde_json::from_str(strip_code_fence(&content))?)
    }
}

impl Classifier for OpenAiClassifier {
    fn classify(&self, request: &ClassificationRequest<'_>) -> Outcome {
        debug!("Classifying '{}' with model '{}'", request.filename, self.model);
        let prompt = user_prompt(request);
        match self.retry.run(request.filename, || self.request_once(&prompt)) {
            Ok(raw) => {
                let classification = normalize(raw, request, &self.categories);
                info!(
                    "Classified '{}' as '{}'",
                    request.filename, classification.category
                );
                Outcome::Classified(classification)
            }
            Err(e) => Outcome::Failed(ClassificationFailure::new(request.filename, e)),
        }
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Removes a Markdown code fence some models put around JSON.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => rest
            .trim_start_matches("json")
            .trim_end()
            .trim_end_matches("```")
            .trim(),
        None => trimmed,
    }
}
