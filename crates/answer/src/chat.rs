//! Chat-completions client behind the [`Generator`] trait.
//!
//! Talks to an Azure-OpenAI-style deployment endpoint:
//! `POST {endpoint}/openai/deployments/{name}/chat/completions` with an
//! `api-key` header. Low temperature, bounded output length, explicit
//! request timeout.
//!
//! All failure modes map to `None` for the caller — the answer pipeline
//! degrades to a lower tier instead of failing the request. The specific
//! reason (transport, filter, empty) is logged.

use async_trait::async_trait;
use baubot_core::Generator;
use baubot_core::error::GenerationError;
use serde::Deserialize;
use tracing::{debug, warn};

/// Fixed persona. The assistant answers only from the supplied source
/// material, in the language of the question, citing source labels.
const SYSTEM_PROMPT: &str = "Du bist ein technischer Support-Assistent für Baumaschinen-Handbücher. \
    Beantworte die Frage des Benutzers AUSSCHLIESSLICH auf Basis des unten stehenden Quellmaterials. \
    Wenn das Quellmaterial die Antwort nicht enthält, sage: \
    'Dazu habe ich keine Informationen in den Handbüchern gefunden.' \
    Antworte in der Sprache der Frage. \
    Gib die verwendeten Quellen an (z.B. [Quelle 1]).";

/// A chat-completions client for one deployment.
#[derive(Debug)]
pub struct ChatClient {
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl ChatClient {
    /// Create a new client for the given deployment.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: "2024-02-01".into(),
            temperature: 0.3,
            max_tokens: 1000,
            client,
        }
    }

    /// Override the API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Override sampling temperature and output cap.
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Build a client from configuration.
    ///
    /// Fails with `Error::Config` listing the missing settings when
    /// endpoint, key, or deployment name are unset.
    pub fn from_config(config: &baubot_config::AppConfig) -> baubot_core::Result<Self> {
        let missing = config.missing_generation_settings();
        if !missing.is_empty() {
            return Err(baubot_core::Error::Config { missing });
        }

        let generation = &config.generation;
        Ok(Self::new(
            generation.endpoint.clone().unwrap_or_default(),
            generation.api_key.clone().unwrap_or_default(),
            generation.deployment.clone().unwrap_or_default(),
            generation.timeout_secs,
        )
        .with_api_version(generation.api_version.clone())
        .with_sampling(generation.temperature, generation.max_tokens))
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    /// Build the user message embedding source material and question.
    fn user_message(query: &str, context: &str) -> String {
        format!("Quellmaterial:\n---\n{context}\n---\nBenutzerfrage: {query}")
    }

    fn request_body(&self, query: &str, context: &str) -> serde_json::Value {
        serde_json::json!({
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::user_message(query, context) }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    /// Run one completion, with every failure mode as a typed error.
    async fn complete(&self, query: &str, context: &str) -> Result<String, GenerationError> {
        debug!(deployment = %self.deployment, context_len = context.len(), "Sending completion request");

        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&self.request_body(query, context))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(e.to_string())
                } else {
                    GenerationError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            // Azure surfaces prompt-filter rejections as 400 with a typed code
            if error_body.contains("content_filter") {
                return Err(GenerationError::ContentFiltered);
            }
            return Err(GenerationError::Api {
                status,
                message: error_body,
            });
        }

        let api_response: ApiChatResponse =
            response.json().await.map_err(|e| GenerationError::Api {
                status: 200,
                message: format!("Failed to parse completion response: {e}"),
            })?;

        api_response.into_text()
    }
}

#[async_trait]
impl Generator for ChatClient {
    fn name(&self) -> &str {
        "azure-openai"
    }

    async fn generate(&self, query: &str, context: &str) -> Option<String> {
        match self.complete(query, context).await {
            Ok(text) => {
                debug!(len = text.len(), "Completion received");
                Some(text)
            }
            Err(reason) => {
                warn!(generator = self.name(), %reason, "No usable generation");
                None
            }
        }
    }
}

// --- Chat API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiChatResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ApiChatResponse {
    /// Extract the completion text, mapping filtered and empty outputs to
    /// their distinct errors.
    fn into_text(self) -> Result<String, GenerationError> {
        let choice = self.choices.into_iter().next().ok_or(GenerationError::Empty)?;

        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(GenerationError::ContentFiltered);
        }

        match choice.message.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(GenerationError::Empty),
        }
    }
}
