//! Ollama API backend.

use serde::{Deserialize, Serialize};

use super::{CompletionRequest, LlmBackend};
use crate::{Error, Result};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    stream: bool,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ApiOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    content: String,
}

/// Builder for the Ollama backend.
#[derive(Debug, Clone)]
pub struct OllamaBackendBuilder {
    model: String,
    base_url: String,
    temperature: f32,
}

impl OllamaBackendBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Override the Ollama server address.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn build(self) -> OllamaBackend {
        OllamaBackend {
            client: reqwest::Client::new(),
            model: self.model,
            base_url: self.base_url,
            temperature: self.temperature,
        }
    }
}

/// Ollama chat backend.
pub struct OllamaBackend {
    client: reqwest::Client,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OllamaBackend {
    pub fn builder(model: impl Into<String>) -> OllamaBackendBuilder {
        OllamaBackendBuilder::new(model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl LlmBackend for OllamaBackend {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ApiMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ApiMessage {
            role: "user",
            content: request.prompt,
        });

        let body = ApiRequest {
            model: &self.model,
            messages,
            stream: false,
            options: ApiOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!("HTTP {status}: {detail}")));
        }

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Api(format!("malformed response: {e}")))?;

        Ok(parsed.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_normalizes_base_url() {
        let backend = OllamaBackend::builder("llama3.2:latest")
            .base_url("http://ollama.interno:11434/")
            .build();
        assert_eq!(backend.base_url, "http://ollama.interno:11434");
        assert_eq!(backend.model(), "llama3.2:latest");
    }

    #[test]
    fn request_serializes_to_the_chat_shape() {
        let body = ApiRequest {
            model: "llama3.2:latest",
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: "preambulo",
                },
                ApiMessage {
                    role: "user",
                    content: "Hola",
                },
            ],
            stream: false,
            options: ApiOptions { temperature: 0.5 },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3.2:latest");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hola");
        assert_eq!(json["options"]["temperature"], 0.5);
    }

    #[test]
    fn response_parses_the_message_content() {
        let raw = r#"{
            "model": "llama3.2:latest",
            "created_at": "2025-01-01T00:00:00Z",
            "message": {"role": "assistant", "content": "[USAR_TOOL:obtener_info_rekaliber]"},
            "done": true
        }"#;

        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.message.content,
            "[USAR_TOOL:obtener_info_rekaliber]"
        );
    }
}
