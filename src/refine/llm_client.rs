use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

// Generic structure for OpenAI-compatible API chat messages
#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

// Generic structure for OpenAI-compatible API chat requests
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

// Generic structure for OpenAI-compatible API chat responses
#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
pub struct Choice {
    pub message: MessageContent,
}

#[derive(Deserialize, Debug)]
pub struct MessageContent {
    pub content: String,
}

// Claude-specific request structure: the system prompt is a separate field,
// not a message.
#[derive(Debug, Serialize)]
pub struct ClaudeRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

// Claude-specific response structure
#[derive(Deserialize, Debug)]
pub struct ClaudeChatResponse {
    pub content: Vec<ClaudeChatContent>,
}

#[derive(Deserialize, Debug)]
pub struct ClaudeChatContent {
    pub text: String,
}

/// Failures of one refinement request. All of them are non-fatal to the
/// submission: the caller falls back to the unrefined report.
#[derive(Debug, Error)]
pub enum RefineError {
    #[error("falha na comunicação com o serviço de refinamento: {0}")]
    Request(#[from] reqwest::Error),
    #[error("valor de cabeçalho inválido na configuração do serviço")]
    Header(#[from] header::InvalidHeaderValue),
    #[error("o serviço de refinamento respondeu com erro: {0}")]
    Api(String),
    #[error("resposta do serviço de refinamento sem conteúdo")]
    EmptyResponse,
}

/// Text-completion providers supported by the refinement client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Claude,
    Ollama,
}

impl Provider {
    /// Model used when the configuration names none.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Claude => "claude-3-5-haiku-latest",
            Provider::Ollama => "llama3.2",
        }
    }

    /// Environment variable consulted for the provider's credential.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Claude => Some("ANTHROPIC_API_KEY"),
            Provider::Ollama => None,
        }
    }

    /// Ollama runs locally and needs no credential.
    pub fn requires_api_key(&self) -> bool {
        self.api_key_env().is_some()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAi => "OpenAI",
            Provider::Claude => "Claude",
            Provider::Ollama => "Ollama",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "claude" => Ok(Self::Claude),
            "ollama" => Ok(Self::Ollama),
            _ => Err(format!("provedor de refinamento desconhecido: {}", s)),
        }
    }
}

/// Sends one instruction-wrapped completion request and returns the text.
///
/// OpenAI and Ollama speak the chat-completions format with Bearer auth
/// (Ollama keyless, on a configurable endpoint); Claude uses the Anthropic
/// messages format with `x-api-key` and `anthropic-version` headers.
///
/// # Arguments
/// * `client` - Reqwest HTTP client (reused across requests)
/// * `provider` - The completion provider to call
/// * `model` - Model name (e.g. "gpt-4o-mini")
/// * `api_key` - Credential; empty for Ollama
/// * `system_prompt` - Fixed correction-task instructions
/// * `user_prompt` - The report wrapped in the correction request
/// * `endpoint` - Optional Ollama endpoint (defaults to localhost:11434)
/// * `max_tokens` - Response length cap
/// * `temperature` - Sampling temperature
#[allow(clippy::too_many_arguments)]
pub async fn request_completion(
    client: &Client,
    provider: &Provider,
    model: &str,
    api_key: &str,
    system_prompt: &str,
    user_prompt: &str,
    endpoint: Option<&str>,
    max_tokens: u32,
    temperature: f32,
) -> Result<String, RefineError> {
    let (api_url, mut headers) = match provider {
        Provider::OpenAi => (
            "https://api.openai.com/v1/chat/completions".to_string(),
            header::HeaderMap::new(),
        ),
        Provider::Ollama => {
            let host = endpoint
                .map(|s| s.to_string())
                .unwrap_or_else(|| "http://localhost:11434".to_string());
            (
                format!("{}/v1/chat/completions", host),
                header::HeaderMap::new(),
            )
        }
        Provider::Claude => {
            let mut header_map = header::HeaderMap::new();
            header_map.insert("x-api-key", api_key.parse()?);
            header_map.insert("anthropic-version", "2023-06-01".parse()?);
            ("https://api.anthropic.com/v1/messages".to_string(), header_map)
        }
    };

    // Add authorization header for non-Claude providers
    if provider != &Provider::Claude {
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", api_key).parse()?,
        );
    }
    headers.insert(header::CONTENT_TYPE, "application/json".parse()?);

    // Build request body based on provider
    let request_body = if provider != &Provider::Claude {
        serde_json::json!(ChatRequest {
            model: model.to_string(),
            max_tokens,
            temperature,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                }
            ],
        })
    } else {
        serde_json::json!(ClaudeRequest {
            model: model.to_string(),
            max_tokens,
            temperature,
            system: system_prompt.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            }]
        })
    };

    info!("✨ Refinement request to {}: model={}", provider, model);

    let response = client
        .post(api_url)
        .headers(headers)
        .json(&request_body)
        .send()
        .await?;

    if !response.status().is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(RefineError::Api(error_body));
    }

    // Parse response based on provider
    if provider == &Provider::Claude {
        let chat_response = response.json::<ClaudeChatResponse>().await?;

        info!("✓ Refinement response received from Claude");

        let content = chat_response
            .content
            .first()
            .ok_or(RefineError::EmptyResponse)?
            .text
            .trim();
        Ok(content.to_string())
    } else {
        let chat_response = response.json::<ChatResponse>().await?;

        info!("✓ Refinement response received from {}", provider);

        let content = chat_response
            .choices
            .first()
            .ok_or(RefineError::EmptyResponse)?
            .message
            .content
            .trim();
        Ok(content.to_string())
    }
}
