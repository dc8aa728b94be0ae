//! [`Complete`] over the Anthropic Messages API.

use std::{fmt, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Complete, CompletionRequest, Error, ModelTier, Result};

const API_VERSION: &str = "2023-06-01";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Model service settings, usually read from the `[model]` table of the
/// server config.
#[derive(Clone, Deserialize)]
pub struct AnthropicConfig {
  #[serde(default)]
  pub api_key:        String,
  #[serde(default = "default_api_base")]
  pub api_base:       String,
  /// Model used for proposition review and topic analysis.
  #[serde(default = "default_standard_model")]
  pub standard_model: String,
  /// Model used for fact-checking.
  #[serde(default = "default_fast_model")]
  pub fast_model:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:   u64,
}

fn default_api_base() -> String { "https://api.anthropic.com/v1".into() }
fn default_standard_model() -> String { "claude-sonnet-4-20250514".into() }
fn default_fast_model() -> String { "claude-3-haiku-20240307".into() }
fn default_timeout_secs() -> u64 { 120 }

impl Default for AnthropicConfig {
  fn default() -> Self {
    Self {
      api_key:        String::new(),
      api_base:       default_api_base(),
      standard_model: default_standard_model(),
      fast_model:     default_fast_model(),
      timeout_secs:   default_timeout_secs(),
    }
  }
}

impl AnthropicConfig {
  pub fn model_for(&self, tier: ModelTier) -> &str {
    match tier {
      ModelTier::Standard => &self.standard_model,
      ModelTier::Fast => &self.fast_model,
    }
  }
}

impl fmt::Debug for AnthropicConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AnthropicConfig")
      .field("api_key", &mask_secret(&self.api_key))
      .field("api_base", &self.api_base)
      .field("standard_model", &self.standard_model)
      .field("fast_model", &self.fast_model)
      .field("timeout_secs", &self.timeout_secs)
      .finish()
  }
}

/// Render a secret for logs: everything but the last four characters is
/// replaced by `*`. Secrets of four characters or fewer are fully masked.
pub fn mask_secret(secret: &str) -> String {
  let chars: Vec<char> = secret.chars().collect();
  if chars.len() <= 4 {
    return "*".repeat(chars.len());
  }
  let visible: String = chars[chars.len() - 4..].iter().collect();
  format!("{}{visible}", "*".repeat(chars.len() - 4))
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
  model:      &'a str,
  max_tokens: u32,
  messages:   [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
  content:     Vec<ContentBlock>,
  #[serde(default)]
  stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
  #[serde(rename = "type")]
  kind: String,
  #[serde(default)]
  text: Option<String>,
}

impl MessagesResponse {
  /// Concatenate every text block; other block kinds are ignored.
  fn text(&self) -> String {
    self
      .content
      .iter()
      .filter(|c| c.kind == "text")
      .filter_map(|c| c.text.as_deref())
      .collect()
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

pub struct AnthropicClient {
  config: AnthropicConfig,
  http:   Client,
}

impl AnthropicClient {
  pub fn new(config: AnthropicConfig) -> Result<Self> {
    if config.api_key.trim().is_empty() {
      return Err(Error::Config("an Anthropic API key is required".into()));
    }

    let http = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

    Ok(Self { config, http })
  }

  pub fn config(&self) -> &AnthropicConfig { &self.config }
}

impl Complete for AnthropicClient {
  async fn complete(&self, request: CompletionRequest) -> Result<String> {
    let model = self.config.model_for(request.tier);
    let body = MessagesRequest {
      model,
      max_tokens: request.max_tokens,
      messages: [Message { role: "user", content: &request.prompt }],
    };

    tracing::debug!(model, max_tokens = request.max_tokens, "calling model");

    let response = self
      .http
      .post(format!("{}/messages", self.config.api_base.trim_end_matches('/')))
      .header("x-api-key", &self.config.api_key)
      .header("anthropic-version", API_VERSION)
      .json(&body)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let parsed: MessagesResponse = response
      .json()
      .await
      .map_err(|e| Error::MalformedResponse(format!("unreadable message body: {e}")))?;

    tracing::debug!(model, stop_reason = ?parsed.stop_reason, "model call finished");
    Ok(parsed.text())
  }
}
