//! Structured-output parsing.
//!
//! Models are asked to answer with a bare JSON object but frequently wrap it
//! in a Markdown code fence. The parser strips a fence if present, checks the
//! field set declared by the target type, and only then deserialises.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Complete, CompletionRequest, Error, Result};

// ─── Declared shape ──────────────────────────────────────────────────────────

/// A typed result the model is asked to produce.
pub trait StructuredOutput: DeserializeOwned {
  /// Top-level keys that must be present (a JSON `null` counts as present).
  const REQUIRED_FIELDS: &'static [&'static str];
  /// Top-level keys that, when present, must hold a JSON array.
  const LIST_FIELDS: &'static [&'static str] = &[];
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Remove a surrounding ```` ```json ```` or ```` ``` ```` fence, if any, and
/// trim whitespace. Text that already opens as a JSON object or array is
/// returned trimmed, even when its string values contain backticks.
///
/// The language tag after the opening fence is dropped whatever its case, and
/// the closing fence is the last one in the text. Prose before the opening
/// fence or after the closing one is discarded.
pub fn strip_code_fences(text: &str) -> &str {
  let text = text.trim();
  if text.starts_with('{') || text.starts_with('[') {
    return text;
  }
  let Some(start) = text.find("```") else {
    return text;
  };

  let after = &text[start + "```".len()..];
  let tag_len = after
    .find(|c: char| !c.is_ascii_alphanumeric())
    .unwrap_or(after.len());
  let body = &after[tag_len..];

  match body.rfind("```") {
    Some(end) => body[..end].trim(),
    None => body.trim(),
  }
}

/// Parse raw model text into `T`, enforcing `T`'s declared field set.
pub fn parse_structured<T: StructuredOutput>(raw: &str) -> Result<T> {
  let body = strip_code_fences(raw);

  let value: Value = serde_json::from_str(body)
    .map_err(|e| Error::MalformedResponse(format!("invalid JSON: {e}")))?;

  let object = value
    .as_object()
    .ok_or_else(|| Error::MalformedResponse("expected a JSON object".into()))?;

  if let Some(missing) = T::REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
    return Err(Error::MalformedResponse(format!(
      "missing required field `{missing}`"
    )));
  }

  for field in T::LIST_FIELDS {
    if let Some(v) = object.get(*field)
      && !v.is_array()
    {
      return Err(Error::MalformedResponse(format!(
        "field `{field}` must be a list"
      )));
    }
  }

  serde_json::from_value(value)
    .map_err(|e| Error::MalformedResponse(format!("unexpected field value: {e}")))
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Sends prompts through a [`Complete`] transport and parses the answers.
///
/// Clones share the transport.
pub struct StructuredClient<M> {
  model: Arc<M>,
}

impl<M> Clone for StructuredClient<M> {
  fn clone(&self) -> Self {
    Self { model: Arc::clone(&self.model) }
  }
}

impl<M: Complete> StructuredClient<M> {
  pub fn new(model: Arc<M>) -> Self { Self { model } }

  pub fn model(&self) -> &Arc<M> { &self.model }

  /// One model call, no retries. Transport failures pass through unchanged;
  /// shape failures become [`Error::MalformedResponse`].
  pub async fn request<T: StructuredOutput>(
    &self,
    request: CompletionRequest,
  ) -> Result<T> {
    let tier = request.tier;
    let raw = self.model.complete(request).await?;
    tracing::debug!(?tier, chars = raw.len(), "model responded");

    parse_structured(&raw).inspect_err(|e| {
      tracing::debug!(?tier, error = %e, "rejected model output");
    })
  }
}
