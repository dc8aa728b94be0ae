//! Model transport and structured-output parsing for Rostra.
//!
//! [`Complete`] is the seam between the platform and a text-generation
//! service. [`StructuredClient`] layers JSON extraction and field validation
//! on top of any transport, so callers receive typed results or a
//! [`Error::MalformedResponse`].

#![allow(async_fn_in_trait)]

pub mod anthropic;
pub mod error;
pub mod structured;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod scripted;

pub use anthropic::{AnthropicClient, AnthropicConfig, mask_secret};
pub use error::{Error, Result};
pub use structured::{StructuredClient, StructuredOutput, parse_structured, strip_code_fences};
pub use transport::{Complete, CompletionRequest, ModelTier};
