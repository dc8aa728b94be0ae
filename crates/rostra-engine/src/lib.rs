//! Model-backed judgement for Rostra and the policy for when to invoke it.
//!
//! Three components each wrap one prompt:
//!
//! - [`PropositionValidator`] reviews a raw proposition and proposes
//!   reformulations.
//! - [`FactChecker`] judges an argument's relevance and assigns a validity
//!   score.
//! - [`AnalysisGenerator`] summarises both sides of a topic.
//!
//! [`DebateEngine`] ties them to a [`rostra_core::store::DebateStore`]: it
//! checks arguments eagerly on submission, and lazily fills in missing
//! verdicts and analysis when a topic is read.

pub mod analysis;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod fact_check;
pub mod prompts;
pub mod proposition;

pub use analysis::AnalysisGenerator;
pub use engine::{DebateEngine, EnrichedTopic};
pub use enrich::{AnalysisOutcome, ArgumentCheck, CheckOutcome, EnrichmentReport};
pub use error::{Error, Result};
pub use fact_check::FactChecker;
pub use proposition::{PropositionType, PropositionValidator, Suggestion, ValidationResult};
