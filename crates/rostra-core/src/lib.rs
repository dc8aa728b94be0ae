//! Core types and trait definitions for the Rostra debate platform.
//!
//! No HTTP, database or model-transport dependencies live here; every other
//! crate builds on these types and the [`store::DebateStore`] trait.

// Trait methods spell out `+ Send` futures; impls use plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod argument;
pub mod engagement;
pub mod error;
pub mod store;
pub mod topic;
pub mod user;

pub use error::{Error, Result};
