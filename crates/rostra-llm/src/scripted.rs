//! An in-process [`Complete`] for tests.
//!
//! Replies are served from a FIFO queue; an optional responder function
//! answers once the queue is empty. Every request is recorded.

use std::{
  collections::VecDeque,
  sync::{Arc, Mutex, MutexGuard},
};

use crate::{Complete, CompletionRequest, Error, Result};

type Responder = Arc<dyn Fn(&CompletionRequest) -> Result<String> + Send + Sync>;

#[derive(Default)]
pub struct ScriptedModel {
  replies:   Mutex<VecDeque<Result<String>>>,
  responder: Option<Responder>,
  calls:     Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
  pub fn new() -> Self { Self::default() }

  /// Answer every request not covered by the queue with `f`.
  pub fn from_fn(
    f: impl Fn(&CompletionRequest) -> Result<String> + Send + Sync + 'static,
  ) -> Self {
    Self { responder: Some(Arc::new(f)), ..Self::default() }
  }

  pub fn push_reply(&self, text: impl Into<String>) -> &Self {
    lock(&self.replies).push_back(Ok(text.into()));
    self
  }

  /// Queue a transport failure.
  pub fn push_failure(&self, message: impl Into<String>) -> &Self {
    lock(&self.replies).push_back(Err(Error::Transport(message.into())));
    self
  }

  pub fn push_error(&self, error: Error) -> &Self {
    lock(&self.replies).push_back(Err(error));
    self
  }

  pub fn calls(&self) -> Vec<CompletionRequest> { lock(&self.calls).clone() }

  pub fn call_count(&self) -> usize { lock(&self.calls).len() }

  pub fn pending_replies(&self) -> usize { lock(&self.replies).len() }
}

impl Complete for ScriptedModel {
  async fn complete(&self, request: CompletionRequest) -> Result<String> {
    let queued = lock(&self.replies).pop_front();
    let reply = match queued {
      Some(reply) => reply,
      None => match &self.responder {
        Some(f) => f(&request),
        None => Err(Error::Transport("scripted model has no reply queued".into())),
      },
    };
    lock(&self.calls).push(request);
    reply
  }
}

// A panicking test thread must not hide the script from the others.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
