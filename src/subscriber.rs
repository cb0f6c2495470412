//! # Subscriber
//!
//! A [`Subscriber`] bundles the handlers that receive one subscription's
//! signals. Every handler is optional:
//!
//! - **next**: discarded when absent
//! - **error**: reported through `tracing` at ERROR level when absent, and the
//!   subscription terminates as an *uncaught* failure
//! - **complete**: nothing happens when absent
//!
//! ```rust
//! use reactive_primer::prelude::*;
//!
//! let subscriber = Subscriber::new()
//!   .on_next(|n: i32| println!("got {n}"))
//!   .on_error(|cause| eprintln!("failed: {cause}"))
//!   .on_complete(|| println!("done"));
//! # drop(subscriber);
//! ```
//!
//! Handlers run on the subscription's driver task, one at a time, so they may
//! own mutable state without locking.

use crate::error::Cause;
use std::fmt;
use tracing::error;

type NextHandler<T> = Box<dyn FnMut(T) + Send>;
type ErrorHandler = Box<dyn FnOnce(Cause) + Send>;
type CompleteHandler = Box<dyn FnOnce() + Send>;

/// The callbacks receiving one subscription's signals.
pub struct Subscriber<T> {
  on_next: Option<NextHandler<T>>,
  on_error: Option<ErrorHandler>,
  on_complete: Option<CompleteHandler>,
}

impl<T> Subscriber<T> {
  /// A subscriber with every handler left at its default.
  pub fn new() -> Self {
    Self {
      on_next: None,
      on_error: None,
      on_complete: None,
    }
  }

  /// Sets the handler for `next` signals.
  pub fn on_next<F>(mut self, handler: F) -> Self
  where
    F: FnMut(T) + Send + 'static,
  {
    self.on_next = Some(Box::new(handler));
    self
  }

  /// Sets the handler for the `error` signal.
  pub fn on_error<F>(mut self, handler: F) -> Self
  where
    F: FnOnce(Cause) + Send + 'static,
  {
    self.on_error = Some(Box::new(handler));
    self
  }

  /// Sets the handler for the `complete` signal.
  pub fn on_complete<F>(mut self, handler: F) -> Self
  where
    F: FnOnce() + Send + 'static,
  {
    self.on_complete = Some(Box::new(handler));
    self
  }

  pub(crate) fn next(&mut self, value: T) {
    if let Some(handler) = self.on_next.as_mut() {
      handler(value);
    }
  }

  /// Delivers the error; returns `false` when no handler caught it.
  pub(crate) fn error(&mut self, cause: Cause) -> bool {
    match self.on_error.take() {
      Some(handler) => {
        handler(cause);
        true
      }
      None => {
        error!(error = %cause, "uncaught error reached subscriber");
        false
      }
    }
  }

  pub(crate) fn complete(&mut self) {
    if let Some(handler) = self.on_complete.take() {
      handler();
    }
  }
}

impl<T> Default for Subscriber<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for Subscriber<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscriber")
      .field("on_next", &self.on_next.is_some())
      .field("on_error", &self.on_error.is_some())
      .field("on_complete", &self.on_complete.is_some())
      .finish()
  }
}
