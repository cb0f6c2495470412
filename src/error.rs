//! # Error values
//!
//! Every error signal in a pipeline carries a [`Cause`]. A cause is a cheaply
//! cloneable wrapper around any `std::error::Error`, so the same failure can be
//! handed to a subscriber, logged, and compared in tests without re-allocating
//! the underlying error.
//!
//! ## Core Types
//!
//! - **Cause**: the payload of an error signal; exposes a human-readable message
//! - **MessageError**: a plain string error for failures with no richer source
//!
//! ## Example
//!
//! ```rust
//! use reactive_primer::error::Cause;
//!
//! let cause = Cause::msg("Solo hasta 5!");
//! assert_eq!(cause.message(), "Solo hasta 5!");
//!
//! let io = Cause::new(std::io::Error::other("disk unplugged"));
//! assert_eq!(io.to_string(), "disk unplugged");
//! ```
//!
//! The core does not distinguish kinds of causes: a failing user function and a
//! failing upstream both travel as the same `Cause`. Callers that need the
//! original error back can use [`Cause::downcast_ref`].

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A simple error type that wraps a string message.
///
/// Used by [`Cause::msg`] when a failure is described only by text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MessageError(pub String);

/// The payload of an error signal.
///
/// Cloning a `Cause` shares the underlying error.
#[derive(Clone)]
pub struct Cause {
  source: Arc<dyn StdError + Send + Sync>,
}

impl Cause {
  /// Wraps an arbitrary error.
  ///
  /// # Arguments
  ///
  /// * `error` - The error that caused the pipeline to fail.
  pub fn new<E>(error: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    Self {
      source: Arc::new(error),
    }
  }

  /// Creates a cause from a plain message.
  ///
  /// # Arguments
  ///
  /// * `message` - Human-readable description of the failure.
  pub fn msg(message: impl Into<String>) -> Self {
    Self::new(MessageError(message.into()))
  }

  /// Returns the human-readable message of this cause.
  pub fn message(&self) -> String {
    self.source.to_string()
  }

  /// Attempts to view the wrapped error as a concrete type.
  pub fn downcast_ref<E>(&self) -> Option<&E>
  where
    E: StdError + 'static,
  {
    self.source.downcast_ref::<E>()
  }
}

impl fmt::Debug for Cause {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Cause").field(&self.message()).finish()
  }
}

impl fmt::Display for Cause {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.source, f)
  }
}

impl StdError for Cause {
  fn source(&self) -> Option<&(dyn StdError + 'static)> {
    self.source.source()
  }
}

/// Two causes are equal when their messages are equal.
impl PartialEq for Cause {
  fn eq(&self, other: &Self) -> bool {
    self.message() == other.message()
  }
}

impl From<MessageError> for Cause {
  fn from(error: MessageError) -> Self {
    Self::new(error)
  }
}
