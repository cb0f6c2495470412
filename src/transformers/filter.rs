//! Filter transformers.
//!
//! [`FilterTransformer`] forwards a value only when a predicate accepts it.
//! [`TryFilterTransformer`] uses a fallible predicate whose `Err` ends the
//! execution. Both keep the relative order of the values they forward.

use crate::error::Cause;
use crate::signal::{SignalStream, SignalStreamExt};
use crate::traits::publisher::Context;
use crate::traits::transformer::{Transformer, Upstream};
use futures::{StreamExt, future};
use std::sync::Arc;

/// Keeps the values a predicate accepts.
pub struct FilterTransformer<P> {
  predicate: Arc<P>,
}

impl<P> FilterTransformer<P> {
  /// Creates a new `FilterTransformer`.
  ///
  /// # Arguments
  ///
  /// * `predicate` - Returns `true` for values to keep.
  pub fn new(predicate: P) -> Self {
    Self {
      predicate: Arc::new(predicate),
    }
  }
}

impl<T, P> Transformer<T, T> for FilterTransformer<P>
where
  T: Send + 'static,
  P: Fn(&T) -> bool + Send + Sync + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<T> {
    let predicate = Arc::clone(&self.predicate);
    upstream
      .produce(ctx)
      .filter(move |item| {
        let keep = match item {
          Ok(value) => predicate(value),
          Err(_) => true,
        };
        future::ready(keep)
      })
      .boxed()
  }
}

/// Keeps the values a fallible predicate accepts.
pub struct TryFilterTransformer<P> {
  predicate: Arc<P>,
}

impl<P> TryFilterTransformer<P> {
  /// Creates a new `TryFilterTransformer`.
  ///
  /// # Arguments
  ///
  /// * `predicate` - Returns `Ok(true)` for values to keep; an `Err` ends the
  ///   execution.
  pub fn new(predicate: P) -> Self {
    Self {
      predicate: Arc::new(predicate),
    }
  }
}

impl<T, P> Transformer<T, T> for TryFilterTransformer<P>
where
  T: Send + 'static,
  P: Fn(&T) -> Result<bool, Cause> + Send + Sync + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<T> {
    let predicate = Arc::clone(&self.predicate);
    upstream
      .produce(ctx)
      .filter_map(move |item| {
        let kept = match item {
          Ok(value) => match predicate(&value) {
            Ok(true) => Some(Ok(value)),
            Ok(false) => None,
            Err(cause) => Some(Err(cause)),
          },
          Err(cause) => Some(Err(cause)),
        };
        future::ready(kept)
      })
      .stop_after_error()
      .boxed()
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use crate::signal::collect_signals;

  #[tokio::test]
  async fn test_filter_keeps_order() {
    let evens = Multi::range(1, 10).filter(|n| n % 2 == 0);
    let signals = collect_signals(&evens, &Context::default()).await;
    assert_eq!(
      signals,
      vec![
        Signal::Next(2),
        Signal::Next(4),
        Signal::Next(6),
        Signal::Next(8),
        Signal::Next(10),
        Signal::Complete
      ]
    );
  }

  #[tokio::test]
  async fn test_filter_rejecting_everything_still_completes() {
    let none = Multi::range(0, 5).filter(|_| false);
    let signals = collect_signals(&none, &Context::default()).await;
    assert_eq!(signals, vec![Signal::Complete]);
  }

  #[tokio::test]
  async fn test_try_filter_failure_terminates() {
    let checked = Multi::range(0, 5).try_filter(|n| {
      if *n == 3 {
        Err(Cause::msg("three is not allowed"))
      } else {
        Ok(n % 2 == 0)
      }
    });
    let signals = collect_signals(&checked, &Context::default()).await;
    assert_eq!(
      signals,
      vec![
        Signal::Next(0),
        Signal::Next(2),
        Signal::Error(Cause::msg("three is not allowed"))
      ]
    );
  }
}
