//! Take transformers.
//!
//! [`TakeTransformer`] forwards the first `n` values and then completes.
//! [`TakeWhileTransformer`] forwards values while a predicate holds and
//! completes at the first value that fails it. Both drop the upstream
//! execution as soon as they complete, which bounds infinite sources such as
//! `interval`.

use crate::signal::SignalStream;
use crate::traits::publisher::Context;
use crate::traits::transformer::{Transformer, Upstream};
use futures::StreamExt;
use std::sync::Arc;

/// Forwards at most `n` values.
#[derive(Debug, Clone, Copy)]
pub struct TakeTransformer {
  n: usize,
}

impl TakeTransformer {
  /// Creates a new `TakeTransformer`.
  ///
  /// # Arguments
  ///
  /// * `n` - The number of values to forward before completing.
  pub fn new(n: usize) -> Self {
    Self { n }
  }
}

impl<T> Transformer<T, T> for TakeTransformer
where
  T: Send + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<T> {
    let n = self.n;
    if n == 0 {
      return futures::stream::empty().boxed();
    }
    let input = upstream.produce(ctx);
    Box::pin(async_stream::stream! {
      let mut input = input;
      let mut taken = 0usize;
      while let Some(item) = input.next().await {
        match item {
          Ok(value) => {
            taken += 1;
            yield Ok(value);
            if taken == n {
              return;
            }
          }
          Err(cause) => {
            yield Err(cause);
            return;
          }
        }
      }
    })
  }
}

/// Forwards values while a predicate holds.
pub struct TakeWhileTransformer<F> {
  predicate: Arc<F>,
}

impl<F> TakeWhileTransformer<F> {
  /// Creates a new `TakeWhileTransformer`.
  ///
  /// # Arguments
  ///
  /// * `predicate` - Values are forwarded while this returns `true`.
  pub fn new(predicate: F) -> Self {
    Self {
      predicate: Arc::new(predicate),
    }
  }
}

impl<T, F> Transformer<T, T> for TakeWhileTransformer<F>
where
  T: Send + 'static,
  F: Fn(&T) -> bool + Send + Sync + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<T> {
    let predicate = Arc::clone(&self.predicate);
    let input = upstream.produce(ctx);
    Box::pin(async_stream::stream! {
      let mut input = input;
      while let Some(item) = input.next().await {
        match item {
          Ok(value) if predicate(&value) => yield Ok(value),
          Ok(_) => return,
          Err(cause) => {
            yield Err(cause);
            return;
          }
        }
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use crate::signal::collect_signals;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::time::Duration;

  #[tokio::test]
  async fn test_take_first_values() {
    let signals = collect_signals(&Multi::range(10, 5).take(2), &Context::default()).await;
    assert_eq!(signals, vec![Signal::Next(10), Signal::Next(11), Signal::Complete]);
  }

  #[tokio::test]
  async fn test_take_more_than_available() {
    let signals = collect_signals(&Multi::range(0, 2).take(5), &Context::default()).await;
    assert_eq!(signals, vec![Signal::Next(0), Signal::Next(1), Signal::Complete]);
  }

  #[tokio::test]
  async fn test_take_zero_never_subscribes_upstream() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let source = Single::from_callable(move || {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(1)
    });
    let signals = collect_signals(&source.into_multi().take(0), &Context::default()).await;
    assert_eq!(signals, vec![Signal::Complete]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test(start_paused = true)]
  async fn test_take_bounds_interval() {
    let signals = collect_signals(
      &Multi::interval(Duration::from_millis(100)).take(3),
      &Context::default(),
    )
    .await;
    assert_eq!(
      signals,
      vec![Signal::Next(0), Signal::Next(1), Signal::Next(2), Signal::Complete]
    );
  }

  #[tokio::test]
  async fn test_take_while_stops_at_first_failure() {
    let pipeline = Multi::from_iterable(vec![1, 2, 5, 1]).take_while(|n| *n < 3);
    let signals = collect_signals(&pipeline, &Context::default()).await;
    assert_eq!(signals, vec![Signal::Next(1), Signal::Next(2), Signal::Complete]);
  }

  #[tokio::test]
  async fn test_take_while_forwards_errors() {
    let pipeline = Multi::<i32>::error(Cause::msg("early")).take_while(|_| true);
    let signals = collect_signals(&pipeline, &Context::default()).await;
    assert_eq!(signals, vec![Signal::Error(Cause::msg("early"))]);
  }
}
