//! Map transformers.
//!
//! [`MapTransformer`] applies an infallible function to every value, producing
//! a one-to-one mapping that keeps order and passes completion through.
//! [`TryMapTransformer`] does the same with a fallible function: the first
//! `Err` becomes the execution's error signal.
//!
//! ```rust
//! use reactive_primer::prelude::*;
//!
//! let lengths = Multi::from_iterable(vec!["a", "bb", "ccc"]).map(|s| s.len());
//! let parsed = Multi::from_iterable(vec!["1", "x"])
//!   .try_map(|s| s.parse::<i32>().map_err(Cause::new));
//! # drop((lengths, parsed));
//! ```

use crate::error::Cause;
use crate::signal::{SignalStream, SignalStreamExt};
use crate::traits::publisher::Context;
use crate::traits::transformer::{Transformer, Upstream};
use futures::StreamExt;
use std::sync::Arc;

/// Applies a function to each value.
pub struct MapTransformer<F> {
  f: Arc<F>,
}

impl<F> MapTransformer<F> {
  /// Creates a new `MapTransformer` with the given function.
  ///
  /// # Arguments
  ///
  /// * `f` - The function to apply to each value.
  pub fn new(f: F) -> Self {
    Self { f: Arc::new(f) }
  }
}

impl<I, O, F> Transformer<I, O> for MapTransformer<F>
where
  I: Send + 'static,
  O: Send + 'static,
  F: Fn(I) -> O + Send + Sync + 'static,
{
  fn transform(&self, upstream: &Upstream<I>, ctx: &Context) -> SignalStream<O> {
    let f = Arc::clone(&self.f);
    upstream
      .produce(ctx)
      .map(move |item| item.map(|value| f(value)))
      .boxed()
  }
}

/// Applies a fallible function to each value.
pub struct TryMapTransformer<F> {
  f: Arc<F>,
}

impl<F> TryMapTransformer<F> {
  /// Creates a new `TryMapTransformer` with the given function.
  ///
  /// # Arguments
  ///
  /// * `f` - The function to apply to each value; an `Err` ends the execution.
  pub fn new(f: F) -> Self {
    Self { f: Arc::new(f) }
  }
}

impl<I, O, F> Transformer<I, O> for TryMapTransformer<F>
where
  I: Send + 'static,
  O: Send + 'static,
  F: Fn(I) -> Result<O, Cause> + Send + Sync + 'static,
{
  fn transform(&self, upstream: &Upstream<I>, ctx: &Context) -> SignalStream<O> {
    let f = Arc::clone(&self.f);
    upstream
      .produce(ctx)
      .map(move |item| item.and_then(|value| f(value)))
      .stop_after_error()
      .boxed()
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use crate::signal::collect_signals;

  #[tokio::test]
  async fn test_map_basic() {
    let doubled = Multi::from_iterable(vec![1, 2, 3]).map(|x| x * 2);
    let signals = collect_signals(&doubled, &Context::default()).await;
    assert_eq!(
      signals,
      vec![Signal::Next(2), Signal::Next(4), Signal::Next(6), Signal::Complete]
    );
  }

  #[tokio::test]
  async fn test_map_type_change() {
    let lengths = Multi::from_iterable(vec!["hello", "hi"]).map(|s: &str| s.len());
    let signals = collect_signals(&lengths, &Context::default()).await;
    assert_eq!(signals, vec![Signal::Next(5), Signal::Next(2), Signal::Complete]);
  }

  #[tokio::test]
  async fn test_map_skips_errors() {
    let mapped = Single::<i32>::error(Cause::msg("upstream")).map(|x| x + 1);
    let signals = collect_signals(&mapped, &Context::default()).await;
    assert_eq!(signals, vec![Signal::Error(Cause::msg("upstream"))]);
  }

  #[tokio::test]
  async fn test_try_map_failure_terminates() {
    let parsed = Multi::from_iterable(vec!["1", "two", "3"])
      .try_map(|s: &str| s.parse::<i32>().map_err(|_| Cause::msg(format!("not a number: {s}"))));
    let signals = collect_signals(&parsed, &Context::default()).await;
    assert_eq!(
      signals,
      vec![Signal::Next(1), Signal::Error(Cause::msg("not a number: two"))]
    );
  }
}
