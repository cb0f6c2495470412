//! # Single
//!
//! [`Single`] is a publisher that emits at most one value before its terminal
//! signal. Its operators keep that guarantee: mapping, filtering, zipping two
//! singles or flat-mapping into another single all return a `Single`. Use
//! [`Single::flat_map_many`] or [`Single::into_multi`] to move to a [`Multi`].
//!
//! A `Single` is an immutable description. Cloning it is cheap and every
//! subscription runs the whole chain again.
//!
//! ```rust
//! use reactive_primer::prelude::*;
//!
//! # async fn example() -> Result<(), Cause> {
//! let greeting = Single::just("world").map(|name| format!("hello {name}"));
//! assert_eq!(greeting.value().await?, Some("hello world".to_string()));
//! # Ok(())
//! # }
//! ```

use crate::error::Cause;
use crate::multi::Multi;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::signal::SignalStream;
use crate::traits::publisher::{Context, ProduceFn, Publisher};
use crate::traits::transformer::{Transformer, Upstream, lift};
use crate::transformers::{
  DelayElementsTransformer, DoOnNextTransformer, DoOnTerminateTransformer, FilterTransformer,
  FlatMapTransformer, MapTransformer, RetryTransformer, TryDoOnNextTransformer,
  TryFilterTransformer, TryMapTransformer, ZipWithTransformer,
};
use futures::StreamExt;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A publisher of zero or one value.
pub struct Single<T> {
  produce: Arc<ProduceFn<T>>,
  name: Option<Arc<str>>,
}

impl<T> Single<T>
where
  T: Send + 'static,
{
  /// Builds a `Single` from its produce function. The function must emit at
  /// most one value.
  pub(crate) fn from_fn<F>(produce: F) -> Self
  where
    F: Fn(&Context) -> SignalStream<T> + Send + Sync + 'static,
  {
    Self::from_produce(Arc::new(produce))
  }

  pub(crate) fn from_produce(produce: Arc<ProduceFn<T>>) -> Self {
    Self { produce, name: None }
  }

  fn upstream(&self) -> Upstream<T> {
    Upstream::new(Arc::clone(&self.produce))
  }

  fn lift<O, X>(&self, transformer: X) -> Single<O>
  where
    O: Send + 'static,
    X: Transformer<T, O>,
  {
    Single {
      produce: lift(self.upstream(), transformer),
      name: self.name.clone(),
    }
  }

  /// Attaches a diagnostic name, reported in subscription `tracing` events.
  pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Transforms the value.
  pub fn map<O, F>(&self, f: F) -> Single<O>
  where
    O: Send + 'static,
    F: Fn(T) -> O + Send + Sync + 'static,
  {
    self.lift(MapTransformer::new(f))
  }

  /// Transforms the value with a fallible function.
  pub fn try_map<O, F>(&self, f: F) -> Single<O>
  where
    O: Send + 'static,
    F: Fn(T) -> Result<O, Cause> + Send + Sync + 'static,
  {
    self.lift(TryMapTransformer::new(f))
  }

  /// Drops the value unless `predicate` holds, leaving an empty `Single`.
  pub fn filter<F>(&self, predicate: F) -> Single<T>
  where
    F: Fn(&T) -> bool + Send + Sync + 'static,
  {
    self.lift(FilterTransformer::new(predicate))
  }

  /// Like [`Single::filter`] with a fallible predicate.
  pub fn try_filter<F>(&self, predicate: F) -> Single<T>
  where
    F: Fn(&T) -> Result<bool, Cause> + Send + Sync + 'static,
  {
    self.lift(TryFilterTransformer::new(predicate))
  }

  /// Continues with the `Single` built from the value.
  pub fn flat_map<O, F>(&self, f: F) -> Single<O>
  where
    O: Send + 'static,
    F: Fn(T) -> Single<O> + Send + Sync + 'static,
  {
    self.lift(FlatMapTransformer::new(f))
  }

  /// Continues with the publisher built from the value, which may emit any
  /// number of values.
  pub fn flat_map_many<P, F>(&self, f: F) -> Multi<P::Item>
  where
    P: Publisher,
    F: Fn(T) -> P + Send + Sync + 'static,
  {
    self.into_multi().flat_map(f)
  }

  /// Combines the value with the value of `other`.
  ///
  /// Empty when either side is empty.
  pub fn zip_with<U, C, F>(&self, other: Single<U>, combiner: F) -> Single<C>
  where
    U: Send + 'static,
    C: Send + 'static,
    F: Fn(T, U) -> C + Send + Sync + 'static,
  {
    self.lift(ZipWithTransformer::new(other, combiner))
  }

  /// Pairs the value with the value of `other`.
  pub fn zip<U>(&self, other: Single<U>) -> Single<(T, U)>
  where
    U: Send + 'static,
  {
    self.zip_with(other, |t, u| (t, u))
  }

  /// Runs `f` on the value before it moves downstream.
  pub fn do_on_next<F>(&self, f: F) -> Single<T>
  where
    F: Fn(&T) + Send + Sync + 'static,
  {
    self.lift(DoOnNextTransformer::new(f))
  }

  /// Runs a fallible check on the value; an `Err` replaces it with an error.
  pub fn try_do_on_next<F>(&self, f: F) -> Single<T>
  where
    F: Fn(&T) -> Result<(), Cause> + Send + Sync + 'static,
  {
    self.lift(TryDoOnNextTransformer::new(f))
  }

  /// Runs `hook` once per execution when it terminates or is cancelled.
  pub fn do_on_terminate<F>(&self, hook: F) -> Single<T>
  where
    F: Fn() + Send + Sync + 'static,
  {
    self.lift(DoOnTerminateTransformer::new(hook))
  }

  /// Emits the value after `duration` on the subscription's scheduler.
  pub fn delay_element(&self, duration: Duration) -> Single<T> {
    self.lift(DelayElementsTransformer::new(duration))
  }

  /// Resubscribes after an error, at most `max_retries` times.
  pub fn retry(&self, max_retries: usize) -> Single<T> {
    self.lift(RetryTransformer::new(max_retries))
  }

  /// Views this `Single` as a [`Multi`].
  pub fn into_multi(&self) -> Multi<T> {
    let multi = Multi::from_produce(Arc::clone(&self.produce));
    match &self.name {
      Some(name) => multi.with_name(Arc::clone(name)),
      None => multi,
    }
  }

  /// Runs one execution on the current task and returns its outcome.
  ///
  /// `Ok(None)` means the `Single` completed empty.
  pub async fn value(&self) -> Result<Option<T>, Cause> {
    self.value_on(Arc::new(TokioScheduler)).await
  }

  /// Like [`Single::value`], with time-driven stages running on `scheduler`.
  pub async fn value_on(&self, scheduler: Arc<dyn Scheduler>) -> Result<Option<T>, Cause> {
    let mut signals = self.produce(&Context::new(scheduler));
    signals.next().await.transpose()
  }
}

impl<T> Clone for Single<T> {
  fn clone(&self) -> Self {
    Self {
      produce: Arc::clone(&self.produce),
      name: self.name.clone(),
    }
  }
}

impl<T> Publisher for Single<T>
where
  T: Send + 'static,
{
  type Item = T;

  fn produce(&self, ctx: &Context) -> SignalStream<T> {
    (self.produce)(ctx)
  }

  fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }
}

impl<T> fmt::Debug for Single<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Single")
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[tokio::test]
  async fn test_composition_runs_no_user_code() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let pipeline = Single::just(2).map(move |n| {
      counter.fetch_add(1, Ordering::SeqCst);
      n * 21
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(pipeline.value().await, Ok(Some(42)));
    assert_eq!(pipeline.value().await, Ok(Some(42)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_filter_can_empty_a_single() {
    assert_eq!(Single::just(3).filter(|n| *n > 5).value().await, Ok(None));
  }

  #[tokio::test]
  async fn test_zip_with_empty_side_is_empty() {
    let zipped = Single::just(1).zip_with(Single::<i32>::empty(), |a, b| a + b);
    assert_eq!(zipped.value().await, Ok(None));
  }

  #[tokio::test]
  async fn test_flat_map_into_single() {
    let chained = Single::just("7").flat_map(|s: &str| match s.parse::<i32>() {
      Ok(n) => Single::just(n),
      Err(e) => Single::error(Cause::new(e)),
    });
    assert_eq!(chained.value().await, Ok(Some(7)));
  }

  #[tokio::test]
  async fn test_name_is_kept_through_operators() {
    let named = Single::just(1).with_name("answer").map(|n| n + 1);
    assert_eq!(named.name(), Some("answer"));
    assert_eq!(named.into_multi().name(), Some("answer"));
  }

  #[tokio::test]
  async fn test_subscribe_delivers_value_and_completion() {
    let seen = Arc::new(AtomicUsize::new(0));
    let record = Arc::clone(&seen);
    let subscription = Single::just(5).subscribe(
      Subscriber::new().on_next(move |n: usize| {
        record.fetch_add(n, Ordering::SeqCst);
      }),
    );
    assert_eq!(subscription.terminated().await, Termination::Completed);
    assert_eq!(seen.load(Ordering::SeqCst), 5);
  }
}
