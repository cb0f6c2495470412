//! # Multi
//!
//! [`Multi`] is a publisher of any number of values, possibly infinitely many,
//! followed by a terminal signal. It carries the full operator set; see the
//! [`transformers`](crate::transformers) module for the behavior of each one.
//! Operators not offered as methods can be applied with [`Multi::transform`].
//!
//! ```rust
//! use reactive_primer::prelude::*;
//!
//! # async fn example() -> Result<(), Cause> {
//! let squares = Multi::range(1, 4).map(|n| n * n).collect_list();
//! assert_eq!(squares.value().await?, Some(vec![1, 4, 9, 16]));
//! # Ok(())
//! # }
//! ```

use crate::error::Cause;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::signal::SignalStream;
use crate::single::Single;
use crate::traits::publisher::{Context, ProduceFn, Publisher};
use crate::traits::transformer::{Transformer, Upstream, lift};
use crate::transformers::{
  CollectListTransformer, DelayElementsTransformer, DoOnNextTransformer, DoOnTerminateTransformer,
  FilterTransformer, FlatMapTransformer, MapTransformer, RetryTransformer, TakeTransformer,
  TakeWhileTransformer, TryDoOnNextTransformer, TryFilterTransformer, TryMapTransformer,
  ZipWithTransformer,
};
use futures::StreamExt;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A publisher of zero or more values.
pub struct Multi<T> {
  produce: Arc<ProduceFn<T>>,
  name: Option<Arc<str>>,
}

impl<T> Multi<T>
where
  T: Send + 'static,
{
  pub(crate) fn from_fn<F>(produce: F) -> Self
  where
    F: Fn(&Context) -> SignalStream<T> + Send + Sync + 'static,
  {
    Self::from_produce(Arc::new(produce))
  }

  pub(crate) fn from_produce(produce: Arc<ProduceFn<T>>) -> Self {
    Self { produce, name: None }
  }

  /// Attaches a diagnostic name, reported in subscription `tracing` events.
  pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Applies an arbitrary operator.
  pub fn transform<O, X>(&self, transformer: X) -> Multi<O>
  where
    O: Send + 'static,
    X: Transformer<T, O>,
  {
    Multi {
      produce: lift(Upstream::new(Arc::clone(&self.produce)), transformer),
      name: self.name.clone(),
    }
  }

  /// Transforms every value.
  pub fn map<O, F>(&self, f: F) -> Multi<O>
  where
    O: Send + 'static,
    F: Fn(T) -> O + Send + Sync + 'static,
  {
    self.transform(MapTransformer::new(f))
  }

  /// Transforms every value with a fallible function.
  pub fn try_map<O, F>(&self, f: F) -> Multi<O>
  where
    O: Send + 'static,
    F: Fn(T) -> Result<O, Cause> + Send + Sync + 'static,
  {
    self.transform(TryMapTransformer::new(f))
  }

  /// Keeps the values for which `predicate` holds.
  pub fn filter<F>(&self, predicate: F) -> Multi<T>
  where
    F: Fn(&T) -> bool + Send + Sync + 'static,
  {
    self.transform(FilterTransformer::new(predicate))
  }

  /// Like [`Multi::filter`] with a fallible predicate.
  pub fn try_filter<F>(&self, predicate: F) -> Multi<T>
  where
    F: Fn(&T) -> Result<bool, Cause> + Send + Sync + 'static,
  {
    self.transform(TryFilterTransformer::new(predicate))
  }

  /// Maps every value to a publisher and merges their values.
  pub fn flat_map<P, F>(&self, f: F) -> Multi<P::Item>
  where
    P: Publisher,
    F: Fn(T) -> P + Send + Sync + 'static,
  {
    self.transform(FlatMapTransformer::new(f))
  }

  /// Pairs values with those of `other` and combines each pair.
  pub fn zip_with<P, C, F>(&self, other: P, combiner: F) -> Multi<C>
  where
    P: Publisher,
    C: Send + 'static,
    F: Fn(T, P::Item) -> C + Send + Sync + 'static,
  {
    self.transform(ZipWithTransformer::new(other, combiner))
  }

  /// Gathers every value into one `Vec`, emitted on completion.
  pub fn collect_list(&self) -> Single<Vec<T>> {
    let produce = lift(
      Upstream::new(Arc::clone(&self.produce)),
      CollectListTransformer::new(),
    );
    let batch = Single::from_produce(produce);
    match &self.name {
      Some(name) => batch.with_name(Arc::clone(name)),
      None => batch,
    }
  }

  /// Runs `f` on every value before it moves downstream.
  pub fn do_on_next<F>(&self, f: F) -> Multi<T>
  where
    F: Fn(&T) + Send + Sync + 'static,
  {
    self.transform(DoOnNextTransformer::new(f))
  }

  /// Runs a fallible check on every value; an `Err` ends the execution.
  pub fn try_do_on_next<F>(&self, f: F) -> Multi<T>
  where
    F: Fn(&T) -> Result<(), Cause> + Send + Sync + 'static,
  {
    self.transform(TryDoOnNextTransformer::new(f))
  }

  /// Runs `hook` once per execution when it terminates or is cancelled.
  pub fn do_on_terminate<F>(&self, hook: F) -> Multi<T>
  where
    F: Fn() + Send + Sync + 'static,
  {
    self.transform(DoOnTerminateTransformer::new(hook))
  }

  /// Re-emits every value after `duration` on the subscription's scheduler.
  pub fn delay_elements(&self, duration: Duration) -> Multi<T> {
    self.transform(DelayElementsTransformer::new(duration))
  }

  /// Resubscribes after an error, at most `max_retries` times.
  pub fn retry(&self, max_retries: usize) -> Multi<T> {
    self.transform(RetryTransformer::new(max_retries))
  }

  /// Forwards the first `n` values, then completes.
  pub fn take(&self, n: usize) -> Multi<T> {
    self.transform(TakeTransformer::new(n))
  }

  /// Forwards values while `predicate` holds, then completes.
  pub fn take_while<F>(&self, predicate: F) -> Multi<T>
  where
    F: Fn(&T) -> bool + Send + Sync + 'static,
  {
    self.transform(TakeWhileTransformer::new(predicate))
  }

  /// Runs one execution on the current task and returns its last value.
  ///
  /// Never returns for a source that does not terminate.
  pub async fn last(&self) -> Result<Option<T>, Cause> {
    self.last_on(Arc::new(TokioScheduler)).await
  }

  /// Like [`Multi::last`], with time-driven stages running on `scheduler`.
  pub async fn last_on(&self, scheduler: Arc<dyn Scheduler>) -> Result<Option<T>, Cause> {
    let mut signals = self.produce(&Context::new(scheduler));
    let mut last = None;
    while let Some(item) = signals.next().await {
      last = Some(item?);
    }
    Ok(last)
  }
}

impl<T> Clone for Multi<T> {
  fn clone(&self) -> Self {
    Self {
      produce: Arc::clone(&self.produce),
      name: self.name.clone(),
    }
  }
}

impl<T> Publisher for Multi<T>
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

impl<T> fmt::Debug for Multi<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Multi")
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}
