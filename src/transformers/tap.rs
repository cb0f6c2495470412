//! Observe-only transformers.
//!
//! - [`DoOnNextTransformer`] runs a side effect for every value.
//! - [`TryDoOnNextTransformer`] runs a fallible side effect; an `Err` ends the
//!   execution with that error.
//! - [`DoOnTerminateTransformer`] runs a hook exactly once per execution of its
//!   stage: just before a terminal signal passes through, or when the execution
//!   is dropped early (cancellation, `take`, a `retry` resubscription).
//!
//! None of them alter the signals they see.

use crate::error::Cause;
use crate::signal::{SignalStream, SignalStreamExt};
use crate::traits::publisher::Context;
use crate::traits::transformer::{Transformer, Upstream};
use futures::{Stream, StreamExt};
use pin_project::{pin_project, pinned_drop};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll, ready};

/// Runs a side effect for each value.
pub struct DoOnNextTransformer<F> {
  f: Arc<F>,
}

impl<F> DoOnNextTransformer<F> {
  /// Creates a new `DoOnNextTransformer`.
  ///
  /// # Arguments
  ///
  /// * `f` - Called with a reference to each value before it moves downstream.
  pub fn new(f: F) -> Self {
    Self { f: Arc::new(f) }
  }
}

impl<T, F> Transformer<T, T> for DoOnNextTransformer<F>
where
  T: Send + 'static,
  F: Fn(&T) + Send + Sync + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<T> {
    let f = Arc::clone(&self.f);
    upstream
      .produce(ctx)
      .inspect(move |item| {
        if let Ok(value) = item {
          f(value);
        }
      })
      .boxed()
  }
}

/// Runs a fallible side effect for each value.
pub struct TryDoOnNextTransformer<F> {
  f: Arc<F>,
}

impl<F> TryDoOnNextTransformer<F> {
  /// Creates a new `TryDoOnNextTransformer`.
  ///
  /// # Arguments
  ///
  /// * `f` - Called with a reference to each value; an `Err` replaces the value
  ///   with an error signal.
  pub fn new(f: F) -> Self {
    Self { f: Arc::new(f) }
  }
}

impl<T, F> Transformer<T, T> for TryDoOnNextTransformer<F>
where
  T: Send + 'static,
  F: Fn(&T) -> Result<(), Cause> + Send + Sync + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<T> {
    let f = Arc::clone(&self.f);
    upstream
      .produce(ctx)
      .map(move |item| item.and_then(|value| f(&value).map(|()| value)))
      .stop_after_error()
      .boxed()
  }
}

type Hook = Arc<dyn Fn() + Send + Sync>;

/// Runs a hook when its stage's execution terminates, whatever the reason.
pub struct DoOnTerminateTransformer {
  hook: Hook,
}

impl DoOnTerminateTransformer {
  /// Creates a new `DoOnTerminateTransformer`.
  ///
  /// # Arguments
  ///
  /// * `hook` - Runs exactly once per execution of this stage.
  pub fn new<F>(hook: F) -> Self
  where
    F: Fn() + Send + Sync + 'static,
  {
    Self {
      hook: Arc::new(hook),
    }
  }
}

impl<T> Transformer<T, T> for DoOnTerminateTransformer
where
  T: Send + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<T> {
    OnTerminate {
      inner: upstream.produce(ctx),
      hook: Some(Arc::clone(&self.hook)),
    }
    .boxed()
  }
}

#[pin_project(PinnedDrop)]
struct OnTerminate<S> {
  #[pin]
  inner: S,
  hook: Option<Hook>,
}

impl<T, S> Stream for OnTerminate<S>
where
  S: Stream<Item = Result<T, Cause>>,
{
  type Item = Result<T, Cause>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
    let this = self.project();
    let item = ready!(this.inner.poll_next(cx));
    if matches!(item, None | Some(Err(_))) {
      if let Some(hook) = this.hook.take() {
        hook();
      }
    }
    Poll::Ready(item)
  }
}

#[pinned_drop]
impl<S> PinnedDrop for OnTerminate<S> {
  fn drop(self: Pin<&mut Self>) {
    if let Some(hook) = self.project().hook.take() {
      hook();
    }
  }
}
