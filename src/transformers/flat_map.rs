//! Flat-map transformer.
//!
//! Maps every upstream value to an inner publisher, subscribes to it within the
//! same execution and merges the inner values into the output.
//!
//! ## Ordering
//!
//! Inner streams are always polled before the upstream, so an inner that is
//! ready right away is drained before the next upstream value is pulled. With
//! synchronous inners (`Single::just`, `Single::empty`, `from_callable`) the
//! output therefore follows upstream order. Inners that wait on the scheduler
//! interleave in whatever order they become ready.
//!
//! ## Termination
//!
//! The output completes once the upstream and every inner have completed. The
//! first error from any of them ends the output and drops the rest.

use crate::error::Cause;
use crate::signal::SignalStream;
use crate::traits::publisher::{Context, Publisher};
use crate::traits::transformer::{Transformer, Upstream};
use futures::StreamExt;
use futures::stream::SelectAll;
use std::sync::Arc;

/// Maps each value to a publisher and merges the results.
pub struct FlatMapTransformer<F> {
  f: Arc<F>,
}

impl<F> FlatMapTransformer<F> {
  /// Creates a new `FlatMapTransformer`.
  ///
  /// # Arguments
  ///
  /// * `f` - Builds the inner publisher for one upstream value.
  pub fn new(f: F) -> Self {
    Self { f: Arc::new(f) }
  }
}

enum Step<I, O> {
  Inner(Result<O, Cause>),
  Outer(Option<Result<I, Cause>>),
  Drained,
}

impl<I, O, P, F> Transformer<I, O> for FlatMapTransformer<F>
where
  I: Send + 'static,
  O: Send + 'static,
  P: Publisher<Item = O>,
  F: Fn(I) -> P + Send + Sync + 'static,
{
  fn transform(&self, upstream: &Upstream<I>, ctx: &Context) -> SignalStream<O> {
    let f = Arc::clone(&self.f);
    let ctx = ctx.clone();
    let outer = upstream.produce(&ctx);
    Box::pin(async_stream::stream! {
      let mut outer = outer;
      let mut outer_done = false;
      let mut inners: SelectAll<SignalStream<O>> = SelectAll::new();
      loop {
        let step = tokio::select! {
          biased;
          Some(item) = inners.next(), if !inners.is_empty() => Step::Inner(item),
          item = outer.next(), if !outer_done => Step::Outer(item),
          else => Step::Drained,
        };
        match step {
          Step::Inner(Ok(value)) => yield Ok(value),
          Step::Inner(Err(cause)) | Step::Outer(Some(Err(cause))) => {
            yield Err(cause);
            return;
          }
          Step::Outer(Some(Ok(value))) => inners.push(f(value).produce(&ctx)),
          Step::Outer(None) => outer_done = true,
          Step::Drained => return,
        }
      }
    })
  }
}
