//! Delay-elements transformer.
//!
//! Re-emits each value after the configured duration has elapsed on the
//! execution's scheduler. Values are delayed one after another, so order is
//! kept and completion follows the last delayed value. Errors are forwarded
//! without delay.

use crate::signal::SignalStream;
use crate::traits::publisher::Context;
use crate::traits::transformer::{Transformer, Upstream};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;

/// Delays every value by a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct DelayElementsTransformer {
  duration: Duration,
}

impl DelayElementsTransformer {
  /// Creates a new `DelayElementsTransformer`.
  ///
  /// # Arguments
  ///
  /// * `duration` - The delay applied before each value is re-emitted.
  pub fn new(duration: Duration) -> Self {
    Self { duration }
  }
}

impl<T> Transformer<T, T> for DelayElementsTransformer
where
  T: Send + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<T> {
    let duration = self.duration;
    let scheduler = Arc::clone(ctx.scheduler());
    let input = upstream.produce(ctx);
    Box::pin(async_stream::stream! {
      let mut input = input;
      while let Some(item) = input.next().await {
        match item {
          Ok(value) => {
            scheduler.sleep(duration).await;
            yield Ok(value);
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
