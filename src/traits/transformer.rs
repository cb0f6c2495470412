//! # Transformer
//!
//! An operator is a value implementing [`Transformer`]: given the upstream of
//! one execution, it builds the downstream signal stream. Most transformers
//! produce the upstream exactly once and adapt its stream; `retry` produces it
//! again after each failure, which is why transformers receive an [`Upstream`]
//! rather than a ready-made stream.
//!
//! Per-execution state (counters, buffers, pending pairs) lives inside the
//! stream a transformer returns, so one transformer value can serve any number
//! of concurrent subscriptions.

use crate::signal::SignalStream;
use crate::traits::publisher::{Context, ProduceFn};
use std::sync::Arc;

/// The publisher an operator wraps, reduced to its ability to start executions.
pub struct Upstream<T> {
  produce: Arc<ProduceFn<T>>,
}

impl<T> Upstream<T> {
  pub(crate) fn new(produce: Arc<ProduceFn<T>>) -> Self {
    Self { produce }
  }

  /// Starts one execution of the upstream.
  pub fn produce(&self, ctx: &Context) -> SignalStream<T> {
    (self.produce)(ctx)
  }
}

impl<T> Clone for Upstream<T> {
  fn clone(&self) -> Self {
    Self {
      produce: Arc::clone(&self.produce),
    }
  }
}

/// An operator turning signals of `I` into signals of `O`.
pub trait Transformer<I, O>: Send + Sync + 'static {
  /// Builds the output stream of one execution.
  fn transform(&self, upstream: &Upstream<I>, ctx: &Context) -> SignalStream<O>;
}

/// Binds a transformer to its upstream, yielding the produce function of the
/// resulting publisher.
pub(crate) fn lift<I, O, X>(upstream: Upstream<I>, transformer: X) -> Arc<ProduceFn<O>>
where
  I: 'static,
  O: 'static,
  X: Transformer<I, O>,
{
  Arc::new(move |ctx: &Context| transformer.transform(&upstream, ctx))
}
