//! Zip transformer.
//!
//! Pairs the i-th value of the upstream with the i-th value of another
//! publisher and emits `combiner(left, right)`. Both sides run concurrently
//! within the same execution and share its context.
//!
//! Each side owns a single pending slot. A side is only polled while its slot
//! is empty, so neither side is read further ahead than the other. The output:
//!
//! - completes as soon as either side completes, because no further pair can
//!   form (a value already waiting in the other slot is discarded)
//! - fails with the first error from either side

use crate::error::Cause;
use crate::signal::SignalStream;
use crate::traits::publisher::{Context, Publisher};
use crate::traits::transformer::{Transformer, Upstream};
use futures::StreamExt;
use std::sync::Arc;

/// Combines the values of two publishers pairwise.
pub struct ZipWithTransformer<P, F> {
  other: P,
  combiner: Arc<F>,
}

impl<P, F> ZipWithTransformer<P, F> {
  /// Creates a new `ZipWithTransformer`.
  ///
  /// # Arguments
  ///
  /// * `other` - The publisher supplying the right-hand values.
  /// * `combiner` - Builds one output value from each pair.
  pub fn new(other: P, combiner: F) -> Self {
    Self {
      other,
      combiner: Arc::new(combiner),
    }
  }
}

enum Side<A, B> {
  Left(Option<Result<A, Cause>>),
  Right(Option<Result<B, Cause>>),
}

impl<A, B, C, P, F> Transformer<A, C> for ZipWithTransformer<P, F>
where
  A: Send + 'static,
  B: Send + 'static,
  C: Send + 'static,
  P: Publisher<Item = B>,
  F: Fn(A, B) -> C + Send + Sync + 'static,
{
  fn transform(&self, upstream: &Upstream<A>, ctx: &Context) -> SignalStream<C> {
    let combiner = Arc::clone(&self.combiner);
    let left = upstream.produce(ctx);
    let right = self.other.produce(ctx);
    Box::pin(async_stream::stream! {
      let (mut left, mut right) = (left, right);
      let mut pending_left: Option<A> = None;
      let mut pending_right: Option<B> = None;
      loop {
        let side = tokio::select! {
          biased;
          item = left.next(), if pending_left.is_none() => Side::Left(item),
          item = right.next(), if pending_right.is_none() => Side::Right(item),
        };
        match side {
          Side::Left(Some(Ok(a))) => pending_left = Some(a),
          Side::Right(Some(Ok(b))) => pending_right = Some(b),
          Side::Left(Some(Err(cause))) | Side::Right(Some(Err(cause))) => {
            yield Err(cause);
            return;
          }
          Side::Left(None) | Side::Right(None) => return,
        }
        match (pending_left.take(), pending_right.take()) {
          (Some(a), Some(b)) => yield Ok(combiner(a, b)),
          (a, b) => {
            pending_left = a;
            pending_right = b;
          }
        }
      }
    })
  }
}
