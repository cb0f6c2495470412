//! Retry transformer.
//!
//! On an upstream error, drops the failed execution and starts a fresh one, up
//! to `max_retries` times. The error after the last permitted retry is
//! forwarded. Values forwarded by earlier attempts stay forwarded.
//!
//! ## State machine
//!
//! - **ATTEMPTING** (counter starts at 0): forward values; on error, if
//!   `counter < max_retries` then increment and resubscribe, else go to DONE
//!   with the error
//! - **DONE**: reached on completion or on the final error
//!
//! Each resubscription is reported as a `tracing` warning.

use crate::signal::SignalStream;
use crate::traits::publisher::Context;
use crate::traits::transformer::{Transformer, Upstream};
use futures::StreamExt;
use tracing::warn;

/// Resubscribes to the upstream after errors.
#[derive(Debug, Clone, Copy)]
pub struct RetryTransformer {
  max_retries: usize,
}

impl RetryTransformer {
  /// Creates a new `RetryTransformer`.
  ///
  /// # Arguments
  ///
  /// * `max_retries` - How many times a failed upstream is resubscribed.
  pub fn new(max_retries: usize) -> Self {
    Self { max_retries }
  }
}

impl<T> Transformer<T, T> for RetryTransformer
where
  T: Send + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<T> {
    let max_retries = self.max_retries;
    let upstream = upstream.clone();
    let ctx = ctx.clone();
    Box::pin(async_stream::stream! {
      let mut retries = 0usize;
      let mut attempt = upstream.produce(&ctx);
      loop {
        let item = attempt.next().await;
        match item {
          Some(Ok(value)) => yield Ok(value),
          Some(Err(cause)) if retries < max_retries => {
            retries += 1;
            warn!(retries, max_retries, error = %cause, "upstream failed, resubscribing");
            drop(attempt);
            attempt = upstream.produce(&ctx);
          }
          Some(Err(cause)) => {
            yield Err(cause);
            return;
          }
          None => return,
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

  /// A source that fails on its first `failures` subscriptions.
  fn flaky(failures: usize) -> (Arc<AtomicUsize>, Single<&'static str>) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let source = Single::from_callable(move || {
      if counter.fetch_add(1, Ordering::SeqCst) < failures {
        Err(Cause::msg("transient"))
      } else {
        Ok("ok")
      }
    });
    (attempts, source)
  }

  #[tokio::test]
  async fn test_retry_recovers_within_limit() {
    let (attempts, source) = flaky(2);
    let signals = collect_signals(&source.retry(2), &Context::default()).await;
    assert_eq!(signals, vec![Signal::Next("ok"), Signal::Complete]);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn test_retry_exhausted_forwards_last_error() {
    let (attempts, source) = flaky(10);
    let signals = collect_signals(&source.retry(3), &Context::default()).await;
    assert_eq!(signals, vec![Signal::Error(Cause::msg("transient"))]);
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
  }

  #[tokio::test]
  async fn test_retry_zero_is_passthrough() {
    let (attempts, source) = flaky(1);
    let signals = collect_signals(&source.retry(0), &Context::default()).await;
    assert_eq!(signals, vec![Signal::Error(Cause::msg("transient"))]);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_retry_does_not_unemit_values() {
    let pipeline = Multi::range(0, 4)
      .try_map(|n| if n < 2 { Ok(n) } else { Err(Cause::msg("at two")) })
      .retry(1);
    let signals = collect_signals(&pipeline, &Context::default()).await;
    assert_eq!(
      signals,
      vec![
        Signal::Next(0),
        Signal::Next(1),
        Signal::Next(0),
        Signal::Next(1),
        Signal::Error(Cause::msg("at two"))
      ]
    );
  }

  #[tokio::test(start_paused = true)]
  async fn test_retry_restarts_interval_from_zero() {
    let pipeline = Multi::interval(Duration::from_secs(1))
      .try_map(|i| if i >= 2 { Err(Cause::msg("enough")) } else { Ok(i) })
      .retry(2);
    let signals = collect_signals(&pipeline, &Context::default()).await;
    let values: Vec<u64> = signals
      .iter()
      .filter_map(|signal| match signal {
        Signal::Next(i) => Some(*i),
        _ => None,
      })
      .collect();
    assert_eq!(values, vec![0, 1, 0, 1, 0, 1]);
    assert_eq!(signals.last(), Some(&Signal::Error(Cause::msg("enough"))));
  }
}
