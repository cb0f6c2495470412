//! Collect-list transformer.
//!
//! Buffers every value of the upstream in emission order and, once the upstream
//! completes, emits the whole buffer as a single value. On upstream error the
//! partial buffer is discarded and the error is forwarded.

use crate::signal::SignalStream;
use crate::traits::publisher::Context;
use crate::traits::transformer::{Transformer, Upstream};
use futures::StreamExt;

/// Gathers all values into one `Vec`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectListTransformer;

impl CollectListTransformer {
  /// Creates a new `CollectListTransformer`.
  pub fn new() -> Self {
    Self
  }
}

impl<T> Transformer<T, Vec<T>> for CollectListTransformer
where
  T: Send + 'static,
{
  fn transform(&self, upstream: &Upstream<T>, ctx: &Context) -> SignalStream<Vec<T>> {
    let input = upstream.produce(ctx);
    Box::pin(async_stream::stream! {
      let mut input = input;
      let mut buffer = Vec::new();
      while let Some(item) = input.next().await {
        match item {
          Ok(value) => buffer.push(value),
          Err(cause) => {
            yield Err(cause);
            return;
          }
        }
      }
      yield Ok(buffer);
    })
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use crate::signal::collect_signals;

  #[tokio::test]
  async fn test_collect_list_emits_one_batch() {
    let batch = Multi::from_iterable(vec!["a", "b", "c"]).collect_list();
    let signals = collect_signals(&batch, &Context::default()).await;
    assert_eq!(
      signals,
      vec![Signal::Next(vec!["a", "b", "c"]), Signal::Complete]
    );
  }

  #[tokio::test]
  async fn test_collect_list_of_empty_upstream() {
    let batch = Multi::<u8>::empty().collect_list();
    let signals = collect_signals(&batch, &Context::default()).await;
    assert_eq!(signals, vec![Signal::Next(Vec::new()), Signal::Complete]);
  }

  #[tokio::test]
  async fn test_collect_list_discards_partial_buffer_on_error() {
    let batch = Multi::range(0, 5)
      .try_map(|n| if n < 3 { Ok(n) } else { Err(Cause::msg("stop")) })
      .collect_list();
    let signals = collect_signals(&batch, &Context::default()).await;
    assert_eq!(signals, vec![Signal::Error(Cause::msg("stop"))]);
  }
}
