//! Sequence sources.

use crate::error::Cause;
use crate::multi::Multi;
use futures::{StreamExt, stream};

impl<T> Multi<T>
where
  T: Send + 'static,
{
  /// Emits the elements of `iterable` in order, then completes.
  ///
  /// Each subscription iterates a fresh clone of `iterable`.
  pub fn from_iterable<I>(iterable: I) -> Self
  where
    I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
    I::IntoIter: Send + 'static,
  {
    Multi::from_fn(move |_| stream::iter(iterable.clone().into_iter().map(Ok)).boxed())
  }
}

impl Multi<i32> {
  /// Emits `start`, `start + 1`, ..., `start + count - 1`, then completes.
  ///
  /// A range running past `i32::MAX` fails on subscription.
  pub fn range(start: i32, count: u32) -> Self {
    let end = i64::from(start) + i64::from(count);
    if end - 1 > i64::from(i32::MAX) {
      return Multi::error(Cause::msg(format!(
        "range of {count} values starting at {start} overflows i32"
      )));
    }
    Multi::from_fn(move |_| stream::iter((i64::from(start)..end).map(|n| Ok(n as i32))).boxed())
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use crate::signal::collect_signals;

  #[tokio::test]
  async fn test_from_iterable_reiterates_per_subscription() {
    let names = Multi::from_iterable(vec!["ana".to_string(), "luis".to_string()]);
    let ctx = Context::default();
    let first = collect_signals(&names, &ctx).await;
    let second = collect_signals(&names, &ctx).await;
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
  }

  #[tokio::test]
  async fn test_range_bounds() {
    let signals = collect_signals(&Multi::range(-1, 3), &Context::default()).await;
    assert_eq!(
      signals,
      vec![Signal::Next(-1), Signal::Next(0), Signal::Next(1), Signal::Complete]
    );
  }

  #[tokio::test]
  async fn test_empty_range_completes() {
    let signals = collect_signals(&Multi::range(5, 0), &Context::default()).await;
    assert_eq!(signals, vec![Signal::Complete]);
  }

  #[tokio::test]
  async fn test_range_up_to_max() {
    let signals = collect_signals(&Multi::range(i32::MAX - 1, 2), &Context::default()).await;
    assert_eq!(
      signals,
      vec![Signal::Next(i32::MAX - 1), Signal::Next(i32::MAX), Signal::Complete]
    );
  }

  #[tokio::test]
  async fn test_range_overflow_fails_on_subscribe() {
    let signals = collect_signals(&Multi::range(i32::MAX, 2), &Context::default()).await;
    assert!(matches!(signals.as_slice(), [Signal::Error(_)]));
  }
}
