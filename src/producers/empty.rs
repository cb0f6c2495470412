//! Sources that terminate without emitting a value.

use crate::error::Cause;
use crate::multi::Multi;
use crate::single::Single;
use futures::{StreamExt, stream};

impl<T> Single<T>
where
  T: Send + 'static,
{
  /// Completes immediately.
  pub fn empty() -> Self {
    Single::from_fn(|_| stream::empty().boxed())
  }

  /// Fails immediately with `cause`.
  pub fn error(cause: Cause) -> Self {
    Single::from_fn(move |_| stream::iter(Some(Err(cause.clone()))).boxed())
  }
}

impl<T> Multi<T>
where
  T: Send + 'static,
{
  /// Completes immediately.
  pub fn empty() -> Self {
    Multi::from_fn(|_| stream::empty().boxed())
  }

  /// Fails immediately with `cause`.
  pub fn error(cause: Cause) -> Self {
    Multi::from_fn(move |_| stream::iter(Some(Err(cause.clone()))).boxed())
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use crate::signal::collect_signals;

  #[tokio::test]
  async fn test_empty_completes() {
    let signals = collect_signals(&Single::<()>::empty(), &Context::default()).await;
    assert_eq!(signals, vec![Signal::Complete]);
    let signals = collect_signals(&Multi::<()>::empty(), &Context::default()).await;
    assert_eq!(signals, vec![Signal::Complete]);
  }

  #[tokio::test]
  async fn test_error_fails_every_subscription() {
    let failing = Multi::<u8>::error(Cause::msg("boom"));
    for _ in 0..2 {
      let signals = collect_signals(&failing, &Context::default()).await;
      assert_eq!(signals, vec![Signal::Error(Cause::msg("boom"))]);
    }
  }
}
