//! Deferred single-value source.

use crate::error::Cause;
use crate::single::Single;
use futures::{StreamExt, stream};
use std::sync::Arc;

impl<T> Single<T>
where
  T: Send + 'static,
{
  /// Calls `f` once per subscription, when the execution first runs, and emits
  /// its result.
  ///
  /// An `Err` from `f` becomes the error signal.
  pub fn from_callable<F>(f: F) -> Self
  where
    F: Fn() -> Result<T, Cause> + Send + Sync + 'static,
  {
    let f = Arc::new(f);
    Single::from_fn(move |_| {
      let f = Arc::clone(&f);
      stream::once(async move { f() }).boxed()
    })
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use crate::signal::collect_signals;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[tokio::test]
  async fn test_from_callable_is_lazy_and_repeats() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let source = Single::from_callable(move || Ok(counter.fetch_add(1, Ordering::SeqCst)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(source.value().await, Ok(Some(0)));
    assert_eq!(source.value().await, Ok(Some(1)));
  }

  #[tokio::test]
  async fn test_from_callable_failure_is_error_signal() {
    let source = Single::<i32>::from_callable(|| Err(Cause::msg("no data")));
    let signals = collect_signals(&source, &Context::default()).await;
    assert_eq!(signals, vec![Signal::Error(Cause::msg("no data"))]);
  }
}
