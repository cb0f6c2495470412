//! Periodic source.

use crate::multi::Multi;
use std::sync::Arc;
use std::time::Duration;

impl Multi<u64> {
  /// Emits 0, 1, 2, ... with element `k` arriving `(k + 1) * period` after the
  /// subscription started, measured on the subscription's scheduler.
  ///
  /// Deadlines are absolute, so a slow subscriber does not make the sequence
  /// drift. Never completes on its own; bound it with `take`, `take_while`, a
  /// zip with a finite publisher, or cancellation.
  pub fn interval(period: Duration) -> Self {
    Multi::from_fn(move |ctx| {
      let scheduler = Arc::clone(ctx.scheduler());
      let start = scheduler.now();
      Box::pin(async_stream::stream! {
        let mut deadline = start;
        for tick in 0u64.. {
          deadline += period;
          scheduler.sleep_until(deadline).await;
          yield Ok(tick);
        }
      })
    })
  }
}
