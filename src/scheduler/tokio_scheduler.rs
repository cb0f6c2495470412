use super::{OnceCallback, PeriodicCallback, Scheduler, TimerHandle, spawn_once, spawn_periodic};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::time::Instant;

/// Scheduler backed by `tokio::time`.
///
/// Uses the wall clock in normal runs. When the tokio clock is paused (as in
/// `#[tokio::test(start_paused = true)]`) every deadline is virtual and the
/// runtime skips ahead to it as soon as all tasks are idle.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
  fn now(&self) -> Instant {
    Instant::now()
  }

  fn sleep_until(&self, deadline: Instant) -> BoxFuture<'static, ()> {
    tokio::time::sleep_until(deadline).boxed()
  }

  fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerHandle {
    spawn_once(self, delay, callback)
  }

  fn schedule_periodic(&self, period: Duration, callback: PeriodicCallback) -> TimerHandle {
    spawn_periodic(*self, period, callback)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test(start_paused = true)]
  async fn test_sleep_advances_paused_clock() {
    let scheduler = TokioScheduler;
    let start = scheduler.now();
    scheduler.sleep(Duration::from_secs(3)).await;
    assert!(scheduler.now() - start >= Duration::from_secs(3));
  }

  #[tokio::test(start_paused = true)]
  async fn test_sleep_until_past_deadline_is_immediate() {
    let scheduler = TokioScheduler;
    let start = scheduler.now();
    scheduler.sleep_until(start).await;
    assert_eq!(scheduler.now(), start);
  }
}
