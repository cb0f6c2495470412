//! # Time & Scheduling
//!
//! Time-driven operators (`interval`, `delay_elements`) never touch a clock
//! directly. They ask the [`Scheduler`] carried by the subscription's
//! [`Context`](crate::traits::publisher::Context) for the current instant and for
//! futures that resolve at a deadline. Swapping the scheduler swaps the clock.
//!
//! ## Implementations
//!
//! - **[`TokioScheduler`]**: the default, backed by `tokio::time`. Under a paused
//!   tokio clock (`#[tokio::test(start_paused = true)]`) it becomes a virtual
//!   clock that auto-advances whenever the runtime is idle.
//! - **[`VirtualScheduler`]**: a manual clock. Time moves only when
//!   [`VirtualScheduler::advance`] is awaited, and timers fire in deadline order.
//!
//! Callback-style timers are available through [`Scheduler::schedule_once`] and
//! [`Scheduler::schedule_periodic`]; both return a [`TimerHandle`] that cancels
//! the timer.

mod tokio_scheduler;
mod virtual_scheduler;

pub use tokio_scheduler::TokioScheduler;
pub use virtual_scheduler::{VirtualScheduler, VirtualSleep};

use futures::future::BoxFuture;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// A one-shot callback.
pub type OnceCallback = Box<dyn FnOnce() + Send + 'static>;

/// A callback fired on every period.
pub type PeriodicCallback = Box<dyn FnMut() + Send + 'static>;

/// A monotonic clock that can wait for deadlines and fire callbacks.
pub trait Scheduler: Send + Sync + 'static {
  /// Returns the current instant of this clock.
  fn now(&self) -> Instant;

  /// Returns a future that resolves once the clock reaches `deadline`.
  ///
  /// Dropping the future releases the underlying timer.
  fn sleep_until(&self, deadline: Instant) -> BoxFuture<'static, ()>;

  /// Returns a future that resolves after `duration` has elapsed on this clock.
  fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
    self.sleep_until(self.now() + duration)
  }

  /// Runs `callback` once after `delay`.
  ///
  /// # Panics
  ///
  /// Must be called from within a tokio runtime.
  fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerHandle;

  /// Runs `callback` every `period`, first after one full period.
  ///
  /// # Panics
  ///
  /// Must be called from within a tokio runtime.
  fn schedule_periodic(&self, period: Duration, callback: PeriodicCallback) -> TimerHandle;
}

/// Handle to a timer created by [`Scheduler::schedule_once`] or
/// [`Scheduler::schedule_periodic`].
///
/// Dropping the handle leaves the timer running; call [`TimerHandle::cancel`]
/// to stop it.
#[derive(Debug, Clone)]
pub struct TimerHandle {
  token: CancellationToken,
}

impl TimerHandle {
  fn new() -> Self {
    Self {
      token: CancellationToken::new(),
    }
  }

  /// Stops the timer. Idempotent.
  pub fn cancel(&self) {
    self.token.cancel();
  }

  /// Returns `true` once [`TimerHandle::cancel`] has been called.
  pub fn is_cancelled(&self) -> bool {
    self.token.is_cancelled()
  }
}

/// Spawns the task behind [`Scheduler::schedule_once`].
pub(crate) fn spawn_once<S>(scheduler: &S, delay: Duration, callback: OnceCallback) -> TimerHandle
where
  S: Scheduler + ?Sized,
{
  let handle = TimerHandle::new();
  let token = handle.token.clone();
  let sleep = scheduler.sleep(delay);
  tokio::spawn(async move {
    tokio::select! {
      biased;
      _ = token.cancelled() => {}
      _ = sleep => callback(),
    }
  });
  handle
}

/// Spawns the task behind [`Scheduler::schedule_periodic`].
///
/// Deadlines are computed from the start instant, so a slow callback does not
/// shift later ticks.
pub(crate) fn spawn_periodic<S>(
  scheduler: S,
  period: Duration,
  mut callback: PeriodicCallback,
) -> TimerHandle
where
  S: Scheduler,
{
  let handle = TimerHandle::new();
  let token = handle.token.clone();
  let mut deadline = scheduler.now();
  tokio::spawn(async move {
    loop {
      deadline += period;
      let sleep = scheduler.sleep_until(deadline);
      tokio::select! {
        biased;
        _ = token.cancelled() => break,
        _ = sleep => callback(),
      }
    }
  });
  handle
}
