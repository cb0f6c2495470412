use super::{OnceCallback, PeriodicCallback, Scheduler, TimerHandle, spawn_once, spawn_periodic};
use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::time::Instant;

/// Yields handed to the runtime after each fired timer, so that woken tasks run
/// and register their next deadline before the clock moves on.
const SETTLE_ROUNDS: usize = 16;

/// A manually driven clock.
///
/// Time stands still until [`VirtualScheduler::advance`] is awaited. Advancing
/// fires pending timers one deadline at a time, in order, and lets the woken
/// tasks run between deadlines. Clones share the same clock.
///
/// Advancing yields to the runtime a fixed number of times after each timer
/// fires and relies on the woken tasks running during those yields. That only
/// holds on a current-thread runtime, the flavor `#[tokio::test]` uses by
/// default.
///
/// ```rust
/// use reactive_primer::scheduler::{Scheduler, VirtualScheduler};
/// use std::time::Duration;
///
/// # async fn example() {
/// let clock = VirtualScheduler::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(5)).await;
/// assert_eq!(clock.now() - start, Duration::from_secs(5));
/// # }
/// ```
#[derive(Clone)]
pub struct VirtualScheduler {
  clock: Arc<Mutex<VirtualClock>>,
}

struct VirtualClock {
  origin: Instant,
  elapsed: Duration,
  next_id: u64,
  timers: BTreeMap<(Duration, u64), Waker>,
}

impl VirtualScheduler {
  /// Creates a clock whose `now()` starts at the current instant.
  pub fn new() -> Self {
    Self {
      clock: Arc::new(Mutex::new(VirtualClock {
        origin: Instant::now(),
        elapsed: Duration::ZERO,
        next_id: 0,
        timers: BTreeMap::new(),
      })),
    }
  }

  /// Time elapsed on this clock since it was created.
  pub fn elapsed(&self) -> Duration {
    self.clock.lock().elapsed
  }

  /// Number of sleeps currently waiting for a deadline.
  pub fn pending_timers(&self) -> usize {
    self.clock.lock().timers.len()
  }

  /// Moves the clock forward by `by`, firing every timer that falls due on the
  /// way in deadline order.
  ///
  /// # Panics
  ///
  /// Panics outside a current-thread tokio runtime.
  pub async fn advance(&self, by: Duration) {
    assert!(
      matches!(Handle::current().runtime_flavor(), RuntimeFlavor::CurrentThread),
      "VirtualScheduler::advance requires a current-thread runtime"
    );
    settle().await;
    let target = self.clock.lock().elapsed + by;
    loop {
      let due = {
        let mut clock = self.clock.lock();
        match clock.timers.first_key_value() {
          Some((&(deadline, id), _)) if deadline <= target => {
            clock.elapsed = clock.elapsed.max(deadline);
            clock.timers.remove(&(deadline, id))
          }
          _ => None,
        }
      };
      match due {
        Some(waker) => {
          waker.wake();
          settle().await;
        }
        None => break,
      }
    }
    self.clock.lock().elapsed = target;
    settle().await;
  }

  fn offset_of(&self, deadline: Instant) -> Duration {
    deadline.saturating_duration_since(self.clock.lock().origin)
  }
}

impl Default for VirtualScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for VirtualScheduler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let clock = self.clock.lock();
    f.debug_struct("VirtualScheduler")
      .field("elapsed", &clock.elapsed)
      .field("pending_timers", &clock.timers.len())
      .finish()
  }
}

impl Scheduler for VirtualScheduler {
  fn now(&self) -> Instant {
    let clock = self.clock.lock();
    clock.origin + clock.elapsed
  }

  fn sleep_until(&self, deadline: Instant) -> BoxFuture<'static, ()> {
    VirtualSleep {
      clock: Arc::clone(&self.clock),
      deadline: self.offset_of(deadline),
      id: None,
    }
    .boxed()
  }

  fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerHandle {
    spawn_once(self, delay, callback)
  }

  fn schedule_periodic(&self, period: Duration, callback: PeriodicCallback) -> TimerHandle {
    spawn_periodic(self.clone(), period, callback)
  }
}

/// Future returned by [`VirtualScheduler`]'s `sleep_until`.
pub struct VirtualSleep {
  clock: Arc<Mutex<VirtualClock>>,
  deadline: Duration,
  id: Option<u64>,
}

impl Future for VirtualSleep {
  type Output = ();

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
    let deadline = self.deadline;
    let shared = Arc::clone(&self.clock);
    let mut clock = shared.lock();
    if clock.elapsed >= deadline {
      if let Some(id) = self.id.take() {
        clock.timers.remove(&(deadline, id));
      }
      return Poll::Ready(());
    }
    let id = match self.id {
      Some(id) => id,
      None => {
        let id = clock.next_id;
        clock.next_id += 1;
        self.id = Some(id);
        id
      }
    };
    clock.timers.insert((deadline, id), cx.waker().clone());
    Poll::Pending
  }
}

impl Drop for VirtualSleep {
  fn drop(&mut self) {
    if let Some(id) = self.id.take() {
      self.clock.lock().timers.remove(&(self.deadline, id));
    }
  }
}

async fn settle() {
  for _ in 0..SETTLE_ROUNDS {
    tokio::task::yield_now().await;
  }
}
