//! # Subscription
//!
//! Subscribing starts one execution of a publisher and returns a
//! [`Subscription`] immediately. A dedicated driver task polls the execution's
//! signal stream and hands each signal to the [`Subscriber`], strictly one at a
//! time.
//!
//! ## Lifecycle
//!
//! A subscription is ACTIVE until the first of:
//!
//! - a terminal signal, reported as [`Termination::Completed`] or
//!   [`Termination::Failed`]
//! - [`Subscription::cancel`], reported as [`Termination::Cancelled`]
//!
//! Cancelling drops the signal stream. That releases every pending timer of the
//! execution and fires its `do_on_terminate` hooks. Once `cancel` returns, no new
//! handler invocation starts; a handler already running on another thread is
//! allowed to finish first.
//!
//! Dropping a `Subscription` does not cancel it.
//!
//! ## Waiting for termination
//!
//! [`Subscription::terminated`] resolves with the [`Termination`]. It is the
//! latch a caller awaits after subscribing to a time-driven pipeline.

use crate::error::Cause;
use crate::signal::{Signal, SignalStream, SignalStreamExt};
use crate::subscriber::Subscriber;
use futures::StreamExt;
use parking_lot::ReentrantMutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// How a subscription ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
  /// The publisher completed.
  Completed,
  /// The publisher failed.
  Failed {
    /// The error carried by the terminal signal.
    cause: Cause,
    /// `false` when the subscriber had no error handler.
    handled: bool,
  },
  /// The subscription was cancelled before a terminal signal was delivered.
  Cancelled,
}

impl Termination {
  /// Returns `true` for a failure no error handler caught.
  pub fn is_uncaught(&self) -> bool {
    matches!(self, Termination::Failed { handled: false, .. })
  }
}

/// Handle to one active publisher-to-subscriber relationship.
///
/// Clones refer to the same subscription.
#[derive(Clone)]
pub struct Subscription {
  shared: Arc<Shared>,
}

struct Shared {
  name: Option<Arc<str>>,
  token: CancellationToken,
  gate: ReentrantMutex<()>,
  outcome: watch::Sender<Option<Termination>>,
}

impl Shared {
  /// Runs `handler` unless the subscription was cancelled. Returns whether it
  /// ran.
  fn deliver(&self, handler: impl FnOnce()) -> bool {
    let _gate = self.gate.lock();
    if self.token.is_cancelled() {
      return false;
    }
    handler();
    true
  }

  /// Records the termination; only the first call has an effect.
  fn finish(&self, termination: Termination) {
    self.outcome.send_if_modified(|outcome| {
      if outcome.is_some() {
        return false;
      }
      debug!(publisher = self.name.as_deref(), ?termination, "subscription terminated");
      *outcome = Some(termination);
      true
    });
  }
}

impl Subscription {
  pub(crate) fn spawn<T>(
    name: Option<Arc<str>>,
    signals: SignalStream<T>,
    subscriber: Subscriber<T>,
  ) -> Self
  where
    T: Send + 'static,
  {
    let (outcome, _) = watch::channel(None);
    let shared = Arc::new(Shared {
      name,
      token: CancellationToken::new(),
      gate: ReentrantMutex::new(()),
      outcome,
    });
    debug!(publisher = shared.name.as_deref(), "subscribed");
    tokio::spawn(drive(signals, subscriber, Arc::clone(&shared)));
    Self { shared }
  }

  /// Cancels the subscription. Idempotent.
  ///
  /// After this returns no new handler invocation starts. May be called from
  /// inside one of the subscription's own handlers.
  pub fn cancel(&self) {
    if self.shared.token.is_cancelled() {
      return;
    }
    debug!(publisher = self.shared.name.as_deref(), "cancel requested");
    self.shared.token.cancel();
    // Wait out a handler that is running on another thread.
    drop(self.shared.gate.lock());
  }

  /// Returns `true` once [`Subscription::cancel`] has been called.
  pub fn is_cancelled(&self) -> bool {
    self.shared.token.is_cancelled()
  }

  /// Returns `true` once the subscription reached TERMINATED.
  pub fn is_terminated(&self) -> bool {
    self.shared.outcome.borrow().is_some()
  }

  /// Waits until the subscription terminates and reports how.
  pub async fn terminated(&self) -> Termination {
    let mut outcome = self.shared.outcome.subscribe();
    let termination = outcome
      .wait_for(Option::is_some)
      .await
      .map(|outcome| outcome.clone());
    match termination {
      Ok(Some(termination)) => termination,
      _ => Termination::Cancelled,
    }
  }
}

impl std::fmt::Debug for Subscription {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("name", &self.shared.name)
      .field("cancelled", &self.is_cancelled())
      .field("terminated", &self.is_terminated())
      .finish()
  }
}

async fn drive<T>(signals: SignalStream<T>, mut subscriber: Subscriber<T>, shared: Arc<Shared>)
where
  T: Send + 'static,
{
  // Resolve waiters even if a handler panics.
  let shared = scopeguard::guard(shared, |shared| shared.finish(Termination::Cancelled));
  let mut signals = signals.materialize();

  loop {
    let signal = tokio::select! {
      biased;
      _ = shared.token.cancelled() => None,
      signal = signals.next() => signal,
    };
    match signal {
      Some(Signal::Next(value)) => {
        trace!(publisher = shared.name.as_deref(), "next");
        if !shared.deliver(|| subscriber.next(value)) {
          break;
        }
      }
      Some(Signal::Error(cause)) => {
        let mut handled = true;
        let delivered = shared.deliver(|| handled = subscriber.error(cause.clone()));
        if delivered {
          shared.finish(Termination::Failed { cause, handled });
        }
        return;
      }
      Some(Signal::Complete) => {
        if shared.deliver(|| subscriber.complete()) {
          shared.finish(Termination::Completed);
        }
        return;
      }
      None => break,
    }
  }

  // Dropping the stream releases timers and fires terminate hooks before
  // waiters observe the cancellation.
  drop(signals);
  shared.finish(Termination::Cancelled);
}

#[cfg(test)]
mod tests {
  use super::*;
  use futures::stream;
  use std::sync::Mutex;
  use std::time::Duration;

  fn recording<T: Send + std::fmt::Debug + 'static>() -> (Subscriber<T>, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    let subscriber = Subscriber::new()
      .on_next(move |v: T| n.lock().unwrap().push(format!("next {v:?}")))
      .on_error(move |cause| e.lock().unwrap().push(format!("error {cause}")))
      .on_complete(move || c.lock().unwrap().push("complete".to_string()));
    (subscriber, log)
  }

  #[tokio::test]
  async fn test_completed_subscription() {
    let (subscriber, log) = recording::<i32>();
    let subscription = Subscription::spawn(None, stream::iter(vec![Ok(1), Ok(2)]).boxed(), subscriber);

    assert_eq!(subscription.terminated().await, Termination::Completed);
    assert!(subscription.is_terminated());
    assert_eq!(*log.lock().unwrap(), vec!["next 1", "next 2", "complete"]);
  }

  #[tokio::test]
  async fn test_failed_subscription_stops_at_error() {
    let (subscriber, log) = recording::<i32>();
    let signals = stream::iter(vec![Ok(1), Err(Cause::msg("bad")), Ok(3)]).boxed();
    let subscription = Subscription::spawn(None, signals, subscriber);

    let termination = subscription.terminated().await;
    assert_eq!(
      termination,
      Termination::Failed {
        cause: Cause::msg("bad"),
        handled: true
      }
    );
    assert!(!termination.is_uncaught());
    assert_eq!(*log.lock().unwrap(), vec!["next 1", "error bad"]);
  }

  #[tokio::test]
  async fn test_error_without_handler_is_uncaught() {
    let signals = stream::iter(vec![Err::<i32, _>(Cause::msg("lost"))]).boxed();
    let subscription = Subscription::spawn(None, signals, Subscriber::new());
    assert!(subscription.terminated().await.is_uncaught());
  }

  #[tokio::test(start_paused = true)]
  async fn test_cancel_stops_delivery() {
    let (subscriber, log) = recording::<u32>();
    let signals = stream::unfold(0u32, |n| async move {
      tokio::time::sleep(Duration::from_secs(1)).await;
      Some((Ok(n), n + 1))
    })
    .boxed();
    let subscription = Subscription::spawn(Some(Arc::from("ticks")), signals, subscriber);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    subscription.cancel();
    subscription.cancel();
    assert!(subscription.is_cancelled());
    assert_eq!(subscription.terminated().await, Termination::Cancelled);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(*log.lock().unwrap(), vec!["next 0", "next 1"]);
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn test_cancel_waits_for_running_handler() {
    use crate::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let hooks = Arc::new(AtomicUsize::new(0));
    let (s, f, h) = (started.clone(), finished.clone(), hooks.clone());

    let subscription = Multi::range(0, 1000)
      .do_on_terminate(move || {
        h.fetch_add(1, Ordering::SeqCst);
      })
      .subscribe(Subscriber::new().on_next(move |_: i32| {
        s.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        f.fetch_add(1, Ordering::SeqCst);
      }));

    tokio::time::sleep(Duration::from_millis(120)).await;
    subscription.cancel();
    let started_at_cancel = started.load(Ordering::SeqCst);
    assert!(started_at_cancel > 0);
    assert_eq!(started_at_cancel, finished.load(Ordering::SeqCst));

    assert_eq!(subscription.terminated().await, Termination::Cancelled);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(started.load(Ordering::SeqCst), started_at_cancel);
    assert_eq!(hooks.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_cancel_from_inside_handler() {
    let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (handle, record) = (slot.clone(), seen.clone());
    let subscriber = Subscriber::new().on_next(move |n: i32| {
      record.lock().unwrap().push(n);
      if n == 2 {
        if let Some(subscription) = handle.lock().unwrap().as_ref() {
          subscription.cancel();
        }
      }
    });

    let signals = stream::pending::<Result<i32, Cause>>();
    let signals = stream::iter(vec![Ok(1), Ok(2), Ok(3), Ok(4)]).chain(signals).boxed();
    let subscription = Subscription::spawn(None, signals, subscriber);
    *slot.lock().unwrap() = Some(subscription.clone());

    assert_eq!(subscription.terminated().await, Termination::Cancelled);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
  }
}
