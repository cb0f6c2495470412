//! # Demonstrations
//!
//! Small fixed pipelines that exercise the core, one per [`DemoKind`]. Every
//! demo follows the same shape:
//!
//! 1. build the pipeline,
//! 2. subscribe on the scheduler of the [`DemoEnv`],
//! 3. await the subscription's termination,
//! 4. report an error that no handler caught to the sink and as
//!    [`DemoError::Uncaught`].
//!
//! Output goes to the injected [`LogSink`](sink::LogSink), never to a global
//! logger, so tests can assert on the exact lines.

pub mod comments;
pub mod models;
pub mod persons;
pub mod ranges;
pub mod sink;

use crate::error::Cause;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::subscription::{Subscription, Termination};
use sink::{LogSink, TracingSink};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// The available demonstrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum DemoKind {
  /// Names to persons, keep the Bruces, log each and a completion line.
  Iterable,
  /// Like `iterable`, selecting through flat-map.
  FlatMap,
  /// Upper-cased full names filtered through flat-map, then lower-cased.
  ToString,
  /// Seven persons gathered into one list.
  CollectList,
  /// A person zipped with their comments.
  ZipWith,
  /// Like `zip-with`, through a tuple.
  ZipWithTuple,
  /// Like `zip-with`, through flat-map.
  UserCommentsFlatMap,
  /// Two ranges zipped into formatted lines.
  ZipWithRanges,
  /// A range paced by an interval.
  Interval,
  /// A range with every element delayed.
  DelayElements,
  /// An interval failing at five, retried twice.
  IntervalRetry,
}

impl DemoKind {
  /// Every demo, in presentation order.
  pub const ALL: [DemoKind; 11] = [
    DemoKind::Iterable,
    DemoKind::FlatMap,
    DemoKind::ToString,
    DemoKind::CollectList,
    DemoKind::ZipWith,
    DemoKind::ZipWithTuple,
    DemoKind::UserCommentsFlatMap,
    DemoKind::ZipWithRanges,
    DemoKind::Interval,
    DemoKind::DelayElements,
    DemoKind::IntervalRetry,
  ];

  /// The command-line name of the demo.
  pub fn name(&self) -> &'static str {
    match self {
      DemoKind::Iterable => "iterable",
      DemoKind::FlatMap => "flat-map",
      DemoKind::ToString => "to-string",
      DemoKind::CollectList => "collect-list",
      DemoKind::ZipWith => "zip-with",
      DemoKind::ZipWithTuple => "zip-with-tuple",
      DemoKind::UserCommentsFlatMap => "user-comments-flat-map",
      DemoKind::ZipWithRanges => "zip-with-ranges",
      DemoKind::Interval => "interval",
      DemoKind::DelayElements => "delay-elements",
      DemoKind::IntervalRetry => "interval-retry",
    }
  }

  /// Returns `true` for demos paced by the scheduler.
  pub fn is_timed(&self) -> bool {
    matches!(
      self,
      DemoKind::Interval | DemoKind::DelayElements | DemoKind::IntervalRetry
    )
  }
}

impl fmt::Display for DemoKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Why a demo did not finish cleanly.
#[derive(Debug, Error)]
pub enum DemoError {
  /// An error reached a subscriber without an error handler.
  #[error("uncaught error: {0}")]
  Uncaught(#[source] Cause),
  /// The run was cancelled by its timeout.
  #[error("demo did not terminate within {0:?}")]
  TimedOut(Duration),
  /// The subscription was cancelled by someone else.
  #[error("subscription was cancelled")]
  Cancelled,
}

/// What a demo runs against.
#[derive(Clone)]
pub struct DemoEnv {
  sink: Arc<dyn LogSink>,
  scheduler: Arc<dyn Scheduler>,
  period: Duration,
  timeout: Option<Duration>,
}

impl DemoEnv {
  /// Period of the timed demos unless configured otherwise.
  pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

  /// An environment writing to `sink`, on [`TokioScheduler`], with the default
  /// period and no timeout.
  pub fn new(sink: Arc<dyn LogSink>) -> Self {
    Self {
      sink,
      scheduler: Arc::new(TokioScheduler),
      period: Self::DEFAULT_PERIOD,
      timeout: None,
    }
  }

  /// Runs timed stages on `scheduler`.
  pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
    self.scheduler = scheduler;
    self
  }

  /// Sets the tick period of the timed demos.
  pub fn with_period(mut self, period: Duration) -> Self {
    self.period = period;
    self
  }

  /// Cancels a demo still running after `timeout`.
  pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.timeout = timeout;
    self
  }

  /// The sink demo output goes to.
  pub fn sink(&self) -> &Arc<dyn LogSink> {
    &self.sink
  }

  /// The scheduler subscriptions run on.
  pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
    &self.scheduler
  }

  /// The tick period of the timed demos.
  pub fn period(&self) -> Duration {
    self.period
  }
}

impl Default for DemoEnv {
  fn default() -> Self {
    Self::new(Arc::new(TracingSink))
  }
}

impl fmt::Debug for DemoEnv {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DemoEnv")
      .field("period", &self.period)
      .field("timeout", &self.timeout)
      .finish_non_exhaustive()
  }
}

/// Runs one demo to termination.
///
/// # Errors
///
/// See [`DemoError`].
pub async fn run(kind: DemoKind, env: &DemoEnv) -> Result<(), DemoError> {
  info!(demo = %kind, period = ?env.period, "running demo");
  let result = match kind {
    DemoKind::Iterable => persons::iterable(env).await,
    DemoKind::FlatMap => persons::flat_map(env).await,
    DemoKind::ToString => persons::to_string(env).await,
    DemoKind::CollectList => persons::collect_list(env).await,
    DemoKind::ZipWith => comments::zip_with(env).await,
    DemoKind::ZipWithTuple => comments::zip_with_tuple(env).await,
    DemoKind::UserCommentsFlatMap => comments::user_comments_flat_map(env).await,
    DemoKind::ZipWithRanges => ranges::zip_with_ranges(env).await,
    DemoKind::Interval => ranges::interval(env).await,
    DemoKind::DelayElements => ranges::delay_elements(env).await,
    DemoKind::IntervalRetry => ranges::interval_retry(env).await,
  };
  debug!(demo = %kind, ok = result.is_ok(), "demo finished");
  result
}

/// Waits for `subscription` to terminate, cancelling it once the timeout of
/// `env` elapses.
pub(crate) async fn await_termination(
  subscription: Subscription,
  env: &DemoEnv,
) -> Result<(), DemoError> {
  let timed_out = Arc::new(AtomicBool::new(false));
  let timer = env.timeout.map(|timeout| {
    let subscription = subscription.clone();
    let timed_out = Arc::clone(&timed_out);
    env.scheduler.schedule_once(
      timeout,
      Box::new(move || {
        timed_out.store(true, Ordering::SeqCst);
        subscription.cancel();
      }),
    )
  });
  let termination = subscription.terminated().await;
  if let Some(timer) = timer {
    timer.cancel();
  }
  match termination {
    Termination::Completed | Termination::Failed { handled: true, .. } => Ok(()),
    Termination::Failed { cause, .. } => {
      env.sink.error(&cause.to_string());
      Err(DemoError::Uncaught(cause))
    }
    Termination::Cancelled => match env.timeout {
      Some(timeout) if timed_out.load(Ordering::SeqCst) => Err(DemoError::TimedOut(timeout)),
      _ => Err(DemoError::Cancelled),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prelude::*;
  use sink::MemorySink;

  #[test]
  fn test_names_round_trip_through_clap() {
    use clap::ValueEnum;
    for kind in DemoKind::ALL {
      assert_eq!(DemoKind::from_str(kind.name(), false), Ok(kind));
    }
  }

  #[tokio::test(start_paused = true)]
  async fn test_timeout_cancels_endless_subscription() {
    let env = DemoEnv::new(Arc::new(MemorySink::new())).with_timeout(Some(Duration::from_secs(3)));
    let subscription = Multi::interval(Duration::from_secs(1)).subscribe_on(
      Arc::clone(env.scheduler()),
      Subscriber::new(),
    );
    let outcome = await_termination(subscription.clone(), &env).await;
    assert!(matches!(outcome, Err(DemoError::TimedOut(t)) if t == Duration::from_secs(3)));
    assert!(subscription.is_cancelled());
  }

  #[tokio::test(start_paused = true)]
  async fn test_external_cancel_is_not_a_timeout() {
    let env = DemoEnv::new(Arc::new(MemorySink::new())).with_timeout(Some(Duration::from_secs(30)));
    let subscription = Multi::interval(Duration::from_secs(1)).subscribe_on(
      Arc::clone(env.scheduler()),
      Subscriber::new(),
    );
    let canceller = subscription.clone();
    tokio::spawn(async move {
      tokio::time::sleep(Duration::from_secs(2)).await;
      canceller.cancel();
    });
    let outcome = await_termination(subscription, &env).await;
    assert!(matches!(outcome, Err(DemoError::Cancelled)));
  }

  #[tokio::test]
  async fn test_uncaught_error_is_reported() {
    let sink = MemorySink::new();
    let env = DemoEnv::new(Arc::new(sink.clone()));
    let subscription = Single::<i32>::error(Cause::msg("nobody")).subscribe(Subscriber::new());
    let outcome = await_termination(subscription, &env).await;
    assert!(matches!(outcome, Err(DemoError::Uncaught(cause)) if cause.message() == "nobody"));
    assert_eq!(sink.lines(), vec![(sink::Severity::Error, "nobody".to_string())]);
  }

  #[tokio::test]
  async fn test_handled_error_stays_out_of_sink() {
    let sink = MemorySink::new();
    let env = DemoEnv::new(Arc::new(sink.clone()));
    let subscription = Single::<i32>::error(Cause::msg("seen")).subscribe(Subscriber::new().on_error(|_| {}));
    assert!(await_termination(subscription, &env).await.is_ok());
    assert!(sink.lines().is_empty());
  }

  #[tokio::test]
  async fn test_handled_error_is_not_a_failure() {
    let env = DemoEnv::new(Arc::new(MemorySink::new()));
    let subscription = Single::<i32>::error(Cause::msg("seen")).subscribe(Subscriber::new().on_error(|_| {}));
    assert!(await_termination(subscription, &env).await.is_ok());
  }
}
