//! # Publisher
//!
//! A publisher is a lazy, immutable description of a computation that emits
//! signals. Building or composing publishers runs no user code; execution starts
//! when [`Publisher::produce`] is called, which [`Publisher::subscribe`] does
//! once per subscription. Every call starts an independent execution (publishers
//! are cold).
//!
//! The [`Context`] handed to `produce` carries the [`Scheduler`] that
//! time-driven stages of that execution use.

use crate::scheduler::{Scheduler, TokioScheduler};
use crate::signal::SignalStream;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;
use std::fmt;
use std::sync::Arc;

/// The boxed function behind every publisher: builds one fresh signal stream
/// per execution.
pub type ProduceFn<T> = dyn Fn(&Context) -> SignalStream<T> + Send + Sync;

/// Per-subscription environment shared by every stage of one execution.
#[derive(Clone)]
pub struct Context {
  scheduler: Arc<dyn Scheduler>,
}

impl Context {
  /// Creates a context driven by `scheduler`.
  pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
    Self { scheduler }
  }

  /// The scheduler time-driven stages must use.
  pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
    &self.scheduler
  }
}

impl Default for Context {
  /// A context on [`TokioScheduler`].
  fn default() -> Self {
    Self::new(Arc::new(TokioScheduler))
  }
}

impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Context").finish_non_exhaustive()
  }
}

/// A lazy producer of signals.
///
/// Implementors supply [`Publisher::produce`]; subscribing is provided.
pub trait Publisher: Send + Sync + 'static {
  /// The type carried by `next` signals.
  type Item: Send + 'static;

  /// Starts one execution and returns its signals.
  fn produce(&self, ctx: &Context) -> SignalStream<Self::Item>;

  /// Diagnostic name, used in `tracing` events of subscriptions.
  fn name(&self) -> Option<&str> {
    None
  }

  /// Subscribes on the default [`TokioScheduler`].
  ///
  /// # Panics
  ///
  /// Must be called from within a tokio runtime.
  fn subscribe(&self, subscriber: Subscriber<Self::Item>) -> Subscription {
    self.subscribe_on(Arc::new(TokioScheduler), subscriber)
  }

  /// Subscribes with time-driven stages running on `scheduler`.
  ///
  /// Returns immediately; signals are delivered from a dedicated driver task.
  ///
  /// # Panics
  ///
  /// Must be called from within a tokio runtime.
  fn subscribe_on(
    &self,
    scheduler: Arc<dyn Scheduler>,
    subscriber: Subscriber<Self::Item>,
  ) -> Subscription {
    let signals = self.produce(&Context::new(scheduler));
    Subscription::spawn(self.name().map(Arc::from), signals, subscriber)
  }
}
