//! # Signals
//!
//! A producer talks to its subscriber with three kinds of signals: `next(value)`,
//! `error(cause)` and `complete`. At most one terminal signal (`error` or
//! `complete`) is ever delivered, and nothing follows it.
//!
//! Inside an operator chain signals travel as a [`SignalStream`]: a boxed
//! `futures::Stream` of `Result<T, Cause>`. An `Ok` item is `next`, an `Err` item
//! is `error`, and the end of the stream is `complete`. The adapters in this
//! module enforce the terminal-signal rule on top of that encoding:
//!
//! - [`StopAfterError`] ends a stream right after its first `Err`
//! - [`Materialize`] turns the encoding back into explicit [`Signal`] values
//!
//! ```rust
//! use futures::{stream, StreamExt};
//! use reactive_primer::error::Cause;
//! use reactive_primer::signal::{Signal, SignalStreamExt};
//!
//! # async fn example() {
//! let items = stream::iter(vec![Ok(1), Err(Cause::msg("bad")), Ok(3)]);
//! let signals: Vec<Signal<i32>> = items.materialize().collect().await;
//! assert_eq!(signals, vec![Signal::Next(1), Signal::Error(Cause::msg("bad"))]);
//! # }
//! ```

use crate::error::Cause;
use crate::traits::publisher::{Context, Publisher};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll, ready};

/// The stream of signals produced by one subscription of a publisher.
pub type SignalStream<T> = BoxStream<'static, Result<T, Cause>>;

/// One signal delivered to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal<T> {
  /// A value.
  Next(T),
  /// Terminal failure.
  Error(Cause),
  /// Terminal success.
  Complete,
}

impl<T> Signal<T> {
  /// Returns `true` for `Error` and `Complete`.
  pub fn is_terminal(&self) -> bool {
    !matches!(self, Signal::Next(_))
  }
}

/// Adapters for streams of `Result<T, Cause>`.
pub trait SignalStreamExt<T>: Stream<Item = Result<T, Cause>> + Sized {
  /// Ends the stream right after the first error.
  fn stop_after_error(self) -> StopAfterError<Self> {
    StopAfterError {
      inner: self,
      done: false,
    }
  }

  /// Converts the stream into explicit signals, ending with exactly one
  /// terminal signal.
  fn materialize(self) -> Materialize<Self> {
    Materialize {
      inner: self,
      finished: false,
    }
  }
}

impl<T, S> SignalStreamExt<T> for S where S: Stream<Item = Result<T, Cause>> + Sized {}

/// Stream returned by [`SignalStreamExt::stop_after_error`].
#[pin_project]
pub struct StopAfterError<S> {
  #[pin]
  inner: S,
  done: bool,
}

impl<T, S> Stream for StopAfterError<S>
where
  S: Stream<Item = Result<T, Cause>>,
{
  type Item = Result<T, Cause>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
    let this = self.project();
    if *this.done {
      return Poll::Ready(None);
    }
    match ready!(this.inner.poll_next(cx)) {
      Some(Err(cause)) => {
        *this.done = true;
        Poll::Ready(Some(Err(cause)))
      }
      None => {
        *this.done = true;
        Poll::Ready(None)
      }
      item => Poll::Ready(item),
    }
  }
}

/// Stream returned by [`SignalStreamExt::materialize`].
#[pin_project]
pub struct Materialize<S> {
  #[pin]
  inner: S,
  finished: bool,
}

impl<T, S> Stream for Materialize<S>
where
  S: Stream<Item = Result<T, Cause>>,
{
  type Item = Signal<T>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
    let this = self.project();
    if *this.finished {
      return Poll::Ready(None);
    }
    let signal = match ready!(this.inner.poll_next(cx)) {
      Some(Ok(value)) => Signal::Next(value),
      Some(Err(cause)) => {
        *this.finished = true;
        Signal::Error(cause)
      }
      None => {
        *this.finished = true;
        Signal::Complete
      }
    };
    Poll::Ready(Some(signal))
  }
}

/// Runs one execution of `publisher` on the current task and returns every
/// signal it produced.
///
/// The publisher must terminate on its own; bound infinite sources with
/// `take` first.
pub async fn collect_signals<P>(publisher: &P, ctx: &Context) -> Vec<Signal<P::Item>>
where
  P: Publisher,
{
  publisher.produce(ctx).materialize().collect().await
}
