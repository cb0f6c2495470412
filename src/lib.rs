//! # Reactive Primer
//!
//! A small reactive-streams core and the demonstration routines that exercise
//! it.
//!
//! A pipeline starts at a source (`Single::just`, `Multi::from_iterable`,
//! `Multi::interval`, ...), is shaped by operators (`map`, `filter`,
//! `flat_map`, `zip_with`, `collect_list`, `delay_elements`, `retry`, ...) and
//! runs once per [`subscribe`](traits::publisher::Publisher::subscribe). Nothing
//! executes before that.
//!
//! ## Key Concepts
//!
//! - **Publishers** ([`Single`](single::Single), [`Multi`](multi::Multi)) are
//!   lazy, cold, cheaply cloneable descriptions
//! - **Signals** are `next`, `error` and `complete`; at most one terminal signal
//!   is ever delivered
//! - **Subscriptions** deliver signals to a [`Subscriber`](subscriber::Subscriber)
//!   from their own driver task and can be cancelled at any time
//! - **Schedulers** supply the clock for time-driven operators and can be
//!   swapped for a virtual one in tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reactive_primer::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let subscription = Multi::range(1, 3)
//!   .delay_elements(Duration::from_millis(100))
//!   .map(|n| n * 10)
//!   .subscribe(
//!     Subscriber::new()
//!       .on_next(|n: i32| println!("{n}"))
//!       .on_complete(|| println!("done")),
//!   );
//! subscription.terminated().await;
//! # }
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Command-line and environment configuration of the demo runner.
pub mod config;
/// Demonstration routines and the records they work on.
pub mod demos;
/// Error values carried by error signals.
pub mod error;
/// `Multi`: the publisher of any number of values.
pub mod multi;
/// Source constructors.
pub mod producers;
/// Clocks for time-driven operators.
pub mod scheduler;
/// Signal model and stream adapters.
pub mod signal;
/// `Single`: the publisher of at most one value.
pub mod single;
/// Subscriber callbacks.
pub mod subscriber;
/// Subscription handles and their driver.
pub mod subscription;
/// Core traits: `Publisher` and `Transformer`.
pub mod traits;
/// Operators.
pub mod transformers;

/// Everything needed to build and subscribe to pipelines.
pub mod prelude {
  pub use crate::error::Cause;
  pub use crate::multi::Multi;
  pub use crate::scheduler::{Scheduler, TimerHandle, TokioScheduler, VirtualScheduler};
  pub use crate::signal::Signal;
  pub use crate::single::Single;
  pub use crate::subscriber::Subscriber;
  pub use crate::subscription::{Subscription, Termination};
  pub use crate::traits::publisher::{Context, Publisher};
}
