//! Demos over numeric ranges, including the time-driven ones.

use super::{DemoEnv, DemoError, await_termination};
use crate::error::Cause;
use crate::multi::Multi;
use crate::subscriber::Subscriber;
use crate::traits::publisher::Publisher;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The interval value at which [`interval_retry_pipeline`] fails.
pub const RETRY_LIMIT: u64 = 5;

/// Message of the error raised at [`RETRY_LIMIT`].
pub const RETRY_LIMIT_MESSAGE: &str = "Solo hasta 5!";

/// Resubscriptions granted to [`interval_retry_pipeline`].
pub const RETRIES: usize = 2;

/// Zips the doubled values 1 to 4 with the range 0 to 3 into formatted lines.
pub async fn zip_with_ranges(env: &DemoEnv) -> Result<(), DemoError> {
  let lines = Multi::just_all([1, 2, 3, 4])
    .map(|i| i * 2)
    .zip_with(Multi::range(0, 4), |first, second| {
      format!("Primer Flux: {first}, Segundo Flux: {second}")
    });

  let sink = Arc::clone(env.sink());
  let subscription = lines.subscribe_on(
    Arc::clone(env.scheduler()),
    Subscriber::new().on_next(move |line: String| sink.info(&line)),
  );
  await_termination(subscription, env).await
}

/// Paces the range 1 to 12 by an interval of one period, logging each value.
pub async fn interval(env: &DemoEnv) -> Result<(), DemoError> {
  let sink = Arc::clone(env.sink());
  let paced = Multi::range(1, 12)
    .zip_with(Multi::interval(env.period()), |value, _tick| value)
    .do_on_next(move |value| sink.info(&value.to_string()));

  let subscription = paced.subscribe_on(Arc::clone(env.scheduler()), Subscriber::new());
  await_termination(subscription, env).await
}

/// Delays each value of the range 1 to 12 by one period, logging each value.
pub async fn delay_elements(env: &DemoEnv) -> Result<(), DemoError> {
  let sink = Arc::clone(env.sink());
  let delayed = Multi::range(1, 12)
    .delay_elements(env.period())
    .do_on_next(move |value| sink.info(&value.to_string()));

  let subscription = delayed.subscribe_on(Arc::clone(env.scheduler()), Subscriber::new());
  await_termination(subscription, env).await
}

/// Greets every interval tick, failing at [`RETRY_LIMIT`] and retrying
/// [`RETRIES`] times. `on_terminate` runs once, when the retries are exhausted
/// or the subscription is cancelled.
pub fn interval_retry_pipeline<F>(period: Duration, on_terminate: F) -> Multi<String>
where
  F: Fn() + Send + Sync + 'static,
{
  Multi::interval(period)
    .flat_map(|tick| {
      if tick >= RETRY_LIMIT {
        Multi::error(Cause::msg(RETRY_LIMIT_MESSAGE))
      } else {
        Multi::just_all([tick])
      }
    })
    .map(|tick| format!("Hola {tick}"))
    .retry(RETRIES)
    .do_on_terminate(on_terminate)
}

/// Runs [`interval_retry_pipeline`], logging greetings and the final error.
pub async fn interval_retry(env: &DemoEnv) -> Result<(), DemoError> {
  let greetings = interval_retry_pipeline(env.period(), || debug!("interval terminated"));

  let (on_next, on_error) = (Arc::clone(env.sink()), Arc::clone(env.sink()));
  let subscription = greetings.subscribe_on(
    Arc::clone(env.scheduler()),
    Subscriber::new()
      .on_next(move |greeting: String| on_next.info(&greeting))
      .on_error(move |cause| on_error.error(&cause.message())),
  );
  await_termination(subscription, env).await
}
