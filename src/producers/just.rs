//! Fixed-value sources.

use crate::multi::Multi;
use crate::single::Single;
use futures::{StreamExt, stream};

impl<T> Single<T>
where
  T: Clone + Send + Sync + 'static,
{
  /// Emits `value`, then completes. Each subscription receives its own clone.
  pub fn just(value: T) -> Self {
    Single::from_fn(move |_| stream::iter(Some(Ok(value.clone()))).boxed())
  }
}

impl<T> Multi<T>
where
  T: Clone + Send + Sync + 'static,
{
  /// Emits `values` in order, then completes.
  pub fn just_all(values: impl IntoIterator<Item = T>) -> Self {
    Multi::from_iterable(values.into_iter().collect::<Vec<_>>())
  }
}
