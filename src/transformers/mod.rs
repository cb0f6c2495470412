//! # Operators
//!
//! Each operator is a [`Transformer`](crate::traits::transformer::Transformer):
//! a value that, given the upstream of one execution, builds the downstream
//! signal stream. [`Single`](crate::single::Single) and
//! [`Multi`](crate::multi::Multi) expose them as chainable methods.
//!
//! Unless stated otherwise an operator forwards upstream errors unchanged and
//! turns a failing user function (the `try_*` variants) into an error signal
//! that ends the execution.

pub mod collect;
pub mod delay;
pub mod filter;
pub mod flat_map;
pub mod map;
pub mod retry;
pub mod take;
pub mod tap;
pub mod zip;

pub use collect::CollectListTransformer;
pub use delay::DelayElementsTransformer;
pub use filter::{FilterTransformer, TryFilterTransformer};
pub use flat_map::FlatMapTransformer;
pub use map::{MapTransformer, TryMapTransformer};
pub use retry::RetryTransformer;
pub use take::{TakeTransformer, TakeWhileTransformer};
pub use tap::{DoOnNextTransformer, DoOnTerminateTransformer, TryDoOnNextTransformer};
pub use zip::ZipWithTransformer;
