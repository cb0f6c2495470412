//! # Sources
//!
//! Constructors for root publishers. Each is an inherent function on
//! [`Single`](crate::single::Single) or [`Multi`](crate::multi::Multi):
//!
//! - [`just`]: `Single::just`, `Multi::just_all`
//! - [`empty`]: `empty` and `error` for both shapes
//! - [`callable`]: `Single::from_callable`
//! - [`iterable`]: `Multi::from_iterable`, `Multi::range`
//! - [`interval`]: `Multi::interval`
//!
//! All sources are cold. Nothing is evaluated until a subscription starts, and
//! each subscription starts over.

pub mod callable;
pub mod empty;
pub mod interval;
pub mod iterable;
pub mod just;
