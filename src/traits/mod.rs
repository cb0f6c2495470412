//! Traits at the seams of the library: what a publisher is, and what an
//! operator does to one.

pub mod publisher;
pub mod transformer;
