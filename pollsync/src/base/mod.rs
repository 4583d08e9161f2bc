//! Basic types used by the view runtime.

pub(crate) mod liveness;

pub use liveness::Liveness;
