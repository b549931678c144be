//! The error chain node and the types it is built from.

mod cause;
pub(crate) mod frame;
pub mod iter;
mod owned;

pub use self::{cause::Cause, iter::Chain, owned::Error};
