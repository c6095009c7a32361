//! Budget-driven search for the best encoding of an image.
//!
//! Two nested loops:
//!
//! - [`quality::search`] binary-searches encoder quality at one resolution.
//! - [`ladder::run`] owns the outer loop and shrinks the resolution between
//!   quality searches until the byte budget is met or a floor is reached.
//!
//! Both operate on a [`Codec`](crate::codec::Codec) and never fail outright;
//! encode failures are logged and folded into the returned [`SearchOutcome`].

pub mod ladder;
mod outcome;
pub mod quality;

#[cfg(test)]
pub(crate) mod test_support;

pub use outcome::{Note, SearchOutcome};
