//! Batch orchestration over many source images.
//!
//! A [`BatchController`] keeps the item list and the current
//! [`CompressRequest`](crate::budget::CompressRequest). Runs never overlap:
//! a `compress_all` issued while one is in flight is folded into it as one
//! extra pass. Settings changes go through a [`Debouncer`] so a burst of
//! edits triggers a single run.

mod controller;
mod debounce;
mod item;

pub use controller::{BatchController, BatchRun};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use item::{BatchItem, ItemId, ItemStatus};
