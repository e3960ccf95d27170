//! Throttling algorithms.
//!
//! The algorithms in this module only make decisions: given the
//! state of a window and the current time, they decide whether one
//! more operation fits and update the state accordingly. Waiting and
//! locking are up to the caller (see
//! [`Throttler`](../throttler/struct.Throttler.html)).

pub mod fixed_window;

pub use self::fixed_window::*;
