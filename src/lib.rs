//! # Fixed-window throttling in Rust
//!
//! This crate implements a blocking throttler based on the
//! [fixed-window counter](https://en.wikipedia.org/wiki/Rate_limiting)
//! algorithm: at most `limit` operations are admitted in every window
//! (one second by default), and callers that would exceed the limit
//! are put to sleep until the next window opens.
//!
//! ## Interface
//!
//! The main type is the [`Throttler`](throttler/struct.Throttler.html).
//! Callers ask it for admission before doing rate-limited work:
//!
//! ``` rust
//! use window_throttle::Throttler;
//!
//! let throttler = Throttler::new(50); // Allow 50 operations per second.
//! throttler.acquire(); // Returns immediately: the window has room.
//! ```
//!
//! A limit of `0` turns the throttler into a pass-through that never
//! waits.
//!
//! `acquire` never fails. It either returns immediately, or blocks
//! for the time remaining in the current window and then opens a
//! fresh window.
//!
//! ## Design and implementation of the fixed window
//!
//! The first admission opens a window at the current instant. Each
//! subsequent admission is counted against that window until either
//! the window has expired (more than one window length has passed
//! since it opened), in which case a new window is opened at the
//! current instant, or the counter reaches the limit. A caller that
//! finds the window saturated sleeps until the window would naturally
//! close, and then opens a new window starting at the moment it woke
//! up.
//!
//! Note that an admission landing *exactly* one window length after
//! the window opened is still counted against the old window; only
//! strictly later admissions see it as expired.
//!
//! ## Thread-safe operation
//!
//! A throttler is safe to share across threads (e.g. in an `Arc`).
//! All admission decisions are made while holding a single lock, and
//! that lock stays held while a caller sleeps out a saturated window:
//! during a throttled period, callers are admitted strictly one after
//! another. This is what guarantees that no more than `limit`
//! admissions land in any window even under concurrent bursts.
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use window_throttle::Throttler;
//!
//! let throttler = Arc::new(Throttler::new(50));
//! let thread_throttler = throttler.clone();
//! thread::spawn(move || thread_throttler.acquire()).join().unwrap();
//! throttler.acquire();
//! ```
//!
//! ## Running work under the throttle
//!
//! [`Throttler::run`](throttler/struct.Throttler.html#method.run)
//! admits an operation and runs it *while still holding the admission
//! lock*, returning the operation's result unchanged. Operations run
//! this way are serialized against each other, so their own latency
//! bounds the throughput as well. Use `acquire` if the work should
//! proceed in parallel once admitted.
//!
//! ## Clocks
//!
//! All time measurements and all waiting go through a
//! [`Clock`](clock/trait.Clock.html). Tests can substitute a
//! [`FakeRelativeClock`](clock/struct.FakeRelativeClock.html) that only
//! advances when told to (or when the throttler sleeps on it), and
//! callers talking to a remote party with a skewed clock can wrap
//! their clock in an [`OffsetClock`](clock/struct.OffsetClock.html)
//! that pads every wait.
//!
//! ## Transports
//!
//! The [`transport`](transport/index.html) module wraps anything that
//! executes requests (a closure, or with the `reqwest` feature a
//! blocking `reqwest` client) so that every request first passes the
//! throttler.

pub mod algorithms;
pub mod clock;
pub mod prelude;
mod thread_safety;
pub mod throttler;
pub mod transport;

pub use crate::algorithms::{FixedWindow, WindowSaturated, WindowState};
pub use crate::throttler::{Builder, Throttler};
pub use crate::transport::{ThrottledTransport, Transport, TransportExt};

/// A facade around all the types we need from std, so the rest of
/// the crate can import them in one place.
mod lib {
    pub use std::fmt;
    pub use std::fmt::Debug;
    pub use std::num::NonZeroU64;
    pub use std::ops::{Add, Sub};
    pub use std::sync::Arc;
    pub use std::time::{Duration, Instant};
}
