//! A fixed-window counter.

use crate::clock::{self, Reference};
use crate::lib::*;

/// Implements the fixed-window counter: at most `limit` cells are
/// admitted in a window of `window_size`, counted from the first
/// admission in that window.
///
/// # Window expiry
///
/// A window expires once strictly more than `window_size` has passed
/// since it opened. A cell arriving at exactly `window_size` after
/// the window opened is still counted against that window.
///
/// # Example
/// ``` rust
/// # use std::time::Duration;
/// # use std::num::NonZeroU64;
/// use window_throttle::{FixedWindow, WindowState};
///
/// let algorithm = FixedWindow::per_second(NonZeroU64::new(2).unwrap());
/// let mut state = WindowState::default();
/// let now = Duration::from_secs(10);
///
/// assert_eq!(Ok(()), algorithm.test_and_update(&mut state, now));
/// assert_eq!(Ok(()), algorithm.test_and_update(&mut state, now));
///
/// // The window is full; the next cell has to wait until it closes:
/// let saturated = algorithm.test_and_update(&mut state, now + Duration::from_millis(400));
/// assert_eq!(Duration::from_millis(600), saturated.unwrap_err().wait_time());
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FixedWindow {
    limit: NonZeroU64,
    window_size: Duration,
}

/// The counting state of a single window.
///
/// A state starts out "unopened": no window has been started yet. The
/// first admission opens a window at the time it is made.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct WindowState<P: Reference = <clock::DefaultClock as clock::Clock>::Instant> {
    start: Option<P>,
    admitted: u64,
}

impl<P: Reference> Default for WindowState<P> {
    fn default() -> Self {
        WindowState {
            start: None,
            admitted: 0,
        }
    }
}

impl<P: Reference> WindowState<P> {
    /// Returns the time at which the current window opened, or `None`
    /// if no window has been opened yet.
    pub fn window_start(&self) -> Option<P> {
        self.start
    }

    /// Returns the number of cells admitted in the current window.
    pub fn admitted(&self) -> u64 {
        self.admitted
    }

    /// Opens a fresh window at `at`, counting one admission in it.
    pub fn reset(&mut self, at: P) {
        self.start = Some(at);
        self.admitted = 1;
    }
}

/// Returned when a window has no room left for another cell.
///
/// The wait time is the time remaining until the current window
/// would naturally close, as seen from the time of the decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSaturated<P: Reference = <clock::DefaultClock as clock::Clock>::Instant> {
    window_start: P,
    at: P,
    wait: Duration,
}

impl<P: Reference> WindowSaturated<P> {
    /// Returns the time at which the saturated window opened.
    pub fn window_start(&self) -> P {
        self.window_start
    }

    /// Returns the minimum amount of time that must pass after the
    /// decision before the window closes.
    pub fn wait_time(&self) -> Duration {
        self.wait
    }

    /// Returns the earliest time at which the window closes.
    pub fn earliest_possible(&self) -> P {
        self.at + self.wait
    }
}

impl<P: Reference> fmt::Display for WindowSaturated<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "window saturated, next window opens in {:?}", self.wait)
    }
}

impl FixedWindow {
    /// Constructs a fixed window algorithm that admits `limit` cells
    /// every `window_size`.
    pub fn new(limit: NonZeroU64, window_size: Duration) -> FixedWindow {
        FixedWindow { limit, window_size }
    }

    /// Constructs a fixed window algorithm that admits `limit` cells
    /// per second.
    pub fn per_second(limit: NonZeroU64) -> FixedWindow {
        FixedWindow::new(limit, Duration::from_secs(1))
    }

    /// The maximum number of cells admitted per window.
    pub fn limit(&self) -> NonZeroU64 {
        self.limit
    }

    /// The length of a window.
    pub fn window_size(&self) -> Duration {
        self.window_size
    }

    /// Tests if a single cell can be admitted at the instant `t0` and
    /// updates the window state to account for it.
    ///
    /// If the current window has expired, a new window is opened at
    /// `t0` and the cell is admitted into it. If the current window
    /// is saturated, the state is left untouched and the remaining
    /// time until the window closes is returned.
    pub fn test_and_update<P: Reference>(
        &self,
        state: &mut WindowState<P>,
        t0: P,
    ) -> Result<(), WindowSaturated<P>> {
        let start = *state.start.get_or_insert(t0);
        let elapsed = t0.duration_since(start);

        if elapsed > self.window_size {
            state.reset(t0);
            return Ok(());
        }

        let next = state.admitted.saturating_add(1);
        if self.limit.get() >= next {
            state.admitted = next;
            return Ok(());
        }

        Err(WindowSaturated {
            window_start: start,
            at: t0,
            wait: self.window_size - elapsed,
        })
    }
}
