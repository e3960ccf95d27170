//! Time sources for the throttler.
//!
//! Every "now" the throttler reads and every wait it performs goes
//! through a [`Clock`]. The real clocks read the system's time and
//! put the calling thread to sleep; the fake clocks only move when
//! the program (or a sleeping throttler) advances them, which makes
//! throttling behavior deterministic in tests.

use crate::lib::*;
use parking_lot::Mutex;

/// A measurement from a clock.
pub trait Reference:
    Sized
    + Sub<Duration, Output = Self>
    + Add<Duration, Output = Self>
    + PartialEq
    + Eq
    + Ord
    + Copy
    + Clone
    + Send
    + Sync
    + Debug
{
    /// Determines the time that separates two measurements of a
    /// clock. Returns the zero duration if `earlier` is actually
    /// later than `self`.
    fn duration_since(&self, earlier: Self) -> Duration;
}

/// A time source used by throttlers.
pub trait Clock: Send + Sync {
    /// A measurement of the clock.
    type Instant: Reference;

    /// Returns a measurement of the clock.
    fn now(&self) -> Self::Instant;

    /// Suspends the caller for at least `duration`.
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    type Instant = C::Instant;

    fn now(&self) -> Self::Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

impl Reference for Duration {
    fn duration_since(&self, earlier: Self) -> Duration {
        self.checked_sub(earlier)
            .unwrap_or_else(|| Duration::new(0, 0))
    }
}

/// A mock implementation of a clock. All it does is keep track of
/// what "now" is (relative to some point meaningful to the program),
/// and return the current time as a [`Duration`].
///
/// Sleeping on this clock does not block: it advances the clock by
/// the requested duration and returns. Clones of a clock share the
/// same "now".
#[derive(Debug, Clone, Default)]
pub struct FakeRelativeClock {
    now: Arc<Mutex<Duration>>,
}

impl FakeRelativeClock {
    /// Advances the fake clock by the given amount, stopping at
    /// [`Duration::MAX`].
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_add(by);
    }

    /// Sets the fake clock to the given point in time.
    pub fn set(&self, to: Duration) {
        *(self.now.lock()) = to
    }
}

impl Clock for FakeRelativeClock {
    type Instant = Duration;

    fn now(&self) -> Self::Instant {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration)
    }
}

mod offset;
pub use self::offset::*;

mod with_std;
pub use self::with_std::*;
