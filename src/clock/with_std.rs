use super::{Clock, Reference};
use crate::lib::*;
use parking_lot::Mutex;
use std::thread;
use std::time::SystemTime;

/// The default clock that reports [`Instant`]s.
pub type DefaultClock = MonotonicClock;

/// A mock implementation of a clock tracking [`Instant`]s. All it
/// does is keep track of what "now" is by allowing the program to
/// increment the current time (taken at time of construction) by some
/// arbitrary [`Duration`].
///
/// Like [`FakeRelativeClock`](struct.FakeRelativeClock.html),
/// sleeping advances the clock instead of blocking.
#[derive(Debug, Clone)]
pub struct FakeAbsoluteClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for FakeAbsoluteClock {
    fn default() -> Self {
        FakeAbsoluteClock {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }
}

impl FakeAbsoluteClock {
    /// Advances the fake clock by the given amount.
    pub fn advance(&self, by: Duration) {
        *(self.now.lock()) += by
    }
}

impl Clock for FakeAbsoluteClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration)
    }
}

/// The monotonic clock implemented by [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Reference for Instant {
    fn duration_since(&self, earlier: Self) -> Duration {
        self.saturating_duration_since(earlier)
    }
}

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}

/// The non-monotonic clock implemented by [`SystemTime`].
///
/// Use this when window boundaries should follow wall-clock time,
/// e.g. to line up with a remote server's idea of "this second".
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Reference for SystemTime {
    /// Returns the difference in times between the two
    /// SystemTimes. Due to the fallible nature of SystemTimes,
    /// returns the zero duration if a negative duration would
    /// result (e.g. due to system clock adjustments).
    fn duration_since(&self, earlier: Self) -> Duration {
        self.duration_since(earlier)
            .unwrap_or_else(|_| Duration::new(0, 0))
    }
}

impl Clock for SystemClock {
    type Instant = SystemTime;

    fn now(&self) -> Self::Instant {
        SystemTime::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fake_absolute_clock_advances_on_sleep() {
        let clock = FakeAbsoluteClock::default();
        let start = clock.now();
        clock.sleep(Duration::from_secs(1));
        clock.advance(Duration::from_millis(250));
        assert_eq!(Duration::from_millis(1250), clock.now().duration_since(start));
    }

    #[test]
    fn monotonic_clock_sleeps() {
        let clock = MonotonicClock;
        let start = clock.now();
        clock.sleep(Duration::from_millis(10));
        assert!(clock.now().duration_since(start) >= Duration::from_millis(10));
    }

    #[test]
    fn system_time_never_goes_negative() {
        let now = SystemClock.now();
        let later = now + Duration::from_secs(1);
        assert_eq!(Duration::new(0, 0), Reference::duration_since(&now, later));
    }
}
