//! A blocking throttler that admits a limited number of operations
//! per fixed window.

use crate::algorithms::{FixedWindow, WindowState};
use crate::clock::{self, Clock};
use crate::lib::*;
use crate::thread_safety::ThreadsafeWrapper;
use tracing::{debug, trace};

/// An in-memory throttler that blocks callers until their operation
/// fits into the current window. Throttlers can be used to e.g.
/// ensure that an API client stays within a server's rate limit, or
/// to pace writes to a slow device.
///
/// A throttler is `Sync`: share it across threads by reference or in
/// an `Arc`. All admission decisions on one throttler are serialized
/// through a single lock.
#[derive(Debug)]
pub struct Throttler<C: Clock = clock::DefaultClock> {
    algorithm: Option<FixedWindow>,
    window_size: Duration,
    state: ThreadsafeWrapper<WindowState<C::Instant>>,
    clock: C,
}

impl Throttler<clock::DefaultClock> {
    /// Construct a new throttler that admits `limit` operations per
    /// second, using the monotonic system clock. A `limit` of `0`
    /// constructs a throttler that never waits.
    ///
    /// # Examples
    /// ```
    /// use window_throttle::Throttler;
    ///
    /// let throttler = Throttler::new(100);
    /// throttler.acquire();
    /// ```
    pub fn new(limit: u64) -> Self {
        Self::with_clock(limit, Default::default())
    }

    /// Construct a new throttler that admits `limit` operations per
    /// second.
    ///
    /// # Examples
    /// ```
    /// # use window_throttle::Throttler;
    /// # #[macro_use] extern crate nonzero_ext;
    /// # fn main () {
    /// let throttler = Throttler::per_second(nonzero!(100u64));
    /// assert_eq!(100, throttler.limit());
    /// # }
    /// ```
    pub fn per_second(limit: NonZeroU64) -> Self {
        Self::new(limit.get())
    }

    /// Construct a throttler that admits every operation immediately.
    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// Return a builder that can be used to construct a throttler
    /// using the parameters passed to the Builder.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use window_throttle::Throttler;
    /// use window_throttle::clock::{FakeRelativeClock, OffsetClock};
    ///
    /// let clock = OffsetClock::with_static_offset(
    ///     FakeRelativeClock::default(),
    ///     Duration::from_millis(100),
    /// );
    /// let throttler = Throttler::builder(10)
    ///     .per(Duration::from_secs(2))
    ///     .clock(clock)
    ///     .build();
    /// assert_eq!(Duration::from_secs(2), throttler.window_size());
    /// ```
    pub fn builder(limit: u64) -> Builder<clock::DefaultClock> {
        Builder {
            limit,
            window_size: Duration::from_secs(1),
            clock: Default::default(),
        }
    }
}

impl<C: Clock> Throttler<C> {
    /// Construct a new throttler that admits `limit` operations per
    /// second, measuring time and waiting on `clock`.
    pub fn with_clock(limit: u64, clock: C) -> Self {
        Self::from_parts(limit, Duration::from_secs(1), clock)
    }

    fn from_parts(limit: u64, window_size: Duration, clock: C) -> Self {
        Throttler {
            algorithm: NonZeroU64::new(limit).map(|limit| FixedWindow::new(limit, window_size)),
            window_size,
            state: Default::default(),
            clock,
        }
    }

    /// The maximum number of operations admitted per window; `0` if
    /// the throttler never waits.
    pub fn limit(&self) -> u64 {
        self.algorithm.map(|a| a.limit().get()).unwrap_or(0)
    }

    /// The length of a window.
    pub fn window_size(&self) -> Duration {
        self.window_size
    }

    /// The clock this throttler reads time from and waits on.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Retrieves a snapshot of the current window.
    ///
    /// # Thread safety
    /// The snapshot is taken under the throttler's lock, but other
    /// threads can change the window as soon as it is returned.
    ///
    /// Taking the lock means this blocks while another caller sleeps
    /// out a saturated window. The lock is not re-entrant: calling
    /// `snapshot` (or formatting the throttler with `Debug`) from
    /// inside a [`run`](#method.run) closure deadlocks.
    pub fn snapshot(&self) -> WindowState<C::Instant> {
        self.state.snapshot()
    }

    /// Blocks until one more operation can be admitted in the current
    /// window, and accounts for it.
    ///
    /// If the current window is saturated, the calling thread sleeps
    /// (on the throttler's clock) until the window closes, and then
    /// opens a new window starting at the time it woke up. The
    /// throttler's lock stays held while sleeping, so concurrent
    /// callers are admitted one after another during a throttled
    /// period.
    ///
    /// This method never fails. There is no way to cancel a wait
    /// once it has begun.
    pub fn acquire(&self) {
        if let Some(algorithm) = self.algorithm {
            self.state.exclusive(|state| self.admit(&algorithm, state));
        }
    }

    /// Admits an operation and runs it, returning its result
    /// unchanged.
    ///
    /// Unlike [`acquire`](#method.acquire), `f` runs while the
    /// throttler's lock is still held: all operations passing through
    /// `run` (and all other admissions) are serialized, and
    /// throughput is bounded by `f`'s own latency in addition to the
    /// limit. A throttler with a limit of `0` calls `f` without
    /// taking the lock.
    ///
    /// `f` must not call back into the same throttler: `acquire`,
    /// `run`, `snapshot` and the `Debug` impl all take the lock that
    /// `f` is running under, and deadlock.
    ///
    /// # Examples
    /// ```
    /// use window_throttle::Throttler;
    ///
    /// let throttler = Throttler::new(5);
    /// let answer: Result<u32, String> = throttler.run(|| Ok(42));
    /// assert_eq!(Ok(42), answer);
    /// ```
    pub fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        match self.algorithm {
            None => f(),
            Some(algorithm) => self.state.exclusive(|state| {
                self.admit(&algorithm, state);
                f()
            }),
        }
    }

    fn admit(&self, algorithm: &FixedWindow, state: &mut WindowState<C::Instant>) {
        let now = self.clock.now();
        match algorithm.test_and_update(state, now) {
            Ok(()) => {
                if state.admitted() == 1 {
                    trace!(window_start = ?state.window_start(), "opened a new window");
                }
            }
            Err(saturated) => {
                let wait = saturated.wait_time();
                debug!(
                    limit = algorithm.limit().get(),
                    ?wait,
                    "window saturated, waiting for the next one"
                );
                self.clock.sleep(wait);
                state.reset(self.clock.now());
                trace!(window_start = ?state.window_start(), "opened a new window after waiting");
            }
        }
    }
}

/// An object that allows incrementally constructing Throttler
/// objects.
#[derive(Debug, Clone)]
pub struct Builder<C: Clock = clock::DefaultClock> {
    limit: u64,
    window_size: Duration,
    clock: C,
}

impl<C: Clock> Builder<C> {
    /// Sets the length of a window. Defaults to one second.
    pub fn per(mut self, window_size: Duration) -> Builder<C> {
        self.window_size = window_size;
        self
    }

    /// Sets the clock the throttler measures time with and waits on,
    /// replacing any previously set clock. Clock skew compensation is
    /// configured by passing an
    /// [`OffsetClock`](../clock/struct.OffsetClock.html) here.
    pub fn clock<C2: Clock>(self, clock: C2) -> Builder<C2> {
        Builder {
            limit: self.limit,
            window_size: self.window_size,
            clock,
        }
    }

    /// Builds a throttler with the configured parameters.
    pub fn build(self) -> Throttler<C> {
        Throttler::from_parts(self.limit, self.window_size, self.clock)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clock::FakeRelativeClock;

    #[test]
    fn throttler_is_sync() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Throttler>();
        assert_sync::<Throttler<FakeRelativeClock>>();
    }

    #[test]
    fn builder_defaults() {
        let throttler = Throttler::builder(3).build();
        assert_eq!(3, throttler.limit());
        assert_eq!(Duration::from_secs(1), throttler.window_size());
        assert_eq!(None, throttler.snapshot().window_start());
    }

    #[test]
    fn unlimited_never_opens_a_window() {
        let clock = FakeRelativeClock::default();
        let throttler = Throttler::with_clock(0, clock.clone());
        for _ in 0..100 {
            throttler.acquire();
        }
        assert_eq!(Duration::new(0, 0), clock.now());
        assert_eq!(WindowState::default(), throttler.snapshot());
    }

    #[test]
    fn run_passes_errors_through() {
        let throttler = Throttler::with_clock(1, FakeRelativeClock::default());
        let res: Result<(), &str> = throttler.run(|| Err("nope"));
        assert_eq!(Err("nope"), res);
        assert_eq!(1, throttler.snapshot().admitted());
    }

    #[test]
    fn snapshot_after_run_sees_admission() {
        let throttler = Throttler::with_clock(2, FakeRelativeClock::default());
        let res: Result<u64, ()> = throttler.run(|| Ok(7));
        assert_eq!(Ok(7), res);
        assert_eq!(1, throttler.snapshot().admitted());
        assert!(format!("{:?}", throttler).contains("admitted: 1"));
    }

    #[test]
    fn shared_clock_objects() {
        let fake = FakeRelativeClock::default();
        let shared: Arc<dyn Clock<Instant = Duration>> = Arc::new(fake.clone());
        let throttler = Throttler::with_clock(1, shared);
        throttler.acquire();
        throttler.acquire();
        assert_eq!(Duration::from_secs(1), fake.now());
    }

    #[test]
    fn clock_replaces_previous_clock() {
        let first = FakeRelativeClock::default();
        let second = FakeRelativeClock::default();
        second.set(Duration::from_secs(30));
        let throttler = Throttler::builder(1)
            .clock(first)
            .clock(second.clone())
            .build();
        throttler.acquire();
        assert_eq!(Duration::from_secs(30), throttler.clock().now());
        assert_eq!(
            Some(Duration::from_secs(30)),
            throttler.snapshot().window_start()
        );
    }
}
