//! Clock skew compensation.
//!
//! When a throttler guards calls to a remote party that enforces its
//! own rate limit, the two parties' clocks rarely agree on where a
//! window starts. An [`OffsetClock`] pads every wait by some extra
//! time so that the remote side also sees the window as closed by
//! the time the throttler wakes up.

use super::{Clock, DefaultClock};
use crate::lib::*;

/// The additional time an [`OffsetClock`] adds to every sleep.
#[derive(Clone)]
pub enum ClockOffset {
    /// Sleep for a fixed additional amount of time.
    Static(Duration),

    /// Compute the additional time from the requested sleep
    /// duration.
    Dynamic(Arc<dyn Fn(Duration) -> Duration + Send + Sync>),
}

impl ClockOffset {
    /// Constructs a dynamic offset from a function of the sleep
    /// duration.
    pub fn dynamic<F>(f: F) -> ClockOffset
    where
        F: Fn(Duration) -> Duration + Send + Sync + 'static,
    {
        ClockOffset::Dynamic(Arc::new(f))
    }

    /// Returns the amount of time to add to a sleep of `duration`.
    pub fn offset_for(&self, duration: Duration) -> Duration {
        match self {
            ClockOffset::Static(offset) => *offset,
            ClockOffset::Dynamic(f) => f(duration),
        }
    }
}

impl Default for ClockOffset {
    fn default() -> Self {
        ClockOffset::Static(Duration::new(0, 0))
    }
}

impl fmt::Debug for ClockOffset {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            ClockOffset::Static(offset) => f.debug_tuple("Static").field(offset).finish(),
            ClockOffset::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A clock that reads time from another clock, but sleeps longer
/// than it is asked to by a [`ClockOffset`].
///
/// A padded sleep that would exceed [`Duration::MAX`] sleeps for
/// `Duration::MAX` instead.
#[derive(Debug, Clone, Default)]
pub struct OffsetClock<C: Clock = DefaultClock> {
    inner: C,
    offset: ClockOffset,
}

impl<C: Clock> OffsetClock<C> {
    /// Wraps `inner` so that every sleep is padded by `offset`.
    pub fn new(inner: C, offset: ClockOffset) -> OffsetClock<C> {
        OffsetClock { inner, offset }
    }

    /// Wraps `inner` so that every sleep takes `offset` longer.
    pub fn with_static_offset(inner: C, offset: Duration) -> OffsetClock<C> {
        OffsetClock::new(inner, ClockOffset::Static(offset))
    }

    /// Wraps `inner` so that every sleep of some duration `d` takes
    /// `f(d)` longer.
    pub fn with_dynamic_offset<F>(inner: C, f: F) -> OffsetClock<C>
    where
        F: Fn(Duration) -> Duration + Send + Sync + 'static,
    {
        OffsetClock::new(inner, ClockOffset::dynamic(f))
    }

    /// Returns the configured offset.
    pub fn offset(&self) -> &ClockOffset {
        &self.offset
    }

    /// Returns the wrapped clock.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Clock> Clock for OffsetClock<C> {
    type Instant = C::Instant;

    fn now(&self) -> Self::Instant {
        self.inner.now()
    }

    fn sleep(&self, duration: Duration) {
        self.inner
            .sleep(duration.saturating_add(self.offset.offset_for(duration)))
    }
}
