#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use window_throttle::clock::{Clock, FakeRelativeClock};

/// A fake clock that remembers every sleep it was asked to perform.
#[derive(Debug, Clone, Default)]
pub struct RecordingClock {
    pub fake: FakeRelativeClock,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingClock {
    pub fn advance(&self, by: Duration) {
        self.fake.advance(by)
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

impl Clock for RecordingClock {
    type Instant = Duration;

    fn now(&self) -> Duration {
        self.fake.now()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        self.fake.sleep(duration)
    }
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
