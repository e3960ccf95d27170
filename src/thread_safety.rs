use crate::lib::*;
use parking_lot::Mutex;

/// Provides interior mutability for throttler states that are
/// expected to be `Sync`. The state is held in a `parking_lot`
/// Mutex, so a panicking caller does not poison it for others.
#[derive(Default)]
pub(crate) struct ThreadsafeWrapper<T>
where
    T: fmt::Debug + Default + Copy + PartialEq + Eq,
{
    data: Mutex<T>,
}

impl<T> fmt::Debug for ThreadsafeWrapper<T>
where
    T: fmt::Debug + Default + Copy + PartialEq + Eq,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        self.snapshot().fmt(f)
    }
}

impl<T> ThreadsafeWrapper<T>
where
    T: fmt::Debug + Default + Copy + PartialEq + Eq,
{
    /// Takes out the lock on the state and calls `f` with exclusive
    /// access to it. The lock is held until `f` returns, including
    /// any time `f` spends waiting.
    #[inline]
    pub(crate) fn exclusive<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut data = self.data.lock();
        f(&mut data)
    }

    /// Retrieves and returns a snapshot of the state.
    ///
    /// # Thread safety
    /// This function operates threadsafely, but you're literally
    /// taking a copy of data that will change. Relying on the data
    /// that is returned *will* race.
    pub(crate) fn snapshot(&self) -> T {
        *self.data.lock()
    }
}
