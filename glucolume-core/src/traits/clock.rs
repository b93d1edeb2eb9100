//! Monotonic time source

/// Monotonic millisecond clock
///
/// Only differences between readings are meaningful. Wall-clock time is
/// never needed.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
