use std::sync::Arc;

/// Number of ticks in one millisecond. One tick is 100 nanoseconds.
pub const TICKS_PER_MILLISECOND: i64 = 10_000;

/// Ticks elapsed between 0001-01-01T00:00:00Z and the Unix epoch.
///
/// Sequencers count time in "DateTime ticks" (100ns intervals since the start
/// of year 1), so identifiers produced here interleave correctly with
/// identifiers produced by other generators that use the same convention.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// A trait for time sources that return the current tick.
///
/// This abstraction allows you to plug in the real [`MonotonicClock`] or a
/// mocked time source in tests. The unit is always one tick (100ns) counted
/// from 0001-01-01T00:00:00Z.
///
/// # Example
///
/// ```
/// use seqguid::time::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_ticks(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_ticks(), 1234);
/// ```
///
/// [`MonotonicClock`]: crate::time::MonotonicClock
pub trait TimeSource {
    /// Returns the current tick.
    fn current_ticks(&self) -> i64;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_ticks(&self) -> i64 {
        (**self).current_ticks()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_ticks(&self) -> i64 {
        (**self).current_ticks()
    }
}
