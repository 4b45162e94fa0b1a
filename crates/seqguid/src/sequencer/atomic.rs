use crossbeam_utils::{Backoff, CachePadded};
use portable_atomic::{AtomicU128, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    sequencer::{GeneratorState, Sequencer, Stamp},
    time::TimeSource,
};

/// A lock-free sequencer suitable for multi-threaded environments.
///
/// This sequencer packs the [`GeneratorState`] into an [`AtomicU128`] and
/// applies [`GeneratorState::advance`] in a compare-and-swap loop. Losing a
/// race costs a retry rather than a wait on another thread.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Fair: a thread can lose the CAS repeatedly under heavy contention
///
/// ## Caveats
/// On targets without native 128-bit CAS, `portable-atomic` falls back to a
/// lock internally.
///
/// ## See Also
/// - [`SpinSequencer`]
///
/// [`SpinSequencer`]: crate::sequencer::SpinSequencer
pub struct AtomicSequencer<T>
where
    T: TimeSource,
{
    state: CachePadded<AtomicU128>,
    time: T,
}

impl<T> AtomicSequencer<T>
where
    T: TimeSource,
{
    /// Creates a new [`AtomicSequencer`] starting from
    /// [`GeneratorState::ZERO`].
    ///
    /// # Example
    /// ```
    /// use seqguid::{
    ///     sequencer::AtomicSequencer,
    ///     time::MonotonicClock,
    /// };
    ///
    /// let sequencer = AtomicSequencer::new(MonotonicClock::new());
    /// let a = sequencer.next_stamp();
    /// let b = sequencer.next_stamp();
    /// assert!(a < b);
    /// ```
    pub fn new(time: T) -> Self {
        Self::from_state(GeneratorState::ZERO, time)
    }

    /// Creates a sequencer preloaded with `state`.
    pub fn from_state(state: GeneratorState, time: T) -> Self {
        Self {
            state: CachePadded::new(AtomicU128::new(state.to_raw())),
            time,
        }
    }

    /// Issues the next stamp.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    #[inline]
    pub fn next_stamp(&self) -> Stamp {
        let now = self.time.current_ticks();
        let backoff = Backoff::new();

        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let (next, stamp) = GeneratorState::from_raw(current).advance(now);
            match self.state.compare_exchange_weak(
                current,
                next.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return stamp,
                Err(actual) => {
                    current = actual;
                    backoff.spin();
                }
            }
        }
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> GeneratorState {
        GeneratorState::from_raw(self.state.load(Ordering::Acquire))
    }
}

impl<T> Sequencer for AtomicSequencer<T>
where
    T: TimeSource,
{
    type Clock = T;

    fn new(clock: T) -> Self {
        Self::new(clock)
    }

    fn from_state(state: GeneratorState, clock: T) -> Self {
        Self::from_state(state, clock)
    }

    fn next_stamp(&self) -> Stamp {
        self.next_stamp()
    }

    fn state(&self) -> GeneratorState {
        self.state()
    }
}
