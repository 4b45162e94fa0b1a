use crate::time::{TICKS_PER_MILLISECOND, TimeSource, UNIX_EPOCH_TICKS};
use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A monotonic time source anchored to the wall clock at construction.
///
/// This avoids wall-clock adjustments (e.g., NTP or daylight savings changes)
/// while still aligning ticks to the calendar: the clock captures
/// `SystemTime::now()` once and then only adds monotonic elapsed time.
///
/// Internally a background thread stores the elapsed milliseconds since
/// construction into a shared atomic once per millisecond, so reading the
/// clock on the hot path is a single relaxed load and never a syscall. The
/// thread exits on its own once every clone of the clock has been dropped.
///
/// Resolution is one millisecond; values are reported in ticks.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    epoch_offset: i64, // in ticks
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Constructs a clock whose first reading equals the current wall-clock
    /// time expressed in ticks.
    ///
    /// # Example
    ///
    /// ```
    /// use seqguid::time::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let first = clock.current_ticks();
    /// std::thread::sleep(std::time::Duration::from_millis(5));
    /// assert!(clock.current_ticks() >= first);
    /// ```
    pub fn new() -> Self {
        let start = Instant::now();
        // A clock set before 1970 is clamped to the Unix epoch.
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        let system_ticks = i64::try_from(system_now.as_nanos() / 100).unwrap_or(i64::MAX);

        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Compute the absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                // Sleep if we are early
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = start.elapsed().as_millis() as u64;

                // Monotonic store, aligned to elapsed milliseconds since start
                inner_ref.current.store(now_ms, Ordering::Relaxed);

                tick = now_ms + 1;
            }
        });

        let _ = inner._handle.set(handle);

        Self {
            inner,
            epoch_offset: UNIX_EPOCH_TICKS.saturating_add(system_ticks),
        }
    }
}

impl TimeSource for MonotonicClock {
    /// Returns the anchor tick plus the monotonic elapsed time since
    /// construction.
    fn current_ticks(&self) -> i64 {
        let elapsed_ms = self.inner.current.load(Ordering::Relaxed) as i64;
        self.epoch_offset + elapsed_ms * TICKS_PER_MILLISECOND
    }
}
