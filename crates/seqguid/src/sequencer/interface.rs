use crate::{sequencer::GeneratorState, time::TimeSource};

/// A `(tick, sequence)` pair captured by a [`Sequencer`].
///
/// Stamps order by tick first and sequence second, which is the order every
/// layout preserves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Stamp {
    /// Tick the stamp was issued in.
    pub tick: i64,
    /// Position within the tick.
    pub sequence: u16,
}

impl Stamp {
    /// Creates a stamp from its parts.
    pub const fn new(tick: i64, sequence: u16) -> Self {
        Self { tick, sequence }
    }

    /// Upper 32 bits of the tick.
    pub const fn tick_high(&self) -> u32 {
        (self.tick >> 32) as u32
    }

    /// Lower 32 bits of the tick.
    pub const fn tick_low(&self) -> u32 {
        self.tick as u32
    }

    /// Reassembles a stamp from split tick halves.
    pub const fn from_halves(tick_high: u32, tick_low: u32, sequence: u16) -> Self {
        Self {
            tick: ((tick_high as i64) << 32) | tick_low as i64,
            sequence,
        }
    }
}

/// A minimal interface for issuing strictly increasing stamps.
///
/// Implementations own their [`GeneratorState`] exclusively. For two calls
/// where the first completes before the second begins, the second stamp is
/// strictly greater. Concurrent calls never observe the same stamp.
pub trait Sequencer {
    /// Time source consulted once per call, outside any critical section.
    type Clock: TimeSource;

    /// Creates a sequencer with `last_tick = 0` and `sequence = 0`.
    fn new(clock: Self::Clock) -> Self
    where
        Self: Sized,
    {
        Self::from_state(GeneratorState::ZERO, clock)
    }

    /// Creates a sequencer preloaded with `state`.
    fn from_state(state: GeneratorState, clock: Self::Clock) -> Self
    where
        Self: Sized;

    /// Issues the next stamp.
    fn next_stamp(&self) -> Stamp;

    /// Returns a snapshot of the current state.
    fn state(&self) -> GeneratorState;
}
