use crate::sequencer::Stamp;

/// Largest value the stored sequence counter reaches.
///
/// Only `0..MAX_SEQUENCE` is ever handed out within one tick: a call that finds
/// the counter at `MAX_SEQUENCE` advances the tick instead.
pub const MAX_SEQUENCE: u16 = u16::MAX;

/// The mutable heart of a sequencer.
///
/// `last_tick` never decreases. `sequence` is the value the next call in the
/// same tick will hand out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GeneratorState {
    last_tick: i64,
    sequence: u16,
}

impl GeneratorState {
    /// Initial state of a fresh sequencer.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a state from explicit components, e.g. to resume after a
    /// restart with a known high-water mark.
    pub const fn new(last_tick: i64, sequence: u16) -> Self {
        Self {
            last_tick,
            sequence,
        }
    }

    /// Tick of the most recently issued stamp.
    pub const fn last_tick(&self) -> i64 {
        self.last_tick
    }

    /// Sequence the next call in the same tick will hand out.
    pub const fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Computes the successor state for a call that observed `now`, together
    /// with the stamp that call receives.
    ///
    /// - `now` past `last_tick`: move to `now`, restart the sequence.
    /// - sequence exhausted: force `last_tick + 1`, restart the sequence. This
    ///   keeps making progress while the clock stalls or steps backwards.
    /// - otherwise: stay on `last_tick` and hand out the next sequence.
    #[inline]
    #[must_use]
    pub const fn advance(self, now: i64) -> (Self, Stamp) {
        let (tick, sequence) = if now > self.last_tick {
            (now, 0)
        } else if self.sequence == MAX_SEQUENCE {
            (self.last_tick + 1, 0)
        } else {
            (self.last_tick, self.sequence)
        };

        (Self::new(tick, sequence + 1), Stamp::new(tick, sequence))
    }

    /// Packs the state into 80 significant bits: tick above, sequence in the
    /// low 16.
    pub const fn to_raw(self) -> u128 {
        ((self.last_tick as u64 as u128) << 16) | self.sequence as u128
    }

    /// Inverse of [`GeneratorState::to_raw`].
    pub const fn from_raw(raw: u128) -> Self {
        Self::new((raw >> 16) as u64 as i64, raw as u16)
    }
}
