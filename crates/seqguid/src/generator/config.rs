use core::fmt;

/// The settings that distinguish one generator source from another.
///
/// Two requests with equal configurations share one source, and so one
/// sequencer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case", default))]
pub struct GeneratorConfiguration {
    /// Which Ethernet-class adapter (in enumeration order) supplies the
    /// worker id.
    pub worker_index: usize,
    /// Replace the last two worker bytes with the low two bytes of the
    /// process id.
    pub use_process_id: bool,
}

impl GeneratorConfiguration {
    /// Builds a configuration; see the field docs for each setting.
    pub const fn new(worker_index: usize, use_process_id: bool) -> Self {
        Self {
            worker_index,
            use_process_id,
        }
    }
}

impl fmt::Display for GeneratorConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(worker_index={}, use_process_id={})",
            self.worker_index, self.use_process_id
        )
    }
}
