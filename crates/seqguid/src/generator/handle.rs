use core::fmt;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::Result,
    generator::{GeneratorConfiguration, GuidGenerator},
    identity::{HostIdentity, Node, ProcessId, WorkerId},
    layout::Layout,
    sequencer::{Sequencer, SpinSequencer, Stamp},
    time::MonotonicClock,
};

/// A node paired with the sequencer that stamps its identifiers.
pub(crate) struct Source<S> {
    node: Node,
    config: GeneratorConfiguration,
    sequencer: S,
}

impl<S> Source<S>
where
    S: Sequencer,
{
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(identity, clock)))]
    pub(crate) fn create<H>(
        identity: &H,
        config: GeneratorConfiguration,
        clock: S::Clock,
    ) -> Result<Self>
    where
        H: HostIdentity + ?Sized,
    {
        let worker = WorkerId::resolve(identity, config.worker_index)?;
        let process = if config.use_process_id {
            Some(ProcessId::resolve(identity)?)
        } else {
            None
        };

        Ok(Self {
            node: Node::new(worker, process),
            config,
            sequencer: S::new(clock),
        })
    }

    pub(crate) fn node(&self) -> Node {
        self.node
    }
}

/// A cheap, clonable handle that issues identifiers in one [`Layout`].
///
/// Handles obtained from the same [`GeneratorRegistry`] for the same
/// configuration share a sequencer, so every identifier they produce is
/// unique and increasing regardless of which handle produced it.
///
/// [`GeneratorRegistry`]: crate::generator::GeneratorRegistry
pub struct Generator<S = SpinSequencer<MonotonicClock>> {
    source: Arc<Source<S>>,
    layout: Layout,
}

impl<S> Generator<S>
where
    S: Sequencer,
{
    pub(crate) fn new(source: Arc<Source<S>>, layout: Layout) -> Self {
        Self { source, layout }
    }

    /// Returns a handle on the same source that encodes with `layout`.
    pub fn with_layout(&self, layout: Layout) -> Self {
        Self {
            source: Arc::clone(&self.source),
            layout,
        }
    }

    /// Captures the next stamp without encoding it.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_stamp(&self) -> Stamp {
        self.source.sequencer.next_stamp()
    }

    /// Returns the next identifier as lowercase hyphenated text.
    pub fn new_id_text(&self) -> String {
        self.layout.encode_text(self.next_stamp(), &self.source.node)
    }

    /// The six node bytes embedded in every identifier.
    pub fn node(&self) -> Node {
        self.source.node()
    }

    /// The configuration of the source behind this handle.
    pub fn configuration(&self) -> GeneratorConfiguration {
        self.source.config
    }

    /// The byte arrangement applied to every identifier from this handle.
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

impl<S> GuidGenerator for Generator<S>
where
    S: Sequencer,
{
    /// Issues the next identifier.
    ///
    /// The stamp is captured under the sequencer's guard; encoding happens
    /// after it is released.
    fn new_id(&self) -> Uuid {
        self.layout.encode(self.next_stamp(), &self.source.node)
    }
}

impl<S> Clone for Generator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            layout: self.layout,
        }
    }
}

impl<S> fmt::Debug for Generator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("node", &self.source.node)
            .field("config", &self.source.config)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
