use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{Generator, GeneratorConfiguration, Source},
    identity::{HostIdentity, SystemIdentity},
    layout::Layout,
    sequencer::{Sequencer, SpinSequencer},
    time::MonotonicClock,
};

struct Inner<S> {
    /// First configuration that was successfully created.
    active: Option<GeneratorConfiguration>,
    sources: HashMap<GeneratorConfiguration, Arc<Source<S>>>,
}

/// Hands out generators and caches one source per configuration.
///
/// A registry is an ordinary value: create one at start-up and share it.
/// Generators obtained from different registries do not coordinate.
///
/// By default a registry refuses to create a second, different
/// configuration, because two sources on one host may embed overlapping
/// node bytes and would then only be distinguishable by their timestamps.
/// [`GeneratorRegistry::allow_mixed_configurations`] lifts the restriction.
///
/// # Example
/// ```
/// use seqguid::generator::{GeneratorConfiguration, GeneratorRegistry, GuidGenerator};
///
/// let registry = GeneratorRegistry::system();
/// let generator = registry.get_or_create(GeneratorConfiguration::default())?;
///
/// let a = generator.new_id();
/// let b = generator.new_id();
/// assert_ne!(a, b);
/// # Ok::<(), seqguid::Error>(())
/// ```
pub struct GeneratorRegistry<S = SpinSequencer<MonotonicClock>>
where
    S: Sequencer,
{
    identity: Arc<dyn HostIdentity + Send + Sync>,
    clock: S::Clock,
    allow_mixed: bool,
    inner: Mutex<Inner<S>>,
}

impl GeneratorRegistry {
    /// A registry reading identity from the running host and time from a
    /// fresh [`MonotonicClock`].
    pub fn system() -> Self {
        Self::new(SystemIdentity, MonotonicClock::new())
    }
}

impl<S> GeneratorRegistry<S>
where
    S: Sequencer,
    S::Clock: Clone,
{
    /// Creates an empty registry over `identity`, handing a clone of `clock`
    /// to each new source. Mixed configurations are refused until
    /// [`allow_mixed_configurations`](Self::allow_mixed_configurations) says
    /// otherwise.
    pub fn new<H>(identity: H, clock: S::Clock) -> Self
    where
        H: HostIdentity + Send + Sync + 'static,
    {
        Self {
            identity: Arc::new(identity),
            clock,
            allow_mixed: false,
            inner: Mutex::new(Inner {
                active: None,
                sources: HashMap::new(),
            }),
        }
    }

    /// Allows sources with different configurations to coexist.
    pub fn allow_mixed_configurations(mut self, allow: bool) -> Self {
        self.allow_mixed = allow;
        self
    }

    /// Returns a generator for `config`, creating its source on first use.
    ///
    /// The returned handle encodes with [`Layout::SqlServer`]; use
    /// [`Generator::with_layout`] for another layout on the same source.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigurationConflict`] if mixed configurations are
    ///   disabled and another configuration was created first.
    /// - [`Error::WorkerId`] or [`Error::ProcessId`] if the node bytes cannot
    ///   be derived. A failed creation is not cached and does not claim the
    ///   registry.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn get_or_create(&self, config: GeneratorConfiguration) -> Result<Generator<S>> {
        let mut inner = self.inner.lock();

        if let Some(source) = inner.sources.get(&config) {
            #[cfg(feature = "tracing")]
            tracing::debug!(%config, "reusing cached generator source");
            return Ok(Generator::new(Arc::clone(source), Layout::SqlServer));
        }

        if !self.allow_mixed {
            if let Some(active) = inner.active {
                #[cfg(feature = "tracing")]
                tracing::error!(%active, requested = %config, "generator configuration conflict");
                return Err(Error::ConfigurationConflict {
                    active,
                    requested: config,
                });
            }
        }

        let source = Arc::new(Source::create(
            self.identity.as_ref(),
            config,
            self.clock.clone(),
        )?);
        #[cfg(feature = "tracing")]
        tracing::debug!(%config, node = ?source.node(), "created generator source");

        inner.active.get_or_insert(config);
        inner.sources.insert(config, Arc::clone(&source));
        Ok(Generator::new(source, Layout::SqlServer))
    }

    /// The first configuration that was successfully created, if any.
    pub fn active_configuration(&self) -> Option<GeneratorConfiguration> {
        self.inner.lock().active
    }

    /// Number of cached sources.
    pub fn len(&self) -> usize {
        self.inner.lock().sources.len()
    }

    /// `true` until the first source is created.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().sources.is_empty()
    }
}
