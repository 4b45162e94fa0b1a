use core::fmt;

use uuid::{Builder, Uuid};

use crate::{
    error::Result,
    generator::{Generator, GeneratorRegistry, GuidGenerator},
    layout::Layout,
    rand::{RandSource, ThreadRandom},
    sequencer::{Sequencer, SpinSequencer},
    strategy::Optimization,
    time::MonotonicClock,
};

/// Produces identifiers according to an [`Optimization`].
///
/// The generator is resolved once, in [`IdFactory::new`]; afterwards
/// producing an identifier cannot fail.
///
/// # Example
/// ```
/// use seqguid::{
///     generator::GeneratorRegistry,
///     strategy::{IdFactory, Optimization},
/// };
///
/// let registry = GeneratorRegistry::system();
/// let factory = IdFactory::new(&registry, Optimization::MySql)?;
///
/// let a = factory.new_id_text();
/// let b = factory.new_id_text();
/// assert!(a < b);
/// # Ok::<(), seqguid::Error>(())
/// ```
pub struct IdFactory<S = SpinSequencer<MonotonicClock>, R = ThreadRandom> {
    optimization: Optimization,
    generator: Option<Generator<S>>,
    text: Option<Generator<S>>,
    rng: R,
}

impl<S> IdFactory<S>
where
    S: Sequencer,
    S::Clock: Clone,
{
    /// Resolves the generator for `optimization` from `registry`.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`GeneratorRegistry::get_or_create`].
    pub fn new(registry: &GeneratorRegistry<S>, optimization: Optimization) -> Result<Self> {
        Self::with_rand(registry, optimization, ThreadRandom)
    }
}

impl<S, R> IdFactory<S, R>
where
    S: Sequencer,
    S::Clock: Clone,
    R: RandSource<u128>,
{
    /// Like [`IdFactory::new`], drawing random identifiers from `rng`.
    pub fn with_rand(
        registry: &GeneratorRegistry<S>,
        optimization: Optimization,
        rng: R,
    ) -> Result<Self> {
        let generator = match optimization.plan() {
            Some((config, layout)) => Some(registry.get_or_create(config)?.with_layout(layout)),
            None => None,
        };
        // Text ids always use the string layout so they sort as text.
        let text = generator.as_ref().map(|g| g.with_layout(Layout::String));

        Ok(Self {
            optimization,
            generator,
            text,
            rng,
        })
    }

    /// The strategy this factory was built for.
    pub fn optimization(&self) -> Optimization {
        self.optimization
    }

    /// The underlying generator; `None` when producing random identifiers.
    pub fn generator(&self) -> Option<&Generator<S>> {
        self.generator.as_ref()
    }

    /// Returns the next identifier in lowercase hyphenated text form.
    pub fn new_id_text(&self) -> String {
        match &self.text {
            Some(text) => text.new_id_text(),
            None => self.random_id().hyphenated().to_string(),
        }
    }

    fn random_id(&self) -> Uuid {
        Builder::from_random_bytes(self.rng.rand().to_le_bytes()).into_uuid()
    }
}

impl<S, R> GuidGenerator for IdFactory<S, R>
where
    S: Sequencer,
    S::Clock: Clone,
    R: RandSource<u128>,
{
    fn new_id(&self) -> Uuid {
        match &self.generator {
            Some(generator) => generator.new_id(),
            None => self.random_id(),
        }
    }
}

impl<S, R> Clone for IdFactory<S, R>
where
    R: Clone,
{
    fn clone(&self) -> Self {
        Self {
            optimization: self.optimization,
            generator: self.generator.clone(),
            text: self.text.clone(),
            rng: self.rng.clone(),
        }
    }
}

impl<S, R> fmt::Debug for IdFactory<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdFactory")
            .field("optimization", &self.optimization)
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}
