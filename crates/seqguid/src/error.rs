use core::fmt;
use std::io;

use crate::generator::GeneratorConfiguration;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `seqguid` can produce.
///
/// Every variant surfaces while a generator is being constructed or
/// configured. Producing an identifier from an existing generator never fails.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Neither a network adapter nor the host name yielded a worker id.
    ///
    /// Carries every underlying failure in the order the lookups were tried.
    #[error("unable to derive a worker id: {}", IdentityFailures(.failures))]
    WorkerId { failures: Vec<IdentityError> },

    /// The platform could not supply the current process id.
    #[error("unable to read the current process id")]
    ProcessId(#[source] io::Error),

    /// A generator with another configuration is already active.
    #[error(
        "a generator has already been created with {active}; {requested} is not allowed \
         while mixed configurations are disabled"
    )]
    ConfigurationConflict {
        active: GeneratorConfiguration,
        requested: GeneratorConfiguration,
    },

    /// The string did not name a known optimization strategy.
    #[error("unknown optimization strategy `{0}`")]
    UnknownOptimization(String),
}

/// A single failed attempt at deriving a worker id.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum IdentityError {
    /// Enumeration succeeded but too few Ethernet-class adapters exist.
    #[error("no usable network adapter at index {index} ({found} candidates found)")]
    NoUsableAdapter { index: usize, found: usize },

    /// Network adapters could not be enumerated.
    #[error("unable to enumerate network adapters")]
    Network(#[source] io::Error),

    /// The host name could not be read.
    #[error("unable to retrieve the host name")]
    HostName(#[source] io::Error),

    /// The host name was empty.
    #[error("the host name is empty")]
    EmptyHostName,
}

struct IdentityFailures<'a>(&'a [IdentityError]);

impl fmt::Display for IdentityFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
            if let Some(source) = core::error::Error::source(failure) {
                write!(f, " ({source})")?;
            }
        }
        Ok(())
    }
}
