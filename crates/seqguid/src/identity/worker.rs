use core::fmt;

use sha3::{Digest, Sha3_256};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, IdentityError, Result},
    identity::HostIdentity,
};

/// Bit forced on in the first byte of a worker id hashed from the host name.
///
/// It is a marker only. Plenty of real adapter addresses also carry it, so
/// a hashed id can still equal some adapter's address, and the bit alone
/// does not tell the two origins apart. Use [`WorkerId::is_synthetic`] for
/// that.
pub const SYNTHETIC_WORKER_BIT: u8 = 0x80;

/// Six bytes identifying the host a generator runs on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId {
    bytes: [u8; 6],
    synthetic: bool,
}

impl WorkerId {
    /// Wraps raw worker bytes taken from an adapter address.
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self {
            bytes,
            synthetic: false,
        }
    }

    /// Returns the raw worker bytes.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.bytes
    }

    /// Returns `true` if this id was hashed from the host name rather than
    /// read from an adapter.
    pub const fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Derives the worker id for `index`.
    ///
    /// The first choice is the physical address of the `index`-th
    /// Ethernet-class adapter that reports a six-byte address. When no such
    /// adapter exists, the host name is hashed instead (see
    /// [`WorkerId::from_host_name`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerId`] carrying both underlying failures when
    /// neither path produces an id.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(identity)))]
    pub fn resolve<H>(identity: &H, index: usize) -> Result<Self>
    where
        H: HostIdentity + ?Sized,
    {
        let mut failures = Vec::with_capacity(2);

        match Self::from_network(identity, index) {
            Ok(id) => return Ok(id),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "no adapter address available, hashing the host name");
                failures.push(e);
            }
        }

        match Self::from_host_name(identity, index) {
            Ok(id) => Ok(id),
            Err(e) => {
                failures.push(e);
                Err(Error::WorkerId { failures })
            }
        }
    }

    /// Picks the `index`-th usable adapter address.
    ///
    /// # Errors
    ///
    /// Fails if enumeration fails or fewer than `index + 1` usable adapters
    /// exist.
    pub fn from_network<H>(identity: &H, index: usize) -> Result<Self, IdentityError>
    where
        H: HostIdentity + ?Sized,
    {
        let adapters = identity.network_adapters().map_err(IdentityError::Network)?;
        let candidates: Vec<[u8; 6]> = adapters
            .iter()
            .filter(|adapter| adapter.kind.is_ethernet_class())
            .filter_map(|adapter| <[u8; 6]>::try_from(adapter.address.as_slice()).ok())
            .collect();

        candidates
            .get(index)
            .map(|&address| Self::from_bytes(address))
            .ok_or(IdentityError::NoUsableAdapter {
                index,
                found: candidates.len(),
            })
    }

    /// Hashes the host name into a synthetic worker id.
    ///
    /// The UTF-8 host name is hashed with SHA3-256 and the last six digest
    /// bytes are kept, with [`SYNTHETIC_WORKER_BIT`] forced on. For a
    /// non-zero `index` the index is appended to the hashed input so distinct
    /// indexes stay distinct on hosts without adapters.
    ///
    /// # Errors
    ///
    /// Fails if the host name cannot be read or is empty.
    pub fn from_host_name<H>(identity: &H, index: usize) -> Result<Self, IdentityError>
    where
        H: HostIdentity + ?Sized,
    {
        let host_name = identity.host_name().map_err(IdentityError::HostName)?;
        if host_name.is_empty() {
            return Err(IdentityError::EmptyHostName);
        }

        let mut hasher = Sha3_256::new();
        hasher.update(host_name.as_bytes());
        if index != 0 {
            hasher.update(format!("/{index}").as_bytes());
        }
        let digest = hasher.finalize();

        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&digest[digest.len() - 6..]);
        bytes[0] |= SYNTHETIC_WORKER_BIT;
        Ok(Self {
            bytes,
            synthetic: true,
        })
    }
}

impl fmt::Debug for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WorkerId").field(&format_args!("{self}")).finish()
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.bytes;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Two bytes of the current process id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProcessId([u8; 2]);

impl ProcessId {
    /// Wraps raw process bytes.
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    /// Returns the raw process bytes.
    pub const fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    /// Reads the low two bytes of the current process id, least significant
    /// byte first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProcessId`] if the platform cannot supply a process
    /// id.
    pub fn resolve<H>(identity: &H) -> Result<Self>
    where
        H: HostIdentity + ?Sized,
    {
        let pid = identity.process_id().map_err(Error::ProcessId)?;
        let [lo, hi, ..] = pid.to_le_bytes();
        Ok(Self([lo, hi]))
    }
}

/// The six bytes embedded in every identifier of one generator.
///
/// Worker bytes `0..4` always come first. The last two bytes are either worker
/// bytes `4..6` or the [`ProcessId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Node([u8; 6]);

impl Node {
    /// Combines a worker id with an optional process id.
    pub const fn new(worker: WorkerId, process: Option<ProcessId>) -> Self {
        let w = worker.bytes;
        match process {
            Some(ProcessId([p0, p1])) => Self([w[0], w[1], w[2], w[3], p0, p1]),
            None => Self(w),
        }
    }

    /// Wraps raw node bytes.
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Returns the raw node bytes.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}
