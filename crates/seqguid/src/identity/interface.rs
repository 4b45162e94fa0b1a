use std::io;

/// The link-layer class of a network adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    /// Wired Ethernet.
    Ethernet,
    /// IEEE 802.11 wireless. Reports Ethernet-style 48-bit addresses.
    Wireless,
    /// The loopback device.
    Loopback,
    /// Anything else (tunnels, bridges to non-Ethernet media, ...).
    Other,
}

impl AdapterKind {
    /// Returns `true` for adapters whose hardware address is a registered
    /// Ethernet-class MAC.
    pub const fn is_ethernet_class(self) -> bool {
        matches!(self, Self::Ethernet | Self::Wireless)
    }
}

/// A network adapter as reported by the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NetworkAdapter {
    /// Interface name, e.g. `eth0`.
    pub name: String,
    /// Link-layer class.
    pub kind: AdapterKind,
    /// Physical address. Ethernet-class adapters report exactly six bytes.
    pub address: Vec<u8>,
}

/// Source of the host facts a generator derives its identity from.
///
/// [`SystemIdentity`] reads them from the operating system. Tests and
/// embedders that need deterministic worker ids supply their own
/// implementation.
///
/// # Example
///
/// ```
/// use std::io;
/// use seqguid::identity::{HostIdentity, NetworkAdapter, WorkerId};
///
/// struct Fixed;
/// impl HostIdentity for Fixed {
///     fn network_adapters(&self) -> io::Result<Vec<NetworkAdapter>> {
///         Ok(Vec::new())
///     }
///     fn host_name(&self) -> io::Result<String> {
///         Ok("build-agent-7".to_owned())
///     }
///     fn process_id(&self) -> io::Result<u32> {
///         Ok(4242)
///     }
/// }
///
/// let worker = WorkerId::resolve(&Fixed, 0).unwrap();
/// assert!(worker.is_synthetic());
/// ```
///
/// [`SystemIdentity`]: crate::identity::SystemIdentity
pub trait HostIdentity {
    /// Lists the host's network adapters in a stable order.
    fn network_adapters(&self) -> io::Result<Vec<NetworkAdapter>>;

    /// Returns the host name.
    fn host_name(&self) -> io::Result<String>;

    /// Returns the id of the current process.
    fn process_id(&self) -> io::Result<u32>;
}
