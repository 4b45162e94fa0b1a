use std::io;

use crate::identity::{HostIdentity, NetworkAdapter};

/// Reads host identity from the operating system.
///
/// - Network adapters are enumerated with `getifaddrs`: `AF_PACKET` entries on
///   Linux, `AF_LINK` entries on macOS, iOS and the BSDs. On any other
///   platform enumeration reports [`io::ErrorKind::Unsupported`], so worker
///   ids there always come from the host-name hash and `worker_index` only
///   varies the hashed input.
/// - The host name comes from `gethostname` on unix and from the
///   `COMPUTERNAME`/`HOSTNAME` environment variables elsewhere.
/// - The process id comes from [`std::process::id`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemIdentity;

impl HostIdentity for SystemIdentity {
    fn network_adapters(&self) -> io::Result<Vec<NetworkAdapter>> {
        ifaddrs::adapters()
    }

    fn host_name(&self) -> io::Result<String> {
        #[cfg(unix)]
        {
            unix::host_name()
        }
        #[cfg(not(unix))]
        {
            std::env::var("COMPUTERNAME")
                .or_else(|_| std::env::var("HOSTNAME"))
                .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))
        }
    }

    fn process_id(&self) -> io::Result<u32> {
        Ok(std::process::id())
    }
}

#[cfg(unix)]
mod unix {
    use std::io;

    pub(super) fn host_name() -> io::Result<String> {
        // POSIX caps host names at 255 bytes; one more keeps a NUL in place.
        let mut buf = [0u8; 256];
        // SAFETY: the pointer and length describe `buf`, which outlives the
        // call. gethostname writes at most `len` bytes.
        let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
mod ifaddrs {
    use std::{ffi::CStr, io};

    use crate::identity::NetworkAdapter;

    /// Turn a C failure (-1 is returned) into a rust Result
    fn cerr(t: libc::c_int) -> io::Result<libc::c_int> {
        match t {
            -1 => Err(io::Error::last_os_error()),
            _ => Ok(t),
        }
    }

    pub(super) fn adapters() -> io::Result<Vec<NetworkAdapter>> {
        Ok(InterfaceIterator::new()?.collect())
    }

    /// Walks the `getifaddrs` list, yielding one adapter per link-layer entry.
    pub(super) struct InterfaceIterator {
        base: *mut libc::ifaddrs,
        next: *mut libc::ifaddrs,
    }

    impl InterfaceIterator {
        pub(super) fn new() -> io::Result<Self> {
            let mut addrs = core::mem::MaybeUninit::<*mut libc::ifaddrs>::uninit();

            // SAFETY: getifaddrs initializes `addrs` when it returns 0, and
            // `cerr` returns before `assume_init` otherwise.
            unsafe {
                cerr(libc::getifaddrs(addrs.as_mut_ptr()))?;

                Ok(Self {
                    base: addrs.assume_init(),
                    next: addrs.assume_init(),
                })
            }
        }
    }

    impl Drop for InterfaceIterator {
        fn drop(&mut self) {
            // SAFETY: `base` came from a successful getifaddrs and is freed
            // exactly once, here.
            unsafe { libc::freeifaddrs(self.base) };
        }
    }

    impl Iterator for InterfaceIterator {
        type Item = NetworkAdapter;

        fn next(&mut self) -> Option<Self::Item> {
            loop {
                // SAFETY: `next` is null or points into the list owned by
                // `base`, which lives until `self` is dropped.
                let ifaddr = unsafe { self.next.as_ref() }?;
                self.next = ifaddr.ifa_next;

                if ifaddr.ifa_addr.is_null() || ifaddr.ifa_name.is_null() {
                    continue;
                }
                // SAFETY: ifa_name is a non-null, NUL-terminated string owned
                // by the list.
                let name = unsafe { CStr::from_ptr(ifaddr.ifa_name) }
                    .to_string_lossy()
                    .into_owned();

                if let Some(adapter) = super::link::adapter(ifaddr.ifa_addr, name) {
                    return Some(adapter);
                }
            }
        }
    }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
)))]
mod ifaddrs {
    use std::io;

    use crate::identity::NetworkAdapter;

    pub(super) fn adapters() -> io::Result<Vec<NetworkAdapter>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "network adapter enumeration is not supported on this platform",
        ))
    }
}

#[cfg(target_os = "linux")]
mod link {
    use std::path::Path;

    use crate::identity::{AdapterKind, NetworkAdapter};

    /// Decodes an `AF_PACKET` address; `None` for any other family.
    pub(super) fn adapter(addr: *const libc::sockaddr, name: String) -> Option<NetworkAdapter> {
        // SAFETY: getifaddrs hands out a valid, non-null sockaddr; every
        // family starts with the sockaddr header.
        let family = unsafe { (*addr).sa_family };
        if libc::c_int::from(family) != libc::AF_PACKET {
            return None;
        }

        // SAFETY: AF_PACKET entries are `sockaddr_ll` records. The record
        // carries no alignment guarantee.
        let ll: libc::sockaddr_ll =
            unsafe { std::ptr::read_unaligned(addr.cast::<libc::sockaddr_ll>()) };

        let halen = usize::from(ll.sll_halen).min(ll.sll_addr.len());
        let kind = match ll.sll_hatype {
            libc::ARPHRD_ETHER if is_wireless(&name) => AdapterKind::Wireless,
            libc::ARPHRD_ETHER => AdapterKind::Ethernet,
            libc::ARPHRD_LOOPBACK => AdapterKind::Loopback,
            _ => AdapterKind::Other,
        };

        Some(NetworkAdapter {
            name,
            kind,
            address: ll.sll_addr[..halen].to_vec(),
        })
    }

    fn is_wireless(name: &str) -> bool {
        Path::new("/sys/class/net")
            .join(name)
            .join("wireless")
            .exists()
    }
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
mod link {
    use core::mem::offset_of;

    use crate::identity::{AdapterKind, NetworkAdapter};

    // Interface types from <net/if_types.h>, identical across the BSDs.
    const IFT_ETHER: u8 = 0x06;
    const IFT_LOOP: u8 = 0x18;

    /// Decodes an `AF_LINK` address; `None` for any other family.
    ///
    /// Wireless adapters report `IFT_ETHER` here, so they come back as
    /// [`AdapterKind::Ethernet`].
    pub(super) fn adapter(addr: *const libc::sockaddr, name: String) -> Option<NetworkAdapter> {
        // SAFETY: getifaddrs hands out a valid, non-null sockaddr; every
        // family starts with the sockaddr header.
        let family = unsafe { (*addr).sa_family };
        if libc::c_int::from(family) != libc::AF_LINK {
            return None;
        }

        // SAFETY: AF_LINK entries are `sockaddr_dl` records at least as long
        // as the fixed header. The record carries no alignment guarantee.
        let dl: libc::sockaddr_dl =
            unsafe { std::ptr::read_unaligned(addr.cast::<libc::sockaddr_dl>()) };

        // `sdl_data` holds the name followed by the address and may run past
        // the declared array; `sdl_len` bounds the whole record.
        let start = offset_of!(libc::sockaddr_dl, sdl_data) + usize::from(dl.sdl_nlen);
        let len = usize::from(dl.sdl_alen);
        if start + len > usize::from(dl.sdl_len) {
            return None;
        }
        // SAFETY: `start + len` lies within the `sdl_len` bytes of the record.
        let address =
            unsafe { core::slice::from_raw_parts(addr.cast::<u8>().add(start), len) }.to_vec();

        let kind = match dl.sdl_type {
            IFT_ETHER => AdapterKind::Ethernet,
            IFT_LOOP => AdapterKind::Loopback,
            _ => AdapterKind::Other,
        };

        Some(NetworkAdapter {
            name,
            kind,
            address,
        })
    }
}
