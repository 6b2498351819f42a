//! # OS Network Queries
//!
//! `getifaddrs(3)` for addresses, `if_indextoname(3)` for index lookup.
//! Interface kinds come from the configured netif list, falling back to
//! sysfs on Linux.

use crate::domain::NetifList;
use crate::ports::{CollaboratorError, NetQuery};
use lnn_types::NetifType;
use std::ffi::CStr;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

/// [`NetQuery`] backed by libc.
pub struct OsNetQuery {
    netifs: NetifList,
}

impl OsNetQuery {
    /// Create a query that prefers the kinds configured in `netifs`.
    pub fn new(netifs: NetifList) -> Self {
        Self { netifs }
    }

    fn sysfs_netif_type(if_name: &str) -> Option<NetifType> {
        let base = Path::new("/sys/class/net").join(if_name);
        if !base.exists() {
            return None;
        }
        if base.join("wireless").exists() || base.join("phy80211").exists() {
            Some(NetifType::Wlan)
        } else if base.join("device").exists() {
            Some(NetifType::Eth)
        } else {
            None
        }
    }
}

/// First non-loopback IPv4 address on `if_name`.
fn ipv4_of(if_name: &str) -> Result<Option<Ipv4Addr>, io::Error> {
    let mut head: *mut libc::ifaddrs = std::ptr::null_mut();
    // SAFETY: on success `head` owns a list released below.
    if unsafe { libc::getifaddrs(&mut head) } != 0 {
        return Err(io::Error::last_os_error());
    }

    let mut found = None;
    let mut cursor = head;
    while !cursor.is_null() {
        // SAFETY: `cursor` walks the list returned by getifaddrs.
        let entry = unsafe { &*cursor };
        cursor = entry.ifa_next;

        if entry.ifa_addr.is_null() || entry.ifa_name.is_null() {
            continue;
        }
        // SAFETY: ifa_name is a NUL-terminated string owned by the list.
        let name = unsafe { CStr::from_ptr(entry.ifa_name) };
        if name.to_bytes() != if_name.as_bytes() {
            continue;
        }
        // SAFETY: ifa_addr is non-null and starts with sa_family.
        if i32::from(unsafe { (*entry.ifa_addr).sa_family }) != libc::AF_INET {
            continue;
        }
        // SAFETY: AF_INET entries point at a sockaddr_in.
        let sin = unsafe { &*(entry.ifa_addr as *const libc::sockaddr_in) };
        let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));
        if !ip.is_loopback() && !ip.is_unspecified() {
            found = Some(ip);
            break;
        }
    }

    // SAFETY: `head` came from getifaddrs and is freed exactly once.
    unsafe { libc::freeifaddrs(head) };
    Ok(found)
}

impl NetQuery for OsNetQuery {
    fn available_ip(&self, if_name: &str) -> Result<IpAddr, CollaboratorError> {
        ipv4_of(if_name)?
            .map(IpAddr::V4)
            .ok_or_else(|| CollaboratorError::Unavailable(format!("no address on {if_name}")))
    }

    fn if_name_by_index(&self, index: u32) -> Option<String> {
        let mut buf = [0 as libc::c_char; libc::IF_NAMESIZE];
        // SAFETY: `buf` holds IF_NAMESIZE bytes as if_indextoname requires.
        let ptr = unsafe { libc::if_indextoname(index, buf.as_mut_ptr()) };
        if ptr.is_null() {
            return None;
        }
        // SAFETY: on success `buf` holds a NUL-terminated name.
        let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
        name.to_str().ok().map(str::to_string)
    }

    fn netif_type(&self, if_name: &str) -> Option<NetifType> {
        self.netifs
            .netif_type_by_name(if_name)
            .or_else(|| Self::sysfs_netif_type(if_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NetifEntry;

    #[test]
    fn test_loopback_never_available() {
        let query = OsNetQuery::new(NetifList::default());
        assert!(query.available_ip("lo").is_err());
    }

    #[test]
    fn test_configured_kind_wins() {
        let query = OsNetQuery::new(NetifList::new(vec![NetifEntry::new(
            "lo",
            NetifType::Wlan,
        )]));
        assert_eq!(query.netif_type("lo"), Some(NetifType::Wlan));
    }

    #[test]
    fn test_unknown_index() {
        let query = OsNetQuery::new(NetifList::default());
        assert_eq!(query.if_name_by_index(u32::MAX), None);
    }
}
