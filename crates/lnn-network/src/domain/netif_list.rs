//! # Managed Interfaces
//!
//! The ordered set of interfaces LNN is allowed to bind transports to.

use crate::domain::VisitControl;
use lnn_types::{ConnectionAddrType, NetifType};

/// One configured interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetifEntry {
    /// Kernel interface name.
    pub if_name: String,
    /// Coarse interface kind.
    pub netif_type: NetifType,
}

impl NetifEntry {
    /// Create an entry.
    pub fn new(if_name: impl Into<String>, netif_type: NetifType) -> Self {
        Self {
            if_name: if_name.into(),
            netif_type,
        }
    }
}

/// Interfaces in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetifList {
    entries: Vec<NetifEntry>,
}

impl NetifList {
    /// Wrap already-validated entries.
    pub fn new(entries: Vec<NetifEntry>) -> Self {
        Self { entries }
    }

    /// Iterate in order until `f` returns [`VisitControl::Stop`].
    ///
    /// Returns `false` if the walk was stopped early.
    pub fn visit<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&NetifEntry) -> VisitControl,
    {
        for entry in &self.entries {
            if f(entry) == VisitControl::Stop {
                return false;
            }
        }
        true
    }

    /// Coarse type of a configured interface.
    pub fn netif_type_by_name(&self, if_name: &str) -> Option<NetifType> {
        self.entries
            .iter()
            .find(|e| e.if_name == if_name)
            .map(|e| e.netif_type)
    }

    /// Mesh address type of a configured interface.
    pub fn addr_type_by_if_name(&self, if_name: &str) -> Option<ConnectionAddrType> {
        self.netif_type_by_name(if_name).map(NetifType::addr_type)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &NetifEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NetifList {
        NetifList::new(vec![
            NetifEntry::new("eth0", NetifType::Eth),
            NetifEntry::new("wlan0", NetifType::Wlan),
            NetifEntry::new("br0", NetifType::Br),
        ])
    }

    #[test]
    fn test_lookup_by_name() {
        let list = sample();
        assert_eq!(list.netif_type_by_name("wlan0"), Some(NetifType::Wlan));
        assert_eq!(
            list.addr_type_by_if_name("eth0"),
            Some(ConnectionAddrType::Eth)
        );
        assert_eq!(list.netif_type_by_name("usb0"), None);
    }

    #[test]
    fn test_visit_stops_early() {
        let list = sample();
        let mut seen = Vec::new();
        let completed = list.visit(|e| {
            seen.push(e.if_name.clone());
            if e.if_name == "wlan0" {
                VisitControl::Stop
            } else {
                VisitControl::Continue
            }
        });
        assert!(!completed);
        assert_eq!(seen, vec!["eth0", "wlan0"]);
    }
}
