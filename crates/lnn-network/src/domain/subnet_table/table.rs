//! Slot storage and operations.

use crate::domain::{Subnet, VisitControl};
use lnn_types::{ConnectionAddrType, LnnError, ProtocolType};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Hard ceiling on concurrently live subnets.
pub const MAX_SUBNETS: usize = 4;

type Slot = Option<Arc<dyn Subnet>>;

/// Process-wide table of live subnets.
pub struct SubnetTable {
    slots: Mutex<[Slot; MAX_SUBNETS]>,
}

impl Default for SubnetTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SubnetTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Default::default()),
        }
    }

    /// Store `subnet` in the first free slot, then evaluate it once.
    ///
    /// Returns the slot index. A subnet for the same interface and protocol
    /// is rejected, as is any registration while every slot is taken.
    pub fn register(&self, subnet: Arc<dyn Subnet>) -> Result<usize, LnnError> {
        let index = {
            let mut slots = self.slots.lock();

            if slots.iter().flatten().any(|s| {
                s.protocol() == subnet.protocol() && s.if_name() == subnet.if_name()
            }) {
                warn!(
                    if_name = subnet.if_name(),
                    protocol = %subnet.protocol(),
                    "Subnet already registered"
                );
                return Err(LnnError::AlreadyRegistered(format!(
                    "{} on {}",
                    subnet.protocol(),
                    subnet.if_name()
                )));
            }

            let Some(index) = slots.iter().position(Option::is_none) else {
                warn!(
                    if_name = subnet.if_name(),
                    protocol = %subnet.protocol(),
                    "Subnet table full"
                );
                return Err(LnnError::TableFull {
                    capacity: MAX_SUBNETS,
                });
            };

            slots[index] = Some(subnet.clone());
            index
        };

        info!(
            if_name = subnet.if_name(),
            protocol = %subnet.protocol(),
            slot = index,
            "Subnet registered"
        );
        subnet.on_netif_status_changed();
        Ok(index)
    }

    /// Remove and destroy every subnet of `protocol`. Returns how many.
    pub fn unregister_by_protocol(&self, protocol: ProtocolType) -> usize {
        let removed = self.take_where(|s| s.protocol() == protocol);
        for subnet in &removed {
            subnet.destroy();
        }
        debug!(protocol = %protocol, count = removed.len(), "Subnets unregistered");
        removed.len()
    }

    /// Remove and destroy the subnet of `protocol` on `if_name`.
    pub fn unregister(&self, if_name: &str, protocol: ProtocolType) -> Result<(), LnnError> {
        let removed = self.take_where(|s| s.protocol() == protocol && s.if_name() == if_name);
        if removed.is_empty() {
            return Err(LnnError::NotFound(format!("{protocol} on {if_name}")));
        }
        for subnet in &removed {
            subnet.destroy();
        }
        debug!(if_name, protocol = %protocol, "Subnet unregistered");
        Ok(())
    }

    /// Re-evaluate the subnet(s) of `protocol` on `if_name`.
    ///
    /// Returns how many subnets were notified.
    pub fn notify_address_changed(&self, if_name: &str, protocol: ProtocolType) -> usize {
        let matched = self.collect_where(|s| s.protocol() == protocol && s.if_name() == if_name);
        for subnet in &matched {
            subnet.on_netif_status_changed();
        }
        matched.len()
    }

    /// Tell subnets their mesh peers are gone.
    ///
    /// With `Some(addr_type)`, only subnets whose interface resolves to that
    /// address type through `resolve` are notified; `None` notifies all.
    pub fn notify_all_disconnected_by_addr_type<R>(
        &self,
        addr_type: Option<ConnectionAddrType>,
        resolve: R,
    ) -> usize
    where
        R: Fn(&str) -> Option<ConnectionAddrType>,
    {
        // Resolution runs outside the lock.
        let matched: Vec<_> = self
            .collect_where(|_| true)
            .into_iter()
            .filter(|s| match addr_type {
                None => true,
                Some(wanted) => resolve(s.if_name()) == Some(wanted),
            })
            .collect();
        for subnet in &matched {
            subnet.on_softbus_network_disconnected();
        }
        debug!(addr_type = ?addr_type, count = matched.len(), "Subnets notified of mesh loss");
        matched.len()
    }

    /// Walk live subnets in slot order until `f` returns
    /// [`VisitControl::Stop`]. Returns `false` if stopped early.
    pub fn visit<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&dyn Subnet) -> VisitControl,
    {
        for subnet in self.collect_where(|_| true) {
            if f(&*subnet) == VisitControl::Stop {
                return false;
            }
        }
        true
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.lock().iter().flatten().count()
    }

    /// Whether every slot is free.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collect_where<P>(&self, pred: P) -> Vec<Arc<dyn Subnet>>
    where
        P: Fn(&dyn Subnet) -> bool,
    {
        self.slots
            .lock()
            .iter()
            .flatten()
            .filter(|s| pred(s.as_ref()))
            .cloned()
            .collect()
    }

    fn take_where<P>(&self, pred: P) -> Vec<Arc<dyn Subnet>>
    where
        P: Fn(&dyn Subnet) -> bool,
    {
        let mut slots = self.slots.lock();
        let mut removed = Vec::new();
        for slot in slots.iter_mut() {
            if slot.as_ref().is_some_and(|s| pred(s.as_ref())) {
                removed.extend(slot.take());
            }
        }
        removed
    }
}
