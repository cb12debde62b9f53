// Router registry
// Whitelist of external venue routers, tagged by the interface they speak
//
// Numan Thabit 2025 Nov

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_ROUTERS;
use crate::control::OwnerCap;
use crate::errors::RouterError;

/// Which call interface a venue router exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RouterKind {
    /// V2-style: direct quote, no fee-tier parameter.
    ConstantProduct,
    /// V3-style: every call names a fee tier.
    ConcentratedLiquidity,
}

impl RouterKind {
    pub fn requires_fee_tier(&self) -> bool {
        matches!(self, Self::ConcentratedLiquidity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouterEntry {
    pub address: Address,
    pub kind: RouterKind,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterRegistry {
    // insertion order is kept for listing
    entries: Vec<RouterEntry>,
}

impl RouterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        _cap: &OwnerCap,
        address: Address,
        kind: RouterKind,
    ) -> Result<RouterEntry, RouterError> {
        if address.is_zero() {
            return Err(RouterError::ZeroAddress);
        }
        if self.get(address).is_some() {
            return Err(RouterError::DuplicateRouter(address));
        }
        if self.entries.len() >= MAX_ROUTERS {
            return Err(RouterError::CapacityExceeded {
                what: "router",
                max: MAX_ROUTERS,
            });
        }
        let entry = RouterEntry {
            address,
            kind,
            active: true,
        };
        self.entries.push(entry);
        Ok(entry)
    }

    pub fn remove(&mut self, _cap: &OwnerCap, address: Address) -> Result<RouterEntry, RouterError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.address == address)
            .ok_or(RouterError::UnknownRouter(address))?;
        Ok(self.entries.remove(idx))
    }

    /// Returns `true` if the flag actually changed.
    pub fn set_active(
        &mut self,
        _cap: &OwnerCap,
        address: Address,
        active: bool,
    ) -> Result<bool, RouterError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.address == address)
            .ok_or(RouterError::UnknownRouter(address))?;
        let changed = entry.active != active;
        entry.active = active;
        Ok(changed)
    }

    pub fn get(&self, address: Address) -> Option<&RouterEntry> {
        self.entries.iter().find(|e| e.address == address)
    }

    pub fn is_active(&self, address: Address) -> bool {
        self.get(address).is_some_and(|e| e.active)
    }

    /// Look up an entry that may be used for trading right now.
    pub fn resolve_active(&self, address: Address) -> Result<&RouterEntry, RouterError> {
        self.get(address)
            .filter(|e| e.active)
            .ok_or(RouterError::UnknownRouter(address))
    }

    pub fn list(&self, kind: RouterKind) -> Vec<RouterEntry> {
        self.entries.iter().filter(|e| e.kind == kind).copied().collect()
    }

    pub fn count(&self, kind: RouterKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Active entries of every kind, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &RouterEntry> {
        self.entries.iter().filter(|e| e.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn add_list_and_count_by_kind() {
        let cap = OwnerCap::for_tests();
        let mut reg = RouterRegistry::new();
        reg.add(&cap, addr(1), RouterKind::ConstantProduct).unwrap();
        reg.add(&cap, addr(2), RouterKind::ConcentratedLiquidity).unwrap();
        reg.add(&cap, addr(3), RouterKind::ConstantProduct).unwrap();

        assert_eq!(reg.count(RouterKind::ConstantProduct), 2);
        assert_eq!(reg.count(RouterKind::ConcentratedLiquidity), 1);
        let v2: Vec<_> = reg
            .list(RouterKind::ConstantProduct)
            .into_iter()
            .map(|e| e.address)
            .collect();
        assert_eq!(v2, vec![addr(1), addr(3)]);
        assert!(reg.is_active(addr(2)));
    }

    #[test]
    fn duplicate_and_unknown() {
        let cap = OwnerCap::for_tests();
        let mut reg = RouterRegistry::new();
        reg.add(&cap, addr(1), RouterKind::ConstantProduct).unwrap();
        assert_eq!(
            reg.add(&cap, addr(1), RouterKind::ConcentratedLiquidity),
            Err(RouterError::DuplicateRouter(addr(1)))
        );
        assert_eq!(
            reg.remove(&cap, addr(9)),
            Err(RouterError::UnknownRouter(addr(9)))
        );
        assert_eq!(
            reg.add(&cap, Address::ZERO, RouterKind::ConstantProduct),
            Err(RouterError::ZeroAddress)
        );
    }

    #[test]
    fn inactive_entries_do_not_resolve() {
        let cap = OwnerCap::for_tests();
        let mut reg = RouterRegistry::new();
        reg.add(&cap, addr(1), RouterKind::ConstantProduct).unwrap();
        assert!(reg.set_active(&cap, addr(1), false).unwrap());
        assert!(!reg.set_active(&cap, addr(1), false).unwrap());
        assert!(!reg.is_active(addr(1)));
        assert_eq!(
            reg.resolve_active(addr(1)),
            Err(RouterError::UnknownRouter(addr(1)))
        );
        assert_eq!(reg.active().count(), 0);
        // still listed and counted
        assert_eq!(reg.count(RouterKind::ConstantProduct), 1);
    }

    #[test]
    fn removal_forgets_the_entry() {
        let cap = OwnerCap::for_tests();
        let mut reg = RouterRegistry::new();
        reg.add(&cap, addr(1), RouterKind::ConcentratedLiquidity).unwrap();
        let removed = reg.remove(&cap, addr(1)).unwrap();
        assert_eq!(removed.kind, RouterKind::ConcentratedLiquidity);
        assert!(reg.get(addr(1)).is_none());
        reg.add(&cap, addr(1), RouterKind::ConstantProduct).unwrap();
    }
}
