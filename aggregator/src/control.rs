// Control plane: owner gate, pause switch and reentrancy lock
//
// Administrative entry points receive an explicit AdminContext and must
// obtain an OwnerCap before touching registry, catalog or fee state.
// Swap entry points additionally require the Active state and hold the
// reentrancy lock for the duration of their external venue calls.
//
// Numan Thabit 2025 Nov

use alloy_primitives::Address;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::errors::RouterError;

/// Who is calling an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminContext {
    pub caller: Address,
}

impl AdminContext {
    pub fn new(caller: Address) -> Self {
        Self { caller }
    }
}

/// Proof that the current caller is the owner. Only `AccessControl` mints it.
#[derive(Debug)]
pub struct OwnerCap {
    _private: (),
}

impl OwnerCap {
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self { _private: () }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Active,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControl {
    owner: Address,
    status: Status,
}

impl AccessControl {
    pub fn new(owner: Address) -> Result<Self, RouterError> {
        if owner.is_zero() {
            return Err(RouterError::ZeroAddress);
        }
        Ok(Self {
            owner,
            status: Status::Active,
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    /// Capability check performed at every administrative entry point.
    pub fn authorize(&self, ctx: &AdminContext) -> Result<OwnerCap, RouterError> {
        if ctx.caller != self.owner {
            debug!(caller = %ctx.caller, owner = %self.owner, "rejected non-owner call");
            return Err(RouterError::Unauthorized { caller: ctx.caller });
        }
        Ok(OwnerCap { _private: () })
    }

    pub fn ensure_active(&self) -> Result<(), RouterError> {
        match self.status {
            Status::Active => Ok(()),
            Status::Paused => Err(RouterError::ContractPaused),
        }
    }

    /// Returns `true` on an actual Active -> Paused transition.
    pub fn pause(&mut self, _cap: &OwnerCap) -> bool {
        let changed = self.status == Status::Active;
        self.status = Status::Paused;
        changed
    }

    /// Returns `true` on an actual Paused -> Active transition.
    pub fn unpause(&mut self, _cap: &OwnerCap) -> bool {
        let changed = self.status == Status::Paused;
        self.status = Status::Active;
        changed
    }

    /// Returns the previous owner.
    pub fn transfer_ownership(
        &mut self,
        _cap: &OwnerCap,
        new_owner: Address,
    ) -> Result<Address, RouterError> {
        if new_owner.is_zero() {
            return Err(RouterError::ZeroAddress);
        }
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }
}

/// Single-flight lock guarding the swap entry points.
///
/// Clones share the same flag, so a venue handed a clone observes the lock
/// held by the executor that called it.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyLock {
    entered: Arc<AtomicBool>,
}

impl ReentrancyLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> Result<LockGuard, RouterError> {
        if self
            .entered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RouterError::ReentrantCall);
        }
        Ok(LockGuard {
            entered: Arc::clone(&self.entered),
        })
    }

    pub fn is_held(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

/// Releases the lock on drop, on success and error paths alike.
#[derive(Debug)]
pub struct LockGuard {
    entered: Arc<AtomicBool>,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.entered.store(false, Ordering::Release);
    }
}
