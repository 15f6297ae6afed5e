//! The one boost slot shared by both boost screens.
//!
//! Both screens get the same store instance. Claiming the slot is a single
//! check-and-set, so a second boost can never slip in between the check and
//! the write.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

use super::kind::BoostKind;
use crate::error::{Result, SquadError};
use crate::models::TourId;

/// A boost holding the squad's single boost slot for a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostClaim {
    pub kind: BoostKind,
    pub tour: TourId,
}

pub trait PendingBoostStore: Debug + Send + Sync {
    /// Atomically claim the slot. Re-claiming an identical claim succeeds;
    /// any other held claim is a [`SquadError::BoostConflict`].
    fn try_acquire(&self, claim: BoostClaim) -> Result<()>;

    /// Release the slot if `kind` holds it. Returns whether it did.
    fn release(&self, kind: BoostKind) -> bool;

    fn current(&self) -> Option<BoostClaim>;
}

#[derive(Debug, Default)]
pub struct SharedBoostSlot {
    slot: Mutex<Option<BoostClaim>>,
}

impl SharedBoostSlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_claim(claim: BoostClaim) -> Arc<Self> {
        Arc::new(Self { slot: Mutex::new(Some(claim)) })
    }

    fn lock(&self) -> MutexGuard<'_, Option<BoostClaim>> {
        // The slot holds plain data; a panic elsewhere cannot leave it torn.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PendingBoostStore for SharedBoostSlot {
    fn try_acquire(&self, claim: BoostClaim) -> Result<()> {
        let mut slot = self.lock();
        match *slot {
            Some(held) if held == claim => Ok(()),
            Some(held) => {
                warn!(requested = %claim.kind, held = %held.kind, tour = %held.tour, "boost slot taken");
                Err(SquadError::BoostConflict { active: held.kind, tour: held.tour })
            }
            None => {
                *slot = Some(claim);
                Ok(())
            }
        }
    }

    fn release(&self, kind: BoostKind) -> bool {
        let mut slot = self.lock();
        if slot.map(|held| held.kind) == Some(kind) {
            *slot = None;
            true
        } else {
            false
        }
    }

    fn current(&self) -> Option<BoostClaim> {
        *self.lock()
    }
}
