// One-shot boosts: kinds and their rule overrides, the shared single-boost
// slot, and the per-screen state machine.

pub mod kind;
pub mod panel;
pub mod store;

pub use kind::{Boost, BoostEffects, BoostKind, BoostScreen, GoldenSnapshot};
pub use panel::{BoostAction, BoostAvailability, BoostPanel, BoostStatus, BoostTransition};
pub use store::{BoostClaim, PendingBoostStore, SharedBoostSlot};
