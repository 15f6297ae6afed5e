// Roster changes: squad assembly, per-tour edit sessions and transfer
// cost accounting.

pub mod builder;
pub mod ledger;
pub mod session;

pub use builder::SquadBuilder;
pub use ledger::{count_changes, TransferCost, TransferLedger};
pub use session::{EditSession, Vacancy};
