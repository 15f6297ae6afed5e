// Lineup editing: slot assignment, bench ordering, swap validation and
// swap option enumeration.

pub mod bench;
pub mod options;
pub mod slots;
pub mod swap;

pub use bench::{normalize_bench, reorder_bench};
pub use options::{bench_reorder_options, swap_options, SwapOption};
pub use slots::{assign_slots, SlotIndex, SlotKey};
pub use swap::validate_swap;
