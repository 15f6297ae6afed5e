// crates/squad_core/src/tactics/mod.rs
// Formation catalog and detection

pub mod detector;
pub mod formation;

pub use detector::{count_positions, detect_formation, detect_positions};
pub use formation::{
    bound_violation, row_columns, BoundKind, Formation, PositionBounds, PositionCounts,
    LINEUP_SIZE, POOL_LAYOUT,
};
