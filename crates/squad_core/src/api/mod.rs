pub mod boundary;
pub mod json_api;

pub use boundary::{SquadPersistence, SquadSnapshot, SquadSubmission};
pub use json_api::{
    detect_formation_json, swap_options_json, transfer_cost_json, validate_squad_json, ApiError,
    ApiResponse, SCHEMA_VERSION,
};
