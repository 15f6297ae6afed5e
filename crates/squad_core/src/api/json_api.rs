//! JSON entry points for UI hosts.
//!
//! Each function takes a request string and returns a response string. A
//! request that cannot be parsed is an `Err`; a squad rule rejection is a
//! normal response with `success: false` and a structured error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boost::BoostKind;
use crate::config::RulesConfig;
use crate::error::{Result, SquadError};
use crate::lineup::{bench_reorder_options, swap_options, SwapOption};
use crate::models::{Player, PlayerId, Price, Role, SquadState};
use crate::tactics::{count_positions, Formation, PositionCounts};
use crate::transfer::{count_changes, TransferCost, TransferLedger};

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl From<&SquadError> for ApiError {
    fn from(err: &SquadError) -> Self {
        Self { code: err.code().to_string(), message: err.to_string() }
    }
}

fn respond<T: Serialize>(outcome: Result<T>) -> Result<String> {
    let response = match outcome {
        Ok(data) => ApiResponse { success: true, data: Some(data), error: None, schema_version: SCHEMA_VERSION },
        Err(err) => {
            debug!(code = err.code(), error = %err, "request rejected");
            ApiResponse { success: false, data: None, error: Some(ApiError::from(&err)), schema_version: SCHEMA_VERSION }
        }
    };
    Ok(serde_json::to_string(&response)?)
}

fn parse<'a, T: Deserialize<'a>>(request_json: &'a str, version: impl Fn(&T) -> u8) -> Result<T> {
    let request: T = serde_json::from_str(request_json)
        .map_err(|e| SquadError::Serialization(format!("Invalid JSON request: {e}")))?;
    match version(&request) {
        SCHEMA_VERSION => Ok(request),
        other => Err(SquadError::Serialization(format!("Unsupported schema version: {other}"))),
    }
}

// ============================================================================
// Formation detection
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FormationRequest {
    pub schema_version: u8,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationResponse {
    pub formation: Option<Formation>,
    pub counts: PositionCounts,
    /// Players per row, goalkeeper row first.
    pub rows: [u8; 4],
}

pub fn detect_formation_json(request_json: &str) -> Result<String> {
    let request: FormationRequest = parse(request_json, |r: &FormationRequest| r.schema_version)?;
    let counts = count_positions(&request.players);
    respond(Ok(FormationResponse {
        formation: Formation::from_counts(&counts),
        counts,
        rows: counts.rows(),
    }))
}

// ============================================================================
// Swap options
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SwapOptionsRequest {
    pub schema_version: u8,
    pub squad: SquadState,
    pub selected: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapOptionsResponse {
    pub selected: PlayerId,
    pub options: Vec<SwapOption>,
    /// Bench players the selection may trade substitution priority with.
    pub bench_reorder: Vec<PlayerId>,
}

pub fn swap_options_json(request_json: &str) -> Result<String> {
    let request: SwapOptionsRequest = parse(request_json, |r: &SwapOptionsRequest| r.schema_version)?;
    let squad = request.squad.normalized();
    let selected = request.selected;
    respond(swap_options(&squad.main, &squad.bench, selected).and_then(|options| {
        let bench_reorder = match squad.role_of(selected) {
            Some(Role::Bench) => bench_reorder_options(&squad.bench, selected)?,
            _ => Vec::new(),
        };
        Ok(SwapOptionsResponse { selected, options, bench_reorder })
    }))
}

// ============================================================================
// Transfer cost
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TransferCostRequest {
    pub schema_version: u8,
    /// Explicit number of changes. Takes precedence over `before`/`after`.
    #[serde(default)]
    pub change_count: Option<u32>,
    #[serde(default)]
    pub before: Option<SquadState>,
    #[serde(default)]
    pub after: Option<SquadState>,
    pub free_transfers: u32,
    #[serde(default)]
    pub boost: Option<BoostKind>,
}

pub fn transfer_cost_json(request_json: &str, rules: &RulesConfig) -> Result<String> {
    let request: TransferCostRequest = parse(request_json, |r: &TransferCostRequest| r.schema_version)?;
    let change_count = match (request.change_count, &request.before, &request.after) {
        (Some(count), _, _) => count,
        (None, Some(before), Some(after)) => count_changes(before, after),
        _ => {
            return Err(SquadError::Serialization(
                "transfer cost request needs change_count or both before and after".to_string(),
            ))
        }
    };
    let boost_active = request.boost.is_some_and(|kind| kind.effects().unlimited_transfers);
    let cost: TransferCost = TransferLedger::new(rules).cost(change_count, request.free_transfers, boost_active);
    respond(Ok(cost))
}

// ============================================================================
// Squad validation
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ValidateSquadRequest {
    pub schema_version: u8,
    pub squad: SquadState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadReport {
    pub formation: Formation,
    pub spent: Price,
    pub remaining_budget: Price,
}

pub fn validate_squad_json(request_json: &str, rules: &RulesConfig) -> Result<String> {
    let request: ValidateSquadRequest = parse(request_json, |r: &ValidateSquadRequest| r.schema_version)?;
    let squad = request.squad.normalized();
    respond(squad.validate(rules).map(|formation| SquadReport {
        formation,
        spent: squad.spent(),
        remaining_budget: rules.budget_pool.saturating_sub(squad.spent()),
    }))
}
