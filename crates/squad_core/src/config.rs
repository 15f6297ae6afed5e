//! Squad rules configuration.
//!
//! Defaults are embedded from `data/rules.yaml` at compile time and parsed
//! once. A rules file only needs the fields it overrides.
//!
//! ```rust
//! use squad_core::config::RulesConfig;
//!
//! let rules = RulesConfig::default();
//! assert_eq!(rules.free_transfers_per_tour, 2);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{Result, SquadError};
use crate::models::Price;

pub const DEFAULT_RULES_YAML: &str = include_str!("../data/rules.yaml");

static DEFAULT_RULES: OnceLock<RulesConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default = "RulesConfig::builtin")]
pub struct RulesConfig {
    /// Total money available for all 15 players.
    pub budget_pool: Price,
    /// Maximum players from one club.
    pub club_cap: u8,
    /// Free transfers granted each tour (no carry-over).
    pub free_transfers_per_tour: u32,
    /// Points deducted per transfer beyond the free quota.
    pub paid_transfer_penalty: u32,
    pub main_size: usize,
    pub bench_size: usize,
}

impl RulesConfig {
    fn builtin() -> Self {
        Self {
            budget_pool: Price::from_tenths(1000),
            club_cap: 3,
            free_transfers_per_tour: 2,
            paid_transfer_penalty: 4,
            main_size: 11,
            bench_size: 4,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let rules: RulesConfig = serde_yaml::from_str(yaml)?;
        rules.check()?;
        Ok(rules)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|err| SquadError::Config(format!("{}: {}", path.display(), err)))?;
        let rules = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), ?rules, "loaded rules file");
        Ok(rules)
    }

    pub fn squad_size(&self) -> usize {
        self.main_size + self.bench_size
    }

    fn check(&self) -> Result<()> {
        if self.main_size != crate::tactics::LINEUP_SIZE {
            return Err(SquadError::Config(format!(
                "main_size must be {}, got {}",
                crate::tactics::LINEUP_SIZE,
                self.main_size
            )));
        }
        if self.squad_size() != crate::tactics::POOL_LAYOUT.total() {
            return Err(SquadError::Config(format!(
                "main_size + bench_size must be {}, got {}",
                crate::tactics::POOL_LAYOUT.total(),
                self.squad_size()
            )));
        }
        if self.club_cap == 0 {
            return Err(SquadError::Config("club_cap must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        DEFAULT_RULES
            .get_or_init(|| {
                serde_yaml::from_str(DEFAULT_RULES_YAML).unwrap_or_else(|err| {
                    tracing::error!(%err, "embedded rules.yaml is invalid, using built-in rules");
                    Self::builtin()
                })
            })
            .clone()
    }
}
