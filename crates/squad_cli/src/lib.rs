//! Squad CLI Library
//!
//! File loading shared by the `squad` binary: squads may be given either as
//! a full backend snapshot or as a bare squad state.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use squad_core::{RulesConfig, SquadSnapshot, SquadState};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SquadFile {
    Snapshot(SquadSnapshot),
    State(SquadState),
}

/// Read a squad JSON file (snapshot or squad state) and normalize it.
pub fn load_squad(path: &Path) -> Result<SquadState> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read squad file: {}", path.display()))?;
    let file: SquadFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse squad file: {}", path.display()))?;
    Ok(match file {
        SquadFile::Snapshot(snapshot) => snapshot.squad(),
        SquadFile::State(state) => state.normalized(),
    })
}

/// Rules from `path`, or the built-in defaults.
pub fn load_rules(path: Option<&Path>) -> Result<RulesConfig> {
    match path {
        Some(path) => RulesConfig::load(path)
            .with_context(|| format!("Failed to load rules: {}", path.display())),
        None => Ok(RulesConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_core::{Formation, Player, Position, Price};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn squad() -> SquadState {
        let mut main = vec![Player::new(1, Position::Goalkeeper, Price::from_tenths(45), "AAA")];
        for id in 2..=5 {
            main.push(Player::new(id, Position::Defender, Price::from_tenths(50), "BBB"));
        }
        for id in 6..=9 {
            main.push(Player::new(id, Position::Midfielder, Price::from_tenths(50), "CCC"));
        }
        main.push(Player::new(10, Position::Forward, Price::from_tenths(80), "DDD"));
        main.push(Player::new(11, Position::Forward, Price::from_tenths(80), "EEE"));
        let bench = vec![
            Player::new(12, Position::Defender, Price::from_tenths(40), "FFF"),
            Player::new(13, Position::Goalkeeper, Price::from_tenths(40), "GGG"),
            Player::new(14, Position::Midfielder, Price::from_tenths(40), "HHH"),
            Player::new(15, Position::Forward, Price::from_tenths(40), "III"),
        ];
        SquadState { main, bench, captain_id: None, vice_captain_id: None }
    }

    fn write_json(value: &impl serde::Serialize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(value).unwrap()).unwrap();
        file
    }

    #[test]
    fn test_load_bare_state_normalizes_bench() {
        let file = write_json(&squad());
        let loaded = load_squad(file.path()).unwrap();
        assert!(loaded.bench[0].is_goalkeeper());
        assert_eq!(loaded.formation(), Some(Formation::F442));
    }

    #[test]
    fn test_load_snapshot() {
        let state = squad();
        let snapshot = serde_json::json!({
            "main": state.main,
            "bench": state.bench,
            "free_transfers": 2,
            "upcoming_tour": 4,
        });
        let file = write_json(&snapshot);
        let loaded = load_squad(file.path()).unwrap();
        assert_eq!(loaded.main.len(), 11);
    }

    #[test]
    fn test_missing_files_are_reported() {
        let err = load_squad(Path::new("/nonexistent/squad.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read squad file"));
        assert!(load_rules(Some(Path::new("/nonexistent/rules.yaml"))).is_err());
        assert_eq!(load_rules(None).unwrap(), RulesConfig::default());
    }
}
