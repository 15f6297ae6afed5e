//! Squad CLI
//!
//! Runs the squad engine against JSON squad files:
//! formation detection, swap options, transfer cost and full validation.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use squad_core::transfer::count_changes;
#[cfg(feature = "cli")]
use squad_core::{BoostKind, PlayerId, TransferLedger};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "squad")]
#[command(about = "Inspect and validate fantasy squads", long_about = None)]
struct Cli {
    /// Rules file (YAML); built-in rules when omitted
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Detect the formation of the main lineup
    Formation {
        /// Squad JSON file (snapshot or squad state)
        squad: PathBuf,
    },

    /// List legal swap partners for one player
    Options {
        squad: PathBuf,

        /// Selected player id
        #[arg(long)]
        player: u32,
    },

    /// Compute the points cost of transfers
    Cost {
        /// Number of changes; alternatively pass --before and --after
        #[arg(long, conflicts_with_all = ["before", "after"])]
        changes: Option<u32>,

        #[arg(long, requires = "after")]
        before: Option<PathBuf>,

        #[arg(long, requires = "before")]
        after: Option<PathBuf>,

        /// Free transfers left this tour
        #[arg(long, default_value = "2")]
        free: u32,

        /// Active boost (e.g. "wildcard")
        #[arg(long)]
        boost: Option<String>,
    },

    /// Validate every squad rule
    Check { squad: PathBuf },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rules = squad_cli::load_rules(cli.rules.as_deref())?;
    tracing::debug!(rules_file = ?cli.rules, club_cap = rules.club_cap, "rules loaded");

    match cli.command {
        Commands::Formation { squad } => {
            let squad = squad_cli::load_squad(&squad)?;
            let counts = squad_core::tactics::count_positions(&squad.main);
            match squad.formation() {
                Some(formation) => println!("✅ {formation} ({counts})"),
                None => println!("❌ no valid scheme ({counts})"),
            }
        }

        Commands::Options { squad, player } => {
            let squad = squad_cli::load_squad(&squad)?;
            let selected = PlayerId(player);
            let options = squad_core::swap_options(&squad.main, &squad.bench, selected)?;
            if options.is_empty() {
                println!("No legal swaps for {selected}");
            }
            for option in options {
                println!("{}  {:<4} -> {}", option.id, option.position.code(), option.resulting_formation);
            }
        }

        Commands::Cost { changes, before, after, free, boost } => {
            let change_count = match (changes, before, after) {
                (Some(count), _, _) => count,
                (None, Some(before), Some(after)) => {
                    let before = squad_cli::load_squad(&before)?;
                    let after = squad_cli::load_squad(&after)?;
                    count_changes(&before, &after)
                }
                _ => anyhow::bail!("pass --changes or both --before and --after"),
            };
            let boost_active = match boost {
                Some(code) => BoostKind::from_code(&code)
                    .with_context(|| format!("unknown boost: {code}"))?
                    .effects()
                    .unlimited_transfers,
                None => false,
            };
            let cost = TransferLedger::new(&rules).cost(change_count, free, boost_active);
            println!("   Changes:   {}", cost.change_count);
            println!("   Free used: {}", cost.free_used);
            println!("   Paid:      {}", cost.paid);
            println!("   Penalty:   -{} pts", cost.points_penalty);
        }

        Commands::Check { squad } => {
            let squad = squad_cli::load_squad(&squad)?;
            match squad.validate(&rules) {
                Ok(formation) => {
                    println!("✅ Squad is valid ({formation})");
                    println!("   Spent:     {}", squad.spent());
                    println!("   Remaining: {}", rules.budget_pool.saturating_sub(squad.spent()));
                }
                Err(err) => anyhow::bail!("❌ {err}"),
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("squad CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
