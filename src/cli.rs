//! CLI interface for scout.
//!
//! Commands split into two groups:
//!
//! - `scout match start`: opens the live console and scouts one match.
//! - `scout matches ...` and `scout stats`: the dashboard over saved matches.
//!   Each is non-interactive: arguments in, text or JSON out.
//!
//! Saved matches are addressed by full UUID or unambiguous prefix.

mod format;
mod live;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::Zoned;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::export::{self, Format};
use crate::identity;
use crate::model::{Alliance, MatchFilter, MatchRecord};
use crate::session::{MatchSession, MatchSetup};
use crate::stats::DashboardStats;
use crate::storage::Storage;

use format::{format_match_details, format_match_row, format_stats, short_id};

/// Typed confirmation required by `matches clear`.
const CLEAR_CONFIRMATION: &str = "DELETE ALL";

/// Scout: live match scouting and statistics.
#[derive(Debug, Parser)]
#[command(name = "scout", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: scouting a match
  1. scout match start --team 254 --match 12 --alliance red --position left
     → opens the live console; the clock starts immediately
  2. type shortcuts as the robot plays (3 = inner port, p = pickup, h = hang)
  3. save, then quit

Dashboard:
  scout matches list --team 254
  scout matches show a3b
  scout matches export --format csv
  scout stats --alliance blue"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scout a match live.
    Match {
        #[command(subcommand)]
        command: MatchCommand,
    },

    /// Browse, export and delete saved matches.
    Matches {
        #[command(subcommand)]
        command: MatchesCommand,
    },

    /// Aggregate statistics over saved matches.
    Stats {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print the statistics as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum MatchCommand {
    /// Start a match and open the live console.
    ///
    /// Team, match, alliance and position are required before the clock
    /// starts; the scout name is resolved from `--scout`, `SCOUT_NAME`, the
    /// config file, then "Anonymous".
    Start {
        /// Team number of the robot being scouted.
        #[arg(long)]
        team: Option<u32>,

        /// Match number.
        #[arg(long = "match")]
        match_number: Option<u32>,

        #[arg(long, value_enum)]
        alliance: Option<AllianceArg>,

        /// Starting position on the field (e.g. "left").
        #[arg(long)]
        position: Option<String>,

        /// Scout name for this match.
        #[arg(long)]
        scout: Option<String>,

        /// Balls preloaded before autonomous (defaults to `starting-balls`).
        #[arg(long)]
        preload: Option<u32>,
    },
}

#[derive(Debug, Subcommand)]
pub enum MatchesCommand {
    /// List saved matches, newest first.
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show one saved match in full.
    Show {
        /// Match ID: full UUID or unambiguous prefix.
        id: String,

        /// Print the saved record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete one saved match.
    Delete {
        /// Match ID: full UUID or unambiguous prefix.
        id: String,
    },

    /// Delete every saved match.
    Clear {
        /// Must be exactly "DELETE ALL".
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Export saved matches to a file.
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Output path (defaults to `scouting-data-all-<date>.<ext>`).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Exact-match filters shared by the dashboard commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only matches for this team.
    #[arg(long)]
    team: Option<u32>,

    /// Only this match number.
    #[arg(long = "match")]
    match_number: Option<u32>,

    /// Only this alliance.
    #[arg(long, value_enum)]
    alliance: Option<AllianceArg>,
}

impl FilterArgs {
    fn to_domain(&self) -> MatchFilter {
        MatchFilter {
            team: self.team,
            match_number: self.match_number,
            alliance: self.alliance.as_ref().map(AllianceArg::to_domain),
        }
    }
}

/// CLI-facing alliance, mapped to the domain `Alliance`.
#[derive(Debug, Clone, ValueEnum)]
pub enum AllianceArg {
    Red,
    Blue,
}

impl AllianceArg {
    fn to_domain(&self) -> Alliance {
        match self {
            Self::Red => Alliance::Red,
            Self::Blue => Alliance::Blue,
        }
    }
}

/// CLI-facing export format, mapped to the domain `Format`.
#[derive(Debug, Clone, ValueEnum)]
pub enum FormatArg {
    /// The dashboard column set, one row per match.
    Csv,
    /// Full saved records as a JSON array.
    Json,
}

impl FormatArg {
    fn to_domain(&self) -> Format {
        match self {
            Self::Csv => Format::Csv,
            Self::Json => Format::Json,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Match {
            command:
                MatchCommand::Start {
                    team,
                    match_number,
                    alliance,
                    position,
                    scout,
                    preload,
                },
        } => {
            let setup = MatchSetup {
                team_number: team,
                match_number,
                alliance: alliance.as_ref().map(AllianceArg::to_domain),
                starting_position: position,
                scout_name: Some(identity::resolve_scout(scout.as_deref(), config)),
                preload_balls: preload.unwrap_or(config.game.starting_balls),
            };
            cmd_start(config, storage, setup)
        }
        Command::Matches { command } => match command {
            MatchesCommand::List { filter } => cmd_list(storage, &filter.to_domain()),
            MatchesCommand::Show { id, json } => cmd_show(config, storage, &id, json),
            MatchesCommand::Delete { id } => cmd_delete(storage, &id),
            MatchesCommand::Clear { confirm } => cmd_clear(storage, confirm.as_deref()),
            MatchesCommand::Export {
                filter,
                format,
                out,
            } => cmd_export(storage, &filter.to_domain(), format.to_domain(), out),
        },
        Command::Stats { filter, json } => cmd_stats(config, storage, &filter.to_domain(), json),
    }
}

fn cmd_start(config: &Config, storage: &Storage, setup: MatchSetup) -> Result<(), String> {
    let session = MatchSession::start(setup, config.to_rules())
        .map_err(|e| format!("cannot start match: {e}"))?;
    live::run(session, storage)
}

fn cmd_list(storage: &Storage, filter: &MatchFilter) -> Result<(), String> {
    let records = storage
        .list_matches(filter)
        .map_err(|e| format!("failed to list matches: {e}"))?;

    if records.is_empty() {
        println!("No saved matches");
        return Ok(());
    }

    for record in &records {
        println!("{}", format_match_row(record));
    }
    Ok(())
}

fn cmd_show(config: &Config, storage: &Storage, reference: &str, json: bool) -> Result<(), String> {
    let record = resolve_match(storage, reference)?;

    if json {
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| format!("failed to serialize match: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", format_match_details(&record, config.game.starting_balls));
    }
    Ok(())
}

fn cmd_delete(storage: &Storage, reference: &str) -> Result<(), String> {
    let record = resolve_match(storage, reference)?;
    storage
        .delete_match(record.id)
        .map_err(|e| format!("failed to delete match: {e}"))?;

    info!(id = %record.id, "match deleted");
    eprintln!(
        "Deleted match {} (team {}, match {})",
        short_id(&record),
        record.team_number,
        record.match_number
    );
    Ok(())
}

fn cmd_clear(storage: &Storage, confirm: Option<&str>) -> Result<(), String> {
    if confirm != Some(CLEAR_CONFIRMATION) {
        eprintln!("Cancelled - no data was deleted (pass --confirm \"{CLEAR_CONFIRMATION}\")");
        return Ok(());
    }

    let removed = storage
        .clear_matches()
        .map_err(|e| format!("failed to clear matches: {e}"))?;

    info!(removed, "all matches cleared");
    eprintln!("Deleted {removed} match(es)");
    Ok(())
}

fn cmd_export(
    storage: &Storage,
    filter: &MatchFilter,
    format: Format,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let records = storage
        .list_matches(filter)
        .map_err(|e| format!("failed to list matches: {e}"))?;

    if records.is_empty() {
        return Err("No data to export".to_string());
    }

    let path = out.unwrap_or_else(|| {
        PathBuf::from(export::all_matches_file_name(Zoned::now().date(), format))
    });

    export::to_file(&path, |w| match format {
        Format::Csv => export::write_records_csv(&records, w),
        Format::Json => export::write_records_json(&records, w),
    })
    .map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    info!(count = records.len(), path = %path.display(), %format, "matches exported");
    eprintln!("Exported {} match(es) → {}", records.len(), path.display());
    Ok(())
}

fn cmd_stats(
    config: &Config,
    storage: &Storage,
    filter: &MatchFilter,
    json: bool,
) -> Result<(), String> {
    let records = storage
        .list_matches(filter)
        .map_err(|e| format!("failed to list matches: {e}"))?;

    let stats = DashboardStats::compute(&records, config.game.starting_balls);

    if json {
        let json = serde_json::to_string_pretty(&stats)
            .map_err(|e| format!("failed to serialize statistics: {e}"))?;
        println!("{json}");
    } else if records.is_empty() {
        println!("No saved matches");
    } else {
        println!("{}", format_stats(&stats));
    }
    Ok(())
}

/// Resolve a match reference (full UUID or unambiguous prefix) to a record.
fn resolve_match(storage: &Storage, reference: &str) -> Result<MatchRecord, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return storage
            .load_match(id)
            .map_err(|e| format!("match not found: {e}"));
    }

    // Try as a prefix match against all matches.
    let records = storage
        .list_matches(&MatchFilter::default())
        .map_err(|e| format!("failed to list matches: {e}"))?;

    let matches: Vec<&MatchRecord> = records
        .iter()
        .filter(|r| r.id.to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no match matching '{reference}'")),
        [record] => Ok((*record).clone()),
        many => {
            let ids: Vec<String> = many.iter().map(|r| short_id(r)).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} saved matches: {}",
                many.len(),
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use tempfile::TempDir;

    use crate::session::MatchRules;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path()).unwrap();
        (dir, storage)
    }

    fn saved(storage: &Storage, id: &str, team: u32) -> MatchRecord {
        let setup = MatchSetup {
            team_number: Some(team),
            match_number: Some(1),
            alliance: Some(Alliance::Blue),
            starting_position: Some("center".into()),
            scout_name: None,
            preload_balls: 3,
        };
        let mut record = MatchSession::start(setup, MatchRules::default())
            .unwrap()
            .to_record();
        record.id = id.parse().unwrap();
        record.created_at = Timestamp::now();
        storage.save_match(&record).unwrap();
        record
    }

    #[test]
    fn parses_match_start() {
        let cli = Cli::try_parse_from([
            "scout", "match", "start", "--team", "254", "--match", "12", "--alliance", "red",
            "--position", "left",
        ])
        .unwrap();
        let Command::Match {
            command: MatchCommand::Start {
                team,
                match_number,
                alliance,
                scout,
                ..
            },
        } = cli.command
        else {
            panic!("expected match start");
        };
        assert_eq!(team, Some(254));
        assert_eq!(match_number, Some(12));
        assert_eq!(alliance.unwrap().to_domain(), Alliance::Red);
        assert!(scout.is_none());
    }

    #[test]
    fn filters_map_to_domain() {
        let cli = Cli::try_parse_from(["scout", "stats", "--team", "971", "--alliance", "blue"])
            .unwrap();
        let Command::Stats { filter, json } = cli.command else {
            panic!("expected stats");
        };
        assert!(!json);
        assert_eq!(
            filter.to_domain(),
            MatchFilter {
                team: Some(971),
                match_number: None,
                alliance: Some(Alliance::Blue),
            }
        );
    }

    #[test]
    fn rejects_unknown_alliance_and_format() {
        assert!(Cli::try_parse_from(["scout", "stats", "--alliance", "green"]).is_err());
        assert!(Cli::try_parse_from(["scout", "matches", "export", "--format", "xml"]).is_err());
    }

    #[test]
    fn resolves_full_id_and_unique_prefix() {
        let (_dir, storage) = test_storage();
        let a = saved(&storage, "a3b0fc12-0000-4000-8000-000000000001", 254);
        saved(&storage, "c9d00000-0000-4000-8000-000000000002", 1678);

        assert_eq!(resolve_match(&storage, &a.id.to_string()).unwrap().id, a.id);
        assert_eq!(resolve_match(&storage, "a3b").unwrap().team_number, 254);
    }

    #[test]
    fn ambiguous_and_missing_prefixes_fail() {
        let (_dir, storage) = test_storage();
        saved(&storage, "a3b0fc12-0000-4000-8000-000000000001", 254);
        saved(&storage, "a3b99999-0000-4000-8000-000000000002", 1678);

        let err = resolve_match(&storage, "a3b").unwrap_err();
        assert!(err.contains("ambiguous"));
        assert!(err.contains("a3b0fc12"));

        let err = resolve_match(&storage, "fff").unwrap_err();
        assert!(err.contains("no match matching"));

        let err = resolve_match(&storage, "00000000-0000-4000-8000-000000000000").unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn clear_requires_exact_confirmation() {
        let (_dir, storage) = test_storage();
        saved(&storage, "a3b0fc12-0000-4000-8000-000000000001", 254);

        cmd_clear(&storage, Some("delete all")).unwrap();
        assert_eq!(storage.list_matches(&MatchFilter::default()).unwrap().len(), 1);

        cmd_clear(&storage, Some(CLEAR_CONFIRMATION)).unwrap();
        assert!(storage.list_matches(&MatchFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn export_with_no_matches_is_an_error() {
        let (dir, storage) = test_storage();
        let out = dir.path().join("all.csv");
        let err = cmd_export(&storage, &MatchFilter::default(), Format::Csv, Some(out.clone()))
            .unwrap_err();
        assert_eq!(err, "No data to export");
        assert!(!out.exists());
    }

    #[test]
    fn export_writes_filtered_matches() {
        let (dir, storage) = test_storage();
        saved(&storage, "a3b0fc12-0000-4000-8000-000000000001", 254);
        saved(&storage, "c9d00000-0000-4000-8000-000000000002", 1678);

        let out = dir.path().join("team.json");
        let filter = MatchFilter {
            team: Some(1678),
            ..MatchFilter::default()
        };
        cmd_export(&storage, &filter, Format::Json, Some(out.clone())).unwrap();

        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["team_number"], 1678);
    }
}
