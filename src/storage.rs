//! Local persistence for saved matches.
//!
//! Every saved match is one row of the `match_data` table in a single
//! `SQLite` file under the storage root:
//!
//! ```text
//! <root>/
//!   scout.sqlite     # match_data: one flattened row per saved match
//! ```
//!
//! Each operation opens its own connection, so a `Storage` is just a path
//! and can be handed to a blocking task freely.

mod matches;

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;
use uuid::Uuid;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("match not found: {0}")]
    MatchNotFound(Uuid),

    #[error("match already exists: {0}")]
    MatchAlreadyExists(Uuid),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const DB_FILE: &str = "scout.sqlite";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS match_data (
    id                    TEXT PRIMARY KEY,
    team_number           INTEGER NOT NULL,
    match_number          INTEGER NOT NULL,
    alliance_color        TEXT NOT NULL,
    starting_position     TEXT NOT NULL,
    scout_name            TEXT NOT NULL,
    auto_score            INTEGER NOT NULL,
    teleop_score          INTEGER NOT NULL,
    endgame_score         INTEGER NOT NULL,
    total_score           INTEGER NOT NULL,
    crossed_init_line     INTEGER NOT NULL,
    auto_bottom_port      INTEGER NOT NULL,
    auto_outer_port       INTEGER NOT NULL,
    auto_inner_port       INTEGER NOT NULL,
    pickup_ball           INTEGER NOT NULL,
    miss_ball             INTEGER NOT NULL,
    teleop_bottom_port    INTEGER NOT NULL,
    teleop_outer_port     INTEGER NOT NULL,
    teleop_inner_port     INTEGER NOT NULL,
    rotation_control      INTEGER NOT NULL,
    position_control      INTEGER NOT NULL,
    park                  INTEGER NOT NULL,
    hang                  INTEGER NOT NULL,
    level                 INTEGER NOT NULL,
    effective_defense     INTEGER NOT NULL,
    defensive_foul        INTEGER NOT NULL,
    pinned                INTEGER NOT NULL,
    penalty               INTEGER NOT NULL,
    disabled              INTEGER NOT NULL,
    total_defense_time    INTEGER NOT NULL,
    max_shooting_distance REAL NOT NULL,
    avg_shooting_distance REAL NOT NULL,
    notes                 TEXT NOT NULL,
    match_duration        INTEGER NOT NULL,
    field_markers         TEXT NOT NULL,
    created_at            INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS match_data_team ON match_data (team_number);
CREATE INDEX IF NOT EXISTS match_data_created ON match_data (created_at);
";

/// Local `SQLite`-backed storage for saved matches.
#[derive(Debug, Clone)]
pub struct Storage {
    db: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory, database file and table are created if missing.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let storage = Self {
            db: root.join(DB_FILE),
        };
        storage.connect()?.execute_batch(SCHEMA)?;
        Ok(storage)
    }

    /// Returns the default storage root: `~/.scout/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".scout"))
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db)?)
    }
}
