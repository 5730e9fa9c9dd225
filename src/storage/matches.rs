//! Match storage: save, load, query, delete.

use jiff::Timestamp;
use rusqlite::{ErrorCode, Row, params};
use uuid::Uuid;

use crate::model::{Alliance, MatchFilter, MatchRecord};

use super::{Result, Storage, StorageError};

/// Column order of `match_data`, shared by insert and select.
const COLUMNS: [&str; 36] = [
    "id",
    "team_number",
    "match_number",
    "alliance_color",
    "starting_position",
    "scout_name",
    "auto_score",
    "teleop_score",
    "endgame_score",
    "total_score",
    "crossed_init_line",
    "auto_bottom_port",
    "auto_outer_port",
    "auto_inner_port",
    "pickup_ball",
    "miss_ball",
    "teleop_bottom_port",
    "teleop_outer_port",
    "teleop_inner_port",
    "rotation_control",
    "position_control",
    "park",
    "hang",
    "level",
    "effective_defense",
    "defensive_foul",
    "pinned",
    "penalty",
    "disabled",
    "total_defense_time",
    "max_shooting_distance",
    "avg_shooting_distance",
    "notes",
    "match_duration",
    "field_markers",
    "created_at",
];

impl Storage {
    /// Saves a finished match as a new row.
    pub fn save_match(&self, record: &MatchRecord) -> Result<()> {
        let conn = self.connect()?;
        let markers = serde_json::to_string(&record.field_markers)?;
        let sql = format!(
            "INSERT INTO match_data ({}) VALUES ({})",
            COLUMNS.join(", "),
            vec!["?"; COLUMNS.len()].join(", ")
        );
        let inserted = conn.execute(
            &sql,
            params![
                record.id.to_string(),
                record.team_number,
                record.match_number,
                record.alliance_color.as_str(),
                &record.starting_position,
                &record.scout_name,
                record.auto_score,
                record.teleop_score,
                record.endgame_score,
                record.total_score,
                record.crossed_init_line,
                record.auto_bottom_port,
                record.auto_outer_port,
                record.auto_inner_port,
                record.pickup_ball,
                record.miss_ball,
                record.teleop_bottom_port,
                record.teleop_outer_port,
                record.teleop_inner_port,
                record.rotation_control,
                record.position_control,
                record.park,
                record.hang,
                record.level,
                record.effective_defense,
                record.defensive_foul,
                record.pinned,
                record.penalty,
                record.disabled,
                record.total_defense_time,
                record.max_shooting_distance,
                record.avg_shooting_distance,
                &record.notes,
                record.match_duration,
                markers,
                record.created_at.as_millisecond(),
            ],
        );
        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StorageError::MatchAlreadyExists(record.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Loads a single saved match.
    pub fn load_match(&self, id: Uuid) -> Result<MatchRecord> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT * FROM match_data WHERE id = ?1")?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => record_from_row(row),
            None => Err(StorageError::MatchNotFound(id)),
        }
    }

    /// Lists saved matches passing `filter`, newest first.
    pub fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM match_data
             WHERE (?1 IS NULL OR team_number = ?1)
               AND (?2 IS NULL OR match_number = ?2)
               AND (?3 IS NULL OR alliance_color = ?3)
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let mut rows = stmt.query(params![
            filter.team,
            filter.match_number,
            filter.alliance.map(Alliance::as_str),
        ])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(record_from_row(row)?);
        }
        Ok(records)
    }

    /// Deletes one saved match.
    pub fn delete_match(&self, id: Uuid) -> Result<()> {
        let conn = self.connect()?;
        let rows = conn.execute("DELETE FROM match_data WHERE id = ?1", [id.to_string()])?;
        if rows == 0 {
            return Err(StorageError::MatchNotFound(id));
        }
        Ok(())
    }

    /// Deletes every saved match. Returns how many were removed.
    pub fn clear_matches(&self) -> Result<usize> {
        let conn = self.connect()?;
        Ok(conn.execute("DELETE FROM match_data", [])?)
    }
}

/// Rebuilds a `MatchRecord` from a `match_data` row.
fn record_from_row(row: &Row<'_>) -> Result<MatchRecord> {
    let id = row
        .get::<_, String>("id")?
        .parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid match id: {e}")))?;
    let alliance_color = row
        .get::<_, String>("alliance_color")?
        .parse::<Alliance>()
        .map_err(StorageError::Corrupt)?;
    let field_markers = serde_json::from_str(&row.get::<_, String>("field_markers")?)
        .map_err(|e| StorageError::Corrupt(format!("invalid field markers: {e}")))?;
    let created_at = Timestamp::from_millisecond(row.get("created_at")?)
        .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))?;

    Ok(MatchRecord {
        id,
        team_number: row.get("team_number")?,
        match_number: row.get("match_number")?,
        alliance_color,
        starting_position: row.get("starting_position")?,
        scout_name: row.get("scout_name")?,
        auto_score: row.get("auto_score")?,
        teleop_score: row.get("teleop_score")?,
        endgame_score: row.get("endgame_score")?,
        total_score: row.get("total_score")?,
        crossed_init_line: row.get("crossed_init_line")?,
        auto_bottom_port: row.get("auto_bottom_port")?,
        auto_outer_port: row.get("auto_outer_port")?,
        auto_inner_port: row.get("auto_inner_port")?,
        pickup_ball: row.get("pickup_ball")?,
        miss_ball: row.get("miss_ball")?,
        teleop_bottom_port: row.get("teleop_bottom_port")?,
        teleop_outer_port: row.get("teleop_outer_port")?,
        teleop_inner_port: row.get("teleop_inner_port")?,
        rotation_control: row.get("rotation_control")?,
        position_control: row.get("position_control")?,
        park: row.get("park")?,
        hang: row.get("hang")?,
        level: row.get("level")?,
        effective_defense: row.get("effective_defense")?,
        defensive_foul: row.get("defensive_foul")?,
        pinned: row.get("pinned")?,
        penalty: row.get("penalty")?,
        disabled: row.get("disabled")?,
        total_defense_time: row.get("total_defense_time")?,
        max_shooting_distance: row.get("max_shooting_distance")?,
        avg_shooting_distance: row.get("avg_shooting_distance")?,
        notes: row.get("notes")?,
        match_duration: row.get("match_duration")?,
        field_markers,
        created_at,
    })
}
