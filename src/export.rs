//! Export of scouted matches to JSON and CSV.
//!
//! Two shapes: a single live session (nested JSON, or a one-row CSV keyed
//! by action labels) and a batch of saved records (flat dashboard CSV, or
//! the records themselves as JSON).

use std::{fmt, fs, io, path::Path, str::FromStr};

use jiff::{Timestamp, civil::Date};
use serde::Serialize;

use crate::model::{ActionRecord, FieldMarker, MatchInfo, MatchRecord, Scores};
use crate::session::{Counts, MatchSession};

/// Errors that can occur while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, ExportError>;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// `match-<match>-team-<team>.<ext>`
pub fn match_file_name(info: &MatchInfo, format: Format) -> String {
    format!(
        "match-{}-team-{}.{}",
        info.match_number,
        info.team_number,
        format.extension()
    )
}

/// `scouting-data-all-<yyyy-mm-dd>.<ext>`
pub fn all_matches_file_name(date: Date, format: Format) -> String {
    format!("scouting-data-all-{date}.{}", format.extension())
}

// ── Single session ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionExport<'a> {
    match_info: SessionInfo<'a>,
    scores: Scores,
    actions: &'a [ActionRecord],
    counts: &'a Counts,
    field_markers: &'a [FieldMarker],
    notes: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo<'a> {
    #[serde(flatten)]
    info: &'a MatchInfo,
    start_time: Timestamp,
    match_duration: u32,
    total_defense_time: u32,
    max_shooting_distance: f64,
    avg_shooting_distance: f64,
}

/// Write a session as nested, pretty-printed JSON.
pub fn write_session_json(session: &MatchSession, out: impl io::Write) -> Result<()> {
    let field = session.field();
    let export = SessionExport {
        match_info: SessionInfo {
            info: session.info(),
            start_time: session.started_at(),
            match_duration: session.elapsed(),
            total_defense_time: session.defense_total(),
            max_shooting_distance: field.max_shooting_distance(),
            avg_shooting_distance: field.avg_shooting_distance(),
        },
        scores: session.scores(),
        actions: session.ledger().records(),
        counts: session.ledger().counts(),
        field_markers: field.markers(),
        notes: session.notes(),
    };
    serde_json::to_writer_pretty(out, &export)?;
    Ok(())
}

/// Write a session as a header row plus one data row.
///
/// Count columns follow the fixed action order, labelled for humans.
pub fn write_session_csv(session: &MatchSession, out: impl io::Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    let counts = session.ledger().counts();

    let mut header = vec![
        "Match Number",
        "Team Number",
        "Alliance Color",
        "Starting Position",
        "Scout Name",
        "Auto Score",
        "Teleop Score",
        "Endgame Score",
        "Total Score",
        "Total Defense Time (s)",
    ];
    header.extend(counts.iter().map(|(kind, _)| kind.label()));
    header.push("Notes");
    writer.write_record(&header)?;

    let info = session.info();
    let scores = session.scores();
    let mut row = vec![
        info.match_number.to_string(),
        info.team_number.to_string(),
        info.alliance.to_string(),
        info.starting_position.clone(),
        info.scout_name.clone(),
        scores.auto.to_string(),
        scores.teleop.to_string(),
        scores.endgame.to_string(),
        scores.total.to_string(),
        session.defense_total().to_string(),
    ];
    row.extend(counts.iter().map(|(_, count)| count.to_string()));
    row.push(session.notes().to_string());
    writer.write_record(&row)?;

    writer.flush()?;
    Ok(())
}

// ── Saved records ──

const ALL_MATCHES_HEADER: [&str; 27] = [
    "Match",
    "Team",
    "Alliance",
    "Position",
    "Scout",
    "Auto",
    "Teleop",
    "Endgame",
    "Total",
    "Init Line",
    "Auto Bottom",
    "Auto Outer",
    "Auto Inner",
    "Pickup",
    "Teleop Bottom",
    "Teleop Outer",
    "Teleop Inner",
    "Rotation",
    "Position Ctrl",
    "Park",
    "Hang",
    "Level",
    "Defense",
    "Penalty",
    "Disabled",
    "Notes",
    "Date",
];

/// Write saved records as the flat dashboard CSV, one row per match.
pub fn write_records_csv(records: &[MatchRecord], out: impl io::Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(ALL_MATCHES_HEADER)?;
    for r in records {
        writer.write_record([
            r.match_number.to_string(),
            r.team_number.to_string(),
            r.alliance_color.to_string(),
            r.starting_position.clone(),
            r.scout_name.clone(),
            r.auto_score.to_string(),
            r.teleop_score.to_string(),
            r.endgame_score.to_string(),
            r.total_score.to_string(),
            r.crossed_init_line.to_string(),
            r.auto_bottom_port.to_string(),
            r.auto_outer_port.to_string(),
            r.auto_inner_port.to_string(),
            r.pickup_ball.to_string(),
            r.teleop_bottom_port.to_string(),
            r.teleop_outer_port.to_string(),
            r.teleop_inner_port.to_string(),
            r.rotation_control.to_string(),
            r.position_control.to_string(),
            r.park.to_string(),
            r.hang.to_string(),
            r.level.to_string(),
            r.effective_defense.to_string(),
            r.penalty.to_string(),
            r.disabled.to_string(),
            r.notes.clone(),
            r.created_at.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write saved records as a pretty-printed JSON array.
pub fn write_records_json(records: &[MatchRecord], out: impl io::Write) -> Result<()> {
    serde_json::to_writer_pretty(out, records)?;
    Ok(())
}

/// Create `path` and hand a buffered writer for it to `write`.
pub fn to_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut io::BufWriter<fs::File>) -> Result<()>,
{
    let mut out = io::BufWriter::new(fs::File::create(path)?);
    write(&mut out)?;
    io::Write::flush(&mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;
    use uuid::Uuid;

    use crate::model::{ActionKind, Alliance, MarkerKind};
    use crate::session::{MatchRules, MatchSetup};

    fn played_session() -> MatchSession {
        let setup = MatchSetup {
            team_number: Some(1678),
            match_number: Some(7),
            alliance: Some(Alliance::Blue),
            starting_position: Some("center".into()),
            scout_name: Some("riley".into()),
            preload_balls: 3,
        };
        let mut session = MatchSession::start(setup, MatchRules::default()).unwrap();
        session.record(ActionKind::InitLine).unwrap();
        session.record(ActionKind::AutoOuterPort).unwrap();
        session.add_marker(MarkerKind::Shoot, 0.5, 0.5).unwrap();
        session.set_notes("quick, \"smooth\" cycles");
        session
    }

    fn saved_record(team: u32, notes: &str) -> MatchRecord {
        let mut record = played_session().to_record();
        record.id = Uuid::new_v4();
        record.team_number = team;
        record.notes = notes.into();
        record
    }

    fn to_string(write: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn file_names() {
        let session = played_session();
        assert_eq!(
            match_file_name(session.info(), Format::Json),
            "match-7-team-1678.json"
        );
        let date = Date::new(2026, 3, 14).unwrap();
        assert_eq!(
            all_matches_file_name(date, Format::Csv),
            "scouting-data-all-2026-03-14.csv"
        );
    }

    #[test]
    fn parses_format() {
        assert_eq!("CSV".parse::<Format>().unwrap(), Format::Csv);
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn session_json_is_nested() {
        let session = played_session();
        let json = to_string(|buf| write_session_json(&session, buf));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let info = &value["matchInfo"];
        assert_eq!(info["teamNumber"], 1678);
        assert_eq!(info["allianceColor"], "blue");
        assert_eq!(info["scoutName"], "riley");
        assert_eq!(info["matchDuration"], 0);
        assert!(info["startTime"].is_string());
        assert!(info["maxShootingDistance"].as_f64().unwrap() > 0.0);

        assert_eq!(value["scores"]["auto"], 9);
        assert_eq!(value["actions"][0]["action"], "initLine");
        assert_eq!(value["actions"][0]["period"], "AUTONOMOUS");
        assert_eq!(value["counts"]["autoOuterPort"], 1);
        assert_eq!(value["fieldMarkers"][0]["type"], "shoot");
        assert_eq!(value["notes"], "quick, \"smooth\" cycles");
    }

    #[test]
    fn session_csv_has_one_row_with_labelled_counts() {
        let session = played_session();
        let csv = to_string(|buf| write_session_csv(&session, buf));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let header = reader.headers().unwrap().clone();
        assert_eq!(&header[0], "Match Number");
        assert_eq!(&header[10], "Crossed Initiation Line");
        assert_eq!(&header[header.len() - 1], "Notes");
        assert_eq!(header.len(), 11 + ActionKind::COUNTED.len());

        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(&row[0], "7");
        assert_eq!(&row[2], "blue");
        assert_eq!(&row[5], "9");
        assert_eq!(&row[10], "1");
        assert_eq!(&row[row.len() - 1], "quick, \"smooth\" cycles");
    }

    #[test]
    fn records_csv_uses_dashboard_columns() {
        let records = [saved_record(254, "line one\nline two"), saved_record(971, "")];
        let csv = to_string(|buf| write_records_csv(&records, buf));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        assert_eq!(reader.headers().unwrap().len(), ALL_MATCHES_HEADER.len());
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "254");
        assert_eq!(&rows[0][9], "true");
        assert_eq!(&rows[0][25], "line one\nline two");
        assert_eq!(&rows[1][1], "971");
    }

    #[test]
    fn records_json_is_an_array_of_rows() {
        let records = vec![saved_record(254, "solid")];
        let json = to_string(|buf| write_records_json(&records, buf));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["team_number"], 254);
        assert_eq!(rows[0]["alliance_color"], "blue");
        assert_eq!(rows[0]["crossed_init_line"], true);
        assert_eq!(rows[0]["notes"], "solid");
    }

    #[test]
    fn writes_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let session = played_session();

        to_file(&path, |out| write_session_json(&session, out)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"matchInfo\""));
    }
}
