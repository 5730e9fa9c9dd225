//! Live match console.
//!
//! One current-thread tokio loop multiplexes the one-second match ticker,
//! stdin lines and finished saves. Every branch runs to completion before
//! the next, so the session is only ever touched from one place at a time.
//!
//! Saves are the only work that leaves the loop: the record is handed to a
//! blocking task and its outcome comes back as a notice. The session is never
//! rolled back on a failed save.
//!
//! Input is line-based. Single keys are period-dependent shortcuts; every
//! action can also be typed by name (`teleopInnerPort`, case-insensitive).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};
use uuid::Uuid;

use crate::export::{self, Format};
use crate::model::{ActionKind, MarkerKind, Period};
use crate::session::{MatchSession, PeriodChange, Recorded};
use crate::storage::{Storage, StorageError};

use super::format::{format_action_menu, format_clock, format_status, format_timeline_entry};

const HELP: &str = "\
Shortcuts
  autonomous        1 2 3 auto bottom/outer/inner port, i init line
  teleop, endgame   1 2 3 teleop bottom/outer/inner port, p pickup,
                    r rotation control, c position control
  endgame           h hang, k park, l level
  always            f penalty, x disabled, d defense mode,
                    a single space pauses or resumes the clock
Commands
  <action name>              record any action by name, e.g. missBall
  mark <pickup|shoot|score> <x> <y>
                             place a field marker, x and y in [0, 1]
  unmark | clear-marks       remove the newest marker | all markers
  note <text>                replace the match notes
  pause | resume             hold or restart the clock
  status | actions | timeline
  end                        end the match now
  save                       save the match to the local database
  export <json|csv> [path]   write the match to a file
  reset                      start this match over
  quit";

// ── Input ──

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Input {
    Record(ActionKind),
    TogglePause,
    Pause,
    Resume,
    Defense,
    Mark { kind: MarkerKind, x: f64, y: f64 },
    Unmark,
    ClearMarks,
    Note(String),
    Status,
    Actions,
    Timeline,
    End,
    Save,
    Export { format: Format, path: Option<PathBuf> },
    Reset,
    Help,
    Quit,
}

/// Keys that are shortcuts in at least one period.
const SHORTCUT_KEYS: &str = "123iprchklfx";

/// The action a single-key shortcut records in `period`, if any.
pub(super) fn shortcut(key: char, period: Period) -> Option<ActionKind> {
    use Period::{Autonomous, Endgame, Teleop};

    let kind = match (key, period) {
        ('1', Autonomous) => ActionKind::AutoBottomPort,
        ('2', Autonomous) => ActionKind::AutoOuterPort,
        ('3', Autonomous) => ActionKind::AutoInnerPort,
        ('i', Autonomous) => ActionKind::InitLine,
        ('1', Teleop | Endgame) => ActionKind::TeleopBottomPort,
        ('2', Teleop | Endgame) => ActionKind::TeleopOuterPort,
        ('3', Teleop | Endgame) => ActionKind::TeleopInnerPort,
        ('p', Teleop | Endgame) => ActionKind::PickupBall,
        ('r', Teleop | Endgame) => ActionKind::RotationControl,
        ('c', Teleop | Endgame) => ActionKind::PositionControl,
        ('h', Endgame) => ActionKind::Hang,
        ('k', Endgame) => ActionKind::Park,
        ('l', Endgame) => ActionKind::Level,
        ('f', _) => ActionKind::Penalty,
        ('x', _) => ActionKind::Disabled,
        _ => return None,
    };
    Some(kind)
}

fn key_for(kind: ActionKind, period: Period) -> Option<char> {
    SHORTCUT_KEYS
        .chars()
        .find(|&key| shortcut(key, period) == Some(kind))
}

/// Parse a console line in the context of the current period.
pub(super) fn parse(line: &str, period: Period) -> Result<Input, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        // A bare space is the pause key; a bare enter refreshes the status.
        return Ok(if line.contains(' ') {
            Input::TogglePause
        } else {
            Input::Status
        });
    }

    let (word, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(w, r)| (w, r.trim()));

    let mut chars = word.chars();
    if let (Some(key), None) = (chars.next(), chars.next()) {
        if let Some(kind) = shortcut(key, period) {
            return Ok(Input::Record(kind));
        }
        match key {
            'd' => return Ok(Input::Defense),
            't' => return Ok(Input::Timeline),
            '?' => return Ok(Input::Actions),
            'q' => return Ok(Input::Quit),
            _ => {}
        }
    }

    let input = match word.to_ascii_lowercase().as_str() {
        "pause" => Input::Pause,
        "resume" => Input::Resume,
        "defense" => Input::Defense,
        "mark" => parse_mark(rest)?,
        "unmark" => Input::Unmark,
        "clear-marks" => Input::ClearMarks,
        "note" | "notes" => Input::Note(rest.to_string()),
        "status" => Input::Status,
        "actions" => Input::Actions,
        "timeline" => Input::Timeline,
        "end" => Input::End,
        "save" => Input::Save,
        "export" => parse_export(rest)?,
        "reset" => Input::Reset,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        _ => match word.parse::<ActionKind>() {
            Ok(kind) => Input::Record(kind),
            Err(_) if word.chars().count() == 1 => {
                return Err(format!("'{word}' is not a shortcut during {period}"));
            }
            Err(_) => return Err(format!("unknown command: {word} (type help)")),
        },
    };
    Ok(input)
}

fn parse_mark(args: &str) -> Result<Input, String> {
    const USAGE: &str = "usage: mark <pickup|shoot|score> <x> <y>";
    let parts: Vec<&str> = args.split_whitespace().collect();
    let &[kind, x, y] = parts.as_slice() else {
        return Err(USAGE.to_string());
    };
    let coord = |s: &str| s.parse::<f64>().map_err(|_| format!("invalid coordinate: {s}"));
    Ok(Input::Mark {
        kind: kind.parse()?,
        x: coord(x)?,
        y: coord(y)?,
    })
}

fn parse_export(args: &str) -> Result<Input, String> {
    let (format, path) = args
        .split_once(char::is_whitespace)
        .map_or((args, ""), |(f, p)| (f, p.trim()));
    if format.is_empty() {
        return Err("usage: export <json|csv> [path]".to_string());
    }
    Ok(Input::Export {
        format: format.parse()?,
        path: (!path.is_empty()).then(|| PathBuf::from(path)),
    })
}

// ── Notices ──

/// How a notice should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Level {
    Success,
    Error,
    Warning,
    Info,
}

/// A one-shot message to the scout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            Level::Success => "ok",
            Level::Error => "error",
            Level::Warning => "warn",
            Level::Info => "info",
        };
        write!(f, "[{tag}] {}", self.text)
    }
}

/// What handling one line produced.
#[derive(Debug, Default)]
pub(super) struct Reply {
    pub notices: Vec<Notice>,
    /// A record to persist in the background.
    pub save: Option<crate::model::MatchRecord>,
    pub quit: bool,
}

impl Reply {
    fn say(level: Level, text: impl Into<String>) -> Self {
        Self {
            notices: vec![Notice::new(level, text)],
            ..Self::default()
        }
    }
}

// ── Console ──

/// Synchronous core of the live console: input in, notices out.
pub(super) struct Console {
    session: MatchSession,
    /// Id of the last session that was saved successfully.
    saved: Option<Uuid>,
    quit_armed: bool,
}

impl Console {
    pub(super) fn new(session: MatchSession) -> Self {
        Self {
            session,
            saved: None,
            quit_armed: false,
        }
    }

    pub(super) fn session(&self) -> &MatchSession {
        &self.session
    }

    /// Greeting printed once when the console opens.
    pub(super) fn banner(&self) -> String {
        let info = self.session.info();
        format!(
            "Scouting team {} in match {} ({} alliance, {}) as {}.\n\
             Type help for commands.\n{}\n{}",
            info.team_number,
            info.match_number,
            info.alliance,
            info.starting_position,
            info.scout_name,
            format_status(&self.session.status()),
            self.action_menu(),
        )
    }

    /// Advance the match clock one second.
    pub(super) fn tick(&mut self) -> Vec<Notice> {
        let Some(PeriodChange { to, .. }) = self.session.tick() else {
            return Vec::new();
        };
        let mut notices = Vec::new();
        if to == Period::Ended {
            notices.push(Notice::new(
                Level::Warning,
                format!(
                    "match ended at {}; save or export it now",
                    format_clock(self.session.elapsed())
                ),
            ));
        } else {
            notices.push(Notice::new(Level::Info, format!("{to} period started")));
        }
        notices.push(Notice::new(Level::Info, format_status(&self.session.status())));
        notices
    }

    pub(super) fn handle_line(&mut self, line: &str) -> Reply {
        match parse(line, self.session.period()) {
            Ok(input) => self.apply(input),
            Err(e) => {
                self.quit_armed = false;
                Reply::say(Level::Warning, e)
            }
        }
    }

    pub(super) fn apply(&mut self, input: Input) -> Reply {
        if input != Input::Quit {
            self.quit_armed = false;
        }
        match input {
            Input::Record(kind) => self.record(kind),
            Input::TogglePause => self.set_paused(None),
            Input::Pause => self.set_paused(Some(true)),
            Input::Resume => self.set_paused(Some(false)),
            Input::Defense => self.toggle_defense(),
            Input::Mark { kind, x, y } => match self.session.add_marker(kind, x, y) {
                Ok(marker) => {
                    let text = format!("{kind} marker at ({x:.2}, {y:.2})");
                    let text = match marker.distance {
                        Some(d) => format!("{text}, {d:.2} m from target"),
                        None => text,
                    };
                    Reply::say(Level::Success, text)
                }
                Err(e) => Reply::say(Level::Warning, e.to_string()),
            },
            Input::Unmark => match self.session.undo_marker() {
                Some(marker) => Reply::say(Level::Info, format!("removed {} marker", marker.kind)),
                None => Reply::say(Level::Info, "no markers to remove"),
            },
            Input::ClearMarks => {
                let n = self.session.field().markers().len();
                self.session.clear_markers();
                Reply::say(Level::Info, format!("cleared {n} marker(s)"))
            }
            Input::Note(text) => {
                self.session.set_notes(text);
                Reply::say(Level::Success, "notes updated")
            }
            Input::Status => Reply::say(Level::Info, format_status(&self.session.status())),
            Input::Actions => Reply::say(Level::Info, format!("available actions\n{}", self.action_menu())),
            Input::Timeline => self.timeline(),
            Input::End => match self.session.end() {
                Some(_) => Reply::say(
                    Level::Warning,
                    format!("match ended at {}", format_clock(self.session.elapsed())),
                ),
                None => Reply::say(Level::Info, "the match has already ended"),
            },
            Input::Save => Reply {
                notices: vec![Notice::new(Level::Info, "saving match...")],
                save: Some(self.session.to_record()),
                quit: false,
            },
            Input::Export { format, path } => self.export(format, path),
            Input::Reset => {
                self.session.restart();
                Reply::say(Level::Info, format!("match reset\n{}", format_status(&self.session.status())))
            }
            Input::Help => Reply::say(Level::Info, HELP),
            Input::Quit => self.quit(),
        }
    }

    /// Turn a finished save into a notice.
    pub(super) fn on_saved(&mut self, result: Result<Uuid, StorageError>) -> Notice {
        match result {
            Ok(id) => {
                info!(%id, "match saved");
                self.saved = Some(id);
                Notice::new(Level::Success, "match data saved")
            }
            Err(StorageError::MatchAlreadyExists(_)) => {
                Notice::new(Level::Info, "this match is already saved")
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                Notice::new(Level::Error, format!("error saving match: {e}"))
            }
        }
    }

    fn record(&mut self, kind: ActionKind) -> Reply {
        match self.session.record(kind) {
            Ok(Recorded::Added(record)) => {
                let points = self.session.rules().points.points(kind);
                let text = format!("{}  {}", format_clock(record.time), kind.label());
                let text = if points > 0 {
                    format!("{text} (+{points})")
                } else {
                    text
                };
                Reply::say(Level::Success, text)
            }
            Ok(Recorded::Removed(record)) => Reply::say(
                Level::Info,
                format!("{} removed (was at {})", kind.label(), format_clock(record.time)),
            ),
            Err(e) => Reply::say(Level::Warning, e.to_string()),
        }
    }

    /// Pause, resume, or flip the clock when `paused` is `None`.
    fn set_paused(&mut self, paused: Option<bool>) -> Reply {
        if self.session.period() == Period::Ended {
            return Reply::say(Level::Info, "the match has ended");
        }
        let now_paused = match paused {
            None => self.session.toggle_pause(),
            Some(true) => {
                self.session.pause();
                true
            }
            Some(false) => {
                self.session.resume();
                false
            }
        };
        let text = if now_paused { "paused" } else { "resumed" };
        Reply::say(Level::Info, text)
    }

    fn toggle_defense(&mut self) -> Reply {
        if self.session.status().defending {
            let duration = self
                .session
                .exit_defense()
                .and_then(|r| r.duration)
                .unwrap_or_default();
            return Reply::say(
                Level::Info,
                format!(
                    "defense ended after {duration}s (total {}s)",
                    self.session.defense_total()
                ),
            );
        }
        if self.session.enter_defense().is_none() {
            return Reply::say(Level::Warning, "the match has ended");
        }
        Reply::say(
            Level::Info,
            format!("defense mode, d to leave\n{}", self.action_menu()),
        )
    }

    fn timeline(&self) -> Reply {
        let ledger = self.session.ledger();
        if ledger.is_empty() {
            return Reply::say(Level::Info, "no actions recorded yet");
        }
        let lines: Vec<String> = ledger.recent().map(format_timeline_entry).collect();
        Reply::say(
            Level::Info,
            format!("timeline, {} action(s)\n{}", ledger.len(), lines.join("\n")),
        )
    }

    fn export(&self, format: Format, path: Option<PathBuf>) -> Reply {
        let path = path.unwrap_or_else(|| {
            PathBuf::from(export::match_file_name(self.session.info(), format))
        });
        let written = export::to_file(&path, |out| match format {
            Format::Json => export::write_session_json(&self.session, out),
            Format::Csv => export::write_session_csv(&self.session, out),
        });
        match written {
            Ok(()) => {
                info!(path = %path.display(), %format, "match exported");
                Reply::say(Level::Success, format!("exported to {}", path.display()))
            }
            Err(e) => Reply::say(Level::Error, format!("export failed: {e}")),
        }
    }

    fn quit(&mut self) -> Reply {
        let unsaved = !self.session.ledger().is_empty() && self.saved != Some(self.session.id());
        if unsaved && !self.quit_armed {
            self.quit_armed = true;
            return Reply::say(
                Level::Warning,
                "this match is not saved; type quit again to discard it",
            );
        }
        Reply {
            quit: true,
            ..Reply::default()
        }
    }

    fn action_menu(&self) -> String {
        let period = self.session.period();
        let actions: Vec<(Option<char>, ActionKind)> = self
            .session
            .available_actions()
            .into_iter()
            .map(|kind| (key_for(kind, period), kind))
            .collect();
        if actions.is_empty() {
            return "  (no actions available)".to_string();
        }
        format_action_menu(&actions)
    }
}

// ── Event loop ──

/// Run the console for `session` until the scout quits or stdin closes.
pub(super) fn run(session: MatchSession, storage: &Storage) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start console runtime: {e}"))?;
    runtime.block_on(drive(Console::new(session), storage.clone()))
}

async fn drive(mut console: Console, storage: Storage) -> Result<(), String> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the clock starts at 0.
    ticker.tick().await;
    let mut saves: JoinSet<Result<Uuid, StorageError>> = JoinSet::new();

    println!("{}", console.banner());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for notice in console.tick() {
                    println!("{notice}");
                }
            }
            line = lines.next_line() => {
                let line = line.map_err(|e| format!("failed to read input: {e}"))?;
                let Some(line) = line else { break };
                let reply = console.handle_line(&line);
                for notice in &reply.notices {
                    println!("{notice}");
                }
                if let Some(record) = reply.save {
                    let storage = storage.clone();
                    saves.spawn_blocking(move || {
                        storage.save_match(&record).map(|()| record.id)
                    });
                }
                if reply.quit {
                    break;
                }
            }
            Some(joined) = saves.join_next(), if !saves.is_empty() => {
                println!("{}", settle(&mut console, joined));
            }
        }
    }

    // In-flight saves still land before the console closes.
    while let Some(joined) = saves.join_next().await {
        println!("{}", settle(&mut console, joined));
    }
    info!(id = %console.session().id(), "console closed");
    Ok(())
}

fn settle(
    console: &mut Console,
    joined: Result<Result<Uuid, StorageError>, tokio::task::JoinError>,
) -> Notice {
    match joined {
        Ok(result) => console.on_saved(result),
        Err(e) => Notice::new(Level::Error, format!("save task failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::model::Alliance;
    use crate::session::{MatchRules, MatchSetup};

    fn console() -> Console {
        let setup = MatchSetup {
            team_number: Some(254),
            match_number: Some(3),
            alliance: Some(Alliance::Red),
            starting_position: Some("right".into()),
            scout_name: None,
            preload_balls: 1,
        };
        Console::new(MatchSession::start(setup, MatchRules::default()).unwrap())
    }

    fn advance_to(console: &mut Console, t: u32) {
        while console.session().elapsed() < t {
            console.tick();
        }
    }

    fn last(reply: &Reply) -> &Notice {
        reply.notices.last().unwrap()
    }

    // ── Parsing ──

    #[test]
    fn shortcuts_depend_on_period() {
        assert_eq!(
            parse("1", Period::Autonomous),
            Ok(Input::Record(ActionKind::AutoBottomPort))
        );
        assert_eq!(
            parse("1", Period::Teleop),
            Ok(Input::Record(ActionKind::TeleopBottomPort))
        );
        assert_eq!(parse("h", Period::Endgame), Ok(Input::Record(ActionKind::Hang)));
        assert!(parse("h", Period::Teleop).unwrap_err().contains("not a shortcut"));
        assert_eq!(parse("f", Period::Autonomous), Ok(Input::Record(ActionKind::Penalty)));
        assert_eq!(parse("x", Period::Ended), Ok(Input::Record(ActionKind::Disabled)));
    }

    #[test]
    fn action_names_work_in_any_period() {
        assert_eq!(
            parse("missBall", Period::Autonomous),
            Ok(Input::Record(ActionKind::MissBall))
        );
        assert_eq!(
            parse("  HANG ", Period::Teleop),
            Ok(Input::Record(ActionKind::Hang))
        );
    }

    #[test]
    fn space_pauses_and_enter_shows_status() {
        assert_eq!(parse(" ", Period::Teleop), Ok(Input::TogglePause));
        assert_eq!(parse("", Period::Teleop), Ok(Input::Status));
        assert_eq!(parse("pause", Period::Teleop), Ok(Input::Pause));
        assert_eq!(parse("Resume", Period::Teleop), Ok(Input::Resume));
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse("mark shoot 0.5 0.25", Period::Teleop),
            Ok(Input::Mark {
                kind: MarkerKind::Shoot,
                x: 0.5,
                y: 0.25
            })
        );
        assert!(parse("mark shoot 0.5", Period::Teleop).is_err());
        assert!(parse("mark dance 0.5 0.5", Period::Teleop).is_err());

        assert_eq!(
            parse("note  fast cycler ", Period::Teleop),
            Ok(Input::Note("fast cycler".into()))
        );
        assert_eq!(
            parse("export csv out/m3.csv", Period::Ended),
            Ok(Input::Export {
                format: Format::Csv,
                path: Some(PathBuf::from("out/m3.csv"))
            })
        );
        assert_eq!(
            parse("export JSON", Period::Ended),
            Ok(Input::Export {
                format: Format::Json,
                path: None
            })
        );
        assert!(parse("export", Period::Ended).is_err());
    }

    #[test]
    fn unknown_words_are_errors() {
        assert!(parse("dance", Period::Teleop).unwrap_err().contains("unknown command"));
    }

    // ── Console ──

    #[test]
    fn records_with_points_and_rejects_without_balls() {
        let mut console = console();
        let reply = console.handle_line("3");
        assert_eq!(last(&reply).level, Level::Success);
        assert!(last(&reply).text.contains("Auto - Inner Port (+6)"));

        let reply = console.handle_line("3");
        assert_eq!(last(&reply).level, Level::Warning);
        assert!(last(&reply).text.contains("no balls available"));
        assert_eq!(console.session().scores().auto, 6);
    }

    #[test]
    fn toggles_report_removal() {
        let mut console = console();
        console.handle_line("i");
        let reply = console.handle_line("i");
        assert_eq!(last(&reply).level, Level::Info);
        assert!(last(&reply).text.contains("removed"));
        assert_eq!(console.session().scores().total, 0);
    }

    #[test]
    fn tick_announces_period_changes() {
        let mut console = console();
        for _ in 0..14 {
            assert!(console.tick().is_empty());
        }
        let notices = console.tick();
        assert_eq!(notices[0].text, "TELEOP period started");

        advance_to(&mut console, 149);
        let notices = console.tick();
        assert_eq!(notices[0].level, Level::Warning);
        assert!(notices[0].text.starts_with("match ended at 2:30"));
    }

    #[test]
    fn defense_toggles_and_reports_time() {
        let mut console = console();
        advance_to(&mut console, 30);
        let reply = console.handle_line("d");
        assert!(last(&reply).text.contains("effectiveDefense"));

        advance_to(&mut console, 45);
        let reply = console.handle_line("defense");
        assert_eq!(last(&reply).text, "defense ended after 15s (total 15s)");
    }

    #[test]
    fn pause_stops_the_clock() {
        let mut console = console();
        console.handle_line(" ");
        console.tick();
        assert_eq!(console.session().elapsed(), 0);
        console.handle_line(" ");
        console.tick();
        assert_eq!(console.session().elapsed(), 1);

        console.handle_line("pause");
        console.handle_line("pause");
        console.tick();
        assert_eq!(console.session().elapsed(), 1);
        console.handle_line("resume");
        console.tick();
        assert_eq!(console.session().elapsed(), 2);
    }

    #[test]
    fn save_hands_off_record_and_result_comes_back() {
        let mut console = console();
        console.handle_line("i");
        let reply = console.handle_line("save");
        let record = reply.save.unwrap();
        assert!(record.crossed_init_line);
        assert_eq!(record.id, console.session().id());

        let notice = console.on_saved(Ok(record.id));
        assert_eq!(notice.level, Level::Success);

        let notice = console.on_saved(Err(StorageError::Corrupt("disk".into())));
        assert_eq!(notice.level, Level::Error);
        // A failed save never rolls the session back.
        assert_eq!(console.session().scores().auto, 5);
    }

    #[test]
    fn save_round_trips_through_storage() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path()).unwrap();
        let mut console = console();
        console.handle_line("i");

        let record = console.handle_line("save").save.unwrap();
        let result = storage.save_match(&record).map(|()| record.id);
        assert_eq!(console.on_saved(result).level, Level::Success);

        let again = storage.save_match(&record).map(|()| record.id);
        assert_eq!(console.on_saved(again).level, Level::Info);
        assert_eq!(storage.load_match(record.id).unwrap().team_number, 254);
    }

    #[test]
    fn quit_asks_again_for_unsaved_match() {
        let mut console = console();
        console.handle_line("f");

        let reply = console.handle_line("quit");
        assert!(!reply.quit);
        assert_eq!(last(&reply).level, Level::Warning);
        assert!(console.handle_line("q").quit);

        let mut console = self::console();
        console.handle_line("f");
        console.handle_line("quit");
        console.handle_line("status");
        assert!(!console.handle_line("quit").quit);
    }

    #[test]
    fn quit_after_save_is_immediate() {
        let mut console = console();
        console.handle_line("f");
        let id = console.session().id();
        console.on_saved(Ok(id));
        assert!(console.handle_line("quit").quit);
    }

    #[test]
    fn markers_and_notes() {
        let mut console = console();
        let reply = console.handle_line("mark shoot 1.0 0.5");
        assert!(last(&reply).text.contains("0.00 m from target"));
        let reply = console.handle_line("mark score 1.5 0.5");
        assert_eq!(last(&reply).level, Level::Warning);
        assert_eq!(console.session().field().markers().len(), 1);

        console.handle_line("unmark");
        assert!(console.session().field().markers().is_empty());

        console.handle_line("note strong defender");
        assert_eq!(console.session().notes(), "strong defender");
    }

    #[test]
    fn export_writes_session_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m3.csv");
        let mut console = console();
        console.handle_line("i");

        let reply = console.apply(Input::Export {
            format: Format::Csv,
            path: Some(path.clone()),
        });
        assert_eq!(last(&reply).level, Level::Success);
        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.starts_with("Match Number,Team Number"));
    }

    #[test]
    fn end_and_reset() {
        let mut console = console();
        advance_to(&mut console, 20);
        console.handle_line("end");
        assert_eq!(console.session().period(), Period::Ended);
        let reply = console.handle_line("f");
        assert!(last(&reply).text.contains("ended"));

        console.handle_line("reset");
        assert_eq!(console.session().period(), Period::Autonomous);
        assert_eq!(console.session().elapsed(), 0);
    }

    #[test]
    fn timeline_is_newest_first() {
        let mut console = console();
        assert_eq!(last(&console.handle_line("t")).text, "no actions recorded yet");

        console.handle_line("i");
        advance_to(&mut console, 20);
        console.handle_line("p");

        let reply = console.handle_line("timeline");
        let lines: Vec<&str> = last(&reply).text.lines().collect();
        assert_eq!(lines[0], "timeline, 2 action(s)");
        assert_eq!(lines[1], "0:20  Station Picked Up Ball");
        assert_eq!(lines[2], "0:00  Crossed Initiation Line");
    }

    #[test]
    fn menu_shows_shortcut_keys_for_period() {
        let console = console();
        let menu = console.action_menu();
        assert!(menu.contains("[1] autoBottomPort"));
        assert!(menu.contains("[i] initLine"));
        assert!(menu.contains("[f] penalty"));
    }
}
