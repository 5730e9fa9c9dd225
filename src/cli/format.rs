//! Output formatting for CLI display.

use crate::model::{ActionKind, ActionRecord, MatchRecord};
use crate::session::Status;
use crate::stats::{self, DashboardStats};

/// Match time as `m:ss`.
pub(super) fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// First eight characters of a match id, as shown in listings.
pub(super) fn short_id(record: &MatchRecord) -> String {
    record.id.to_string()[..8].to_string()
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// One-line live status: clock, period, balls, scores, modes.
pub(super) fn format_status(status: &Status) -> String {
    let scores = status.scores;
    let mut parts = vec![
        format_clock(status.elapsed),
        status.period.to_string(),
        format!("balls {}/{}", status.balls, status.capacity),
        format!(
            "auto {}  teleop {}  endgame {}  total {}",
            scores.auto, scores.teleop, scores.endgame, scores.total
        ),
    ];
    if status.defending {
        parts.push(format!("[DEFENSE {}]", format_clock(status.defense_current)));
    }
    if status.paused {
        parts.push("[PAUSED]".to_string());
    }
    parts.join("  ")
}

/// One timeline entry: `m:ss  Label`, with the stint length on defense ends.
pub(super) fn format_timeline_entry(record: &ActionRecord) -> String {
    let line = format!("{}  {}", format_clock(record.time), record.kind.label());
    match record.duration {
        Some(duration) => format!("{line} ({duration}s)"),
        None => line,
    }
}

/// Available actions with their shortcut keys, one per line.
pub(super) fn format_action_menu(actions: &[(Option<char>, ActionKind)]) -> String {
    actions
        .iter()
        .map(|(key, kind)| {
            let key = key.map_or_else(|| " ".to_string(), |k| k.to_string());
            format!("  [{key}] {:<18} {}", kind.name(), kind.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per saved match in a listing.
pub(super) fn format_match_row(record: &MatchRecord) -> String {
    format!(
        "{}  match {:<3} team {:<5} {:<4}  total {:<3}  {}  {}",
        short_id(record),
        record.match_number,
        record.team_number,
        record.alliance_color,
        record.total_score,
        record.scout_name,
        record.created_at.strftime("%Y-%m-%d %H:%M"),
    )
}

/// Full breakdown of one saved match.
pub(super) fn format_match_details(record: &MatchRecord, starting_balls: u32) -> String {
    let r = record;
    let mut lines = vec![
        format!("Match {}  Team {}  ({})", r.match_number, r.team_number, r.id),
        format!(
            "Alliance {}  Position {}  Scout {}  Duration {}s",
            r.alliance_color.as_str().to_uppercase(),
            r.starting_position,
            r.scout_name,
            r.match_duration
        ),
        String::new(),
        "Scores".to_string(),
        format!(
            "  auto {}  teleop {}  endgame {}  total {}",
            r.auto_score, r.teleop_score, r.endgame_score, r.total_score
        ),
        String::new(),
        "Autonomous".to_string(),
        format!("  crossed init line  {}", yes_no(r.crossed_init_line)),
        format!(
            "  ports              bottom {}  outer {}  inner {}",
            r.auto_bottom_port, r.auto_outer_port, r.auto_inner_port
        ),
        String::new(),
        "Teleop".to_string(),
        format!("  balls picked up    {}  (missed {})", r.pickup_ball, r.miss_ball),
        format!(
            "  ports              bottom {}  outer {}  inner {}",
            r.teleop_bottom_port, r.teleop_outer_port, r.teleop_inner_port
        ),
        format!(
            "  control panel      rotation {}  position {}",
            r.rotation_control, r.position_control
        ),
        String::new(),
        "Endgame".to_string(),
        format!(
            "  parked {}  hanging {}  level {}",
            yes_no(r.park),
            yes_no(r.hang),
            yes_no(r.level)
        ),
        String::new(),
        "Defense & other".to_string(),
        format!("  defense time       {}s", r.total_defense_time),
        format!(
            "  effective {}  fouls {}  pinned {}  penalties {}  disabled {}",
            r.effective_defense, r.defensive_foul, r.pinned, r.penalty, r.disabled
        ),
        String::new(),
        "Performance".to_string(),
        format!("  balls scored       {}", r.shots()),
        format!("  accuracy           {}%", stats::accuracy(r, starting_balls)),
        format!(
            "  shooting distance  max {:.2}  avg {:.2}",
            r.max_shooting_distance, r.avg_shooting_distance
        ),
        format!("  points per second  {:.2}", stats::points_per_second(r)),
        format!("  contribution       {}", stats::contribution_score(r)),
    ];

    if !r.field_markers.is_empty() {
        lines.push(String::new());
        lines.push("Field markers".to_string());
        for m in &r.field_markers {
            let marker = format!(
                "  {}  {:<6} ({:.2}, {:.2})",
                format_clock(m.time),
                m.kind,
                m.x,
                m.y
            );
            lines.push(match m.distance {
                Some(d) => format!("{marker}  {d:.2} m"),
                None => marker,
            });
        }
    }

    if !r.notes.is_empty() {
        lines.push(String::new());
        lines.push("Notes".to_string());
        lines.push(format!("  {}", r.notes));
    }

    lines.join("\n")
}

/// Dashboard statistics block.
pub(super) fn format_stats(s: &DashboardStats) -> String {
    [
        format!("Matches {}  Teams {}", s.total_matches, s.unique_teams),
        format!(
            "Average score     auto {}  teleop {}  endgame {}  total {}",
            s.avg_auto, s.avg_teleop, s.avg_endgame, s.avg_total
        ),
        format!(
            "Accuracy          auto {}%  teleop {}%  overall {}%",
            s.auto_accuracy, s.teleop_accuracy, s.overall_accuracy
        ),
        format!("Climb rate        {}%", s.climb_rate),
        format!(
            "Shooting distance max {:.2}  avg {:.2}",
            s.max_shooting_distance, s.avg_shooting_distance
        ),
        format!("Avg defense time  {}s", s.avg_defense_time),
        format!("Control wheel     {}%", s.control_wheel_rate),
        format!("Avg balls scored  {}", s.avg_balls),
    ]
    .join("\n")
}
