use std::collections::HashSet;

use tracing::{info, warn};

use crate::loader::{RawEventRow, RawMatchRow};
use crate::model::{ActionType, Event, Match, Outcome};
use crate::pitch::PitchPoint;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessReport {
    pub kept: usize,
    pub dropped_coordinates: usize,
    pub dropped_time: usize,
    pub other_action_types: usize,
}

/// Cleans raw event rows, normalizes categories and sorts into match order.
pub fn preprocess_events(rows: &[RawEventRow]) -> (Vec<Event>, PreprocessReport) {
    let mut report = PreprocessReport::default();
    let mut events = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(time_seconds) = row.time_seconds.filter(|t| t.is_finite()) else {
            report.dropped_time += 1;
            continue;
        };
        let (Some(start), Some(end)) = (
            point(row.start_x, row.start_y),
            point(row.end_x, row.end_y),
        ) else {
            report.dropped_coordinates += 1;
            continue;
        };

        let action = ActionType::from_raw(&row.type_name);
        if matches!(action, ActionType::Other(_)) {
            report.other_action_types += 1;
        }
        let outcome = row
            .result_name
            .as_deref()
            .map(Outcome::from_raw)
            .unwrap_or(Outcome::Missing);
        let player_id = row.player_id.and_then(player_id_from_float);

        events.push(Event {
            game_id: row.game_id,
            period_id: row.period_id,
            time_seconds,
            action_id: row.action_id,
            team_id: row.team_id,
            team_name: display_name(row.team_name_ko.as_deref(), row.team_id),
            player_id,
            player_name: match player_id {
                Some(id) => display_name(row.player_name_ko.as_deref(), id),
                None => String::new(),
            },
            action,
            outcome,
            start,
            end,
        });
    }

    sort_events(&mut events);
    report.kept = events.len();

    if report.dropped_coordinates > 0 || report.dropped_time > 0 {
        warn!(
            "dropped {} events without coordinates and {} without a clock time",
            report.dropped_coordinates, report.dropped_time
        );
    }
    info!(
        "preprocessed {} events ({} with unrecognized action types)",
        report.kept, report.other_action_types
    );

    (events, report)
}

/// Match order: game, period, clock, then action id.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.game_id
            .cmp(&b.game_id)
            .then(a.period_id.cmp(&b.period_id))
            .then(a.time_seconds.total_cmp(&b.time_seconds))
            .then(a.action_id.cmp(&b.action_id))
    });
}

/// Builds the match table; the first row for a game id wins.
pub fn preprocess_matches(rows: &[RawMatchRow]) -> Vec<Match> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if row.home_team_id == row.away_team_id {
            warn!(
                "game {}: home and away team are both {}, skipping",
                row.game_id, row.home_team_id
            );
            continue;
        }
        if !seen.insert(row.game_id) {
            warn!("game {}: duplicate match row ignored", row.game_id);
            continue;
        }
        out.push(Match {
            game_id: row.game_id,
            home_team_id: row.home_team_id,
            away_team_id: row.away_team_id,
            home_team_name: display_name(row.home_team_name_ko.as_deref(), row.home_team_id),
            away_team_name: display_name(row.away_team_name_ko.as_deref(), row.away_team_id),
            home_score: row.home_score.unwrap_or(0),
            away_score: row.away_score.unwrap_or(0),
        });
    }
    out.sort_by_key(|m| m.game_id);
    out
}

fn point(x: Option<f64>, y: Option<f64>) -> Option<PitchPoint> {
    let (x, y) = (x?, y?);
    (x.is_finite() && y.is_finite()).then(|| PitchPoint::new(x, y))
}

fn player_id_from_float(v: f64) -> Option<u32> {
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v as u32)
}

fn display_name(name: Option<&str>, id: u32) -> String {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string())
}
