//! Column layouts of every snapshot file.

use std::collections::BTreeMap;

use crate::aggregate::{PlayerStats, TeamActionRate, TeamStats};
use crate::games::TeamGameCount;
use crate::metrics::{Metric, MetricSource};
use crate::scoring::AwardScore;
use crate::zones::{LeagueZoneRow, PlayerZoneRow, TeamZoneRow, ZonedEvent};

use super::Table;

pub const AWARDS_PLAYER: &str = "awards_player.parquet";
pub const AWARDS_TEAM: &str = "awards_team.parquet";
pub const LEADERBOARD: &str = "leaderboard.parquet";
pub const AWARD_SCORES: &str = "award_scores.parquet";
pub const TEAM_GAMES: &str = "team_games.parquet";
pub const TEAM_ACTION_PER_GAME: &str = "team_action_per_game.parquet";
pub const EVENTS_LIGHT: &str = "events_light.parquet";
pub const TEAM_ZONE_PROFILE: &str = "team_zone_profile.parquet";
pub const PLAYER_ZONE_ACTIVITY: &str = "player_zone_activity.parquet";
pub const LEAGUE_ZONE_AVERAGE: &str = "league_zone_average.parquet";

pub const ALL_FILES: [&str; 10] = [
    AWARDS_PLAYER,
    AWARDS_TEAM,
    LEADERBOARD,
    AWARD_SCORES,
    TEAM_GAMES,
    TEAM_ACTION_PER_GAME,
    EVENTS_LIGHT,
    TEAM_ZONE_PROFILE,
    PLAYER_ZONE_ACTIVITY,
    LEAGUE_ZONE_AVERAGE,
];

/// Adds one nullable column per metric.
fn with_metrics<S: MetricSource>(mut table: Table, rows: &[S], metrics: &[Metric]) -> Table {
    for m in metrics {
        table = table.float(m.name(), rows.iter().map(|r| r.metric(*m)));
    }
    table
}

pub fn player_stats(rows: &[PlayerStats]) -> Table {
    let table = Table::new()
        .int("player_id", rows.iter().map(|r| Some(r.player_id)))
        .int("team_id", rows.iter().map(|r| Some(r.team_id)))
        .text("player_name", rows.iter().map(|r| r.player_name.as_str()))
        .text("team_name", rows.iter().map(|r| r.team_name.as_str()))
        .int("games", rows.iter().map(|r| Some(r.games)))
        .int("tackle_attempt", rows.iter().map(|r| Some(r.tackle_attempt)))
        .int("tackle_fail", rows.iter().map(|r| Some(r.tackle_fail)))
        .int("duel_attempt", rows.iter().map(|r| Some(r.duel_attempt)))
        .int("duel_fail", rows.iter().map(|r| Some(r.duel_fail)))
        .int("foul_count", rows.iter().map(|r| Some(r.foul_count)))
        .int("danger_foul_count", rows.iter().map(|r| Some(r.danger_foul_count)))
        .int("clearance_attempt", rows.iter().map(|r| Some(r.clearance_attempt)))
        .int("block_attempt", rows.iter().map(|r| Some(r.block_attempt)))
        .int("block_fail", rows.iter().map(|r| Some(r.block_fail)))
        .int("interception_attempt", rows.iter().map(|r| Some(r.interception_attempt)))
        .int("interception_fail", rows.iter().map(|r| Some(r.interception_fail)))
        .int("card_count", rows.iter().map(|r| Some(r.card_count)))
        .int("def_actions", rows.iter().map(|r| Some(r.def_actions)))
        .int("concede_shot10", rows.iter().map(|r| Some(r.concede_shot10)))
        .float("first_half_fail_rate", rows.iter().map(|r| r.first_half_fail_rate))
        .float("second_half_fail_rate", rows.iter().map(|r| r.second_half_fail_rate))
        .int("def_third_attempts", rows.iter().map(|r| Some(r.def_third_attempts)))
        .int("def_third_fails", rows.iter().map(|r| Some(r.def_third_fails)))
        .int("total_shots", rows.iter().map(|r| Some(r.total_shots)))
        .int("off_target_shots", rows.iter().map(|r| Some(r.off_target_shots)))
        .int("penalty_box_shots", rows.iter().map(|r| Some(r.penalty_box_shots)))
        .int("penalty_box_miss", rows.iter().map(|r| Some(r.penalty_box_miss)))
        .int("offsides", rows.iter().map(|r| Some(r.offsides)))
        .int("pass_received", rows.iter().map(|r| Some(r.pass_received)))
        .int("pass_given", rows.iter().map(|r| Some(r.pass_given)))
        .int("total_crosses", rows.iter().map(|r| Some(r.total_crosses)))
        .int("cross_fail", rows.iter().map(|r| Some(r.cross_fail)))
        .int("aerial_fail", rows.iter().map(|r| Some(r.aerial_fail)));
    with_metrics(table, rows, &Metric::PLAYER)
}

pub fn team_stats(rows: &[TeamStats]) -> Table {
    let table = Table::new()
        .int("team_id", rows.iter().map(|r| Some(r.team_id)))
        .text("team_name", rows.iter().map(|r| r.team_name.as_str()))
        .int("games", rows.iter().map(|r| Some(r.games)))
        .int("home_games", rows.iter().map(|r| Some(r.home_games)))
        .int("away_games", rows.iter().map(|r| Some(r.away_games)))
        .int("events", rows.iter().map(|r| Some(r.events)))
        .int("foul_count", rows.iter().map(|r| Some(r.foul_count)))
        .int("danger_foul_count", rows.iter().map(|r| Some(r.danger_foul_count)))
        .int("tackle_attempt", rows.iter().map(|r| Some(r.tackle_attempt)))
        .int("tackle_fail", rows.iter().map(|r| Some(r.tackle_fail)))
        .int("total_shots", rows.iter().map(|r| Some(r.total_shots)))
        .int("off_target_shots", rows.iter().map(|r| Some(r.off_target_shots)))
        .int("def_third_attempts", rows.iter().map(|r| Some(r.def_third_attempts)))
        .int("def_third_fails", rows.iter().map(|r| Some(r.def_third_fails)))
        .int("card_count", rows.iter().map(|r| Some(r.card_count)));
    with_metrics(table, rows, &Metric::TEAM)
}

/// Used for both the full score table and the leaderboard cut.
pub fn award_scores(rows: &[AwardScore]) -> Table {
    Table::new()
        .text("award_id", rows.iter().map(|r| r.award_id))
        .text("level", rows.iter().map(|r| r.level.label()))
        .int("entity_id", rows.iter().map(|r| Some(r.entity_id)))
        .text("entity_name", rows.iter().map(|r| r.entity_name.as_str()))
        .int("team_id", rows.iter().map(|r| Some(r.team_id)))
        .text("team_name", rows.iter().map(|r| r.team_name.as_str()))
        .float("score", rows.iter().map(|r| Some(r.score)))
        .int("rank", rows.iter().map(|r| Some(r.rank)))
        .float("percentile", rows.iter().map(|r| Some(r.percentile)))
        .int("sample_size", rows.iter().map(|r| r.sample_size))
}

pub fn team_games(counts: &BTreeMap<u32, TeamGameCount>) -> Table {
    let rows: Vec<&TeamGameCount> = counts.values().collect();
    Table::new()
        .int("team_id", rows.iter().map(|r| Some(r.team_id)))
        .text("team_name", rows.iter().map(|r| r.team_name.as_str()))
        .int("home_games", rows.iter().map(|r| Some(r.home)))
        .int("away_games", rows.iter().map(|r| Some(r.away)))
        .int("games", rows.iter().map(|r| Some(r.total())))
}

pub fn team_action_per_game(rows: &[TeamActionRate]) -> Table {
    Table::new()
        .int("team_id", rows.iter().map(|r| Some(r.team_id)))
        .text("team_name", rows.iter().map(|r| r.team_name.as_str()))
        .text("type_name", rows.iter().map(|r| r.action.label()))
        .int("total", rows.iter().map(|r| Some(r.tally.total)))
        .int("successes", rows.iter().map(|r| Some(r.tally.successes)))
        .int("fails", rows.iter().map(|r| Some(r.tally.fails)))
        .int("games", rows.iter().map(|r| Some(r.games)))
        .float("per_game", rows.iter().map(|r| Some(r.per_game)))
}

pub fn events_light(rows: &[ZonedEvent<'_>]) -> Table {
    Table::new()
        .int("game_id", rows.iter().map(|r| i64::try_from(r.event.game_id).ok()))
        .int("action_id", rows.iter().map(|r| i64::try_from(r.event.action_id).ok()))
        .int("player_id", rows.iter().map(|r| r.event.player_id))
        .text("player_name", rows.iter().map(|r| r.event.player_name.as_str()))
        .int("team_id", rows.iter().map(|r| Some(r.event.team_id)))
        .text("team_name", rows.iter().map(|r| r.event.team_name.as_str()))
        .text("type_name", rows.iter().map(|r| r.event.action.label()))
        .text("result_name", rows.iter().map(|r| r.event.outcome.label()))
        .float("start_x", rows.iter().map(|r| Some(r.event.start.x)))
        .float("start_y", rows.iter().map(|r| Some(r.event.start.y)))
        .float("end_x", rows.iter().map(|r| Some(r.event.end.x)))
        .float("end_y", rows.iter().map(|r| Some(r.event.end.y)))
        .text("zone", rows.iter().map(|r| r.zone.label()))
        .text("zone_x", rows.iter().map(|r| r.zone.x.label()))
        .text("zone_y", rows.iter().map(|r| r.zone.y.label()))
        .int("is_success", rows.iter().map(|r| Some(r.event.is_zone_success())))
        .int("is_fail", rows.iter().map(|r| Some(r.event.is_fail())))
}

pub fn team_zone_profile(rows: &[TeamZoneRow]) -> Table {
    Table::new()
        .int("team_id", rows.iter().map(|r| Some(r.team_id)))
        .text("team_name", rows.iter().map(|r| r.team_name.as_str()))
        .text("zone", rows.iter().map(|r| r.zone.label()))
        .text("type_name", rows.iter().map(|r| r.action.label()))
        .int("event_count", rows.iter().map(|r| Some(r.event_count)))
        .int("success_count", rows.iter().map(|r| Some(r.success_count)))
        .float("success_rate", rows.iter().map(|r| Some(r.success_rate)))
}

pub fn player_zone_activity(rows: &[PlayerZoneRow]) -> Table {
    Table::new()
        .int("player_id", rows.iter().map(|r| Some(r.player_id)))
        .text("player_name", rows.iter().map(|r| r.player_name.as_str()))
        .int("team_id", rows.iter().map(|r| Some(r.team_id)))
        .text("team_name", rows.iter().map(|r| r.team_name.as_str()))
        .text("zone", rows.iter().map(|r| r.zone.label()))
        .text("type_name", rows.iter().map(|r| r.action.label()))
        .int("event_count", rows.iter().map(|r| Some(r.event_count)))
        .int("success_count", rows.iter().map(|r| Some(r.success_count)))
        .int("fail_count", rows.iter().map(|r| Some(r.fail_count)))
        .float("success_rate", rows.iter().map(|r| Some(r.success_rate)))
}

pub fn league_zone_average(rows: &[LeagueZoneRow]) -> Table {
    Table::new()
        .text("zone", rows.iter().map(|r| r.zone.label()))
        .text("type_name", rows.iter().map(|r| r.action.label()))
        .int("league_count", rows.iter().map(|r| Some(r.league_count)))
        .int("league_success", rows.iter().map(|r| Some(r.league_success)))
        .float("league_success_rate", rows.iter().map(|r| Some(r.league_success_rate)))
        .float("avg_events_per_team", rows.iter().map(|r| Some(r.avg_events_per_team)))
}
