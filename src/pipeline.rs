//! The offline build: load, preprocess, aggregate, score, write snapshots.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::aggregate::{self, PlayerStats, TeamAggregate};
use crate::awards::{self, AWARDS};
use crate::config::Settings;
use crate::error::DataError;
use crate::games::{self, TeamGameCount};
use crate::loader::{self, RawEventRow, RawMatchRow};
use crate::metrics::Level;
use crate::model::{Event, Match};
use crate::preprocess::{self, PreprocessReport};
use crate::scoring::{self, AwardScore};
use crate::snapshot::manifest::{self, Manifest};
use crate::snapshot::{self, Table, tables, xlsx};
use crate::text;
use crate::zones::{self, LeagueZoneRow, PlayerZoneRow, TeamZoneRow, ZonedEvent};

pub const XLSX_FILE: &str = "leaderboard.xlsx";

/// Cleaned input tables.
#[derive(Debug, Clone, Default)]
pub struct Season {
    pub events: Vec<Event>,
    pub matches: Vec<Match>,
    pub report: PreprocessReport,
}

impl Season {
    pub fn from_rows(event_rows: &[RawEventRow], match_rows: &[RawMatchRow]) -> Self {
        let (events, report) = preprocess::preprocess_events(event_rows);
        let matches = preprocess::preprocess_matches(match_rows);
        Self {
            events,
            matches,
            report,
        }
    }
}

/// Everything derived from one [`Season`].
#[derive(Debug, Clone)]
pub struct Analysis<'a> {
    pub game_counts: BTreeMap<u32, TeamGameCount>,
    pub players: Vec<PlayerStats>,
    pub teams: TeamAggregate,
    pub scores: Vec<AwardScore>,
    pub leaderboard: Vec<AwardScore>,
    pub zoned: Vec<ZonedEvent<'a>>,
    pub team_zones: Vec<TeamZoneRow>,
    pub player_zones: Vec<PlayerZoneRow>,
    pub league_zones: Vec<LeagueZoneRow>,
}

pub fn analyze(season: &Season, leaderboard_top: u32) -> Analysis<'_> {
    let game_counts = games::team_game_counts(&season.matches);
    let players = aggregate::aggregate_players(&season.events);
    let teams = aggregate::aggregate_teams(&season.events, &game_counts);

    let mut scores = scoring::score_awards(awards::for_level(Level::Player), &players);
    scores.extend(scoring::score_awards(awards::for_level(Level::Team), &teams.teams));
    let leaderboard = scoring::leaderboard(&scores, leaderboard_top);
    info!(
        "scored {} award entries, {} on the top-{} leaderboard",
        scores.len(),
        leaderboard.len(),
        leaderboard_top
    );

    let zoned = zones::zoned_key_events(&season.events);
    let team_zones = zones::team_zone_profile(&zoned);
    let player_zones = zones::player_zone_activity(&zoned);
    let league_zones = zones::league_zone_average(&team_zones);

    Analysis {
        game_counts,
        players,
        teams,
        scores,
        leaderboard,
        zoned,
        team_zones,
        player_zones,
        league_zones,
    }
}

/// Every snapshot file with its contents, in a fixed order.
pub fn snapshot_tables(analysis: &Analysis<'_>) -> Vec<(&'static str, Table)> {
    vec![
        (tables::AWARDS_PLAYER, tables::player_stats(&analysis.players)),
        (tables::AWARDS_TEAM, tables::team_stats(&analysis.teams.teams)),
        (tables::LEADERBOARD, tables::award_scores(&analysis.leaderboard)),
        (tables::AWARD_SCORES, tables::award_scores(&analysis.scores)),
        (tables::TEAM_GAMES, tables::team_games(&analysis.game_counts)),
        (
            tables::TEAM_ACTION_PER_GAME,
            tables::team_action_per_game(&analysis.teams.action_rates),
        ),
        (tables::EVENTS_LIGHT, tables::events_light(&analysis.zoned)),
        (tables::TEAM_ZONE_PROFILE, tables::team_zone_profile(&analysis.team_zones)),
        (
            tables::PLAYER_ZONE_ACTIVITY,
            tables::player_zone_activity(&analysis.player_zones),
        ),
        (
            tables::LEAGUE_ZONE_AVERAGE,
            tables::league_zone_average(&analysis.league_zones),
        ),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Inputs were unchanged and the previous snapshots were kept.
    pub skipped: bool,
    pub loaded_events: usize,
    pub skipped_event_rows: usize,
    pub loaded_matches: usize,
    pub skipped_match_rows: usize,
    pub preprocess: PreprocessReport,
    pub players: usize,
    pub teams: usize,
    pub excluded_teams: usize,
    pub award_scores: usize,
    pub leaderboard: usize,
    /// One line per award winner, in catalog order.
    pub headlines: Vec<String>,
    pub artifacts: BTreeMap<String, usize>,
    pub xlsx: Option<PathBuf>,
}

fn input_digests(settings: &Settings) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for (role, path) in [
        ("raw_events", &settings.raw_events),
        ("match_info", &settings.match_info),
    ] {
        if !path.exists() {
            return Err(DataError::MissingFile { path: path.clone() }.into());
        }
        out.insert(role.to_string(), manifest::file_digest(path)?);
    }
    Ok(out)
}

/// Runs the full build described by `settings`.
pub fn run(settings: &Settings) -> Result<BuildReport> {
    let digests = input_digests(settings)?;
    let dir = settings.artifacts_dir.as_path();

    if !settings.force_rebuild {
        if let Some(previous) = manifest::load(dir) {
            if previous.is_current(
                dir,
                &digests,
                settings.leaderboard_top,
                settings.export_xlsx,
            ) {
                info!(
                    "inputs unchanged since {}, keeping snapshots in {}",
                    previous.built_at,
                    dir.display()
                );
                let xlsx = settings
                    .export_xlsx
                    .then(|| previous.workbook.as_ref().map(|name| dir.join(name)))
                    .flatten();
                return Ok(BuildReport {
                    skipped: true,
                    artifacts: previous.artifacts,
                    xlsx,
                    ..BuildReport::default()
                });
            }
        }
    }

    let events = loader::load_raw_events(&settings.raw_events)?;
    let matches = loader::load_match_info(&settings.match_info)?;
    info!(
        "loaded {} events from {} matches",
        events.rows.len(),
        matches.rows.len()
    );

    let season = Season::from_rows(&events.rows, &matches.rows);
    if season.events.is_empty() {
        return Err(DataError::EmptyInput {
            path: settings.raw_events.clone(),
        }
        .into());
    }
    let analysis = analyze(&season, settings.leaderboard_top);

    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let artifacts = write_snapshots(dir, &snapshot_tables(&analysis))?;

    let xlsx_path = if settings.export_xlsx {
        let path = dir.join(XLSX_FILE);
        match xlsx::export_leaderboard(&path, &analysis.leaderboard) {
            Ok(report) => {
                info!(
                    "wrote {} ({} leaderboard rows)",
                    path.display(),
                    report.leaderboard_rows
                );
                Some(path)
            }
            Err(err) => {
                warn!("workbook export failed: {err:#}");
                None
            }
        }
    } else {
        None
    };

    let mut record = Manifest::new(digests, settings.leaderboard_top);
    record.artifacts = artifacts.clone();
    record.workbook = xlsx_path.as_ref().map(|_| XLSX_FILE.to_string());
    manifest::save(dir, &record)?;

    Ok(BuildReport {
        skipped: false,
        loaded_events: events.rows.len(),
        skipped_event_rows: events.skipped,
        loaded_matches: matches.rows.len(),
        skipped_match_rows: matches.skipped,
        preprocess: season.report.clone(),
        players: analysis.players.len(),
        teams: analysis.teams.teams.len(),
        excluded_teams: analysis.teams.excluded.len(),
        award_scores: analysis.scores.len(),
        leaderboard: analysis.leaderboard.len(),
        headlines: winner_headlines(&analysis.scores),
        artifacts,
        xlsx: xlsx_path,
    })
}

fn winner_headlines(scores: &[AwardScore]) -> Vec<String> {
    AWARDS
        .iter()
        .flat_map(|award| scoring::winners(scores, award.id))
        .map(|s| format!("{}: {}", text::headline(s), s.entity_name))
        .collect()
}

/// Writes each table to `dir` and returns row counts by file name.
pub fn write_snapshots(
    dir: &Path,
    snapshots: &[(&'static str, Table)],
) -> Result<BTreeMap<String, usize>> {
    let mut out = BTreeMap::new();
    for (name, table) in snapshots {
        let path = dir.join(name);
        snapshot::write_parquet(table, &path)
            .with_context(|| format!("write snapshot {name}"))?;
        info!("wrote {} ({} rows)", path.display(), table.num_rows());
        out.insert(name.to_string(), table.num_rows());
    }
    Ok(out)
}
