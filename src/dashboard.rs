//! Data and navigation state behind the terminal dashboard. Rendering lives in `main.rs`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::info;

use crate::awards::{self, AWARDS, Award};
use crate::error::DataError;
use crate::metrics::{Level, Metric};
use crate::pitch::{PitchPoint, Zone, ZoneX, ZoneY};
use crate::scoring::AwardScore;
use crate::snapshot::{self, Table, tables};

/// How many ranked entries the winner map shows per award.
pub const WINNER_MAP_TOP: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Awards,
    Teams,
    Players,
    Patterns,
    Pitch,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Awards,
        Screen::Teams,
        Screen::Players,
        Screen::Patterns,
        Screen::Pitch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Awards => "Awards",
            Screen::Teams => "Teams",
            Screen::Players => "Players",
            Screen::Patterns => "Patterns",
            Screen::Pitch => "Pitch",
        }
    }
}

/// What the pitch screen plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchMode {
    /// One team's events of one action type.
    Team,
    /// Every key event of the current award's top entries.
    Winners,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub award_id: String,
    pub entity_id: u32,
    pub entity_name: String,
    pub team_id: u32,
    pub team_name: String,
    pub score: f64,
    pub rank: u32,
    pub percentile: f64,
    pub sample_size: Option<u32>,
}

impl ScoreRow {
    /// Back to a scoring entry; `None` for an award id the catalog no longer has.
    pub fn award_score(&self) -> Option<AwardScore> {
        let award = awards::find(&self.award_id)?;
        Some(AwardScore {
            award_id: award.id,
            level: award.level,
            entity_id: self.entity_id,
            entity_name: self.entity_name.clone(),
            team_id: self.team_id,
            team_name: self.team_name.clone(),
            score: self.score,
            rank: self.rank,
            percentile: self.percentile,
            sample_size: self.sample_size,
        })
    }

    fn is_player(&self, player: &EntityRow) -> bool {
        self.entity_id == player.id
            && self.team_id == player.team_id
            && awards::find(&self.award_id).is_some_and(|a| a.level == Level::Player)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub id: u32,
    pub name: String,
    /// Equals `id` for team rows.
    pub team_id: u32,
    pub team_name: String,
    pub games: u32,
    pub metrics: BTreeMap<Metric, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCount {
    pub team_id: u32,
    pub team_name: String,
    pub zone: Zone,
    pub action: String,
    pub event_count: u32,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerZoneCount {
    pub player_id: u32,
    pub team_id: u32,
    pub zone: Zone,
    pub action: String,
    pub event_count: u32,
    pub fail_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PitchEvent {
    pub player_id: Option<u32>,
    pub player_name: String,
    pub team_id: u32,
    pub team_name: String,
    pub action: String,
    pub start: PitchPoint,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamActionRow {
    pub team_id: u32,
    pub action: String,
    pub total: u32,
    pub fails: u32,
    pub per_game: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HomeAway {
    pub home: u32,
    pub away: u32,
}

/// A team as the zone screens list it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
}

/// One award seen from two players.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow<'a> {
    pub award: &'static Award,
    pub left: Option<&'a ScoreRow>,
    pub right: Option<&'a ScoreRow>,
}

impl ComparisonRow<'_> {
    /// Percentile gap, counting an unranked side as 0.
    pub fn diff(&self) -> f64 {
        let pct = |s: Option<&ScoreRow>| s.map(|r| r.percentile).unwrap_or(0.0);
        pct(self.left) - pct(self.right)
    }
}

/// Start points of one ranked entry.
#[derive(Debug, Clone, PartialEq)]
pub struct WinnerTrail {
    pub name: String,
    pub rank: u32,
    pub points: Vec<(f64, f64)>,
}

/// Everything the dashboard shows, read once from the artifacts directory.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub scores: Vec<ScoreRow>,
    pub teams: Vec<EntityRow>,
    pub players: Vec<EntityRow>,
    pub home_away: BTreeMap<u32, HomeAway>,
    pub team_actions: Vec<TeamActionRow>,
    pub team_zones: Vec<ZoneCount>,
    pub player_zones: Vec<PlayerZoneCount>,
    /// Mean events per team, keyed by `(zone, action)`.
    pub league_zones: BTreeMap<(Zone, String), f64>,
    pub events: Vec<PitchEvent>,
    /// Filled by [`DashboardData::indexed`], ordered by name then id.
    pub team_list: Vec<TeamRef>,
    pub actions: Vec<String>,
}

fn to_u32(v: Option<i64>) -> u32 {
    v.and_then(|n| u32::try_from(n).ok()).unwrap_or(0)
}

fn read(dir: &Path, name: &str) -> Result<Table, DataError> {
    snapshot::read_parquet(&dir.join(name))
}

fn score_rows(table: &Table) -> Result<Vec<ScoreRow>, DataError> {
    let award_id = table.texts("award_id")?;
    let entity_id = table.ints("entity_id")?;
    let entity_name = table.texts("entity_name")?;
    let team_id = table.ints("team_id")?;
    let team_name = table.texts("team_name")?;
    let score = table.floats("score")?;
    let rank = table.ints("rank")?;
    let percentile = table.floats("percentile")?;
    let sample = table.ints("sample_size")?;
    Ok((0..table.num_rows())
        .map(|i| ScoreRow {
            award_id: award_id[i].clone(),
            entity_id: to_u32(entity_id[i]),
            entity_name: entity_name[i].clone(),
            team_id: to_u32(team_id[i]),
            team_name: team_name[i].clone(),
            score: score[i].unwrap_or(f64::NAN),
            rank: to_u32(rank[i]),
            percentile: percentile[i].unwrap_or(0.0),
            sample_size: sample[i].and_then(|n| u32::try_from(n).ok()),
        })
        .collect())
}

fn entity_rows(table: &Table, level: Level) -> Result<Vec<EntityRow>, DataError> {
    let (id_col, name_col, metrics): (&str, &str, &[Metric]) = match level {
        Level::Player => ("player_id", "player_name", &Metric::PLAYER),
        Level::Team => ("team_id", "team_name", &Metric::TEAM),
    };
    let ids = table.ints(id_col)?;
    let names = table.texts(name_col)?;
    let team_ids = table.ints("team_id")?;
    let teams = table.texts("team_name")?;
    let games = table.ints("games")?;
    let columns = metrics
        .iter()
        .map(|m| table.floats(m.name()).map(|c| (*m, c)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((0..table.num_rows())
        .map(|i| EntityRow {
            id: to_u32(ids[i]),
            name: names[i].clone(),
            team_id: to_u32(team_ids[i]),
            team_name: teams[i].clone(),
            games: to_u32(games[i]),
            metrics: columns
                .iter()
                .filter_map(|(m, c)| c[i].map(|v| (*m, v)))
                .collect(),
        })
        .collect())
}

fn home_away(table: &Table) -> Result<BTreeMap<u32, HomeAway>, DataError> {
    let team = table.ints("team_id")?;
    let home = table.ints("home_games")?;
    let away = table.ints("away_games")?;
    Ok((0..table.num_rows())
        .map(|i| {
            (
                to_u32(team[i]),
                HomeAway {
                    home: to_u32(home[i]),
                    away: to_u32(away[i]),
                },
            )
        })
        .collect())
}

fn team_actions(table: &Table) -> Result<Vec<TeamActionRow>, DataError> {
    let team = table.ints("team_id")?;
    let action = table.texts("type_name")?;
    let total = table.ints("total")?;
    let fails = table.ints("fails")?;
    let per_game = table.floats("per_game")?;
    Ok((0..table.num_rows())
        .map(|i| TeamActionRow {
            team_id: to_u32(team[i]),
            action: action[i].clone(),
            total: to_u32(total[i]),
            fails: to_u32(fails[i]),
            per_game: per_game[i].unwrap_or(0.0),
        })
        .collect())
}

fn zone_counts(table: &Table) -> Result<Vec<ZoneCount>, DataError> {
    let team_id = table.ints("team_id")?;
    let team = table.texts("team_name")?;
    let zone = table.texts("zone")?;
    let action = table.texts("type_name")?;
    let count = table.ints("event_count")?;
    let rate = table.floats("success_rate")?;
    Ok((0..table.num_rows())
        .filter_map(|i| {
            Some(ZoneCount {
                team_id: to_u32(team_id[i]),
                team_name: team[i].clone(),
                zone: Zone::parse(&zone[i])?,
                action: action[i].clone(),
                event_count: to_u32(count[i]),
                success_rate: rate[i].unwrap_or(0.0),
            })
        })
        .collect())
}

fn player_zone_counts(table: &Table) -> Result<Vec<PlayerZoneCount>, DataError> {
    let player = table.ints("player_id")?;
    let team = table.ints("team_id")?;
    let zone = table.texts("zone")?;
    let action = table.texts("type_name")?;
    let count = table.ints("event_count")?;
    let fails = table.ints("fail_count")?;
    Ok((0..table.num_rows())
        .filter_map(|i| {
            Some(PlayerZoneCount {
                player_id: to_u32(player[i]),
                team_id: to_u32(team[i]),
                zone: Zone::parse(&zone[i])?,
                action: action[i].clone(),
                event_count: to_u32(count[i]),
                fail_count: to_u32(fails[i]),
            })
        })
        .collect())
}

fn league_zones(table: &Table) -> Result<BTreeMap<(Zone, String), f64>, DataError> {
    let zone = table.texts("zone")?;
    let action = table.texts("type_name")?;
    let avg = table.floats("avg_events_per_team")?;
    Ok((0..table.num_rows())
        .filter_map(|i| Some(((Zone::parse(&zone[i])?, action[i].clone()), avg[i]?)))
        .collect())
}

fn pitch_events(table: &Table) -> Result<Vec<PitchEvent>, DataError> {
    let player = table.ints("player_id")?;
    let player_name = table.texts("player_name")?;
    let team_id = table.ints("team_id")?;
    let team = table.texts("team_name")?;
    let action = table.texts("type_name")?;
    let x = table.floats("start_x")?;
    let y = table.floats("start_y")?;
    let success = table.ints("is_success")?;
    Ok((0..table.num_rows())
        .filter_map(|i| {
            Some(PitchEvent {
                player_id: player[i].and_then(|n| u32::try_from(n).ok()),
                player_name: player_name[i].clone(),
                team_id: to_u32(team_id[i]),
                team_name: team[i].clone(),
                action: action[i].clone(),
                start: PitchPoint::new(x[i]?, y[i]?),
                success: success[i] == Some(1),
            })
        })
        .collect())
}

fn zone_index(zone: Zone) -> (usize, usize) {
    let xi = ZoneX::ALL.iter().position(|x| *x == zone.x).unwrap_or(0);
    let yi = ZoneY::ALL.iter().position(|y| *y == zone.y).unwrap_or(0);
    (xi, yi)
}

impl DashboardData {
    pub fn load(dir: &Path) -> Result<Self, DataError> {
        let data = Self {
            scores: score_rows(&read(dir, tables::AWARD_SCORES)?)?,
            teams: entity_rows(&read(dir, tables::AWARDS_TEAM)?, Level::Team)?,
            players: entity_rows(&read(dir, tables::AWARDS_PLAYER)?, Level::Player)?,
            home_away: home_away(&read(dir, tables::TEAM_GAMES)?)?,
            team_actions: team_actions(&read(dir, tables::TEAM_ACTION_PER_GAME)?)?,
            team_zones: zone_counts(&read(dir, tables::TEAM_ZONE_PROFILE)?)?,
            player_zones: player_zone_counts(&read(dir, tables::PLAYER_ZONE_ACTIVITY)?)?,
            league_zones: league_zones(&read(dir, tables::LEAGUE_ZONE_AVERAGE)?)?,
            events: pitch_events(&read(dir, tables::EVENTS_LIGHT)?)?,
            ..Self::default()
        }
        .indexed();
        info!(
            "dashboard loaded {} scores, {} teams, {} players, {} pitch events",
            data.scores.len(),
            data.teams.len(),
            data.players.len(),
            data.events.len()
        );
        Ok(data)
    }

    /// Fills the team and action pick lists from the zone and event rows.
    pub fn indexed(mut self) -> Self {
        let mut teams: BTreeMap<u32, &str> = BTreeMap::new();
        for (id, name) in self
            .team_zones
            .iter()
            .map(|z| (z.team_id, z.team_name.as_str()))
            .chain(self.events.iter().map(|e| (e.team_id, e.team_name.as_str())))
        {
            teams.entry(id).or_insert(name);
        }
        let mut team_list: Vec<TeamRef> = teams
            .into_iter()
            .map(|(id, name)| TeamRef {
                id,
                name: name.to_string(),
            })
            .collect();
        team_list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let mut actions: Vec<String> = self
            .team_zones
            .iter()
            .map(|z| z.action.clone())
            .chain(self.events.iter().map(|e| e.action.clone()))
            .collect();
        actions.sort();
        actions.dedup();

        self.team_list = team_list;
        self.actions = actions;
        self
    }

    /// Ranked entries of one award, best first.
    pub fn award_rows(&self, award_id: &str) -> Vec<&ScoreRow> {
        let mut rows: Vec<&ScoreRow> = self.scores.iter().filter(|s| s.award_id == award_id).collect();
        rows.sort_by_key(|s| s.rank);
        rows
    }

    /// Zone grid for one team and action: `(count, league average)` per cell,
    /// indexed `[x][y]`.
    pub fn heatmap(&self, team_id: u32, action: &str) -> [[(u32, f64); 3]; 4] {
        let mut grid = [[(0u32, 0.0f64); 3]; 4];
        for (xi, x) in ZoneX::ALL.into_iter().enumerate() {
            for (yi, y) in ZoneY::ALL.into_iter().enumerate() {
                let zone = Zone { x, y };
                let avg = self
                    .league_zones
                    .get(&(zone, action.to_string()))
                    .copied()
                    .unwrap_or(0.0);
                grid[xi][yi].1 = avg;
            }
        }
        for z in self
            .team_zones
            .iter()
            .filter(|z| z.team_id == team_id && z.action == action)
        {
            let (xi, yi) = zone_index(z.zone);
            grid[xi][yi].0 += z.event_count;
        }
        grid
    }

    /// Start points split into `(successful, other)`.
    pub fn pitch_points(&self, team_id: u32, action: &str) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
        self.events
            .iter()
            .filter(|e| e.team_id == team_id && e.action == action)
            .fold((Vec::new(), Vec::new()), |(mut ok, mut other), e| {
                let p = (e.start.x, e.start.y);
                if e.success {
                    ok.push(p);
                } else {
                    other.push(p);
                }
                (ok, other)
            })
    }

    /// Every award this player is ranked in, in catalog order.
    pub fn player_profile(&self, player: &EntityRow) -> Vec<&ScoreRow> {
        let order: HashMap<&str, usize> = AWARDS.iter().enumerate().map(|(i, a)| (a.id, i)).collect();
        let mut rows: Vec<&ScoreRow> = self.scores.iter().filter(|s| s.is_player(player)).collect();
        rows.sort_by_key(|s| order.get(s.award_id.as_str()).copied().unwrap_or(usize::MAX));
        rows
    }

    /// Player awards where at least one side is ranked, widest percentile
    /// gap first.
    pub fn compare_players(&self, left: &EntityRow, right: &EntityRow) -> Vec<ComparisonRow<'_>> {
        let find = |p: &EntityRow, id: &str| {
            self.scores
                .iter()
                .find(|s| s.award_id == id && s.is_player(p))
        };
        let mut rows: Vec<ComparisonRow<'_>> = awards::for_level(Level::Player)
            .map(|award| ComparisonRow {
                award,
                left: find(left, award.id),
                right: find(right, award.id),
            })
            .filter(|row| row.left.is_some() || row.right.is_some())
            .collect();
        rows.sort_by(|a, b| b.diff().abs().total_cmp(&a.diff().abs()));
        rows
    }

    /// One player's zone grid for one action: `(events, fails)` per cell.
    pub fn player_heatmap(&self, player: &EntityRow, action: &str) -> [[(u32, u32); 3]; 4] {
        let mut grid = [[(0u32, 0u32); 3]; 4];
        for z in self.player_zones_of(player, action) {
            let (xi, yi) = zone_index(z.zone);
            grid[xi][yi].0 += z.event_count;
            grid[xi][yi].1 += z.fail_count;
        }
        grid
    }

    /// The player's busiest zones for one action, at most `n`.
    pub fn top_zones(&self, player: &EntityRow, action: &str, n: usize) -> Vec<(Zone, u32)> {
        let mut zones: Vec<(Zone, u32)> = self
            .player_zones_of(player, action)
            .map(|z| (z.zone, z.event_count))
            .collect();
        zones.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        zones.truncate(n);
        zones
    }

    fn player_zones_of<'a>(
        &'a self,
        player: &'a EntityRow,
        action: &'a str,
    ) -> impl Iterator<Item = &'a PlayerZoneCount> + 'a {
        self.player_zones.iter().filter(move |z| {
            z.player_id == player.id && z.team_id == player.team_id && z.action == action
        })
    }

    /// One team's action rows, most frequent per game first.
    pub fn team_action_rows(&self, team_id: u32) -> Vec<&TeamActionRow> {
        let mut rows: Vec<&TeamActionRow> = self
            .team_actions
            .iter()
            .filter(|r| r.team_id == team_id)
            .collect();
        rows.sort_by(|a, b| b.per_game.total_cmp(&a.per_game).then(a.action.cmp(&b.action)));
        rows
    }

    /// Event start points of each entry ranked `<= top_n` in one award.
    pub fn winner_trails(&self, award: &Award, top_n: u32) -> Vec<WinnerTrail> {
        self.award_rows(award.id)
            .into_iter()
            .filter(|s| s.rank <= top_n)
            .map(|s| {
                let points = self
                    .events
                    .iter()
                    .filter(|e| match award.level {
                        Level::Player => e.player_id == Some(s.entity_id) && e.team_id == s.team_id,
                        Level::Team => e.team_id == s.entity_id,
                    })
                    .map(|e| (e.start.x, e.start.y))
                    .collect();
                WinnerTrail {
                    name: s.entity_name.clone(),
                    rank: s.rank,
                    points,
                }
            })
            .collect()
    }
}

/// Cursor and selection state, independent of any terminal.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub screen: Screen,
    pub award_idx: usize,
    pub selected: usize,
    pub player_metric_idx: usize,
    pub team_idx: usize,
    pub action_idx: usize,
    pub help_overlay: bool,
    /// Players screen shows the selected player's profile.
    pub player_detail: bool,
    /// `(player_id, team_id)` held for comparison.
    pub pinned: Option<(u32, u32)>,
    pub pitch_mode: PitchMode,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            screen: Screen::Awards,
            award_idx: 0,
            selected: 0,
            player_metric_idx: 0,
            team_idx: 0,
            action_idx: 0,
            help_overlay: false,
            player_detail: false,
            pinned: None,
            pitch_mode: PitchMode::Team,
        }
    }
}

fn step(idx: usize, total: usize, forward: bool) -> usize {
    if total == 0 {
        return 0;
    }
    if forward {
        (idx + 1) % total
    } else {
        (idx + total - 1) % total
    }
}

impl DashboardState {
    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.selected = 0;
        }
    }

    pub fn current_award(&self) -> &'static Award {
        &AWARDS[self.award_idx % AWARDS.len()]
    }

    pub fn player_metric(&self) -> Metric {
        Metric::PLAYER[self.player_metric_idx % Metric::PLAYER.len()]
    }

    /// `h`/`l` style cycling; what cycles depends on the screen.
    pub fn cycle(&mut self, data: &DashboardData, forward: bool) {
        match self.screen {
            Screen::Awards => {
                self.award_idx = step(self.award_idx, AWARDS.len(), forward);
                self.selected = 0;
            }
            Screen::Players => {
                self.player_metric_idx = step(self.player_metric_idx, Metric::PLAYER.len(), forward);
                self.selected = 0;
            }
            Screen::Pitch if self.pitch_mode == PitchMode::Winners => {
                self.award_idx = step(self.award_idx, AWARDS.len(), forward);
            }
            Screen::Patterns | Screen::Pitch => {
                self.team_idx = step(self.team_idx, data.team_list.len(), forward);
            }
            Screen::Teams => {}
        }
    }

    pub fn cycle_action(&mut self, data: &DashboardData) {
        self.action_idx = step(self.action_idx, data.actions.len(), true);
    }

    pub fn toggle_pitch_mode(&mut self) {
        self.pitch_mode = match self.pitch_mode {
            PitchMode::Team => PitchMode::Winners,
            PitchMode::Winners => PitchMode::Team,
        };
    }

    pub fn toggle_player_detail(&mut self) {
        self.player_detail = !self.player_detail;
    }

    /// Holds the selected player for comparison, or lets go of it when it
    /// is already held.
    pub fn toggle_pin(&mut self, data: &DashboardData) {
        let Some(p) = self.selected_player(data) else {
            return;
        };
        let key = (p.id, p.team_id);
        self.pinned = if self.pinned == Some(key) { None } else { Some(key) };
    }

    pub fn select_next(&mut self, data: &DashboardData) {
        self.selected = step(self.selected, self.row_count(data), true);
    }

    pub fn select_prev(&mut self, data: &DashboardData) {
        self.selected = step(self.selected, self.row_count(data), false);
    }

    fn row_count(&self, data: &DashboardData) -> usize {
        match self.screen {
            Screen::Awards => data.award_rows(self.current_award().id).len(),
            Screen::Teams => data.teams.len(),
            Screen::Players => data.players.len(),
            Screen::Patterns | Screen::Pitch => 0,
        }
    }

    pub fn team<'a>(&self, data: &'a DashboardData) -> Option<&'a TeamRef> {
        data.team_list.get(self.team_idx)
    }

    pub fn action<'a>(&self, data: &'a DashboardData) -> Option<&'a str> {
        data.actions.get(self.action_idx).map(String::as_str)
    }

    pub fn selected_team<'a>(&self, data: &'a DashboardData) -> Option<&'a EntityRow> {
        data.teams.get(self.selected)
    }

    /// Players ordered by the selected metric, largest first; players
    /// without a value go last.
    pub fn sorted_players<'a>(&self, data: &'a DashboardData) -> Vec<&'a EntityRow> {
        let metric = self.player_metric();
        let mut rows: Vec<&EntityRow> = data.players.iter().collect();
        rows.sort_by(|a, b| match (a.metrics.get(&metric), b.metrics.get(&metric)) {
            (Some(x), Some(y)) => y.total_cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        rows
    }

    pub fn selected_player<'a>(&self, data: &'a DashboardData) -> Option<&'a EntityRow> {
        self.sorted_players(data).get(self.selected).copied()
    }

    pub fn pinned_player<'a>(&self, data: &'a DashboardData) -> Option<&'a EntityRow> {
        let (id, team_id) = self.pinned?;
        data.players.iter().find(|p| p.id == id && p.team_id == team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: u32, metric: Option<f64>) -> EntityRow {
        EntityRow {
            id,
            name: format!("P{id}"),
            team_id: 10,
            team_name: "T".to_string(),
            games: 1,
            metrics: metric
                .map(|v| (Metric::TackleFailRate, v))
                .into_iter()
                .collect(),
        }
    }

    fn zone(label: &str) -> Zone {
        Zone::parse(label).unwrap()
    }

    fn score(award_id: &str, entity_id: u32, team_id: u32, rank: u32, percentile: f64) -> ScoreRow {
        ScoreRow {
            award_id: award_id.to_string(),
            entity_id,
            entity_name: format!("P{entity_id}"),
            team_id,
            team_name: "T".to_string(),
            score: percentile / 100.0,
            rank,
            percentile,
            sample_size: Some(9),
        }
    }

    fn event(team_id: u32, team: &str, player: Option<u32>, action: &str, x: f64, success: bool) -> PitchEvent {
        PitchEvent {
            player_id: player,
            player_name: player.map(|p| format!("P{p}")).unwrap_or_default(),
            team_id,
            team_name: team.to_string(),
            action: action.to_string(),
            start: PitchPoint::new(x, 30.0),
            success,
        }
    }

    fn zone_count(team_id: u32, team: &str, label: &str, action: &str, n: u32) -> ZoneCount {
        ZoneCount {
            team_id,
            team_name: team.to_string(),
            zone: zone(label),
            action: action.to_string(),
            event_count: n,
            success_rate: 0.25,
        }
    }

    fn sample() -> DashboardData {
        DashboardData {
            scores: vec![
                score("tackle_fail", 2, 10, 2, 50.0),
                score("tackle_fail", 1, 10, 1, 100.0),
            ],
            players: vec![entity(1, Some(0.2)), entity(2, None), entity(3, Some(0.7))],
            team_zones: vec![zone_count(1, "Alpha", "A-C", "Shot", 4)],
            league_zones: [((zone("A-C"), "Shot".to_string()), 3.0)].into_iter().collect(),
            events: vec![
                event(1, "Alpha", Some(1), "Shot", 95.0, true),
                event(2, "Beta", Some(7), "Pass", 20.0, false),
            ],
            ..DashboardData::default()
        }
        .indexed()
    }

    #[test]
    fn award_rows_come_back_in_rank_order() {
        let data = sample();
        let ids: Vec<u32> = data.award_rows("tackle_fail").iter().map(|r| r.entity_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn score_rows_map_back_to_catalog_awards() {
        let data = sample();
        let score = data.scores[1].award_score().unwrap();
        assert_eq!(score.award_id, "tackle_fail");
        assert_eq!(score.level, Level::Player);
        assert_eq!(score.rank, 1);
        assert_eq!(score.team_id, 10);

        let mut unknown = data.scores[0].clone();
        unknown.award_id = "retired".to_string();
        assert!(unknown.award_score().is_none());
    }

    #[test]
    fn heatmap_fills_counts_and_league_average() {
        let data = sample();
        let grid = data.heatmap(1, "Shot");
        assert_eq!(grid[3][1], (4, 3.0));
        assert_eq!(grid[0][0], (0, 0.0));
        let names: Vec<&str> = data.team_list.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(data.actions, vec!["Pass", "Shot"]);
    }

    #[test]
    fn teams_sharing_a_name_stay_apart() {
        let data = DashboardData {
            team_zones: vec![
                zone_count(5, "United", "A-C", "Shot", 2),
                zone_count(6, "United", "A-C", "Shot", 7),
            ],
            events: vec![
                event(5, "United", Some(1), "Shot", 95.0, true),
                event(6, "United", Some(2), "Shot", 96.0, false),
                event(6, "United", Some(2), "Shot", 97.0, true),
            ],
            ..DashboardData::default()
        }
        .indexed();

        let ids: Vec<u32> = data.team_list.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 6]);
        assert_eq!(data.heatmap(5, "Shot")[3][1].0, 2);
        assert_eq!(data.heatmap(6, "Shot")[3][1].0, 7);

        let (ok, other) = data.pitch_points(6, "Shot");
        assert_eq!(ok, vec![(97.0, 30.0)]);
        assert_eq!(other, vec![(96.0, 30.0)]);
        assert_eq!(data.pitch_points(5, "Shot").0.len(), 1);
    }

    #[test]
    fn pitch_points_split_by_success() {
        let data = sample();
        let (ok, other) = data.pitch_points(1, "Shot");
        assert_eq!(ok, vec![(95.0, 30.0)]);
        assert!(other.is_empty());
    }

    #[test]
    fn profile_lists_only_this_players_awards_in_catalog_order() {
        let mut data = sample();
        data.scores.push(score("aerial_fail", 1, 10, 3, 40.0));
        data.scores.push(score("card_per_def", 1, 10, 1, 100.0));
        // Same id on another team is a different player.
        data.scores.push(score("duel_fail", 1, 99, 1, 100.0));
        // Team award for a team whose id happens to match.
        data.scores.push(score("team_cards", 1, 1, 1, 100.0));

        let kim = entity(1, None);
        let ids: Vec<&str> = data
            .player_profile(&kim)
            .iter()
            .map(|s| s.award_id.as_str())
            .collect();
        assert_eq!(ids, vec!["tackle_fail", "card_per_def", "aerial_fail"]);
    }

    #[test]
    fn comparison_puts_the_widest_gap_first() {
        let mut data = sample();
        data.scores.push(score("card_per_def", 1, 10, 2, 60.0));
        data.scores.push(score("card_per_def", 2, 10, 1, 100.0));
        data.scores.push(score("aerial_fail", 2, 10, 1, 100.0));

        let rows = data.compare_players(&entity(1, None), &entity(2, None));
        let ids: Vec<&str> = rows.iter().map(|r| r.award.id).collect();
        assert_eq!(ids, vec!["aerial_fail", "tackle_fail", "card_per_def"]);
        assert_eq!(rows[0].diff(), -100.0);
        assert!(rows[0].left.is_none());
        assert_eq!(rows[1].diff(), 50.0);
        assert_eq!(rows[2].diff(), -40.0);
    }

    #[test]
    fn player_zones_fill_grid_and_top_list() {
        let row = |label: &str, action: &str, n: u32, fails: u32| PlayerZoneCount {
            player_id: 1,
            team_id: 10,
            zone: zone(label),
            action: action.to_string(),
            event_count: n,
            fail_count: fails,
        };
        let mut data = sample();
        data.player_zones = vec![
            row("D-L", "Tackle", 2, 1),
            row("DM-C", "Tackle", 5, 3),
            row("A-R", "Tackle", 1, 0),
            row("A-R", "Pass", 9, 0),
            PlayerZoneCount {
                team_id: 11,
                ..row("D-C", "Tackle", 8, 8)
            },
        ];
        let kim = entity(1, None);

        let grid = data.player_heatmap(&kim, "Tackle");
        assert_eq!(grid[0][0], (2, 1));
        assert_eq!(grid[1][1], (5, 3));
        assert_eq!(grid[0][1], (0, 0));

        let top = data.top_zones(&kim, "Tackle", 2);
        assert_eq!(top, vec![(zone("DM-C"), 5), (zone("D-L"), 2)]);
    }

    #[test]
    fn team_action_rows_sort_by_rate() {
        let row = |team_id: u32, action: &str, per_game: f64| TeamActionRow {
            team_id,
            action: action.to_string(),
            total: 1,
            fails: 0,
            per_game,
        };
        let data = DashboardData {
            team_actions: vec![row(1, "Foul", 2.5), row(1, "Pass", 40.0), row(2, "Shot", 9.0)],
            ..DashboardData::default()
        };
        let actions: Vec<&str> = data.team_action_rows(1).iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, vec!["Pass", "Foul"]);
        assert!(data.team_action_rows(3).is_empty());
    }

    #[test]
    fn winner_trails_follow_ranked_players() {
        let mut data = sample();
        data.events.push(event(10, "T", Some(1), "Tackle", 30.0, false));
        data.events.push(event(10, "T", Some(2), "Tackle", 40.0, true));
        data.events.push(event(11, "U", Some(1), "Tackle", 50.0, true));
        let award = awards::find("tackle_fail").unwrap();

        let trails = data.winner_trails(award, 1);
        assert_eq!(trails.len(), 1);
        assert_eq!(trails[0].name, "P1");
        assert_eq!(trails[0].points, vec![(30.0, 30.0)]);
        assert_eq!(data.winner_trails(award, 3).len(), 2);
    }

    #[test]
    fn navigation_wraps_and_resets_selection() {
        let data = sample();
        let mut state = DashboardState::default();
        state.select_next(&data);
        state.select_next(&data);
        assert_eq!(state.selected, 0);
        state.select_prev(&data);
        assert_eq!(state.selected, 1);

        state.cycle(&data, false);
        assert_eq!(state.award_idx, AWARDS.len() - 1);
        assert_eq!(state.selected, 0);

        state.set_screen(Screen::Pitch);
        state.cycle(&data, true);
        assert_eq!(state.team(&data).map(|t| t.id), Some(2));
        state.cycle_action(&data);
        assert_eq!(state.action(&data), Some("Shot"));

        state.toggle_pitch_mode();
        state.cycle(&data, true);
        assert_eq!(state.award_idx, 0);
        assert_eq!(state.team(&data).map(|t| t.id), Some(2));
    }

    #[test]
    fn players_sort_by_metric_with_missing_last() {
        let data = sample();
        let state = DashboardState::default();
        let ids: Vec<u32> = state.sorted_players(&data).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn pin_follows_the_sorted_selection() {
        let data = sample();
        let mut state = DashboardState::default();
        state.set_screen(Screen::Players);
        state.select_next(&data);
        assert_eq!(state.selected_player(&data).map(|p| p.id), Some(1));

        state.toggle_pin(&data);
        assert_eq!(state.pinned, Some((1, 10)));
        assert_eq!(state.pinned_player(&data).map(|p| p.id), Some(1));
        state.toggle_pin(&data);
        assert_eq!(state.pinned, None);

        state.toggle_player_detail();
        assert!(state.player_detail);
    }
}
