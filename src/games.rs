use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::{Event, Match};

/// Games played by one team, split by venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamGameCount {
    pub team_id: u32,
    pub team_name: String,
    pub home: u32,
    pub away: u32,
}

impl TeamGameCount {
    pub fn total(&self) -> u32 {
        self.home + self.away
    }
}

/// Per-team game counts from the match table, ordered by team id.
pub fn team_game_counts(matches: &[Match]) -> BTreeMap<u32, TeamGameCount> {
    let mut out: BTreeMap<u32, TeamGameCount> = BTreeMap::new();
    for m in matches {
        out.entry(m.home_team_id)
            .or_insert_with(|| TeamGameCount {
                team_id: m.home_team_id,
                team_name: m.home_team_name.clone(),
                home: 0,
                away: 0,
            })
            .home += 1;
        out.entry(m.away_team_id)
            .or_insert_with(|| TeamGameCount {
                team_id: m.away_team_id,
                team_name: m.away_team_name.clone(),
                home: 0,
                away: 0,
            })
            .away += 1;
    }
    out
}

/// Distinct games each player appears in, keyed by `(player_id, team_id)`.
pub fn player_game_counts(events: &[Event]) -> HashMap<(u32, u32), u32> {
    let mut games: HashMap<(u32, u32), BTreeSet<u64>> = HashMap::new();
    for e in events {
        let Some(player_id) = e.player_id else {
            continue;
        };
        games
            .entry((player_id, e.team_id))
            .or_default()
            .insert(e.game_id);
    }
    games
        .into_iter()
        .map(|(key, set)| (key, set.len() as u32))
        .collect()
}

/// Divides by a game count, rounding to one decimal. `None` when there are no games.
pub fn per_game(total: u32, games: u32) -> Option<f64> {
    if games == 0 {
        return None;
    }
    Some(round1(total as f64 / games as f64))
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
