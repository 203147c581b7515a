//! Groups events by player and team and turns counts into rates.

pub mod special;

use std::collections::{BTreeMap, HashMap};

use tracing::{info, warn};

use crate::games::{self, TeamGameCount};
use crate::metrics::{Metric, MetricSource, ratio};
use crate::model::{ActionType, Event, Outcome};
use crate::pitch;

/// A player is tracked per team, so a mid-season transfer yields two rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerKey {
    pub player_id: u32,
    pub team_id: u32,
}

impl PlayerKey {
    pub fn of(e: &Event) -> Option<PlayerKey> {
        Some(PlayerKey {
            player_id: e.player_id?,
            team_id: e.team_id,
        })
    }
}

/// Season counters for one player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub player_id: u32,
    pub team_id: u32,
    pub player_name: String,
    pub team_name: String,
    pub games: u32,

    pub tackle_attempt: u32,
    pub tackle_fail: u32,
    pub duel_attempt: u32,
    pub duel_fail: u32,
    pub foul_count: u32,
    pub danger_foul_count: u32,
    pub clearance_attempt: u32,
    pub block_attempt: u32,
    pub block_fail: u32,
    pub interception_attempt: u32,
    pub interception_fail: u32,
    pub card_count: u32,
    pub def_actions: u32,

    pub concede_shot10: u32,
    pub first_half_fail_rate: Option<f64>,
    pub second_half_fail_rate: Option<f64>,
    pub def_third_attempts: u32,
    pub def_third_fails: u32,

    pub total_shots: u32,
    pub off_target_shots: u32,
    pub penalty_box_shots: u32,
    pub penalty_box_miss: u32,
    pub offsides: u32,
    pub pass_received: u32,
    pub pass_given: u32,
    pub total_crosses: u32,
    pub cross_fail: u32,
    /// Lost duels, read as lost aerial contests.
    pub aerial_fail: u32,
}

impl PlayerStats {
    fn new(key: PlayerKey, e: &Event) -> Self {
        Self {
            player_id: key.player_id,
            team_id: key.team_id,
            player_name: e.player_name.clone(),
            team_name: e.team_name.clone(),
            ..Self::default()
        }
    }

    fn count(&mut self, e: &Event) {
        let fail = e.is_fail();
        let bump = |n: &mut u32, yes: bool| {
            if yes {
                *n += 1;
            }
        };

        match e.action {
            ActionType::Tackle => {
                self.tackle_attempt += 1;
                bump(&mut self.tackle_fail, fail);
            }
            ActionType::Duel => {
                self.duel_attempt += 1;
                bump(&mut self.duel_fail, fail);
                bump(&mut self.aerial_fail, fail);
            }
            ActionType::Block => {
                self.block_attempt += 1;
                bump(&mut self.block_fail, fail);
            }
            ActionType::Interception => {
                self.interception_attempt += 1;
                bump(&mut self.interception_fail, fail);
            }
            ActionType::Offside => self.offsides += 1,
            ActionType::PassReceived => self.pass_received += 1,
            ActionType::Pass => self.pass_given += 1,
            ActionType::Cross => {
                self.total_crosses += 1;
                bump(&mut self.cross_fail, e.outcome != Outcome::Successful);
            }
            _ => {}
        }

        if e.action.is_foul() {
            self.foul_count += 1;
            bump(&mut self.danger_foul_count, e.in_def_third());
        }
        if e.action.is_clearance() {
            self.clearance_attempt += 1;
        }
        if e.action.is_shot() {
            self.total_shots += 1;
            bump(&mut self.off_target_shots, e.outcome == Outcome::OffTarget);
            if pitch::in_attacking_penalty_box(e.start) {
                self.penalty_box_shots += 1;
                bump(
                    &mut self.penalty_box_miss,
                    !matches!(e.outcome, Outcome::Goal | Outcome::OnTarget),
                );
            }
        }
        if e.action.is_defensive() {
            self.def_actions += 1;
        }
        if e.is_card() {
            self.card_count += 1;
        }
    }

    fn per_game(&self, total: u32) -> Option<f64> {
        games::per_game(total, self.games)
    }
}

impl MetricSource for PlayerStats {
    fn entity_id(&self) -> u32 {
        self.player_id
    }

    fn entity_name(&self) -> &str {
        &self.player_name
    }

    fn team_id(&self) -> u32 {
        self.team_id
    }

    fn team_name(&self) -> &str {
        &self.team_name
    }

    fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TackleFailRate => ratio(self.tackle_fail, self.tackle_attempt),
            Metric::CardPerDef => ratio(self.card_count, self.def_actions),
            Metric::DangerFoulRatio => ratio(self.danger_foul_count, self.foul_count),
            Metric::BlockFailRate => ratio(self.block_fail, self.block_attempt),
            Metric::InterceptionFailRate => {
                ratio(self.interception_fail, self.interception_attempt)
            }
            Metric::DuelFailRate => ratio(self.duel_fail, self.duel_attempt),
            Metric::ClearancePanicRate => ratio(self.concede_shot10, self.clearance_attempt),
            Metric::DefThirdTurnoverRate => ratio(self.def_third_fails, self.def_third_attempts),
            Metric::SecondHalfDrop => {
                Some(self.second_half_fail_rate? - self.first_half_fail_rate?)
            }
            Metric::OffTargetPerGame => self.per_game(self.off_target_shots),
            Metric::PenaltyBoxMissPerGame => self.per_game(self.penalty_box_miss),
            Metric::OffsidePerGame => self.per_game(self.offsides),
            Metric::ReceiveToGiveRatio => ratio(self.pass_received, self.pass_given),
            Metric::CrossFailPerGame => self.per_game(self.cross_fail),
            Metric::DuelFailPerGameAttack => self.per_game(self.duel_fail),
            Metric::AerialFailPerGame => self.per_game(self.aerial_fail),
            _ => None,
        }
    }

    fn sample_size(&self, metric: Metric) -> Option<u32> {
        let n = match metric {
            Metric::TackleFailRate => self.tackle_attempt,
            Metric::CardPerDef | Metric::SecondHalfDrop => self.def_actions,
            Metric::DangerFoulRatio => self.foul_count,
            Metric::BlockFailRate => self.block_attempt,
            Metric::InterceptionFailRate => self.interception_attempt,
            Metric::DuelFailRate | Metric::DuelFailPerGameAttack => self.duel_attempt,
            Metric::ClearancePanicRate => self.clearance_attempt,
            Metric::DefThirdTurnoverRate => self.def_third_attempts,
            Metric::OffTargetPerGame => self.total_shots,
            Metric::PenaltyBoxMissPerGame => self.penalty_box_shots,
            Metric::OffsidePerGame => self.offsides,
            Metric::ReceiveToGiveRatio => self.pass_received,
            Metric::CrossFailPerGame => self.total_crosses,
            Metric::AerialFailPerGame => self.aerial_fail,
            _ => return None,
        };
        Some(n)
    }
}

/// Season counters for every player, ordered by `(player_id, team_id)`.
///
/// Expects `events` in match order.
pub fn aggregate_players(events: &[Event]) -> Vec<PlayerStats> {
    let mut stats: BTreeMap<PlayerKey, PlayerStats> = BTreeMap::new();
    for e in events {
        let Some(key) = PlayerKey::of(e) else {
            continue;
        };
        stats
            .entry(key)
            .or_insert_with(|| PlayerStats::new(key, e))
            .count(e);
    }

    let game_counts = games::player_game_counts(events);
    let panic = special::clearance_panic(events);
    let halves = special::half_fail_rates(events);
    let turnovers = special::def_third_turnover(events);

    for (key, row) in stats.iter_mut() {
        row.games = game_counts
            .get(&(key.player_id, key.team_id))
            .copied()
            .unwrap_or(0);
        if let Some(p) = panic.get(key) {
            row.concede_shot10 = p.conceded_shots;
        }
        if let Some(h) = halves.get(key) {
            row.first_half_fail_rate = h.first;
            row.second_half_fail_rate = h.second;
        }
        if let Some(t) = turnovers.get(key) {
            row.def_third_attempts = t.attempts;
            row.def_third_fails = t.fails;
        }
    }

    info!("aggregated stats for {} players", stats.len());
    stats.into_values().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionTally {
    pub total: u32,
    pub successes: u32,
    pub fails: u32,
}

impl ActionTally {
    fn add(&mut self, e: &Event) {
        self.total += 1;
        if e.is_success() {
            self.successes += 1;
        }
        if e.is_fail() {
            self.fails += 1;
        }
    }
}

/// Counts events per `(team_id, action type)`.
pub fn tally_by_team<'a>(
    events: impl IntoIterator<Item = &'a Event>,
) -> BTreeMap<(u32, ActionType), ActionTally> {
    let mut out: BTreeMap<(u32, ActionType), ActionTally> = BTreeMap::new();
    for e in events {
        out.entry((e.team_id, e.action.clone())).or_default().add(e);
    }
    out
}

/// Keeps only events whose action type is in `set`.
pub fn filter_actions<'a>(
    events: &'a [Event],
    set: &'a [ActionType],
) -> impl Iterator<Item = &'a Event> + 'a {
    events.iter().filter(move |e| set.contains(&e.action))
}

/// One team's totals for one action type, normalized by games played.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamActionRate {
    pub team_id: u32,
    pub team_name: String,
    pub action: ActionType,
    pub tally: ActionTally,
    pub games: u32,
    pub per_game: f64,
}

/// Season counters for one team.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStats {
    pub team_id: u32,
    pub team_name: String,
    pub games: u32,
    pub home_games: u32,
    pub away_games: u32,
    pub events: u32,
    pub foul_count: u32,
    pub danger_foul_count: u32,
    pub tackle_attempt: u32,
    pub tackle_fail: u32,
    pub total_shots: u32,
    pub off_target_shots: u32,
    pub def_third_attempts: u32,
    pub def_third_fails: u32,
    pub card_count: u32,
}

impl MetricSource for TeamStats {
    fn entity_id(&self) -> u32 {
        self.team_id
    }

    fn entity_name(&self) -> &str {
        &self.team_name
    }

    fn team_id(&self) -> u32 {
        self.team_id
    }

    fn team_name(&self) -> &str {
        &self.team_name
    }

    fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TeamDangerFoulPerGame => games::per_game(self.danger_foul_count, self.games),
            Metric::TeamTackleFailRate => ratio(self.tackle_fail, self.tackle_attempt),
            Metric::TeamOffTargetPerGame => games::per_game(self.off_target_shots, self.games),
            Metric::TeamDefThirdTurnoverRate => {
                ratio(self.def_third_fails, self.def_third_attempts)
            }
            Metric::TeamCardsPerGame => games::per_game(self.card_count, self.games),
            _ => None,
        }
    }

    fn sample_size(&self, metric: Metric) -> Option<u32> {
        let n = match metric {
            Metric::TeamDangerFoulPerGame | Metric::TeamCardsPerGame => self.games,
            Metric::TeamTackleFailRate => self.tackle_attempt,
            Metric::TeamOffTargetPerGame => self.total_shots,
            Metric::TeamDefThirdTurnoverRate => self.def_third_attempts,
            _ => return None,
        };
        Some(n)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamAggregate {
    pub teams: Vec<TeamStats>,
    pub action_rates: Vec<TeamActionRate>,
    /// Teams that appear in events but have no recorded games.
    pub excluded: Vec<u32>,
}

/// Team totals joined against game counts. Teams with zero games are left out.
pub fn aggregate_teams(
    events: &[Event],
    game_counts: &BTreeMap<u32, TeamGameCount>,
) -> TeamAggregate {
    let mut stats: BTreeMap<u32, TeamStats> = BTreeMap::new();
    let mut names: HashMap<u32, &str> = HashMap::new();

    for e in events {
        names.entry(e.team_id).or_insert(e.team_name.as_str());
        let row = stats.entry(e.team_id).or_insert_with(|| TeamStats {
            team_id: e.team_id,
            ..TeamStats::default()
        });
        row.events += 1;
        if e.action.is_foul() {
            row.foul_count += 1;
            if e.in_def_third() {
                row.danger_foul_count += 1;
            }
        }
        if e.action == ActionType::Tackle {
            row.tackle_attempt += 1;
            if e.is_fail() {
                row.tackle_fail += 1;
            }
        }
        if e.action.is_shot() {
            row.total_shots += 1;
            if e.outcome == Outcome::OffTarget {
                row.off_target_shots += 1;
            }
        }
        if matches!(e.action, ActionType::Pass | ActionType::Carry) && e.in_def_third() {
            row.def_third_attempts += 1;
            if e.is_fail() {
                row.def_third_fails += 1;
            }
        }
        if e.is_card() {
            row.card_count += 1;
        }
    }

    let mut out = TeamAggregate::default();
    for (team_id, mut row) in stats {
        let Some(count) = game_counts.get(&team_id).filter(|c| c.total() > 0) else {
            out.excluded.push(team_id);
            continue;
        };
        row.games = count.total();
        row.home_games = count.home;
        row.away_games = count.away;
        row.team_name = if count.team_name.is_empty() || count.team_name == team_id.to_string() {
            names
                .get(&team_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| count.team_name.clone())
        } else {
            count.team_name.clone()
        };
        out.teams.push(row);
    }

    let team_names: HashMap<u32, (String, u32)> = out
        .teams
        .iter()
        .map(|t| (t.team_id, (t.team_name.clone(), t.games)))
        .collect();
    for ((team_id, action), tally) in tally_by_team(events) {
        let Some((team_name, games)) = team_names.get(&team_id) else {
            continue;
        };
        let Some(per_game) = games::per_game(tally.total, *games) else {
            continue;
        };
        out.action_rates.push(TeamActionRate {
            team_id,
            team_name: team_name.clone(),
            action,
            tally,
            games: *games,
            per_game,
        });
    }

    if !out.excluded.is_empty() {
        warn!(
            "{} teams have events but no recorded games and were left out: {:?}",
            out.excluded.len(),
            out.excluded
        );
    }
    info!(
        "aggregated {} teams, {} team/action rows",
        out.teams.len(),
        out.action_rates.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Match;
    use crate::pitch::PitchPoint;

    fn ev(game: u64, t: f64, team: u32, player: Option<u32>, action: &str, outcome: &str) -> Event {
        Event {
            game_id: game,
            period_id: 1,
            time_seconds: t,
            action_id: 0,
            team_id: team,
            team_name: format!("T{team}"),
            player_id: player,
            player_name: player.map(|p| format!("P{p}")).unwrap_or_default(),
            action: ActionType::from_raw(action),
            outcome: Outcome::from_raw(outcome),
            start: PitchPoint::new(20.0, 30.0),
            end: PitchPoint::new(40.0, 30.0),
        }
    }

    fn at(mut e: Event, x: f64, y: f64) -> Event {
        e.start = PitchPoint::new(x, y);
        e
    }

    #[test]
    fn player_rates_use_their_own_denominators() {
        let events = vec![
            ev(1, 1.0, 1, Some(5), "Tackle", "Successful"),
            ev(1, 2.0, 1, Some(5), "Tackle", "Unsuccessful"),
            ev(1, 3.0, 1, Some(5), "Tackle", "Unsuccessful"),
            ev(1, 4.0, 1, Some(5), "Foul", "Yellow_Card"),
            at(ev(2, 5.0, 1, Some(5), "Foul", ""), 60.0, 30.0),
            ev(2, 6.0, 1, Some(5), "Pass", "Successful"),
            ev(2, 7.0, 1, None, "Tackle", "Unsuccessful"),
        ];
        let stats = aggregate_players(&events);
        assert_eq!(stats.len(), 1);
        let p = &stats[0];
        assert_eq!(p.games, 2);
        assert_eq!(p.metric(Metric::TackleFailRate), Some(2.0 / 3.0));
        assert_eq!(p.sample_size(Metric::TackleFailRate), Some(3));
        assert_eq!(p.metric(Metric::DangerFoulRatio), Some(0.5));
        assert_eq!(p.metric(Metric::CardPerDef), Some(0.2));
        assert_eq!(p.metric(Metric::BlockFailRate), None);
        assert_eq!(p.metric(Metric::ReceiveToGiveRatio), Some(0.0));
        assert_eq!(p.metric(Metric::TeamCardsPerGame), None);
    }

    #[test]
    fn attack_counters_and_per_game_rounding() {
        let events = vec![
            at(ev(1, 1.0, 2, Some(9), "Shot", "Off Target"), 95.0, 34.0),
            at(ev(1, 2.0, 2, Some(9), "Shot", "Goal"), 95.0, 34.0),
            at(ev(2, 3.0, 2, Some(9), "Shot_Freekick", "Blocked"), 90.0, 20.0),
            ev(2, 4.0, 2, Some(9), "Offside", ""),
            ev(3, 5.0, 2, Some(9), "Cross", "Unsuccessful"),
            ev(3, 6.0, 2, Some(9), "Cross", ""),
            ev(3, 7.0, 2, Some(9), "Pass Received", ""),
        ];
        let p = &aggregate_players(&events)[0];
        assert_eq!(p.games, 3);
        assert_eq!(p.total_shots, 3);
        assert_eq!(p.penalty_box_shots, 3);
        assert_eq!(p.penalty_box_miss, 2);
        assert_eq!(p.metric(Metric::OffTargetPerGame), Some(0.3));
        assert_eq!(p.metric(Metric::PenaltyBoxMissPerGame), Some(0.7));
        assert_eq!(p.metric(Metric::CrossFailPerGame), Some(0.7));
        assert_eq!(p.metric(Metric::ReceiveToGiveRatio), None);
    }

    #[test]
    fn lost_duels_count_as_aerial_fails() {
        let events = vec![
            ev(1, 1.0, 4, Some(3), "Duel", "Unsuccessful"),
            ev(1, 2.0, 4, Some(3), "Duel", "Unsuccessful"),
            ev(1, 3.0, 4, Some(3), "Duel", "Successful"),
            ev(1, 4.0, 4, Some(3), "Aerial Clearance", "Unsuccessful"),
        ];
        let p = &aggregate_players(&events)[0];
        assert_eq!(p.aerial_fail, 2);
        assert_eq!(p.metric(Metric::AerialFailPerGame), Some(2.0));
        assert_eq!(p.sample_size(Metric::AerialFailPerGame), Some(2));

        let award = crate::awards::find("aerial_fail").expect("catalog award");
        let scores = crate::scoring::score_award(award, &aggregate_players(&events));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 2.0);
    }

    #[test]
    fn a_player_is_split_by_team() {
        let events = vec![
            ev(1, 1.0, 1, Some(5), "Pass", "Successful"),
            ev(2, 1.0, 3, Some(5), "Pass", "Successful"),
        ];
        let stats = aggregate_players(&events);
        let keys: Vec<(u32, u32)> = stats.iter().map(|s| (s.player_id, s.team_id)).collect();
        assert_eq!(keys, vec![(5, 1), (5, 3)]);
        assert!(stats.iter().all(|s| s.games == 1));
    }

    #[test]
    fn filtered_tallies_do_not_leak_other_actions() {
        let events = vec![
            ev(1, 1.0, 1, Some(5), "Tackle", "Successful"),
            ev(1, 2.0, 1, Some(5), "Tackle", "Unsuccessful"),
            ev(1, 3.0, 1, Some(5), "Pass", "Successful"),
            ev(1, 4.0, 2, Some(7), "Block", "Successful"),
        ];
        let set = [ActionType::Tackle, ActionType::Block];
        let tally = tally_by_team(filter_actions(&events, &set));
        assert_eq!(tally.len(), 2);
        assert_eq!(
            tally[&(1, ActionType::Tackle)],
            ActionTally { total: 2, successes: 1, fails: 1 }
        );
        assert!(!tally.contains_key(&(1, ActionType::Pass)));
    }

    #[test]
    fn team_rates_divide_by_games_and_skip_teams_without_games() {
        let matches = vec![
            Match {
                game_id: 1,
                home_team_id: 1,
                away_team_id: 2,
                home_team_name: "Alpha".to_string(),
                away_team_name: "2".to_string(),
                home_score: 0,
                away_score: 0,
            },
            Match {
                game_id: 2,
                home_team_id: 2,
                away_team_id: 1,
                home_team_name: "2".to_string(),
                away_team_name: "Alpha".to_string(),
                home_score: 0,
                away_score: 0,
            },
            Match {
                game_id: 3,
                home_team_id: 1,
                away_team_id: 2,
                home_team_name: "Alpha".to_string(),
                away_team_name: "2".to_string(),
                home_score: 0,
                away_score: 0,
            },
        ];
        let counts = games::team_game_counts(&matches);
        let events = vec![
            ev(1, 1.0, 1, Some(5), "Foul", "Yellow_Card"),
            ev(2, 1.0, 1, Some(5), "Foul", ""),
            ev(2, 2.0, 1, Some(5), "Tackle", "Unsuccessful"),
            ev(1, 3.0, 2, Some(8), "Shot", "Off Target"),
            ev(1, 4.0, 9, Some(11), "Pass", "Successful"),
        ];
        let agg = aggregate_teams(&events, &counts);
        assert_eq!(agg.excluded, vec![9]);
        assert_eq!(agg.teams.len(), 2);

        let alpha = &agg.teams[0];
        assert_eq!(alpha.team_name, "Alpha");
        assert_eq!(alpha.games, 3);
        assert_eq!(alpha.home_games, 2);
        assert_eq!(alpha.metric(Metric::TeamDangerFoulPerGame), Some(0.7));
        assert_eq!(alpha.metric(Metric::TeamCardsPerGame), Some(0.3));
        assert_eq!(alpha.metric(Metric::TeamTackleFailRate), Some(1.0));

        let two = &agg.teams[1];
        assert_eq!(two.team_name, "T2");
        assert_eq!(two.metric(Metric::TeamOffTargetPerGame), Some(0.3));

        let fouls = agg
            .action_rates
            .iter()
            .find(|r| r.team_id == 1 && r.action == ActionType::Foul)
            .map(|r| r.per_game);
        assert_eq!(fouls, Some(0.7));
        assert!(agg.action_rates.iter().all(|r| r.team_id != 9));
    }
}
