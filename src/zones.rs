//! Where on the pitch teams and players act, over the key action types.

use std::collections::BTreeMap;

use tracing::info;

use crate::model::{ActionType, Event, ZONE_KEY_ACTIONS};
use crate::pitch::Zone;

/// A key-action event together with the zone it started in.
#[derive(Debug, Clone, Copy)]
pub struct ZonedEvent<'a> {
    pub event: &'a Event,
    pub zone: Zone,
}

/// Key actions that start on the pitch, in input order.
pub fn zoned_key_events(events: &[Event]) -> Vec<ZonedEvent<'_>> {
    let out: Vec<ZonedEvent<'_>> = events
        .iter()
        .filter(|e| ZONE_KEY_ACTIONS.contains(&e.action))
        .filter_map(|event| {
            Zone::of(event.start).map(|zone| ZonedEvent { event, zone })
        })
        .collect();
    info!("{} key events with a valid zone", out.len());
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counts {
    events: u32,
    successes: u32,
    fails: u32,
}

impl Counts {
    fn add(&mut self, e: &Event) {
        self.events += 1;
        if e.is_zone_success() {
            self.successes += 1;
        }
        if e.is_fail() {
            self.fails += 1;
        }
    }

    fn success_rate(&self) -> f64 {
        if self.events == 0 {
            return 0.0;
        }
        self.successes as f64 / self.events as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamZoneRow {
    pub team_id: u32,
    pub team_name: String,
    pub zone: Zone,
    pub action: ActionType,
    pub event_count: u32,
    pub success_count: u32,
    pub success_rate: f64,
}

pub fn team_zone_profile(zoned: &[ZonedEvent<'_>]) -> Vec<TeamZoneRow> {
    let mut groups: BTreeMap<(u32, Zone, ActionType), (Counts, &str)> = BTreeMap::new();
    for z in zoned {
        let e = z.event;
        groups
            .entry((e.team_id, z.zone, e.action.clone()))
            .or_insert_with(|| (Counts::default(), e.team_name.as_str()))
            .0
            .add(e);
    }
    groups
        .into_iter()
        .map(|((team_id, zone, action), (c, team_name))| TeamZoneRow {
            team_id,
            team_name: team_name.to_string(),
            zone,
            action,
            event_count: c.events,
            success_count: c.successes,
            success_rate: c.success_rate(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerZoneRow {
    pub player_id: u32,
    pub player_name: String,
    pub team_id: u32,
    pub team_name: String,
    pub zone: Zone,
    pub action: ActionType,
    pub event_count: u32,
    pub success_count: u32,
    pub fail_count: u32,
    pub success_rate: f64,
}

/// Team-only actions (no player id) are left out.
pub fn player_zone_activity(zoned: &[ZonedEvent<'_>]) -> Vec<PlayerZoneRow> {
    let mut groups: BTreeMap<(u32, u32, Zone, ActionType), (Counts, &Event)> = BTreeMap::new();
    for z in zoned {
        let e = z.event;
        let Some(player_id) = e.player_id else {
            continue;
        };
        groups
            .entry((player_id, e.team_id, z.zone, e.action.clone()))
            .or_insert_with(|| (Counts::default(), e))
            .0
            .add(e);
    }
    groups
        .into_iter()
        .map(|((player_id, team_id, zone, action), (c, first))| PlayerZoneRow {
            player_id,
            player_name: first.player_name.clone(),
            team_id,
            team_name: first.team_name.clone(),
            zone,
            action,
            event_count: c.events,
            success_count: c.successes,
            fail_count: c.fails,
            success_rate: c.success_rate(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueZoneRow {
    pub zone: Zone,
    pub action: ActionType,
    pub league_count: u32,
    pub league_success: u32,
    pub league_success_rate: f64,
    /// Mean count over the teams that have at least one such event.
    pub avg_events_per_team: f64,
}

pub fn league_zone_average(team_rows: &[TeamZoneRow]) -> Vec<LeagueZoneRow> {
    // (events, successes, teams)
    let mut groups: BTreeMap<(Zone, ActionType), (u32, u32, u32)> = BTreeMap::new();
    for row in team_rows {
        let g = groups.entry((row.zone, row.action.clone())).or_default();
        g.0 += row.event_count;
        g.1 += row.success_count;
        g.2 += 1;
    }
    groups
        .into_iter()
        .map(|((zone, action), (events, successes, teams))| LeagueZoneRow {
            zone,
            action,
            league_count: events,
            league_success: successes,
            league_success_rate: if events > 0 {
                successes as f64 / events as f64
            } else {
                0.0
            },
            avg_events_per_team: if teams > 0 {
                events as f64 / teams as f64
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outcome;
    use crate::pitch::PitchPoint;

    fn ev(team: u32, player: Option<u32>, action: ActionType, outcome: Outcome, x: f64, y: f64) -> Event {
        Event {
            game_id: 1,
            period_id: 1,
            time_seconds: 0.0,
            action_id: 0,
            team_id: team,
            team_name: format!("T{team}"),
            player_id: player,
            player_name: player.map(|p| format!("P{p}")).unwrap_or_default(),
            action,
            outcome,
            start: PitchPoint::new(x, y),
            end: PitchPoint::new(x, y),
        }
    }

    #[test]
    fn only_key_actions_on_the_pitch_are_zoned() {
        let events = vec![
            ev(1, Some(1), ActionType::Pass, Outcome::Successful, 10.0, 10.0),
            ev(1, Some(1), ActionType::Carry, Outcome::Successful, 10.0, 10.0),
            ev(1, Some(1), ActionType::Pass, Outcome::Successful, 110.0, 10.0),
            ev(1, Some(1), ActionType::Shot, Outcome::Goal, 100.0, 30.0),
        ];
        let zoned = zoned_key_events(&events);
        let labels: Vec<String> = zoned.iter().map(|z| z.zone.label()).collect();
        assert_eq!(labels, vec!["D-L", "A-C"]);
    }

    #[test]
    fn profiles_count_goals_as_success() {
        let events = vec![
            ev(1, Some(1), ActionType::Shot, Outcome::Goal, 100.0, 30.0),
            ev(1, Some(2), ActionType::Shot, Outcome::OffTarget, 100.0, 30.0),
            ev(1, None, ActionType::Shot, Outcome::Unsuccessful, 100.0, 30.0),
            ev(2, Some(7), ActionType::Shot, Outcome::Goal, 100.0, 30.0),
        ];
        let zoned = zoned_key_events(&events);

        let teams = team_zone_profile(&zoned);
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].event_count, 3);
        assert_eq!(teams[0].success_count, 1);
        assert!((teams[0].success_rate - 1.0 / 3.0).abs() < 1e-12);

        let players = player_zone_activity(&zoned);
        assert_eq!(players.len(), 3);
        assert!(players.iter().all(|p| p.event_count == 1));

        let league = league_zone_average(&teams);
        assert_eq!(league.len(), 1);
        assert_eq!(league[0].league_count, 4);
        assert_eq!(league[0].league_success, 2);
        assert_eq!(league[0].avg_events_per_team, 2.0);
    }
}
