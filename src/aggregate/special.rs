//! Player metrics that need more than a single pass of counting.

use std::collections::{BTreeMap, HashMap};

use crate::model::{ActionType, Event, Outcome};

use super::PlayerKey;

/// Seconds after a clearance in which an opponent shot counts against it.
pub const PANIC_WINDOW_SECS: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearancePanic {
    pub clearances: u32,
    pub conceded_shots: u32,
}

/// For each clearance, looks at the next shot in the same game and period.
///
/// Expects `events` in match order (see [`crate::preprocess::sort_events`]).
pub fn clearance_panic(events: &[Event]) -> HashMap<PlayerKey, ClearancePanic> {
    // Shots per (game, period), already in clock order.
    let mut shots: HashMap<(u64, u8), Vec<(f64, u32)>> = HashMap::new();
    for e in events.iter().filter(|e| e.action == ActionType::Shot) {
        shots
            .entry((e.game_id, e.period_id))
            .or_default()
            .push((e.time_seconds, e.team_id));
    }

    let mut out: HashMap<PlayerKey, ClearancePanic> = HashMap::new();
    for e in events.iter().filter(|e| e.action.is_clearance()) {
        let Some(key) = PlayerKey::of(e) else {
            continue;
        };
        let entry = out.entry(key).or_default();
        entry.clearances += 1;

        let Some(period_shots) = shots.get(&(e.game_id, e.period_id)) else {
            continue;
        };
        let idx = period_shots.partition_point(|(t, _)| *t < e.time_seconds);
        if let Some((shot_time, shot_team)) = period_shots.get(idx) {
            let dt = shot_time - e.time_seconds;
            if dt <= PANIC_WINDOW_SECS && *shot_team != e.team_id {
                entry.conceded_shots += 1;
            }
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HalfFailRates {
    pub first: Option<f64>,
    pub second: Option<f64>,
}

impl HalfFailRates {
    /// Second-half fail rate minus first-half fail rate.
    pub fn second_half_drop(&self) -> Option<f64> {
        Some(self.second? - self.first?)
    }
}

fn is_defensive_fail(e: &Event) -> bool {
    e.outcome == Outcome::Unsuccessful || e.action == ActionType::Error
}

/// Defensive fail rate per half (periods 1 and 2).
pub fn half_fail_rates(events: &[Event]) -> HashMap<PlayerKey, HalfFailRates> {
    // (attempts, fails) per half
    let mut tallies: HashMap<PlayerKey, [(u32, u32); 2]> = HashMap::new();
    for e in events.iter().filter(|e| e.action.is_defensive()) {
        let half = match e.period_id {
            1 => 0,
            2 => 1,
            _ => continue,
        };
        let Some(key) = PlayerKey::of(e) else {
            continue;
        };
        let slot = &mut tallies.entry(key).or_default()[half];
        slot.0 += 1;
        if is_defensive_fail(e) {
            slot.1 += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(key, [first, second])| {
            let rate = |(n, f): (u32, u32)| (n > 0).then(|| f as f64 / n as f64);
            (
                key,
                HalfFailRates {
                    first: rate(first),
                    second: rate(second),
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefThirdTurnover {
    pub attempts: u32,
    pub fails: u32,
}

/// Passes and carries started in the defensive third.
pub fn def_third_turnover<'a>(
    events: impl IntoIterator<Item = &'a Event>,
) -> BTreeMap<PlayerKey, DefThirdTurnover> {
    let mut out: BTreeMap<PlayerKey, DefThirdTurnover> = BTreeMap::new();
    for e in events {
        if !matches!(e.action, ActionType::Pass | ActionType::Carry) || !e.in_def_third() {
            continue;
        }
        let Some(key) = PlayerKey::of(e) else {
            continue;
        };
        let entry = out.entry(key).or_default();
        entry.attempts += 1;
        if e.is_fail() {
            entry.fails += 1;
        }
    }
    out
}
