//! The award catalog: which metric each award ranks, in which direction,
//! and how many attempts a candidate needs.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::metrics::{Level, Metric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Largest value wins.
    High,
    /// Smallest value wins.
    Low,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::High => "high",
            Direction::Low => "low",
        }
    }

    /// Maps a value so that larger always means closer to the award.
    pub fn orient(self, v: f64) -> f64 {
        match self {
            Direction::High => v,
            Direction::Low => -v,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Award {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub level: Level,
    pub metric: Metric,
    pub direction: Direction,
    pub icon: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
    pub min_attempts: u32,
}

impl Award {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        id: &'static str,
        title: &'static str,
        category: &'static str,
        metric: Metric,
        direction: Direction,
        level: Level,
        icon: &'static str,
        description: &'static str,
        formula: &'static str,
        min_attempts: u32,
    ) -> Self {
        Self {
            id,
            title,
            category,
            level,
            metric,
            direction,
            icon,
            description,
            formula,
            min_attempts,
        }
    }
}

pub static AWARDS: &[Award] = &[
    Award::new(
        "tackle_fail",
        "Tackled, But...",
        "fail rate",
        Metric::TackleFailRate,
        Direction::High,
        Level::Player,
        "⚔️",
        "Tries plenty of tackles and loses most of them",
        "tackle_fail_rate = tackle_fail / tackle_attempt",
        5,
    ),
    Award::new(
        "card_per_def",
        "Only the Card Remains",
        "cards",
        Metric::CardPerDef,
        Direction::High,
        Level::Player,
        "🟨",
        "Collects cards out of proportion to defensive work",
        "card_per_def = card_count / def_actions",
        10,
    ),
    Award::new(
        "danger_foul",
        "Regular in the Danger Zone",
        "fouls",
        Metric::DangerFoulRatio,
        Direction::High,
        Level::Player,
        "⚠️",
        "Commits a large share of fouls in the defensive third",
        "danger_foul_ratio = danger_foul_count / foul_count",
        3,
    ),
    Award::new(
        "clearance_panic",
        "Nervous Clearance",
        "clearances",
        Metric::ClearancePanicRate,
        Direction::High,
        Level::Player,
        "😰",
        "Clears the ball, then the opponent shoots within 10 seconds",
        "clearance_panic_rate = concede_shot_within_10s / clearances",
        5,
    ),
    Award::new(
        "block_fail",
        "Blocked, But...",
        "fail rate",
        Metric::BlockFailRate,
        Direction::High,
        Level::Player,
        "🛡️",
        "Throws the body in front of the ball and still misses",
        "block_fail_rate = block_fail / block_attempt",
        3,
    ),
    Award::new(
        "interception_fail",
        "Interception Whiff",
        "fail rate",
        Metric::InterceptionFailRate,
        Direction::High,
        Level::Player,
        "🎯",
        "Attempts many interceptions with a high failure rate",
        "interception_fail_rate = interception_fail / interception_attempt",
        5,
    ),
    Award::new(
        "duel_fail",
        "Many Duels, Many Losses",
        "fail rate",
        Metric::DuelFailRate,
        Direction::High,
        Level::Player,
        "⚔️",
        "Enters plenty of duels and loses most",
        "duel_fail_rate = duel_fail / duel_attempt",
        10,
    ),
    Award::new(
        "def_third_turnover",
        "Lost It at Home",
        "turnovers",
        Metric::DefThirdTurnoverRate,
        Direction::High,
        Level::Player,
        "🚨",
        "Fails passes and carries in the defensive third",
        "def_third_turnover_rate = (pass_fail + carry_fail) / (pass + carry) in def third",
        10,
    ),
    Award::new(
        "second_half_drop",
        "Second-Half Collapse",
        "stamina",
        Metric::SecondHalfDrop,
        Direction::High,
        Level::Player,
        "📉",
        "Defensive fail rate climbs sharply after the break",
        "second_half_drop = second_half_fail_rate - first_half_fail_rate",
        20,
    ),
    Award::new(
        "cannon_shot",
        "Cannonball",
        "shooting",
        Metric::OffTargetPerGame,
        Direction::High,
        Level::Player,
        "💥",
        "Shoots a lot and misses the target a lot",
        "off_target_per_game = off_target_shots / games",
        10,
    ),
    Award::new(
        "chicken_chest",
        "Faint Heart",
        "shooting",
        Metric::PenaltyBoxMissPerGame,
        Direction::High,
        Level::Player,
        "🐔",
        "Misses from inside the penalty box",
        "penalty_box_miss_per_game = penalty_box_miss / games",
        5,
    ),
    Award::new(
        "offside_line",
        "Over the Line",
        "offside",
        Metric::OffsidePerGame,
        Direction::High,
        Level::Player,
        "🚫",
        "Caught offside again and again",
        "offside_per_game = offsides / games",
        1,
    ),
    Award::new(
        "selfish_player",
        "Takes, Never Gives",
        "passing",
        Metric::ReceiveToGiveRatio,
        Direction::High,
        Level::Player,
        "🤲",
        "Receives passes far more often than giving them",
        "receive_to_give_ratio = pass_received / pass_given",
        50,
    ),
    Award::new(
        "cross_fail",
        "Who Was That For?",
        "crossing",
        Metric::CrossFailPerGame,
        Direction::High,
        Level::Player,
        "🎯",
        "Crosses often, rarely finds anyone",
        "cross_fail_per_game = cross_fail / games",
        10,
    ),
    Award::new(
        "duel_loser_attack",
        "Losing Is Routine",
        "duels",
        Metric::DuelFailPerGameAttack,
        Direction::High,
        Level::Player,
        "😢",
        "Loses duels game after game",
        "duel_fail_per_game = duel_fail / games",
        20,
    ),
    Award::new(
        "aerial_fail",
        "If Only I Were Taller",
        "aerial",
        Metric::AerialFailPerGame,
        Direction::High,
        Level::Player,
        "📏",
        "Loses aerial duels game after game",
        "aerial_fail_per_game = aerial_fail / games",
        1,
    ),
    Award::new(
        "team_danger_foul",
        "Home Fouls",
        "fouls",
        Metric::TeamDangerFoulPerGame,
        Direction::High,
        Level::Team,
        "⚠️",
        "Team fouls committed in its own defensive third",
        "danger_foul_per_game = danger_foul_count / games",
        1,
    ),
    Award::new(
        "team_tackle_fail",
        "Collective Whiff",
        "fail rate",
        Metric::TeamTackleFailRate,
        Direction::High,
        Level::Team,
        "⚔️",
        "Team tackle failure rate",
        "tackle_fail_rate_team = tackle_fail / tackle_attempt",
        20,
    ),
    Award::new(
        "team_off_target",
        "Shooting Gallery",
        "shooting",
        Metric::TeamOffTargetPerGame,
        Direction::High,
        Level::Team,
        "💥",
        "Team off-target shots per game",
        "off_target_per_game_team = off_target_shots / games",
        10,
    ),
    Award::new(
        "team_def_third_turnover",
        "Gifts at the Back",
        "turnovers",
        Metric::TeamDefThirdTurnoverRate,
        Direction::High,
        Level::Team,
        "🚨",
        "Team failure rate of passes and carries in the defensive third",
        "def_third_turnover_rate_team = fails / (pass + carry) in def third",
        50,
    ),
    Award::new(
        "team_cards",
        "Referee's Favourite",
        "cards",
        Metric::TeamCardsPerGame,
        Direction::High,
        Level::Team,
        "🟥",
        "Cards collected per game",
        "cards_per_game = card_count / games",
        1,
    ),
];

static BY_ID: Lazy<HashMap<&'static str, &'static Award>> =
    Lazy::new(|| AWARDS.iter().map(|a| (a.id, a)).collect());

pub fn find(id: &str) -> Option<&'static Award> {
    BY_ID.get(id).copied()
}

pub fn for_level(level: Level) -> impl Iterator<Item = &'static Award> {
    AWARDS.iter().filter(move |a| a.level == level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn award_ids_are_unique_and_indexed() {
        let ids: HashSet<&str> = AWARDS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), AWARDS.len());
        for a in AWARDS {
            assert_eq!(find(a.id).map(|f| f.metric), Some(a.metric));
        }
        assert!(find("nope").is_none());
    }

    #[test]
    fn award_levels_match_their_metrics() {
        for a in AWARDS {
            assert_eq!(a.level, a.metric.level(), "{}", a.id);
        }
        assert_eq!(for_level(Level::Player).count(), Metric::PLAYER.len());
        assert_eq!(for_level(Level::Team).count(), Metric::TEAM.len());
    }

    #[test]
    fn per_game_formulas_match_per_game_metrics() {
        for a in AWARDS {
            assert_eq!(a.formula.ends_with("/ games"), a.metric.per_game(), "{}", a.id);
        }
    }

    #[test]
    fn direction_orients_values() {
        assert_eq!(Direction::High.orient(2.0), 2.0);
        assert_eq!(Direction::Low.orient(2.0), -2.0);
    }

    #[test]
    fn constructor_keeps_the_given_direction() {
        let cleanest = Award::new(
            "cleanest",
            "Clean Sheet",
            "cards",
            Metric::TeamCardsPerGame,
            Direction::Low,
            Level::Team,
            "",
            "Fewest cards per game",
            "cards_per_game = card_count / games",
            1,
        );
        assert_eq!(cleanest.direction, Direction::Low);
        assert!(AWARDS.iter().all(|a| a.direction == Direction::High));
    }
}
