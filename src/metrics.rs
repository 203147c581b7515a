use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of entity an award ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Player,
    Team,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Player => "player",
            Level::Team => "team",
        }
    }
}

/// Every derived rate an award can rank on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    TackleFailRate,
    CardPerDef,
    DangerFoulRatio,
    BlockFailRate,
    InterceptionFailRate,
    DuelFailRate,
    ClearancePanicRate,
    DefThirdTurnoverRate,
    SecondHalfDrop,
    OffTargetPerGame,
    PenaltyBoxMissPerGame,
    OffsidePerGame,
    ReceiveToGiveRatio,
    CrossFailPerGame,
    DuelFailPerGameAttack,
    AerialFailPerGame,
    TeamDangerFoulPerGame,
    TeamTackleFailRate,
    TeamOffTargetPerGame,
    TeamDefThirdTurnoverRate,
    TeamCardsPerGame,
}

impl Metric {
    pub const PLAYER: [Metric; 16] = [
        Metric::TackleFailRate,
        Metric::CardPerDef,
        Metric::DangerFoulRatio,
        Metric::BlockFailRate,
        Metric::InterceptionFailRate,
        Metric::DuelFailRate,
        Metric::ClearancePanicRate,
        Metric::DefThirdTurnoverRate,
        Metric::SecondHalfDrop,
        Metric::OffTargetPerGame,
        Metric::PenaltyBoxMissPerGame,
        Metric::OffsidePerGame,
        Metric::ReceiveToGiveRatio,
        Metric::CrossFailPerGame,
        Metric::DuelFailPerGameAttack,
        Metric::AerialFailPerGame,
    ];

    pub const TEAM: [Metric; 5] = [
        Metric::TeamDangerFoulPerGame,
        Metric::TeamTackleFailRate,
        Metric::TeamOffTargetPerGame,
        Metric::TeamDefThirdTurnoverRate,
        Metric::TeamCardsPerGame,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::TackleFailRate => "tackle_fail_rate",
            Metric::CardPerDef => "card_per_def",
            Metric::DangerFoulRatio => "danger_foul_ratio",
            Metric::BlockFailRate => "block_fail_rate",
            Metric::InterceptionFailRate => "interception_fail_rate",
            Metric::DuelFailRate => "duel_fail_rate",
            Metric::ClearancePanicRate => "clearance_panic_rate",
            Metric::DefThirdTurnoverRate => "def_third_turnover_rate",
            Metric::SecondHalfDrop => "second_half_drop",
            Metric::OffTargetPerGame => "off_target_per_game",
            Metric::PenaltyBoxMissPerGame => "penalty_box_miss_per_game",
            Metric::OffsidePerGame => "offside_per_game",
            Metric::ReceiveToGiveRatio => "receive_to_give_ratio",
            Metric::CrossFailPerGame => "cross_fail_per_game",
            Metric::DuelFailPerGameAttack => "duel_fail_per_game_attack",
            Metric::AerialFailPerGame => "aerial_fail_per_game",
            Metric::TeamDangerFoulPerGame => "danger_foul_per_game",
            Metric::TeamTackleFailRate => "tackle_fail_rate_team",
            Metric::TeamOffTargetPerGame => "off_target_per_game_team",
            Metric::TeamDefThirdTurnoverRate => "def_third_turnover_rate_team",
            Metric::TeamCardsPerGame => "cards_per_game",
        }
    }

    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::PLAYER
            .into_iter()
            .chain(Metric::TEAM)
            .find(|m| m.name() == name)
    }

    /// Season counts divided by games played, shown to one decimal.
    pub fn per_game(self) -> bool {
        matches!(
            self,
            Metric::OffTargetPerGame
                | Metric::PenaltyBoxMissPerGame
                | Metric::OffsidePerGame
                | Metric::CrossFailPerGame
                | Metric::DuelFailPerGameAttack
                | Metric::AerialFailPerGame
                | Metric::TeamDangerFoulPerGame
                | Metric::TeamOffTargetPerGame
                | Metric::TeamCardsPerGame
        )
    }

    pub fn level(self) -> Level {
        if Metric::TEAM.contains(&self) {
            Level::Team
        } else {
            Level::Player
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An aggregated entity the scoring engine can rank.
pub trait MetricSource {
    fn entity_id(&self) -> u32;
    fn entity_name(&self) -> &str;
    fn team_id(&self) -> u32;
    fn team_name(&self) -> &str;
    /// `None` when the metric does not apply or its denominator is zero.
    fn metric(&self, metric: Metric) -> Option<f64>;
    /// The attempt count an award threshold is checked against.
    fn sample_size(&self, metric: Metric) -> Option<u32>;
}

pub fn ratio(num: u32, den: u32) -> Option<f64> {
    if den == 0 {
        return None;
    }
    Some(num as f64 / den as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_are_unique_and_parse_back() {
        let all: Vec<Metric> = Metric::PLAYER.into_iter().chain(Metric::TEAM).collect();
        for m in &all {
            assert_eq!(Metric::from_name(m.name()), Some(*m));
        }
        let mut names: Vec<&str> = all.iter().map(|m| m.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn levels_follow_the_metric_groups() {
        assert_eq!(Metric::TackleFailRate.level(), Level::Player);
        assert_eq!(Metric::TeamCardsPerGame.level(), Level::Team);
    }

    #[test]
    fn per_game_metrics_are_flagged() {
        assert!(Metric::AerialFailPerGame.per_game());
        assert!(Metric::TeamCardsPerGame.per_game());
        assert!(!Metric::TackleFailRate.per_game());
        assert!(!Metric::ReceiveToGiveRatio.per_game());
        assert!(!Metric::TeamTackleFailRate.per_game());
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(1, 4), Some(0.25));
        assert_eq!(ratio(3, 0), None);
    }
}
