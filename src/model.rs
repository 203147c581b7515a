use std::fmt;

use crate::pitch::{self, PitchPoint};

/// Normalized action category of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    Pass,
    PassReceived,
    Carry,
    Cross,
    Shot,
    ShotFreekick,
    Tackle,
    Duel,
    Foul,
    HandballFoul,
    Hit,
    Interception,
    Block,
    Clearance,
    AerialClearance,
    Intervention,
    Error,
    Offside,
    Other(String),
}

impl ActionType {
    pub fn from_raw(raw: &str) -> Self {
        let key = normalize_key(raw);
        match key.as_str() {
            "pass" => ActionType::Pass,
            "pass received" => ActionType::PassReceived,
            "carry" => ActionType::Carry,
            "cross" => ActionType::Cross,
            "shot" => ActionType::Shot,
            "shot freekick" => ActionType::ShotFreekick,
            "tackle" => ActionType::Tackle,
            "duel" => ActionType::Duel,
            "foul" => ActionType::Foul,
            "handball foul" => ActionType::HandballFoul,
            "hit" => ActionType::Hit,
            "interception" => ActionType::Interception,
            "block" => ActionType::Block,
            "clearance" => ActionType::Clearance,
            "aerial clearance" => ActionType::AerialClearance,
            "intervention" => ActionType::Intervention,
            "error" => ActionType::Error,
            "offside" => ActionType::Offside,
            _ => ActionType::Other(raw.trim().to_string()),
        }
    }

    /// Canonical label, matching the spelling used by the source data.
    pub fn label(&self) -> &str {
        match self {
            ActionType::Pass => "Pass",
            ActionType::PassReceived => "Pass Received",
            ActionType::Carry => "Carry",
            ActionType::Cross => "Cross",
            ActionType::Shot => "Shot",
            ActionType::ShotFreekick => "Shot_Freekick",
            ActionType::Tackle => "Tackle",
            ActionType::Duel => "Duel",
            ActionType::Foul => "Foul",
            ActionType::HandballFoul => "Handball_Foul",
            ActionType::Hit => "Hit",
            ActionType::Interception => "Interception",
            ActionType::Block => "Block",
            ActionType::Clearance => "Clearance",
            ActionType::AerialClearance => "Aerial Clearance",
            ActionType::Intervention => "Intervention",
            ActionType::Error => "Error",
            ActionType::Offside => "Offside",
            ActionType::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_defensive(&self) -> bool {
        DEFENSIVE_ACTIONS.contains(self)
    }

    pub fn is_foul(&self) -> bool {
        FOUL_ACTIONS.contains(self)
    }

    pub fn is_shot(&self) -> bool {
        matches!(self, ActionType::Shot | ActionType::ShotFreekick)
    }

    pub fn is_clearance(&self) -> bool {
        matches!(self, ActionType::Clearance | ActionType::AerialClearance)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const DEFENSIVE_ACTIONS: &[ActionType] = &[
    ActionType::Tackle,
    ActionType::Duel,
    ActionType::Foul,
    ActionType::Interception,
    ActionType::Block,
    ActionType::Clearance,
    ActionType::Intervention,
    ActionType::Error,
    ActionType::AerialClearance,
];

pub const FOUL_ACTIONS: &[ActionType] = &[
    ActionType::Foul,
    ActionType::HandballFoul,
    ActionType::Hit,
];

/// Action types kept for zone pattern artifacts.
pub const ZONE_KEY_ACTIONS: &[ActionType] = &[
    ActionType::Pass,
    ActionType::Shot,
    ActionType::ShotFreekick,
    ActionType::Cross,
    ActionType::Duel,
    ActionType::Tackle,
    ActionType::Interception,
    ActionType::Foul,
    ActionType::Clearance,
    ActionType::Block,
];

/// Normalized result of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Successful,
    Unsuccessful,
    Goal,
    OnTarget,
    OffTarget,
    Blocked,
    YellowCard,
    SecondYellowCard,
    DirectRedCard,
    Missing,
    Other(String),
}

impl Outcome {
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Outcome::Missing;
        }
        match normalize_key(trimmed).as_str() {
            "successful" => Outcome::Successful,
            "unsuccessful" => Outcome::Unsuccessful,
            "goal" => Outcome::Goal,
            "on target" => Outcome::OnTarget,
            "off target" => Outcome::OffTarget,
            "blocked" => Outcome::Blocked,
            "yellow card" => Outcome::YellowCard,
            "second yellow card" => Outcome::SecondYellowCard,
            "direct red card" => Outcome::DirectRedCard,
            _ => Outcome::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Outcome::Successful => "Successful",
            Outcome::Unsuccessful => "Unsuccessful",
            Outcome::Goal => "Goal",
            Outcome::OnTarget => "On Target",
            Outcome::OffTarget => "Off Target",
            Outcome::Blocked => "Blocked",
            Outcome::YellowCard => "Yellow_Card",
            Outcome::SecondYellowCard => "Second_Yellow_Card",
            Outcome::DirectRedCard => "Direct_Red_Card",
            Outcome::Missing => "",
            Outcome::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_card(&self) -> bool {
        matches!(
            self,
            Outcome::YellowCard | Outcome::SecondYellowCard | Outcome::DirectRedCard
        )
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c == '_' { ' ' } else { c.to_ascii_lowercase() })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// One recorded on-pitch action.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub game_id: u64,
    pub period_id: u8,
    pub time_seconds: f64,
    pub action_id: u64,
    pub team_id: u32,
    pub team_name: String,
    pub player_id: Option<u32>,
    pub player_name: String,
    pub action: ActionType,
    pub outcome: Outcome,
    pub start: PitchPoint,
    pub end: PitchPoint,
}

impl Event {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Successful
    }

    pub fn is_fail(&self) -> bool {
        self.outcome == Outcome::Unsuccessful
    }

    pub fn is_card(&self) -> bool {
        self.outcome.is_card()
    }

    pub fn in_def_third(&self) -> bool {
        pitch::in_defensive_third(self.start)
    }

    /// Success for zone profiles: a completed action or a goal.
    pub fn is_zone_success(&self) -> bool {
        matches!(self.outcome, Outcome::Successful | Outcome::Goal)
    }
}

/// One game from the match metadata table.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub game_id: u64,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_score: u16,
    pub away_score: u16,
}

impl Match {
    pub fn involves(&self, team_id: u32) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_types_normalize_spacing_and_case() {
        assert_eq!(ActionType::from_raw("Pass Received"), ActionType::PassReceived);
        assert_eq!(ActionType::from_raw("pass_received"), ActionType::PassReceived);
        assert_eq!(ActionType::from_raw(" Aerial  Clearance "), ActionType::AerialClearance);
        assert_eq!(ActionType::from_raw("SHOT_FREEKICK"), ActionType::ShotFreekick);
        assert_eq!(
            ActionType::from_raw("Goal Kick"),
            ActionType::Other("Goal Kick".to_string())
        );
    }

    #[test]
    fn labels_round_trip_through_from_raw() {
        for action in DEFENSIVE_ACTIONS.iter().chain(ZONE_KEY_ACTIONS) {
            assert_eq!(&ActionType::from_raw(action.label()), action);
        }
    }

    #[test]
    fn outcomes_cover_cards_and_missing() {
        assert!(Outcome::from_raw("Yellow_Card").is_card());
        assert!(Outcome::from_raw("Direct_Red_Card").is_card());
        assert!(!Outcome::from_raw("Successful").is_card());
        assert_eq!(Outcome::from_raw(""), Outcome::Missing);
        assert_eq!(Outcome::from_raw("NaN"), Outcome::Missing);
        assert_eq!(Outcome::from_raw("Off Target"), Outcome::OffTarget);
    }
}
