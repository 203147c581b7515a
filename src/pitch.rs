use std::fmt;

pub const PITCH_LENGTH: f64 = 105.0;
pub const PITCH_WIDTH: f64 = 68.0;

pub const DEFENSIVE_THIRD_MAX_X: f64 = 35.0;

pub const PENALTY_BOX_MIN_X: f64 = 88.5;
pub const PENALTY_BOX_MIN_Y: f64 = 13.84;
pub const PENALTY_BOX_MAX_Y: f64 = 54.16;

const ZONE_X_EDGES: [f64; 5] = [0.0, 26.25, 52.5, 78.75, PITCH_LENGTH];
const ZONE_Y_EDGES: [f64; 4] = [0.0, 22.67, 45.33, PITCH_WIDTH];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchPoint {
    pub x: f64,
    pub y: f64,
}

impl PitchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub fn in_defensive_third(p: PitchPoint) -> bool {
    p.x <= DEFENSIVE_THIRD_MAX_X
}

pub fn in_attacking_penalty_box(p: PitchPoint) -> bool {
    p.x >= PENALTY_BOX_MIN_X && (PENALTY_BOX_MIN_Y..=PENALTY_BOX_MAX_Y).contains(&p.y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZoneX {
    D,
    DM,
    AM,
    A,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZoneY {
    L,
    C,
    R,
}

impl ZoneX {
    pub const ALL: [ZoneX; 4] = [ZoneX::D, ZoneX::DM, ZoneX::AM, ZoneX::A];

    pub fn label(self) -> &'static str {
        match self {
            ZoneX::D => "D",
            ZoneX::DM => "DM",
            ZoneX::AM => "AM",
            ZoneX::A => "A",
        }
    }
}

impl ZoneY {
    pub const ALL: [ZoneY; 3] = [ZoneY::L, ZoneY::C, ZoneY::R];

    pub fn label(self) -> &'static str {
        match self {
            ZoneY::L => "L",
            ZoneY::C => "C",
            ZoneY::R => "R",
        }
    }
}

/// One cell of the 4 x 3 pitch grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Zone {
    pub x: ZoneX,
    pub y: ZoneY,
}

impl Zone {
    pub fn of(p: PitchPoint) -> Option<Zone> {
        let x = bin(p.x, &ZONE_X_EDGES)?;
        let y = bin(p.y, &ZONE_Y_EDGES)?;
        Some(Zone {
            x: ZoneX::ALL[x],
            y: ZoneY::ALL[y],
        })
    }

    pub fn label(self) -> String {
        format!("{}-{}", self.x.label(), self.y.label())
    }

    pub fn parse(label: &str) -> Option<Zone> {
        let (x, y) = label.split_once('-')?;
        let x = ZoneX::ALL.into_iter().find(|z| z.label() == x)?;
        let y = ZoneY::ALL.into_iter().find(|z| z.label() == y)?;
        Some(Zone { x, y })
    }

    /// Every zone, own goal line first, left to right.
    pub fn all() -> impl Iterator<Item = Zone> {
        ZoneX::ALL
            .into_iter()
            .flat_map(|x| ZoneY::ALL.into_iter().map(move |y| Zone { x, y }))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x.label(), self.y.label())
    }
}

// Half-open bins, except the last one which also takes its right edge.
fn bin(v: f64, edges: &[f64]) -> Option<usize> {
    if !v.is_finite() {
        return None;
    }
    let last = edges.len() - 2;
    for i in 0..=last {
        let (lo, hi) = (edges[i], edges[i + 1]);
        if v >= lo && (v < hi || (i == last && v <= hi)) {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_edges_are_left_closed() {
        assert_eq!(Zone::of(PitchPoint::new(0.0, 0.0)).map(Zone::label).as_deref(), Some("D-L"));
        assert_eq!(Zone::of(PitchPoint::new(26.25, 22.67)).map(Zone::label).as_deref(), Some("DM-C"));
        assert_eq!(Zone::of(PitchPoint::new(105.0, 68.0)).map(Zone::label).as_deref(), Some("A-R"));
        assert_eq!(Zone::of(PitchPoint::new(78.7, 45.0)).map(Zone::label).as_deref(), Some("AM-C"));
    }

    #[test]
    fn points_off_the_pitch_have_no_zone() {
        assert!(Zone::of(PitchPoint::new(-0.1, 10.0)).is_none());
        assert!(Zone::of(PitchPoint::new(105.1, 10.0)).is_none());
        assert!(Zone::of(PitchPoint::new(50.0, 68.5)).is_none());
        assert!(Zone::of(PitchPoint::new(f64::NAN, 10.0)).is_none());
    }

    #[test]
    fn zone_labels_parse_back() {
        for zone in Zone::all() {
            assert_eq!(Zone::parse(&zone.label()), Some(zone));
        }
        assert_eq!(Zone::all().count(), 12);
        assert!(Zone::parse("X-L").is_none());
    }

    #[test]
    fn penalty_box_and_defensive_third() {
        assert!(in_attacking_penalty_box(PitchPoint::new(95.0, 34.0)));
        assert!(in_attacking_penalty_box(PitchPoint::new(88.5, 13.84)));
        assert!(!in_attacking_penalty_box(PitchPoint::new(95.0, 10.0)));
        assert!(!in_attacking_penalty_box(PitchPoint::new(80.0, 34.0)));
        assert!(in_defensive_third(PitchPoint::new(35.0, 5.0)));
        assert!(!in_defensive_third(PitchPoint::new(35.1, 5.0)));
    }
}
