use std::path::PathBuf;

const DEFAULT_RAW_EVENTS: &str = "data/raw_data.csv";
const DEFAULT_MATCH_INFO: &str = "data/match_info.csv";
const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
const DEFAULT_LEADERBOARD_TOP: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub raw_events: PathBuf,
    pub match_info: PathBuf,
    pub artifacts_dir: PathBuf,
    pub leaderboard_top: u32,
    pub force_rebuild: bool,
    pub export_xlsx: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            raw_events: PathBuf::from(DEFAULT_RAW_EVENTS),
            match_info: PathBuf::from(DEFAULT_MATCH_INFO),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            leaderboard_top: DEFAULT_LEADERBOARD_TOP,
            force_rebuild: false,
            export_xlsx: true,
        }
    }
}

impl Settings {
    /// Reads `.env.local` and `.env` (if present) and then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str, fallback: PathBuf| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(fallback)
        };

        Self {
            raw_events: path("IGNOBEL_RAW_EVENTS", defaults.raw_events),
            match_info: path("IGNOBEL_MATCH_INFO", defaults.match_info),
            artifacts_dir: path("IGNOBEL_ARTIFACTS_DIR", defaults.artifacts_dir),
            leaderboard_top: lookup("IGNOBEL_LEADERBOARD_TOP")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(defaults.leaderboard_top)
                .max(1),
            force_rebuild: lookup("IGNOBEL_FORCE_REBUILD")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.force_rebuild),
            export_xlsx: lookup("IGNOBEL_XLSX")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.export_xlsx),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
