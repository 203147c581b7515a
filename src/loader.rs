use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::DataError;

pub const EVENT_COLUMNS: &[&str] = &[
    "game_id",
    "period_id",
    "time_seconds",
    "action_id",
    "team_id",
    "player_id",
    "type_name",
    "result_name",
    "start_x",
    "start_y",
    "end_x",
    "end_y",
];

pub const MATCH_COLUMNS: &[&str] = &[
    "game_id",
    "home_team_id",
    "away_team_id",
    "home_score",
    "away_score",
];

/// One row of `raw_data.csv`, before any cleaning.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawEventRow {
    pub game_id: u64,
    pub period_id: u8,
    pub time_seconds: Option<f64>,
    pub action_id: u64,
    pub team_id: u32,
    // Written as a float by some exports when the column has gaps.
    pub player_id: Option<f64>,
    #[serde(default)]
    pub player_name_ko: Option<String>,
    #[serde(default)]
    pub team_name_ko: Option<String>,
    pub type_name: String,
    pub result_name: Option<String>,
    pub start_x: Option<f64>,
    pub start_y: Option<f64>,
    pub end_x: Option<f64>,
    pub end_y: Option<f64>,
}

/// One row of `match_info.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawMatchRow {
    pub game_id: u64,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    #[serde(default)]
    pub home_team_name_ko: Option<String>,
    #[serde(default)]
    pub away_team_name_ko: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoadedTable<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

pub fn load_raw_events(path: &Path) -> Result<LoadedTable<RawEventRow>, DataError> {
    load_csv(path, EVENT_COLUMNS)
}

pub fn load_match_info(path: &Path) -> Result<LoadedTable<RawMatchRow>, DataError> {
    load_csv(path, MATCH_COLUMNS)
}

pub fn load_csv<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
) -> Result<LoadedTable<T>, DataError> {
    if !path.exists() {
        return Err(DataError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_csv_from_reader(file, path, required)
}

/// Reader-based loader; `source` only labels errors and log lines.
pub fn load_csv_from_reader<T: DeserializeOwned, R: Read>(
    rdr: R,
    source: &Path,
    required: &[&str],
) -> Result<LoadedTable<T>, DataError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| DataError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?
        .clone();

    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            path: source.to_path_buf(),
            columns: missing,
        });
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                // Data row N is line N + 2 once the header is counted.
                warn!("{}: skipping malformed row {}: {}", source.display(), idx + 2, e);
            }
        }
    }
    debug!(
        "{}: loaded {} rows ({} skipped)",
        source.display(),
        rows.len(),
        skipped
    );

    if rows.is_empty() {
        return Err(DataError::EmptyInput {
            path: source.to_path_buf(),
        });
    }

    Ok(LoadedTable { rows, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: &str = "\
game_id,period_id,time_seconds,action_id,team_id,player_id,player_name_ko,team_name_ko,type_name,result_name,start_x,start_y,end_x,end_y,extra
1,1,10.5,1,100,7.0,Kim,Ulsan,Pass,Successful,30.0,20.0,40.0,22.0,x
1,1,12.0,2,100,,,Ulsan,Pass Received,,40.0,22.0,40.0,22.0,y
1,1,oops,3,100,7,Kim,Ulsan,Pass,Successful,30.0,20.0,40.0,22.0,z
";

    #[test]
    fn loads_events_and_skips_malformed_rows() {
        let table: LoadedTable<RawEventRow> =
            load_csv_from_reader(EVENTS.as_bytes(), Path::new("events.csv"), EVENT_COLUMNS)
                .expect("events should load");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.skipped, 1);
        assert_eq!(table.rows[0].player_id, Some(7.0));
        assert_eq!(table.rows[1].player_id, None);
        assert_eq!(table.rows[1].result_name, None);
        assert_eq!(table.rows[1].team_name_ko.as_deref(), Some("Ulsan"));
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let raw = "game_id,period_id,team_id\n1,1,100\n";
        let err = load_csv_from_reader::<RawEventRow, _>(
            raw.as_bytes(),
            Path::new("events.csv"),
            EVENT_COLUMNS,
        )
        .expect_err("columns are missing");
        match err {
            DataError::MissingColumns { columns, .. } => {
                assert!(columns.contains(&"time_seconds".to_string()));
                assert!(columns.contains(&"end_y".to_string()));
                assert!(!columns.contains(&"team_id".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_raw_events(Path::new("/definitely/not/here.csv")).expect_err("no file");
        assert!(err.is_missing_input());
    }

    #[test]
    fn header_only_file_is_empty_input() {
        let raw = "game_id,home_team_id,away_team_id,home_score,away_score\n";
        let err = load_csv_from_reader::<RawMatchRow, _>(
            raw.as_bytes(),
            Path::new("match_info.csv"),
            MATCH_COLUMNS,
        )
        .expect_err("no rows");
        assert!(matches!(err, DataError::EmptyInput { .. }));
    }
}
