use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const MANIFEST_VERSION: u32 = 1;

/// Describes the last successful build of an artifacts directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub built_at: String,
    /// Input role (`raw_events`, `match_info`) to SHA-256 hex digest.
    pub inputs: BTreeMap<String, String>,
    /// Artifact file name to row count.
    pub artifacts: BTreeMap<String, usize>,
    #[serde(default)]
    pub leaderboard_top: u32,
    /// Workbook file name, when one was written.
    #[serde(default)]
    pub workbook: Option<String>,
}

impl Manifest {
    pub fn new(inputs: BTreeMap<String, String>, leaderboard_top: u32) -> Self {
        Self {
            version: MANIFEST_VERSION,
            built_at: Utc::now().to_rfc3339(),
            inputs,
            artifacts: BTreeMap::new(),
            leaderboard_top,
            workbook: None,
        }
    }

    /// True when this manifest was built from the same inputs and settings
    /// and every artifact it lists still exists in `dir`. With `want_workbook`
    /// the workbook must have been written too.
    pub fn is_current(
        &self,
        dir: &Path,
        inputs: &BTreeMap<String, String>,
        leaderboard_top: u32,
        want_workbook: bool,
    ) -> bool {
        let workbook_ok = !want_workbook
            || self
                .workbook
                .as_ref()
                .is_some_and(|name| dir.join(name).exists());
        self.version == MANIFEST_VERSION
            && &self.inputs == inputs
            && self.leaderboard_top == leaderboard_top
            && workbook_ok
            && !self.artifacts.is_empty()
            && self.artifacts.keys().all(|name| dir.join(name).exists())
    }
}

pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}

/// `None` when the manifest is absent or unreadable.
pub fn load(dir: &Path) -> Option<Manifest> {
    let raw = fs::read_to_string(manifest_path(dir)).ok()?;
    serde_json::from_str(&raw).ok()
}

pub fn save(dir: &Path, manifest: &Manifest) -> Result<()> {
    let path = manifest_path(dir);
    let json = serde_json::to_string_pretty(manifest).context("serialize manifest")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("rename into {}", path.display()))?;
    Ok(())
}

pub fn file_digest(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "kleague_ignobel_manifest_{}_{name}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn digest_is_stable_hex() {
        let dir = temp_dir("digest");
        let path = dir.join("input.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        let first = file_digest(&path).unwrap();
        assert_eq!(first.len(), 64);
        assert_eq!(first, file_digest(&path).unwrap());
        fs::write(&path, "a,b\n1,3\n").unwrap();
        assert_ne!(first, file_digest(&path).unwrap());
    }

    #[test]
    fn manifest_round_trips_and_checks_artifacts() {
        let dir = temp_dir("roundtrip");
        let inputs: BTreeMap<String, String> =
            [("raw_events".to_string(), "abc".to_string())].into_iter().collect();
        let mut manifest = Manifest::new(inputs.clone(), 10);
        manifest.artifacts.insert("x.parquet".to_string(), 3);
        save(&dir, &manifest).unwrap();

        let loaded = load(&dir).unwrap();
        assert_eq!(loaded, manifest);
        assert!(!loaded.is_current(&dir, &inputs, 10, false));

        fs::write(dir.join("x.parquet"), b"").unwrap();
        assert!(loaded.is_current(&dir, &inputs, 10, false));
        assert!(!loaded.is_current(&dir, &inputs, 5, false));
        assert!(!loaded.is_current(&dir, &BTreeMap::new(), 10, false));
    }

    #[test]
    fn a_wanted_workbook_must_be_recorded_and_present() {
        let dir = temp_dir("workbook");
        let inputs: BTreeMap<String, String> =
            [("raw_events".to_string(), "abc".to_string())].into_iter().collect();
        fs::write(dir.join("x.parquet"), b"").unwrap();
        let mut manifest = Manifest::new(inputs.clone(), 10);
        manifest.artifacts.insert("x.parquet".to_string(), 3);
        assert!(!manifest.is_current(&dir, &inputs, 10, true));

        manifest.workbook = Some("book.xlsx".to_string());
        let _ = fs::remove_file(dir.join("book.xlsx"));
        assert!(!manifest.is_current(&dir, &inputs, 10, true));
        fs::write(dir.join("book.xlsx"), b"").unwrap();
        assert!(manifest.is_current(&dir, &inputs, 10, true));
        assert!(manifest.is_current(&dir, &inputs, 10, false));
    }

    #[test]
    fn older_manifests_without_a_workbook_field_still_load() {
        let raw = r#"{"version":1,"built_at":"x","inputs":{},"artifacts":{"a":1}}"#;
        let manifest: Manifest = serde_json::from_str(raw).unwrap();
        assert_eq!(manifest.workbook, None);
        assert_eq!(manifest.leaderboard_top, 0);
    }
}
