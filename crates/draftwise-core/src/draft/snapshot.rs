// Portable JSON snapshot of a draft.
//
// Only format, parameters and the ordered pick list are authoritative;
// everything else is rebuilt by replaying the picks on import. Round and
// pick-in-round are stored for readability and cross-checked on import.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::roster::DraftFormat;
use super::state::DraftParameters;
use crate::error::{DraftError, DraftResult};

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One pick as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPick {
    pub player_name: String,
    pub team_number: u32,
    pub is_user_pick: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_pick: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_in_round: Option<u32>,
}

/// Everything needed to rebuild a draft against the same player pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub version: u32,
    #[serde(default)]
    pub format: Option<DraftFormat>,
    #[serde(default)]
    pub parameters: Option<DraftParameters>,
    #[serde(default)]
    pub picks: Vec<SnapshotPick>,
    pub exported_at: DateTime<Utc>,
    /// Informational; not checked on import.
    #[serde(default)]
    pub total_players: usize,
    /// Informational; not checked on import.
    #[serde(default)]
    pub available_players: usize,
}

impl DraftSnapshot {
    pub fn to_json(&self) -> DraftResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DraftError::CorruptState(format!("failed to encode snapshot: {e}")))
    }

    pub fn from_json(json: &str) -> DraftResult<Self> {
        let snapshot: DraftSnapshot = serde_json::from_str(json)
            .map_err(|e| DraftError::CorruptState(format!("unreadable snapshot: {e}")))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DraftError::CorruptState(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        Ok(snapshot)
    }

    /// `draft_state_YYYYMMDD_HHMMSS.json`, from the export time.
    pub fn default_file_name(&self) -> String {
        format!("draft_state_{}.json", self.exported_at.format("%Y%m%d_%H%M%S"))
    }

    /// Write the snapshot into `dir` under its default file name.
    pub fn save_to_dir(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.default_file_name());
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    pub fn load(path: &Path) -> DraftResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DraftError::CorruptState(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> DraftSnapshot {
        DraftSnapshot {
            version: SNAPSHOT_VERSION,
            format: Some(DraftFormat::from_labels([("QB", 1), ("FLEX", 1)]).unwrap()),
            parameters: Some(DraftParameters {
                total_teams: 10,
                current_team: 3,
            }),
            picks: vec![SnapshotPick {
                player_name: "Josh Allen".into(),
                team_number: 1,
                is_user_pick: false,
                overall_pick: Some(1),
                round: Some(1),
                pick_in_round: Some(1),
            }],
            exported_at: Utc.with_ymd_and_hms(2025, 8, 30, 19, 5, 9).unwrap(),
            total_players: 300,
            available_players: 299,
        }
    }

    #[test]
    fn json_keeps_format_labels() {
        let json = snapshot().to_json().unwrap();
        assert!(json.contains("\"FLEX\": 1"));
        assert!(json.contains("\"QB\": 1"));
        assert_eq!(DraftSnapshot::from_json(&json).unwrap(), snapshot());
    }

    #[test]
    fn minimal_pick_entries_accepted() {
        let json = r#"{
            "version": 1,
            "format": {"QB": 1, "RB": 2},
            "parameters": {"total_teams": 8, "current_team": 2},
            "picks": [{"player_name": "Bijan Robinson", "team_number": 1, "is_user_pick": false}],
            "exported_at": "2025-08-30T19:05:09Z"
        }"#;
        let snap = DraftSnapshot::from_json(json).unwrap();
        assert_eq!(snap.picks[0].overall_pick, None);
        assert_eq!(snap.total_players, 0);
    }

    #[test]
    fn unknown_version_rejected() {
        let mut snap = snapshot();
        snap.version = 99;
        let json = serde_json::to_string(&snap).unwrap();
        assert!(matches!(
            DraftSnapshot::from_json(&json),
            Err(DraftError::CorruptState(_))
        ));
    }

    #[test]
    fn garbage_is_corrupt_state() {
        assert!(matches!(
            DraftSnapshot::from_json("{not json"),
            Err(DraftError::CorruptState(_))
        ));
        assert!(matches!(
            DraftSnapshot::from_json(r#"{"version":1,"exported_at":"2025-01-01T00:00:00Z","format":{"LB":1}}"#),
            Err(DraftError::CorruptState(_))
        ));
    }

    #[test]
    fn file_name_uses_export_time() {
        assert_eq!(
            snapshot().default_file_name(),
            "draft_state_20250830_190509.json"
        );
    }

    #[test]
    fn save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("draftwise_snapshot_{}", std::process::id()));
        let path = snapshot().save_to_dir(&dir).unwrap();
        assert!(path.ends_with("draft_state_20250830_190509.json"));
        assert_eq!(DraftSnapshot::load(&path).unwrap(), snapshot());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
