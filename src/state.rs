use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Durable app preferences, stored as JSON under the app's home directory.
///
/// `last_sync_at` is written only after a fully successful batch
/// acknowledgment; absence means the device has never synced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppState {
    pub school_id: Option<String>,
    pub device_id: Option<String>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

pub fn default_path() -> Result<PathBuf> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home_dir.join(".field-sync").join("state.json"))
}

pub fn load(path: &Path) -> Result<AppState> {
    if !path.exists() {
        return Ok(AppState::default());
    }
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open state file {}", path.display()))?;
    let state = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse state file {}", path.display()))?;
    Ok(state)
}

pub fn save(path: &Path, state: &AppState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create state directory {}", parent.display()))?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create state file {}", path.display()))?;
    serde_json::to_writer_pretty(file, state).context("Failed to serialize state")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let state = load(&dir.path().join("state.json")).unwrap();
        assert!(state.school_id.is_none());
        assert!(state.device_id.is_none());
        assert!(state.last_sync_at.is_none());
    }

    #[test]
    fn state_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let state = AppState {
            school_id: Some("school-7".to_string()),
            device_id: Some("dev-1".to_string()),
            last_sync_at: Some(Utc::now()),
        };
        save(&path, &state).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.school_id.as_deref(), Some("school-7"));
        assert_eq!(loaded.device_id.as_deref(), Some("dev-1"));
        assert_eq!(loaded.last_sync_at, state.last_sync_at);
    }
}
