use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::device::HostDevice;
use crate::remote::HttpSyncClient;
use crate::state;
use crate::store::LocalStore;
use crate::sync::SyncEngine;

/// One sync attempt, triggered from app startup or a manual action.
///
/// Refuses to run without a selected school context; retry on failure is the
/// caller's concern (run again when connectivity is back).
pub async fn sync(config: &Config, state_path: &Path) -> Result<()> {
    let mut app_state = state::load(state_path).context("Failed to load app state")?;

    let Some(school_id) = app_state.school_id.clone() else {
        anyhow::bail!(
            "No school context selected. Run `field-sync school set <id>` before syncing."
        );
    };

    let device_id = match app_state.device_id.clone() {
        Some(id) => id,
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            app_state.device_id = Some(id.clone());
            state::save(state_path, &app_state).context("Failed to save app state")?;
            id
        }
    };

    let store = LocalStore::open(config.database_path()?)?;
    let gateway = HttpSyncClient::new(config.endpoint.clone())?;
    let device = HostDevice::new(config, device_id);
    let engine = SyncEngine::new(store, gateway, device, state_path);

    tracing::info!("starting sync for school {}", school_id);
    let report = engine.try_sync_data().await?;

    println!(
        "Sync complete: {} record(s) transmitted, {} marked synced at {}",
        report.records_sent,
        report.records_marked,
        report.synced_at.to_rfc3339()
    );
    Ok(())
}
