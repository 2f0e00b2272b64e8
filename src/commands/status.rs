use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::state;
use crate::store::{ChangeCollector, LocalStore};

pub async fn status(config: &Config, state_path: &Path) -> Result<()> {
    let store = LocalStore::open(config.database_path()?)?;
    let counts = ChangeCollector::new(&store).unsynced_counts()?;
    let app_state = state::load(state_path).context("Failed to load app state")?;

    println!("Pending teachers:  {}", counts.pending_teachers);
    println!("Pending feedbacks: {}", counts.pending_feedbacks);
    println!("Pending sessions:  {}", counts.pending_sessions);
    match app_state.last_sync_at {
        Some(ts) => println!("Last sync: {}", ts.to_rfc3339()),
        None => println!("Last sync: never"),
    }
    match app_state.school_id {
        Some(id) => println!("School context: {}", id),
        None => println!("School context: not selected"),
    }
    Ok(())
}
