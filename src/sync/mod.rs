// ABOUTME: Sync orchestration - collects pending records, transmits, retires
// ABOUTME: Owns the consistency contract between local status and the server

pub mod batch;

pub use batch::{PendingChanges, SyncBatch};

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::device::DeviceProvider;
use crate::error::SyncError;
use crate::remote::SyncGateway;
use crate::state;
use crate::store::{ChangeCollector, LocalStore, UnsyncedCounts};

/// Outcome of one successful sync attempt.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Records transmitted in the batch (zero for an empty batch).
    pub records_sent: usize,
    /// Records transitioned to synced afterwards. Matches `records_sent`
    /// unless a record was deleted out from under the attempt.
    pub records_marked: usize,
    /// The timestamp persisted as the last successful sync.
    pub synced_at: DateTime<Utc>,
}

/// Push-only synchronization engine.
///
/// Owns the store handle for the lifetime of the process; the mutex doubles
/// as the single-flight guard so overlapping triggers cannot double-collect
/// and double-mark.
pub struct SyncEngine<G, D> {
    store: Mutex<LocalStore>,
    gateway: G,
    device: D,
    state_path: PathBuf,
}

impl<G: SyncGateway, D: DeviceProvider> SyncEngine<G, D> {
    pub fn new(store: LocalStore, gateway: G, device: D, state_path: impl Into<PathBuf>) -> Self {
        Self {
            store: Mutex::new(store),
            gateway,
            device,
            state_path: state_path.into(),
        }
    }

    /// Run one sync attempt to completion.
    ///
    /// Collects every pending record across the six entity types, transmits
    /// them as a single batch enriched with device context, and on
    /// acknowledgment marks exactly the collected identities synced before
    /// recording the last-sync time. Any failure before the acknowledgment
    /// leaves all local state untouched and is safe to retry wholesale on a
    /// later trigger; there is no retry loop in here.
    pub async fn try_sync_data(&self) -> Result<SyncReport, SyncError> {
        let store = self
            .store
            .try_lock()
            .map_err(|_| SyncError::SyncInProgress)?;

        let changes = ChangeCollector::new(&store).collect()?;
        let collected = changes.collected_ids();
        let records_sent = changes.total();

        let context = self.device.device();
        let location = self.device.locate().await;
        if location.is_none() {
            tracing::debug!("no geolocation available, sending batch without location");
        }

        let batch = SyncBatch {
            changes,
            model: context.model,
            api_level: context.api_level,
            device_id: context.device_id,
            location,
        };

        tracing::info!("transmitting sync batch ({} record(s))", records_sent);
        self.gateway.push(&batch).await?;

        // The server now has the batch. Attempt all six transitions even if
        // one fails; updates already applied are not rolled back.
        let mut records_marked = 0;
        let mut failed = Vec::new();
        for (kind, ids) in &collected {
            match store.mark_synced(*kind, ids) {
                Ok(n) => records_marked += n,
                Err(e) => {
                    tracing::error!("failed to mark {} record(s) synced: {e}", kind);
                    failed.push(*kind);
                }
            }
        }
        if !failed.is_empty() {
            return Err(SyncError::PartialMarkFailure { failed });
        }

        let synced_at = Utc::now();
        let mut app_state = state::load(&self.state_path)
            .map_err(|e| SyncError::StatePersistence(format!("{e:#}")))?;
        app_state.last_sync_at = Some(synced_at);
        state::save(&self.state_path, &app_state)
            .map_err(|e| SyncError::StatePersistence(format!("{e:#}")))?;

        tracing::info!(
            "sync complete: {} transmitted, {} marked synced",
            records_sent,
            records_marked
        );
        Ok(SyncReport {
            records_sent,
            records_marked,
            synced_at,
        })
    }

    /// Read-only diagnostic, exposed alongside `try_sync_data` to the
    /// trigger boundary.
    pub async fn unsynced_counts(&self) -> Result<UnsyncedCounts, SyncError> {
        let store = self.store.lock().await;
        ChangeCollector::new(&store).unsynced_counts()
    }
}
