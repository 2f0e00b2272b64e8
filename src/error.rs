use thiserror::Error;

use crate::store::records::EntityKind;

/// Failure modes of a single sync attempt.
///
/// Every variant is fatal to the attempt it occurred in; retry is the
/// caller's concern, typically on the next startup trigger.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local database could not be opened or queried.
    #[error("local store unavailable: {0}")]
    StorageUnavailable(String),

    /// The sync request never produced an HTTP response.
    #[error("sync request could not be delivered: {0}")]
    NetworkFailure(#[source] reqwest::Error),

    /// The server answered, but with anything other than HTTP 200.
    /// No local state was changed; the whole batch is safe to re-send.
    #[error("sync endpoint answered HTTP {status}: {body}")]
    NonSuccessResponse { status: u16, body: String },

    /// The server accepted the batch but one or more entity tables could not
    /// be marked synced locally. Records left pending are re-sent on the next
    /// attempt; the server is expected to replace them in place.
    #[error("server accepted the batch but tables {failed:?} were not marked synced")]
    PartialMarkFailure { failed: Vec<EntityKind> },

    /// Another attempt already holds the store. The caller should let the
    /// in-flight attempt finish rather than double-collecting.
    #[error("a sync attempt is already in progress")]
    SyncInProgress,

    /// Record statuses were retired but the last-sync timestamp could not be
    /// written to the preferences file.
    #[error("failed to persist sync state: {0}")]
    StatePersistence(String),
}

impl From<rusqlite::Error> for SyncError {
    fn from(err: rusqlite::Error) -> Self {
        SyncError::StorageUnavailable(err.to_string())
    }
}
