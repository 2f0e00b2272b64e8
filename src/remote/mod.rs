pub mod client;

pub use client::HttpSyncClient;

use crate::error::SyncError;
use crate::sync::batch::SyncBatch;

/// Wire boundary to the remote sync endpoint.
///
/// Success means the server acknowledged the whole batch; any other outcome
/// is a total failure of the attempt and must leave local state untouched.
/// The protocol has no partial-success shape.
#[allow(async_fn_in_trait)]
pub trait SyncGateway {
    async fn push(&self, batch: &SyncBatch) -> Result<(), SyncError>;
}
