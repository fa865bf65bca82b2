//! Bulk-upload collaborator seam
//!
//! Alternate ingestion mode for large, non-latency-sensitive submissions
//! (backfills, connector imports): the whole list goes to a bulk object
//! store in one unit instead of through per-record streaming.

use async_trait::async_trait;

use skein_events::Event;

use crate::error::BulkUploadError;

/// Bulk object-store collaborator
///
/// All-or-nothing: no batching, retry, or partial-failure semantics are
/// defined at this seam, and errors propagate unchanged.
#[async_trait]
pub trait BulkUploader: Send + Sync {
    /// Upload all events for one tenant as a single unit
    async fn upload(&self, project: &str, events: &[Event]) -> Result<(), BulkUploadError>;
}
