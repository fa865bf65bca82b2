//! Skein Event Store - batched delivery to a streaming store
//!
//! The ingestion core of the analytics backend: events are encoded into
//! compact binary records in per-worker reusable buffers, submitted to a
//! managed streaming service in bounded batches, and partial batch failures
//! are reported back to the caller as original-list indices for selective
//! resubmission.
//!
//! ```text
//! [Caller] --events--> [StreamEventStore]
//!                          | encode (per-worker buffer, zero-copy split)
//!                          | batch (<= 500 records per submission)
//!                          v
//!                     [StreamTransport] --missing stream--> [StreamProvisioner]
//!                          |
//!                          v
//!                  Delivered | Retry(indices)
//! ```
//!
//! # Delivery semantics
//!
//! - Encoding failures (schema/data mismatch) and non-recoverable transport
//!   errors abort the whole call - they are errors, not retry indices.
//! - A missing destination stream is provisioned once and the submission
//!   re-issued exactly once; anything after that is fatal.
//! - Per-record transport failures (throttling, transient faults) are a
//!   normal return value: [`BatchDisposition::Retry`] carries the indices,
//!   in the coordinate space of the caller's original list, that a
//!   higher-level retry loop may resubmit.

mod arena;
mod bulk;
mod config;
mod error;
mod metrics;
mod stream;
mod transport;

pub use arena::{
    ArenaMetrics, ArenaMetricsSnapshot, EncodeArena, EncodeBuffer, WorkerBuffer, WorkerId,
    RECORD_MARKER,
};
pub use bulk::BulkUploader;
pub use config::{
    StreamStoreConfig, DEFAULT_ENCODE_BUFFER_CAPACITY, DEFAULT_MIN_SHARDS,
    ENCODE_BUFFER_LOW_WATER, MAX_BATCH_RECORDS,
};
pub use error::{BulkUploadError, EventStoreError, TransportError};
pub use metrics::{StoreMetrics, StoreMetricsSnapshot};
pub use stream::{BatchDisposition, CommitAck, ErrorTally, StreamEventStore};
pub use transport::{
    PutRecordsResponse, RecordResult, StreamProvisioner, StreamRecord, StreamTransport,
};

/// Result type for event store operations
pub type Result<T> = std::result::Result<T, EventStoreError>;

#[cfg(test)]
mod test_utils;
