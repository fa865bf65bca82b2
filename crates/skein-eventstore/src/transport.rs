//! Streaming transport and provisioning collaborator seams
//!
//! The store never talks to the streaming service directly; it consumes
//! these narrow traits. Production wiring injects SDK-backed
//! implementations, tests inject scripted fakes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::TransportError;

/// One serialized record ready for submission
///
/// The payload is a frozen, refcounted slice of the worker's encode
/// buffer; cloning a record is O(1).
#[derive(Debug, Clone)]
pub struct StreamRecord {
    payload: Bytes,
    partition_key: String,
}

impl StreamRecord {
    /// Create a record from an encoded payload and its routing key
    pub fn new(payload: Bytes, partition_key: impl Into<String>) -> Self {
        Self {
            payload,
            partition_key: partition_key.into(),
        }
    }

    /// Encoded record bytes (marker + schema-driven body)
    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Key used by the transport to route/shard this record
    #[inline]
    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }
}

/// Per-record outcome of a bulk submission
///
/// Entries are positionally aligned with the submitted records; a record
/// failed iff `error_code` is present.
#[derive(Debug, Clone, Default)]
pub struct RecordResult {
    /// Transport error code, present only for failed records
    pub error_code: Option<String>,

    /// Human-readable failure reason, present only for failed records
    pub error_message: Option<String>,
}

impl RecordResult {
    /// A successfully stored record
    pub fn ok() -> Self {
        Self::default()
    }

    /// A failed record with its transport-reported code and message
    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: Some(code.into()),
            error_message: Some(message.into()),
        }
    }

    /// Check if this record failed
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.error_code.is_some()
    }
}

/// Response to a bulk submission
#[derive(Debug, Clone)]
pub struct PutRecordsResponse {
    /// Number of records that were not stored
    pub failed_count: usize,

    /// Per-record results, positionally aligned with the request
    pub records: Vec<RecordResult>,
}

impl PutRecordsResponse {
    /// A response with every record stored
    pub fn success(record_count: usize) -> Self {
        Self {
            failed_count: 0,
            records: vec![RecordResult::ok(); record_count],
        }
    }

    /// Check if every record was stored
    #[inline]
    pub fn is_fully_successful(&self) -> bool {
        self.failed_count == 0
    }

    /// Iterate over failed records as `(batch-local index, result)`,
    /// in the order the transport reported them
    pub fn failures(&self) -> impl Iterator<Item = (usize, &RecordResult)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_failed())
    }
}

/// Streaming transport collaborator
///
/// Both operations fail with [`TransportError::DestinationMissing`] when
/// the target stream does not exist; every other error is terminal for
/// the current call. Implementations must tolerate concurrent use from
/// multiple worker tasks.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Submit a bounded batch of records in one bulk request
    async fn put_records(
        &self,
        stream: &str,
        records: &[StreamRecord],
    ) -> Result<PutRecordsResponse, TransportError>;

    /// Submit a single record
    async fn put_record(
        &self,
        stream: &str,
        record: &StreamRecord,
    ) -> Result<(), TransportError>;
}

/// Stream provisioning collaborator
#[async_trait]
pub trait StreamProvisioner: Send + Sync {
    /// Create the stream and block until it becomes available, or fail
    async fn create_and_wait(&self, stream: &str, min_shards: u32) -> Result<(), TransportError>;
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;
