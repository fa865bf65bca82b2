//! Stream event store
//!
//! Delivers events to the streaming transport: single records via
//! `store`, bounded batches via `store_batch`, and backfill-sized lists
//! via `store_bulk`. A missing destination stream is provisioned once and
//! the submission re-issued exactly once; per-record transport failures
//! come back as retry indices in the caller's coordinate space.

use std::collections::HashMap;
use std::sync::Arc;

use skein_events::Event;

use crate::arena::{EncodeArena, EncodeBuffer, WorkerId};
use crate::bulk::BulkUploader;
use crate::config::{StreamStoreConfig, MAX_BATCH_RECORDS};
use crate::error::EventStoreError;
use crate::metrics::StoreMetrics;
use crate::transport::{PutRecordsResponse, StreamProvisioner, StreamRecord, StreamTransport};

// =============================================================================
// Result types
// =============================================================================

/// Outcome of one `store_batch` call
///
/// `Delivered` is a distinguished sentinel, not an empty index list: a
/// `Retry` with no indices is unrepresentable in the coordinator's
/// output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum BatchDisposition {
    /// Every record in every chunk was accepted
    Delivered,

    /// These positions in the caller's original list must be resubmitted
    ///
    /// Indices are ordered by chunk, then by the order the transport
    /// reported the failures within each chunk.
    Retry(Vec<usize>),
}

impl BatchDisposition {
    /// Check if the whole batch was accepted
    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Indices needing resubmission (empty when delivered)
    pub fn retry_indices(&self) -> &[usize] {
        match self {
            Self::Delivered => &[],
            Self::Retry(indices) => indices,
        }
    }

    fn from_failures(failed: Vec<usize>) -> Self {
        if failed.is_empty() {
            Self::Delivered
        } else {
            Self::Retry(failed)
        }
    }
}

/// Acknowledgment returned by [`StreamEventStore::commit`]
///
/// Streaming delivery has no commit phase, so the acknowledgment is
/// ready the moment it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAck {
    project: String,
    collection: String,
}

impl CommitAck {
    /// Tenant the acknowledgment covers
    #[inline]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Collection the acknowledgment covers
    #[inline]
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// Frequency-grouped tally of distinct transport error messages
///
/// Observability only: the tally feeds the partial-failure log line and
/// never influences which indices are returned.
#[derive(Debug, Default)]
pub struct ErrorTally {
    counts: HashMap<String, u64>,
}

impl ErrorTally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of an error message
    pub fn record(&mut self, message: &str) {
        *self.counts.entry(message.to_string()).or_insert(0) += 1;
    }

    /// Occurrences of one message
    pub fn count(&self, message: &str) -> u64 {
        self.counts.get(message).copied().unwrap_or(0)
    }

    /// Number of distinct messages
    #[inline]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing was recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(message, occurrences)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(m, c)| (m.as_str(), *c))
    }

    /// Fold another tally into this one
    pub fn merge(&mut self, other: ErrorTally) {
        for (message, count) in other.counts {
            *self.counts.entry(message).or_insert(0) += count;
        }
    }
}

/// Failure report for one submitted slice
#[derive(Debug)]
pub(crate) struct SliceOutcome {
    /// Batch-local zero-based indices of failed records, in
    /// transport-report order
    pub(crate) failed: Vec<usize>,

    /// Error-message tally for the failed records
    pub(crate) errors: ErrorTally,
}

impl SliceOutcome {
    fn delivered() -> Self {
        Self {
            failed: Vec::new(),
            errors: ErrorTally::new(),
        }
    }
}

/// Collect failed-record indices and tally their error messages
///
/// Indices are batch-local and follow the order the transport reported
/// the per-record results.
pub(crate) fn classify_failures(
    response: &PutRecordsResponse,
    tally: &mut ErrorTally,
) -> Vec<usize> {
    let mut failed = Vec::with_capacity(response.failed_count);

    for (index, record) in response.failures() {
        failed.push(index);
        let message = record
            .error_message
            .as_deref()
            .or(record.error_code.as_deref())
            .unwrap_or("unknown error");
        tally.record(message);
    }

    failed
}

// =============================================================================
// Stream event store
// =============================================================================

/// Event store backed by a managed streaming service
///
/// Collaborators are injected: the streaming transport, the provisioning
/// API used when the destination stream is missing, and the bulk object
/// store used by the backfill path.
pub struct StreamEventStore {
    /// Streaming transport client
    transport: Arc<dyn StreamTransport>,

    /// Provisioning API for missing destinations
    provisioner: Arc<dyn StreamProvisioner>,

    /// Bulk-upload collaborator for the backfill path
    bulk: Arc<dyn BulkUploader>,

    /// Configuration
    config: StreamStoreConfig,

    /// Per-worker encode buffers
    arena: EncodeArena,

    /// Metrics
    metrics: Arc<StoreMetrics>,
}

impl StreamEventStore {
    /// Create a new stream event store
    pub fn new(
        transport: Arc<dyn StreamTransport>,
        provisioner: Arc<dyn StreamProvisioner>,
        bulk: Arc<dyn BulkUploader>,
        config: StreamStoreConfig,
    ) -> Self {
        let arena = EncodeArena::new(config.encode_buffer_capacity, config.encode_buffer_low_water);

        Self {
            transport,
            provisioner,
            bulk,
            config,
            arena,
            metrics: Arc::new(StoreMetrics::new()),
        }
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    /// Get reference to the encode buffer arena
    #[inline]
    pub fn arena(&self) -> &EncodeArena {
        &self.arena
    }

    /// Get reference to config
    #[inline]
    pub fn config(&self) -> &StreamStoreConfig {
        &self.config
    }

    /// Send a single event
    ///
    /// Recovers once from a missing destination stream; any other failure
    /// is fatal for this call.
    pub async fn store(&self, worker: WorkerId, event: &Event) -> Result<(), EventStoreError> {
        let record = {
            let mut buffer = self.arena.acquire(worker);
            self.encode_one(&mut buffer, event)?
        };

        self.put_record_recovering(&record).await?;
        self.metrics.record_events_stored(1);

        Ok(())
    }

    /// Send a list of events of any size
    ///
    /// The list is partitioned into consecutive chunks of at most
    /// [`MAX_BATCH_RECORDS`], processed sequentially; chunk-local failure
    /// indices are translated back into the coordinate space of `events`.
    /// This is the sole batch-ingestion entry point - callers never see
    /// individual chunks.
    pub async fn store_batch(
        &self,
        worker: WorkerId,
        events: &[Event],
    ) -> Result<BatchDisposition, EventStoreError> {
        if events.is_empty() {
            return Ok(BatchDisposition::Delivered);
        }

        let mut buffer = self.arena.acquire(worker);
        let mut failed: Vec<usize> = Vec::new();
        let mut errors = ErrorTally::new();
        let mut cursor = 0;

        while cursor < events.len() {
            let chunk = MAX_BATCH_RECORDS.min(events.len() - cursor);

            let outcome = self
                .submit_slice(events, cursor, chunk, &mut buffer)
                .await?;
            failed.extend(outcome.failed.iter().map(|i| i + cursor));
            errors.merge(outcome.errors);

            cursor += chunk;
        }

        if !failed.is_empty() {
            tracing::debug!(
                stream = %self.config.stream_name,
                failed = failed.len(),
                submitted = events.len(),
                errors = ?errors,
                "batch completed with records needing resubmission"
            );
        }

        self.metrics
            .record_events_stored((events.len() - failed.len()) as u64);

        Ok(BatchDisposition::from_failures(failed))
    }

    /// Delegate a backfill-sized list to the bulk object store
    ///
    /// All events must share one tenant; the whole list is uploaded as a
    /// single all-or-nothing unit with no batching or retry semantics.
    pub async fn store_bulk(&self, events: &[Event]) -> Result<(), EventStoreError> {
        let first = events
            .first()
            .ok_or_else(|| EventStoreError::validation("bulk upload of an empty event list"))?;
        let project = first.project();

        if let Some(other) = events.iter().find(|e| e.project() != project) {
            return Err(EventStoreError::validation(format!(
                "bulk upload mixes tenants `{}` and `{}`",
                project,
                other.project()
            )));
        }

        self.bulk.upload(project, events).await?;
        self.metrics.record_bulk_upload();

        tracing::debug!(
            project = %project,
            events = events.len(),
            "delegated bulk upload"
        );

        Ok(())
    }

    /// Acknowledge a collection (no-op for streaming delivery)
    ///
    /// The streaming transport has no explicit commit phase; the
    /// acknowledgment is complete the moment it is returned.
    pub fn commit(&self, project: &str, collection: &str) -> CommitAck {
        tracing::debug!(project = %project, collection = %collection, "commit acknowledged");

        CommitAck {
            project: project.to_string(),
            collection: collection.to_string(),
        }
    }

    // =========================================================================
    // Batch submission
    // =========================================================================

    /// Submit one slice of at most [`MAX_BATCH_RECORDS`] events
    ///
    /// Encodes `events[offset..offset + limit]`, submits the records as a
    /// single bulk request, and classifies the response into batch-local
    /// failure indices plus an error tally.
    async fn submit_slice(
        &self,
        events: &[Event],
        offset: usize,
        limit: usize,
        buffer: &mut EncodeBuffer,
    ) -> Result<SliceOutcome, EventStoreError> {
        debug_assert!(limit <= MAX_BATCH_RECORDS);

        let mut records = Vec::with_capacity(limit);
        for event in &events[offset..offset + limit] {
            records.push(self.encode_one(buffer, event)?);
        }

        let response = self.put_records_recovering(&records).await?;
        self.metrics.record_batch_submitted();

        if response.is_fully_successful() {
            return Ok(SliceOutcome::delivered());
        }

        let mut tally = ErrorTally::new();
        let failed = classify_failures(&response, &mut tally);
        self.metrics.record_records_failed(failed.len() as u64);

        tracing::warn!(
            stream = %self.config.stream_name,
            failed = failed.len(),
            submitted = limit,
            errors = ?tally,
            "bulk submission stored with failed records"
        );

        Ok(SliceOutcome {
            failed,
            errors: tally,
        })
    }

    fn encode_one(
        &self,
        buffer: &mut EncodeBuffer,
        event: &Event,
    ) -> Result<StreamRecord, EventStoreError> {
        match buffer.encode_event(event) {
            Ok(payload) => Ok(StreamRecord::new(payload, event.partition_key())),
            Err(e) => {
                self.metrics.record_encode_error();
                Err(e)
            }
        }
    }

    // =========================================================================
    // Missing-stream recovery
    // =========================================================================

    /// Bulk submission with one bounded missing-stream recovery
    ///
    /// Attempt, and if the destination is missing: provision it, then
    /// re-issue the same submission exactly once. No recursion, no second
    /// loop - a failure after provisioning is fatal.
    async fn put_records_recovering(
        &self,
        records: &[StreamRecord],
    ) -> Result<PutRecordsResponse, EventStoreError> {
        let stream = &self.config.stream_name;

        match self.transport.put_records(stream, records).await {
            Ok(response) => Ok(response),
            Err(e) if e.is_destination_missing() => {
                self.provision_stream().await?;
                self.transport
                    .put_records(stream, records)
                    .await
                    .map_err(|e| EventStoreError::stream_unavailable(stream, e))
            }
            Err(e) => Err(EventStoreError::Transport(e)),
        }
    }

    /// Single-record submission with the same bounded recovery
    async fn put_record_recovering(&self, record: &StreamRecord) -> Result<(), EventStoreError> {
        let stream = &self.config.stream_name;

        match self.transport.put_record(stream, record).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_destination_missing() => {
                self.provision_stream().await?;
                self.transport
                    .put_record(stream, record)
                    .await
                    .map_err(|e| EventStoreError::stream_unavailable(stream, e))
            }
            Err(e) => Err(EventStoreError::Transport(e)),
        }
    }

    /// The recovery action: create the destination and wait until ready
    async fn provision_stream(&self) -> Result<(), EventStoreError> {
        let stream = &self.config.stream_name;

        tracing::info!(
            stream = %stream,
            min_shards = self.config.min_shards,
            "destination stream missing, provisioning"
        );

        self.provisioner
            .create_and_wait(stream, self.config.min_shards)
            .await
            .map_err(|e| EventStoreError::stream_unavailable(stream, e))?;

        self.metrics.record_stream_provisioned();
        Ok(())
    }
}

#[cfg(test)]
#[path = "stream_test.rs"]
mod stream_test;
