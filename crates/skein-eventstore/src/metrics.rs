//! Event store metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for the stream event store
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Events accepted by the transport
    pub events_stored: AtomicU64,

    /// Bulk submissions issued to the transport
    pub batches_submitted: AtomicU64,

    /// Records reported back for caller-side resubmission
    pub records_failed: AtomicU64,

    /// Events rejected for schema/data mismatch
    pub encode_errors: AtomicU64,

    /// Missing destinations auto-provisioned
    pub streams_provisioned: AtomicU64,

    /// Bulk uploads delegated to the object store
    pub bulk_uploads: AtomicU64,
}

impl StoreMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            events_stored: AtomicU64::new(0),
            batches_submitted: AtomicU64::new(0),
            records_failed: AtomicU64::new(0),
            encode_errors: AtomicU64::new(0),
            streams_provisioned: AtomicU64::new(0),
            bulk_uploads: AtomicU64::new(0),
        }
    }

    /// Record successfully stored events
    #[inline]
    pub fn record_events_stored(&self, count: u64) {
        self.events_stored.fetch_add(count, Ordering::Relaxed);
    }

    /// Record one bulk submission
    #[inline]
    pub fn record_batch_submitted(&self) {
        self.batches_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record records returned to the caller for resubmission
    #[inline]
    pub fn record_records_failed(&self, count: u64) {
        self.records_failed.fetch_add(count, Ordering::Relaxed);
    }

    /// Record an event rejected at encode time
    #[inline]
    pub fn record_encode_error(&self) {
        self.encode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an auto-provisioned stream
    #[inline]
    pub fn record_stream_provisioned(&self) {
        self.streams_provisioned.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a delegated bulk upload
    #[inline]
    pub fn record_bulk_upload(&self) {
        self.bulk_uploads.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> StoreMetricsSnapshot {
        StoreMetricsSnapshot {
            events_stored: self.events_stored.load(Ordering::Relaxed),
            batches_submitted: self.batches_submitted.load(Ordering::Relaxed),
            records_failed: self.records_failed.load(Ordering::Relaxed),
            encode_errors: self.encode_errors.load(Ordering::Relaxed),
            streams_provisioned: self.streams_provisioned.load(Ordering::Relaxed),
            bulk_uploads: self.bulk_uploads.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of store metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreMetricsSnapshot {
    pub events_stored: u64,
    pub batches_submitted: u64,
    pub records_failed: u64,
    pub encode_errors: u64,
    pub streams_provisioned: u64,
    pub bulk_uploads: u64,
}
