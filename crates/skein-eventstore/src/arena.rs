//! Worker-indexed encode buffer arena
//!
//! Supplies each concurrent worker with a private, reusable output buffer
//! so that serializing many events in sequence does not repeatedly
//! allocate. Buffers are keyed by an explicit [`WorkerId`] and handed out
//! as owning guards, so the design stays correct under cooperative/async
//! schedulers where thread identity does not track logical workers.
//!
//! # Buffer lifecycle
//!
//! Each encoded record is split off the buffer as a frozen, refcounted
//! `Bytes` payload. The split drains capacity; once the remaining free
//! capacity falls below the low-water mark the buffer recycles via
//! `reserve`, which reclaims the original allocation as soon as the
//! transport has dropped its payload references (or falls back to a fresh
//! allocation while payloads are still in flight). In-flight records can
//! therefore never be overwritten by a recycle.
//!
//! # Exclusivity
//!
//! One encode may be in flight per worker at a time. The guard removes
//! the worker's buffer from the arena for its lifetime; a second acquire
//! under the same id (a caller bug) receives a fresh buffer instead of
//! interleaving writes with the first.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bytes::{BufMut, Bytes, BytesMut};

use skein_events::{encode_record, Event};

use crate::error::EventStoreError;

/// Leading byte written before every record payload
///
/// Reserved for downstream framing/versioning; consumers strip it before
/// handing the body to the record decoder.
pub const RECORD_MARKER: u8 = 0;

/// Logical worker identity used to key encode buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(u32);

impl WorkerId {
    /// Create a worker id
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Metrics for arena monitoring
#[derive(Debug, Default)]
pub struct ArenaMetrics {
    /// Buffer acquisitions (hot path)
    pub acquires: AtomicU64,

    /// Buffers constructed (first acquire per worker, or double-acquire)
    pub allocations: AtomicU64,

    /// Low-water recycles performed
    pub recycles: AtomicU64,
}

impl ArenaMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            acquires: AtomicU64::new(0),
            allocations: AtomicU64::new(0),
            recycles: AtomicU64::new(0),
        }
    }

    #[inline]
    fn record_acquire(&self) {
        self.acquires.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_allocation(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_recycle(&self) {
        self.recycles.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of metrics
    pub fn snapshot(&self) -> ArenaMetricsSnapshot {
        ArenaMetricsSnapshot {
            acquires: self.acquires.load(Ordering::Relaxed),
            allocations: self.allocations.load(Ordering::Relaxed),
            recycles: self.recycles.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of arena metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaMetricsSnapshot {
    pub acquires: u64,
    pub allocations: u64,
    pub recycles: u64,
}

/// Arena of per-worker encode buffers, constructed lazily on first use
pub struct EncodeArena {
    /// Parked buffers by worker; a worker's entry is absent while its
    /// guard is alive
    slots: Mutex<HashMap<WorkerId, EncodeBuffer>>,

    /// Initial capacity for each buffer
    buffer_capacity: usize,

    /// Free-capacity threshold that triggers recycling
    low_water: usize,

    /// Metrics (Arc for sharing with buffers)
    metrics: Arc<ArenaMetrics>,
}

impl EncodeArena {
    /// Create an arena handing out buffers of `buffer_capacity` bytes
    pub fn new(buffer_capacity: usize, low_water: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            buffer_capacity,
            low_water,
            metrics: Arc::new(ArenaMetrics::new()),
        }
    }

    /// Acquire the calling worker's buffer
    ///
    /// The first call per worker allocates the buffer; subsequent calls
    /// return the same instance. The guard re-parks the buffer on drop.
    pub fn acquire(&self, worker: WorkerId) -> WorkerBuffer<'_> {
        self.metrics.record_acquire();

        let parked = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.remove(&worker)
        };

        let buffer = parked.unwrap_or_else(|| {
            self.metrics.record_allocation();
            EncodeBuffer::new(
                self.buffer_capacity,
                self.low_water,
                Arc::clone(&self.metrics),
            )
        });

        WorkerBuffer {
            arena: self,
            worker,
            buffer: Some(buffer),
        }
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &ArenaMetrics {
        &self.metrics
    }

    /// Number of currently parked (idle) buffers
    pub fn parked(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn release(&self, worker: WorkerId, buffer: EncodeBuffer) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        // On double-acquire the later release wins; the displaced buffer
        // is simply dropped.
        slots.insert(worker, buffer);
    }
}

/// Guard owning one worker's encode buffer for the duration of a call
///
/// Derefs to [`EncodeBuffer`]; passing `&mut WorkerBuffer` down the call
/// chain is how the buffer handle travels instead of ambient thread
/// identity.
pub struct WorkerBuffer<'a> {
    arena: &'a EncodeArena,
    worker: WorkerId,
    buffer: Option<EncodeBuffer>,
}

impl WorkerBuffer<'_> {
    /// The worker this buffer belongs to
    #[inline]
    pub fn worker(&self) -> WorkerId {
        self.worker
    }
}

impl std::ops::Deref for WorkerBuffer<'_> {
    type Target = EncodeBuffer;

    fn deref(&self) -> &EncodeBuffer {
        self.buffer.as_ref().expect("buffer present until drop")
    }
}

impl std::ops::DerefMut for WorkerBuffer<'_> {
    fn deref_mut(&mut self) -> &mut EncodeBuffer {
        self.buffer.as_mut().expect("buffer present until drop")
    }
}

impl Drop for WorkerBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.arena.release(self.worker, buffer);
        }
    }
}

/// Reusable per-worker output buffer for record encoding
pub struct EncodeBuffer {
    buf: BytesMut,
    capacity: usize,
    low_water: usize,
    metrics: Arc<ArenaMetrics>,
}

impl EncodeBuffer {
    fn new(capacity: usize, low_water: usize, metrics: Arc<ArenaMetrics>) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
            low_water,
            metrics,
        }
    }

    /// Encode one event into the buffer and split it off as a frozen payload
    ///
    /// Writes the leading record marker, then the schema-driven body. The
    /// returned `Bytes` must be handed to the transport layer; it stays
    /// valid independently of later encodes on this buffer.
    ///
    /// # Errors
    ///
    /// - [`EventStoreError::Encode`] when the event's properties do not
    ///   conform to their declared schema (non-retriable)
    /// - [`EventStoreError::RecordTooLarge`] when a single record exceeds
    ///   the buffer capacity
    ///
    /// Either failure leaves the buffer empty and reusable.
    pub fn encode_event(&mut self, event: &Event) -> Result<Bytes, EventStoreError> {
        debug_assert!(self.buf.is_empty(), "previous record not split off");

        self.buf.put_u8(RECORD_MARKER);
        if let Err(e) = encode_record(event.properties(), &mut self.buf) {
            self.buf.clear();
            return Err(EventStoreError::encode(
                event.project(),
                event.collection(),
                e,
            ));
        }

        let size = self.buf.len();
        if size > self.capacity {
            self.buf.clear();
            return Err(EventStoreError::RecordTooLarge {
                size,
                capacity: self.capacity,
            });
        }

        let payload = self.buf.split().freeze();

        if self.buf.capacity() < self.low_water {
            self.recycle();
        }

        Ok(payload)
    }

    /// Free capacity remaining before the next recycle
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.capacity()
    }

    /// Configured initial capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reclaim buffer space once outstanding payloads allow it
    ///
    /// `reserve` reuses the original allocation if all split-off payloads
    /// have been dropped; otherwise it swaps in a fresh allocation,
    /// leaving in-flight payloads untouched.
    fn recycle(&mut self) {
        self.buf.reserve(self.capacity);
        self.metrics.record_recycle();
    }
}

#[cfg(test)]
#[path = "arena_test.rs"]
mod arena_test;
