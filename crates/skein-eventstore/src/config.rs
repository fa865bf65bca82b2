//! Event store configuration

use serde::Deserialize;

// =============================================================================
// Constants
// =============================================================================

/// Maximum records per bulk submission to the streaming transport
///
/// This is the transport's hard per-request limit; the batch coordinator
/// never submits more than this in one call.
pub const MAX_BATCH_RECORDS: usize = 500;

/// Initial capacity of each worker's encode buffer
pub const DEFAULT_ENCODE_BUFFER_CAPACITY: usize = 1_000_000;

/// Free-capacity threshold below which an encode buffer recycles itself
pub const ENCODE_BUFFER_LOW_WATER: usize = 1_000;

/// Shard count requested when auto-provisioning a missing stream
pub const DEFAULT_MIN_SHARDS: u32 = 1;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the stream event store
///
/// ```toml
/// [eventstore]
/// stream_name = "skein-events-prod"
/// min_shards = 2
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamStoreConfig {
    /// Destination stream/topic name in the streaming service
    pub stream_name: String,

    /// Shards requested when the destination has to be auto-provisioned
    pub min_shards: u32,

    /// Initial capacity of each worker's encode buffer, in bytes
    pub encode_buffer_capacity: usize,

    /// Free-capacity threshold that triggers encode buffer recycling
    pub encode_buffer_low_water: usize,
}

impl Default for StreamStoreConfig {
    fn default() -> Self {
        Self {
            stream_name: "skein-events".into(),
            min_shards: DEFAULT_MIN_SHARDS,
            encode_buffer_capacity: DEFAULT_ENCODE_BUFFER_CAPACITY,
            encode_buffer_low_water: ENCODE_BUFFER_LOW_WATER,
        }
    }
}

impl StreamStoreConfig {
    /// Set the destination stream name
    pub fn with_stream_name(mut self, name: impl Into<String>) -> Self {
        self.stream_name = name.into();
        self
    }

    /// Set the shard count used for auto-provisioning
    pub fn with_min_shards(mut self, shards: u32) -> Self {
        self.min_shards = shards;
        self
    }

    /// Set the encode buffer capacity
    pub fn with_encode_buffer_capacity(mut self, capacity: usize) -> Self {
        self.encode_buffer_capacity = capacity;
        self
    }

    /// Set the encode buffer low-water mark
    pub fn with_encode_buffer_low_water(mut self, low_water: usize) -> Self {
        self.encode_buffer_low_water = low_water;
        self
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
