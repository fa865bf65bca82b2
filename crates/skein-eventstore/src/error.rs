//! Event store error types
//!
//! Partial batch failures are deliberately NOT here: they are a normal
//! return value ([`crate::BatchDisposition::Retry`]), not an error. The
//! variants below all abort the current operation.

use thiserror::Error;

use skein_events::CodecError;

/// Errors from the streaming transport collaborator
#[derive(Debug, Error)]
pub enum TransportError {
    /// The destination stream/topic does not exist
    ///
    /// The only retriable transport condition: the store provisions the
    /// stream and re-issues the submission exactly once.
    #[error("destination stream `{0}` not found")]
    DestinationMissing(String),

    /// The transport rejected the request as a whole
    #[error("transport rejected request: {code}: {message}")]
    Rejected { code: String, message: String },

    /// Provisioning did not reach an available stream
    #[error("provisioning failed for stream `{stream}`: {message}")]
    ProvisioningFailed { stream: String, message: String },

    /// Connection-level failure talking to the streaming service
    #[error("transport I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// The retry condition of the resource-recovery layer
    #[inline]
    pub fn is_destination_missing(&self) -> bool {
        matches!(self, Self::DestinationMissing(_))
    }
}

/// Errors from the bulk-upload collaborator
#[derive(Debug, Error)]
pub enum BulkUploadError {
    /// The bulk store rejected or failed the upload (all-or-nothing)
    #[error("bulk upload failed: {0}")]
    Upload(String),

    /// I/O failure staging or transmitting the bulk payload
    #[error("bulk upload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the event store to its callers
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// Event data does not conform to its declared schema (non-retriable)
    #[error("failed to encode event for {project}.{collection}: {source}")]
    Encode {
        project: String,
        collection: String,
        #[source]
        source: CodecError,
    },

    /// A single encoded record exceeds the encode buffer capacity
    #[error("encoded record of {size} bytes exceeds buffer capacity {capacity}")]
    RecordTooLarge { size: usize, capacity: usize },

    /// The destination stream could not be made available
    ///
    /// Raised when provisioning fails or the re-issued submission fails
    /// after provisioning. Fatal: callers must not retry automatically.
    #[error("stream `{stream}` unavailable: {source}")]
    StreamUnavailable {
        stream: String,
        #[source]
        source: TransportError,
    },

    /// Non-recoverable transport failure (anything but a missing stream)
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// Bulk upload failure, propagated as-is (all-or-nothing path)
    #[error(transparent)]
    Bulk(#[from] BulkUploadError),

    /// Caller-side precondition violated
    #[error("validation error: {0}")]
    Validation(String),
}

impl EventStoreError {
    /// Create an encode error tagged with the failing event's identity
    pub fn encode(project: &str, collection: &str, source: CodecError) -> Self {
        Self::Encode {
            project: project.to_string(),
            collection: collection.to_string(),
            source,
        }
    }

    /// Create a fatal stream-unavailable error
    pub fn stream_unavailable(stream: &str, source: TransportError) -> Self {
        Self::StreamUnavailable {
            stream: stream.to_string(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
