//! Shared test fixtures and scripted collaborator fakes

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use skein_events::{Event, Field, FieldType, Record, Schema, Value};

use crate::bulk::BulkUploader;
use crate::config::StreamStoreConfig;
use crate::error::{BulkUploadError, TransportError};
use crate::stream::StreamEventStore;
use crate::transport::{
    PutRecordsResponse, RecordResult, StreamProvisioner, StreamRecord, StreamTransport,
};

// =============================================================================
// Fixtures
// =============================================================================

pub(crate) fn test_schema() -> Arc<Schema> {
    Schema::new(vec![
        Field::new("name", FieldType::String),
        Field::new("seq", FieldType::Long),
        Field::nullable("referrer", FieldType::String),
    ])
    .into_shared()
}

pub(crate) fn test_event(project: &str, collection: &str, seq: i64) -> Event {
    let record = Record::new(
        test_schema(),
        vec![Value::from("page_view"), Value::Long(seq), Value::Null],
    )
    .unwrap();
    Event::new(project, collection, record)
}

pub(crate) fn test_events(count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| test_event("acme", "pageviews", i as i64))
        .collect()
}

/// An event whose value does not conform to its declared schema
pub(crate) fn mismatched_event() -> Event {
    let record = Record::new(
        test_schema(),
        vec![Value::from("page_view"), Value::from("not a long"), Value::Null],
    )
    .unwrap();
    Event::new("acme", "pageviews", record)
}

pub(crate) fn partial_response(
    count: usize,
    failures: &[(usize, &str, &str)],
) -> PutRecordsResponse {
    let mut records = vec![RecordResult::ok(); count];
    for (index, code, message) in failures {
        records[*index] = RecordResult::failed(*code, *message);
    }
    PutRecordsResponse {
        failed_count: failures.len(),
        records,
    }
}

// =============================================================================
// Scripted transport
// =============================================================================

#[derive(Debug, Clone)]
pub(crate) struct BatchCall {
    pub(crate) stream: String,
    pub(crate) partition_keys: Vec<String>,
    pub(crate) payloads: Vec<Bytes>,
}

#[derive(Debug, Clone)]
pub(crate) struct SingleCall {
    pub(crate) stream: String,
    pub(crate) partition_key: String,
    pub(crate) payload: Bytes,
}

/// Transport fake: replays scripted responses, then defaults to success
#[derive(Default)]
pub(crate) struct MockTransport {
    batch_calls: Mutex<Vec<BatchCall>>,
    single_calls: Mutex<Vec<SingleCall>>,
    batch_script: Mutex<VecDeque<Result<PutRecordsResponse, TransportError>>>,
    single_script: Mutex<VecDeque<Result<(), TransportError>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script_batch(&self, response: Result<PutRecordsResponse, TransportError>) {
        self.batch_script.lock().unwrap().push_back(response);
    }

    pub(crate) fn script_single(&self, response: Result<(), TransportError>) {
        self.single_script.lock().unwrap().push_back(response);
    }

    pub(crate) fn batch_calls(&self) -> Vec<BatchCall> {
        self.batch_calls.lock().unwrap().clone()
    }

    pub(crate) fn single_calls(&self) -> Vec<SingleCall> {
        self.single_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamTransport for MockTransport {
    async fn put_records(
        &self,
        stream: &str,
        records: &[StreamRecord],
    ) -> Result<PutRecordsResponse, TransportError> {
        self.batch_calls.lock().unwrap().push(BatchCall {
            stream: stream.to_string(),
            partition_keys: records.iter().map(|r| r.partition_key().to_string()).collect(),
            payloads: records.iter().map(|r| r.payload().clone()).collect(),
        });

        match self.batch_script.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(PutRecordsResponse::success(records.len())),
        }
    }

    async fn put_record(
        &self,
        stream: &str,
        record: &StreamRecord,
    ) -> Result<(), TransportError> {
        self.single_calls.lock().unwrap().push(SingleCall {
            stream: stream.to_string(),
            partition_key: record.partition_key().to_string(),
            payload: record.payload().clone(),
        });

        match self.single_script.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(()),
        }
    }
}

// =============================================================================
// Scripted provisioner and bulk store
// =============================================================================

pub(crate) struct MockProvisioner {
    calls: AtomicUsize,
    failure: Option<String>,
}

impl MockProvisioner {
    pub(crate) fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failure: None,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failure: Some(message.to_string()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamProvisioner for MockProvisioner {
    async fn create_and_wait(&self, stream: &str, _min_shards: u32) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(TransportError::ProvisioningFailed {
                stream: stream.to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub(crate) struct MockBulk {
    uploads: Mutex<Vec<(String, usize)>>,
    failure: Option<String>,
}

impl MockBulk {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub(crate) fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl BulkUploader for MockBulk {
    async fn upload(&self, project: &str, events: &[Event]) -> Result<(), BulkUploadError> {
        self.uploads
            .lock()
            .unwrap()
            .push((project.to_string(), events.len()));
        match &self.failure {
            Some(message) => Err(BulkUploadError::Upload(message.clone())),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Store harness
// =============================================================================

pub(crate) struct Harness {
    pub(crate) transport: Arc<MockTransport>,
    pub(crate) provisioner: Arc<MockProvisioner>,
    pub(crate) bulk: Arc<MockBulk>,
    pub(crate) store: StreamEventStore,
}

pub(crate) fn harness() -> Harness {
    harness_with(
        StreamStoreConfig::default().with_stream_name("events-test"),
        MockProvisioner::ok(),
        MockBulk::new(),
    )
}

pub(crate) fn harness_with(
    config: StreamStoreConfig,
    provisioner: MockProvisioner,
    bulk: MockBulk,
) -> Harness {
    let transport = Arc::new(MockTransport::new());
    let provisioner = Arc::new(provisioner);
    let bulk = Arc::new(bulk);

    let store = StreamEventStore::new(
        Arc::clone(&transport) as Arc<dyn StreamTransport>,
        Arc::clone(&provisioner) as Arc<dyn StreamProvisioner>,
        Arc::clone(&bulk) as Arc<dyn BulkUploader>,
        config,
    );

    Harness {
        transport,
        provisioner,
        bulk,
        store,
    }
}
