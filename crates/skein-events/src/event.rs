//! Event - the immutable unit of input data
//!
//! Events are produced upstream (HTTP collectors, connectors) and owned by
//! the caller of the ingestion API; the pipeline only reads them.

use crate::record::Record;

/// One analytics event: a tenant, a collection, and schema-typed properties
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    project: String,
    collection: String,
    properties: Record,
}

impl Event {
    /// Create a new event
    pub fn new(
        project: impl Into<String>,
        collection: impl Into<String>,
        properties: Record,
    ) -> Self {
        Self {
            project: project.into(),
            collection: collection.into(),
            properties,
        }
    }

    /// Tenant identifier
    #[inline]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Event-type identifier within the tenant
    #[inline]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Schema-typed property values
    #[inline]
    pub fn properties(&self) -> &Record {
        &self.properties
    }

    /// Partition key used to route/shard records in the streaming store
    ///
    /// Derived deterministically so all events of one collection land on
    /// the same shard: `"{project}|{collection}"`.
    pub fn partition_key(&self) -> String {
        format!("{}|{}", self.project, self.collection)
    }
}
