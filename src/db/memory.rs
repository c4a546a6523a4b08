//! In-memory backends used by the handler and store tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::documents::{StorageError, VisitDocuments};
use crate::models::visitor_log::VisitorLog;

/// Keeps documents grouped by partition key. Inserting an id that already
/// exists in the same partition is a conflict, as on the real service.
#[derive(Default)]
pub struct MemoryVisitDocuments {
    partitions: RwLock<HashMap<String, Vec<VisitorLog>>>,
}

impl MemoryVisitDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn partition(&self, partition_key: &str) -> Vec<VisitorLog> {
        self.partitions
            .read()
            .await
            .get(partition_key)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn all(&self) -> Vec<VisitorLog> {
        self.partitions
            .read()
            .await
            .values()
            .flatten()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VisitDocuments for MemoryVisitDocuments {
    async fn insert(&self, visit: &VisitorLog, partition_key: &str) -> Result<(), StorageError> {
        let mut partitions = self.partitions.write().await;
        let documents = partitions.entry(partition_key.to_string()).or_default();

        if documents.iter().any(|existing| existing.id == visit.id) {
            return Err(StorageError::Database {
                message: format!("Conflict: document {} already exists", visit.id),
            });
        }

        documents.push(visit.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Fails every call with the configured error.
pub struct FailingVisitDocuments {
    pub message: String,
    pub database: bool,
}

impl FailingVisitDocuments {
    pub fn database(message: &str) -> Self {
        Self {
            message: message.to_string(),
            database: true,
        }
    }

    pub fn unexpected(message: &str) -> Self {
        Self {
            message: message.to_string(),
            database: false,
        }
    }

    fn error(&self) -> StorageError {
        if self.database {
            StorageError::Database {
                message: self.message.clone(),
            }
        } else {
            StorageError::Unexpected {
                message: self.message.clone(),
            }
        }
    }
}

#[async_trait]
impl VisitDocuments for FailingVisitDocuments {
    async fn insert(&self, _visit: &VisitorLog, _partition_key: &str) -> Result<(), StorageError> {
        Err(self.error())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Err(self.error())
    }
}
