//! Persistence seam between the visitor store and the document database.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::visitor_log::VisitorLog;

/// Failures reported by a document backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database rejected the operation or could not be reached.
    #[error("CosmosDB Error: {message}")]
    Database { message: String },

    /// Anything else that went wrong while preparing or sending the document.
    #[error("Error: {message}")]
    Unexpected { message: String },
}

/// Insert-only access to the visits collection.
///
/// Implementations are shared by every in-flight request and must be safe
/// for concurrent use.
#[async_trait]
pub trait VisitDocuments: Send + Sync + 'static {
    /// Inserts `visit` as a new document routed by `partition_key`.
    async fn insert(&self, visit: &VisitorLog, partition_key: &str) -> Result<(), StorageError>;

    /// Round-trips to the backend without touching any document.
    async fn ping(&self) -> Result<(), StorageError>;

    /// Releases the underlying connection. Called once during shutdown.
    async fn close(&self) {}
}
