use std::sync::Arc;

use log::{error, info};

use crate::config::settings::Settings;
use crate::db::documents::{StorageError, VisitDocuments};
use crate::db::mongodb::MongoVisitDocuments;
use crate::models::visitor_log::VisitorLog;

pub const VISIT_LOGGED: &str = "Visit logged successfully.";
pub const INVALID_VISIT: &str = "Invalid visitor log data.";

/// Result of a single attempt to persist a visit.
#[derive(Debug)]
pub enum LogOutcome {
    Logged(String),
    StorageFailed(StorageError),
    ValidationFailed(String),
}

impl LogOutcome {
    /// Human readable outcome, as reported to the caller.
    pub fn message(&self) -> String {
        match self {
            LogOutcome::Logged(message) => message.clone(),
            LogOutcome::StorageFailed(err) => err.to_string(),
            LogOutcome::ValidationFailed(details) => format!("Error: {}", details),
        }
    }
}

/// Owns the long-lived document store handle. Cloning shares the handle.
#[derive(Clone)]
pub struct VisitorStore {
    documents: Arc<dyn VisitDocuments>,
}

impl VisitorStore {
    pub fn new(documents: Arc<dyn VisitDocuments>) -> Self {
        Self { documents }
    }

    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        let documents = MongoVisitDocuments::connect(settings).await?;
        Ok(Self::new(Arc::new(documents)))
    }

    /// Makes exactly one insert attempt. Never fails; the outcome says what happened.
    pub async fn log_visit(&self, visit: &mut VisitorLog) -> LogOutcome {
        if !visit.has_page() {
            error!("Failed to log visit: {}", INVALID_VISIT);
            return LogOutcome::ValidationFailed(INVALID_VISIT.to_string());
        }

        visit.touch();

        info!(
            "Inserting visit for {} from IP {}.",
            visit.page_visited, visit.ip_address
        );

        match self.documents.insert(visit, &visit.ip_address).await {
            Ok(()) => {
                info!("Visit logged successfully.");
                LogOutcome::Logged(VISIT_LOGGED.to_string())
            }
            Err(err) => {
                error!("Failed to log visit {}: {}", visit.id, err);
                LogOutcome::StorageFailed(err)
            }
        }
    }

    pub async fn ping(&self) -> Result<(), StorageError> {
        self.documents.ping().await
    }

    pub async fn shutdown(&self) {
        info!("Closing document store connection");
        self.documents.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::{FailingVisitDocuments, MemoryVisitDocuments};
    use crate::models::visitor_log::UNKNOWN;
    use chrono::Utc;

    #[actix_web::test]
    async fn logs_visit_into_its_ip_partition() {
        let documents = Arc::new(MemoryVisitDocuments::new());
        let store = VisitorStore::new(documents.clone());

        let mut visit = VisitorLog::new("/home".into());
        visit.ip_address = "10.0.0.1".into();

        let outcome = store.log_visit(&mut visit).await;
        assert!(matches!(outcome, LogOutcome::Logged(_)));
        assert_eq!(outcome.message(), "Visit logged successfully.");

        let stored = documents.partition("10.0.0.1").await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, visit.id);
    }

    #[actix_web::test]
    async fn overwrites_date_before_insert() {
        let store = VisitorStore::new(Arc::new(MemoryVisitDocuments::new()));

        let mut visit = VisitorLog::new("/home".into());
        visit.date = Utc::now() - chrono::Duration::days(3);
        let before = Utc::now();

        store.log_visit(&mut visit).await;
        assert!(visit.date >= before);
    }

    #[actix_web::test]
    async fn blank_page_is_rejected_without_insert() {
        let documents = Arc::new(MemoryVisitDocuments::new());
        let store = VisitorStore::new(documents.clone());

        let mut visit = VisitorLog::new("   ".into());
        let outcome = store.log_visit(&mut visit).await;

        assert!(matches!(outcome, LogOutcome::ValidationFailed(_)));
        assert_eq!(outcome.message(), "Error: Invalid visitor log data.");
        assert!(documents.all().await.is_empty());
    }

    #[actix_web::test]
    async fn unknown_partition_accepts_many_visits() {
        let documents = Arc::new(MemoryVisitDocuments::new());
        let store = VisitorStore::new(documents.clone());

        for _ in 0..3 {
            let mut visit = VisitorLog::new("/home".into());
            let outcome = store.log_visit(&mut visit).await;
            assert!(matches!(outcome, LogOutcome::Logged(_)));
        }

        let stored = documents.partition(UNKNOWN).await;
        assert_eq!(stored.len(), 3);
        assert_ne!(stored[0].id, stored[1].id);
        assert_ne!(stored[1].id, stored[2].id);
    }

    #[actix_web::test]
    async fn duplicate_id_in_partition_is_a_database_error() {
        let store = VisitorStore::new(Arc::new(MemoryVisitDocuments::new()));

        let mut visit = VisitorLog::new("/home".into());
        store.log_visit(&mut visit).await;
        let outcome = store.log_visit(&mut visit).await;

        assert!(outcome.message().starts_with("CosmosDB Error: "));
    }

    #[actix_web::test]
    async fn storage_errors_are_reported_not_raised() {
        let store = VisitorStore::new(Arc::new(FailingVisitDocuments::database(
            "Request rate is large",
        )));
        let outcome = store.log_visit(&mut VisitorLog::new("/home".into())).await;
        assert_eq!(outcome.message(), "CosmosDB Error: Request rate is large");

        let store = VisitorStore::new(Arc::new(FailingVisitDocuments::unexpected(
            "document too large",
        )));
        let outcome = store.log_visit(&mut VisitorLog::new("/home".into())).await;
        assert_eq!(outcome.message(), "Error: document too large");
    }
}
