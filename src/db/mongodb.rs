use anyhow::Context;
use async_trait::async_trait;
use log::{debug, info, warn};
use mongodb::bson::doc;
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::{Client, Collection, Database};

use crate::config::settings::Settings;
use crate::db::documents::{StorageError, VisitDocuments};
use crate::models::visitor_log::VisitorLog;

/// Visits collection reached over the MongoDB wire protocol
/// (Azure Cosmos DB for MongoDB, or a plain MongoDB deployment).
///
/// The partition key travels inside the document as `ipAddress`, which is
/// the shard key of the collection.
pub struct MongoVisitDocuments {
    client: Client,
    database: Database,
    visits: Collection<VisitorLog>,
}

impl MongoVisitDocuments {
    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(&settings.connection_string)
            .await
            .context("Error initializing CosmosDB client.")?;

        let database = client.database(&settings.database_name);
        let visits = database.collection::<VisitorLog>(&settings.collection_name);

        // The driver connects lazily; an unreachable server is reported here but
        // does not stop the service, the health check keeps reporting it.
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => info!(
                "Connected to {}/{}",
                settings.database_name, settings.collection_name
            ),
            Err(e) => warn!("Database did not answer the startup ping: {}", e),
        }

        Ok(Self {
            client,
            database,
            visits,
        })
    }
}

fn to_storage_error(err: MongoError) -> StorageError {
    match err.kind.as_ref() {
        ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
            StorageError::Unexpected {
                message: err.to_string(),
            }
        }
        _ => StorageError::Database {
            message: err.to_string(),
        },
    }
}

#[async_trait]
impl VisitDocuments for MongoVisitDocuments {
    async fn insert(&self, visit: &VisitorLog, partition_key: &str) -> Result<(), StorageError> {
        debug!("Inserting document {} into partition {}", visit.id, partition_key);

        self.visits
            .insert_one(visit)
            .await
            .map_err(to_storage_error)?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(to_storage_error)?;

        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
