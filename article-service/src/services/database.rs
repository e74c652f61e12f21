use super::store::{ArticleStore, StoreError};
use crate::config::MongoConfig;
use crate::models::{parse_article_id, Article};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::ClientOptions,
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

/// Article store backed by a MongoDB collection.
///
/// One client is opened at startup and shared by every request; the driver
/// pools connections internally.
#[derive(Clone)]
pub struct MongoArticleStore {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoArticleStore {
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!(database = %config.database, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            tracing::error!("Invalid MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        options.app_name = Some("article-service".to_string());
        options.connect_timeout = Some(config.timeout());
        options.server_selection_timeout = Some(config.timeout());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB client ready"
        );

        Ok(Self {
            client,
            db,
            collection: config.collection.clone(),
        })
    }

    pub fn articles(&self) -> Collection<Article> {
        self.db.collection(&self.collection)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ArticleStore for MongoArticleStore {
    async fn sample_random(&self, count: u64) -> Result<Vec<Article>, StoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let size = i64::try_from(count).map_err(|_| {
            StoreError::Backend(anyhow::anyhow!("Sample size {} is out of range", count))
        })?;

        let cursor = self
            .articles()
            .aggregate(vec![doc! { "$sample": { "size": size } }], None)
            .await
            .map_err(|e| {
                tracing::error!(size, "Article sample aggregation failed: {}", e);
                StoreError::from(e)
            })?;

        let documents: Vec<bson::Document> = cursor.try_collect().await?;
        let articles = documents
            .into_iter()
            .map(bson::from_document::<Article>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(articles)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, StoreError> {
        let oid = parse_article_id(id).ok_or_else(|| StoreError::MalformedId(id.to_string()))?;

        let article = self
            .articles()
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                tracing::error!(article_id = %id, "Article lookup failed: {}", e);
                StoreError::from(e)
            })?;

        Ok(article)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }

    async fn shutdown(&self) {
        tracing::info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}
