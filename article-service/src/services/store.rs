use crate::models::{Article, NewArticle};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use service_core::error::AppError;
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier cannot be an ObjectId; no query was issued.
    #[error("Malformed article id: {0}")]
    MalformedId(String),

    /// Transport, timeout, query or decoding failure in the backing store.
    #[error("Article store failure: {0}")]
    Backend(anyhow::Error),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(anyhow::Error::new(err))
    }
}

impl From<mongodb::bson::de::Error> for StoreError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        StoreError::Backend(anyhow::Error::new(err))
    }
}

/// Read access to the article collection.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Up to `count` distinct articles chosen uniformly at random, in no
    /// particular order. Returns everything when the collection is smaller.
    async fn sample_random(&self, count: u64) -> Result<Vec<Article>, StoreError>;

    /// `Ok(None)` when no article has this id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Release the underlying connection. Called once after the server stops.
    async fn shutdown(&self) {}
}

/// Article store held in process memory.
#[derive(Default)]
pub struct InMemoryArticleStore {
    articles: RwLock<Vec<Article>>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: RwLock::new(articles),
        }
    }

    /// Build a store from a JSON array of article contents.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!("Failed to read article seed file {}: {}", path.display(), e);
            AppError::from(e)
        })?;
        let contents: Vec<NewArticle> = serde_json::from_slice(&raw).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid article seed file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            count = contents.len(),
            "Seeded in-memory article store"
        );

        Ok(Self::with_articles(
            contents.into_iter().map(Article::new).collect(),
        ))
    }

    pub async fn insert(&self, content: NewArticle) -> Article {
        let article = Article::new(content);
        self.articles.write().await.push(article.clone());
        article
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn sample_random(&self, count: u64) -> Result<Vec<Article>, StoreError> {
        let articles = self.articles.read().await;
        let amount = usize::try_from(count).unwrap_or(usize::MAX);
        let sample = articles
            .choose_multiple(&mut rand::thread_rng(), amount)
            .cloned()
            .collect();
        Ok(sample)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, StoreError> {
        let oid = crate::models::parse_article_id(id)
            .ok_or_else(|| StoreError::MalformedId(id.to_string()))?;
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|a| a.id == oid).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
