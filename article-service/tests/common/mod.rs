#![allow(dead_code)]

use article_service::config::{
    ApiConfig, ArticleConfig, HttpConfig, MongoConfig, StoreBackend, StoreConfig,
};
use article_service::models::{Article, NewArticle};
use article_service::services::{ArticleStore, InMemoryArticleStore, StoreError};
use article_service::startup::Application;
use async_trait::async_trait;
use service_core::config::Config as CoreConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn test_config() -> ArticleConfig {
    ArticleConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: format!("article_test_{}", uuid::Uuid::new_v4().simple()),
            collection: "articles".to_string(),
            timeout_secs: 5,
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
            seed_path: None,
        },
        http: HttpConfig::default(),
        api: ApiConfig::default(),
    }
}

pub fn new_article(n: usize) -> NewArticle {
    NewArticle {
        publish_date: format!("2024-12-03 15:{:02}:00+00:00", n % 60),
        publisher: ["Fox News", "CNN", "Reuters"][n % 3].to_string(),
        authors: vec![format!("Author{}", n), format!("Author{}", n + 1)],
        headline: format!("Headline {}", n),
        body: format!("Body of article {}", n),
        political_affiliation: ["left", "right", "center"][n % 3].to_string(),
    }
}

pub fn seeded_articles(n: usize) -> Vec<Article> {
    (0..n).map(|i| Article::new(new_article(i))).collect()
}

/// Wraps a store and counts how often each operation reaches it.
pub struct CountingStore {
    inner: Arc<dyn ArticleStore>,
    samples: AtomicUsize,
    lookups: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn ArticleStore>) -> Self {
        Self {
            inner,
            samples: AtomicUsize::new(0),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn sample_calls(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleStore for CountingStore {
    async fn sample_random(&self, count: u64) -> Result<Vec<Article>, StoreError> {
        self.samples.fetch_add(1, Ordering::SeqCst);
        self.inner.sample_random(count).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

/// A store whose backend is always down.
pub struct FailingStore;

#[async_trait]
impl ArticleStore for FailingStore {
    async fn sample_random(&self, _count: u64) -> Result<Vec<Article>, StoreError> {
        Err(StoreError::Backend(anyhow::anyhow!(
            "connection refused: 10.0.0.12:27017"
        )))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, StoreError> {
        if article_service::models::parse_article_id(id).is_none() {
            return Err(StoreError::MalformedId(id.to_string()));
        }
        Err(StoreError::Backend(anyhow::anyhow!(
            "connection refused: 10.0.0.12:27017"
        )))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Backend(anyhow::anyhow!("ping timed out")))
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub articles: Vec<Article>,
    pub store: Arc<CountingStore>,
}

impl TestApp {
    /// Spawn the service over an in-memory store holding `count` articles.
    pub async fn spawn(count: usize) -> Self {
        Self::spawn_with(test_config(), count).await
    }

    pub async fn spawn_with(config: ArticleConfig, count: usize) -> Self {
        let articles = seeded_articles(count);
        let memory: Arc<dyn ArticleStore> =
            Arc::new(InMemoryArticleStore::with_articles(articles.clone()));
        let store = Arc::new(CountingStore::new(memory));

        let port = Self::start(config, store.clone()).await;

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            articles,
            store,
        }
    }

    /// Spawn the service over an arbitrary store and return its base URL.
    pub async fn spawn_over(config: ArticleConfig, store: Arc<dyn ArticleStore>) -> String {
        let port = Self::start(config, store).await;
        format!("http://127.0.0.1:{}", port)
    }

    async fn start(config: ArticleConfig, store: Arc<dyn ArticleStore>) -> u16 {
        let app = Application::build_with_store(config, store)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_with_shutdown(std::future::pending()).await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        port
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
