//! Runs against a live MongoDB (`TEST_MONGODB_URI`, default localhost).
//! Use `cargo test -- --ignored` to include these.

mod common;

use article_service::models::Article;
use article_service::services::{ArticleStore, MongoArticleStore, StoreError};
use common::{new_article, test_config};
use std::collections::HashSet;

async fn seeded_store(count: usize) -> (MongoArticleStore, Vec<Article>) {
    let config = test_config();
    let store = MongoArticleStore::connect(&config.mongodb)
        .await
        .expect("Failed to connect to MongoDB");

    let articles: Vec<Article> = (0..count).map(|i| Article::new(new_article(i))).collect();
    store
        .articles()
        .insert_many(articles.clone(), None)
        .await
        .expect("Failed to seed articles");

    (store, articles)
}

async fn cleanup(store: &MongoArticleStore) {
    let _ = store.database().drop(None).await;
}

#[tokio::test]
#[ignore = "Requires MongoDB to be running"]
async fn sample_uses_server_side_sampling() {
    let (store, articles) = seeded_store(5).await;

    let sample = store.sample_random(2).await.unwrap();
    assert_eq!(sample.len(), 2);

    let all = store.sample_random(50).await.unwrap();
    let ids: HashSet<_> = all.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), articles.len());

    assert!(store.sample_random(0).await.unwrap().is_empty());

    cleanup(&store).await;
}

#[tokio::test]
#[ignore = "Requires MongoDB to be running"]
async fn find_by_id_round_trips_stored_record() {
    let (store, articles) = seeded_store(3).await;

    let found = store.find_by_id(&articles[1].id.to_hex()).await.unwrap();
    assert_eq!(found.as_ref(), Some(&articles[1]));

    let missing = mongodb::bson::oid::ObjectId::new().to_hex();
    assert!(store.find_by_id(&missing).await.unwrap().is_none());

    let err = store.find_by_id("xyz").await.unwrap_err();
    assert!(matches!(err, StoreError::MalformedId(_)));

    store.health_check().await.expect("ping failed");

    cleanup(&store).await;
}
