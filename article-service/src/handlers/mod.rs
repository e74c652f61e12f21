pub mod articles;
pub mod health;

pub use articles::{get_article, list_articles, missing_article_id, not_found};
pub use health::{health_check, metrics_endpoint, readiness_check};
