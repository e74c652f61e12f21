pub mod database;
pub mod metrics;
pub mod store;

pub use database::MongoArticleStore;
pub use self::metrics::{get_metrics, init_metrics};
pub use store::{ArticleStore, InMemoryArticleStore, StoreError};
