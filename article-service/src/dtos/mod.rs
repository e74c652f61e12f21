pub mod articles;

pub use articles::{ArticleResponse, ListArticlesParams};
