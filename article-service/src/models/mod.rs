pub mod article;

pub use article::{parse_article_id, Article, NewArticle};
