use crate::models::Article;
use serde::{Deserialize, Serialize};

/// Wire shape of an article. Names match what existing clients read,
/// including `_id` (hex string) and `__v`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub publish_date: String,
    pub publisher: String,
    pub authors: Vec<String>,
    pub headline: String,
    pub body: String,
    pub political_affiliation: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "__v")]
    pub version: i64,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            publish_date: article.publish_date,
            publisher: article.publisher,
            authors: article.authors,
            headline: article.headline,
            body: article.body,
            political_affiliation: article.political_affiliation,
            id: article.id.to_hex(),
            version: article.version,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesParams {
    pub count: Option<String>,
}
