use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A news article as persisted in the `articles` collection.
///
/// Field names follow the stored layout: camelCase content fields, the
/// store-assigned `_id` and the `__v` revision counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub publish_date: String,
    pub publisher: String,
    pub authors: Vec<String>,
    pub headline: String,
    pub body: String,
    pub political_affiliation: String,
    #[serde(rename = "__v", default)]
    pub version: i64,
}

/// Article content without the store-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub publish_date: String,
    pub publisher: String,
    pub authors: Vec<String>,
    pub headline: String,
    pub body: String,
    pub political_affiliation: String,
}

impl Article {
    pub fn new(content: NewArticle) -> Self {
        Self {
            id: ObjectId::new(),
            publish_date: content.publish_date,
            publisher: content.publisher,
            authors: content.authors,
            headline: content.headline,
            body: content.body,
            political_affiliation: content.political_affiliation,
            version: 0,
        }
    }
}

/// Article identifiers are 24 hex digit ObjectIds; anything else is rejected
/// before the store is queried.
pub fn parse_article_id(raw: &str) -> Option<ObjectId> {
    if raw.len() != 24 {
        return None;
    }
    ObjectId::parse_str(raw).ok()
}
