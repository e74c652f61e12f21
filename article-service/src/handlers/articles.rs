use crate::dtos::{ArticleResponse, ListArticlesParams};
use crate::services::metrics::{record_lookup, record_sample};
use crate::services::StoreError;
use crate::startup::AppState;
use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::Uri,
};
use service_core::error::{ApiError, AppError};
use service_core::response::Envelope;

const ARTICLES_RETRIEVED: &str = "Articles retrieved successfully!";
const ARTICLES_FAILED: &str = "Failed to retrieve articles!";
const ARTICLE_RETRIEVED: &str = "Article retrieved successfully!";
const ARTICLE_BY_ID_FAILED: &str = "Failed to retrieve article by id!";
const ARTICLE_FAILED: &str = "Failed to retrieve article!";

const INVALID_COUNT: &str = "Invalid count parameter!";
const INVALID_ARTICLE_ID: &str = "Invalid articleId parameter!";
const MALFORMED_ARTICLE_ID: &str = "Malformed articleId parameter!";
const ARTICLE_NOT_FOUND: &str = "Article not found!";
pub(crate) const STORE_UNAVAILABLE: &str = "Article store unavailable";

/// Interpret the `count` query value.
///
/// The value must read as a finite number; its count is the leading integer
/// (optional sign, then decimal digits), so `2.9` is 2 and `1e2` is 1.
/// Missing, empty, non-numeric, negative or out-of-range values yield `None`.
pub fn parse_count(raw: Option<&str>) -> Option<u64> {
    let trimmed = raw?.trim();
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let count: u64 = digits.parse().ok()?;
    if count > i64::MAX as u64 || (negative && count != 0) {
        return None;
    }
    Some(count)
}

/// GET /articles?count=N
pub async fn list_articles(
    State(state): State<AppState>,
    params: Result<Query<ListArticlesParams>, QueryRejection>,
) -> Result<Envelope<Vec<ArticleResponse>>, ApiError> {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!("Rejected article list query: {}", rejection);
            ListArticlesParams::default()
        }
    };

    let count = parse_count(params.count.as_deref()).ok_or_else(|| {
        tracing::debug!(count = ?params.count, "Invalid count parameter");
        AppError::BadRequest(anyhow::anyhow!(INVALID_COUNT)).context(ARTICLES_FAILED)
    })?;

    let articles = state
        .store
        .sample_random(count)
        .await
        .map_err(|e| store_failure(&state, anyhow::Error::new(e)).context(ARTICLES_FAILED))?;

    record_sample(count, articles.len());
    tracing::info!(
        requested = count,
        returned = articles.len(),
        "Sampled articles"
    );

    let data = articles.into_iter().map(ArticleResponse::from).collect();
    Ok(Envelope::new(ARTICLES_RETRIEVED, data))
}

/// GET /article/:id
///
/// Unknown ids are a 404 unless the legacy `null_on_missing` mode is on, in
/// which case they answer 200 with `data: null`.
pub async fn get_article(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Envelope<Option<ArticleResponse>>, ApiError> {
    let id = match id {
        Ok(Path(id)) if !id.is_empty() => id,
        Ok(_) => return Err(missing_id()),
        Err(rejection) => {
            tracing::debug!("Rejected article id: {}", rejection);
            return Err(missing_id());
        }
    };

    match state.store.find_by_id(&id).await {
        Ok(Some(article)) => {
            record_lookup("found");
            tracing::debug!(article_id = %id, "Article found");
            Ok(Envelope::new(
                ARTICLE_RETRIEVED,
                Some(ArticleResponse::from(article)),
            ))
        }
        Ok(None) => {
            record_lookup("not_found");
            tracing::info!(article_id = %id, "Article not found");
            if state.config.api.null_on_missing {
                Ok(Envelope::new(ARTICLE_RETRIEVED, None))
            } else {
                Err(AppError::NotFound(anyhow::anyhow!(ARTICLE_NOT_FOUND)).context(ARTICLE_FAILED))
            }
        }
        Err(StoreError::MalformedId(_)) => {
            record_lookup("malformed_id");
            tracing::debug!(article_id = %id, "Malformed article id");
            Err(AppError::BadRequest(anyhow::anyhow!(MALFORMED_ARTICLE_ID))
                .context(ARTICLE_BY_ID_FAILED))
        }
        Err(StoreError::Backend(e)) => {
            record_lookup("error");
            Err(store_failure(&state, e).context(ARTICLE_FAILED))
        }
    }
}

/// GET /article and /article/ (no id segment)
pub async fn missing_article_id() -> ApiError {
    missing_id()
}

/// Fallback for routes that do not exist.
pub async fn not_found(uri: Uri) -> ApiError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path())).context("Resource not found!")
}

fn missing_id() -> ApiError {
    AppError::BadRequest(anyhow::anyhow!(INVALID_ARTICLE_ID)).context(ARTICLE_BY_ID_FAILED)
}

fn store_failure(state: &AppState, err: anyhow::Error) -> AppError {
    tracing::error!("Article store request failed: {:#}", err);
    if state.config.api.expose_store_errors {
        AppError::DatabaseError(err)
    } else {
        AppError::DatabaseError(anyhow::anyhow!(STORE_UNAVAILABLE))
    }
}
