use crate::response::ErrorEnvelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Service Unavailable")]
    ServiceUnavailable,

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The client-facing detail, without the variant prefix used by `Display`.
    pub fn detail(&self) -> String {
        match self {
            AppError::BadRequest(err)
            | AppError::NotFound(err)
            | AppError::InternalError(err)
            | AppError::DatabaseError(err)
            | AppError::ConfigError(err) => format!("{:#}", err),
            AppError::ServiceUnavailable => "Service unavailable".to_string(),
        }
    }

    /// Attach the endpoint-level message that heads the error envelope.
    pub fn context(self, message: impl Into<Cow<'static, str>>) -> ApiError {
        ApiError {
            message: message.into(),
            source: self,
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "Bad request",
            AppError::NotFound(_) => "Resource not found!",
            AppError::ServiceUnavailable => "Service unavailable",
            AppError::InternalError(_) => "Internal server error",
            AppError::DatabaseError(_) => "Database error",
            AppError::ConfigError(_) => "Configuration error",
        }
    }
}

/// An [`AppError`] paired with the message of the operation that failed.
#[derive(Debug)]
pub struct ApiError {
    message: Cow<'static, str>,
    source: AppError,
}

impl ApiError {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn app_error(&self) -> &AppError {
        &self.source
    }

    pub fn status_code(&self) -> StatusCode {
        self.source.status_code()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.message, self.source)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.source.status_code();
        let body = ErrorEnvelope {
            message: self.message,
            error: self.source.detail(),
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.default_message();
        self.context(message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("Body is not JSON")
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::BadRequest(anyhow::anyhow!("x")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound(anyhow::anyhow!("x")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DatabaseError(anyhow::anyhow!("x")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_detail_omits_variant_prefix() {
        let err = AppError::BadRequest(anyhow::anyhow!("Invalid count parameter!"));
        assert_eq!(err.detail(), "Invalid count parameter!");
        assert_eq!(err.to_string(), "Bad request: Invalid count parameter!");
    }

    #[tokio::test]
    async fn test_context_renders_envelope() {
        let response = AppError::BadRequest(anyhow::anyhow!("Invalid count parameter!"))
            .context("Failed to retrieve articles!")
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Failed to retrieve articles!");
        assert_eq!(body["error"], "Invalid count parameter!");
    }

    #[tokio::test]
    async fn test_bare_error_uses_default_message() {
        let response = AppError::NotFound(anyhow::anyhow!("No route for /nope")).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Resource not found!");
        assert_eq!(body["error"], "No route for /nope");
    }
}
