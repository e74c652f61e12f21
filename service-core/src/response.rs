//! The `{message, data}` / `{message, error}` envelope shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Successful response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: Cow<'static, str>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: Cow<'static, str>,
    pub error: String,
}
