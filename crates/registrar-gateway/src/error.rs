// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of registrar errors onto HTTP responses.

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use registrar_core::RegistrarError;
use serde::{Serialize, de::DeserializeOwned};
use tracing::error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Anything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or unknown bearer token.
    Unauthorized,
    /// The principal's role may not call this route.
    Forbidden,
    Registrar(RegistrarError),
}

impl From<RegistrarError> for ApiError {
    fn from(e: RegistrarError) -> Self {
        Self::Registrar(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Registrar(e) => match e {
                RegistrarError::NotFound(_) => StatusCode::NOT_FOUND,
                RegistrarError::Conflict(_) => StatusCode::CONFLICT,
                RegistrarError::BadRequest(_) | RegistrarError::InvalidTransition { .. } => {
                    StatusCode::BAD_REQUEST
                }
                RegistrarError::Config(_)
                | RegistrarError::Storage { .. }
                | RegistrarError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Unauthorized => "unauthorized".to_string(),
            Self::Forbidden => "forbidden".to_string(),
            Self::Registrar(e) if e.is_client_error() => e.to_string(),
            Self::Registrar(e) => {
                error!(error = %e, "request failed");
                "internal server error".to_string()
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// `Json` whose rejections use the same error body as every other failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| RegistrarError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}
