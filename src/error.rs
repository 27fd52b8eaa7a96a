use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} is not configured")]
    MissingConfig(&'static str),
    #[error("{0} is not a valid setting")]
    InvalidConfig(&'static str),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("upstream answered {0}")]
    UpstreamStatus(reqwest::StatusCode),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password check: {0}")]
    Password(#[from] bcrypt::BcryptError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::MissingConfig(key) => {
                tracing::error!("request needs {} but it is not configured", key);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::MISSING_CONFIG.to_string(),
                )
            }
            AppError::InvalidConfig(key) => {
                tracing::error!("request needs {} but its value is unusable", key);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INVALID_CONFIG.to_string(),
                )
            }
            AppError::Upstream(_) | AppError::UpstreamStatus(_) => {
                tracing::warn!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::UNKNOWN_ERROR.to_string(),
                )
            }
            // not-found and connection failures look the same to the caller
            AppError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND.to_string()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                error_codes::UNAUTHORIZED.to_string(),
            ),
            AppError::Token(_) | AppError::Password(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::UNKNOWN_ERROR.to_string(),
                )
            }
        };

        (status, error_to_api_response::<()>(error)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_row_is_a_500_with_the_database_message() {
        let (status, body) = body_json(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], sqlx::Error::RowNotFound.to_string());
    }

    #[tokio::test]
    async fn upstream_failures_are_generic() {
        let (status, body) =
            body_json(AppError::UpstreamStatus(reqwest::StatusCode::BAD_GATEWAY)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "unknown_error");
    }

    #[tokio::test]
    async fn missing_config_is_a_fixed_500() {
        let (status, body) = body_json(AppError::MissingConfig("KAKAO_REST_API_KEY")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "missing_config");
    }

    #[tokio::test]
    async fn invalid_config_is_a_500() {
        let (status, body) = body_json(AppError::InvalidConfig("KAKAO_AUTH_BASE")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "invalid_config");
    }
}
