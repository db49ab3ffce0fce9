// src/api/response.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::{SearchError, StoreError, TopPicksError};

/// JSON envelope shared by every endpoint: `{success, data, error}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

impl From<TopPicksError> for ApiError {
    fn from(err: TopPicksError) -> Self {
        let message = err.to_string();
        match err {
            TopPicksError::ProfileNotFound(_) => ApiError::NotFound(message),
            TopPicksError::Search(SearchError::InvalidCoordinate { .. }) => {
                ApiError::BadRequest(message)
            }
            TopPicksError::Search(SearchError::DeadlineExceeded(_)) => ApiError::Timeout(message),
            TopPicksError::Search(_) | TopPicksError::Store(_) => ApiError::Internal(message),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn api_success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn maps_search_failures_to_statuses() {
        let cases = [
            (TopPicksError::ProfileNotFound("x".into()), StatusCode::NOT_FOUND),
            (
                TopPicksError::Search(SearchError::DeadlineExceeded(Duration::from_secs(10))),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                TopPicksError::Search(SearchError::InvalidCoordinate {
                    latitude: 91.0,
                    longitude: 0.0,
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                TopPicksError::Store(StoreError::Pool("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn keeps_error_message() {
        let err = ApiError::from(TopPicksError::ProfileNotFound("ghost".into()));
        assert_eq!(err.to_string(), "Profile not found: ghost");
    }
}
