// Application error type and its conversion into HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::zapsell_api::ApiError;

#[derive(Debug)]
pub enum AppError {
    InternalServerError(anyhow::Error),
    NotFound(String),
    // The listing API failed; the storefront itself is fine
    BadGateway(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::InternalServerError(error)
    }
}

impl From<askama::Error> for AppError {
    fn from(error: askama::Error) -> Self {
        tracing::error!("Failed to render template: {}", error);
        AppError::InternalServerError(anyhow::Error::new(error))
    }
}

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NotFound(id) => AppError::NotFound(format!("Car '{}' not found", id)),
            other => AppError::BadGateway(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                // Don't expose internal details to the client
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::NotFound(message) => {
                tracing::info!("Not found: {}", message);
                (StatusCode::NOT_FOUND, message)
            }
            AppError::BadGateway(message) => {
                tracing::error!("Listing API failure: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    "The car listings are temporarily unavailable".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_http_statuses() {
        let not_found: AppError = ApiError::NotFound("17".into()).into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let upstream: AppError = ApiError::Status { status: StatusCode::SERVICE_UNAVAILABLE }.into();
        assert_eq!(upstream.into_response().status(), StatusCode::BAD_GATEWAY);

        let internal: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(internal.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
