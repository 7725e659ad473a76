use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::schedule::ScheduleError;
use crate::sheet::SheetError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}

impl From<SheetError> for ApiError {
    fn from(value: SheetError) -> Self {
        match value {
            SheetError::WorksheetNotFound(_) => ApiError::NotFound(value.to_string()),
            SheetError::Http(err) => {
                error!("HTTP error: {err}");
                ApiError::Internal("Failed to fetch worksheet".into())
            }
            SheetError::Csv(err) => {
                error!("CSV error: {err}");
                ApiError::Internal("Failed to read worksheet".into())
            }
            SheetError::Url(err) => {
                error!("URL error: {err}");
                ApiError::Internal("Invalid sheet URL".into())
            }
        }
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::UnknownLanguage(_) => ApiError::BadRequest(value.to_string()),
        }
    }
}
