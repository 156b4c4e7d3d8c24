use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bitlinks_pipeline::PipelineError;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(PipelineError);

impl From<PipelineError> for AppError {
    fn from(value: PipelineError) -> Self {
        Self(value)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            PipelineError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            PipelineError::RejectedOrigin(_) => StatusCode::FORBIDDEN,
            PipelineError::UnreachableTarget(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::ShorteningServiceError(_) => StatusCode::BAD_GATEWAY,
            PipelineError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match &self.0 {
            // Probe, shortener and storage details stay in the logs.
            PipelineError::UnreachableTarget(_) => {
                "target is unreachable or did not answer 200".to_string()
            }
            PipelineError::ShorteningServiceError(_) => {
                "shortening service failed, try again later".to_string()
            }
            PipelineError::CacheUnavailable(_) => "link cache is unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.0.code(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
