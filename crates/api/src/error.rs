//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use report::ReportError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Every malformed event in the request
    #[error("Malformed input: {} invalid event(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    details: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "malformed_input",
                    message: format!("{} invalid event(s)", errors.len()),
                    details: errors.iter().map(ToString::to_string).collect(),
                },
            ),
            ApiError::Report(ReportError::MalformedInput(err)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "malformed_input",
                    message: err.to_string(),
                    details: vec![err.to_string()],
                },
            ),
            ApiError::Report(err) => {
                error!("Report generation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal",
                        message: err.to_string(),
                        details: Vec::new(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
