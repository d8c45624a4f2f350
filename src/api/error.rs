use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::error::GrowthModelError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_fields: Vec<String>,
}

impl ErrorResponse {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            missing_fields: Vec::new(),
            invalid_fields: Vec::new(),
        }
    }
}

impl IntoResponse for GrowthModelError {
    fn into_response(self) -> Response {
        match self {
            GrowthModelError::Validation { missing, invalid } => {
                let body = ErrorResponse {
                    error: "Invalid growth model input".to_string(),
                    missing_fields: missing,
                    invalid_fields: invalid,
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            GrowthModelError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::message("Scenario not found"))).into_response()
            }
            other => {
                error!(error = %other, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::message("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}
