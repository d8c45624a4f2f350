use async_trait::async_trait;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use tracing::debug;

use crate::error::GrowthModelError;

/// Field name reported when a body cannot be attributed to a single field
pub const BODY_FIELD: &str = "body";

/// `Json` whose rejections become 400 validation errors with the usual body
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = GrowthModelError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let detail = rejection.body_text();
                debug!(%detail, "Rejected request body");
                let field = match &rejection {
                    JsonRejection::JsonDataError(_) => rejected_field(&detail),
                    _ => None,
                };
                Err(GrowthModelError::Validation {
                    missing: Vec::new(),
                    invalid: vec![field.unwrap_or_else(|| BODY_FIELD.to_string())],
                })
            }
        }
    }
}

/// Pull the offending field out of a deserialization message of the form
/// `"...target type: <path>: <reason>"`.
fn rejected_field(detail: &str) -> Option<String> {
    let (_, rest) = detail.split_once("target type: ")?;
    let (path, _) = rest.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '[' || c == ']');
    is_path.then(|| path.to_string())
}
