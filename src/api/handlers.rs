use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use super::error::ErrorResponse;
use super::extract::ValidatedJson;
use crate::baseline::estimate_baseline;
use crate::error::GrowthModelError;
use crate::growth_model::{self, GrowthModelInput, GrowthModelInputPayload, GrowthModelOutput};
use crate::scenario::{CreateScenarioRequest, UpdateScenarioRequest};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PromoteBaselineRequest {
    pub name: Option<String>,
}

/// Baseline input with its projection in one flat object
#[derive(Debug, Serialize)]
pub struct BaselineResponse {
    #[serde(flatten)]
    pub input: GrowthModelInput,
    #[serde(flatten)]
    pub output: GrowthModelOutput,
}

/// Unparseable ids cannot name a stored scenario
fn parse_id(raw: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(raw).map_err(|_| {
        (StatusCode::NOT_FOUND, Json(ErrorResponse::message("Scenario not found"))).into_response()
    })
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn list_scenarios(State(state): State<AppState>) -> Response {
    match state.store.list().await {
        Ok(scenarios) => Json(scenarios).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_scenario(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateScenarioRequest>,
) -> Response {
    match state.store.create(request).await {
        Ok(scenario) => (StatusCode::CREATED, Json(scenario)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn promote_baseline(
    State(state): State<AppState>,
    request: Option<Json<PromoteBaselineRequest>>,
) -> Response {
    let name = request.and_then(|Json(r)| r.name);
    let as_of = Utc::now().date_naive();
    match state.store.promote_baseline(state.marts.as_ref(), as_of, name).await {
        Ok(scenario) => (StatusCode::CREATED, Json(scenario)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_scenario(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.store.get(id).await {
        Ok(scenario) => Json(scenario).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_scenario(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateScenarioRequest>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.store.update(id, request).await {
        Ok(scenario) => Json(scenario).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_scenario(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.store.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn compute(
    ValidatedJson(payload): ValidatedJson<GrowthModelInputPayload>,
) -> Result<Json<GrowthModelOutput>, GrowthModelError> {
    growth_model::compute_from_payload(payload).map(Json)
}

pub async fn baseline(State(state): State<AppState>) -> Result<Json<BaselineResponse>, GrowthModelError> {
    let input = estimate_baseline(state.marts.as_ref(), Utc::now().date_naive()).await?;
    let output = growth_model::compute(&input);
    Ok(Json(BaselineResponse { input, output }))
}
