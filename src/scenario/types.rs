use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::growth_model::{GrowthModelInput, GrowthModelInputPayload, GrowthModelSummary, MonthlyProjection};

/// A persisted scenario: its inputs and the scalar outputs computed from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScenario {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_baseline: bool,
    #[serde(flatten)]
    pub input: GrowthModelInput,
    #[serde(flatten)]
    pub summary: GrowthModelSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scenario as returned by `get`, with the breakdown recomputed on read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioWithBreakdown {
    #[serde(flatten)]
    pub scenario: SavedScenario,
    pub monthly_breakdown: Vec<MonthlyProjection>,
}

/// Body for create. Missing required fields are collected by the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateScenarioRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_baseline: Option<bool>,
    #[serde(flatten)]
    pub input: GrowthModelInputPayload,
}

/// Body for update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateScenarioRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_baseline: Option<bool>,
    #[serde(flatten)]
    pub input: GrowthModelInputPayload,
}
