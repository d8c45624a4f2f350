use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::repository::ScenarioRepository;
use super::types::{CreateScenarioRequest, SavedScenario, ScenarioWithBreakdown, UpdateScenarioRequest};
use crate::baseline::{HistoricalMarts, estimate_baseline};
use crate::error::{GrowthModelError, Result};
use crate::growth_model::{self, GrowthModelInput, GrowthModelInputPayload};

pub const DEFAULT_BASELINE_NAME: &str = "Baseline";

/// Named scenarios whose stored outputs always equal the engine's result for
/// the stored inputs. Every write recomputes; nothing is patched.
#[derive(Clone)]
pub struct ScenarioStore {
    repository: Arc<dyn ScenarioRepository>,
}

impl ScenarioStore {
    pub fn new(repository: Arc<dyn ScenarioRepository>) -> Self {
        Self { repository }
    }

    #[instrument(name = "scenario_create", skip(self, request))]
    pub async fn create(&self, request: CreateScenarioRequest) -> Result<SavedScenario> {
        let name = request.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name".to_string());
        }
        missing.extend(request.input.missing_required());
        let invalid = request.input.invalid_fields();
        if !missing.is_empty() || !invalid.is_empty() {
            return Err(GrowthModelError::Validation { missing, invalid });
        }

        let name = name.map(str::to_string).unwrap_or_default();
        let input = request.input.into_input()?;
        let scenario = build_scenario(
            Uuid::new_v4(),
            name,
            request.description,
            request.is_baseline.unwrap_or(false),
            input,
        );
        self.repository.insert(&scenario).await?;

        info!(id = %scenario.id, name = %scenario.name, is_baseline = scenario.is_baseline, "Scenario created");
        Ok(scenario)
    }

    /// Fetch a scenario with its monthly breakdown recomputed from the stored inputs
    pub async fn get(&self, id: Uuid) -> Result<ScenarioWithBreakdown> {
        let scenario = self
            .repository
            .find(id)
            .await?
            .ok_or(GrowthModelError::NotFound { id })?;
        let monthly_breakdown = growth_model::compute(&scenario.input).monthly_breakdown;
        Ok(ScenarioWithBreakdown {
            scenario,
            monthly_breakdown,
        })
    }

    pub async fn list(&self) -> Result<Vec<SavedScenario>> {
        self.repository.list().await
    }

    /// Overlay the supplied fields on the stored scenario and recompute.
    #[instrument(name = "scenario_update", skip(self, request))]
    pub async fn update(&self, id: Uuid, request: UpdateScenarioRequest) -> Result<SavedScenario> {
        let mut invalid = request.input.invalid_fields();
        if matches!(request.name.as_deref(), Some(n) if n.trim().is_empty()) {
            invalid.insert(0, "name".to_string());
        }
        if !invalid.is_empty() {
            return Err(GrowthModelError::Validation { missing: Vec::new(), invalid });
        }

        let apply = |prior: &SavedScenario| -> SavedScenario {
            let input = request.input.merge_over(&prior.input);
            let mut next = build_scenario(
                prior.id,
                request
                    .name
                    .as_deref()
                    .map(|n| n.trim().to_string())
                    .unwrap_or_else(|| prior.name.clone()),
                request.description.clone().or_else(|| prior.description.clone()),
                request.is_baseline.unwrap_or(prior.is_baseline),
                input,
            );
            next.created_at = prior.created_at;
            next
        };

        let scenario = self
            .repository
            .update_with(id, &apply)
            .await?
            .ok_or(GrowthModelError::NotFound { id })?;

        info!(id = %scenario.id, "Scenario updated and recomputed");
        Ok(scenario)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.repository.delete(id).await? {
            info!(%id, "Scenario deleted");
            Ok(())
        } else {
            Err(GrowthModelError::NotFound { id })
        }
    }

    /// Estimate the baseline from the marts and save it as a baseline scenario
    #[instrument(name = "scenario_promote_baseline", skip(self, marts))]
    pub async fn promote_baseline(
        &self,
        marts: &dyn HistoricalMarts,
        as_of: NaiveDate,
        name: Option<String>,
    ) -> Result<SavedScenario> {
        let input = estimate_baseline(marts, as_of).await?;
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_BASELINE_NAME.to_string());
        let description = Some(format!("Estimated from history as of {}", as_of));

        self.create(CreateScenarioRequest {
            name: Some(name),
            description,
            is_baseline: Some(true),
            input: GrowthModelInputPayload::from(&input),
        })
        .await
    }
}

/// Pair an input with its freshly computed summary
fn build_scenario(
    id: Uuid,
    name: String,
    description: Option<String>,
    is_baseline: bool,
    input: GrowthModelInput,
) -> SavedScenario {
    let summary = growth_model::compute(&input).summary();
    let now = Utc::now();
    SavedScenario {
        id,
        name,
        description,
        is_baseline,
        input,
        summary,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::InMemoryMarts;
    use crate::scenario::repository::InMemoryScenarioRepository;

    const EPS: f64 = 1e-6;

    fn store() -> ScenarioStore {
        ScenarioStore::new(Arc::new(InMemoryScenarioRepository::new()))
    }

    fn create_request(name: &str) -> CreateScenarioRequest {
        CreateScenarioRequest {
            name: Some(name.to_string()),
            description: Some("spring push".to_string()),
            is_baseline: None,
            input: GrowthModelInputPayload {
                monthly_budget: Some(10_000.0),
                target_cac: Some(50.0),
                expected_cvr: Some(0.025),
                avg_order_value: Some(100.0),
                cogs_percent: Some(0.4),
                return_rate: Some(0.25),
                avg_orders_per_customer: Some(1.8),
                horizon_months: Some(9),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn create_then_get_matches_fresh_compute() {
        let store = store();
        let request = create_request("Q2 plan");
        let input = request.input.clone().into_input().expect("valid input");
        let expected = growth_model::compute(&input);

        let created = store.create(request).await.expect("create");
        assert_eq!(created.summary, expected.summary());
        assert!(!created.is_baseline);

        let fetched = store.get(created.id).await.expect("get");
        assert_eq!(fetched.scenario, created);
        assert_eq!(fetched.monthly_breakdown, expected.monthly_breakdown);

        let revenue: f64 = fetched.monthly_breakdown.iter().map(|m| m.revenue).sum();
        assert!((revenue - fetched.scenario.summary.projected_revenue).abs() < EPS);
        let last = fetched.monthly_breakdown.last().expect("non-empty");
        assert_eq!(last.cumulative_profit, fetched.scenario.summary.projected_contribution_margin);
    }

    #[tokio::test]
    async fn create_reports_every_missing_field() {
        let err = store()
            .create(CreateScenarioRequest {
                name: Some("   ".to_string()),
                input: GrowthModelInputPayload {
                    monthly_budget: Some(5_000.0),
                    cogs_percent: Some(2.0),
                    ..Default::default()
                },
                ..Default::default()
            })
            .await
            .expect_err("incomplete request");

        match err {
            GrowthModelError::Validation { missing, invalid } => {
                assert_eq!(missing, vec!["name", "targetCac", "expectedCvr", "avgOrderValue"]);
                assert_eq!(invalid, vec!["cogsPercent"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_create_writes_nothing() {
        let store = store();
        let _ = store.create(CreateScenarioRequest::default()).await;
        assert!(store.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn update_keeps_untouched_fields_and_recomputes() {
        let store = store();
        let created = store.create(create_request("Plan")).await.expect("create");

        let updated = store
            .update(
                created.id,
                UpdateScenarioRequest {
                    input: GrowthModelInputPayload {
                        monthly_budget: Some(20_000.0),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Plan");
        assert_eq!(updated.description.as_deref(), Some("spring push"));
        assert_eq!(updated.input.monthly_budget, 20_000.0);
        assert_eq!(updated.input.target_cac, 50.0);
        assert_eq!(updated.input.horizon_months, 9);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let expected = growth_model::compute(&updated.input).summary();
        assert_eq!(updated.summary, expected);
        assert!(updated.summary.projected_revenue > created.summary.projected_revenue);

        let fetched = store.get(created.id).await.expect("get");
        assert_eq!(fetched.scenario, updated);
    }

    #[tokio::test]
    async fn update_can_rename_and_flag_baseline() {
        let store = store();
        let created = store.create(create_request("Draft")).await.expect("create");
        let updated = store
            .update(
                created.id,
                UpdateScenarioRequest {
                    name: Some("Final".to_string()),
                    is_baseline: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.name, "Final");
        assert!(updated.is_baseline);
        assert_eq!(updated.input, created.input);
        assert_eq!(updated.summary, created.summary);
    }

    #[tokio::test]
    async fn update_rejects_out_of_range_values() {
        let store = store();
        let created = store.create(create_request("Plan")).await.expect("create");
        let err = store
            .update(
                created.id,
                UpdateScenarioRequest {
                    input: GrowthModelInputPayload {
                        horizon_months: Some(-3),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await
            .expect_err("negative horizon");
        assert!(matches!(err, GrowthModelError::Validation { .. }));

        let fetched = store.get(created.id).await.expect("get");
        assert_eq!(fetched.scenario, created);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = store();
        let id = Uuid::new_v4();

        assert!(matches!(store.get(id).await, Err(GrowthModelError::NotFound { .. })));
        assert!(matches!(
            store.update(id, UpdateScenarioRequest::default()).await,
            Err(GrowthModelError::NotFound { .. })
        ));
        assert!(matches!(store.delete(id).await, Err(GrowthModelError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_removes_scenario() {
        let store = store();
        let created = store.create(create_request("Temp")).await.expect("create");
        store.delete(created.id).await.expect("delete");
        assert!(matches!(store.get(created.id).await, Err(GrowthModelError::NotFound { .. })));
        assert!(matches!(store.delete(created.id).await, Err(GrowthModelError::NotFound { .. })));
    }

    #[tokio::test]
    async fn list_is_newest_updated_first() {
        let store = store();
        let first = store.create(create_request("First")).await.expect("create");
        let second = store.create(create_request("Second")).await.expect("create");
        store
            .update(
                first.id,
                UpdateScenarioRequest {
                    description: Some("touched".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        let names: Vec<String> = store.list().await.expect("list").into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["First".to_string(), "Second".to_string()]);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn promote_baseline_saves_estimated_input() {
        let store = store();
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 30).expect("valid date");
        let scenario = store
            .promote_baseline(&InMemoryMarts::new(), as_of, None)
            .await
            .expect("promote");

        assert!(scenario.is_baseline);
        assert_eq!(scenario.name, DEFAULT_BASELINE_NAME);
        assert_eq!(scenario.input.monthly_budget, 25_000.0);
        assert_eq!(scenario.input.horizon_months, 6);
        assert_eq!(scenario.summary, growth_model::compute(&scenario.input).summary());
    }
}
