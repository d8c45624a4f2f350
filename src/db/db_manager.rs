use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::connection;
use super::schema;
use super::queries::{
    marts as marts_queries,
    scenarios as scenarios_queries,
};
use super::models::scenarios::ScenarioModel;
use crate::baseline::{CohortRetention, DateRange, HistoricalMarts, OrderTotals, TrafficTotals};
use crate::config::Config;
use crate::error::Result;
use crate::scenario::{SavedScenario, ScenarioRepository};

/// Postgres-backed scenario storage and mart reader
#[derive(Clone)]
pub struct DbManager {
    pub pool: PgPool,
}

impl DbManager {
    /// Creates a new database connection and initializes the schema
    pub async fn init(config: &Config) -> std::result::Result<Self, sqlx::Error> {
        let pool = connection::create_pool(config).await?;

        // Ensure schema is initialized (creates tables if needed)
        schema::init_schema(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ScenarioRepository for DbManager {
    async fn insert(&self, scenario: &SavedScenario) -> Result<()> {
        scenarios_queries::insert_scenario(&self.pool, &ScenarioModel::try_from(scenario)?).await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<SavedScenario>> {
        let model = scenarios_queries::get_scenario_by_id(&self.pool, id).await?;
        Ok(model.map(ScenarioModel::into_scenario))
    }

    async fn list(&self) -> Result<Vec<SavedScenario>> {
        let models = scenarios_queries::list_scenarios(&self.pool).await?;
        Ok(models.into_iter().map(ScenarioModel::into_scenario).collect())
    }

    async fn update_with(
        &self,
        id: Uuid,
        apply: &(dyn for<'a> Fn(&'a SavedScenario) -> SavedScenario + Send + Sync),
    ) -> Result<Option<SavedScenario>> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes read-compute-write for this id
        let Some(prior) = scenarios_queries::lock_scenario_by_id(&mut tx, id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        let next = apply(&prior.into_scenario());
        scenarios_queries::update_scenario(&mut tx, &ScenarioModel::try_from(&next)?).await?;
        tx.commit().await?;

        Ok(Some(next))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(scenarios_queries::delete_scenario(&self.pool, id).await?)
    }
}

#[async_trait]
impl HistoricalMarts for DbManager {
    async fn total_spend(&self, range: DateRange) -> Result<Decimal> {
        Ok(marts_queries::get_total_spend(&self.pool, range.start, range.end).await?)
    }

    async fn order_totals(&self, range: DateRange) -> Result<OrderTotals> {
        Ok(marts_queries::get_order_totals(&self.pool, range.start, range.end).await?)
    }

    async fn traffic_totals(&self, range: DateRange) -> Result<TrafficTotals> {
        Ok(marts_queries::get_traffic_totals(&self.pool, range.start, range.end).await?)
    }

    async fn latest_cohort(&self) -> Result<Option<CohortRetention>> {
        let cohort = marts_queries::get_latest_cohort(&self.pool).await?;
        Ok(cohort.map(CohortRetention::from))
    }

    async fn new_customer_count(&self, range: DateRange) -> Result<i64> {
        Ok(marts_queries::get_new_customer_count(&self.pool, range.start, range.end).await?)
    }
}
