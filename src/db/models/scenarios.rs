use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::GrowthModelError;
use crate::growth_model::{GrowthModelInput, GrowthModelSummary};
use crate::scenario::SavedScenario;

/// Row of the `scenarios` table
#[derive(Debug, Clone, FromRow)]
pub struct ScenarioModel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_baseline: bool,

    // Inputs
    pub monthly_budget: f64,
    pub target_cac: f64,
    pub expected_cvr: f64,
    pub avg_order_value: f64,
    pub cogs_percent: f64,
    pub monthly_traffic: Option<i64>,
    pub return_rate: f64,
    pub avg_orders_per_customer: f64,
    pub horizon_months: i32,

    // Output scalars, always written together with the inputs above
    pub projected_revenue: f64,
    pub projected_orders: f64,
    pub projected_customers: f64,
    pub projected_roas: f64,
    pub projected_mer: f64,
    pub projected_ltv: f64,
    pub projected_contribution_margin: f64,
    pub break_even_month: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fails if a month count does not fit the `INTEGER` columns
impl TryFrom<&SavedScenario> for ScenarioModel {
    type Error = GrowthModelError;

    fn try_from(scenario: &SavedScenario) -> Result<Self, Self::Error> {
        let input = &scenario.input;
        let summary = &scenario.summary;
        let horizon_months = i32::try_from(input.horizon_months).map_err(|_| horizon_out_of_range())?;
        let break_even_month = summary
            .break_even_month
            .map(i32::try_from)
            .transpose()
            .map_err(|_| horizon_out_of_range())?;

        Ok(Self {
            id: scenario.id,
            name: scenario.name.clone(),
            description: scenario.description.clone(),
            is_baseline: scenario.is_baseline,
            monthly_budget: input.monthly_budget,
            target_cac: input.target_cac,
            expected_cvr: input.expected_cvr,
            avg_order_value: input.avg_order_value,
            cogs_percent: input.cogs_percent,
            monthly_traffic: input.monthly_traffic,
            return_rate: input.return_rate,
            avg_orders_per_customer: input.avg_orders_per_customer,
            horizon_months,
            projected_revenue: summary.projected_revenue,
            projected_orders: summary.projected_orders,
            projected_customers: summary.projected_customers,
            projected_roas: summary.projected_roas,
            projected_mer: summary.projected_mer,
            projected_ltv: summary.projected_ltv,
            projected_contribution_margin: summary.projected_contribution_margin,
            break_even_month,
            created_at: scenario.created_at,
            updated_at: scenario.updated_at,
        })
    }
}

fn horizon_out_of_range() -> GrowthModelError {
    GrowthModelError::Validation {
        missing: Vec::new(),
        invalid: vec!["horizonMonths".to_string()],
    }
}

impl ScenarioModel {
    pub fn into_scenario(self) -> SavedScenario {
        SavedScenario {
            id: self.id,
            name: self.name,
            description: self.description,
            is_baseline: self.is_baseline,
            input: GrowthModelInput {
                monthly_budget: self.monthly_budget,
                target_cac: self.target_cac,
                expected_cvr: self.expected_cvr,
                avg_order_value: self.avg_order_value,
                cogs_percent: self.cogs_percent,
                monthly_traffic: self.monthly_traffic,
                return_rate: self.return_rate,
                avg_orders_per_customer: self.avg_orders_per_customer,
                horizon_months: self.horizon_months.max(0) as u32,
            },
            summary: GrowthModelSummary {
                projected_revenue: self.projected_revenue,
                projected_orders: self.projected_orders,
                projected_customers: self.projected_customers,
                projected_roas: self.projected_roas,
                projected_mer: self.projected_mer,
                projected_ltv: self.projected_ltv,
                projected_contribution_margin: self.projected_contribution_margin,
                break_even_month: self.break_even_month.map(|m| m.max(0) as u32),
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
