use serde::{Deserialize, Serialize};
use tracing::info;

/// Marketing assumptions that fully define a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthModelInput {
    pub monthly_budget: f64,
    pub target_cac: f64, // 0 means no paid acquisition
    pub expected_cvr: f64,
    pub avg_order_value: f64,
    pub cogs_percent: f64,
    pub monthly_traffic: Option<i64>, // informational only
    pub return_rate: f64,
    pub avg_orders_per_customer: f64,
    pub horizon_months: u32,
}

/// One simulated month, `month` runs 1..=horizon_months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProjection {
    pub month: u32,
    pub spend: f64,
    pub new_customers: f64,
    pub returning_customers: f64,
    pub orders: f64,
    pub revenue: f64,
    pub cogs: f64,
    pub contribution_margin: f64,
    pub cumulative_revenue: f64,
    pub cumulative_spend: f64,
    pub cumulative_profit: f64,
    pub roas: f64,
}

/// Full engine result. The scalars summarise `monthly_breakdown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthModelOutput {
    pub projected_revenue: f64,
    pub projected_orders: f64,
    pub projected_customers: f64,
    pub projected_roas: f64,
    pub projected_mer: f64,
    pub projected_ltv: f64,
    pub projected_contribution_margin: f64,
    pub break_even_month: Option<u32>,
    pub monthly_breakdown: Vec<MonthlyProjection>,
}

/// The persisted part of a `GrowthModelOutput` (everything but the breakdown)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthModelSummary {
    pub projected_revenue: f64,
    pub projected_orders: f64,
    pub projected_customers: f64,
    pub projected_roas: f64,
    pub projected_mer: f64,
    pub projected_ltv: f64,
    pub projected_contribution_margin: f64,
    pub break_even_month: Option<u32>,
}

impl GrowthModelOutput {
    pub fn summary(&self) -> GrowthModelSummary {
        GrowthModelSummary {
            projected_revenue: self.projected_revenue,
            projected_orders: self.projected_orders,
            projected_customers: self.projected_customers,
            projected_roas: self.projected_roas,
            projected_mer: self.projected_mer,
            projected_ltv: self.projected_ltv,
            projected_contribution_margin: self.projected_contribution_margin,
            break_even_month: self.break_even_month,
        }
    }

    pub fn log_summary(&self) {
        let month_table = self
            .monthly_breakdown
            .iter()
            .map(|m| {
                format!(
                    "M{:>2}: Spend={:.2}, New={:.1}, Returning={:.1}, Revenue={:.2}, Margin={:.2}, CumProfit={:.2}, ROAS={:.2}",
                    m.month,
                    m.spend,
                    m.new_customers,
                    m.returning_customers,
                    m.revenue,
                    m.contribution_margin,
                    m.cumulative_profit,
                    m.roas
                )
            })
            .collect::<Vec<_>>()
            .join("\n  ");

        let break_even = self
            .break_even_month
            .map(|m| format!("month {}", m))
            .unwrap_or_else(|| "not within horizon".to_string());

        info!(
            "Growth projection:\n  {}\n\nProjection Summary:\n  Revenue: {:.2}\n  Orders: {:.1}\n  Customers: {:.1}\n  ROAS: {:.3}\n  MER: {:.3}\n  LTV: {:.2}\n  Contribution Margin: {:.2}\n  Break-even: {}",
            month_table,
            self.projected_revenue,
            self.projected_orders,
            self.projected_customers,
            self.projected_roas,
            self.projected_mer,
            self.projected_ltv,
            self.projected_contribution_margin,
            break_even
        );
    }
}
