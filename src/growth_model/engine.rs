use super::types::{GrowthModelInput, GrowthModelOutput, MonthlyProjection};

/// Zero denominators short-circuit to 0 instead of producing NaN/inf
fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Run the month-by-month growth simulation.
///
/// Total over well-typed input: range checks belong to the caller, and every
/// division is guarded. Spend is flat at `monthly_budget`; each month's paid
/// cohort is `spend / target_cac` customers, and every cohort carries a pool of
/// `new_customers * (avg_orders_per_customer - 1)` repeat orders which it
/// releases geometrically, `return_rate` of the remaining pool per month.
pub fn compute(input: &GrowthModelInput) -> GrowthModelOutput {
    let horizon = input.horizon_months as usize;
    let return_rate = input.return_rate.clamp(0.0, 1.0);
    let extra_orders_per_customer = (input.avg_orders_per_customer - 1.0).max(0.0);

    let mut monthly_breakdown = Vec::with_capacity(horizon);
    // Repeat orders each past cohort has yet to place
    let mut cohort_pending: Vec<f64> = Vec::with_capacity(horizon);

    let mut cumulative_revenue = 0.0;
    let mut cumulative_spend = 0.0;
    let mut cumulative_profit = 0.0;

    for month in 1..=input.horizon_months {
        let spend = input.monthly_budget;
        let new_customers = if input.target_cac > 0.0 {
            spend / input.target_cac
        } else {
            0.0
        };

        let mut returning_customers = 0.0;
        for pending in cohort_pending.iter_mut() {
            let released = *pending * return_rate;
            *pending -= released;
            returning_customers += released;
        }
        cohort_pending.push(new_customers * extra_orders_per_customer);

        let orders = new_customers + returning_customers;
        let revenue = orders * input.avg_order_value;
        let cogs = revenue * input.cogs_percent;
        let contribution_margin = revenue - cogs - spend;

        cumulative_revenue += revenue;
        cumulative_spend += spend;
        cumulative_profit += contribution_margin;

        monthly_breakdown.push(MonthlyProjection {
            month,
            spend,
            new_customers,
            returning_customers,
            orders,
            revenue,
            cogs,
            contribution_margin,
            cumulative_revenue,
            cumulative_spend,
            cumulative_profit,
            roas: safe_div(revenue, spend),
        });
    }

    summarize(input, monthly_breakdown)
}

/// Derive the scalar outputs from the breakdown
fn summarize(input: &GrowthModelInput, monthly_breakdown: Vec<MonthlyProjection>) -> GrowthModelOutput {
    let projected_revenue: f64 = monthly_breakdown.iter().map(|m| m.revenue).sum();
    let projected_orders: f64 = monthly_breakdown.iter().map(|m| m.orders).sum();
    let projected_customers: f64 = monthly_breakdown.iter().map(|m| m.new_customers).sum();
    let total_spend: f64 = monthly_breakdown.iter().map(|m| m.spend).sum();

    let projected_contribution_margin = monthly_breakdown
        .last()
        .map(|m| m.cumulative_profit)
        .unwrap_or(0.0);

    let break_even_month = monthly_breakdown
        .iter()
        .find(|m| m.cumulative_profit >= 0.0)
        .map(|m| m.month);

    GrowthModelOutput {
        projected_revenue,
        projected_orders,
        projected_customers,
        projected_roas: safe_div(projected_revenue, total_spend),
        projected_mer: safe_div(total_spend, projected_revenue),
        projected_ltv: input.avg_order_value * input.avg_orders_per_customer,
        projected_contribution_margin,
        break_even_month,
        monthly_breakdown,
    }
}
