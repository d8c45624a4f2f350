use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info, instrument, warn};

use super::source::{DateRange, HistoricalMarts};
use crate::error::Result;
use crate::growth_model::GrowthModelInput;
use crate::growth_model::input::{
    DEFAULT_AVG_ORDERS_PER_CUSTOMER,
    DEFAULT_HORIZON_MONTHS,
    DEFAULT_RETURN_RATE,
};

const SPEND_LOOKBACK_DAYS: i64 = 90;
const RECENT_LOOKBACK_DAYS: i64 = 30;
const SPEND_LOOKBACK_MONTHS: i64 = 3;

pub const DEFAULT_MONTHLY_BUDGET: f64 = 25_000.0;
pub const DEFAULT_TARGET_CAC: f64 = 50.0;
pub const DEFAULT_AVG_ORDER_VALUE: f64 = 85.0;
pub const DEFAULT_COGS_PERCENT: f64 = 0.45;
pub const DEFAULT_EXPECTED_CVR: f64 = 0.025;

fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Derive a `GrowthModelInput` from the trailing history ending at `as_of`.
///
/// Never fails for lack of data: each field has a fallback that keeps the
/// engine away from zero denominators. Errors only surface from the marts.
#[instrument(name = "estimate_baseline", skip(marts), fields(on_close = true))]
pub async fn estimate_baseline(marts: &dyn HistoricalMarts, as_of: NaiveDate) -> Result<GrowthModelInput> {
    let spend_window = DateRange::trailing(as_of, SPEND_LOOKBACK_DAYS);
    let recent_window = DateRange::trailing(as_of, RECENT_LOOKBACK_DAYS);

    let (spend_90d, orders, traffic, cohort, new_customers) = tokio::try_join!(
        marts.total_spend(spend_window),
        marts.order_totals(recent_window),
        marts.traffic_totals(recent_window),
        marts.latest_cohort(),
        marts.new_customer_count(recent_window),
    )?;
    debug!(
        spend_90d = %spend_90d,
        revenue_30d = %orders.revenue_net,
        cogs_30d = %orders.cogs,
        order_count = orders.order_count,
        sessions = traffic.sessions,
        purchases = traffic.purchases,
        new_customers,
        "Fetched baseline aggregates"
    );

    let mut fallbacks: Vec<&str> = Vec::new();

    let budget = (spend_90d / Decimal::from(SPEND_LOOKBACK_MONTHS)).floor();
    let monthly_budget = if budget > Decimal::ZERO {
        to_f64(budget)
    } else {
        fallbacks.push("monthlyBudget");
        DEFAULT_MONTHLY_BUDGET
    };

    let target_cac = if new_customers > 0 {
        let budget = Decimal::from_f64(monthly_budget).unwrap_or_default();
        to_f64(round_to(budget / Decimal::from(new_customers), 2))
    } else {
        fallbacks.push("targetCac");
        DEFAULT_TARGET_CAC
    };

    let avg_order_value = if orders.order_count > 0 {
        to_f64(round_to(orders.revenue_net / Decimal::from(orders.order_count), 2))
    } else {
        0.0
    };
    let avg_order_value = if avg_order_value > 0.0 {
        avg_order_value
    } else {
        fallbacks.push("avgOrderValue");
        DEFAULT_AVG_ORDER_VALUE
    };

    let cogs_percent = if orders.revenue_net > Decimal::ZERO {
        to_f64(round_to(orders.cogs / orders.revenue_net, 3))
    } else {
        fallbacks.push("cogsPercent");
        DEFAULT_COGS_PERCENT
    };

    let expected_cvr = if traffic.sessions > 0 {
        to_f64(round_to(
            Decimal::from(traffic.purchases) / Decimal::from(traffic.sessions),
            4,
        ))
    } else {
        fallbacks.push("expectedCvr");
        DEFAULT_EXPECTED_CVR
    };

    let return_rate = match cohort {
        Some(cohort) => to_f64(cohort.d30_retention.min(Decimal::ONE)),
        None => {
            fallbacks.push("returnRate");
            DEFAULT_RETURN_RATE
        }
    };

    let avg_orders_per_customer = if orders.order_count > 0 && new_customers > 0 {
        to_f64(round_to(
            Decimal::from(orders.order_count) / Decimal::from(new_customers),
            1,
        ))
    } else {
        fallbacks.push("avgOrdersPerCustomer");
        DEFAULT_AVG_ORDERS_PER_CUSTOMER
    };

    let monthly_traffic = (traffic.sessions > 0).then_some(traffic.sessions);

    if !fallbacks.is_empty() {
        warn!(fields = ?fallbacks, "Baseline fell back to defaults for fields without history");
    }

    let input = GrowthModelInput {
        monthly_budget,
        target_cac,
        expected_cvr,
        avg_order_value,
        cogs_percent,
        monthly_traffic,
        return_rate,
        avg_orders_per_customer,
        horizon_months: DEFAULT_HORIZON_MONTHS,
    };
    info!(?input, %as_of, "Baseline estimated");
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::memory::{InMemoryMarts, OrderRow, SpendRow, TrafficRow};
    use crate::baseline::source::CohortRetention;
    use rust_decimal::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).expect("valid date")
    }

    fn days_ago(days: i64) -> NaiveDate {
        as_of() - chrono::Duration::days(days)
    }

    #[tokio::test]
    async fn empty_history_yields_documented_defaults() {
        let marts = InMemoryMarts::new();
        let input = estimate_baseline(&marts, as_of()).await.expect("estimate");

        assert_eq!(
            input,
            GrowthModelInput {
                monthly_budget: 25_000.0,
                target_cac: 50.0,
                expected_cvr: 0.025,
                avg_order_value: 85.0,
                cogs_percent: 0.45,
                monthly_traffic: None,
                return_rate: 0.20,
                avg_orders_per_customer: 1.3,
                horizon_months: 6,
            }
        );
    }

    #[tokio::test]
    async fn derives_every_field_from_history() {
        let mut marts = InMemoryMarts::new();
        // 30_001 over 90 days -> 10_000.33/month -> floored
        marts.spend.push(SpendRow { date: days_ago(80), spend: dec!(15000) });
        marts.spend.push(SpendRow { date: days_ago(10), spend: dec!(15001) });
        // outside the window
        marts.spend.push(SpendRow { date: days_ago(120), spend: dec!(99999) });

        for _ in 0..3 {
            marts.orders.push(OrderRow { order_date: days_ago(5), revenue_net: dec!(100), cogs: dec!(40) });
        }
        marts.orders.push(OrderRow { order_date: days_ago(40), revenue_net: dec!(5000), cogs: dec!(10) });

        marts.traffic.push(TrafficRow { date: days_ago(3), sessions: 1_000, purchases: 27 });
        marts.traffic.push(TrafficRow { date: days_ago(45), sessions: 50_000, purchases: 50 });

        marts.cohorts.push(CohortRetention {
            cohort_month: NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date"),
            size: 120,
            d30_retention: dec!(0.31),
        });
        marts.cohorts.push(CohortRetention {
            cohort_month: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            size: 80,
            d30_retention: dec!(0.18),
        });
        // most recent but empty, skipped
        marts.cohorts.push(CohortRetention {
            cohort_month: NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"),
            size: 0,
            d30_retention: dec!(0.9),
        });

        marts.customer_first_orders.push(days_ago(2));
        marts.customer_first_orders.push(days_ago(20));
        marts.customer_first_orders.push(days_ago(200));
        // one day past the 30-day window
        marts.customer_first_orders.push(days_ago(30));

        let input = estimate_baseline(&marts, as_of()).await.expect("estimate");

        assert_eq!(input.monthly_budget, 10_000.0);
        assert_eq!(input.target_cac, 5_000.0);
        assert_eq!(input.avg_order_value, 100.0);
        assert_eq!(input.cogs_percent, 0.4);
        assert_eq!(input.expected_cvr, 0.027);
        assert_eq!(input.return_rate, 0.18);
        assert_eq!(input.avg_orders_per_customer, 1.5);
        assert_eq!(input.monthly_traffic, Some(1_000));
        assert_eq!(input.horizon_months, 6);
    }

    #[tokio::test]
    async fn retention_above_one_is_capped() {
        let mut marts = InMemoryMarts::new();
        marts.cohorts.push(CohortRetention {
            cohort_month: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            size: 10,
            d30_retention: dec!(1.4),
        });
        let input = estimate_baseline(&marts, as_of()).await.expect("estimate");
        assert_eq!(input.return_rate, 1.0);
    }

    #[tokio::test]
    async fn cac_uses_default_budget_when_spend_is_missing() {
        let mut marts = InMemoryMarts::new();
        for i in 0..400 {
            marts.customer_first_orders.push(days_ago(i % 30));
        }
        let input = estimate_baseline(&marts, as_of()).await.expect("estimate");
        assert_eq!(input.monthly_budget, 25_000.0);
        assert_eq!(input.target_cac, 62.5);
        // no orders in the window, so the multiplier stays at its default
        assert_eq!(input.avg_orders_per_customer, 1.3);
    }

    #[tokio::test]
    async fn rounding_matches_cents_and_ratios() {
        let mut marts = InMemoryMarts::new();
        marts.spend.push(SpendRow { date: days_ago(1), spend: dec!(3000) });
        for _ in 0..3 {
            marts.customer_first_orders.push(days_ago(1));
        }
        marts.orders.push(OrderRow { order_date: days_ago(1), revenue_net: dec!(10), cogs: dec!(1) });
        marts.orders.push(OrderRow { order_date: days_ago(1), revenue_net: dec!(10), cogs: dec!(1) });
        marts.orders.push(OrderRow { order_date: days_ago(1), revenue_net: dec!(10.01), cogs: dec!(1.0005) });
        marts.traffic.push(TrafficRow { date: days_ago(1), sessions: 3, purchases: 1 });

        let input = estimate_baseline(&marts, as_of()).await.expect("estimate");
        assert_eq!(input.monthly_budget, 1_000.0);
        assert!((input.target_cac - 333.33).abs() < 1e-9);
        assert_eq!(input.avg_order_value, 10.0);
        assert_eq!(input.cogs_percent, 0.1);
        assert_eq!(input.expected_cvr, 0.3333);
        assert_eq!(input.avg_orders_per_customer, 1.0);
    }
}
