use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use crate::baseline::{OrderTotals, TrafficTotals};
use crate::db::models::marts::CohortModel;

/// Sum of ad spend between two dates (inclusive)
pub async fn get_total_spend(pool: &PgPool, start: NaiveDate, end: NaiveDate) -> Result<Decimal, sqlx::Error> {
    sqlx::query_scalar::<_, Decimal>(
        r#"
        SELECT COALESCE(SUM(spend), 0)
        FROM fact_spend
        WHERE date >= $1 AND date <= $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}

/// Net revenue, COGS and order count between two dates (inclusive)
pub async fn get_order_totals(pool: &PgPool, start: NaiveDate, end: NaiveDate) -> Result<OrderTotals, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COALESCE(SUM(revenue_net), 0) AS revenue_net,
            COALESCE(SUM(cogs), 0) AS cogs,
            COUNT(*) AS order_count
        FROM fact_order
        WHERE order_date >= $1 AND order_date <= $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(OrderTotals {
        revenue_net: row.try_get("revenue_net")?,
        cogs: row.try_get("cogs")?,
        order_count: row.try_get("order_count")?,
    })
}

/// Sessions and purchases between two dates (inclusive)
pub async fn get_traffic_totals(pool: &PgPool, start: NaiveDate, end: NaiveDate) -> Result<TrafficTotals, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COALESCE(SUM(sessions), 0)::BIGINT AS sessions,
            COALESCE(SUM(purchases), 0)::BIGINT AS purchases
        FROM fact_traffic
        WHERE date >= $1 AND date <= $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(TrafficTotals {
        sessions: row.try_get("sessions")?,
        purchases: row.try_get("purchases")?,
    })
}

/// Most recent cohort with a positive size
pub async fn get_latest_cohort(pool: &PgPool) -> Result<Option<CohortModel>, sqlx::Error> {
    sqlx::query_as::<_, CohortModel>(
        r#"
        SELECT cohort_month, size, d30_retention
        FROM cohort
        WHERE size > 0
        ORDER BY cohort_month DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
}

/// Customers whose first order falls between two dates (inclusive)
pub async fn get_new_customer_count(pool: &PgPool, start: NaiveDate, end: NaiveDate) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM dim_customer
        WHERE first_order_date >= $1 AND first_order_date <= $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}
