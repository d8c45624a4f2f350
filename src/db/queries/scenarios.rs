use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::models::scenarios::ScenarioModel;

const SCENARIO_COLUMNS: &str = r#"
    id, name, description, is_baseline,
    monthly_budget, target_cac, expected_cvr, avg_order_value, cogs_percent,
    monthly_traffic, return_rate, avg_orders_per_customer, horizon_months,
    projected_revenue, projected_orders, projected_customers, projected_roas,
    projected_mer, projected_ltv, projected_contribution_margin, break_even_month,
    created_at, updated_at
"#;

/// Insert a scenario, inputs and outputs in one statement
pub async fn insert_scenario(pool: &PgPool, scenario: &ScenarioModel) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO scenarios (
            id, name, description, is_baseline,
            monthly_budget, target_cac, expected_cvr, avg_order_value, cogs_percent,
            monthly_traffic, return_rate, avg_orders_per_customer, horizon_months,
            projected_revenue, projected_orders, projected_customers, projected_roas,
            projected_mer, projected_ltv, projected_contribution_margin, break_even_month,
            created_at, updated_at
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
            $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23
        )
        "#,
    )
    .bind(scenario.id)
    .bind(&scenario.name)
    .bind(&scenario.description)
    .bind(scenario.is_baseline)
    .bind(scenario.monthly_budget)
    .bind(scenario.target_cac)
    .bind(scenario.expected_cvr)
    .bind(scenario.avg_order_value)
    .bind(scenario.cogs_percent)
    .bind(scenario.monthly_traffic)
    .bind(scenario.return_rate)
    .bind(scenario.avg_orders_per_customer)
    .bind(scenario.horizon_months)
    .bind(scenario.projected_revenue)
    .bind(scenario.projected_orders)
    .bind(scenario.projected_customers)
    .bind(scenario.projected_roas)
    .bind(scenario.projected_mer)
    .bind(scenario.projected_ltv)
    .bind(scenario.projected_contribution_margin)
    .bind(scenario.break_even_month)
    .bind(scenario.created_at)
    .bind(scenario.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite every mutable column of an existing scenario
pub async fn update_scenario(conn: &mut PgConnection, scenario: &ScenarioModel) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE scenarios SET
            name = $2,
            description = $3,
            is_baseline = $4,
            monthly_budget = $5,
            target_cac = $6,
            expected_cvr = $7,
            avg_order_value = $8,
            cogs_percent = $9,
            monthly_traffic = $10,
            return_rate = $11,
            avg_orders_per_customer = $12,
            horizon_months = $13,
            projected_revenue = $14,
            projected_orders = $15,
            projected_customers = $16,
            projected_roas = $17,
            projected_mer = $18,
            projected_ltv = $19,
            projected_contribution_margin = $20,
            break_even_month = $21,
            updated_at = $22
        WHERE id = $1
        "#,
    )
    .bind(scenario.id)
    .bind(&scenario.name)
    .bind(&scenario.description)
    .bind(scenario.is_baseline)
    .bind(scenario.monthly_budget)
    .bind(scenario.target_cac)
    .bind(scenario.expected_cvr)
    .bind(scenario.avg_order_value)
    .bind(scenario.cogs_percent)
    .bind(scenario.monthly_traffic)
    .bind(scenario.return_rate)
    .bind(scenario.avg_orders_per_customer)
    .bind(scenario.horizon_months)
    .bind(scenario.projected_revenue)
    .bind(scenario.projected_orders)
    .bind(scenario.projected_customers)
    .bind(scenario.projected_roas)
    .bind(scenario.projected_mer)
    .bind(scenario.projected_ltv)
    .bind(scenario.projected_contribution_margin)
    .bind(scenario.break_even_month)
    .bind(scenario.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Fetch a scenario by ID
pub async fn get_scenario_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ScenarioModel>, sqlx::Error> {
    sqlx::query_as::<_, ScenarioModel>(&format!("SELECT {} FROM scenarios WHERE id = $1", SCENARIO_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Fetch a scenario and hold a row lock until the surrounding transaction ends
pub async fn lock_scenario_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<ScenarioModel>, sqlx::Error> {
    sqlx::query_as::<_, ScenarioModel>(&format!(
        "SELECT {} FROM scenarios WHERE id = $1 FOR UPDATE",
        SCENARIO_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Fetch all scenarios, most recently updated first
pub async fn list_scenarios(pool: &PgPool) -> Result<Vec<ScenarioModel>, sqlx::Error> {
    sqlx::query_as::<_, ScenarioModel>(&format!(
        "SELECT {} FROM scenarios ORDER BY updated_at DESC",
        SCENARIO_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

/// Delete a scenario, returning whether a row was removed
pub async fn delete_scenario(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM scenarios WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
