use sqlx::{
    Executor,
    postgres::PgPool,
};

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(include_str!("scenarios.sql")).await?;
    pool.execute(include_str!("marts.sql")).await?;

    // Create indices on the columns the list and baseline queries filter by
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_scenarios_updated_at
        ON scenarios(updated_at DESC);
        "#
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_fact_spend_date
        ON fact_spend(date);
        "#
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_fact_order_order_date
        ON fact_order(order_date);
        "#
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_dim_customer_first_order_date
        ON dim_customer(first_order_date);
        "#
    )
    .execute(pool)
    .await?;

    Ok(())
}
