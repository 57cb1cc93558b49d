//! Database module
//!
//! Connectivity and schema checks. The schema itself lives in raw SQL files
//! under `migrations/`.

use sqlx::PgPool;

/// Tables the server needs before it can accept requests
const REQUIRED_TABLES: &[&str] = &["farm_finance"];

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(*table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    // ON CONFLICT (user_id) needs the unique constraint
    let has_unique_owner: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.table_constraints
            WHERE table_schema = 'public'
              AND table_name = 'farm_finance'
              AND constraint_type = 'UNIQUE'
              AND constraint_name = 'farm_finance_user_id_key'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !has_unique_owner {
        tracing::error!("farm_finance is missing UNIQUE (user_id). Please run migrations.");
        return Ok(false);
    }

    tracing::info!("Schema verified: farm_finance");
    Ok(true)
}
