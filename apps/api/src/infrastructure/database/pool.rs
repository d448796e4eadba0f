use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    tracing::info!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Applies the embedded migrations under `./migrations`.
pub async fn run_migrations(pool: &PgPool, ignore_missing: bool) -> anyhow::Result<()> {
    let mut migrator = sqlx::migrate!("./migrations");
    migrator.set_ignore_missing(ignore_missing);
    migrator.run(pool).await?;
    Ok(())
}
