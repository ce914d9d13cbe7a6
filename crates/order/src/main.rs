use anyhow::{Context, Result};
use order::{di::DependenciesInjectDeps, handler::AppRouter, state::AppState};
use shared::{
    config::{Config, ConnectionManager, ConnectionPool},
    utils::init_logger,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, state) = setup().await.context("Failed to setup application")?;

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    info!("✅ Order service shutdown complete.");
    Ok(())
}

async fn setup() -> Result<(Config, AppState)> {
    dotenv::dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    init_logger("order-service", is_dev, is_enable_file);

    let config = Config::init().context("Failed to load configuration")?;

    let db_pool =
        ConnectionManager::new_pool(&config.database_url, config.db_min_conn, config.db_max_conn)
            .await
            .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("failed to migration database")?;
        info!("✅ Migrations applied.");
    }

    let state = AppState::new(DependenciesInjectDeps::from_pool(db_pool));

    info!("✅ Application setup completed successfully.");
    Ok((config, state))
}

pub async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
