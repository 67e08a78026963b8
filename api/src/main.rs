use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use vp_api::{create_app, telemetry, AppState};
use vp_core::repositories::user::{InMemoryUserStore, UserAdminStore, UserStore};
use vp_infra::database::{DatabasePool, MySqlUserStore};
use vp_infra::fixtures::apply_fixture;
use vp_shared::{AppConfig, Environment, StoreBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment specific file first; dotenvy never overrides a set variable
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging)?;
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        environment = %config.environment,
        store = ?config.store,
        "Starting vehicle pairing API"
    );

    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory user store, data is lost on shutdown");
            serve(config, Arc::new(InMemoryUserStore::new()), None).await
        }
        StoreBackend::Mysql => {
            let pool = DatabasePool::new(&config.database).await?;
            pool.run_migrations().await?;
            tracing::info!(stats = %pool.get_statistics(), "Database ready");

            let store = MySqlUserStore::from_config(pool.get_pool().clone(), &config.verification);
            let result = serve(config, Arc::new(store), Some(pool.clone())).await;
            pool.close().await;
            result
        }
    }
}

async fn serve<S>(
    config: AppConfig,
    store: Arc<S>,
    database: Option<DatabasePool>,
) -> anyhow::Result<()>
where
    S: UserStore + UserAdminStore + 'static,
{
    if config.environment.is_development() {
        apply_fixture(store.as_ref()).await?;
    }

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let mut state = AppState::new(store, &config);
    if let Some(pool) = database {
        state = state.with_database(pool);
    }
    let state = web::Data::new(state);

    tracing::info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if workers > 0 {
        server = server.workers(workers);
    }
    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
