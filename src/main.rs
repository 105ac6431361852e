use anyhow::Context;
use f1_catalog::{
    AppState, InMemoryRepository, PostgresRepository,
    config::{AppConfig, Env, StorageBackend},
    create_router,
    repository::RepositoryState,
    seed,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, installs logging, picks the storage backend, and serves
/// the catalog API until the process is stopped.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::load().context("invalid configuration")?;

    // RUST_LOG wins over the defaults below.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "f1_catalog=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!(
        "Application starting in {:?} mode with {:?} storage",
        config.env,
        config.storage
    );

    let repo: RepositoryState = match config.storage {
        StorageBackend::Postgres => {
            let db_url = config
                .db_url
                .as_deref()
                .context("DATABASE_URL is required for postgres storage")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(db_url)
                .await
                .context("failed to connect to Postgres, check DATABASE_URL")?;

            let repository = PostgresRepository::new(pool);
            repository
                .migrate()
                .await
                .context("failed to apply database migrations")?;
            Arc::new(repository)
        }
        StorageBackend::Memory => Arc::new(InMemoryRepository::new()),
    };

    if config.seed_data {
        seed::seed_catalog(&*repo)
            .await
            .context("failed to seed the catalog")?;
    }

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(repo, config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("OpenAPI document available at /api-docs/openapi.json");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
