use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use automobile_api::{
    config::Config,
    constants::API_NAME,
    handlers,
    messaging::{BroadcastTransport, RedisTransport, TopicTransport},
    repository::{AutomobileRepository, InMemoryAutomobileRepository, SharedStore},
    state::AppState,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("{} Starting Automobile API on port {}", API_NAME, config.server_port);

    let store = connect_store(&config).await?;
    let transport = connect_transport(&config)?;
    let state = AppState::new(store, transport, config.topics());

    // The seed row must exist before the first request is served
    state
        .service
        .seed()
        .await
        .context("Failed to insert seed automobile")?;

    let app = handlers::app_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("{} Server listening on {}", API_NAME, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<SharedStore> {
    if config.uses_memory_store() {
        tracing::warn!("{} Using in-memory store, records are lost on exit", API_NAME);
        return Ok(Arc::new(InMemoryAutomobileRepository::new()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("{} Connected to database", API_NAME);

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("{} Database migrations completed", API_NAME);

    Ok(Arc::new(AutomobileRepository::new(pool)))
}

fn connect_transport(config: &Config) -> anyhow::Result<Arc<dyn TopicTransport>> {
    match &config.topic_broker_url {
        Some(url) => {
            let transport = RedisTransport::new(url).context("Invalid TOPIC_BROKER_URL")?;
            tracing::info!("{} Publishing topics through redis", API_NAME);
            Ok(Arc::new(transport))
        }
        None => {
            tracing::warn!("{} TOPIC_BROKER_URL not set, topics stay in-process", API_NAME);
            Ok(Arc::new(BroadcastTransport::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("{} Failed to listen for shutdown signal: {}", API_NAME, e);
        std::future::pending::<()>().await;
    }
    tracing::info!("{} Shutting down", API_NAME);
}
