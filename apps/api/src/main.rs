//! BlaBlaBook access service binary.

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod redis_session_store;
mod seed;
mod state;

use std::net::SocketAddr;

use axum::Router;
use blablabook_core::AppError;
use tracing::info;

use crate::api_config::{ApiCommand, ApiConfig, SessionStoreKind, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool = api_services::connect_and_migrate(&config.database_url).await?;

    match config.command {
        ApiCommand::Migrate => {
            info!("database migrations applied successfully");
            Ok(())
        }
        ApiCommand::Seed => seed::run(pool, &config).await,
        ApiCommand::Serve => serve(pool, &config).await,
    }
}

async fn serve(pool: sqlx::PgPool, config: &ApiConfig) -> Result<(), AppError> {
    let app_state = api_services::build_app_state(pool.clone(), config)?;

    let app: Router = match config.session_store {
        SessionStoreKind::Postgres => {
            let session_layer = api_services::build_postgres_session_layer(pool, config).await?;
            api_router::build_router(app_state, &config.frontend_url, session_layer)?
        }
        SessionStoreKind::Redis => {
            let redis_client = app_state.redis_client.clone().ok_or_else(|| {
                AppError::Validation("REDIS_URL is required when SESSION_STORE=redis".to_owned())
            })?;
            let session_layer = api_services::build_redis_session_layer(redis_client, config)?;
            api_router::build_router(app_state, &config.frontend_url, session_layer)?
        }
    };

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(%address, session_store = ?config.session_store, "blablabook-api listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
