use blablabook_core::AppError;
use sqlx::PgPool;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::api_config::ApiConfig;
use crate::redis_session_store::RedisSessionStore;

const REDIS_SESSION_KEY_PREFIX: &str = "blablabook:session";

fn session_signing_key(secret: &str) -> Result<Key, AppError> {
    Key::try_from(secret.as_bytes())
        .map_err(|error| AppError::Validation(format!("invalid SESSION_SECRET: {error}")))
}

pub async fn build_postgres_session_layer(
    pool: PgPool,
    config: &ApiConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, AppError> {
    let session_store = PostgresStore::new(pool)
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;

    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    configure_session_layer(session_store, config)
}

pub fn build_redis_session_layer(
    redis_client: redis::Client,
    config: &ApiConfig,
) -> Result<SessionManagerLayer<RedisSessionStore, SignedCookie>, AppError> {
    configure_session_layer(
        RedisSessionStore::new(redis_client, REDIS_SESSION_KEY_PREFIX),
        config,
    )
}

fn configure_session_layer<Store: SessionStore + Clone>(
    session_store: Store,
    config: &ApiConfig,
) -> Result<SessionManagerLayer<Store, SignedCookie>, AppError> {
    let key = session_signing_key(config.session_secret.as_str())?;

    Ok(SessionManagerLayer::new(session_store)
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            config.session_idle_minutes,
        )))
        .with_signed(key))
}
