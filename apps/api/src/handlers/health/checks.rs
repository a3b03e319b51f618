use redis::AsyncCommands;

use super::*;

fn healthy() -> HealthDependencyStatus {
    HealthDependencyStatus {
        status: "ok",
        detail: None,
    }
}

fn disabled() -> HealthDependencyStatus {
    HealthDependencyStatus {
        status: "disabled",
        detail: None,
    }
}

fn failed(detail: String) -> HealthDependencyStatus {
    HealthDependencyStatus {
        status: "error",
        detail: Some(detail),
    }
}

pub(super) async fn check_postgres(pool: Option<sqlx::PgPool>) -> HealthDependencyStatus {
    let Some(pool) = pool else {
        return disabled();
    };

    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&pool).await {
        Ok(_) => healthy(),
        Err(error) => failed(format!("postgres check failed: {error}")),
    }
}

pub(super) async fn check_redis(
    redis_client: Option<redis::Client>,
    redis_required: bool,
) -> HealthDependencyStatus {
    let Some(redis_client) = redis_client else {
        return if redis_required {
            failed("redis client is not configured".to_owned())
        } else {
            disabled()
        };
    };

    let mut connection = match redis_client.get_multiplexed_async_connection().await {
        Ok(connection) => connection,
        Err(error) => return failed(format!("redis connection failed: {error}")),
    };

    match connection.ping::<String>().await {
        Ok(value) if value.eq_ignore_ascii_case("pong") => healthy(),
        Ok(value) => failed(format!("unexpected redis ping response: {value}")),
        Err(error) => failed(format!("redis ping failed: {error}")),
    }
}
