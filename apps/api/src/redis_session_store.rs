use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, ExistenceCheck, SetExpiry, SetOptions};
use tower_sessions::SessionStore;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, Error as SessionStoreError};

/// Session store keeping one JSON-encoded record per key, expired by Redis.
#[derive(Debug, Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisSessionStore {
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, session_id: &Id) -> String {
        format!("{}:{}", self.key_prefix, session_id)
    }

    async fn connection(&self) -> session_store::Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend_error)
    }
}

fn backend_error(error: redis::RedisError) -> SessionStoreError {
    SessionStoreError::Backend(error.to_string())
}

/// Seconds until the record expires, or `None` once it already has.
fn remaining_ttl_seconds(record: &Record, now_unix: i64) -> Option<u64> {
    u64::try_from(record.expiry_date.unix_timestamp() - now_unix)
        .ok()
        .filter(|seconds| *seconds > 0)
}

fn encode(record: &Record) -> session_store::Result<String> {
    serde_json::to_string(record).map_err(|error| SessionStoreError::Encode(error.to_string()))
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, session_record: &mut Record) -> session_store::Result<()> {
        let Some(ttl_seconds) = remaining_ttl_seconds(session_record, Utc::now().timestamp())
        else {
            return Ok(());
        };

        let mut connection = self.connection().await?;
        loop {
            let options = SetOptions::default()
                .conditional_set(ExistenceCheck::NX)
                .with_expiration(SetExpiry::EX(ttl_seconds));
            let inserted: Option<String> = connection
                .set_options(
                    self.key_for(&session_record.id),
                    encode(session_record)?,
                    options,
                )
                .await
                .map_err(backend_error)?;

            if inserted.is_some() {
                return Ok(());
            }

            // Id collision: draw a fresh one.
            session_record.id = Id::default();
        }
    }

    async fn save(&self, session_record: &Record) -> session_store::Result<()> {
        let key = self.key_for(&session_record.id);
        let mut connection = self.connection().await?;

        let Some(ttl_seconds) = remaining_ttl_seconds(session_record, Utc::now().timestamp())
        else {
            connection
                .del::<_, i64>(key)
                .await
                .map_err(backend_error)?;
            return Ok(());
        };

        connection
            .set_ex::<_, _, ()>(key, encode(session_record)?, ttl_seconds)
            .await
            .map_err(backend_error)
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let mut connection = self.connection().await?;

        let encoded_record: Option<String> = connection
            .get(self.key_for(session_id))
            .await
            .map_err(backend_error)?;

        encoded_record
            .as_deref()
            .map(|value| {
                serde_json::from_str::<Record>(value)
                    .map_err(|error| SessionStoreError::Decode(error.to_string()))
            })
            .transpose()
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        let mut connection = self.connection().await?;

        connection
            .del::<_, i64>(self.key_for(session_id))
            .await
            .map_err(backend_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::{RedisSessionStore, remaining_ttl_seconds};

    fn record_expiring_in(seconds: i64) -> (Record, i64) {
        let now = OffsetDateTime::now_utc();
        let record = Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: now + Duration::seconds(seconds),
        };
        (record, now.unix_timestamp())
    }

    #[test]
    fn ttl_counts_down_to_expiry() {
        let (record, now) = record_expiring_in(1800);
        assert_eq!(remaining_ttl_seconds(&record, now), Some(1800));
    }

    #[test]
    fn expired_records_have_no_ttl() {
        let (record, now) = record_expiring_in(-5);
        assert_eq!(remaining_ttl_seconds(&record, now), None);

        let (record, now) = record_expiring_in(0);
        assert_eq!(remaining_ttl_seconds(&record, now), None);
    }

    #[test]
    fn keys_are_namespaced_by_prefix() {
        let client = redis::Client::open("redis://127.0.0.1:6379")
            .unwrap_or_else(|error| panic!("client: {error}"));
        let store = RedisSessionStore::new(client, "blablabook:session");
        let id = Id::default();

        assert_eq!(store.key_for(&id), format!("blablabook:session:{id}"));
    }
}
