use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use blablabook_application::{
    AuthorizationAuditEntry, AuthorizationAuditQuery, AuthorizationAuditRecord,
    AuthorizationAuditRepository,
};
use blablabook_core::{AppError, AppResult};

/// In-memory authorization audit repository.
#[derive(Debug, Default)]
pub struct InMemoryAuthorizationAuditRepository {
    records: RwLock<Vec<AuthorizationAuditRecord>>,
    failing: AtomicBool,
}

impl InMemoryAuthorizationAuditRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every append fail while set.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a snapshot of appended records in insertion order.
    pub async fn records(&self) -> Vec<AuthorizationAuditRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl AuthorizationAuditRepository for InMemoryAuthorizationAuditRepository {
    async fn append_record(&self, record: AuthorizationAuditRecord) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "in-memory audit repository rejected the write".to_owned(),
            ));
        }

        self.records.write().await.push(record);
        Ok(())
    }

    async fn list_recent_records(
        &self,
        query: AuthorizationAuditQuery,
    ) -> AppResult<Vec<AuthorizationAuditEntry>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, record)| {
                query.user_id.is_none_or(|user_id| record.user_id == Some(user_id))
            })
            .filter(|(_, record)| query.granted.is_none_or(|granted| record.granted() == granted))
            .skip(query.offset)
            .take(query.limit)
            .map(|(index, record)| AuthorizationAuditEntry {
                entry_id: i64::try_from(index).unwrap_or(i64::MAX) + 1,
                record: record.clone(),
            })
            .collect())
    }
}
