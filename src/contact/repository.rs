use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ClientMeta, SanitizedContact};

/// Identifier wrapper for stored contact submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Triage status the back office moves submissions through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    New,
    Reviewed,
}

impl ContactStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Reviewed => "reviewed",
        }
    }
}

/// Stored contact row with request metadata for abuse follow-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    pub submission_id: SubmissionId,
    pub created_at: DateTime<Utc>,
    pub contact: SanitizedContact,
    pub client: ClientMeta,
    pub status: ContactStatus,
}

/// Storage seam for contact submissions; the back office consumes `recent`
/// and `mark_reviewed`, the public form only ever inserts.
pub trait ContactRepository: Send + Sync {
    fn insert(&self, record: ContactRecord) -> Result<ContactRecord, ContactStoreError>;
    fn recent(&self, limit: usize) -> Result<Vec<ContactRecord>, ContactStoreError>;
    fn mark_reviewed(&self, id: &SubmissionId) -> Result<(), ContactStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ContactStoreError {
    #[error("submission not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Mutex-guarded map used by demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    records: Mutex<BTreeMap<String, ContactRecord>>,
}

impl InMemoryContactRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, ContactRecord>>, ContactStoreError>
    {
        self.records
            .lock()
            .map_err(|_| ContactStoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl ContactRepository for InMemoryContactRepository {
    fn insert(&self, record: ContactRecord) -> Result<ContactRecord, ContactStoreError> {
        let mut records = self.lock()?;
        records.insert(record.submission_id.0.clone(), record.clone());
        Ok(record)
    }

    fn recent(&self, limit: usize) -> Result<Vec<ContactRecord>, ContactStoreError> {
        let records = self.lock()?;
        Ok(records.values().rev().take(limit).cloned().collect())
    }

    fn mark_reviewed(&self, id: &SubmissionId) -> Result<(), ContactStoreError> {
        let mut records = self.lock()?;
        let record = records.get_mut(&id.0).ok_or(ContactStoreError::NotFound)?;
        record.status = ContactStatus::Reviewed;
        Ok(())
    }
}
