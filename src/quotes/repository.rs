use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{QuoteId, QuoteRequest, QuoteStatus};
use super::engine::QuoteDecision;

/// Persisted quote row: the request, its decision, and bookkeeping metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub quote_id: QuoteId,
    pub created_at: DateTime<Utc>,
    pub request: QuoteRequest,
    pub decision: QuoteDecision,
    pub status: QuoteStatus,
}

impl QuoteRecord {
    pub fn status_view(&self) -> QuoteStatusView {
        let approved = match &self.decision {
            QuoteDecision::Approved(quote) => Some(quote),
            QuoteDecision::Rejected { .. } => None,
        };

        QuoteStatusView {
            quote_id: self.quote_id.clone(),
            status: self.status.label(),
            message: self.decision.message(),
            loan_amount: approved.map(|quote| quote.loan_amount),
            interest_rate_annual_percent: approved.map(|quote| quote.interest_rate_annual_percent),
            monthly_payment: approved.map(|quote| quote.monthly_payment),
            term_months: approved.map(|quote| quote.term_months),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation
/// and production can point at the hosted row store.
pub trait QuoteRepository: Send + Sync {
    fn insert(&self, record: QuoteRecord) -> Result<QuoteRecord, RepositoryError>;
    fn fetch(&self, id: &QuoteId) -> Result<Option<QuoteRecord>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<QuoteRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Mutex-guarded map standing in for the hosted row store in demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryQuoteRepository {
    records: Mutex<BTreeMap<String, QuoteRecord>>,
}

impl InMemoryQuoteRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, QuoteRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }
}

impl QuoteRepository for InMemoryQuoteRepository {
    fn insert(&self, record: QuoteRecord) -> Result<QuoteRecord, RepositoryError> {
        let mut records = self.lock()?;
        if records.contains_key(&record.quote_id.0) {
            return Err(RepositoryError::Conflict);
        }
        records.insert(record.quote_id.0.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        let records = self.lock()?;
        Ok(records.get(&id.0).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<QuoteRecord>, RepositoryError> {
        let records = self.lock()?;
        Ok(records.values().rev().take(limit).cloned().collect())
    }
}

/// Sanitized representation of a quote's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteStatusView {
    pub quote_id: QuoteId,
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate_annual_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
}
