use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ratelimit::RateLimitGate;

use super::domain::{QuoteId, QuoteRequest, ValidationError};
use super::engine::{amortize, PaymentSchedule, QuoteEngine};
use super::repository::{QuoteRecord, QuoteRepository, RepositoryError};

/// Service composing the rate-limit gate, quote engine, and repository.
pub struct QuoteService<R, G> {
    repository: Arc<R>,
    gate: Arc<G>,
    engine: QuoteEngine,
}

static QUOTE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_quote_id() -> QuoteId {
    let id = QUOTE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    QuoteId(format!("qt-{id:06}"))
}

/// Gate-free amortization request served by the EMI calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmiRequest {
    pub loan_amount: u64,
    pub interest_rate_annual_percent: f64,
    pub term_months: u32,
}

/// Standalone EMI computation with the same input policing as the wizards,
/// minus the term whitelist (the calculator exposes a free slider).
pub fn compute_emi(request: EmiRequest) -> Result<PaymentSchedule, ValidationError> {
    if request.loan_amount == 0 {
        return Err(ValidationError::NonPositivePrincipal);
    }
    if request.term_months == 0 {
        return Err(ValidationError::UnsupportedTerm { term_months: 0 });
    }
    if !request.interest_rate_annual_percent.is_finite()
        || request.interest_rate_annual_percent < 0.0
    {
        return Err(ValidationError::InvalidRate);
    }

    Ok(amortize(
        request.loan_amount as f64,
        request.interest_rate_annual_percent,
        request.term_months,
    ))
}

impl<R, G> QuoteService<R, G>
where
    R: QuoteRepository + 'static,
    G: RateLimitGate + 'static,
{
    pub fn new(repository: Arc<R>, gate: Arc<G>) -> Self {
        Self {
            repository,
            gate,
            engine: QuoteEngine::standard(),
        }
    }

    /// Evaluate a wizard submission and persist the outcome as a quote row.
    /// One insert per submission, whatever the decision.
    pub fn submit(
        &self,
        client_key: &str,
        request: QuoteRequest,
    ) -> Result<QuoteRecord, QuoteServiceError> {
        if !self.gate.allow(client_key) {
            return Err(QuoteServiceError::Throttled);
        }

        let decision = self.engine.evaluate(&request.application)?;
        let record = QuoteRecord {
            quote_id: next_quote_id(),
            created_at: Utc::now(),
            status: decision.status(),
            decision,
            request,
        };

        let stored = self.repository.insert(record)?;
        info!(
            quote_id = %stored.quote_id.0,
            variant = stored.request.application.variant.label(),
            status = stored.status.label(),
            "quote evaluated"
        );
        Ok(stored)
    }

    /// Fetch a stored quote for status display.
    pub fn get(&self, quote_id: &QuoteId) -> Result<QuoteRecord, QuoteServiceError> {
        let record = self
            .repository
            .fetch(quote_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Latest quote rows for the back-office listing.
    pub fn recent(&self, limit: usize) -> Result<Vec<QuoteRecord>, QuoteServiceError> {
        Ok(self.repository.recent(limit)?)
    }

    /// EMI calculator entry point; no eligibility gate applies.
    pub fn emi(
        &self,
        client_key: &str,
        request: EmiRequest,
    ) -> Result<PaymentSchedule, QuoteServiceError> {
        if !self.gate.allow(client_key) {
            return Err(QuoteServiceError::Throttled);
        }
        Ok(compute_emi(request)?)
    }
}

/// Error raised by the quote service.
#[derive(Debug, thiserror::Error)]
pub enum QuoteServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("too many requests")]
    Throttled,
}
