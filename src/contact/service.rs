use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::ratelimit::RateLimitGate;

use super::domain::{ClientMeta, ContactSubmission, ContactViolation};
use super::repository::{
    ContactRecord, ContactRepository, ContactStatus, ContactStoreError, SubmissionId,
};

/// Service composing the rate-limit gate, form validation, and the store.
pub struct ContactService<R, G> {
    repository: Arc<R>,
    gate: Arc<G>,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("ct-{id:06}"))
}

impl<R, G> ContactService<R, G>
where
    R: ContactRepository + 'static,
    G: RateLimitGate + 'static,
{
    pub fn new(repository: Arc<R>, gate: Arc<G>) -> Self {
        Self { repository, gate }
    }

    /// Validate and store one contact-form submission.
    pub fn submit(
        &self,
        client_key: &str,
        client: ClientMeta,
        submission: ContactSubmission,
    ) -> Result<ContactRecord, ContactServiceError> {
        if !self.gate.allow(client_key) {
            return Err(ContactServiceError::Throttled);
        }

        let contact = submission.sanitize()?;
        let record = ContactRecord {
            submission_id: next_submission_id(),
            created_at: Utc::now(),
            contact,
            client,
            status: ContactStatus::New,
        };

        let stored = self.repository.insert(record)?;
        info!(submission_id = %stored.submission_id.0, "contact submission stored");
        Ok(stored)
    }

    /// Latest submissions for the back-office listing.
    pub fn recent(&self, limit: usize) -> Result<Vec<ContactRecord>, ContactServiceError> {
        Ok(self.repository.recent(limit)?)
    }

    /// Back-office triage: mark a submission handled.
    pub fn mark_reviewed(&self, id: &SubmissionId) -> Result<(), ContactServiceError> {
        Ok(self.repository.mark_reviewed(id)?)
    }
}

/// Error raised by the contact service.
#[derive(Debug, thiserror::Error)]
pub enum ContactServiceError {
    #[error(transparent)]
    Violation(#[from] ContactViolation),
    #[error(transparent)]
    Store(#[from] ContactStoreError),
    #[error("too many requests")]
    Throttled,
}
