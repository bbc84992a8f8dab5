//! Contact-form intake: sanitization, field validation, and the storage and
//! rate-limit seams behind the site's lead-generation form.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{ClientMeta, ContactSubmission, ContactViolation, SanitizedContact};
pub use repository::{
    ContactRecord, ContactRepository, ContactStatus, ContactStoreError, InMemoryContactRepository,
    SubmissionId,
};
pub use router::contact_router;
pub use service::{ContactService, ContactServiceError};
