//! Loan quoting workflow: input validation, the eligibility gate, rate
//! selection, amortization, and the service/repository/router layers the
//! car wizard, truck wizard, and EMI calculator share.

pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantContact, FinanceVariant, LoanApplication, QuoteId, QuoteRequest, QuoteStatus,
    ValidationError, ALLOWED_TERM_MONTHS, CREDIT_SCORE_RANGE,
};
pub use engine::{
    amortize, round_currency, ApprovedQuote, EligibilityRule, PaymentSchedule, QuoteDecision,
    QuoteEngine, VariantPolicy, REJECTION_MESSAGE,
};
pub use repository::{
    InMemoryQuoteRepository, QuoteRecord, QuoteRepository, QuoteStatusView, RepositoryError,
};
pub use router::quote_router;
pub use service::{compute_emi, EmiRequest, QuoteService, QuoteServiceError};
