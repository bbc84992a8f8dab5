use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::quotes::domain::{
    ApplicantContact, FinanceVariant, LoanApplication, QuoteId, QuoteRequest,
};
use crate::quotes::repository::{
    InMemoryQuoteRepository, QuoteRecord, QuoteRepository, RepositoryError,
};
use crate::quotes::service::QuoteService;
use crate::ratelimit::{RateLimitGate, SlidingWindowLimiter};

pub(super) fn personal_application() -> LoanApplication {
    LoanApplication {
        variant: FinanceVariant::Personal,
        principal_requested: 1_000_000,
        down_payment: 150_000,
        term_months: 60,
        monthly_income: 50_000,
        credit_score: 780,
        business_age_years: None,
    }
}

pub(super) fn business_application() -> LoanApplication {
    LoanApplication {
        variant: FinanceVariant::Business,
        principal_requested: 2_500_000,
        down_payment: 400_000,
        term_months: 48,
        monthly_income: 250_000,
        credit_score: 720,
        business_age_years: Some(5),
    }
}

pub(super) fn quote_request(application: LoanApplication) -> QuoteRequest {
    QuoteRequest {
        applicant: ApplicantContact {
            customer_name: "Asha Verma".to_string(),
            contact_number: "+91 98765 43210".to_string(),
            email: "asha.verma@example.com".to_string(),
        },
        vehicle: "Maruti Suzuki Swift ZXi 2024".to_string(),
        application,
    }
}

pub(super) struct AllowAllGate;

impl RateLimitGate for AllowAllGate {
    fn allow(&self, _key: &str) -> bool {
        true
    }
}

pub(super) struct DenyAllGate;

impl RateLimitGate for DenyAllGate {
    fn allow(&self, _key: &str) -> bool {
        false
    }
}

pub(super) struct UnavailableRepository;

impl QuoteRepository for UnavailableRepository {
    fn insert(&self, _record: QuoteRecord) -> Result<QuoteRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<QuoteRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    Arc<QuoteService<InMemoryQuoteRepository, SlidingWindowLimiter>>,
    Arc<InMemoryQuoteRepository>,
) {
    let repository = Arc::new(InMemoryQuoteRepository::default());
    let gate = Arc::new(SlidingWindowLimiter::per_minute(10_000));
    let service = Arc::new(QuoteService::new(repository.clone(), gate));
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}
