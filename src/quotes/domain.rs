use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

/// Loan terms offered by both finance wizards.
pub const ALLOWED_TERM_MONTHS: [u32; 5] = [36, 48, 60, 72, 84];

/// Credit bureau score bounds in the observed market.
pub const CREDIT_SCORE_RANGE: RangeInclusive<u16> = 300..=900;

/// Distinguishes the personal (car) and commercial (truck) financing programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceVariant {
    Personal,
    Business,
}

impl FinanceVariant {
    pub const fn label(self) -> &'static str {
        match self {
            FinanceVariant::Personal => "personal",
            FinanceVariant::Business => "business",
        }
    }
}

/// Financial inputs to the quote engine, already parsed into whole currency
/// units. String-to-number parsing is the transport layer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub variant: FinanceVariant,
    /// Vehicle cost being financed, before the down payment is subtracted.
    pub principal_requested: u64,
    pub down_payment: u64,
    pub term_months: u32,
    /// Monthly income for individuals, monthly revenue for businesses.
    pub monthly_income: u64,
    pub credit_score: u16,
    /// Required for the business variant only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_age_years: Option<u32>,
}

impl LoanApplication {
    /// Reject out-of-domain input before any rule or rate computation runs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.principal_requested == 0 {
            return Err(ValidationError::NonPositivePrincipal);
        }
        if self.down_payment > self.principal_requested {
            return Err(ValidationError::DownPaymentExceedsPrincipal {
                principal: self.principal_requested,
                down_payment: self.down_payment,
            });
        }
        if !ALLOWED_TERM_MONTHS.contains(&self.term_months) {
            return Err(ValidationError::UnsupportedTerm {
                term_months: self.term_months,
            });
        }
        if self.monthly_income == 0 {
            return Err(ValidationError::NonPositiveIncome);
        }
        if !CREDIT_SCORE_RANGE.contains(&self.credit_score) {
            return Err(ValidationError::CreditScoreOutOfRange {
                credit_score: self.credit_score,
            });
        }
        if self.variant == FinanceVariant::Business && self.business_age_years.is_none() {
            return Err(ValidationError::MissingBusinessAge);
        }
        Ok(())
    }

    /// Financed amount after the down payment. Valid once `validate` passed.
    pub fn loan_amount(&self) -> u64 {
        self.principal_requested - self.down_payment
    }
}

/// Input rejected before the eligibility gate ran. Distinct from a business
/// rejection so callers never conflate the two.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("principal must be a positive amount")]
    NonPositivePrincipal,
    #[error("down payment {down_payment} exceeds principal {principal}")]
    DownPaymentExceedsPrincipal { principal: u64, down_payment: u64 },
    #[error("unsupported loan term of {term_months} months")]
    UnsupportedTerm { term_months: u32 },
    #[error("monthly income or revenue must be a positive amount")]
    NonPositiveIncome,
    #[error("credit score {credit_score} outside the 300-900 range")]
    CreditScoreOutOfRange { credit_score: u16 },
    #[error("business age is required for business applications")]
    MissingBusinessAge,
    #[error("interest rate must be a finite, non-negative percentage")]
    InvalidRate,
}

/// Contact details captured with a quote so the brokerage can follow up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantContact {
    pub customer_name: String,
    pub contact_number: String,
    pub email: String,
}

/// Full wizard submission: who is asking, what for, and the financials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub applicant: ApplicantContact,
    /// Free-form vehicle description (make/model for cars, class for trucks).
    pub vehicle: String,
    pub application: LoanApplication,
}

/// Terminal status persisted with every quote row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Approved,
    Rejected,
}

impl QuoteStatus {
    pub const fn label(self) -> &'static str {
        match self {
            QuoteStatus::Approved => "approved",
            QuoteStatus::Rejected => "rejected",
        }
    }
}
