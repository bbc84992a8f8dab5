mod amortization;
mod eligibility;
mod rates;

pub use amortization::{amortize, round_currency, PaymentSchedule};
pub use eligibility::EligibilityRule;

use serde::{Deserialize, Serialize};

use super::domain::{FinanceVariant, LoanApplication, QuoteStatus, ValidationError};
use eligibility::GateThresholds;
use rates::RateSchedule;

/// Generic rejection copy shown to applicants regardless of the failing rule.
pub const REJECTION_MESSAGE: &str =
    "We apologize, but based on the provided information, we cannot offer financing at this time.";

/// Gate thresholds and rate table for one financing program.
#[derive(Debug, Clone)]
pub struct VariantPolicy {
    gate: GateThresholds,
    rates: RateSchedule,
}

impl VariantPolicy {
    pub fn personal() -> Self {
        Self {
            gate: GateThresholds::personal(),
            rates: RateSchedule::personal(),
        }
    }

    pub fn business() -> Self {
        Self {
            gate: GateThresholds::business(),
            rates: RateSchedule::business(),
        }
    }
}

/// Stateless evaluator shared by the car wizard, the truck wizard, and tests.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    personal: VariantPolicy,
    business: VariantPolicy,
}

impl QuoteEngine {
    pub fn new(personal: VariantPolicy, business: VariantPolicy) -> Self {
        Self { personal, business }
    }

    /// Engine carrying the brokerage's published tables.
    pub fn standard() -> Self {
        Self::new(VariantPolicy::personal(), VariantPolicy::business())
    }

    fn policy_for(&self, variant: FinanceVariant) -> &VariantPolicy {
        match variant {
            FinanceVariant::Personal => &self.personal,
            FinanceVariant::Business => &self.business,
        }
    }

    /// Single entry point: validate, gate, select a rate, amortize.
    /// Ineligibility is a successful evaluation, never an error.
    pub fn evaluate(&self, application: &LoanApplication) -> Result<QuoteDecision, ValidationError> {
        application.validate()?;

        let policy = self.policy_for(application.variant);
        if let Some(rule) = policy.gate.first_failure(application) {
            return Ok(QuoteDecision::Rejected { failed_rule: rule });
        }

        let rate = policy.rates.annual_rate_percent(application.credit_score);
        let loan_amount = application.loan_amount();
        let schedule = amortize(loan_amount as f64, rate, application.term_months);

        Ok(QuoteDecision::Approved(ApprovedQuote {
            loan_amount,
            interest_rate_annual_percent: rate,
            term_months: application.term_months,
            monthly_payment: round_currency(schedule.monthly_payment),
            total_payment: schedule.total_payment,
            total_interest: schedule.total_interest,
        }))
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Terminal outcome of a single evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QuoteDecision {
    Rejected { failed_rule: EligibilityRule },
    Approved(ApprovedQuote),
}

impl QuoteDecision {
    pub fn status(&self) -> QuoteStatus {
        match self {
            QuoteDecision::Rejected { .. } => QuoteStatus::Rejected,
            QuoteDecision::Approved(_) => QuoteStatus::Approved,
        }
    }

    /// Applicant-facing copy. Rejections share one generic message; the
    /// failing rule stays internal.
    pub fn message(&self) -> String {
        match self {
            QuoteDecision::Rejected { .. } => REJECTION_MESSAGE.to_string(),
            QuoteDecision::Approved(quote) => format!(
                "approved at {}% p.a. over {} months",
                quote.interest_rate_annual_percent, quote.term_months
            ),
        }
    }
}

/// Fully computed financing offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovedQuote {
    pub loan_amount: u64,
    pub interest_rate_annual_percent: f64,
    pub term_months: u32,
    /// Rounded to the nearest whole currency unit.
    pub monthly_payment: u64,
    pub total_payment: f64,
    pub total_interest: f64,
}
