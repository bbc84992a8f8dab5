use serde::{Deserialize, Serialize};

use super::super::domain::LoanApplication;

/// Gate rule recorded on rejected decisions for internal analysis. Outward
/// messaging stays generic (see `QuoteDecision::message`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityRule {
    CreditScoreBelowMinimum,
    BusinessTooYoung,
    IncomeBelowMinimum,
    DownPaymentBelowMinimum,
}

/// Minimums an application must clear before any rate work happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GateThresholds {
    pub min_credit_score: u16,
    pub min_monthly_income: u64,
    pub min_down_payment_percent: u64,
    pub min_business_age_years: Option<u32>,
}

impl GateThresholds {
    pub(crate) const fn personal() -> Self {
        Self {
            min_credit_score: 550,
            min_monthly_income: 25_000,
            min_down_payment_percent: 10,
            min_business_age_years: None,
        }
    }

    pub(crate) const fn business() -> Self {
        Self {
            min_credit_score: 600,
            min_monthly_income: 100_000,
            min_down_payment_percent: 15,
            min_business_age_years: Some(2),
        }
    }

    /// First failing rule, or `None` when financing may proceed.
    pub(crate) fn first_failure(&self, application: &LoanApplication) -> Option<EligibilityRule> {
        if application.credit_score < self.min_credit_score {
            return Some(EligibilityRule::CreditScoreBelowMinimum);
        }

        if let Some(min_age) = self.min_business_age_years {
            if application.business_age_years.unwrap_or(0) < min_age {
                return Some(EligibilityRule::BusinessTooYoung);
            }
        }

        if application.monthly_income < self.min_monthly_income {
            return Some(EligibilityRule::IncomeBelowMinimum);
        }

        // Integer comparison keeps the percentage boundary exact.
        let paid = application.down_payment as u128 * 100;
        let required = application.principal_requested as u128 * self.min_down_payment_percent as u128;
        if paid < required {
            return Some(EligibilityRule::DownPaymentBelowMinimum);
        }

        None
    }
}
