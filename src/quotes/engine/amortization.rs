use serde::{Deserialize, Serialize};

/// Fixed-payment breakdown under reducing-balance amortization. Amounts keep
/// sub-unit precision; callers round for display and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// Standard annuity formula. `term_months` must be at least 1; a zero rate
/// falls back to straight-line division instead of dividing by zero.
pub fn amortize(loan_amount: f64, annual_rate_percent: f64, term_months: u32) -> PaymentSchedule {
    let monthly_rate = annual_rate_percent / 12.0 / 100.0;

    let monthly_payment = if monthly_rate == 0.0 {
        loan_amount / term_months as f64
    } else {
        let growth = (1.0 + monthly_rate).powi(term_months as i32);
        loan_amount * monthly_rate * growth / (growth - 1.0)
    };

    let total_payment = monthly_payment * term_months as f64;

    PaymentSchedule {
        monthly_payment,
        total_payment,
        total_interest: total_payment - loan_amount,
    }
}

/// Round to the nearest whole currency unit, half away from zero.
pub fn round_currency(amount: f64) -> u64 {
    amount.round() as u64
}
