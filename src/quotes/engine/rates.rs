/// Credit-score step table, evaluated top-down with the first matching
/// (highest) threshold winning.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RateSchedule {
    tiers: &'static [(u16, f64)],
    base_rate: f64,
}

const PERSONAL_TIERS: &[(u16, f64)] = &[(750, 7.0), (700, 8.5), (650, 10.0), (600, 12.0)];
const BUSINESS_TIERS: &[(u16, f64)] = &[(750, 8.0), (700, 9.0), (650, 10.0)];

impl RateSchedule {
    pub(crate) const fn personal() -> Self {
        Self {
            tiers: PERSONAL_TIERS,
            base_rate: 14.0,
        }
    }

    pub(crate) const fn business() -> Self {
        Self {
            tiers: BUSINESS_TIERS,
            base_rate: 12.0,
        }
    }

    /// Annual rate (percent) for a gate-passed credit score.
    pub(crate) fn annual_rate_percent(&self, credit_score: u16) -> f64 {
        for (threshold, rate) in self.tiers {
            if credit_score > *threshold {
                return *rate;
            }
        }
        self.base_rate
    }
}
