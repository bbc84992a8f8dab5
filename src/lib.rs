//! Loan quoting and lead intake service for a vehicle finance brokerage.
//!
//! The core is a pure quote engine: an eligibility gate, credit-score rate
//! tables, and reducing-balance amortization, parameterized by financing
//! variant (personal car loans vs. commercial truck loans). Around it sit
//! thin service and HTTP layers, the contact-form intake the marketing site
//! posts to, and the rate-limit and persistence seams those callers consume.

pub mod config;
pub mod contact;
pub mod error;
pub mod quotes;
pub mod ratelimit;
pub mod telemetry;
