use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use crate::ratelimit::{client_key, RateLimitGate};

use super::domain::{FinanceVariant, QuoteId, QuoteRequest};
use super::engine::round_currency;
use super::repository::{QuoteRepository, RepositoryError};
use super::service::{EmiRequest, QuoteService, QuoteServiceError};

/// Router builder exposing the car/truck quote wizards and the EMI calculator.
pub fn quote_router<R, G>(service: Arc<QuoteService<R, G>>) -> Router
where
    R: QuoteRepository + 'static,
    G: RateLimitGate + 'static,
{
    Router::new()
        .route("/api/v1/finance/car/quote", post(car_quote_handler::<R, G>))
        .route(
            "/api/v1/finance/truck/quote",
            post(truck_quote_handler::<R, G>),
        )
        .route("/api/v1/finance/emi", post(emi_handler::<R, G>))
        .route(
            "/api/v1/finance/quotes/:quote_id",
            get(quote_status_handler::<R, G>),
        )
        .with_state(service)
}

pub(crate) async fn car_quote_handler<R, G>(
    State(service): State<Arc<QuoteService<R, G>>>,
    headers: HeaderMap,
    axum::Json(mut request): axum::Json<QuoteRequest>,
) -> Response
where
    R: QuoteRepository + 'static,
    G: RateLimitGate + 'static,
{
    // The wizard decides the program, not the payload.
    request.application.variant = FinanceVariant::Personal;
    submit_response(&service, &client_key("car-quote", &headers), request)
}

pub(crate) async fn truck_quote_handler<R, G>(
    State(service): State<Arc<QuoteService<R, G>>>,
    headers: HeaderMap,
    axum::Json(mut request): axum::Json<QuoteRequest>,
) -> Response
where
    R: QuoteRepository + 'static,
    G: RateLimitGate + 'static,
{
    request.application.variant = FinanceVariant::Business;
    submit_response(&service, &client_key("truck-quote", &headers), request)
}

fn submit_response<R, G>(
    service: &QuoteService<R, G>,
    key: &str,
    request: QuoteRequest,
) -> Response
where
    R: QuoteRepository + 'static,
    G: RateLimitGate + 'static,
{
    match service.submit(key, request) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

/// Rounded presentation of an EMI breakdown.
#[derive(Debug, Clone, Serialize)]
struct EmiView {
    loan_amount: u64,
    interest_rate_annual_percent: f64,
    term_months: u32,
    monthly_payment: u64,
    total_payment: u64,
    total_interest: u64,
}

pub(crate) async fn emi_handler<R, G>(
    State(service): State<Arc<QuoteService<R, G>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<EmiRequest>,
) -> Response
where
    R: QuoteRepository + 'static,
    G: RateLimitGate + 'static,
{
    match service.emi(&client_key("emi", &headers), request) {
        Ok(schedule) => {
            let view = EmiView {
                loan_amount: request.loan_amount,
                interest_rate_annual_percent: request.interest_rate_annual_percent,
                term_months: request.term_months,
                monthly_payment: round_currency(schedule.monthly_payment),
                total_payment: round_currency(schedule.total_payment),
                total_interest: round_currency(schedule.total_interest),
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn quote_status_handler<R, G>(
    State(service): State<Arc<QuoteService<R, G>>>,
    Path(quote_id): Path<String>,
) -> Response
where
    R: QuoteRepository + 'static,
    G: RateLimitGate + 'static,
{
    let id = QuoteId(quote_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(QuoteServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "quote not found", "quote_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: QuoteServiceError) -> Response {
    let status = match &error {
        QuoteServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuoteServiceError::Throttled => StatusCode::TOO_MANY_REQUESTS,
        QuoteServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        QuoteServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
