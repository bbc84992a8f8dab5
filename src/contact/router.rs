use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use crate::ratelimit::{client_key, RateLimitGate};

use super::domain::{ClientMeta, ContactSubmission};
use super::repository::ContactRepository;
use super::service::{ContactService, ContactServiceError};

/// Router builder exposing the public contact-form endpoint.
pub fn contact_router<R, G>(service: Arc<ContactService<R, G>>) -> Router
where
    R: ContactRepository + 'static,
    G: RateLimitGate + 'static,
{
    Router::new()
        .route("/api/v1/contact", post(contact_handler::<R, G>))
        .with_state(service)
}

fn client_meta(headers: &HeaderMap) -> ClientMeta {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("unknown")
            .to_string()
    };

    ClientMeta {
        ip_address: header_value("x-forwarded-for"),
        user_agent: header_value("user-agent"),
    }
}

pub(crate) async fn contact_handler<R, G>(
    State(service): State<Arc<ContactService<R, G>>>,
    headers: HeaderMap,
    axum::Json(submission): axum::Json<ContactSubmission>,
) -> Response
where
    R: ContactRepository + 'static,
    G: RateLimitGate + 'static,
{
    let key = client_key("contact", &headers);
    match service.submit(&key, client_meta(&headers), submission) {
        Ok(_) => {
            let payload = json!({ "message": "Contact form submitted successfully" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(ContactServiceError::Violation(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ContactServiceError::Throttled) => {
            let payload = json!({ "error": "Too many requests" });
            (StatusCode::TOO_MANY_REQUESTS, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
