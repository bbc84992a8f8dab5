use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use tower::ServiceExt;

use super::common::*;
use crate::quotes::router::{quote_router, quote_status_handler};
use crate::quotes::service::QuoteService;
use crate::ratelimit::SlidingWindowLimiter;

fn post_json(uri: &str, body: Vec<u8>) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body))
        .expect("request builds")
}

#[tokio::test]
async fn car_quote_route_returns_approved_view() {
    let (service, _) = build_service();
    let router = quote_router(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/finance/car/quote",
            serde_json::to_vec(&quote_request(personal_application())).unwrap(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "approved");
    assert!(payload["quote_id"].as_str().is_some());
    assert_eq!(payload["loan_amount"], 850_000);
    assert_eq!(payload["interest_rate_annual_percent"], 7.0);
    assert!(payload["monthly_payment"].as_u64().is_some());
}

#[tokio::test]
async fn truck_route_applies_business_rules_regardless_of_payload_variant() {
    let (service, _) = build_service();
    let router = quote_router(service);

    // Payload claims personal; the truck wizard still runs the business gate.
    let mut application = business_application();
    application.variant = crate::quotes::FinanceVariant::Personal;

    let response = router
        .oneshot(post_json(
            "/api/v1/finance/truck/quote",
            serde_json::to_vec(&quote_request(application)).unwrap(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "approved");
    // 720 lands in the business >700 tier, not the personal 8.5 tier.
    assert_eq!(payload["interest_rate_annual_percent"], 9.0);
}

#[tokio::test]
async fn rejected_quotes_return_the_generic_message() {
    let (service, _) = build_service();
    let router = quote_router(service);

    let mut application = personal_application();
    application.down_payment = 50_000;

    let response = router
        .oneshot(post_json(
            "/api/v1/finance/car/quote",
            serde_json::to_vec(&quote_request(application)).unwrap(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "rejected");
    assert!(payload["message"]
        .as_str()
        .expect("message present")
        .contains("cannot offer financing"));
    assert!(payload.get("monthly_payment").is_none());
}

#[tokio::test]
async fn invalid_input_maps_to_unprocessable_entity() {
    let (service, _) = build_service();
    let router = quote_router(service);

    let mut application = personal_application();
    application.term_months = 40;

    let response = router
        .oneshot(post_json(
            "/api/v1/finance/car/quote",
            serde_json::to_vec(&quote_request(application)).unwrap(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error present")
        .contains("unsupported loan term"));
}

#[tokio::test]
async fn quote_routes_throttle_after_the_budget() {
    let repository = Arc::new(crate::quotes::repository::InMemoryQuoteRepository::default());
    let gate = Arc::new(SlidingWindowLimiter::per_minute(1));
    let service = Arc::new(QuoteService::new(repository, gate));
    let router = quote_router(service);

    let first = router
        .clone()
        .oneshot(post_json(
            "/api/v1/finance/car/quote",
            serde_json::to_vec(&quote_request(personal_application())).unwrap(),
        ))
        .await
        .expect("route executes");
    assert_eq!(first.status(), StatusCode::OK);

    let second = router
        .oneshot(post_json(
            "/api/v1/finance/car/quote",
            serde_json::to_vec(&quote_request(personal_application())).unwrap(),
        ))
        .await
        .expect("route executes");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn emi_route_returns_rounded_breakdown() {
    let (service, _) = build_service();
    let router = quote_router(service);

    let body = serde_json::json!({
        "loan_amount": 1_000_000,
        "interest_rate_annual_percent": 9.5,
        "term_months": 36,
    });

    let response = router
        .oneshot(post_json(
            "/api/v1/finance/emi",
            serde_json::to_vec(&body).unwrap(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let monthly = payload["monthly_payment"].as_u64().expect("rounded payment");
    assert!((31_000..=33_000).contains(&monthly));
    let total = payload["total_payment"].as_u64().expect("rounded total");
    assert_eq!(
        payload["total_interest"].as_u64().expect("rounded interest"),
        total - 1_000_000
    );
}

#[tokio::test]
async fn emi_route_rejects_zero_terms() {
    let (service, _) = build_service();
    let router = quote_router(service);

    let body = serde_json::json!({
        "loan_amount": 1_000_000,
        "interest_rate_annual_percent": 9.5,
        "term_months": 0,
    });

    let response = router
        .oneshot(post_json(
            "/api/v1/finance/emi",
            serde_json::to_vec(&body).unwrap(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn status_route_round_trips_stored_quotes() {
    let (service, _) = build_service();

    let record = service
        .submit("car-quote:test", quote_request(personal_application()))
        .expect("submission succeeds");

    let router = quote_router(service.clone());
    let response = router
        .oneshot(
            axum::http::Request::get(format!("/api/v1/finance/quotes/{}", record.quote_id.0))
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["quote_id"], record.quote_id.0);
    assert_eq!(payload["status"], "approved");
}

#[tokio::test]
async fn status_handler_returns_not_found_for_unknown_ids() {
    let (service, _) = build_service();

    let response = quote_status_handler(
        State(service),
        axum::extract::Path("qt-999999".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "quote not found");
}
