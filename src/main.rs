use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand, ValueEnum};
use metrics_exporter_prometheus::PrometheusHandle;
use quote_desk::config::AppConfig;
use quote_desk::contact::{contact_router, ContactService, InMemoryContactRepository};
use quote_desk::error::AppError;
use quote_desk::quotes::domain::{FinanceVariant, LoanApplication};
use quote_desk::quotes::engine::{round_currency, QuoteDecision, QuoteEngine};
use quote_desk::quotes::repository::InMemoryQuoteRepository;
use quote_desk::quotes::router::quote_router;
use quote_desk::quotes::service::{compute_emi, EmiRequest, QuoteService};
use quote_desk::ratelimit::SlidingWindowLimiter;
use quote_desk::telemetry;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Quote Desk",
    about = "Run the vehicle-finance quote desk and its calculators from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a single loan application against the published tables
    Quote(QuoteArgs),
    /// Compute an EMI breakdown for a loan amount, rate, and term
    Emi(EmiArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    /// Personal car financing
    Personal,
    /// Commercial truck financing
    Business,
}

impl From<VariantArg> for FinanceVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Personal => FinanceVariant::Personal,
            VariantArg::Business => FinanceVariant::Business,
        }
    }
}

#[derive(Args, Debug)]
struct QuoteArgs {
    /// Financing program to evaluate against
    #[arg(long, value_enum)]
    variant: VariantArg,
    /// Vehicle cost in whole currency units
    #[arg(long)]
    principal: u64,
    /// Down payment in whole currency units
    #[arg(long)]
    down_payment: u64,
    /// Loan term in months (36, 48, 60, 72, or 84)
    #[arg(long)]
    term_months: u32,
    /// Monthly income (personal) or monthly revenue (business)
    #[arg(long)]
    monthly_income: u64,
    /// Credit bureau score (300-900)
    #[arg(long)]
    credit_score: u16,
    /// Years in business, required for the business variant
    #[arg(long)]
    business_age_years: Option<u32>,
}

impl QuoteArgs {
    fn into_application(self) -> LoanApplication {
        LoanApplication {
            variant: self.variant.into(),
            principal_requested: self.principal,
            down_payment: self.down_payment,
            term_months: self.term_months,
            monthly_income: self.monthly_income,
            credit_score: self.credit_score,
            business_age_years: self.business_age_years,
        }
    }
}

#[derive(Args, Debug)]
struct EmiArgs {
    /// Loan amount in whole currency units
    #[arg(long)]
    loan_amount: u64,
    /// Annual interest rate as a percentage
    #[arg(long)]
    rate: f64,
    /// Loan term in months
    #[arg(long)]
    term_months: u32,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Emi(args) => run_emi(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let quote_service = Arc::new(QuoteService::new(
        Arc::new(InMemoryQuoteRepository::default()),
        Arc::new(SlidingWindowLimiter::per_minute(
            config.limits.quote_requests_per_minute,
        )),
    ));
    let contact_service = Arc::new(ContactService::new(
        Arc::new(InMemoryContactRepository::default()),
        Arc::new(SlidingWindowLimiter::per_minute(
            config.limits.contact_requests_per_minute,
        )),
    ));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(quote_router(quote_service))
        .merge(contact_router(contact_service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "quote desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let application = args.into_application();
    let engine = QuoteEngine::standard();
    let decision = engine.evaluate(&application)?;

    println!(
        "{} financing quote for a loan of {}",
        application.variant.label(),
        application.loan_amount()
    );

    match &decision {
        QuoteDecision::Approved(quote) => {
            println!("Status: approved");
            println!(
                "Rate: {}% p.a. over {} months",
                quote.interest_rate_annual_percent, quote.term_months
            );
            println!("Monthly payment: {}", quote.monthly_payment);
            println!("Total payment: {}", round_currency(quote.total_payment));
            println!("Total interest: {}", round_currency(quote.total_interest));
        }
        QuoteDecision::Rejected { .. } => {
            println!("Status: rejected");
            println!("{}", decision.message());
        }
    }

    Ok(())
}

fn run_emi(args: EmiArgs) -> Result<(), AppError> {
    let request = EmiRequest {
        loan_amount: args.loan_amount,
        interest_rate_annual_percent: args.rate,
        term_months: args.term_months,
    };
    let schedule = compute_emi(request)?;

    println!(
        "EMI for {} at {}% p.a. over {} months",
        request.loan_amount, request.interest_rate_annual_percent, request.term_months
    );
    println!("Monthly payment: {}", round_currency(schedule.monthly_payment));
    println!("Total payment: {}", round_currency(schedule.total_payment));
    println!("Total interest: {}", round_currency(schedule.total_interest));

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_args(variant: VariantArg) -> QuoteArgs {
        QuoteArgs {
            variant,
            principal: 1_000_000,
            down_payment: 150_000,
            term_months: 60,
            monthly_income: 50_000,
            credit_score: 780,
            business_age_years: None,
        }
    }

    #[test]
    fn quote_args_build_a_valid_application() {
        let application = quote_args(VariantArg::Personal).into_application();
        assert!(application.validate().is_ok());
        assert_eq!(application.loan_amount(), 850_000);

        let decision = QuoteEngine::standard()
            .evaluate(&application)
            .expect("input is valid");
        assert!(matches!(decision, QuoteDecision::Approved(_)));
    }

    #[test]
    fn business_quote_args_require_business_age() {
        let application = quote_args(VariantArg::Business).into_application();
        assert!(application.validate().is_err());
    }

    #[test]
    fn emi_command_rejects_zero_terms() {
        let result = run_emi(EmiArgs {
            loan_amount: 500_000,
            rate: 9.5,
            term_months: 0,
        });
        assert!(matches!(result, Err(AppError::Quote(_))));
    }
}
