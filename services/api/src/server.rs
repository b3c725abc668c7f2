use crate::cli::ServeArgs;
use crate::infra::{load_rules, AppState};
use crate::routes::with_screening_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use eligibility::config::AppConfig;
use eligibility::engine::ClauseEngine;
use eligibility::error::AppError;
use eligibility::screening::EligibilityService;
use eligibility::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // A missing or malformed rule set is fatal. Serving checks without rules
    // would deny every applicant.
    let rules = load_rules(&config.rules.path)?;
    let engine = Arc::new(ClauseEngine::new());
    let screening_service = Arc::new(EligibilityService::new(engine, &rules)?);
    info!(rules = %config.rules.path.display(), "rule set consulted");

    let app = with_screening_routes(screening_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "eligibility screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
