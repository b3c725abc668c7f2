use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Extension;
use axum::Json;
use eligibility::engine::RuleEngine;
use eligibility::screening::{eligibility_router, EligibilityService};
use serde_json::json;
use std::sync::Arc;

use crate::infra::AppState;

pub(crate) fn with_screening_routes<E>(service: Arc<EligibilityService<E>>) -> axum::Router
where
    E: RuleEngine + 'static,
{
    eligibility_router(service)
        .route("/", axum::routing::get(form_page))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

/// Intake form served at the root. Submits to the JSON check endpoint and
/// renders the verdict in place.
pub(crate) async fn form_page() -> Html<&'static str> {
    Html(include_str!("form.html"))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn form_page_embeds_the_intake_form() {
        let Html(markup) = form_page().await;
        assert!(markup.contains("name=\"nationality\""));
        assert!(markup.contains("Check Eligibility"));
        assert!(markup.contains("/api/v1/eligibility/checks"));
    }
}
