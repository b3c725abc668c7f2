use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use crate::engine::RuleEngine;

use super::domain::{ApplicantAttributes, EligibilityCheckView};
use super::intake::screen_submission;
use super::service::{EligibilityService, EvaluationError};

/// Router builder exposing the eligibility check endpoint.
pub fn eligibility_router<E>(service: Arc<EligibilityService<E>>) -> Router
where
    E: RuleEngine + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/checks", post(check_handler::<E>))
        .with_state(service)
}

pub(crate) async fn check_handler<E>(
    State(service): State<Arc<EligibilityService<E>>>,
    axum::Json(submission): axum::Json<ApplicantAttributes>,
) -> Response
where
    E: RuleEngine + 'static,
{
    let attributes = match screen_submission(submission) {
        Ok(attributes) => attributes,
        Err(violation) => {
            let payload = json!({
                "error": violation.to_string(),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.evaluate(&attributes) {
        Ok(result) => {
            let view = EligibilityCheckView::from_result(&result);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        // An engine failure is a failed check, not a server crash: cleanup
        // has already run and the next submission starts from a clean base.
        Err(EvaluationError {
            applicant_id,
            asserted_facts,
            source,
        }) => {
            let view =
                EligibilityCheckView::from_failure(applicant_id, asserted_facts, source.to_string());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
    }
}
