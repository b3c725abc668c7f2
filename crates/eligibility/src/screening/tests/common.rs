use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::engine::{ClauseEngine, EngineError, RuleEngine, Solution};
use crate::screening::domain::ApplicantAttributes;
use crate::screening::service::EligibilityService;
use crate::screening::{eligibility_router, FactPredicate};

/// Rule set exercising the same contract as the shipped configuration:
/// six dynamic fact predicates, a nationality allow-list, one verdict rule.
pub(super) const RULES: &str = "\
:- dynamic(nationality/2).
:- dynamic(has_job_offer/2).
:- dynamic(salary_meets_minimum/2).
:- dynamic(has_required_skills/2).
:- dynamic(has_clean_record/2).
:- dynamic(age_eligible/2).

eligible_nationality(countryx).
eligible_nationality(countryy).
eligible_nationality(countryz).

is_eligible(Applicant) :-
    nationality(Applicant, Nationality),
    eligible_nationality(Nationality),
    has_job_offer(Applicant, true),
    salary_meets_minimum(Applicant, true),
    has_required_skills(Applicant, true),
    has_clean_record(Applicant, true),
    age_eligible(Applicant, true).
";

/// Verdict rule referencing a predicate nobody defines, so the query itself
/// fails after all six facts were asserted.
pub(super) const BROKEN_QUERY_RULES: &str = "\
:- dynamic(nationality/2).
:- dynamic(has_job_offer/2).
:- dynamic(salary_meets_minimum/2).
:- dynamic(has_required_skills/2).
:- dynamic(has_clean_record/2).
:- dynamic(age_eligible/2).

is_eligible(Applicant) :-
    nationality(Applicant, _),
    employment_record(Applicant, verified).
";

/// Rule set missing the age_eligible declaration, so the sixth assertion is
/// rejected after five succeeded.
pub(super) const MISSING_DYNAMIC_RULES: &str = "\
:- dynamic(nationality/2).
:- dynamic(has_job_offer/2).
:- dynamic(salary_meets_minimum/2).
:- dynamic(has_required_skills/2).
:- dynamic(has_clean_record/2).

is_eligible(Applicant) :-
    nationality(Applicant, _).
";

pub(super) fn attributes() -> ApplicantAttributes {
    ApplicantAttributes {
        nationality: "CountryX".to_string(),
        age: 30,
        has_job_offer: true,
        salary_meets_minimum: true,
        has_required_skills: true,
        has_clean_record: true,
    }
}

pub(super) fn build_service() -> (EligibilityService<ClauseEngine>, Arc<ClauseEngine>) {
    build_service_with_rules(RULES)
}

pub(super) fn build_service_with_rules(
    rules: &str,
) -> (EligibilityService<ClauseEngine>, Arc<ClauseEngine>) {
    let engine = Arc::new(ClauseEngine::new());
    let service = EligibilityService::new(engine.clone(), rules).expect("rule set consults");
    (service, engine)
}

pub(super) fn eligibility_router_with_rules(rules: &str) -> axum::Router {
    let (service, _) = build_service_with_rules(rules);
    eligibility_router(Arc::new(service))
}

/// Assert that no fact of any screening predicate survives for `applicant`.
pub(super) fn assert_fact_base_clean(engine: &ClauseEngine, applicant: &str) {
    for predicate in FactPredicate::ordered() {
        let probe = format!("{}({applicant}, _)", predicate.name());
        let solutions = engine.query(&probe).unwrap_or_default();
        assert!(
            solutions.is_empty(),
            "residual {} facts for {applicant}",
            predicate.name()
        );
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Engine double that records every boundary call while delegating to a real
/// clause engine, so ordering and cleanup behavior can be asserted.
pub(super) struct RecordingEngine {
    inner: ClauseEngine,
    log: Mutex<Vec<String>>,
}

impl RecordingEngine {
    pub(super) fn new() -> Self {
        Self {
            inner: ClauseEngine::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn operations(&self) -> Vec<String> {
        self.log.lock().expect("operation log mutex poisoned").clone()
    }

    fn record(&self, entry: String) {
        self.log
            .lock()
            .expect("operation log mutex poisoned")
            .push(entry);
    }
}

impl RuleEngine for RecordingEngine {
    fn consult(&self, source: &str) -> Result<(), EngineError> {
        self.record("consult".to_string());
        self.inner.consult(source)
    }

    fn assert_clause(&self, clause: &str) -> Result<(), EngineError> {
        self.record(format!("assert {clause}"));
        self.inner.assert_clause(clause)
    }

    fn query(&self, goal: &str) -> Result<Vec<Solution>, EngineError> {
        self.record(format!("query {goal}"));
        self.inner.query(goal)
    }

    fn retract_matching(&self, pattern: &str) -> Result<usize, EngineError> {
        self.record(format!("retract {pattern}"));
        self.inner.retract_matching(pattern)
    }
}
