use std::sync::Arc;

use super::common::{
    assert_fact_base_clean, attributes, build_service, build_service_with_rules, RecordingEngine,
    BROKEN_QUERY_RULES, MISSING_DYNAMIC_RULES, RULES,
};
use crate::engine::EngineError;
use crate::screening::domain::ApplicantAttributes;
use crate::screening::service::EligibilityService;

#[test]
fn approves_a_fully_qualifying_applicant() {
    let (service, _) = build_service();

    let result = service.evaluate(&attributes()).expect("evaluation completes");

    assert!(result.eligible);
    assert_eq!(result.asserted_facts.len(), 6);
    assert!(result.applicant_id.0.starts_with("applicant_"));
}

#[test]
fn any_failed_condition_denies_eligibility() {
    let (service, _) = build_service();

    let variations: [(&str, fn(&mut ApplicantAttributes)); 6] = [
        ("foreign nationality", |a| {
            a.nationality = "Atlantis".to_string()
        }),
        ("underage", |a| a.age = 17),
        ("no job offer", |a| a.has_job_offer = false),
        ("salary below minimum", |a| a.salary_meets_minimum = false),
        ("missing skills", |a| a.has_required_skills = false),
        ("criminal record", |a| a.has_clean_record = false),
    ];

    for (label, vary) in variations {
        let mut submission = attributes();
        vary(&mut submission);

        let result = service.evaluate(&submission).expect("evaluation completes");
        assert!(!result.eligible, "{label} should deny eligibility");
    }
}

#[test]
fn reported_facts_follow_the_schema_order() {
    let (service, _) = build_service();

    let result = service.evaluate(&attributes()).expect("evaluation completes");

    let expected_prefixes = [
        "nationality(",
        "has_job_offer(",
        "salary_meets_minimum(",
        "has_required_skills(",
        "has_clean_record(",
        "age_eligible(",
    ];
    for (fact, prefix) in result.asserted_facts.iter().zip(expected_prefixes) {
        assert!(fact.starts_with(prefix), "{fact} should start with {prefix}");
    }
}

#[test]
fn engine_sees_asserts_then_query_then_retracts() {
    let engine = Arc::new(RecordingEngine::new());
    let service = EligibilityService::new(engine.clone(), RULES).expect("rule set consults");

    let result = service.evaluate(&attributes()).expect("evaluation completes");
    let id = &result.applicant_id;

    let expected = vec![
        "consult".to_string(),
        format!("assert nationality({id}, countryx)"),
        format!("assert has_job_offer({id}, true)"),
        format!("assert salary_meets_minimum({id}, true)"),
        format!("assert has_required_skills({id}, true)"),
        format!("assert has_clean_record({id}, true)"),
        format!("assert age_eligible({id}, true)"),
        format!("query is_eligible({id})"),
        format!("retract nationality({id}, _)"),
        format!("retract has_job_offer({id}, _)"),
        format!("retract salary_meets_minimum({id}, _)"),
        format!("retract has_required_skills({id}, _)"),
        format!("retract has_clean_record({id}, _)"),
        format!("retract age_eligible({id}, _)"),
    ];
    assert_eq!(engine.operations(), expected);
}

#[test]
fn facts_are_retracted_after_an_eligible_check() {
    let (service, engine) = build_service();

    let result = service.evaluate(&attributes()).expect("evaluation completes");

    assert!(result.eligible);
    assert_fact_base_clean(&engine, &result.applicant_id.0);
}

#[test]
fn facts_are_retracted_after_a_denied_check() {
    let (service, engine) = build_service();
    let mut submission = attributes();
    submission.has_clean_record = false;

    let result = service.evaluate(&submission).expect("evaluation completes");

    assert!(!result.eligible);
    assert_fact_base_clean(&engine, &result.applicant_id.0);
}

#[test]
fn evaluations_mint_distinct_applicant_ids() {
    let (service, _) = build_service();

    let first = service.evaluate(&attributes()).expect("evaluation completes");
    let second = service.evaluate(&attributes()).expect("evaluation completes");

    assert_ne!(first.applicant_id, second.applicant_id);
}

#[test]
fn sequential_checks_never_cross_contaminate() {
    let (service, engine) = build_service();

    let first = service.evaluate(&attributes()).expect("evaluation completes");
    assert!(first.eligible);

    let mut denied = attributes();
    denied.has_job_offer = false;
    let second = service.evaluate(&denied).expect("evaluation completes");
    assert!(!second.eligible);

    // The denial left nothing behind that could taint the next check.
    let third = service.evaluate(&attributes()).expect("evaluation completes");
    assert!(third.eligible);

    for id in [&first.applicant_id, &second.applicant_id, &third.applicant_id] {
        assert_fact_base_clean(&engine, &id.0);
    }
}

#[test]
fn a_rejected_assertion_reports_partial_facts_and_leaves_no_residue() {
    let (service, engine) = build_service_with_rules(MISSING_DYNAMIC_RULES);

    let error = service
        .evaluate(&attributes())
        .expect_err("sixth assertion is rejected");

    assert_eq!(error.asserted_facts.len(), 5);
    assert!(matches!(error.source, EngineError::NotDynamic(_)));
    assert_fact_base_clean(&engine, &error.applicant_id.0);
}

#[test]
fn a_failing_query_is_an_error_with_no_residue() {
    let (service, engine) = build_service_with_rules(BROKEN_QUERY_RULES);

    let error = service
        .evaluate(&attributes())
        .expect_err("verdict query fails");

    assert_eq!(error.asserted_facts.len(), 6);
    assert!(matches!(error.source, EngineError::UnknownPredicate(_)));
    assert_fact_base_clean(&engine, &error.applicant_id.0);
}

#[test]
fn evaluation_errors_name_the_applicant() {
    let (service, _) = build_service_with_rules(BROKEN_QUERY_RULES);

    let error = service
        .evaluate(&attributes())
        .expect_err("verdict query fails");

    let rendered = error.to_string();
    assert!(rendered.starts_with("evaluation failed for applicant_"));
    assert!(rendered.contains("unknown predicate employment_record/2"));
}
