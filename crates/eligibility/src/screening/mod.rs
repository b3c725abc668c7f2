//! Applicant eligibility screening over the rule-engine boundary.
//!
//! Form input flows through the intake guard into the adapter, which asserts
//! one fact per attribute, asks the rule set a single verdict question, and
//! retracts the facts before answering. The engine never outlives a check
//! with applicant state in it.

pub mod domain;
pub mod facts;
pub mod intake;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantAttributes, ApplicantId, EligibilityCheckView, EligibilityVerdict, EvaluationResult,
};
pub use facts::{applicant_facts, eligibility_goal, Fact, FactPredicate, FactValue};
pub use intake::{screen_submission, IntakeViolation, MAX_APPLICANT_AGE};
pub use router::eligibility_router;
pub use service::{EligibilityService, EvaluationError};
