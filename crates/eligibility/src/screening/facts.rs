//! Typed fact construction for the rule base.
//!
//! The engine boundary is textual, so everything asserted for an applicant is
//! built here from typed parts and rendered through the engine's term model.
//! Free-text input ends up inside a quoted, escaped atom rather than spliced
//! into clause syntax.

use std::fmt;

use crate::engine::{Literal, Term};

use super::domain::{ApplicantAttributes, ApplicantId};

/// Predicate asked once per check to obtain the verdict. Defined by the
/// consulted rule set, opaque to the service.
const ELIGIBILITY_PREDICATE: &str = "is_eligible";

/// The fixed fact schema asserted for every applicant, in assertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactPredicate {
    Nationality,
    HasJobOffer,
    SalaryMeetsMinimum,
    HasRequiredSkills,
    HasCleanRecord,
    AgeEligible,
}

impl FactPredicate {
    pub const fn ordered() -> [FactPredicate; 6] {
        [
            FactPredicate::Nationality,
            FactPredicate::HasJobOffer,
            FactPredicate::SalaryMeetsMinimum,
            FactPredicate::HasRequiredSkills,
            FactPredicate::HasCleanRecord,
            FactPredicate::AgeEligible,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            FactPredicate::Nationality => "nationality",
            FactPredicate::HasJobOffer => "has_job_offer",
            FactPredicate::SalaryMeetsMinimum => "salary_meets_minimum",
            FactPredicate::HasRequiredSkills => "has_required_skills",
            FactPredicate::HasCleanRecord => "has_clean_record",
            FactPredicate::AgeEligible => "age_eligible",
        }
    }

    /// Wildcard pattern retracting every fact of this predicate for one
    /// applicant, whatever the second argument holds.
    pub fn retract_pattern(self, applicant: &ApplicantId) -> String {
        Literal {
            predicate: self.name().to_string(),
            args: vec![
                Term::Atom(applicant.0.clone()),
                Term::Var("_".to_string()),
            ],
        }
        .to_string()
    }
}

/// Value carried by a fact's second argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactValue {
    Symbol(String),
    Flag(bool),
}

/// One typed fact scoped to an applicant, rendered to clause text on assert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub predicate: FactPredicate,
    pub applicant: ApplicantId,
    pub value: FactValue,
}

impl Fact {
    fn value_term(&self) -> Term {
        match &self.value {
            FactValue::Symbol(text) => Term::Atom(text.clone()),
            FactValue::Flag(true) => Term::Atom("true".to_string()),
            FactValue::Flag(false) => Term::Atom("false".to_string()),
        }
    }

    pub fn literal(&self) -> Literal {
        Literal {
            predicate: self.predicate.name().to_string(),
            args: vec![Term::Atom(self.applicant.0.clone()), self.value_term()],
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literal())
    }
}

/// Derive the six facts describing an applicant, in assertion order.
pub fn applicant_facts(applicant: &ApplicantId, attributes: &ApplicantAttributes) -> [Fact; 6] {
    let fact = |predicate: FactPredicate, value: FactValue| Fact {
        predicate,
        applicant: applicant.clone(),
        value,
    };

    [
        fact(
            FactPredicate::Nationality,
            FactValue::Symbol(attributes.normalized_nationality()),
        ),
        fact(
            FactPredicate::HasJobOffer,
            FactValue::Flag(attributes.has_job_offer),
        ),
        fact(
            FactPredicate::SalaryMeetsMinimum,
            FactValue::Flag(attributes.salary_meets_minimum),
        ),
        fact(
            FactPredicate::HasRequiredSkills,
            FactValue::Flag(attributes.has_required_skills),
        ),
        fact(
            FactPredicate::HasCleanRecord,
            FactValue::Flag(attributes.has_clean_record),
        ),
        fact(
            FactPredicate::AgeEligible,
            FactValue::Flag(attributes.age_eligible()),
        ),
    ]
}

/// Goal text asking the rule set for one applicant's verdict.
pub fn eligibility_goal(applicant: &ApplicantId) -> String {
    Literal {
        predicate: ELIGIBILITY_PREDICATE.to_string(),
        args: vec![Term::Atom(applicant.0.clone())],
    }
    .to_string()
}
