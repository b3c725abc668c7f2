use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for screened applicants. A fresh id is minted per
/// evaluation so concurrent checks never share facts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attributes collected from the intake form, one set per check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantAttributes {
    pub nationality: String,
    pub age: u8,
    pub has_job_offer: bool,
    pub salary_meets_minimum: bool,
    pub has_required_skills: bool,
    pub has_clean_record: bool,
}

impl ApplicantAttributes {
    /// Nationality as it is asserted into the rule base: trimmed, lowercased.
    pub fn normalized_nationality(&self) -> String {
        self.nationality.trim().to_lowercase()
    }

    /// Locally derived age window check, 18 through 60 inclusive.
    pub fn age_eligible(&self) -> bool {
        (18..=60).contains(&self.age)
    }
}

/// High level verdict reported for an eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityVerdict {
    Eligible,
    NotEligible,
}

impl EligibilityVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityVerdict::Eligible => "eligible",
            EligibilityVerdict::NotEligible => "not_eligible",
        }
    }

    pub const fn from_eligible(eligible: bool) -> Self {
        if eligible {
            Self::Eligible
        } else {
            Self::NotEligible
        }
    }
}

/// Outcome of one evaluation round trip through the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub applicant_id: ApplicantId,
    pub eligible: bool,
    /// Clause text of every fact asserted for this check, in assertion order.
    pub asserted_facts: Vec<String>,
}

impl EvaluationResult {
    pub fn verdict(&self) -> EligibilityVerdict {
        EligibilityVerdict::from_eligible(self.eligible)
    }
}

/// Sanitized representation of a completed check for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityCheckView {
    pub applicant_id: ApplicantId,
    pub verdict: &'static str,
    pub eligible: bool,
    pub asserted_facts: Vec<String>,
    pub checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EligibilityCheckView {
    pub fn from_result(result: &EvaluationResult) -> Self {
        Self {
            applicant_id: result.applicant_id.clone(),
            verdict: result.verdict().label(),
            eligible: result.eligible,
            asserted_facts: result.asserted_facts.clone(),
            checked_at: Utc::now(),
            error: None,
        }
    }

    /// View for a check the engine could not complete. The check is reported
    /// as failed, never as eligible.
    pub fn from_failure(
        applicant_id: ApplicantId,
        asserted_facts: Vec<String>,
        error: String,
    ) -> Self {
        Self {
            applicant_id,
            verdict: EligibilityVerdict::NotEligible.label(),
            eligible: false,
            asserted_facts,
            checked_at: Utc::now(),
            error: Some(error),
        }
    }
}
