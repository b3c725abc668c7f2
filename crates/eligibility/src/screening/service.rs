use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::{EngineError, RuleEngine};

use super::domain::{ApplicantAttributes, ApplicantId, EvaluationResult};
use super::facts::{applicant_facts, eligibility_goal, FactPredicate};

/// Adapter owning the rule-engine lifecycle for eligibility checks.
///
/// The rule set is consulted exactly once, at construction. Each call to
/// [`evaluate`](Self::evaluate) asserts the six applicant facts, asks the
/// single verdict question, and retracts the facts again before returning,
/// whatever the outcome.
pub struct EligibilityService<E> {
    engine: Arc<E>,
}

static APPLICANT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_applicant_id() -> ApplicantId {
    let id = APPLICANT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicantId(format!("applicant_{id:06}"))
}

impl<E> EligibilityService<E>
where
    E: RuleEngine + 'static,
{
    /// Consult the rule source and wrap the engine behind the adapter. A rule
    /// set that fails to load is fatal; there is no degraded mode.
    pub fn new(engine: Arc<E>, rules: &str) -> Result<Self, EngineError> {
        engine.consult(rules)?;
        Ok(Self { engine })
    }

    /// Run one eligibility check. Eligible means the verdict query produced
    /// at least one solution.
    pub fn evaluate(
        &self,
        attributes: &ApplicantAttributes,
    ) -> Result<EvaluationResult, EvaluationError> {
        let applicant_id = next_applicant_id();
        let scope = FactScope {
            engine: self.engine.as_ref(),
            applicant: applicant_id.clone(),
        };

        let mut asserted = Vec::with_capacity(6);
        for fact in applicant_facts(&applicant_id, attributes) {
            let clause = fact.to_string();
            if let Err(source) = self.engine.assert_clause(&clause) {
                drop(scope);
                return Err(EvaluationError {
                    applicant_id,
                    asserted_facts: asserted,
                    source,
                });
            }
            asserted.push(clause);
        }
        debug!(applicant = %applicant_id, facts = asserted.len(), "asserted fact set");

        let goal = eligibility_goal(&applicant_id);
        let solutions = match self.engine.query(&goal) {
            Ok(solutions) => solutions,
            Err(source) => {
                drop(scope);
                return Err(EvaluationError {
                    applicant_id,
                    asserted_facts: asserted,
                    source,
                });
            }
        };

        let eligible = !solutions.is_empty();
        debug!(applicant = %applicant_id, eligible, "eligibility query answered");
        drop(scope);

        Ok(EvaluationResult {
            applicant_id,
            eligible,
            asserted_facts: asserted,
        })
    }
}

/// Scope guard retracting every applicant fact when dropped, so the fact base
/// is clean again on success and on every error path. A cleanup failure is
/// logged and swallowed; it must not mask the primary outcome.
struct FactScope<'a, E: RuleEngine> {
    engine: &'a E,
    applicant: ApplicantId,
}

impl<E: RuleEngine> Drop for FactScope<'_, E> {
    fn drop(&mut self) {
        for predicate in FactPredicate::ordered() {
            let pattern = predicate.retract_pattern(&self.applicant);
            if let Err(error) = self.engine.retract_matching(&pattern) {
                warn!(applicant = %self.applicant, %pattern, %error, "fact cleanup failed");
            }
        }
    }
}

/// Error raised when the engine rejects an assertion or the verdict query.
/// Cleanup has already run by the time the caller sees this; the carried fact
/// list records what had been asserted before the failure.
#[derive(Debug, thiserror::Error)]
#[error("evaluation failed for {applicant_id}: {source}")]
pub struct EvaluationError {
    pub applicant_id: ApplicantId,
    pub asserted_facts: Vec<String>,
    #[source]
    pub source: EngineError,
}
