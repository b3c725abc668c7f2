//! Logic-rule engine boundary.
//!
//! The screening adapter only ever talks to [`RuleEngine`]: consult a rule
//! source once, assert textual fact clauses, ask a goal for zero-or-more
//! solutions, and retract facts by wildcard pattern. [`ClauseEngine`] is the
//! embedded default implementation covering the clause subset the shipped
//! rule files use; a binding to an external logic system would slot in behind
//! the same four operations.

mod clause;
mod parser;
pub mod term;

use std::collections::BTreeMap;

pub use clause::ClauseEngine;
pub use term::{Literal, PredicateIndicator, Term};

/// One assignment of goal variables produced by [`RuleEngine::query`].
///
/// A ground goal that succeeds yields a single solution with no bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub bindings: BTreeMap<String, Term>,
}

impl Solution {
    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings.get(variable)
    }
}

/// The four black-box operations the screening workflow relies on.
pub trait RuleEngine: Send + Sync {
    /// Load rule clauses and dynamic declarations from textual source.
    fn consult(&self, source: &str) -> Result<(), EngineError>;

    /// Assert one ground fact given as a textual clause.
    fn assert_clause(&self, clause: &str) -> Result<(), EngineError>;

    /// Solve a single-literal goal, returning every solution found.
    fn query(&self, goal: &str) -> Result<Vec<Solution>, EngineError>;

    /// Remove all dynamic facts unifying with the pattern, returning how many
    /// were dropped. Unknown predicates retract nothing.
    fn retract_matching(&self, pattern: &str) -> Result<usize, EngineError>;
}

/// Error enumeration for engine failures.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("syntax error at line {line}: {detail}")]
    Syntax { line: usize, detail: String },
    #[error("predicate {0} is not declared dynamic")]
    NotDynamic(PredicateIndicator),
    #[error("cannot assert non-ground clause '{0}'")]
    NonGround(String),
    #[error("unknown predicate {0}")]
    UnknownPredicate(PredicateIndicator),
    #[error("resolution exceeded depth limit of {0}")]
    DepthLimit(usize),
}
