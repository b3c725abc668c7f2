//! Embedded clause engine: a mutex-guarded knowledge base with depth-limited
//! resolution over conjunctive rule bodies.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use super::parser::{parse_literal, parse_program, Item};
use super::term::{Literal, PredicateIndicator, Term};
use super::{EngineError, RuleEngine, Solution};

/// Rule expansions allowed along a single derivation path. A pathological
/// rule set fails the query instead of hanging the request.
const MAX_RESOLUTION_DEPTH: usize = 256;

type Bindings = BTreeMap<String, Term>;

#[derive(Debug, Clone)]
struct Rule {
    head: Literal,
    body: Vec<Literal>,
}

/// Consulted clauses plus the runtime fact store.
///
/// Static clauses (rules and plain facts from the consulted source) are kept
/// apart from dynamic facts: only the latter can be asserted and retracted.
#[derive(Debug, Default)]
struct KnowledgeBase {
    dynamic: HashSet<PredicateIndicator>,
    rules: HashMap<PredicateIndicator, Vec<Rule>>,
    facts: HashMap<PredicateIndicator, Vec<Vec<Term>>>,
}

impl KnowledgeBase {
    fn knows(&self, indicator: &PredicateIndicator) -> bool {
        self.dynamic.contains(indicator)
            || self.rules.contains_key(indicator)
            || self.facts.contains_key(indicator)
    }
}

/// Default [`RuleEngine`] implementation backing the screening service.
#[derive(Debug, Default)]
pub struct ClauseEngine {
    state: Mutex<KnowledgeBase>,
}

impl ClauseEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleEngine for ClauseEngine {
    fn consult(&self, source: &str) -> Result<(), EngineError> {
        let items = parse_program(source)?;
        let mut state = self.state.lock().expect("knowledge base mutex poisoned");

        for item in items {
            match item {
                Item::Dynamic(indicator) => {
                    state.facts.entry(indicator.clone()).or_default();
                    state.dynamic.insert(indicator);
                }
                Item::Clause { head, body } => {
                    let indicator = head.indicator();
                    if body.is_empty() && state.dynamic.contains(&indicator) {
                        state.facts.entry(indicator).or_default().push(head.args);
                    } else {
                        state
                            .rules
                            .entry(indicator)
                            .or_default()
                            .push(Rule { head, body });
                    }
                }
            }
        }

        Ok(())
    }

    fn assert_clause(&self, clause: &str) -> Result<(), EngineError> {
        let literal = parse_literal(clause)?;
        if !literal.is_ground() {
            return Err(EngineError::NonGround(clause.trim().to_string()));
        }

        let indicator = literal.indicator();
        let mut state = self.state.lock().expect("knowledge base mutex poisoned");
        if !state.dynamic.contains(&indicator) {
            return Err(EngineError::NotDynamic(indicator));
        }

        state.facts.entry(indicator).or_default().push(literal.args);
        Ok(())
    }

    fn query(&self, goal: &str) -> Result<Vec<Solution>, EngineError> {
        let goal = parse_literal(goal)?;

        let mut variables: Vec<String> = Vec::new();
        for arg in &goal.args {
            if let Term::Var(name) = arg {
                if name != "_" && !variables.contains(name) {
                    variables.push(name.clone());
                }
            }
        }

        let state = self.state.lock().expect("knowledge base mutex poisoned");
        let mut results = Vec::new();
        let mut fresh = 0usize;
        solve(
            &state,
            &[goal],
            &Bindings::new(),
            0,
            &mut fresh,
            &mut results,
        )?;

        Ok(results
            .into_iter()
            .map(|bindings| {
                let mut resolved = BTreeMap::new();
                for name in &variables {
                    resolved.insert(name.clone(), walk(&Term::Var(name.clone()), &bindings));
                }
                Solution { bindings: resolved }
            })
            .collect())
    }

    fn retract_matching(&self, pattern: &str) -> Result<usize, EngineError> {
        let pattern = parse_literal(pattern)?;
        let indicator = pattern.indicator();

        let mut state = self.state.lock().expect("knowledge base mutex poisoned");
        if !state.dynamic.contains(&indicator) {
            if state.rules.contains_key(&indicator) {
                return Err(EngineError::NotDynamic(indicator));
            }
            return Ok(0);
        }

        let Some(entries) = state.facts.get_mut(&indicator) else {
            return Ok(0);
        };

        let before = entries.len();
        entries.retain(|args| unify_args(&pattern.args, args, &Bindings::new()).is_none());
        Ok(before - entries.len())
    }
}

/// Depth-first resolution of a goal conjunction, collecting every binding set
/// that satisfies it.
fn solve(
    kb: &KnowledgeBase,
    goals: &[Literal],
    bindings: &Bindings,
    depth: usize,
    fresh: &mut usize,
    out: &mut Vec<Bindings>,
) -> Result<(), EngineError> {
    let Some((goal, rest)) = goals.split_first() else {
        out.push(bindings.clone());
        return Ok(());
    };

    let indicator = goal.indicator();
    if !kb.knows(&indicator) {
        return Err(EngineError::UnknownPredicate(indicator));
    }

    if let Some(entries) = kb.facts.get(&indicator) {
        for args in entries {
            if let Some(next) = unify_args(&goal.args, args, bindings) {
                solve(kb, rest, &next, depth, fresh, out)?;
            }
        }
    }

    if let Some(rules) = kb.rules.get(&indicator) {
        if depth >= MAX_RESOLUTION_DEPTH {
            return Err(EngineError::DepthLimit(MAX_RESOLUTION_DEPTH));
        }
        for rule in rules {
            *fresh += 1;
            let renamed = rename_apart(rule, *fresh);
            if let Some(next) = unify_args(&goal.args, &renamed.head.args, bindings) {
                let mut expanded = renamed.body;
                expanded.extend(rest.iter().cloned());
                solve(kb, &expanded, &next, depth + 1, fresh, out)?;
            }
        }
    }

    Ok(())
}

/// Give every named variable in the rule a suffix unique to this expansion so
/// bindings from separate uses of the same rule never collide.
fn rename_apart(rule: &Rule, suffix: usize) -> Rule {
    let rename = |term: &Term| match term {
        Term::Var(name) if name != "_" => Term::Var(format!("{name}#{suffix}")),
        other => other.clone(),
    };
    let rename_literal = |literal: &Literal| Literal {
        predicate: literal.predicate.clone(),
        args: literal.args.iter().map(rename).collect(),
    };

    Rule {
        head: rename_literal(&rule.head),
        body: rule.body.iter().map(rename_literal).collect(),
    }
}

/// Follow variable bindings until an unbound variable or a constant.
fn walk(term: &Term, bindings: &Bindings) -> Term {
    let mut current = term.clone();
    loop {
        match current {
            Term::Var(ref name) if name != "_" => match bindings.get(name) {
                Some(next) => current = next.clone(),
                None => return current,
            },
            other => return other,
        }
    }
}

fn unify(left: &Term, right: &Term, bindings: &Bindings) -> Option<Bindings> {
    let left = walk(left, bindings);
    let right = walk(right, bindings);

    match (left, right) {
        (Term::Var(name), other) | (other, Term::Var(name)) => {
            if name == "_" {
                return Some(bindings.clone());
            }
            if let Term::Var(other_name) = &other {
                if *other_name == name {
                    return Some(bindings.clone());
                }
            }
            let mut next = bindings.clone();
            next.insert(name, other);
            Some(next)
        }
        (Term::Atom(left), Term::Atom(right)) if left == right => Some(bindings.clone()),
        (Term::Int(left), Term::Int(right)) if left == right => Some(bindings.clone()),
        _ => None,
    }
}

fn unify_args(pattern: &[Term], args: &[Term], bindings: &Bindings) -> Option<Bindings> {
    if pattern.len() != args.len() {
        return None;
    }

    let mut current = bindings.clone();
    for (left, right) in pattern.iter().zip(args) {
        current = unify(left, right, &current)?;
    }
    Some(current)
}
