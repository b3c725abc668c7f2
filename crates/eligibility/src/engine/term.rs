//! Term model shared by the parser, the resolver, and fact rendering.

use std::fmt::{self, Write as _};

/// Predicate name plus arity, the identity of a predicate in the rule base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateIndicator {
    pub name: String,
    pub arity: usize,
}

impl fmt::Display for PredicateIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// A single argument position inside a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Atom(String),
    Int(i64),
    Var(String),
}

impl Term {
    pub fn is_ground(&self) -> bool {
        !matches!(self, Term::Var(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write_atom(f, name),
            Term::Int(value) => write!(f, "{value}"),
            Term::Var(name) => f.write_str(name),
        }
    }
}

/// A predicate applied to arguments: one fact, goal, or rule-body element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub predicate: String,
    pub args: Vec<Term>,
}

impl Literal {
    pub fn indicator(&self) -> PredicateIndicator {
        PredicateIndicator {
            name: self.predicate.clone(),
            arity: self.args.len(),
        }
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_ground)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_atom(f, &self.predicate)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_char('(')?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_char(')')
    }
}

/// True when `name` cannot be written as a bare lowercase atom.
pub(crate) fn atom_needs_quotes(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return true,
    }
    chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_'))
}

/// Render an atom, quoting and escaping whenever the bare form would change
/// the meaning of the surrounding clause. This is what keeps free-text input
/// from smuggling extra clauses into the rule base.
fn write_atom(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if !atom_needs_quotes(name) {
        return f.write_str(name);
    }

    f.write_char('\'')?;
    for c in name.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            other => f.write_char(other)?,
        }
    }
    f.write_char('\'')
}
