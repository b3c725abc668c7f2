//! Tokenizer and parser for the clause subset: facts, rules with conjunctive
//! bodies, `:- dynamic(name/arity).` declarations, quoted atoms, integers,
//! variables, and `%` line comments.

use std::iter::Peekable;
use std::str::Chars;

use super::term::{Literal, PredicateIndicator, Term};
use super::EngineError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Atom(String),
    Var(String),
    Int(i64),
    LParen,
    RParen,
    Comma,
    Dot,
    Turnstile,
    Slash,
}

#[derive(Debug, Clone)]
struct SpannedToken {
    token: Token,
    line: usize,
}

/// One top-level entry in a rule source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item {
    Dynamic(PredicateIndicator),
    Clause { head: Literal, body: Vec<Literal> },
}

fn syntax(line: usize, detail: impl Into<String>) -> EngineError {
    EngineError::Syntax {
        line,
        detail: detail.into(),
    }
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            ident.push(c);
            chars.next();
        } else {
            break;
        }
    }
    ident
}

fn tokenize(source: &str) -> Result<Vec<SpannedToken>, EngineError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1usize;

    while let Some(&c) = chars.peek() {
        let token = match c {
            '\n' => {
                line += 1;
                chars.next();
                continue;
            }
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '%' => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
                continue;
            }
            '(' => {
                chars.next();
                Token::LParen
            }
            ')' => {
                chars.next();
                Token::RParen
            }
            ',' => {
                chars.next();
                Token::Comma
            }
            '.' => {
                chars.next();
                Token::Dot
            }
            '/' => {
                chars.next();
                Token::Slash
            }
            ':' => {
                chars.next();
                match chars.peek() {
                    Some('-') => {
                        chars.next();
                        Token::Turnstile
                    }
                    _ => return Err(syntax(line, "expected '-' after ':'")),
                }
            }
            '\'' => {
                chars.next();
                Token::Atom(read_quoted_atom(&mut chars, line)?)
            }
            c if c.is_ascii_digit() => {
                let digits = read_ident(&mut chars);
                let value = digits
                    .parse::<i64>()
                    .map_err(|_| syntax(line, format!("invalid integer '{digits}'")))?;
                Token::Int(value)
            }
            c if c.is_ascii_lowercase() => Token::Atom(read_ident(&mut chars)),
            c if c.is_ascii_uppercase() || c == '_' => Token::Var(read_ident(&mut chars)),
            other => return Err(syntax(line, format!("unexpected character '{other}'"))),
        };

        tokens.push(SpannedToken { token, line });
    }

    Ok(tokens)
}

fn read_quoted_atom(chars: &mut Peekable<Chars<'_>>, line: usize) -> Result<String, EngineError> {
    let mut name = String::new();
    loop {
        match chars.next() {
            Some('\'') => {
                // A doubled quote inside the atom is a literal quote.
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    name.push('\'');
                } else {
                    return Ok(name);
                }
            }
            Some('\\') => match chars.next() {
                Some('\\') => name.push('\\'),
                Some('\'') => name.push('\''),
                Some('n') => name.push('\n'),
                Some('t') => name.push('\t'),
                Some(other) => {
                    return Err(syntax(line, format!("unsupported escape '\\{other}'")))
                }
                None => return Err(syntax(line, "unterminated quoted atom")),
            },
            Some('\n') | None => return Err(syntax(line, "unterminated quoted atom")),
            Some(other) => name.push(other),
        }
    }
}

struct Cursor {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl Cursor {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|spanned| &spanned.token)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map(|spanned| spanned.line)
            .unwrap_or(1)
    }

    fn fail(&self, detail: impl Into<String>) -> EngineError {
        syntax(self.line(), detail)
    }

    fn expect(&mut self, expected: Token, description: &str) -> Result<(), EngineError> {
        match self.advance() {
            Some(spanned) if spanned.token == expected => Ok(()),
            Some(spanned) => Err(syntax(spanned.line, format!("expected {description}"))),
            None => Err(self.fail(format!("expected {description}, found end of input"))),
        }
    }

    fn is_empty(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

/// Parse a whole rule source into directives and clauses.
pub(crate) fn parse_program(source: &str) -> Result<Vec<Item>, EngineError> {
    let mut cursor = Cursor::new(tokenize(source)?);
    let mut items = Vec::new();

    while !cursor.is_empty() {
        if matches!(cursor.peek(), Some(Token::Turnstile)) {
            items.push(parse_directive(&mut cursor)?);
        } else {
            items.push(parse_clause(&mut cursor)?);
        }
    }

    Ok(items)
}

/// Parse exactly one literal, tolerating a trailing '.', for the runtime
/// assert, query, and retract entry points.
pub(crate) fn parse_literal(input: &str) -> Result<Literal, EngineError> {
    let mut cursor = Cursor::new(tokenize(input)?);
    let literal = parse_literal_tokens(&mut cursor)?;

    if matches!(cursor.peek(), Some(Token::Dot)) {
        cursor.advance();
    }
    if !cursor.is_empty() {
        return Err(cursor.fail("unexpected input after literal"));
    }

    Ok(literal)
}

fn parse_directive(cursor: &mut Cursor) -> Result<Item, EngineError> {
    cursor.expect(Token::Turnstile, "':-'")?;
    let name = match cursor.advance() {
        Some(SpannedToken {
            token: Token::Atom(name),
            ..
        }) => name,
        _ => return Err(cursor.fail("expected directive name after ':-'")),
    };
    if name != "dynamic" {
        return Err(cursor.fail(format!("unsupported directive '{name}'")));
    }

    cursor.expect(Token::LParen, "'(' after dynamic")?;
    let predicate = match cursor.advance() {
        Some(SpannedToken {
            token: Token::Atom(name),
            ..
        }) => name,
        _ => return Err(cursor.fail("expected predicate name in dynamic declaration")),
    };
    cursor.expect(Token::Slash, "'/' between name and arity")?;
    let arity = match cursor.advance() {
        Some(SpannedToken {
            token: Token::Int(value),
            ..
        }) if value >= 0 => value as usize,
        _ => return Err(cursor.fail("expected arity in dynamic declaration")),
    };
    cursor.expect(Token::RParen, "')' closing dynamic declaration")?;
    cursor.expect(Token::Dot, "'.' ending dynamic declaration")?;

    Ok(Item::Dynamic(PredicateIndicator {
        name: predicate,
        arity,
    }))
}

fn parse_clause(cursor: &mut Cursor) -> Result<Item, EngineError> {
    let head = parse_literal_tokens(cursor)?;
    let mut body = Vec::new();

    match cursor.advance() {
        Some(SpannedToken {
            token: Token::Dot, ..
        }) => {}
        Some(SpannedToken {
            token: Token::Turnstile,
            ..
        }) => loop {
            body.push(parse_literal_tokens(cursor)?);
            match cursor.advance() {
                Some(SpannedToken {
                    token: Token::Comma,
                    ..
                }) => continue,
                Some(SpannedToken {
                    token: Token::Dot, ..
                }) => break,
                Some(spanned) => {
                    return Err(syntax(spanned.line, "expected ',' or '.' after body literal"))
                }
                None => return Err(cursor.fail("unterminated clause body")),
            }
        },
        Some(spanned) => {
            return Err(syntax(spanned.line, "expected ':-' or '.' after clause head"))
        }
        None => return Err(cursor.fail("unterminated clause")),
    }

    Ok(Item::Clause { head, body })
}

fn parse_literal_tokens(cursor: &mut Cursor) -> Result<Literal, EngineError> {
    let predicate = match cursor.advance() {
        Some(SpannedToken {
            token: Token::Atom(name),
            ..
        }) => name,
        Some(spanned) => return Err(syntax(spanned.line, "expected predicate name")),
        None => return Err(cursor.fail("expected predicate name, found end of input")),
    };

    let mut args = Vec::new();
    if matches!(cursor.peek(), Some(Token::LParen)) {
        cursor.advance();
        loop {
            args.push(parse_term(cursor)?);
            match cursor.advance() {
                Some(SpannedToken {
                    token: Token::Comma,
                    ..
                }) => continue,
                Some(SpannedToken {
                    token: Token::RParen,
                    ..
                }) => break,
                Some(spanned) => {
                    return Err(syntax(spanned.line, "expected ',' or ')' in argument list"))
                }
                None => return Err(cursor.fail("unterminated argument list")),
            }
        }
    }

    Ok(Literal { predicate, args })
}

fn parse_term(cursor: &mut Cursor) -> Result<Term, EngineError> {
    match cursor.advance() {
        Some(SpannedToken {
            token: Token::Atom(name),
            ..
        }) => Ok(Term::Atom(name)),
        Some(SpannedToken {
            token: Token::Int(value),
            ..
        }) => Ok(Term::Int(value)),
        Some(SpannedToken {
            token: Token::Var(name),
            ..
        }) => Ok(Term::Var(name)),
        Some(spanned) => Err(syntax(spanned.line, "expected atom, integer, or variable")),
        None => Err(cursor.fail("expected term, found end of input")),
    }
}
