//! Partial URI templates.
//!
//! Supports literal text, simple `{var}` / `{a,b}` expressions, and
//! RFC 6570 form-style query groups `{?a,b}` and continuations `{&a,b}`.
//! Expansion may bind only some variables; the rest survive in the
//! remaining template in their original order.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::trace;

use hyperdoc_core::TemplateError;

use crate::bindings::Bindings;

/// Expression operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `{var}`
    Simple,
    /// `{?a,b}`
    Query,
    /// `{&a,b}`
    Continuation,
}

impl Operator {
    fn is_query(self) -> bool {
        matches!(self, Self::Query | Self::Continuation)
    }
}

/// Whether a variable lives in the path or in a query group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Path,
    Query,
}

/// A named template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub kind: VariableKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Expression {
        operator: Operator,
        names: Vec<String>,
    },
}

/// A URI pattern that stays representable with only some variables bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialUriTemplate {
    source: String,
    segments: Vec<Segment>,
}

/// Result of expanding a template against a partial binding set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expansion {
    /// Resolved prefix: literals and bound values up to the first unbound
    /// path variable, plus bound query pairs when the path fully resolved.
    pub base_uri: String,
    /// Partially expanded template, or empty when nothing is left unbound.
    pub remaining: String,
    /// Unbound variables in declaration order.
    pub unbound: Vec<Variable>,
}

impl Expansion {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unbound.is_empty()
    }

    pub fn unbound_names(&self) -> impl Iterator<Item = &str> {
        self.unbound.iter().map(|v| v.name.as_str())
    }
}

impl PartialUriTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] on unbalanced braces, empty
    /// expressions, unsupported operators, or invalid variable names.
    pub fn parse(pattern: &str) -> Result<Self, TemplateError> {
        let malformed = |position: usize, reason: &str| TemplateError::Malformed {
            template: pattern.to_string(),
            position,
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut open: Option<usize> = None;

        for (pos, ch) in pattern.char_indices() {
            match (open, ch) {
                (None, '{') => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    open = Some(pos);
                }
                (None, '}') => return Err(malformed(pos, "unmatched '}'")),
                (None, c) => literal.push(c),
                (Some(_), '{') => return Err(malformed(pos, "nested '{'")),
                (Some(start), '}') => {
                    segments.push(parse_expression(&pattern[start + 1..pos], start, &malformed)?);
                    open = None;
                }
                (Some(_), _) => {}
            }
        }

        if let Some(start) = open {
            return Err(malformed(start, "unterminated expression"));
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// All variables, bound or not, in declaration order.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Expression { operator, names } => Some((operator, names)),
                Segment::Literal(_) => None,
            })
            .flat_map(|(operator, names)| {
                let kind = if operator.is_query() {
                    VariableKind::Query
                } else {
                    VariableKind::Path
                };
                names.iter().map(move |name| Variable {
                    name: name.clone(),
                    kind,
                })
            })
            .collect()
    }

    /// All variable names in declaration order.
    #[must_use]
    pub fn variable_names(&self) -> Vec<String> {
        self.variables().into_iter().map(|v| v.name).collect()
    }

    #[must_use]
    pub fn has_variable(&self, name: &str) -> bool {
        self.variables().iter().any(|v| v.name == name)
    }

    /// Whether the template already contains a query part, literal or
    /// templated.
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.segments.iter().any(|segment| match segment {
            Segment::Literal(text) => text.contains('?'),
            Segment::Expression { operator, .. } => operator.is_query(),
        })
    }

    /// Append a query group for the given names, skipping names the template
    /// already declares. Uses `{&..}` when a query part already exists.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] if a name is not a valid
    /// variable name.
    pub fn with_query_params<'a, I>(&self, names: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let existing = self.variable_names();
        let mut fresh: Vec<&str> = Vec::new();
        for name in names {
            if !existing.iter().any(|e| e == name) && !fresh.contains(&name) {
                fresh.push(name);
            }
        }
        if fresh.is_empty() {
            return Ok(self.clone());
        }
        let operator = if self.has_query() { '&' } else { '?' };
        Self::parse(&format!("{}{{{operator}{}}}", self.source, fresh.join(",")))
    }

    /// Expand against a partial binding set.
    ///
    /// Within a run of adjacent query groups the remaining template lists
    /// the bound pairs first and the still-unbound groups after them, so the
    /// first unbound group turns into `{&..}` once a pair precedes it.
    #[must_use]
    pub fn expand(&self, bindings: &Bindings) -> Expansion {
        let mut base = String::new();
        let mut base_open = true;
        let mut base_has_query = false;
        let mut remaining = Remaining::default();
        let mut unbound = Vec::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    if base_open {
                        base.push_str(text);
                        base_has_query |= text.contains('?');
                    }
                    remaining.push_literal(text);
                }
                Segment::Expression {
                    operator: Operator::Simple,
                    names,
                } => {
                    let mut parts: Vec<String> = Vec::with_capacity(names.len());
                    let mut run: Vec<&str> = Vec::new();
                    for (i, name) in names.iter().enumerate() {
                        match bindings.token(name) {
                            Some(token) => {
                                let encoded = urlencoding::encode(&token).into_owned();
                                if base_open {
                                    if i > 0 {
                                        base.push(',');
                                    }
                                    base.push_str(&encoded);
                                }
                                if !run.is_empty() {
                                    parts.push(format!("{{{}}}", run.join(",")));
                                    run.clear();
                                }
                                parts.push(encoded);
                            }
                            None => {
                                base_open = false;
                                unbound.push(Variable {
                                    name: name.clone(),
                                    kind: VariableKind::Path,
                                });
                                run.push(name.as_str());
                            }
                        }
                    }
                    if !run.is_empty() {
                        parts.push(format!("{{{}}}", run.join(",")));
                    }
                    remaining.push_literal(&parts.join(","));
                }
                Segment::Expression { names, .. } => {
                    let mut group = Vec::new();
                    for name in names {
                        match bindings.token(name) {
                            Some(token) => {
                                let pair = format!("{name}={}", urlencoding::encode(&token));
                                if base_open {
                                    base.push(if base_has_query { '&' } else { '?' });
                                    base.push_str(&pair);
                                    base_has_query = true;
                                }
                                remaining.pairs.push(pair);
                            }
                            None => {
                                unbound.push(Variable {
                                    name: name.clone(),
                                    kind: VariableKind::Query,
                                });
                                group.push(name.as_str());
                            }
                        }
                    }
                    if !group.is_empty() {
                        remaining.pending.push(group.join(","));
                    }
                }
            }
        }

        let remaining = if unbound.is_empty() {
            String::new()
        } else {
            remaining.finish()
        };

        trace!(
            template = %self.source,
            base_uri = %base,
            unbound = unbound.len(),
            "expanded template"
        );

        Expansion {
            base_uri: base,
            remaining,
            unbound,
        }
    }
}

/// Remaining-template writer that holds back a run of query groups until
/// the next literal text or the end of the template.
#[derive(Default)]
struct Remaining {
    out: String,
    has_query: bool,
    pairs: Vec<String>,
    pending: Vec<String>,
}

impl Remaining {
    fn push_literal(&mut self, text: &str) {
        self.flush_query();
        self.out.push_str(text);
        self.has_query |= text.contains('?');
    }

    fn flush_query(&mut self) {
        for pair in self.pairs.drain(..) {
            self.out.push(if self.has_query { '&' } else { '?' });
            self.out.push_str(&pair);
            self.has_query = true;
        }
        for group in self.pending.drain(..) {
            let operator = if self.has_query { '&' } else { '?' };
            self.out.push_str(&format!("{{{operator}{group}}}"));
            self.has_query = true;
        }
    }

    fn finish(mut self) -> String {
        self.flush_query();
        self.out
    }
}

fn parse_expression<F>(body: &str, start: usize, malformed: &F) -> Result<Segment, TemplateError>
where
    F: Fn(usize, &str) -> TemplateError,
{
    let (operator, list) = match body.chars().next() {
        None => return Err(malformed(start, "empty expression")),
        Some('?') => (Operator::Query, &body[1..]),
        Some('&') => (Operator::Continuation, &body[1..]),
        Some(c) if "+#./;=,!@|".contains(c) => {
            return Err(malformed(start + 1, "unsupported operator"));
        }
        Some(_) => (Operator::Simple, body),
    };

    let names: Vec<String> = list.split(',').map(str::to_string).collect();
    for name in &names {
        if name.is_empty() {
            return Err(malformed(start, "empty variable name"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '%'))
        {
            return Err(malformed(start, "invalid variable name"));
        }
    }

    Ok(Segment::Expression { operator, names })
}

impl fmt::Display for PartialUriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for PartialUriTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
