//! Affordances: links augmented with the actions available on their target.

use serde::Serialize;

use hyperdoc_core::{ActionDescriptor, HttpVerb};
use hyperdoc_uri::{PartialUriTemplate, Variable, VariableKind};

/// A reverse relation: the link's target relates back to `anchor` via `rel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReverseRel {
    pub anchor: String,
    pub rel: String,
}

/// A finalized affordance. Produced only by
/// [`AffordanceBuilder`](crate::builder::AffordanceBuilder) and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Affordance {
    pub(crate) href: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) template: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) variables: Vec<Variable>,
    pub(crate) rels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) reverse_rels: Vec<ReverseRel>,
    pub(crate) descriptors: Vec<ActionDescriptor>,
}

impl Affordance {
    /// Resolved base URI with unbound variables stripped.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Partial template still carrying unbound variables; empty when the
    /// target is fully resolved.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn is_templated(&self) -> bool {
        !self.variables.is_empty()
    }

    /// Unbound template variables in declaration order.
    #[must_use]
    pub fn unbound_variables(&self) -> &[Variable] {
        &self.variables
    }

    #[must_use]
    pub fn rels(&self) -> &[String] {
        &self.rels
    }

    #[must_use]
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r == rel)
    }

    #[must_use]
    pub fn reverse_rels(&self) -> &[ReverseRel] {
        &self.reverse_rels
    }

    #[must_use]
    pub fn action_descriptors(&self) -> &[ActionDescriptor] {
        &self.descriptors
    }

    pub fn verbs(&self) -> impl Iterator<Item = HttpVerb> + '_ {
        self.descriptors.iter().map(ActionDescriptor::verb)
    }

    /// Fold another affordance targeting the same href into this one.
    ///
    /// Query variables only `other` leaves unbound are appended to the
    /// template as one more query group. Path variables keep the shape of
    /// this affordance's template.
    pub(crate) fn merge(&mut self, other: Affordance) {
        self.merge_query_variables(other.variables);
        self.descriptors.extend(other.descriptors);
        for rel in other.rels {
            if !self.has_rel(&rel) {
                self.rels.push(rel);
            }
        }
        for reverse in other.reverse_rels {
            if !self.reverse_rels.contains(&reverse) {
                self.reverse_rels.push(reverse);
            }
        }
    }

    fn merge_query_variables(&mut self, variables: Vec<Variable>) {
        let fresh: Vec<Variable> = variables
            .into_iter()
            .filter(|v| v.kind == VariableKind::Query)
            .filter(|v| !self.variables.iter().any(|known| known.name == v.name))
            .collect();
        if fresh.is_empty() {
            return;
        }
        let base = if self.template.is_empty() {
            &self.href
        } else {
            &self.template
        };
        // Both sides came out of a successful expansion, so they re-parse.
        let extended = PartialUriTemplate::parse(base)
            .and_then(|t| t.with_query_params(fresh.iter().map(|v| v.name.as_str())));
        if let Ok(template) = extended {
            self.template = template.as_str().to_string();
            self.variables.extend(fresh);
        }
    }
}
