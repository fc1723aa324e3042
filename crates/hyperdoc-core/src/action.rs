//! HTTP verbs and the symbolic action kinds they map to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HyperError;

/// The closed set of HTTP verbs an affordance may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    pub const ALL: [Self; 5] = [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Symbolic action kind for this verb. Total over the closed set.
    #[must_use]
    pub fn action_kind(self) -> ActionKind {
        match self {
            Self::Get => ActionKind::Read,
            Self::Post => ActionKind::Append,
            Self::Put => ActionKind::Replace,
            Self::Patch => ActionKind::Partial,
            Self::Delete => ActionKind::Remove,
        }
    }

    /// How unbound template variables are presented for this verb:
    /// read/remove verbs use a query group, mutating verbs a form body.
    #[must_use]
    pub fn parameter_style(self) -> ParameterStyle {
        match self {
            Self::Get | Self::Delete => ParameterStyle::Query,
            Self::Post | Self::Put | Self::Patch => ParameterStyle::Form,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = HyperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HyperError::UnsupportedVerb(s.to_string()))
    }
}

/// Symbolic state-transition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Read,
    Append,
    Replace,
    Partial,
    Remove,
}

impl ActionKind {
    /// Classify a verb string.
    ///
    /// # Errors
    ///
    /// Returns [`HyperError::UnsupportedVerb`] for verbs outside
    /// GET, POST, PUT, PATCH, DELETE.
    pub fn classify(verb: &str) -> Result<Self, HyperError> {
        verb.parse::<HttpVerb>().map(HttpVerb::action_kind)
    }

    /// Symbolic name for encoders that annotate actions. `Read` is the
    /// implied default and yields `None`.
    #[must_use]
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Self::Read => None,
            Self::Append => Some("append"),
            Self::Replace => Some("replace"),
            Self::Partial => Some("partial"),
            Self::Remove => Some("remove"),
        }
    }

    #[must_use]
    pub fn to_verb(self) -> HttpVerb {
        match self {
            Self::Read => HttpVerb::Get,
            Self::Append => HttpVerb::Post,
            Self::Replace => HttpVerb::Put,
            Self::Partial => HttpVerb::Patch,
            Self::Remove => HttpVerb::Delete,
        }
    }

    /// Safe actions do not change resource state.
    #[must_use]
    pub fn is_safe(self) -> bool {
        self == Self::Read
    }
}

/// Presentation of unbound variables in an action's template fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStyle {
    /// `{?v1,v2}`
    Query,
    /// `v1={v1}&v2={v2}`
    Form,
}

impl ParameterStyle {
    /// Render the fragment for the given variable names. Empty input yields
    /// `None`.
    pub fn fragment<'a, I>(self, names: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = names.into_iter().collect();
        if names.is_empty() {
            return None;
        }
        Some(match self {
            Self::Query => format!("{{?{}}}", names.join(",")),
            Self::Form => names
                .iter()
                .map(|n| format!("{n}={{{n}}}"))
                .collect::<Vec<_>>()
                .join("&"),
        })
    }
}
