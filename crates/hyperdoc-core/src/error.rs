//! Error types for hyperdoc.

use thiserror::Error;

/// Top-level result type for hyperdoc operations.
pub type Result<T> = std::result::Result<T, HyperError>;

/// Boxed error raised by a member accessor during introspection.
pub type AccessError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for hyperdoc.
#[derive(Debug, Error)]
pub enum HyperError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("relation error: {0}")]
    Relation(#[from] RelationError),

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("unsupported HTTP verb '{0}': expected one of GET, POST, PUT, PATCH, DELETE")]
    UnsupportedVerb(String),

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("node '{0}' holds a value and cannot take children")]
    InvalidNode(String),
}

impl HyperError {
    /// Shorthand for a [`HyperError::NotFound`] lookup failure.
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

/// Errors raised while parsing a URI template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("malformed template '{template}' at byte {position}: {reason}")]
    Malformed {
        template: String,
        position: usize,
        reason: String,
    },
}

/// Errors raised while assembling an action descriptor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error(
        "action '{action}' already has request body parameter '{existing}', cannot add '{rejected}'"
    )]
    DuplicateBodyParameter {
        action: String,
        existing: String,
        rejected: String,
    },
}

/// Errors related to link relations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelationError {
    #[error("affordance has no relation; call rel() before build()")]
    Missing,

    #[error("invalid relation name '{0}': must be non-empty and contain no whitespace")]
    Invalid(String),

    #[error("relation '{rel}' already points to '{existing}', cannot also point to '{rejected}'")]
    Conflicting {
        rel: String,
        existing: String,
        rejected: String,
    },
}

/// Errors raised while transforming an object graph into a node tree.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read member at {path} of {type_name}: {source}")]
    ReadFailed {
        path: String,
        type_name: String,
        #[source]
        source: AccessError,
    },

    #[error("cycle detected at {path}: {type_name} is already being transformed")]
    CycleDetected { path: String, type_name: String },

    #[error("maximum depth {limit} exceeded at {path}")]
    DepthExceeded { path: String, limit: usize },
}
