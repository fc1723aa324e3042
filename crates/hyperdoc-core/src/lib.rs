//! # hyperdoc-core
//!
//! Core types for assembling format-agnostic hypermedia documents.
//!
//! This crate defines the vocabulary shared by all other hyperdoc crates:
//! - [`Scalar`]: single-token values, including the explicit null marker
//! - [`HttpVerb`] and [`ActionKind`]: the closed verb set and its symbolic kinds
//! - [`InputParameter`] and [`DeclaredType`]: declared action inputs
//! - [`ActionDescriptor`]: one possible state transition
//! - [`Node`]: the generic tree consumed by format encoders
//! - Error hierarchy ([`HyperError`], [`TemplateError`], [`RelationError`], ...)

pub mod action;
pub mod descriptor;
pub mod error;
pub mod node;
pub mod param;
pub mod value;

pub use action::{ActionKind, HttpVerb, ParameterStyle};
pub use descriptor::ActionDescriptor;
pub use error::{
    AccessError, DescriptorError, HyperError, RelationError, Result, TemplateError,
    TransformError,
};
pub use node::{Node, NodeContent};
pub use param::{DeclaredType, InputParameter, ParameterLocation};
pub use value::{ClosedSet, Scalar};
