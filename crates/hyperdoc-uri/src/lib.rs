//! # hyperdoc-uri
//!
//! Partial URI templates for hyperdoc.
//!
//! Parses literal-plus-variable URI patterns (including RFC 6570 query
//! groups), expands them against a partial binding set, and reports which
//! variables remain unbound. Affordances use the expansion to split a target
//! into a resolved `href` and a residual template.

pub mod bindings;
pub mod template;

pub use bindings::Bindings;
pub use template::{Expansion, PartialUriTemplate, Variable, VariableKind};
