//! # hyperdoc-transform
//!
//! Turns arbitrary object graphs into the generic [`Node`](hyperdoc_core::Node)
//! tree consumed by hypermedia encoders.
//!
//! Includes:
//! - [`Introspect`]: the capability a value needs to be walked
//! - [`Transformer`]: depth-first graph to tree conversion
//! - [`TransformConfig`]: exclusions, depth limit and cycle detection
//! - [`render`]: JSON and outline formatting of node trees

pub mod config;
pub mod introspect;
pub mod render;
pub mod transformer;

pub use hyperdoc_core::{ClosedSet, Scalar};

pub use config::{ConfigError, TransformConfig};
pub use introspect::{Introspect, Member, Property, Shape};
pub use render::{render, OutputFormat};
pub use transformer::Transformer;
