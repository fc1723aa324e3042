//! # hyperdoc-affordance
//!
//! Affordances for hyperdoc: links augmented with the state transitions
//! available on their target.
//!
//! Includes:
//! - [`MethodInvocation`]: inbound method/argument reference
//! - [`AffordanceBuilder`]: Empty to Accumulating to finalized [`Affordance`]
//! - [`Links`]: merge-by-href link collection
//! - [`Resource`]: content wrapped with its links

pub mod affordance;
pub mod builder;
pub mod invocation;
pub mod links;
pub mod resource;

pub use affordance::{Affordance, ReverseRel};
pub use builder::{Accumulating, AffordanceBuilder, DescriptorBuilder, Empty};
pub use invocation::{Argument, ArgumentValue, MethodInvocation};
pub use links::Links;
pub use resource::Resource;
