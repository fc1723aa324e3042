//! Link-bearing wrapper around arbitrary content.

use serde::Serialize;

use hyperdoc_core::RelationError;

use crate::affordance::Affordance;
use crate::links::Links;

/// Content plus the links describing what can be done with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource<T> {
    pub content: T,
    pub links: Links,
}

impl<T> Resource<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            links: Links::new(),
        }
    }

    /// # Errors
    ///
    /// Returns [`RelationError::Conflicting`] per [`Links::add`].
    pub fn add_link(&mut self, affordance: Affordance) -> Result<(), RelationError> {
        self.links.add(affordance)
    }

    /// # Errors
    ///
    /// Returns [`RelationError::Conflicting`] per [`Links::add`].
    pub fn with_link(mut self, affordance: Affordance) -> Result<Self, RelationError> {
        self.add_link(affordance)?;
        Ok(self)
    }
}
