//! Link collections with merge-by-href semantics.

use serde::Serialize;
use tracing::debug;

use hyperdoc_core::{HyperError, RelationError};

use crate::affordance::Affordance;

/// Ordered collection of affordances.
///
/// Adding an affordance whose href is already present merges its actions
/// into the existing entry. A relation may only ever point at one href.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Links {
    entries: Vec<Affordance>,
}

impl Links {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an affordance.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::Conflicting`] if one of its rels already
    /// points at a different href. The collection is left unchanged.
    pub fn add(&mut self, affordance: Affordance) -> Result<(), RelationError> {
        for rel in affordance.rels() {
            if let Some(existing) = self
                .entries
                .iter()
                .find(|e| e.has_rel(rel) && e.href() != affordance.href())
            {
                return Err(RelationError::Conflicting {
                    rel: rel.clone(),
                    existing: existing.href().to_string(),
                    rejected: affordance.href().to_string(),
                });
            }
        }

        let position = self
            .entries
            .iter()
            .position(|e| e.href() == affordance.href());
        match position {
            Some(index) => {
                let existing = &mut self.entries[index];
                debug!(
                    href = %existing.href(),
                    added = affordance.action_descriptors().len(),
                    "merged affordance into existing link"
                );
                existing.merge(affordance);
            }
            None => self.entries.push(affordance),
        }
        Ok(())
    }

    /// Builder-style [`Links::add`].
    ///
    /// # Errors
    ///
    /// See [`Links::add`].
    pub fn with(mut self, affordance: Affordance) -> Result<Self, RelationError> {
        self.add(affordance)?;
        Ok(self)
    }

    #[must_use]
    pub fn first_by_rel(&self, rel: &str) -> Option<&Affordance> {
        self.entries.iter().find(|e| e.has_rel(rel))
    }

    /// # Errors
    ///
    /// Returns [`HyperError::NotFound`] if no link carries `rel`.
    pub fn by_rel(&self, rel: &str) -> Result<&Affordance, HyperError> {
        self.first_by_rel(rel)
            .ok_or_else(|| HyperError::not_found("relation", rel))
    }

    #[must_use]
    pub fn self_link(&self) -> Option<&Affordance> {
        self.first_by_rel("self")
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Affordance> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Links {
    type Item = &'a Affordance;
    type IntoIter = std::slice::Iter<'a, Affordance>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AffordanceBuilder;
    use hyperdoc_core::HttpVerb;
    use hyperdoc_uri::Bindings;

    fn item(id: u32, verb: HttpVerb) -> Affordance {
        AffordanceBuilder::new("/items/{id}", &Bindings::new().with("id", id))
            .unwrap()
            .afford(verb)
            .done()
            .with_rel("item")
            .unwrap()
    }

    #[test]
    fn same_href_merges_actions() {
        let mut links = Links::new();
        links.add(item(7, HttpVerb::Get)).unwrap();
        links.add(item(7, HttpVerb::Delete)).unwrap();

        assert_eq!(links.len(), 1);
        let link = links.by_rel("item").unwrap();
        assert_eq!(link.href(), "/items/7");
        let verbs: Vec<HttpVerb> = link.verbs().collect();
        assert_eq!(verbs, [HttpVerb::Get, HttpVerb::Delete]);
    }

    #[test]
    fn same_rel_different_href_conflicts() {
        let mut links = Links::new().with(item(7, HttpVerb::Get)).unwrap();
        let err = links.add(item(8, HttpVerb::Get)).unwrap_err();
        assert_eq!(
            err,
            RelationError::Conflicting {
                rel: "item".into(),
                existing: "/items/7".into(),
                rejected: "/items/8".into(),
            }
        );
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn merge_unions_relations() {
        let self_link = AffordanceBuilder::new("/items/7", &Bindings::new())
            .unwrap()
            .afford(HttpVerb::Get)
            .done()
            .with_rel("self")
            .unwrap();
        let links = Links::new()
            .with(item(7, HttpVerb::Get))
            .unwrap()
            .with(self_link)
            .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links.self_link().unwrap().rels(), ["item", "self"]);
    }

    #[test]
    fn merge_unions_unbound_query_variables() {
        let read = |template: &str, verb: HttpVerb| {
            AffordanceBuilder::new(template, &Bindings::new())
                .unwrap()
                .afford(verb)
                .done()
                .with_rel("item")
                .unwrap()
        };
        let links = Links::new()
            .with(read("/items/7{?expand}", HttpVerb::Get))
            .unwrap()
            .with(read("/items/7{?fields,expand}", HttpVerb::Delete))
            .unwrap();

        let link = links.by_rel("item").unwrap();
        assert_eq!(link.href(), "/items/7");
        assert_eq!(link.template(), "/items/7{?expand}{&fields}");
        let names: Vec<&str> = link
            .unbound_variables()
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, ["expand", "fields"]);
    }

    #[test]
    fn resolved_link_gains_template_from_merge() {
        let resolved = AffordanceBuilder::new("/items/7", &Bindings::new())
            .unwrap()
            .afford(HttpVerb::Get)
            .done()
            .with_rel("item")
            .unwrap();
        let templated = AffordanceBuilder::new("/items/7{?expand}", &Bindings::new())
            .unwrap()
            .afford(HttpVerb::Get)
            .done()
            .with_rel("item")
            .unwrap();
        let links = Links::new().with(resolved).unwrap().with(templated).unwrap();
        let link = links.by_rel("item").unwrap();
        assert_eq!(link.template(), "/items/7{?expand}");
        assert!(link.is_templated());
    }

    #[test]
    fn missing_rel_is_not_found() {
        let links = Links::new();
        assert!(links.self_link().is_none());
        assert!(matches!(
            links.by_rel("next"),
            Err(HyperError::NotFound { kind: "relation", .. })
        ));
    }

    #[test]
    fn serializes_as_array() {
        let links = Links::new().with(item(1, HttpVerb::Get)).unwrap();
        let json = serde_json::to_value(&links).unwrap();
        assert_eq!(json[0]["href"], "/items/1");
        assert_eq!(json[0]["rels"][0], "item");
    }
}
