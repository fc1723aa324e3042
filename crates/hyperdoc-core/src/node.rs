//! The format-agnostic node tree handed to hypermedia encoders.
//!
//! A node holds either a scalar value, an ordered list of children, or
//! nothing at all; link and action nodes additionally carry a URL and rels.
//! Children keep document order and names/rels may repeat, so lookups
//! return the first match.

use serde::Serialize;

use crate::action::ActionKind;
use crate::error::HyperError;
use crate::value::Scalar;

/// Payload of a node. Value and children are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeContent {
    #[default]
    Empty,
    Value(Scalar),
    Children(Vec<Node>),
}

/// One unit of the node tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rel: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<ActionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<String>,
    #[serde(skip_serializing_if = "NodeContent::is_empty")]
    content: NodeContent,
}

impl NodeContent {
    fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl Node {
    /// An anonymous, empty container.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// An empty container, optionally named.
    #[must_use]
    pub fn container(name: Option<String>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// A leaf carrying a scalar.
    #[must_use]
    pub fn leaf(name: Option<String>, value: Scalar) -> Self {
        Self {
            name,
            content: NodeContent::Value(value),
            ..Self::default()
        }
    }

    /// A pure link/action node.
    #[must_use]
    pub fn link(
        rel: Vec<String>,
        url: impl Into<String>,
        action: ActionKind,
        template: Option<String>,
    ) -> Self {
        Self {
            rel,
            url: Some(url.into()),
            action: Some(action),
            template,
            ..Self::default()
        }
    }

    /// Append a child.
    ///
    /// # Errors
    ///
    /// Returns [`HyperError::InvalidNode`] if this node already holds a value.
    pub fn push_child(&mut self, child: Node) -> Result<(), HyperError> {
        if matches!(self.content, NodeContent::Value(_)) {
            return Err(HyperError::InvalidNode(self.name.clone().unwrap_or_default()));
        }
        if let NodeContent::Children(children) = &mut self.content {
            children.push(child);
        } else {
            self.content = NodeContent::Children(vec![child]);
        }
        Ok(())
    }

    /// Set the scalar value of an empty node.
    ///
    /// # Errors
    ///
    /// Returns [`HyperError::InvalidNode`] if the node already has children.
    pub fn set_value(&mut self, value: Scalar) -> Result<(), HyperError> {
        if matches!(self.content, NodeContent::Children(_)) {
            return Err(HyperError::InvalidNode(self.name.clone().unwrap_or_default()));
        }
        self.content = NodeContent::Value(value);
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn value(&self) -> Option<&Scalar> {
        match &self.content {
            NodeContent::Value(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        match &self.content {
            NodeContent::Children(children) => children,
            _ => &[],
        }
    }

    #[must_use]
    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    #[must_use]
    pub fn rel(&self) -> &[String] {
        &self.rel
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[must_use]
    pub fn action(&self) -> Option<ActionKind> {
        self.action
    }

    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    #[must_use]
    pub fn is_link(&self) -> bool {
        self.url.is_some()
    }

    /// First child with the given name, in document order.
    #[must_use]
    pub fn first_by_name(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.name() == Some(name))
    }

    /// First child carrying the given rel, in document order.
    #[must_use]
    pub fn first_by_rel(&self, rel: &str) -> Option<&Node> {
        self.children()
            .iter()
            .find(|c| c.rel.iter().any(|r| r == rel))
    }

    /// # Errors
    ///
    /// Returns [`HyperError::NotFound`] if no child has that name.
    pub fn child(&self, name: &str) -> Result<&Node, HyperError> {
        self.first_by_name(name)
            .ok_or_else(|| HyperError::not_found("child", name))
    }

    /// # Errors
    ///
    /// Returns [`HyperError::NotFound`] if no child carries that rel.
    pub fn link_by_rel(&self, rel: &str) -> Result<&Node, HyperError> {
        self.first_by_rel(rel)
            .ok_or_else(|| HyperError::not_found("relation", rel))
    }

    /// Depth-first pre-order walk over this node and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, value: &str) -> Node {
        Node::leaf(Some(name.to_string()), Scalar::from(value))
    }

    #[test]
    fn lookup_returns_first_match_in_document_order() {
        let mut root = Node::root();
        root.push_child(named("item", "a")).unwrap();
        root.push_child(named("item", "b")).unwrap();
        root.push_child(Node::link(vec!["self".into()], "/x", ActionKind::Read, None))
            .unwrap();
        root.push_child(Node::link(vec!["self".into()], "/y", ActionKind::Read, None))
            .unwrap();

        assert_eq!(
            root.child("item").unwrap().value(),
            Some(&Scalar::from("a"))
        );
        assert_eq!(root.link_by_rel("self").unwrap().url(), Some("/x"));
    }

    #[test]
    fn missing_lookups_fail_with_not_found() {
        let root = Node::root();
        assert!(matches!(
            root.child("nope"),
            Err(HyperError::NotFound { kind: "child", .. })
        ));
        assert!(matches!(
            root.link_by_rel("next"),
            Err(HyperError::NotFound { kind: "relation", .. })
        ));
    }

    #[test]
    fn value_and_children_are_exclusive() {
        let mut leaf = named("foo", "x");
        assert!(leaf.push_child(Node::root()).is_err());

        let mut branch = Node::container(Some("bar".into()));
        branch.push_child(named("baz", "y")).unwrap();
        assert!(branch.set_value(Scalar::Null).is_err());
        assert!(branch.value().is_none());
    }

    #[test]
    fn walk_visits_pre_order() {
        let mut inner = Node::container(Some("inner".into()));
        inner.push_child(named("b", "2")).unwrap();
        let mut root = Node::root();
        root.push_child(named("a", "1")).unwrap();
        root.push_child(inner).unwrap();

        let names: Vec<Option<&str>> = root.walk().map(Node::name).collect();
        assert_eq!(names, [None, Some("a"), Some("inner"), Some("b")]);
    }

    #[test]
    fn serializes_without_empty_fields() {
        let node = named("foo", "x");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"name": "foo", "content": "x"}));
    }
}
