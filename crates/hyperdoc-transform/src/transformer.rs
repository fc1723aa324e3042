//! Object graph to node tree transformation.
//!
//! The walk is depth-first and preserves the source order of sequences,
//! mapping entries and object members. Links of a resource are emitted
//! before its content, one link node per action descriptor.

use tracing::{debug, trace};

use hyperdoc_affordance::Links;
use hyperdoc_core::{HyperError, Node, Scalar, TransformError};

use crate::config::TransformConfig;
use crate::introspect::{Introspect, Shape};

/// Stateless transformer; each call walks the graph independently.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: TransformConfig,
}

impl Transformer {
    #[must_use]
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transform `root` into a node tree.
    ///
    /// A null root yields an empty root node and a scalar root yields an
    /// anonymous leaf. Anything else yields an anonymous container.
    ///
    /// # Errors
    ///
    /// Returns [`HyperError::Transform`] if a member accessor fails, a cycle
    /// is found, or the graph nests deeper than the configured limit.
    pub fn to_node_tree(&self, root: &dyn Introspect) -> Result<Node, HyperError> {
        debug!(root = root.type_name(), "transforming object graph");
        let mut walk = Walk {
            config: &self.config,
            ancestors: Vec::new(),
        };
        let node = walk
            .node_for(None, root, "$", 0, false)?
            .unwrap_or_else(Node::root);
        debug!(nodes = node.walk().count(), "transformation complete");
        Ok(node)
    }
}

struct Walk<'c> {
    config: &'c TransformConfig,
    ancestors: Vec<usize>,
}

impl Walk<'_> {
    /// Build the node for one value. Nulls become an explicit null leaf
    /// when `keep_null` is set and are dropped otherwise.
    fn node_for(
        &mut self,
        name: Option<String>,
        value: &dyn Introspect,
        path: &str,
        depth: usize,
        keep_null: bool,
    ) -> Result<Option<Node>, HyperError> {
        match value.shape() {
            Shape::Null | Shape::Scalar(Scalar::Null) => {
                Ok(keep_null.then(|| Node::leaf(name, Scalar::Null)))
            }
            Shape::Scalar(scalar) => Ok(Some(Node::leaf(name, scalar))),
            shape => {
                let mut node = Node::container(name);
                self.enter(value, path, depth, |walk| {
                    walk.fill(&mut node, value, shape, path, depth)
                })?;
                Ok(Some(node))
            }
        }
    }

    /// Run `f` with `value` pushed onto the ancestor path.
    fn enter<F>(
        &mut self,
        value: &dyn Introspect,
        path: &str,
        depth: usize,
        f: F,
    ) -> Result<(), HyperError>
    where
        F: FnOnce(&mut Self) -> Result<(), HyperError>,
    {
        if depth > self.config.max_depth {
            return Err(TransformError::DepthExceeded {
                path: path.to_string(),
                limit: self.config.max_depth,
            }
            .into());
        }

        let identity = if self.config.detect_cycles {
            value.identity()
        } else {
            None
        };
        if let Some(id) = identity {
            if self.ancestors.contains(&id) {
                return Err(TransformError::CycleDetected {
                    path: path.to_string(),
                    type_name: value.type_name().to_string(),
                }
                .into());
            }
            self.ancestors.push(id);
        }

        let result = f(self);
        if identity.is_some() {
            self.ancestors.pop();
        }
        result
    }

    fn fill(
        &mut self,
        node: &mut Node,
        value: &dyn Introspect,
        shape: Shape<'_>,
        path: &str,
        depth: usize,
    ) -> Result<(), HyperError> {
        match shape {
            Shape::Null | Shape::Scalar(Scalar::Null) => Ok(()),
            Shape::Scalar(scalar) => node.set_value(scalar),
            Shape::Sequence(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    let item_path = format!("{path}[{index}]");
                    if let Some(child) = self.node_for(None, item, &item_path, depth + 1, false)? {
                        node.push_child(child)?;
                    }
                }
                Ok(())
            }
            Shape::Mapping(entries) => {
                for (key, entry) in entries {
                    let entry_path = format!("{path}.{key}");
                    if let Some(child) =
                        self.node_for(Some(key), entry, &entry_path, depth + 1, true)?
                    {
                        node.push_child(child)?;
                    }
                }
                Ok(())
            }
            Shape::Object(properties) => {
                for property in properties {
                    let member_path = format!("{path}.{}", property.name());
                    if self.config.is_excluded(property.name()) {
                        trace!(path = %member_path, "skipping excluded member");
                        continue;
                    }
                    let member = property
                        .read()
                        .map_err(|source| TransformError::ReadFailed {
                            path: member_path.clone(),
                            type_name: value.type_name().to_string(),
                            source,
                        })?;
                    if let Some(child) = self.node_for(
                        Some(property.name().to_string()),
                        member.get(),
                        &member_path,
                        depth + 1,
                        true,
                    )? {
                        node.push_child(child)?;
                    }
                }
                Ok(())
            }
            Shape::Resource { links, content } => {
                push_links(node, links)?;
                match content.shape() {
                    Shape::Null | Shape::Scalar(Scalar::Null) => Ok(()),
                    Shape::Scalar(scalar) => node.push_child(Node::leaf(None, scalar)),
                    inner => self.fill(node, content, inner, path, depth),
                }
            }
        }
    }
}

/// One link node per action descriptor, in link order.
fn push_links(node: &mut Node, links: &Links) -> Result<(), HyperError> {
    for affordance in links {
        for descriptor in affordance.action_descriptors() {
            node.push_child(Node::link(
                affordance.rels().to_vec(),
                affordance.href(),
                descriptor.action_kind(),
                descriptor.template_fragment().map(str::to_string),
            ))?;
        }
    }
    Ok(())
}
