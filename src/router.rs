//! Top-level router: template parsing, tree construction/merging, and the
//! priority-ordered backtracking search.

use std::collections::HashMap;

use log::{debug, trace};

use crate::controller::Controller;
use crate::error::RouterError;
use crate::node::{Node, NodeId};
use crate::params::{copy_path_params, UriParams};
use crate::strlib::{CATCH_ALL_PARAM_NAME, ROUTE_PATH_SEPARATOR, ROUTE_STRING_SEPARATOR};

/// A successful route lookup: the matched node, the parameters extracted
/// from the URI, and the selected controller.
#[derive(Debug)]
pub struct RouteMatch<'r, T> {
    /// Handle of the matched node, usable with
    /// [`Router::make_uri`]/[`Router::uri_template`].
    pub node_id: NodeId,
    /// The matched node itself.
    pub node: &'r Node<T>,
    /// Parameters extracted along the matched path, in root-to-leaf order.
    pub params: UriParams,
    /// The selected controller bound to the node.
    pub controller: &'r T,
}

/// Maps URI templates to controllers through a prefix tree of matcher nodes.
///
/// Nodes live in an arena owned by the router; the tree structure is plain
/// ids, with each node keeping a non-owning parent id used only for upward
/// ancestor scans. Construction (`add_route`) requires `&mut self`; lookups
/// take `&self` and allocate their own parameter collections, so a fully
/// built router can be queried from multiple readers.
///
/// ```
/// use uritree::{BasicController, Controller, Router};
///
/// # fn main() -> Result<(), uritree::RouterError> {
/// let mut router = Router::new();
/// router.add_route(
///     "/catalog/{category}/item-{id:([0-9]+)}",
///     BasicController::new((), "item"),
/// )?;
/// router.add_route("/catalog/{category}/", BasicController::new((), "listing"))?;
///
/// let matched = router.find_route("/catalog/toys/item-42").unwrap();
/// assert_eq!(matched.controller.id(), "item");
/// assert_eq!(matched.params.get_path_param("category"), Some("toys"));
/// assert_eq!(matched.params.get_regex_param("id").unwrap()[1], "42");
/// # Ok(())
/// # }
/// ```
pub struct Router<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a router holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
        }
    }

    /// Handle of the root node.
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Resolves a node handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not originate from this router.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    /// Lazily produces every route matching `uri`, best match first.
    ///
    /// The search is a depth-first walk trying siblings in priority order;
    /// each call to `next` resumes where the previous candidate left off, so
    /// a branch that matches a segment syntactically but fails deeper in the
    /// tree falls back to the next sibling at the point of failure.
    pub fn find_routes<'r, 'u>(&'r self, uri: &'u str) -> RouteIter<'r, 'u, T> {
        RouteIter {
            router: self,
            stack: vec![Frame {
                node: self.root_id(),
                rest: uri,
                params: UriParams::default(),
            }],
        }
    }

    /// Returns the best-matching route for `uri`, or `None` when no
    /// registered route matches. A miss is not an error.
    pub fn find_route<'r>(&'r self, uri: &str) -> Option<RouteMatch<'r, T>> {
        self.find_routes(uri).next()
    }

    /// Eagerly materializes every registered route: one [`RouteMatch`] per
    /// controller per controller-bearing node, with empty parameters. The
    /// list is recomputed on every call.
    pub fn get_all_routes(&self) -> Vec<RouteMatch<'_, T>> {
        let mut routes = Vec::new();
        let mut stack = vec![self.root_id()];

        while let Some(id) = stack.pop() {
            let node = self.node(id);
            for controller in node.controllers() {
                routes.push(RouteMatch {
                    node_id: id,
                    node,
                    params: UriParams::default(),
                    controller,
                });
            }
            stack.extend(node.children().iter().rev().copied());
        }

        routes
    }

    /// Reconstructs the full URI for `node` from concrete parameter values,
    /// concatenating the per-node fragments root-to-node.
    pub fn make_uri(
        &self,
        node: NodeId,
        values: &HashMap<String, String>,
    ) -> Result<String, RouterError> {
        let mut uri = String::new();
        for id in self.ancestor_chain(node) {
            uri.push_str(&self.node(id).make_uri(values)?);
        }
        Ok(uri)
    }

    /// Reconstructs the route template string leading to `node`.
    pub fn uri_template(&self, node: NodeId) -> String {
        let mut template = String::new();
        for id in self.ancestor_chain(node) {
            template.push_str(&self.node(id).uri_template());
        }
        template
    }

    /// Inserts `child` under `parent`, keeping siblings ordered by priority
    /// descending (ties keep insertion order).
    ///
    /// Callers building routes should merge into a structurally-equal
    /// sibling instead of calling this; an equal sibling here is an
    /// invariant violation reported as [`RouterError::AddChild`].
    pub fn add_child_node(
        &mut self,
        parent: NodeId,
        mut child: Node<T>,
    ) -> Result<NodeId, RouterError> {
        if self.node(parent).is_catch_all() {
            return Err(RouterError::AddChildCatchAll {
                node: self.node(parent).name(),
            });
        }

        if let Some(duplicate) = self.find_equal_child(parent, &child) {
            return Err(RouterError::AddChild {
                parent: self.node(parent).name(),
                child: self.node(duplicate).name(),
            });
        }

        let priority = child.priority();
        let at = {
            let children = self.node(parent).children();
            children
                .iter()
                .position(|&sibling| self.node(sibling).priority() < priority)
                .unwrap_or(children.len())
        };

        debug!(
            "created node {} under {}",
            child.name(),
            self.node(parent).name()
        );

        let id = NodeId(self.nodes.len());
        child.set_parent(parent);
        self.nodes.push(child);
        self.node_mut(parent).insert_child(at, id);
        Ok(id)
    }

    // Root-to-node ids along the parent chain.
    fn ancestor_chain(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            chain.push(id);
            cursor = self.node(id).parent();
        }
        chain.reverse();
        chain
    }

    fn find_equal_child(&self, parent: NodeId, candidate: &Node<T>) -> Option<NodeId> {
        self.node(parent)
            .children()
            .iter()
            .copied()
            .find(|&child| self.node(child).equals(candidate))
    }

    // Walks the ancestor chain upwards from `node`, rejecting a parameter
    // name already captured by an ancestor.
    fn ensure_unique_param(&self, node: NodeId, param: &str) -> Result<(), RouterError> {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.param_name() == Some(param) {
                return Err(RouterError::NonUniqueParam {
                    param: param.to_string(),
                    node: node.name(),
                });
            }
            cursor = node.parent();
        }
        Ok(())
    }
}

impl<T: Controller> Router<T> {
    /// Registers `template`, binding `controller` to its terminal node.
    ///
    /// The template is tokenized into segment descriptors; descending from
    /// the root, each descriptor either merges into a structurally-equal
    /// existing child or creates a new node. An empty template binds the
    /// controller to the root.
    pub fn add_route(&mut self, template: &str, controller: T) -> Result<NodeId, RouterError> {
        let mut current = self.root_id();
        let mut remaining = template;

        while !remaining.is_empty() {
            // A catch-all consumes the whole remaining template; it can only
            // be the terminal element.
            let (head, tail) = if remaining.starts_with(CATCH_ALL_PARAM_NAME) {
                (remaining, "")
            } else {
                next_segment(remaining)
            };

            let candidate = make_node(head)?;
            if let Some(param) = candidate.param_name() {
                self.ensure_unique_param(current, param)?;
            }

            current = match self.find_equal_child(current, &candidate) {
                Some(existing) => {
                    trace!(
                        "merging segment {:?} into existing node {}",
                        head,
                        self.node(existing).name()
                    );
                    existing
                }
                None => self.add_child_node(current, candidate)?,
            };
            remaining = tail;
        }

        self.node_mut(current).add_controller(controller)?;
        debug!(
            "route {:?} registered at node {}",
            template,
            self.node(current).name()
        );
        Ok(current)
    }

    /// Returns the route whose node holds a controller with the given id.
    pub fn get_route_match_by_controller_id(
        &self,
        id: &str,
    ) -> Result<RouteMatch<'_, T>, RouterError> {
        self.get_all_routes()
            .into_iter()
            .find(|route| route.controller.id() == id)
            .ok_or_else(|| RouterError::ControllerNotFound { id: id.to_string() })
    }
}

struct Frame<'u> {
    node: NodeId,
    rest: &'u str,
    params: UriParams,
}

/// Lazy, pull-based route search over a [`Router`] tree.
///
/// Carries an explicit depth-first stack of `(node, remaining-text, params)`
/// frames; each `next` call advances until the next complete match.
/// Abandoning the iterator early needs no cleanup.
pub struct RouteIter<'r, 'u, T> {
    router: &'r Router<T>,
    stack: Vec<Frame<'u>>,
}

impl<'r, 'u, T> Iterator for RouteIter<'r, 'u, T> {
    type Item = RouteMatch<'r, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            let node = self.router.node(frame.node);

            let Some(matched) = node.match_segment(frame.rest) else {
                trace!("no match at {} for {:?}", node.name(), frame.rest);
                continue;
            };

            let params = match matched.path_param {
                Some(path_param) => {
                    copy_path_params(&frame.params, path_param, matched.regex_param)
                }
                None => frame.params,
            };

            if matched.rest.is_empty() {
                // URI fully consumed: this node is a complete match if a
                // route terminates here.
                if let Some(controller) = node.controllers().first() {
                    return Some(RouteMatch {
                        node_id: frame.node,
                        node,
                        params,
                        controller,
                    });
                }
            } else {
                // Push in reverse so the highest-priority child is tried
                // first.
                for &child in node.children().iter().rev() {
                    self.stack.push(Frame {
                        node: child,
                        rest: matched.rest,
                        params: params.clone(),
                    });
                }
            }
        }
        None
    }
}

// Splits off the leading segment of a route template, keeping the separator
// on the head. Separators inside `{...}` belong to the parameter (regex
// patterns may contain `/`, `_` and counted repetitions like `{4}`).
fn next_segment(template: &str) -> (&str, &str) {
    let mut depth = 0usize;
    for (i, c) in template.char_indices() {
        if c == '{' {
            depth += 1;
        } else if c == '}' {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && (c == ROUTE_PATH_SEPARATOR || c == ROUTE_STRING_SEPARATOR) {
            let end = i + c.len_utf8();
            return (&template[..end], &template[end..]);
        }
    }
    (template, "")
}

// Parses one template segment into a node.
fn make_node<T>(segment: &str) -> Result<Node<T>, RouterError> {
    let failed = || RouterError::CreateNodeFailed {
        segment: segment.to_string(),
    };

    if let Some(name) = segment.strip_prefix(CATCH_ALL_PARAM_NAME) {
        // The name may not span segments; a separator here means the
        // catch-all was not the terminal element.
        if name.contains(ROUTE_PATH_SEPARATOR) {
            return Err(failed());
        }
        return Ok(Node::catch_all((!name.is_empty()).then_some(name)));
    }

    let Some(open) = segment.find('{') else {
        if segment.contains('}') {
            return Err(failed());
        }
        return Ok(Node::exact_match(segment));
    };

    let close = segment
        .rfind('}')
        .filter(|&close| close > open)
        .ok_or_else(failed)?;

    let prefix = &segment[..open];
    let inner = &segment[open + 1..close];
    let postfix = &segment[close + 1..];

    // A second parameter in the same segment is not supported.
    if postfix.contains('{') || postfix.contains('}') {
        return Err(failed());
    }

    match inner.split_once(':') {
        Some((name, pattern)) => {
            if name.is_empty() || pattern.is_empty() || name.contains(['{', '}']) {
                return Err(failed());
            }
            Node::path_param_regex(segment, name, pattern, prefix, postfix)
        }
        None => {
            if inner.is_empty() || inner.contains('{') || inner.contains('}') {
                return Err(failed());
            }
            Ok(Node::path_param(inner, prefix, postfix))
        }
    }
}
