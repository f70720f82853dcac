//! Tree node variants and their matching, equality, priority, and
//! URI-generation behavior.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::controller::Controller;
use crate::error::RouterError;
use crate::params::{make_param, make_regex_param, PathParam, RegexParam};
use crate::strlib::{
    self, CATCH_ALL_PARAM_NAME, ROUTE_PATH_SEPARATOR, ROUTE_STRING_SEPARATOR,
};

// Priority tiers, one order of magnitude apart so parameter affix lengths
// added on top never cross into the next tier.
const PRIORITY_CATCH_ALL: usize = 10;
const PRIORITY_PATH_PARAM: usize = 100;
const PRIORITY_PATH_PARAM_REGEX: usize = 1_000;
const PRIORITY_EXACT_MATCH: usize = 10_000;
const PRIORITY_ROOT: usize = 100_000;

/// Handle to a node stored in a [`Router`](crate::Router) arena.
///
/// Ids are only meaningful for the router that produced them.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(pub(crate) usize);

/// Tag identifying a node's variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeType {
    Root,
    ExactMatch,
    PathParam,
    PathParamRegex,
    CatchAll,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Root => "RootNode",
            Self::ExactMatch => "ExactMatchNode",
            Self::PathParam => "PathParamNode",
            Self::PathParamRegex => "PathParamNodeRegex",
            Self::CatchAll => "CatchAllNode",
        };
        f.write_str(name)
    }
}

/// The closed set of node shapes.
#[derive(Debug)]
pub enum NodeKind {
    Root,
    ExactMatch {
        literal: String,
    },
    PathParam {
        name: String,
        prefix: String,
        postfix: String,
    },
    PathParamRegex {
        name: String,
        prefix: String,
        postfix: String,
        regex: Regex,
        /// The segment exactly as written in the registered template, kept so
        /// the template can be regenerated on demand.
        template: String,
    },
    CatchAll {
        name: String,
    },
}

/// Outcome of matching one node against the remaining URI text.
#[derive(Clone, Debug)]
pub struct SegmentMatch<'u> {
    /// Text left unconsumed after this node's segment.
    pub rest: &'u str,
    /// The path parameter extracted by this node, if it captures one.
    pub path_param: Option<PathParam>,
    /// The capture groups, for regex-constrained nodes.
    pub regex_param: Option<RegexParam>,
}

/// A node in the matcher tree.
///
/// Children are kept sorted by [`priority`](Node::priority) descending;
/// insertion order breaks ties, so sibling evaluation order is deterministic.
/// The parent id is used only for upward ancestor scans, never for downward
/// traversal.
#[derive(Debug)]
pub struct Node<T> {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    controllers: Vec<T>,
}

impl<T> Node<T> {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            controllers: Vec::new(),
        }
    }

    /// Creates the tree root. It consumes no URI text and carries no
    /// discriminating fields.
    pub fn root() -> Self {
        Self::with_kind(NodeKind::Root)
    }

    /// Creates a node matching `literal` verbatim.
    pub fn exact_match(literal: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::ExactMatch {
            literal: literal.into(),
        })
    }

    /// Creates a plain path-parameter node with optional literal affixes.
    pub fn path_param(
        name: impl Into<String>,
        prefix: impl Into<String>,
        postfix: impl Into<String>,
    ) -> Self {
        Self::with_kind(NodeKind::PathParam {
            name: name.into(),
            prefix: prefix.into(),
            postfix: postfix.into(),
        })
    }

    /// Creates a regex-constrained path-parameter node.
    ///
    /// `pattern` is compiled anchored (`^pattern$`) so it must match the
    /// captured substring in full. `template` is the segment as written in
    /// the route template.
    pub fn path_param_regex(
        template: impl Into<String>,
        name: impl Into<String>,
        pattern: &str,
        prefix: impl Into<String>,
        postfix: impl Into<String>,
    ) -> Result<Self, RouterError> {
        let regex =
            Regex::new(&format!("^{}$", pattern)).map_err(|err| RouterError::InvalidRegex {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })?;

        Ok(Self::with_kind(NodeKind::PathParamRegex {
            name: name.into(),
            prefix: prefix.into(),
            postfix: postfix.into(),
            regex,
            template: template.into(),
        }))
    }

    /// Creates a catch-all node. Without a custom name the value is recorded
    /// under [`CATCH_ALL_PARAM_NAME`].
    pub fn catch_all(name: Option<&str>) -> Self {
        Self::with_kind(NodeKind::CatchAll {
            name: name.unwrap_or(CATCH_ALL_PARAM_NAME).to_string(),
        })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Root => NodeType::Root,
            NodeKind::ExactMatch { .. } => NodeType::ExactMatch,
            NodeKind::PathParam { .. } => NodeType::PathParam,
            NodeKind::PathParamRegex { .. } => NodeType::PathParamRegex,
            NodeKind::CatchAll { .. } => NodeType::CatchAll,
        }
    }

    /// The parameter name captured by this node, if any.
    pub fn param_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Root | NodeKind::ExactMatch { .. } => None,
            NodeKind::PathParam { name, .. }
            | NodeKind::PathParamRegex { name, .. }
            | NodeKind::CatchAll { name } => Some(name),
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self.kind, NodeKind::CatchAll { .. })
    }

    /// Sibling evaluation rank; higher values are tried first.
    ///
    /// Exact literals beat regex parameters, which beat plain parameters,
    /// which beat catch-alls. Within the parameter tiers, longer surrounding
    /// literal affixes rank earlier since they disambiguate more.
    pub fn priority(&self) -> usize {
        match &self.kind {
            NodeKind::Root => PRIORITY_ROOT,
            NodeKind::ExactMatch { .. } => PRIORITY_EXACT_MATCH,
            NodeKind::PathParam {
                prefix, postfix, ..
            } => PRIORITY_PATH_PARAM + prefix.len() + postfix.len(),
            NodeKind::PathParamRegex {
                prefix, postfix, ..
            } => PRIORITY_PATH_PARAM_REGEX + prefix.len() + postfix.len(),
            NodeKind::CatchAll { .. } => PRIORITY_CATCH_ALL,
        }
    }

    /// Human-readable node name built from the variant and its
    /// discriminating fields, used in diagnostics and error messages.
    pub fn name(&self) -> String {
        match &self.kind {
            NodeKind::Root => self.node_type().to_string(),
            NodeKind::ExactMatch { literal } => format!("{}::{}", self.node_type(), literal),
            NodeKind::PathParam {
                name,
                prefix,
                postfix,
            } => format!("{}::{}::'{}'::'{}'", self.node_type(), name, prefix, postfix),
            NodeKind::PathParamRegex {
                name,
                prefix,
                postfix,
                regex,
                ..
            } => format!(
                "{}::'{}'::'{}'::'{}'::'{}'",
                self.node_type(),
                name,
                regex,
                prefix,
                postfix
            ),
            NodeKind::CatchAll { name } => format!("{}::{}", self.node_type(), name),
        }
    }

    /// Structural equality used for sibling merging during construction.
    ///
    /// Parameter *names* are deliberately not discriminating: two plain
    /// parameter nodes with the same affixes occupy the same position in the
    /// URI space whatever they are called, so they merge into one node (the
    /// first registered name wins). Likewise any two catch-alls are equal.
    pub fn equals(&self, other: &Node<T>) -> bool {
        match (&self.kind, &other.kind) {
            (NodeKind::Root, NodeKind::Root) => true,
            (NodeKind::ExactMatch { literal: a }, NodeKind::ExactMatch { literal: b }) => a == b,
            (
                NodeKind::PathParam {
                    prefix: ap,
                    postfix: aq,
                    ..
                },
                NodeKind::PathParam {
                    prefix: bp,
                    postfix: bq,
                    ..
                },
            ) => ap == bp && aq == bq,
            (
                NodeKind::PathParamRegex {
                    prefix: ap,
                    postfix: aq,
                    regex: ar,
                    ..
                },
                NodeKind::PathParamRegex {
                    prefix: bp,
                    postfix: bq,
                    regex: br,
                    ..
                },
            ) => ap == bp && aq == bq && ar.as_str() == br.as_str(),
            (NodeKind::CatchAll { .. }, NodeKind::CatchAll { .. }) => true,
            _ => false,
        }
    }

    /// Attempts to match this node against the start of `uri`.
    ///
    /// On success returns the unconsumed rest plus any parameters this node
    /// extracts. The root consumes nothing; a catch-all consumes everything.
    pub fn match_segment<'u>(&self, uri: &'u str) -> Option<SegmentMatch<'u>> {
        match &self.kind {
            NodeKind::Root => Some(SegmentMatch {
                rest: uri,
                path_param: None,
                regex_param: None,
            }),
            NodeKind::ExactMatch { literal } => {
                let split = strlib::split_uri_by_path_separator(
                    uri,
                    &[ROUTE_PATH_SEPARATOR, ROUTE_STRING_SEPARATOR],
                );
                if split.head != literal {
                    return None;
                }
                Some(SegmentMatch {
                    rest: split.tail,
                    path_param: None,
                    regex_param: None,
                })
            }
            NodeKind::PathParam {
                name,
                prefix,
                postfix,
            } => {
                let extracted = strlib::extract_uri_param(uri, prefix, postfix)?;
                Some(SegmentMatch {
                    rest: extracted.rest,
                    path_param: Some(make_param(name.clone(), extracted.param)),
                    regex_param: None,
                })
            }
            NodeKind::PathParamRegex {
                name,
                prefix,
                postfix,
                regex,
                ..
            } => {
                let extracted = strlib::extract_uri_param(uri, prefix, postfix)?;
                let captures = regex.captures(extracted.param)?;
                let groups = captures
                    .iter()
                    .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                    .collect();
                Some(SegmentMatch {
                    rest: extracted.rest,
                    path_param: Some(make_param(name.clone(), extracted.param)),
                    regex_param: Some(make_regex_param(name.clone(), groups)),
                })
            }
            NodeKind::CatchAll { name } => Some(SegmentMatch {
                rest: "",
                path_param: Some(make_param(name.clone(), uri)),
                regex_param: None,
            }),
        }
    }

    /// Appends a controller, rejecting one that compares equal to a
    /// controller already bound to this node.
    pub fn add_controller(&mut self, controller: T) -> Result<(), RouterError>
    where
        T: Controller,
    {
        if self.controllers.iter().any(|c| c.equals(&controller)) {
            return Err(RouterError::DuplicateController {
                node: self.name(),
                controller: controller.id().to_string(),
            });
        }
        self.controllers.push(controller);
        Ok(())
    }

    /// Produces this node's own URI fragment from concrete parameter values.
    ///
    /// The full path is assembled root-to-node by
    /// [`Router::make_uri`](crate::Router::make_uri).
    pub fn make_uri(&self, values: &HashMap<String, String>) -> Result<String, RouterError> {
        match &self.kind {
            NodeKind::Root => Ok(String::new()),
            NodeKind::ExactMatch { literal } => Ok(literal.clone()),
            NodeKind::PathParam {
                name,
                prefix,
                postfix,
            } => {
                let value = values
                    .get(name)
                    .ok_or_else(|| RouterError::MakeUriMissingParam {
                        node: self.name(),
                        param: name.clone(),
                    })?;
                Ok(format!("{}{}{}", prefix, value, postfix))
            }
            NodeKind::PathParamRegex {
                name,
                prefix,
                postfix,
                regex,
                ..
            } => {
                let value = values
                    .get(name)
                    .ok_or_else(|| RouterError::MakeUriMissingParam {
                        node: self.name(),
                        param: name.clone(),
                    })?;
                if !regex.is_match(value) {
                    return Err(RouterError::MakeUriRegexFail {
                        node: self.name(),
                        param: name.clone(),
                        value: value.clone(),
                    });
                }
                Ok(format!("{}{}{}", prefix, value, postfix))
            }
            NodeKind::CatchAll { name } => {
                values
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RouterError::MakeUriMissingParam {
                        node: self.name(),
                        param: name.clone(),
                    })
            }
        }
    }

    /// Regenerates this node's fragment of the route template.
    pub fn uri_template(&self) -> String {
        match &self.kind {
            NodeKind::Root => String::new(),
            NodeKind::ExactMatch { literal } => literal.clone(),
            NodeKind::PathParam {
                name,
                prefix,
                postfix,
            } => format!("{}{{{}}}{}", prefix, name, postfix),
            NodeKind::PathParamRegex { template, .. } => template.clone(),
            NodeKind::CatchAll { name } => {
                if name == CATCH_ALL_PARAM_NAME {
                    CATCH_ALL_PARAM_NAME.to_string()
                } else {
                    format!("{}{}", CATCH_ALL_PARAM_NAME, name)
                }
            }
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in evaluation order (priority descending).
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Controllers bound to this node, in registration order.
    pub fn controllers(&self) -> &[T] {
        &self.controllers
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    pub(crate) fn insert_child(&mut self, at: usize, child: NodeId) {
        self.children.insert(at, child);
    }
}

impl<T> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::BasicController;

    type TestNode = Node<BasicController<&'static str>>;

    #[test]
    fn priorities_rank_variants() {
        let exact = TestNode::exact_match("cars/");
        let regex = TestNode::path_param_regex("{id:([0-9]+)}/", "id", "([0-9]+)", "", "/").unwrap();
        let param = TestNode::path_param("id", "", "/");
        let catch_all = TestNode::catch_all(None);

        assert!(exact.priority() > regex.priority());
        assert!(regex.priority() > param.priority());
        assert!(param.priority() > catch_all.priority());
    }

    #[test]
    fn affix_length_raises_priority_within_tier() {
        let bare = TestNode::path_param("id", "", "");
        let affixed = TestNode::path_param("id", "id-", ".html");
        assert!(affixed.priority() > bare.priority());
        assert_eq!(affixed.priority(), bare.priority() + "id-".len() + ".html".len());
    }

    #[test]
    fn names_show_discriminating_fields() {
        let exact = TestNode::exact_match("toys/");
        assert_eq!(exact.name(), "ExactMatchNode::toys/");

        let param = TestNode::path_param("model", "", "");
        assert_eq!(param.name(), "PathParamNode::model::''::''");

        let regex =
            TestNode::path_param_regex("{year:([0-9]{4})}", "year", "([0-9]{4})", "", "").unwrap();
        assert_eq!(
            regex.name(),
            "PathParamNodeRegex::'year'::'^([0-9]{4})$'::''::''"
        );

        let catch_all = TestNode::catch_all(Some("images"));
        assert_eq!(catch_all.name(), "CatchAllNode::images");
    }

    #[test]
    fn equals_ignores_param_names() {
        let a = TestNode::path_param("make", "", "/");
        let b = TestNode::path_param("brand", "", "/");
        let c = TestNode::path_param("make", "m-", "/");

        assert!(a.equals(&b));
        assert!(!a.equals(&c));
    }

    #[test]
    fn equals_discriminates_regex_pattern() {
        let a = TestNode::path_param_regex("{id:([0-9]+)}", "id", "([0-9]+)", "", "").unwrap();
        let b = TestNode::path_param_regex("{id:([0-9]+)}", "other", "([0-9]+)", "", "").unwrap();
        let c = TestNode::path_param_regex("{id:([a-z]+)}", "id", "([a-z]+)", "", "").unwrap();

        assert!(a.equals(&b));
        assert!(!a.equals(&c));
        assert!(!a.equals(&TestNode::path_param("id", "", "")));
    }

    #[test]
    fn catch_all_nodes_are_always_equal() {
        let a = TestNode::catch_all(None);
        let b = TestNode::catch_all(Some("images"));
        assert!(a.equals(&b));
        assert!(!a.equals(&TestNode::exact_match("images")));
    }

    #[test]
    fn exact_match_consumes_one_segment() {
        let node = TestNode::exact_match("toys/");
        let matched = node.match_segment("toys/cars").unwrap();
        assert_eq!(matched.rest, "cars");
        assert!(matched.path_param.is_none());

        assert!(node.match_segment("games/cars").is_none());
    }

    #[test]
    fn path_param_extracts_value() {
        let node = TestNode::path_param("make", "", "/");
        let matched = node.match_segment("toyota/rav4").unwrap();
        assert_eq!(matched.rest, "rav4");
        let param = matched.path_param.unwrap();
        assert_eq!(param.name, "make");
        assert_eq!(param.value, "toyota");
    }

    #[test]
    fn regex_param_records_all_groups() {
        let node = TestNode::path_param_regex(
            "{id:widget-([0-9]+)(green|red)}",
            "id",
            "widget-([0-9]+)(green|red)",
            "",
            "",
        )
        .unwrap();

        let matched = node.match_segment("widget-678green").unwrap();
        let regex_param = matched.regex_param.unwrap();
        assert_eq!(regex_param.groups, vec!["widget-678green", "678", "green"]);

        assert!(node.match_segment("widget-678yellow").is_none());
    }

    #[test]
    fn catch_all_consumes_everything() {
        let node = TestNode::catch_all(Some("filepath"));
        let matched = node.match_segment("css/theme/app.css").unwrap();
        assert_eq!(matched.rest, "");
        let param = matched.path_param.unwrap();
        assert_eq!(param.name, "filepath");
        assert_eq!(param.value, "css/theme/app.css");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = TestNode::path_param_regex("{id:([}", "id", "([", "", "").unwrap_err();
        assert!(matches!(err, RouterError::InvalidRegex { .. }));
    }

    #[test]
    fn duplicate_controller_is_rejected() {
        let mut node = TestNode::catch_all(Some("images"));
        node.add_controller(BasicController::new("one", "ctrl1"))
            .unwrap();
        node.add_controller(BasicController::new("two", "ctrl2"))
            .unwrap();

        let err = node
            .add_controller(BasicController::new("three", "ctrl1"))
            .unwrap_err();
        assert!(matches!(err, RouterError::DuplicateController { .. }));
        assert_eq!(node.controllers().len(), 2);
    }

    #[test]
    fn make_uri_fragments() {
        let mut values = HashMap::new();
        values.insert("id".to_string(), "35".to_string());

        let exact = TestNode::exact_match("catalog/");
        assert_eq!(exact.make_uri(&values).unwrap(), "catalog/");

        let param = TestNode::path_param("id", "id-", ".html");
        assert_eq!(param.make_uri(&values).unwrap(), "id-35.html");

        let missing = TestNode::path_param("other", "", "");
        let err = missing.make_uri(&values).unwrap_err();
        assert!(matches!(err, RouterError::MakeUriMissingParam { .. }));
    }

    #[test]
    fn make_uri_checks_pattern() {
        let node =
            TestNode::path_param_regex("{year:([0-9]{4})}", "year", "([0-9]{4})", "", "").unwrap();

        let mut values = HashMap::new();
        values.insert("year".to_string(), "2015".to_string());
        assert_eq!(node.make_uri(&values).unwrap(), "2015");

        values.insert("year".to_string(), "20xx".to_string());
        let err = node.make_uri(&values).unwrap_err();
        assert!(matches!(err, RouterError::MakeUriRegexFail { .. }));
    }

    #[test]
    fn catch_all_make_uri_returns_value_verbatim() {
        let node = TestNode::catch_all(Some("images"));
        let mut values = HashMap::new();
        values.insert(
            "images".to_string(),
            "/documents/files/file1.png".to_string(),
        );
        assert_eq!(
            node.make_uri(&values).unwrap(),
            "/documents/files/file1.png"
        );

        let err = node.make_uri(&HashMap::new()).unwrap_err();
        assert!(matches!(err, RouterError::MakeUriMissingParam { .. }));
    }

    #[test]
    fn uri_template_fragments() {
        assert_eq!(TestNode::exact_match("toys/").uri_template(), "toys/");
        assert_eq!(
            TestNode::path_param("model-x", "mymodel-", "-item/").uri_template(),
            "mymodel-{model-x}-item/"
        );
        assert_eq!(
            TestNode::path_param_regex("{year:([0-9]{4})}", "year", "([0-9]{4})", "", "")
                .unwrap()
                .uri_template(),
            "{year:([0-9]{4})}"
        );
        assert_eq!(TestNode::catch_all(None).uri_template(), "**");
        assert_eq!(
            TestNode::catch_all(Some("images")).uri_template(),
            "**images"
        );
    }
}
