use std::fmt;

/// Represents errors raised during route construction and URI generation.
///
/// Every variant carries a stable numeric code, retrievable through
/// [`code`](RouterError::code), so callers can dispatch on failures without
/// parsing messages. A lookup that simply finds no matching route is *not* an
/// error; [`Router::find_route`](crate::Router::find_route) returns `None`
/// for that case.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RouterError {
    /// Internal invariant violation: attempted to add a child node that is
    /// structurally equal to an existing sibling. Construction merges equal
    /// nodes instead, so reaching this indicates a defect in the caller.
    AddChild {
        /// Name of the parent node.
        parent: String,
        /// Name of the already-present equal child.
        child: String,
    },
    /// Attempted to add a child to a catch-all node. Catch-all nodes consume
    /// the entire remaining URI and are always leaves.
    AddChildCatchAll {
        /// Name of the catch-all node.
        node: String,
    },
    /// The same controller was added twice to one node.
    DuplicateController {
        /// Name of the node holding the controller.
        node: String,
        /// Id of the rejected controller.
        controller: String,
    },
    /// A regex-constrained template segment has an unparsable pattern.
    InvalidRegex {
        /// The pattern as written in the template.
        pattern: String,
        /// The compile error reported by the regex engine.
        reason: String,
    },
    /// URI generation was invoked without a value for a required parameter.
    MakeUriMissingParam {
        /// Name of the node that needed the value.
        node: String,
        /// The missing parameter name.
        param: String,
    },
    /// The value supplied for URI generation fails the node's pattern.
    MakeUriRegexFail {
        /// Name of the node whose pattern rejected the value.
        node: String,
        /// The parameter name.
        param: String,
        /// The rejected value.
        value: String,
    },
    /// A template segment could not be parsed into any known node shape.
    CreateNodeFailed {
        /// The offending segment text.
        segment: String,
    },
    /// The same parameter name was reused along one route's ancestor chain.
    NonUniqueParam {
        /// The repeated parameter name.
        param: String,
        /// Name of the ancestor node already owning the parameter.
        node: String,
    },
    /// A lookup by controller id found no registered controller.
    ControllerNotFound {
        /// The id that was searched for.
        id: String,
    },
}

impl RouterError {
    /// Returns the stable numeric code of this failure kind.
    pub fn code(&self) -> u32 {
        match self {
            Self::AddChild { .. } => 1_000_000,
            Self::AddChildCatchAll { .. } => 1_000_001,
            Self::DuplicateController { .. } => 1_000_002,
            Self::InvalidRegex { .. } => 1_000_003,
            Self::MakeUriMissingParam { .. } => 1_000_004,
            Self::MakeUriRegexFail { .. } => 1_000_005,
            Self::CreateNodeFailed { .. } => 1_000_006,
            Self::NonUniqueParam { .. } => 1_000_007,
            Self::ControllerNotFound { .. } => 1_000_008,
        }
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddChild { parent, child } => {
                write!(
                    f,
                    "cannot add child to {}: equal child node {} already exists",
                    parent, child
                )
            }
            Self::AddChildCatchAll { node } => {
                write!(f, "cannot add child nodes to catch-all node {}", node)
            }
            Self::DuplicateController { node, controller } => {
                write!(
                    f,
                    "controller '{}' is already registered on node {}",
                    controller, node
                )
            }
            Self::InvalidRegex { pattern, reason } => {
                write!(f, "invalid regex pattern '{}': {}", pattern, reason)
            }
            Self::MakeUriMissingParam { node, param } => {
                write!(
                    f,
                    "cannot generate uri for node {}: missing value for parameter '{}'",
                    node, param
                )
            }
            Self::MakeUriRegexFail { node, param, value } => {
                write!(
                    f,
                    "cannot generate uri for node {}: value '{}' of parameter '{}' does not match the node's pattern",
                    node, value, param
                )
            }
            Self::CreateNodeFailed { segment } => {
                write!(f, "cannot parse template segment '{}' into a node", segment)
            }
            Self::NonUniqueParam { param, node } => {
                write!(
                    f,
                    "uri parameters must be unique: parameter '{}' is already used by ancestor node {}",
                    param, node
                )
            }
            Self::ControllerNotFound { id } => {
                write!(f, "no controller found with id '{}'", id)
            }
        }
    }
}

impl std::error::Error for RouterError {}
