#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! A URI-to-handler routing engine.
//!
//! Registered URI templates — literal segments, named path parameters,
//! regex-constrained parameters, and catch-all wildcards — are compiled into
//! a prefix tree of matcher nodes. An incoming URI is resolved to the
//! best-matching route via a lazy, priority-ordered, backtracking search,
//! returning the matched node, the parameter values extracted from the URI,
//! and the controller bound to the route. The inverse operation is also
//! supported: given a node and concrete parameter values, reconstruct a
//! valid URI.
//!
//! Template grammar:
//!
//! ```ignore
//!  Syntax            Matches
//!  literal           the literal text, verbatim
//!  {name}            anything up to the next separator or affix boundary
//!  {name:pattern}    a substring satisfying the anchored regex pattern
//!  **name            the entire remaining uri (terminal only)
//! ```
//!
//! Literal text surrounding a parameter within one segment becomes that
//! parameter's prefix/postfix, so `/orders/id-{id}.html` captures `35` from
//! `/orders/id-35.html`.
//!
//! ```
//! use uritree::{BasicController, Controller, Router};
//!
//! # fn main() -> Result<(), uritree::RouterError> {
//! let mut router = Router::new();
//! router.add_route("/catalog/toys/", BasicController::new((), "toys"))?;
//! router.add_route(
//!     "/catalog/toys/{make}/{model}",
//!     BasicController::new((), "model"),
//! )?;
//!
//! let matched = router.find_route("/catalog/toys/toyota/rav4").unwrap();
//! assert_eq!(matched.controller.id(), "model");
//! assert_eq!(matched.params.get_path_param("make"), Some("toyota"));
//! assert_eq!(matched.params.get_path_param("model"), Some("rav4"));
//!
//! assert!(router.find_route("/catalog/books/").is_none());
//! # Ok(())
//! # }
//! ```
//!
//! Among overlapping routes the most specific wins: exact literals are tried
//! before regex-constrained parameters, then plain parameters, then
//! catch-alls. A branch that matches a segment but fails deeper in the tree
//! backtracks to the next sibling automatically.
//!
//! The router performs no URI normalization, method dispatch, or controller
//! invocation; it maps a path string to a route and hands back the bound
//! controller untouched.

pub mod controller;
pub mod error;
pub mod node;
pub mod params;
pub mod router;
pub mod strlib;

pub use controller::{BasicController, Controller, UniqueController};
pub use error::RouterError;
pub use node::{Node, NodeId, NodeKind, NodeType, SegmentMatch};
pub use params::{
    copy_path_params, make_param, make_regex_param, PathParam, RegexParam, UriParams,
};
pub use router::{RouteIter, RouteMatch, Router};
