//! Controller abstraction.
//!
//! Controllers are opaque payloads owned by the caller; the router never
//! inspects them beyond identity comparison and id lookup. The trait is the
//! seam between the routing core and whatever dispatch machinery sits on
//! top of it.

/// A value that can be bound to a route.
pub trait Controller {
    /// Identifier used by
    /// [`Router::get_route_match_by_controller_id`](crate::Router::get_route_match_by_controller_id).
    fn id(&self) -> &str;

    /// Identity comparison used to reject duplicate registrations on a
    /// single node.
    fn equals(&self, other: &Self) -> bool;
}

/// A controller carrying an arbitrary payload and a string id.
///
/// Two `BasicController`s are considered the same controller iff their ids
/// are equal, so the same id can only be registered once per node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BasicController<T> {
    pub payload: T,
    id: String,
}

impl<T> BasicController<T> {
    pub fn new(payload: T, id: impl Into<String>) -> Self {
        Self {
            payload,
            id: id.into(),
        }
    }
}

impl<T> Controller for BasicController<T> {
    fn id(&self) -> &str {
        &self.id
    }

    fn equals(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A controller that compares equal to every other, limiting its node to a
/// single controller regardless of ids.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UniqueController<T> {
    pub payload: T,
    id: String,
}

impl<T> UniqueController<T> {
    pub fn new(payload: T, id: impl Into<String>) -> Self {
        Self {
            payload,
            id: id.into(),
        }
    }
}

impl<T> Controller for UniqueController<T> {
    fn id(&self) -> &str {
        &self.id
    }

    fn equals(&self, _other: &Self) -> bool {
        true
    }
}
