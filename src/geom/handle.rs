//! Handle identities for polygon vertices.
//!
//! A handle id is issued once when a vertex is placed and stays attached to
//! that vertex until the point set is cleared. It is the only key used to move
//! a vertex, so two vertices at the same position are never confused.

use std::fmt;

use super::point::Point;

/// A stable identifier for one vertex of the polygon being edited.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(pub u64);

impl HandleId {
    /// Creates a new HandleId.
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandleId({})", self.0)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A polygon vertex together with its identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Handle {
    pub id: HandleId,
    pub point: Point,
}

impl Handle {
    /// Creates a new handle.
    #[inline]
    pub fn new(id: HandleId, point: Point) -> Self {
        Self { id, point }
    }
}
