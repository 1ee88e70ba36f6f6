//! The ordered vertex set of the polygon being traced.
//!
//! Vertices live in insertion order, which is also polygon edge order: each
//! vertex connects to the next, and the last connects back to the first.
//! Handle ids come from a counter that is never reset, so an id captured
//! before a [`PointSet::clear`] can never address a vertex placed after it.

use std::collections::HashMap;

use crate::error::PolysnipError;
use crate::geom::{Handle, HandleId, Point};

/// Minimum number of vertices for an extractable polygon.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Ordered `(id, point)` pairs with an id→index lookup.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    handles: Vec<Handle>,
    index: HashMap<HandleId, usize>,
    next_id: u64,
}

impl PointSet {
    /// Creates an empty point set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its fresh handle id.
    pub fn add(&mut self, point: Point) -> HandleId {
        let id = HandleId::new(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.handles.len());
        self.handles.push(Handle::new(id, point));
        id
    }

    /// Replaces the position of an existing vertex, keeping its place in the
    /// polygon order.
    ///
    /// # Errors
    /// Returns [`PolysnipError::UnknownHandle`] if `id` is not in the set.
    pub fn move_handle(&mut self, id: HandleId, point: Point) -> Result<(), PolysnipError> {
        let idx = *self
            .index
            .get(&id)
            .ok_or(PolysnipError::UnknownHandle(id))?;
        self.handles[idx].point = point;
        Ok(())
    }

    /// Removes one vertex; the remaining vertices keep their relative order.
    ///
    /// # Errors
    /// Returns [`PolysnipError::UnknownHandle`] if `id` is not in the set.
    pub fn remove(&mut self, id: HandleId) -> Result<Point, PolysnipError> {
        let idx = self
            .index
            .remove(&id)
            .ok_or(PolysnipError::UnknownHandle(id))?;
        let removed = self.handles.remove(idx);
        for handle in &self.handles[idx..] {
            if let Some(slot) = self.index.get_mut(&handle.id) {
                *slot -= 1;
            }
        }
        Ok(removed.point)
    }

    /// Drops every vertex. Ids issued so far are not reused.
    pub fn clear(&mut self) {
        self.handles.clear();
        self.index.clear();
    }

    /// Returns the current vertex order.
    pub fn snapshot(&self) -> Vec<Point> {
        self.handles.iter().map(|h| h.point).collect()
    }

    /// Returns the vertices with their ids, oldest first.
    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    /// Returns the position of a vertex, if present.
    pub fn get(&self, id: HandleId) -> Option<Point> {
        self.index.get(&id).map(|&idx| self.handles[idx].point)
    }

    /// Returns the number of vertices.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns true if the polygon has enough vertices to be extracted.
    pub fn is_complete(&self) -> bool {
        self.size() >= MIN_POLYGON_POINTS
    }

    /// Serializes the polygon as `[x0, y0, x1, y1, ...]`, the form an outline
    /// renderer consumes.
    pub fn flat_coords(&self) -> Vec<f64> {
        self.handles
            .iter()
            .flat_map(|h| [h.point.x, h.point.y])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (PointSet, [HandleId; 3]) {
        let mut set = PointSet::new();
        let a = set.add(Point::new(0.0, 0.0));
        let b = set.add(Point::new(10.0, 0.0));
        let c = set.add(Point::new(5.0, 8.0));
        (set, [a, b, c])
    }

    #[test]
    fn test_add_issues_unique_ids() {
        let (set, [a, b, c]) = triangle();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_eq!(set.size(), 3);
        assert!(set.is_complete());
    }

    #[test]
    fn test_move_changes_only_target() {
        let (mut set, [_, b, _]) = triangle();
        let before = set.snapshot();

        set.move_handle(b, Point::new(12.0, 3.0)).expect("move");

        let after = set.snapshot();
        assert_eq!(after.len(), 3);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], Point::new(12.0, 3.0));
        assert_eq!(after[2], before[2]);
    }

    #[test]
    fn test_move_unknown_handle() {
        let (mut set, _) = triangle();
        let err = set
            .move_handle(HandleId::new(99), Point::new(1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, PolysnipError::UnknownHandle(id) if id.as_u64() == 99));
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let (mut set, [a, _, _]) = triangle();
        set.clear();
        assert!(set.is_empty());

        let fresh = set.add(Point::new(1.0, 1.0));
        assert_ne!(fresh, a);
        assert!(set.move_handle(a, Point::new(2.0, 2.0)).is_err());
    }

    #[test]
    fn test_remove_keeps_order_and_lookup() {
        let (mut set, [a, b, c]) = triangle();
        set.remove(a).expect("remove");

        assert_eq!(set.size(), 2);
        assert_eq!(set.handles()[0].id, b);
        assert_eq!(set.handles()[1].id, c);

        set.move_handle(c, Point::new(7.0, 7.0)).expect("move after remove");
        assert_eq!(set.get(c), Some(Point::new(7.0, 7.0)));
        assert!(!set.is_complete());
    }

    #[test]
    fn test_flat_coords() {
        let (set, _) = triangle();
        assert_eq!(set.flat_coords(), vec![0.0, 0.0, 10.0, 0.0, 5.0, 8.0]);
    }
}
