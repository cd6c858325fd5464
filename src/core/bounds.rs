//! Axis-aligned bounding boxes.
//!
//! Boxes are half-open on both axes: a box covers `[left, right)` horizontally
//! and `[top, bottom)` vertically, so boxes that merely touch do not overlap.
//! A zero-extent span behaves as a point: it overlaps any span containing it
//! and another point only when both coincide.

use serde::{Deserialize, Serialize};

use super::types::{Anchor, Vec2};
use crate::utils::allocator::{Arena, SolidId};

/// Left/top/right/bottom edges of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Axis-aligned rectangle positioned relative to its [`Anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub position: Vec2,
    size: Vec2,
    pub anchor: Anchor,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ZERO, Anchor::TOP_LEFT)
    }
}

impl BoundingBox {
    /// Negative size components are clamped to zero, so edges are never inverted.
    pub fn new(position: Vec2, size: Vec2, anchor: Anchor) -> Self {
        Self {
            position,
            size: size.max(Vec2::ZERO),
            anchor,
        }
    }

    /// Top-left anchored box.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(width, height), Anchor::TOP_LEFT)
    }

    /// Zero-sized box at `point`.
    pub fn point(point: Vec2) -> Self {
        Self::new(point, Vec2::ZERO, Anchor::TOP_LEFT)
    }

    /// Builds a box from its top-left corner, keeping `anchor` for the position.
    pub fn from_corner(top_left: Vec2, size: Vec2, anchor: Anchor) -> Self {
        let size = size.max(Vec2::ZERO);
        Self {
            position: top_left + size * anchor.factor(),
            size,
            anchor,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size.max(Vec2::ZERO);
    }

    pub fn min(&self) -> Vec2 {
        self.position - self.size * self.anchor.factor()
    }

    pub fn max(&self) -> Vec2 {
        self.min() + self.size
    }

    pub fn left(&self) -> f32 {
        self.min().x
    }

    pub fn right(&self) -> f32 {
        self.max().x
    }

    pub fn top(&self) -> f32 {
        self.min().y
    }

    pub fn bottom(&self) -> f32 {
        self.max().y
    }

    pub fn edges(&self) -> Edges {
        let min = self.min();
        let max = min + self.size;
        Edges {
            left: min.x,
            top: min.y,
            right: max.x,
            bottom: max.y,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.min() + self.size * 0.5
    }

    /// Position of the point described by `anchor` on this box.
    pub fn corner(&self, anchor: Anchor) -> Vec2 {
        self.min() + self.size * anchor.factor()
    }

    pub fn is_degenerate(&self) -> bool {
        self.size.x == 0.0 || self.size.y == 0.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            position: self.position + delta,
            ..*self
        }
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        let a = self.edges();
        let b = other.edges();
        spans_overlap(a.left, a.right, b.left, b.right)
            && spans_overlap(a.top, a.bottom, b.top, b.bottom)
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.overlaps(&BoundingBox::point(point))
    }

    /// Smallest box covering both boxes, anchored like `self`.
    pub fn union(&self, other: &BoundingBox) -> Self {
        let min = self.min().min(other.min());
        let max = self.max().max(other.max());
        Self::from_corner(min, max - min, self.anchor)
    }

    /// Splits the box into NW, NE, SW, SE quadrants.
    ///
    /// Each quadrant's size is the parent's halved and rounded, so odd sizes
    /// yield quadrants that slightly overhang rather than leave a gap.
    pub fn quadrants(&self) -> [BoundingBox; 4] {
        let half = (self.size * 0.5).round();
        let min = self.min();
        let quadrant = |dx: f32, dy: f32| {
            BoundingBox::from_corner(min + Vec2::new(dx, dy), half, self.anchor)
        };
        [
            quadrant(0.0, 0.0),
            quadrant(half.x, 0.0),
            quadrant(0.0, half.y),
            quadrant(half.x, half.y),
        ]
    }
}

fn spans_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    match (a_min == a_max, b_min == b_max) {
        (false, false) => a_min < b_max && b_min < a_max,
        (true, false) => b_min <= a_min && a_min < b_max,
        (false, true) => a_min <= b_min && b_min < a_max,
        (true, true) => a_min == b_min,
    }
}

/// Capability of owning a bounding box.
///
/// Anything composed with a [`BoundingBox`] can implement this to take part
/// in collision queries.
pub trait Bounded {
    fn bounding_box(&self) -> &BoundingBox;

    fn bounding_box_mut(&mut self) -> &mut BoundingBox;

    fn position(&self) -> Vec2 {
        self.bounding_box().position
    }

    fn size(&self) -> Vec2 {
        self.bounding_box().size()
    }

    fn set_position(&mut self, position: Vec2) {
        self.bounding_box_mut().position = position;
    }

    fn set_bounding_box(&mut self, bounds: BoundingBox) {
        *self.bounding_box_mut() = bounds;
    }
}

impl Bounded for BoundingBox {
    fn bounding_box(&self) -> &BoundingBox {
        self
    }

    fn bounding_box_mut(&mut self) -> &mut BoundingBox {
        self
    }
}

/// Resolves a handle to the current box of the object it names.
pub trait BoundsLookup {
    fn bounds_of(&self, id: SolidId) -> Option<BoundingBox>;
}

impl<T: Bounded> BoundsLookup for Arena<T> {
    fn bounds_of(&self, id: SolidId) -> Option<BoundingBox> {
        self.get(id).map(|item| *item.bounding_box())
    }
}
