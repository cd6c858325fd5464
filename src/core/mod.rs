//! Core types: bounding boxes, anchors, collision tags, and solids.

pub mod bounds;
pub mod solid;
pub mod tags;
pub mod types;

pub use bounds::{Bounded, BoundingBox, BoundsLookup, Edges};
pub use solid::{Solid, SolidBuilder};
pub use tags::{SolidTag, TagSet};
pub use types::{Anchor, Axis, HorizontalAnchor, Precision, Vec2, VerticalAnchor};
