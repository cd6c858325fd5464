//! Collision detection: quadtree index, tag-scoped groups, and result caching.

pub mod cache;
pub mod groups;
pub mod quadtree;

pub use cache::QueryCache;
pub use groups::CollisionGroupManager;
pub use quadtree::{Quadtree, QuadtreeConfig};
