use serde::{Deserialize, Serialize};

use super::{
    bounds::{Bounded, BoundingBox},
    tags::{SolidTag, TagSet},
    types::{Anchor, Precision, Vec2},
};
use crate::config::DEFAULT_SOLID_SIZE;
use crate::dynamics::motion::Motion;
use crate::error::{ensure_finite, Result, SolidError};
use crate::utils::allocator::SolidId;

/// Axis-aligned body taking part in collision groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solid {
    pub id: SolidId,
    pub bounds: BoundingBox,
    /// Static solids never move through `move_by` and cannot be pushed.
    pub is_static: bool,
    /// Pushers shove non-static blockers instead of stopping at them.
    pub pusher: bool,
    /// `None` defers to the world's default precision.
    pub precision: Option<Precision>,
    /// Groups this solid belongs to.
    pub tags: TagSet,
    /// Groups this solid tests itself against.
    pub collides_with: TagSet,
    pub motion: Option<Motion>,
}

impl Default for Solid {
    fn default() -> Self {
        Self::builder().build_unchecked()
    }
}

impl Bounded for Solid {
    fn bounding_box(&self) -> &BoundingBox {
        &self.bounds
    }

    fn bounding_box_mut(&mut self) -> &mut BoundingBox {
        &mut self.bounds
    }
}

impl Solid {
    pub fn builder() -> SolidBuilder {
        SolidBuilder::new()
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

pub struct SolidBuilder {
    position: Vec2,
    size: Vec2,
    anchor: Anchor,
    is_static: bool,
    pusher: bool,
    precision: Option<Precision>,
    tags: TagSet,
    collides_with: Option<TagSet>,
    motion: Option<Motion>,
}

impl Default for SolidBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolidBuilder {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::from_array(DEFAULT_SOLID_SIZE),
            anchor: Anchor::TOP_LEFT,
            is_static: false,
            pusher: false,
            precision: None,
            tags: TagSet::single(SolidTag::DEFAULT),
            collides_with: None,
            motion: None,
        }
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height);
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn pusher(mut self, pusher: bool) -> Self {
        self.pusher = pusher;
        self
    }

    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Replaces the default tag with `tags`.
    pub fn tags(mut self, tags: impl Into<TagSet>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Groups tested against; defaults to the solid's own tags.
    pub fn collides_with(mut self, tags: impl Into<TagSet>) -> Self {
        self.collides_with = Some(tags.into());
        self
    }

    pub fn motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }

    pub fn build(self) -> Result<Solid> {
        ensure_finite("position", self.position.x, self.position.y)?;
        ensure_finite("size", self.size.x, self.size.y)?;
        if self.size.x < 0.0 || self.size.y < 0.0 {
            return Err(SolidError::InvalidArgument(format!(
                "size must be non-negative, got ({}, {})",
                self.size.x, self.size.y
            )));
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> Solid {
        Solid {
            id: SolidId::default(),
            bounds: BoundingBox::new(self.position, self.size, self.anchor),
            is_static: self.is_static,
            pusher: self.pusher,
            precision: self.precision,
            tags: self.tags,
            collides_with: self.collides_with.unwrap_or(self.tags),
            motion: self.motion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collides_with_defaults_to_own_tags() {
        let tag = SolidTag::new(4).unwrap();
        let solid = Solid::builder().tags(tag).build().unwrap();
        assert_eq!(solid.collides_with, TagSet::single(tag));
        assert!(!solid.is_static());
        assert!(solid.precision.is_none());
    }

    #[test]
    fn malformed_geometry_is_rejected() {
        assert!(Solid::builder().size(-1.0, 4.0).build().is_err());
        assert!(Solid::builder().position(f32::NAN, 0.0).build().is_err());
    }
}
