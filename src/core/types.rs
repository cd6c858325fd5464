use serde::{Deserialize, Serialize};

/// Common math types re-exported for convenience.
pub use glam::Vec2;

/// Horizontal part of an [`Anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAnchor {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical part of an [`Anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Which point of a box its position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub x: HorizontalAnchor,
    pub y: VerticalAnchor,
}

impl Anchor {
    pub const TOP_LEFT: Self = Self::new(HorizontalAnchor::Left, VerticalAnchor::Top);
    pub const TOP_CENTER: Self = Self::new(HorizontalAnchor::Center, VerticalAnchor::Top);
    pub const TOP_RIGHT: Self = Self::new(HorizontalAnchor::Right, VerticalAnchor::Top);
    pub const CENTER_LEFT: Self = Self::new(HorizontalAnchor::Left, VerticalAnchor::Center);
    pub const CENTER: Self = Self::new(HorizontalAnchor::Center, VerticalAnchor::Center);
    pub const CENTER_RIGHT: Self = Self::new(HorizontalAnchor::Right, VerticalAnchor::Center);
    pub const BOTTOM_LEFT: Self = Self::new(HorizontalAnchor::Left, VerticalAnchor::Bottom);
    pub const BOTTOM_CENTER: Self = Self::new(HorizontalAnchor::Center, VerticalAnchor::Bottom);
    pub const BOTTOM_RIGHT: Self = Self::new(HorizontalAnchor::Right, VerticalAnchor::Bottom);

    pub const fn new(x: HorizontalAnchor, y: VerticalAnchor) -> Self {
        Self { x, y }
    }

    /// Fraction of the box size between its top-left corner and the anchor.
    pub fn factor(&self) -> Vec2 {
        let fx = match self.x {
            HorizontalAnchor::Left => 0.0,
            HorizontalAnchor::Center => 0.5,
            HorizontalAnchor::Right => 1.0,
        };
        let fy = match self.y {
            VerticalAnchor::Top => 0.0,
            VerticalAnchor::Center => 0.5,
            VerticalAnchor::Bottom => 1.0,
        };
        Vec2::new(fx, fy)
    }
}

/// Precision/performance trade-off used when resolving a move.
///
/// Tiers are ordered from cheapest to most thorough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// One check at the destination; a collision reverts the whole move.
    Low,
    /// One check at the destination, walking the line only when blocked.
    #[default]
    Medium,
    /// Checks the swept box; walks both axes unit by unit when it is not free.
    High,
    /// Always walks both axes unit by unit.
    Highest,
}

/// Cartesian axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    pub fn unit(self, amount: f32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(amount, 0.0),
            Axis::Y => Vec2::new(0.0, amount),
        }
    }
}
