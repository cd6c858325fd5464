//! Default constants and world settings.

use serde::{Deserialize, Serialize};

use crate::core::{bounds::BoundingBox, types::Precision};
use crate::error::{Result, SolidError};

/// Default index region as `[x, y, width, height]`, top-left anchored.
pub const DEFAULT_REGION: [f32; 4] = [0.0, 0.0, 960.0, 540.0];

/// Direct members a quadtree node holds before it splits.
pub const DEFAULT_MAX_OBJECTS: usize = 4;

/// Depth at which quadtree nodes stop splitting.
pub const DEFAULT_MAX_DEPTH: u32 = 12;

/// Size given to solids built without an explicit size.
pub const DEFAULT_SOLID_SIZE: [f32; 2] = [64.0, 64.0];

/// Tick duration (milliseconds) above which a warning is logged.
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 16.0;

/// Index region in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionSettings {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for RegionSettings {
    fn default() -> Self {
        let [x, y, width, height] = DEFAULT_REGION;
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl RegionSettings {
    pub fn to_bounds(&self) -> BoundingBox {
        BoundingBox::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Settings for a [`SolidWorld`](crate::world::SolidWorld) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub region: RegionSettings,
    pub max_objects: usize,
    pub max_depth: u32,
    pub use_cache: bool,
    pub default_precision: Precision,
    /// Upper bound on the displacement magnitude of a single `move_by`.
    /// `None` leaves displacements unclamped.
    pub max_step_displacement: Option<f32>,
    pub frame_budget_ms: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            region: RegionSettings::default(),
            max_objects: DEFAULT_MAX_OBJECTS,
            max_depth: DEFAULT_MAX_DEPTH,
            use_cache: false,
            default_precision: Precision::default(),
            max_step_displacement: None,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl WorldSettings {
    pub fn with_region(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.region = RegionSettings {
            x,
            y,
            width,
            height,
        };
        self
    }

    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_max_step_displacement(mut self, limit: f32) -> Self {
        self.max_step_displacement = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let r = &self.region;
        let finite = [r.x, r.y, r.width, r.height].iter().all(|v| v.is_finite());
        if !finite || r.width < 0.0 || r.height < 0.0 {
            return Err(SolidError::InvalidArgument(format!(
                "region must be finite with non-negative size, got {r:?}"
            )));
        }
        if self.max_objects == 0 {
            return Err(SolidError::InvalidArgument(
                "max_objects must be at least 1".into(),
            ));
        }
        if let Some(limit) = self.max_step_displacement {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(SolidError::InvalidArgument(format!(
                    "max_step_displacement must be positive, got {limit}"
                )));
            }
        }
        Ok(())
    }
}
