use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::SolidWorld;
use crate::error::Result;
use crate::utils::allocator::SolidId;

/// A [`SolidWorld`] shared between threads.
///
/// Every mutation, including flushes and index splits, happens under the
/// write lock, so readers never observe a partially updated tree.
#[derive(Clone, Default)]
pub struct SharedSolidWorld {
    inner: Arc<RwLock<SolidWorld>>,
}

impl SharedSolidWorld {
    pub fn new(world: SolidWorld) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SolidWorld> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SolidWorld> {
        self.inner.write()
    }

    pub fn tick(&self, dt: f32) -> Result<()> {
        self.inner.write().step(dt)
    }

    pub fn move_by(&self, id: SolidId, dx: f32, dy: f32) -> Result<bool> {
        self.inner.write().move_by(id, dx, dy)
    }

    pub fn colliding_pairs(&self) -> Vec<(SolidId, SolidId)> {
        self.inner.read().colliding_pairs()
    }
}

impl From<SolidWorld> for SharedSolidWorld {
    fn from(world: SolidWorld) -> Self {
        Self::new(world)
    }
}
