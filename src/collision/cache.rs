use std::collections::HashMap;

use crate::core::{bounds::BoundingBox, tags::TagSet};
use crate::utils::allocator::SolidId;

#[derive(Debug, Clone)]
struct CacheEntry {
    bounds: BoundingBox,
    tags: TagSet,
    colliding: Vec<SolidId>,
}

/// Memoized collision results keyed by the querying solid's box.
///
/// An entry only answers while the solid's position, size, and anchor match
/// what was cached, and while it is queried against the same tags.
#[derive(Debug, Default, Clone)]
pub struct QueryCache {
    entries: HashMap<SolidId, CacheEntry>,
    hits: usize,
    misses: usize,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, id: SolidId, bounds: &BoundingBox, tags: TagSet) -> Option<&[SolidId]> {
        match self.entries.get(&id) {
            Some(entry) if entry.bounds == *bounds && entry.tags == tags => {
                self.hits += 1;
                Some(entry.colliding.as_slice())
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn store(&mut self, id: SolidId, bounds: BoundingBox, tags: TagSet, colliding: Vec<SolidId>) {
        self.entries.insert(
            id,
            CacheEntry {
                bounds,
                tags,
                colliding,
            },
        );
    }

    pub fn invalidate(&mut self, id: SolidId) {
        self.entries.remove(&id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since the cache was created.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;

    #[test]
    fn moved_box_misses() {
        let mut cache = QueryCache::new();
        let id = SolidId::new(0, 0);
        let bounds = BoundingBox::from_xywh(0.0, 0.0, 8.0, 8.0);
        cache.store(id, bounds, TagSet::ALL, vec![SolidId::new(1, 0)]);

        assert_eq!(cache.get(id, &bounds, TagSet::ALL).map(<[_]>::len), Some(1));
        assert!(cache.get(id, &bounds.translated(Vec2::X), TagSet::ALL).is_none());
        assert!(cache.get(id, &bounds, TagSet::EMPTY).is_none());
        assert_eq!(cache.stats(), (1, 2));
    }
}
