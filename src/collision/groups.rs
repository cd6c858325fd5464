//! Tag-scoped collision groups.
//!
//! One quadtree per tag, created on first use. Moved solids are not
//! re-indexed immediately: they are queued per tag and re-inserted by
//! [`CollisionGroupManager::flush`], which the owning driver calls once per
//! tick before any movement is resolved. Until then, queries test every
//! queued or in-flight solid against its live box, since its indexed cells
//! may no longer cover where it is.

use std::collections::{BTreeMap, HashMap};

use super::{
    cache::QueryCache,
    quadtree::{Quadtree, QuadtreeConfig},
};
use crate::core::{
    bounds::{BoundingBox, BoundsLookup},
    tags::{SolidTag, TagSet},
};
use crate::utils::allocator::SolidId;

pub struct CollisionGroupManager {
    region: BoundingBox,
    config: QuadtreeConfig,
    trees: BTreeMap<SolidTag, Quadtree>,
    memberships: HashMap<SolidId, TagSet>,
    reset_queue: BTreeMap<SolidTag, Vec<SolidId>>,
    moving: Vec<SolidId>,
    cache: Option<QueryCache>,
    queries: usize,
}

impl CollisionGroupManager {
    pub fn new(region: BoundingBox, config: QuadtreeConfig, use_cache: bool) -> Self {
        Self {
            region,
            config,
            trees: BTreeMap::new(),
            memberships: HashMap::new(),
            reset_queue: BTreeMap::new(),
            moving: Vec::new(),
            cache: use_cache.then(QueryCache::new),
            queries: 0,
        }
    }

    pub fn region(&self) -> &BoundingBox {
        &self.region
    }

    /// Registers `id` in every group of `tags`, creating missing indexes.
    ///
    /// Returns `false` if the box could not be placed in some group because
    /// it lies outside the indexed region.
    pub fn add(&mut self, id: SolidId, bounds: &BoundingBox, tags: TagSet) -> bool {
        let (region, config) = (self.region, self.config);
        let mut placed_everywhere = true;
        for tag in tags.iter() {
            let tree = self
                .trees
                .entry(tag)
                .or_insert_with(|| Quadtree::new(region, config));
            if !tree.insert(id, bounds) && !tree.contains(id) {
                placed_everywhere = false;
            }
        }
        if !placed_everywhere {
            log::warn!(
                "solid {id} at {:?} lies outside the indexed region {:?}",
                bounds.min(),
                self.region
            );
        }
        let merged = self.tags_of(id).union(tags);
        self.memberships.insert(id, merged);
        self.clear_cache();
        placed_everywhere
    }

    /// Removes `id` from the groups in `tags`.
    pub fn remove(&mut self, id: SolidId, tags: TagSet) {
        for tag in tags.iter() {
            if let Some(tree) = self.trees.get_mut(&tag) {
                tree.remove(id);
            }
            if let Some(queue) = self.reset_queue.get_mut(&tag) {
                queue.retain(|queued| *queued != id);
            }
        }
        self.moving.retain(|moving| *moving != id);

        let remaining = self.tags_of(id).difference(tags);
        if remaining.is_empty() {
            self.memberships.remove(&id);
        } else {
            self.memberships.insert(id, remaining);
        }
        self.clear_cache();
    }

    /// Removes `id` from every group it belongs to.
    pub fn remove_from_all(&mut self, id: SolidId) {
        let tags = self.tags_of(id);
        self.remove(id, tags);
    }

    /// Groups `id` is currently registered in.
    pub fn tags_of(&self, id: SolidId) -> TagSet {
        self.memberships.get(&id).copied().unwrap_or_default()
    }

    /// Tags that have an index.
    pub fn tags(&self) -> TagSet {
        self.trees.keys().copied().collect()
    }

    pub fn tree(&self, tag: SolidTag) -> Option<&Quadtree> {
        self.trees.get(&tag)
    }

    /// Solids in groups `tags` overlapping `id`'s box, `id` excluded.
    ///
    /// Results are sorted by handle. Unregistered tags contribute nothing.
    pub fn query_collisions(
        &mut self,
        id: SolidId,
        bounds: &BoundingBox,
        tags: TagSet,
        lookup: &impl BoundsLookup,
    ) -> Vec<SolidId> {
        if let Some(cached) = self
            .cache
            .as_mut()
            .and_then(|cache| cache.get(id, bounds, tags))
        {
            return cached.to_vec();
        }

        let colliding = self.query_region(bounds, tags, Some(id), lookup);
        if let Some(cache) = self.cache.as_mut() {
            cache.store(id, *bounds, tags, colliding.clone());
        }
        colliding
    }

    /// Existence form of [`CollisionGroupManager::query_collisions`].
    pub fn collides(
        &mut self,
        id: SolidId,
        bounds: &BoundingBox,
        tags: TagSet,
        lookup: &impl BoundsLookup,
    ) -> bool {
        if self.cache.is_some() {
            return !self.query_collisions(id, bounds, tags, lookup).is_empty();
        }
        self.queries += 1;
        tags.iter()
            .filter_map(|tag| self.trees.get(&tag))
            .any(|tree| tree.any_overlap(bounds, Some(id), lookup))
            || self
                .pending_overlaps(bounds, tags, Some(id), lookup)
                .next()
                .is_some()
    }

    /// Solids in groups `tags` overlapping an arbitrary box.
    pub fn query_region(
        &mut self,
        bounds: &BoundingBox,
        tags: TagSet,
        exclude: Option<SolidId>,
        lookup: &impl BoundsLookup,
    ) -> Vec<SolidId> {
        self.queries += 1;
        self.snapshot_query(bounds, tags, exclude, lookup)
    }

    /// Read-only query that bypasses the cache and counters.
    pub fn snapshot_query(
        &self,
        bounds: &BoundingBox,
        tags: TagSet,
        exclude: Option<SolidId>,
        lookup: &impl BoundsLookup,
    ) -> Vec<SolidId> {
        let mut found: Vec<SolidId> = tags
            .iter()
            .filter_map(|tag| self.trees.get(&tag))
            .flat_map(|tree| tree.query(bounds, exclude, lookup))
            .collect();
        let indexed = found.len();
        found.extend(self.pending_overlaps(bounds, tags, exclude, lookup));
        if tags.len() > 1 || found.len() > indexed {
            found.sort_unstable();
            found.dedup();
        }
        found
    }

    /// Queues `id` for re-indexing in the groups of `tags` at the next flush.
    ///
    /// Cached results of other solids may list `id`, so the whole cache is
    /// dropped.
    pub fn enqueue_reset(&mut self, id: SolidId, tags: TagSet) {
        for tag in tags.iter() {
            self.reset_queue.entry(tag).or_default().push(id);
        }
        self.clear_cache();
    }

    /// Marks `id` as moving inside the current top-level move.
    ///
    /// It is tested against its live box by every query until
    /// [`CollisionGroupManager::end_moves`].
    pub fn begin_move(&mut self, id: SolidId) {
        if !self.moving.contains(&id) {
            self.moving.push(id);
        }
        self.clear_cache();
    }

    pub fn end_moves(&mut self) {
        self.moving.clear();
    }

    /// Queued or moving solids in groups `tags` whose live box overlaps `bounds`.
    fn pending_overlaps<'a, L: BoundsLookup>(
        &'a self,
        bounds: &'a BoundingBox,
        tags: TagSet,
        exclude: Option<SolidId>,
        lookup: &'a L,
    ) -> impl Iterator<Item = SolidId> + 'a {
        tags.iter()
            .filter_map(move |tag| self.reset_queue.get(&tag))
            .flatten()
            .chain(&self.moving)
            .copied()
            .filter(move |&id| Some(id) != exclude && self.tags_of(id).intersects(tags))
            .filter(move |&id| {
                lookup
                    .bounds_of(id)
                    .is_some_and(|live| live.overlaps(bounds))
            })
    }

    pub fn has_pending(&self) -> bool {
        self.reset_queue.values().any(|queue| !queue.is_empty())
    }

    /// Re-indexes every queued solid at its current box.
    ///
    /// Returns the number of re-insertions performed. Solids that no longer
    /// resolve through `lookup` are dropped from the queue.
    pub fn flush(&mut self, lookup: &impl BoundsLookup) -> usize {
        if !self.has_pending() {
            return 0;
        }

        let mut resets = 0;
        for (tag, queue) in self.reset_queue.iter_mut() {
            let Some(tree) = self.trees.get_mut(tag) else {
                queue.clear();
                continue;
            };
            queue.sort_unstable();
            queue.dedup();
            for id in queue.drain(..) {
                let member = self
                    .memberships
                    .get(&id)
                    .is_some_and(|tags| tags.contains(*tag));
                if !member {
                    continue;
                }
                if let Some(bounds) = lookup.bounds_of(id) {
                    if !tree.reset_object(id, &bounds) {
                        log::warn!("solid {id} left the indexed region of {tag}");
                    }
                    resets += 1;
                }
            }
        }
        self.clear_cache();
        log::debug!("flushed {resets} index resets");
        resets
    }

    /// Drops every index, pending reset, and cached result.
    pub fn clear(&mut self) {
        self.trees.clear();
        self.memberships.clear();
        self.reset_queue.clear();
        self.moving.clear();
        self.clear_cache();
    }

    pub fn cache(&self) -> Option<&QueryCache> {
        self.cache.as_ref()
    }

    /// Number of index queries issued since the counter was last taken.
    pub fn take_query_count(&mut self) -> usize {
        std::mem::take(&mut self.queries)
    }

    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::allocator::Arena;

    fn manager() -> CollisionGroupManager {
        CollisionGroupManager::new(
            BoundingBox::from_xywh(0.0, 0.0, 960.0, 540.0),
            QuadtreeConfig::default(),
            false,
        )
    }

    #[test]
    fn unregistered_tag_is_empty() {
        let mut boxes = Arena::new();
        let mut groups = manager();
        let a = boxes.insert(BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0));
        groups.add(a, &boxes.bounds_of(a).unwrap(), TagSet::single(SolidTag::DEFAULT));

        let other = TagSet::single(SolidTag::new(7).unwrap());
        let probe = BoundingBox::from_xywh(0.0, 0.0, 5.0, 5.0);
        assert!(groups.query_region(&probe, other, None, &boxes).is_empty());
        assert_eq!(groups.query_region(&probe, TagSet::ALL, None, &boxes), vec![a]);
    }

    #[test]
    fn removed_solid_leaves_reset_queue() {
        let mut boxes = Arena::new();
        let mut groups = manager();
        let tags = TagSet::single(SolidTag::DEFAULT);
        let a = boxes.insert(BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0));
        groups.add(a, &boxes.bounds_of(a).unwrap(), tags);
        groups.enqueue_reset(a, tags);
        groups.remove(a, tags);

        assert_eq!(groups.tags_of(a), TagSet::EMPTY);
        assert!(!groups.has_pending());
        assert_eq!(groups.flush(&boxes), 0);
        assert!(!groups.tree(SolidTag::DEFAULT).unwrap().contains(a));
    }
}
