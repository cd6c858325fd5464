//! Quadtree spatial partitioning over bounding boxes.
//!
//! Nodes live in a flat arena and reference solids by handle. A solid that
//! spans several quadrants is registered in each of them, and the tree keeps
//! a reverse map from handle to nodes so removal never searches the tree.

use std::collections::HashMap;

use crate::config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_OBJECTS};
use crate::core::bounds::{BoundingBox, BoundsLookup};
use crate::utils::allocator::SolidId;

const ROOT: usize = 0;

/// Configuration for quadtree splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadtreeConfig {
    /// Direct members a node holds before it splits.
    pub max_objects: usize,

    /// Nodes at this depth keep accepting members instead of splitting.
    pub max_depth: u32,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            max_objects: DEFAULT_MAX_OBJECTS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone)]
struct QuadNode {
    region: BoundingBox,
    depth: u32,
    /// NW, NE, SW, SE.
    children: Option<[usize; 4]>,
    members: Vec<SolidId>,
}

impl QuadNode {
    fn new(region: BoundingBox, depth: u32) -> Self {
        Self {
            region,
            depth,
            children: None,
            members: Vec::new(),
        }
    }

    fn can_split(&self, config: &QuadtreeConfig) -> bool {
        if self.depth >= config.max_depth {
            return false;
        }
        let size = self.region.size();
        let half = (size * 0.5).round();
        half.x >= 1.0 && half.y >= 1.0 && (half.x < size.x || half.y < size.y)
    }
}

#[derive(Debug, Clone)]
pub struct Quadtree {
    nodes: Vec<QuadNode>,
    config: QuadtreeConfig,
    locations: HashMap<SolidId, Vec<usize>>,
}

impl Quadtree {
    pub fn new(region: BoundingBox, config: QuadtreeConfig) -> Self {
        Self {
            nodes: vec![QuadNode::new(region, 0)],
            config,
            locations: HashMap::new(),
        }
    }

    pub fn region(&self) -> &BoundingBox {
        &self.nodes[ROOT].region
    }

    pub fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Places `id` into every node its box reaches.
    ///
    /// Returns `false` when the box lies wholly outside the tree's region, or
    /// when `id` was already a direct member everywhere it would go.
    pub fn insert(&mut self, id: SolidId, bounds: &BoundingBox) -> bool {
        self.insert_at(ROOT, id, bounds)
    }

    fn insert_at(&mut self, node: usize, id: SolidId, bounds: &BoundingBox) -> bool {
        let (overlaps, already_member, has_room, can_split, children) = {
            let n = &self.nodes[node];
            (
                n.region.overlaps(bounds),
                n.members.contains(&id),
                n.members.len() < self.config.max_objects,
                n.can_split(&self.config),
                n.children,
            )
        };

        if !overlaps || already_member {
            return false;
        }

        if has_room || (children.is_none() && !can_split) {
            self.nodes[node].members.push(id);
            self.locations.entry(id).or_default().push(node);
            return true;
        }

        let children = match children {
            Some(children) => children,
            None => self.split(node),
        };

        let mut placed = false;
        for child in children {
            placed |= self.insert_at(child, id, bounds);
        }
        placed
    }

    fn split(&mut self, node: usize) -> [usize; 4] {
        let depth = self.nodes[node].depth + 1;
        let quadrants = self.nodes[node].region.quadrants();
        let first = self.nodes.len();
        self.nodes
            .extend(quadrants.into_iter().map(|region| QuadNode::new(region, depth)));
        let children = [first, first + 1, first + 2, first + 3];
        self.nodes[node].children = Some(children);
        log::debug!(
            "quadtree node {node} split at depth {} ({} nodes)",
            depth - 1,
            self.nodes.len()
        );
        children
    }

    /// Handles whose current box overlaps `query`, sorted and de-duplicated.
    ///
    /// Only nodes whose region overlaps `query` are visited; members found
    /// there are then tested against their current box from `lookup`.
    pub fn query(
        &self,
        query: &BoundingBox,
        exclude: Option<SolidId>,
        lookup: &impl BoundsLookup,
    ) -> Vec<SolidId> {
        let mut found = Vec::new();
        self.visit(query, exclude, lookup, |id| {
            found.push(id);
            true
        });
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Existence form of [`Quadtree::query`]; stops at the first hit.
    pub fn any_overlap(
        &self,
        query: &BoundingBox,
        exclude: Option<SolidId>,
        lookup: &impl BoundsLookup,
    ) -> bool {
        let mut hit = false;
        self.visit(query, exclude, lookup, |_| {
            hit = true;
            false
        });
        hit
    }

    fn visit<F>(
        &self,
        query: &BoundingBox,
        exclude: Option<SolidId>,
        lookup: &impl BoundsLookup,
        mut on_hit: F,
    ) where
        F: FnMut(SolidId) -> bool,
    {
        let mut stack = vec![ROOT];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.region.overlaps(query) {
                continue;
            }

            for &member in &node.members {
                if Some(member) == exclude {
                    continue;
                }
                let overlaps = lookup
                    .bounds_of(member)
                    .is_some_and(|bounds| bounds.overlaps(query));
                if overlaps && !on_hit(member) {
                    return;
                }
            }

            if let Some(children) = node.children {
                stack.extend(children.iter().rev());
            }
        }
    }

    /// Drops `id` from every node holding it.
    pub fn remove(&mut self, id: SolidId) -> bool {
        let Some(nodes) = self.locations.remove(&id) else {
            return false;
        };
        for node in nodes {
            let members = &mut self.nodes[node].members;
            if let Some(slot) = members.iter().position(|member| *member == id) {
                members.swap_remove(slot);
            }
        }
        true
    }

    /// Removes `id` wherever it is and inserts it again at `bounds`.
    pub fn reset_object(&mut self, id: SolidId, bounds: &BoundingBox) -> bool {
        self.remove(id);
        self.insert(id, bounds)
    }

    /// Drops every member and child node.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT];
        root.children = None;
        root.members.clear();
        self.locations.clear();
    }

    pub fn contains(&self, id: SolidId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Number of distinct solids indexed.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Number of nodes `id` is a direct member of.
    pub fn placements(&self, id: SolidId) -> usize {
        self.locations.get(&id).map_or(0, Vec::len)
    }

    /// Regions of every node, parents before children.
    pub fn regions(&self) -> impl Iterator<Item = &BoundingBox> + '_ {
        self.nodes.iter().map(|node| &node.region)
    }
}
