use quadsolid::collision::quadtree::{Quadtree, QuadtreeConfig};
use quadsolid::utils::allocator::Arena;
use quadsolid::*;

fn region() -> BoundingBox {
    BoundingBox::from_xywh(0.0, 0.0, 960.0, 540.0)
}

fn tree(max_objects: usize, max_depth: u32) -> Quadtree {
    Quadtree::new(
        region(),
        QuadtreeConfig {
            max_objects,
            max_depth,
        },
    )
}

/// Deterministic pseudo-random boxes inside the default region.
fn scatter(count: usize, seed: u64) -> Vec<BoundingBox> {
    let mut state = seed;
    let mut next = move |range: f32| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f32 / (1u64 << 31) as f32) * range
    };
    (0..count)
        .map(|_| {
            let x = next(900.0).floor();
            let y = next(480.0).floor();
            let w = 1.0 + next(40.0).floor();
            let h = 1.0 + next(40.0).floor();
            BoundingBox::from_xywh(x, y, w, h)
        })
        .collect()
}

fn brute_force(boxes: &Arena<BoundingBox>, query: &BoundingBox) -> Vec<SolidId> {
    let mut hits: Vec<SolidId> = boxes
        .iter()
        .filter(|(_, bounds)| bounds.overlaps(query))
        .map(|(id, _)| id)
        .collect();
    hits.sort_unstable();
    hits
}

#[test]
fn test_split_separates_neighbouring_boxes() {
    let mut boxes = Arena::new();
    let first = boxes.insert(BoundingBox::from_xywh(0.0, 0.0, 64.0, 64.0));
    let second = boxes.insert(BoundingBox::from_xywh(100.0, 0.0, 64.0, 64.0));

    let mut tree = tree(1, 12);
    for id in [first, second] {
        let bounds = boxes.bounds_of(id).unwrap();
        assert!(tree.insert(id, &bounds));
    }
    assert!(tree.node_count() > 1, "second insert should split the root");

    let at = |x: f32, y: f32| BoundingBox::point(Vec2::new(x, y));
    assert_eq!(tree.query(&at(10.0, 10.0), None, &boxes), vec![first]);
    assert_eq!(tree.query(&at(100.0, 10.0), None, &boxes), vec![second]);
    assert!(tree.query(&at(200.0, 10.0), None, &boxes).is_empty());
}

#[test]
fn test_touching_boxes_do_not_overlap() {
    let mut boxes = Arena::new();
    let left = boxes.insert(BoundingBox::from_xywh(0.0, 0.0, 64.0, 64.0));
    let mut tree = tree(4, 12);
    tree.insert(left, &boxes.bounds_of(left).unwrap());

    let touching = BoundingBox::from_xywh(64.0, 0.0, 10.0, 10.0);
    assert!(tree.query(&touching, None, &boxes).is_empty());
    let edge_point = BoundingBox::point(Vec2::new(64.0, 10.0));
    assert!(tree.query(&edge_point, None, &boxes).is_empty());
    let inner_point = BoundingBox::point(Vec2::new(63.5, 10.0));
    assert_eq!(tree.query(&inner_point, None, &boxes), vec![left]);
}

#[test]
fn test_queries_match_brute_force() {
    let mut boxes = Arena::new();
    let mut tree = tree(2, 12);
    for bounds in scatter(200, 7) {
        let id = boxes.insert(bounds);
        assert!(tree.insert(id, &bounds));
    }
    assert_eq!(tree.len(), 200);

    for query in scatter(60, 99) {
        assert_eq!(tree.query(&query, None, &boxes), brute_force(&boxes, &query));
    }
}

#[test]
fn test_query_outside_every_node_is_empty() {
    let mut boxes = Arena::new();
    let mut tree = tree(2, 12);
    for bounds in scatter(100, 3) {
        let id = boxes.insert(bounds);
        tree.insert(id, &bounds);
    }

    let outside = BoundingBox::from_xywh(1000.0, 600.0, 200.0, 200.0);
    assert!(tree.query(&outside, None, &boxes).is_empty());
    assert!(!tree.any_overlap(&outside, None, &boxes));
}

#[test]
fn test_reset_object_follows_moved_box() {
    let mut boxes = Arena::new();
    let mut tree = tree(1, 12);
    let ids: Vec<SolidId> = scatter(20, 11)
        .into_iter()
        .map(|bounds| {
            let id = boxes.insert(bounds);
            tree.insert(id, &bounds);
            id
        })
        .collect();

    let moved = ids[5];
    let old = boxes.bounds_of(moved).unwrap();
    // Scattered boxes never reach past (940, 520).
    let new = BoundingBox::from_xywh(945.0, 525.0, 8.0, 8.0);
    *boxes.get_mut(moved).unwrap() = new;
    assert!(tree.reset_object(moved, &new));

    assert!(tree.placements(moved) > 0);
    assert_eq!(tree.query(&new, None, &boxes), vec![moved]);
    assert!(!tree.query(&old, None, &boxes).contains(&moved));
    assert!(tree.query(&new, Some(moved), &boxes).is_empty());
}
