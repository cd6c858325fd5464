use quadsolid::*;

fn tag(index: u8) -> SolidTag {
    SolidTag::new(index).unwrap()
}

fn solid(x: f32, y: f32, w: f32, h: f32) -> SolidBuilder {
    Solid::builder().position(x, y).size(w, h)
}

#[test]
fn test_every_overlapping_pair_is_reported() {
    let mut world = SolidWorld::new(WorldSettings::default().with_max_objects(2)).unwrap();
    let mut ids = Vec::new();
    for i in 0..120u32 {
        let x = ((i * 37) % 900) as f32;
        let y = ((i * 53) % 480) as f32;
        let group = if i % 3 == 0 {
            TagSet::single(tag(1)).with(tag(2))
        } else {
            TagSet::single(tag(1 + (i % 2) as u8))
        };
        let id = world
            .add_solid(solid(x, y, 24.0, 24.0).tags(group).build().unwrap())
            .unwrap();
        ids.push(id);
    }

    for &a in &ids {
        let colliding = world.colliding(a).unwrap();
        let (a_box, a_tags) = {
            let s = world.solid(a).unwrap();
            (s.bounds, s.collides_with)
        };
        for &b in &ids {
            if a == b {
                continue;
            }
            let s = world.solid(b).unwrap();
            if a_box.overlaps(&s.bounds) && a_tags.intersects(s.tags) {
                assert!(colliding.contains(&b), "{a} should see {b}");
            } else {
                assert!(!colliding.contains(&b), "{a} should not see {b}");
            }
        }
    }
}

#[test]
fn test_flush_is_idempotent() {
    let mut world = SolidWorld::default();
    let a = world.add_solid(solid(0.0, 0.0, 32.0, 32.0).build().unwrap()).unwrap();
    let b = world.add_solid(solid(200.0, 0.0, 32.0, 32.0).build().unwrap()).unwrap();

    world.move_to(b, 16.0, 0.0).unwrap();
    assert!(world.groups().has_pending());
    assert_eq!(world.flush(), 1);
    let first = world.colliding(a).unwrap();
    assert_eq!(first, vec![b]);

    assert_eq!(world.flush(), 0);
    assert_eq!(world.flush(), 0);
    assert_eq!(world.colliding(a).unwrap(), first);
    assert!(world.query_point(Vec2::new(220.0, 10.0), TagSet::ALL).is_empty());
}

#[test]
fn test_one_directional_groups() {
    let (players, enemies) = (tag(1), tag(2));
    let mut world = SolidWorld::default();
    let player = world
        .add_solid(
            solid(0.0, 0.0, 32.0, 32.0)
                .tags(players)
                .collides_with(enemies)
                .build()
                .unwrap(),
        )
        .unwrap();
    let enemy = world
        .add_solid(
            solid(10.0, 10.0, 32.0, 32.0)
                .tags(enemies)
                .collides_with(tag(3))
                .build()
                .unwrap(),
        )
        .unwrap();

    assert_eq!(world.colliding(player).unwrap(), vec![enemy]);
    assert!(world.colliding(enemy).unwrap().is_empty());
    assert!(world.collides(player).unwrap());
    assert!(!world.collides(enemy).unwrap());
}

#[test]
fn test_unregistered_tag_yields_nothing() {
    let mut world = SolidWorld::default();
    let a = world.add_solid(solid(0.0, 0.0, 32.0, 32.0).build().unwrap()).unwrap();
    world.add_solid(solid(8.0, 8.0, 32.0, 32.0).build().unwrap()).unwrap();

    assert_eq!(world.colliding_with_tags(a, tag(9)).unwrap(), Vec::new());
    assert!(!world.collides_with_tags(a, tag(9)).unwrap());
    assert!(world.groups().tree(tag(9)).is_none());
}

#[test]
fn test_tag_membership_changes() {
    let mut world = SolidWorld::default();
    let id = world
        .add_solid(
            solid(100.0, 100.0, 16.0, 16.0)
                .tags(TagSet::single(tag(1)).with(tag(2)))
                .build()
                .unwrap(),
        )
        .unwrap();
    let probe = BoundingBox::from_xywh(104.0, 104.0, 2.0, 2.0);

    world.remove_tags(id, tag(1)).unwrap();
    assert!(world.query_region(&probe, tag(1)).is_empty());
    assert_eq!(world.query_region(&probe, tag(2)), vec![id]);

    world.add_tags(id, tag(4)).unwrap();
    assert_eq!(world.query_region(&probe, tag(4)), vec![id]);
    assert_eq!(world.groups().tags_of(id), TagSet::single(tag(2)).with(tag(4)));

    world.remove_solid(id).unwrap();
    assert!(world.query_region(&probe, TagSet::ALL).is_empty());
}

#[test]
fn test_cache_serves_repeat_queries_until_something_moves() {
    let mut world = SolidWorld::new(WorldSettings::default().with_cache(true)).unwrap();
    let a = world.add_solid(solid(0.0, 0.0, 32.0, 32.0).build().unwrap()).unwrap();
    let b = world.add_solid(solid(16.0, 0.0, 32.0, 32.0).build().unwrap()).unwrap();

    assert_eq!(world.colliding(a).unwrap(), vec![b]);
    assert_eq!(world.colliding(a).unwrap(), vec![b]);
    assert_eq!(world.groups().cache().unwrap().stats(), (1, 1));

    world.move_to(b, 300.0, 300.0).unwrap();
    assert!(world.groups().cache().unwrap().is_empty());
    world.flush();
    assert!(world.colliding(a).unwrap().is_empty());
    assert_eq!(world.groups().cache().unwrap().stats(), (1, 2));
}

#[test]
fn test_colliding_pairs_snapshot() {
    let mut world = SolidWorld::default();
    let a = world.add_solid(solid(0.0, 0.0, 32.0, 32.0).build().unwrap()).unwrap();
    let b = world.add_solid(solid(20.0, 0.0, 32.0, 32.0).build().unwrap()).unwrap();
    world.add_solid(solid(400.0, 400.0, 32.0, 32.0).build().unwrap()).unwrap();

    assert_eq!(world.colliding_pairs(), vec![(a, b)]);
}

#[test]
fn test_world_from_partial_settings_document() {
    let settings: WorldSettings =
        serde_json::from_str(r#"{ "max_objects": 1, "default_precision": "highest" }"#).unwrap();
    assert_eq!(settings.region, RegionSettings::default());

    let world = SolidWorld::new(settings).unwrap();
    assert_eq!(world.settings().default_precision, Precision::Highest);
    assert!(SolidWorld::new(WorldSettings::default().with_max_objects(0)).is_err());
}
