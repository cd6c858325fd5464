use approx::assert_relative_eq;
use quadsolid::*;

const DT: f32 = 1.0 / 60.0;

fn floor(world: &mut SolidWorld) -> SolidId {
    world
        .add_solid(
            Solid::builder()
                .position(0.0, 100.0)
                .size(400.0, 20.0)
                .with_static(true)
                .build()
                .unwrap(),
        )
        .unwrap()
}

fn moving(world: &mut SolidWorld, x: f32, y: f32, motion: Motion) -> SolidId {
    world
        .add_solid(
            Solid::builder()
                .position(x, y)
                .size(16.0, 16.0)
                .motion(motion)
                .build()
                .unwrap(),
        )
        .unwrap()
}

fn velocity(world: &SolidWorld, id: SolidId) -> Vec2 {
    world.solid(id).unwrap().motion.unwrap().velocity
}

#[test]
fn test_gravity_settles_on_the_floor() {
    let mut world = SolidWorld::default();
    floor(&mut world);
    let faller = moving(
        &mut world,
        10.0,
        0.0,
        Motion::new().with_gravity(Gravity::default()),
    );

    for _ in 0..120 {
        world.step(DT).unwrap();
    }

    let bottom = world.bounds(faller).unwrap().bottom();
    assert!(bottom > 99.0 && bottom <= 100.0, "resting bottom {bottom}");
    assert_eq!(velocity(&world, faller).y, 0.0);
    assert!(!world.collides(faller).unwrap());

    let resting = world.position(faller);
    world.step(DT).unwrap();
    assert_eq!(world.position(faller), resting);
}

#[test]
fn test_gravity_accelerates_while_airborne() {
    let mut world = SolidWorld::default();
    let faller = moving(
        &mut world,
        10.0,
        0.0,
        Motion::new().with_gravity(Gravity::default()),
    );

    world.step(0.1).unwrap();
    assert_relative_eq!(velocity(&world, faller).y, 100.0);
    assert_relative_eq!(world.position(faller).unwrap().y, 10.0);

    world.step(0.1).unwrap();
    assert_relative_eq!(velocity(&world, faller).y, 200.0);
}

#[test]
fn test_blocked_axis_loses_velocity() {
    let mut world = SolidWorld::default();
    world
        .add_solid(
            Solid::builder()
                .position(20.0, 0.0)
                .size(16.0, 64.0)
                .with_static(true)
                .build()
                .unwrap(),
        )
        .unwrap();
    let mut motion = Motion::new();
    motion.velocity = Vec2::new(100.0, 50.0);
    let runner = moving(&mut world, 0.0, 0.0, motion);

    world.step(0.1).unwrap();
    assert_eq!(world.position(runner), Some(Vec2::new(4.0, 5.0)));
    assert_eq!(velocity(&world, runner).x, 0.0);
    assert_relative_eq!(velocity(&world, runner).y, 40.0);
}

#[test]
fn test_unaccelerated_motion_decays() {
    let mut world = SolidWorld::default();
    let mut motion = Motion::new();
    motion.velocity = Vec2::new(100.0, 0.0);
    let glider = moving(&mut world, 0.0, 0.0, motion);

    world.step(0.1).unwrap();
    assert_relative_eq!(world.position(glider).unwrap().x, 10.0);
    assert_relative_eq!(velocity(&world, glider).x, 90.0);

    world.motion_mut(glider).unwrap().accelerate(Vec2::new(5.0, 0.0));
    world.step(0.1).unwrap();
    assert_relative_eq!(velocity(&world, glider).x, 95.0);
}

#[test]
fn test_each_tick_flushes_the_previous_moves_once() {
    let mut world = SolidWorld::default();
    let mut motion = Motion::new();
    motion.velocity = Vec2::new(100.0, 0.0);
    moving(&mut world, 0.0, 0.0, motion);

    world.step(0.1).unwrap();
    assert_eq!(world.profiler().resets_flushed, 0);
    assert_eq!(world.profiler().moves_resolved, 1);
    assert!(world.groups().has_pending());

    world.step(0.1).unwrap();
    assert_eq!(world.profiler().resets_flushed, 1);
    assert_eq!(world.profiler().solid_count, 1);
}

#[test]
fn test_static_solids_ignore_their_motion() {
    let mut world = SolidWorld::default();
    let mut motion = Motion::new().with_gravity(Gravity::default());
    motion.velocity = Vec2::new(50.0, 0.0);
    let id = moving(&mut world, 10.0, 10.0, motion);
    world.set_static(id, true).unwrap();

    world.step(0.5).unwrap();
    assert_eq!(world.position(id), Some(Vec2::new(10.0, 10.0)));
}
