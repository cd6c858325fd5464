use quadsolid::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut engine = SolidEngine::new(WorldSettings::default().with_cache(true))?;

    let ground = Solid::builder()
        .position(0.0, 500.0)
        .size(960.0, 40.0)
        .with_static(true)
        .build()?;
    engine.add_solid(ground)?;

    let ledge = Solid::builder()
        .position(300.0, 420.0)
        .size(120.0, 16.0)
        .with_static(true)
        .build()?;
    engine.add_solid(ledge)?;

    let player = Solid::builder()
        .position(100.0, 100.0)
        .size(32.0, 48.0)
        .precision(Precision::High)
        .motion(
            Motion::new()
                .with_gravity(Gravity::default())
                .with_quick_turn_around(true),
        )
        .build()?;
    let player = engine.add_solid(player)?;

    for tick in 0..180 {
        if let Some(motion) = engine.world_mut().motion_mut(player) {
            motion.accelerate(Vec2::new(8.0, 0.0));
        }
        engine.step(1.0 / 60.0)?;

        if tick % 30 == 0 {
            if let Some(position) = engine.world().position(player) {
                println!("tick {tick:>3}: player at ({:.1}, {:.1})", position.x, position.y);
            }
        }
    }

    if let Some(solid) = engine.world().solid(player) {
        println!("final box: {:?}", solid.bounds.edges());
    }
    Ok(())
}
