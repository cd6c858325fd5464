use quadsolid::*;

fn crate_at(x: f32, pusher: bool) -> Result<Solid> {
    Solid::builder()
        .position(x, 0.0)
        .size(32.0, 32.0)
        .pusher(pusher)
        .precision(Precision::Highest)
        .build()
}

fn main() -> Result<()> {
    env_logger::init();

    let mut world = SolidWorld::default();
    let bulldozer = world.add_solid(crate_at(0.0, true)?)?;
    let first = world.add_solid(crate_at(32.0, true)?)?;
    let second = world.add_solid(crate_at(64.0, false)?)?;
    world.add_solid(
        Solid::builder()
            .position(200.0, 0.0)
            .size(16.0, 64.0)
            .with_static(true)
            .build()?,
    )?;

    for attempt in 0..12 {
        world.flush();
        let moved = world.move_by(bulldozer, 10.0, 0.0)?;
        println!(
            "push {attempt:>2}: moved={moved:<5} bulldozer={:?} first={:?} second={:?}",
            world.position(bulldozer),
            world.position(first),
            world.position(second)
        );
    }

    let profiler = world.profiler();
    println!(
        "{} pushes attempted, {} rolled back",
        profiler.pushes_attempted, profiler.pushes_rolled_back
    );
    Ok(())
}
