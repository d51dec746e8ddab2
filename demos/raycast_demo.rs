use bonktrack::*;
use glam::Vec2;

struct Quiet;

impl CollisionListener for Quiet {
    fn begin_collision(&mut self, _collision: &Collision) {}
    fn end_collision(&mut self, _collision: &Collision) {}
}

fn main() -> Result<(), TrackerError> {
    env_logger::init();
    let mut tracker = CollisionTracker::new(TrackerConfig::default());
    tracker.set_listener(Box::new(Quiet));

    tracker.create_box(2.0, -0.5, 1.0, 1.0, false).set_user_data(10);
    tracker.create_circle(6.0, 0.0, 0.5, false).set_user_data(20);
    tracker.create_ray(4.0, -1.0, 4.0, 1.0).set_user_data(30);

    tracker.ray_cast(
        Vec2::ZERO,
        Vec2::new(10.0, 0.0),
        1,
        Box::new(|body: BodyHandle, point: Vec2, normal: Vec2, fraction: f32| {
            println!(
                "Ray hit {:?} at ({:.2},{:.2}) t={:.3} n=({:.2},{:.2})",
                body, point.x, point.y, fraction, normal.x, normal.y
            );
            true
        }),
    )?;
    tracker.update()?;

    if tracker.is_ray_cast_pending() {
        println!("No dispatch yet");
    }
    Ok(())
}
