use bonktrack::*;

const BALL: u32 = 1;
const BRICK: u32 = 2;
const WALL: u32 = 4;

struct Printer;

impl CollisionListener for Printer {
    fn begin_collision(&mut self, c: &Collision) {
        println!(
            "begin: {:?} vs {:?} at ({:.2},{:.2}) n=({:.2},{:.2})",
            c.a, c.b, c.point.x, c.point.y, c.normal.x, c.normal.y
        );
    }

    fn end_collision(&mut self, c: &Collision) {
        println!("end:   {:?} vs {:?}", c.a, c.b);
    }
}

fn main() -> Result<(), TrackerError> {
    env_logger::init();
    let mut tracker = CollisionTracker::new(TrackerConfig { enable_timing: true, ..Default::default() });
    tracker.set_listener(Box::new(Printer));

    let ball = tracker
        .create_circle(-3.0, 0.0, 0.5, false)
        .set_mask(BALL, BRICK | WALL)
        .set_velocity(0.5, 0.0)
        .handle();
    let wall = tracker.create_box(4.0, -5.0, 1.0, 10.0, false).set_mask(WALL, 0).set_mass(0.0).handle();
    let brick = tracker.create_box(0.0, -1.0, 1.0, 2.0, true).set_mask(BRICK, 0).handle();
    println!("Inserted ball={:?} wall={:?} brick={:?}", ball, wall, brick);

    for frame in 0..20 {
        tracker.update()?;
        if let Some(t) = tracker.timing() {
            println!(
                "frame {}: update={:.3}ms (boxes={:.3}ms rays={:.3}ms circles={:.3}ms) events={}",
                frame, t.update_ms, t.boxes_ms, t.rays_ms, t.circles_ms, t.events_emitted
            );
        }
        if tracker.is_colliding(ball, brick) {
            tracker.destroy(brick)?;
            println!("brick broken");
        }
    }

    if let Some(c) = tracker.circle(ball.id) {
        println!("ball at ({:.2},{:.2}) vel=({:.2},{:.2})", c.pos.x, c.pos.y, c.vel.x, c.vel.y);
    }
    println!("{:?}", tracker.stats());
    Ok(())
}
