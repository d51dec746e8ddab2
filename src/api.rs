use glam::Vec2;

use crate::error::TrackerError;
use crate::types::*;

/// Receives pair events, synchronously, from inside `update()`.
pub trait CollisionListener {
    /// Two bodies started overlapping.
    fn begin_collision(&mut self, collision: &Collision);

    /// A previously reported pair stopped overlapping (or one side was destroyed).
    fn end_collision(&mut self, collision: &Collision);
}

/// Receives ray cast hits, nearest first. Return `false` to stop the cast.
pub trait RayCastCallback {
    /// `fraction` is the distance along the cast, 0 at the origin and 1 at the far end.
    fn call(&mut self, body: BodyHandle, point: Vec2, normal: Vec2, fraction: f32) -> bool;
}

impl<F> RayCastCallback for F
where
    F: FnMut(BodyHandle, Vec2, Vec2, f32) -> bool,
{
    fn call(&mut self, body: BodyHandle, point: Vec2, normal: Vec2, fraction: f32) -> bool {
        self(body, point, normal, fraction)
    }
}

/// How a debug outline should be drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DebugStyle {
    Rigid,
    Sensor,
    Ray,
    Cast,
}

/// Line-drawing primitive supplied by the host renderer.
pub trait DebugRenderer {
    fn line(&mut self, from: Vec2, to: Vec2, style: DebugStyle);
}

/// Public API contract for the frame-driven collision tracker.
pub trait CollisionTrackerApi {
    /// Construct a new tracker with the given configuration.
    fn new(cfg: TrackerConfig) -> Self
    where
        Self: Sized;

    /// Install the listener `update()` reports pair events to.
    fn set_listener(&mut self, listener: Box<dyn CollisionListener>);

    // --- Shape lifecycle ---------------------------------------------------

    /// Claim a box with its bottom-left corner at `(x, y)`.
    fn create_box(&mut self, x: f32, y: f32, w: f32, h: f32, sensor: bool) -> &mut Aabb;

    /// Claim a ray from `(x1, y1)` to `(x2, y2)`.
    fn create_ray(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Ray;

    /// Claim a circle centered at `(x, y)`.
    fn create_circle(&mut self, x: f32, y: f32, radius: f32, sensor: bool) -> &mut Circle;

    /// Return a body to its pool, ending every pair it takes part in.
    fn destroy(&mut self, body: BodyHandle) -> Result<(), TrackerError>;

    /// Release every body and pair record without emitting events.
    fn clear(&mut self);

    // --- Frame -------------------------------------------------------------

    /// Run one frame of pairwise tests, resolution, integration and ray cast collection.
    fn update(&mut self) -> Result<(), TrackerError>;

    /// Queue a cast from `from` to `to` against bodies whose mask is in `filter`.
    ///
    /// Hits are delivered by the first `update()` in which boxes exist. Until a
    /// box is created the cast stays pending, keeping any ray and circle hits
    /// already found; `cancel_ray_cast` drops it.
    fn ray_cast(
        &mut self,
        from: Vec2,
        to: Vec2,
        filter: u32,
        callback: Box<dyn RayCastCallback>,
    ) -> Result<BodyHandle, TrackerError>;

    /// Drop a pending cast without dispatching it. Returns false if none was pending.
    fn cancel_ray_cast(&mut self) -> bool;

    // --- Queries -----------------------------------------------------------

    fn body(&self, handle: BodyHandle) -> Option<ShapeRef<'_>>;

    /// Whether an active pair record exists for `{a, b}`.
    fn is_colliding(&self, a: BodyHandle, b: BodyHandle) -> bool;

    /// Informational count of live non-sensor bodies.
    fn rigid_bodies(&self) -> usize;

    /// True when no body of any kind is live.
    fn is_dormant(&self) -> bool;

    fn is_ray_cast_pending(&self) -> bool;

    fn stats(&self) -> TrackerStats;

    /// Outline every live body.
    fn draw_debug(&self, renderer: &mut dyn DebugRenderer);
}

/// Geometric predicates over the concrete shapes.
pub trait NarrowphaseApi {
    // Points ----------------------------------------------------------------

    fn is_point_in_box(p: Vec2, b: &Aabb) -> bool;
    fn is_point_on_ray(p: Vec2, r: &Ray) -> bool;
    fn is_point_in_circle(p: Vec2, c: &Circle) -> bool;

    // Pair tests ------------------------------------------------------------

    fn test_box_intersection(a: &Aabb, b: &Aabb) -> bool;
    fn test_box_ray_intersection(b: &Aabb, r: &Ray) -> bool;
    fn test_box_circle_intersection(b: &Aabb, c: &Circle) -> bool;
    fn test_ray_intersection(a: &Ray, b: &Ray) -> bool;
    fn test_ray_circle_intersection(r: &Ray, c: &Circle) -> bool;
    fn test_circle_intersection(a: &Circle, b: &Circle) -> bool;

    // Points, angles, normals -----------------------------------------------

    fn ray_intersection_point(a: &Ray, b: &Ray) -> Option<Vec2>;
    fn ray_circle_entry(r: &Ray, c: &Circle) -> Option<f32>;
    fn angle_between_rays(a: &Ray, b: &Ray) -> f32;
    fn box_intersection_normal(a: &Aabb, b: &Aabb) -> Vec2;
    fn box_ray_intersection_normal(b: &Aabb, r: &Ray) -> Vec2;
    fn circle_intersection_normal(a: &Circle, b: &Circle) -> Vec2;
    fn circle_box_intersection_normal(c: &Circle, b: &Aabb) -> Vec2;
}
