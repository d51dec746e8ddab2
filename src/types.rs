use glam::Vec2;

use std::f32::consts::{FRAC_PI_4, TAU};

/// User-defined opaque key carried on a body (e.g., pack your entity id).
pub type ColKey = u64;

/// A quarter of a half turn (45°), the split between "mostly horizontal" and
/// "mostly vertical" rays.
pub const CIRC_4: f32 = FRAC_PI_4;

/// True when any bit of `flag` is set in `bits`.
#[inline]
pub fn has_flag(bits: u32, flag: u32) -> bool {
    bits & flag != 0
}

/// Discriminates the three shape pools.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    Aabb,
    Ray,
    Circle,
}

/// Stable handle of a tracked body. `id` is the slot index inside the pool of `kind`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle {
    pub kind: ShapeKind,
    pub id: u32,
}

impl BodyHandle {
    pub fn new(kind: ShapeKind, id: u32) -> Self {
        Self { kind, id }
    }
}

/// Identity and filtering shared by every shape.
#[derive(Clone, Debug)]
pub struct Collideable {
    id: u32,
    free: bool,
    /// Layer bit this body belongs to.
    pub mask: u32,
    /// Layers this body wants to collide with.
    pub filter: u32,
    pub name: Option<String>,
    pub user_data: Option<ColKey>,
}

impl Default for Collideable {
    fn default() -> Self {
        Self {
            id: 0,
            free: true,
            mask: 1,
            filter: 0,
            name: None,
            user_data: None,
        }
    }
}

impl Collideable {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_free(&self) -> bool {
        self.free
    }

    /// Claim the slot.
    pub(crate) fn init(&mut self, id: u32) {
        self.id = id;
        self.free = false;
    }

    /// Return the slot to its pool.
    pub(crate) fn release(&mut self) {
        self.free = true;
        self.mask = 1;
        self.filter = 0;
        self.name = None;
        self.user_data = None;
    }

    /// One-directional pair rule: `self` may hit `other` iff `self.filter` has `other.mask`.
    pub fn collides_with(&self, other: &Collideable) -> bool {
        has_flag(self.filter, other.mask)
    }
}

/// Access to the common header of a concrete shape.
pub trait Body {
    const KIND: ShapeKind;

    fn base(&self) -> &Collideable;
    fn base_mut(&mut self) -> &mut Collideable;

    fn handle(&self) -> BodyHandle {
        BodyHandle::new(Self::KIND, self.base().id())
    }
}

/// Axis-aligned box anchored at its bottom-left corner.
#[derive(Clone, Debug, Default)]
pub struct Aabb {
    pub base: Collideable,
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// 0 means immovable.
    pub mass: f32,
    pub(crate) sensor: bool,
}

impl Body for Aabb {
    const KIND: ShapeKind = ShapeKind::Aabb;

    fn base(&self) -> &Collideable {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Collideable {
        &mut self.base
    }
}

impl Aabb {
    pub fn setup(&mut self, x: f32, y: f32, w: f32, h: f32, mask: u32, filter: u32) -> &mut Self {
        self.pos = Vec2::new(x, y);
        self.prev_pos = self.pos;
        self.size = Vec2::new(w, h);
        self.base.mask = mask;
        self.base.filter = filter;
        self
    }

    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.pos = Vec2::new(x, y);
        self
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) -> &mut Self {
        self.vel = Vec2::new(x, y);
        self
    }

    pub fn set_size(&mut self, w: f32, h: f32) -> &mut Self {
        self.size = Vec2::new(w, h);
        self
    }

    pub fn set_mass(&mut self, mass: f32) -> &mut Self {
        self.mass = mass;
        self
    }

    pub fn set_mask(&mut self, mask: u32, filter: u32) -> &mut Self {
        self.base.mask = mask;
        self.base.filter = filter;
        self
    }

    pub fn set_user_data(&mut self, key: ColKey) -> &mut Self {
        self.base.user_data = Some(key);
        self
    }

    pub fn is_sensor(&self) -> bool {
        self.sensor
    }

    pub fn x1(&self) -> f32 {
        self.pos.x
    }

    pub fn y1(&self) -> f32 {
        self.pos.y
    }

    pub fn x2(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn y2(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// The four edges wound counter-clockwise (bottom, right, top, left).
    /// Each edge's heading runs along the winding, so its outward normal is
    /// the heading rotated clockwise.
    pub fn edges(&self) -> [Ray; 4] {
        let (x1, y1, x2, y2) = (self.x1(), self.y1(), self.x2(), self.y2());
        let bl = Vec2::new(x1, y1);
        let br = Vec2::new(x2, y1);
        let tr = Vec2::new(x2, y2);
        let tl = Vec2::new(x1, y2);
        // heading is p2 -> p1
        [
            Ray::segment(br, bl),
            Ray::segment(tr, br),
            Ray::segment(tl, tr),
            Ray::segment(bl, tl),
        ]
    }

    fn release(&mut self) {
        self.base.release();
        self.pos = Vec2::ZERO;
        self.prev_pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.size = Vec2::ZERO;
        self.mass = 0.0;
        self.sensor = false;
    }
}

/// Line segment between `p1` and `p2`.
#[derive(Clone, Debug, Default)]
pub struct Ray {
    pub base: Collideable,
    pub p1: Vec2,
    pub p2: Vec2,
    pub(crate) cast: bool,
}

impl Body for Ray {
    const KIND: ShapeKind = ShapeKind::Ray;

    fn base(&self) -> &Collideable {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Collideable {
        &mut self.base
    }
}

impl Ray {
    /// Bare segment, not owned by any pool.
    pub fn segment(p1: Vec2, p2: Vec2) -> Self {
        Self {
            p1,
            p2,
            ..Default::default()
        }
    }

    pub fn setup(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, mask: u32, filter: u32) -> &mut Self {
        self.p1 = Vec2::new(x1, y1);
        self.p2 = Vec2::new(x2, y2);
        self.base.mask = mask;
        self.base.filter = filter;
        self
    }

    pub fn set_points(&mut self, p1: Vec2, p2: Vec2) -> &mut Self {
        self.p1 = p1;
        self.p2 = p2;
        self
    }

    pub fn set_mask(&mut self, mask: u32, filter: u32) -> &mut Self {
        self.base.mask = mask;
        self.base.filter = filter;
        self
    }

    pub fn set_user_data(&mut self, key: ColKey) -> &mut Self {
        self.base.user_data = Some(key);
        self
    }

    /// Whether this ray is the segment of a pending ray cast.
    pub fn is_cast(&self) -> bool {
        self.cast
    }

    pub fn x1(&self) -> f32 {
        self.p1.x.min(self.p2.x)
    }

    pub fn y1(&self) -> f32 {
        self.p1.y.min(self.p2.y)
    }

    pub fn x2(&self) -> f32 {
        self.p1.x.max(self.p2.x)
    }

    pub fn y2(&self) -> f32 {
        self.p1.y.max(self.p2.y)
    }

    pub fn len(&self) -> f32 {
        self.p1.distance(self.p2)
    }

    pub fn is_empty(&self) -> bool {
        self.p1 == self.p2
    }

    /// Direction of the segment from `p2` to `p1` (not normalized).
    pub fn delta(&self) -> Vec2 {
        self.p1 - self.p2
    }

    /// Unit heading from `p2` to `p1`, zero for a degenerate ray.
    pub fn heading(&self) -> Vec2 {
        self.delta().normalize_or_zero()
    }

    /// Absolute angle of the segment from `p2` to `p1`, in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        let d = self.delta();
        let a = d.y.atan2(d.x);
        if a < 0.0 { a + TAU } else { a }
    }

    fn release(&mut self) {
        self.base.release();
        self.p1 = Vec2::ZERO;
        self.p2 = Vec2::ZERO;
        self.cast = false;
    }
}

/// Circle around `pos`.
#[derive(Clone, Debug, Default)]
pub struct Circle {
    pub base: Collideable,
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub(crate) sensor: bool,
}

impl Body for Circle {
    const KIND: ShapeKind = ShapeKind::Circle;

    fn base(&self) -> &Collideable {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Collideable {
        &mut self.base
    }
}

impl Circle {
    pub fn setup(&mut self, x: f32, y: f32, radius: f32, mask: u32, filter: u32) -> &mut Self {
        self.pos = Vec2::new(x, y);
        self.prev_pos = self.pos;
        self.radius = radius;
        self.base.mask = mask;
        self.base.filter = filter;
        self
    }

    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.pos = Vec2::new(x, y);
        self
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) -> &mut Self {
        self.vel = Vec2::new(x, y);
        self
    }

    pub fn set_radius(&mut self, radius: f32) -> &mut Self {
        self.radius = radius;
        self
    }

    pub fn set_mass(&mut self, mass: f32) -> &mut Self {
        self.mass = mass;
        self
    }

    pub fn set_mask(&mut self, mask: u32, filter: u32) -> &mut Self {
        self.base.mask = mask;
        self.base.filter = filter;
        self
    }

    pub fn set_user_data(&mut self, key: ColKey) -> &mut Self {
        self.base.user_data = Some(key);
        self
    }

    pub fn is_sensor(&self) -> bool {
        self.sensor
    }

    pub fn x1(&self) -> f32 {
        self.pos.x - self.radius
    }

    pub fn y1(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn x2(&self) -> f32 {
        self.pos.x + self.radius
    }

    pub fn y2(&self) -> f32 {
        self.pos.y + self.radius
    }

    fn release(&mut self) {
        self.base.release();
        self.pos = Vec2::ZERO;
        self.prev_pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.radius = 0.0;
        self.mass = 0.0;
        self.sensor = false;
    }
}

macro_rules! impl_poolable_body {
    ($($ty:ty),*) => {$(
        impl crate::pool::Poolable for $ty {
            fn new_obj() -> Self {
                Self::default()
            }

            fn setup(&mut self, index: usize) {
                self.base.id = index as u32;
            }

            fn is_free(&self) -> bool {
                self.base.is_free()
            }

            fn release(&mut self) {
                <$ty>::release(self);
            }
        }
    )*};
}

impl_poolable_body!(Aabb, Ray, Circle);

/// Borrowed view over any tracked shape; the key of the predicate table.
#[derive(Copy, Clone, Debug)]
pub enum ShapeRef<'a> {
    Aabb(&'a Aabb),
    Ray(&'a Ray),
    Circle(&'a Circle),
}

impl<'a> ShapeRef<'a> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeRef::Aabb(_) => ShapeKind::Aabb,
            ShapeRef::Ray(_) => ShapeKind::Ray,
            ShapeRef::Circle(_) => ShapeKind::Circle,
        }
    }

    pub fn base(&self) -> &'a Collideable {
        match *self {
            ShapeRef::Aabb(b) => &b.base,
            ShapeRef::Ray(r) => &r.base,
            ShapeRef::Circle(c) => &c.base,
        }
    }

    pub fn handle(&self) -> BodyHandle {
        BodyHandle::new(self.kind(), self.base().id())
    }

    /// (min, max) corners of the shape's bounds.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match *self {
            ShapeRef::Aabb(b) => (Vec2::new(b.x1(), b.y1()), Vec2::new(b.x2(), b.y2())),
            ShapeRef::Ray(r) => (Vec2::new(r.x1(), r.y1()), Vec2::new(r.x2(), r.y2())),
            ShapeRef::Circle(c) => (Vec2::new(c.x1(), c.y1()), Vec2::new(c.x2(), c.y2())),
        }
    }

    pub fn is_sensor(&self) -> bool {
        match *self {
            ShapeRef::Aabb(b) => b.sensor,
            ShapeRef::Ray(_) => true,
            ShapeRef::Circle(c) => c.sensor,
        }
    }
}

/// Contact data for an overlapping pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    /// Representative contact point.
    pub point: Vec2,
    /// Penetration vector that would move the first body out of the second (may be zero).
    pub normal: Vec2,
}

/// Active pair record handed to the listener.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collision {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// Representative contact point.
    pub point: Vec2,
    /// Penetration vector that would move `a` out of `b` (may be zero).
    pub normal: Vec2,
}

impl Collision {
    /// True if this record is about `{a, b}` in either order.
    pub fn involves(&self, a: BodyHandle, b: BodyHandle) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }

    /// The participant that is not `me`, if `me` takes part at all.
    pub fn other(&self, me: BodyHandle) -> Option<BodyHandle> {
        if self.a == me {
            Some(self.b)
        } else if self.b == me {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Tracker-level configuration.
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Slots allocated up front in every shape pool.
    pub initial_capacity: usize,
    /// Slots added whenever a pool runs out.
    pub grow_step: usize,
    /// Slots allocated up front for pair records.
    pub pair_capacity: usize,
    /// Segments used to outline circles in `draw_debug`.
    pub debug_circle_segments: u32,
    /// Enable internal timing instrumentation (adds small overhead when true).
    pub enable_timing: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 10,
            grow_step: 5,
            pair_capacity: 10,
            debug_circle_segments: 16,
            enable_timing: false,
        }
    }
}

/// Snapshot of the tracker's bookkeeping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub boxes: usize,
    pub rays: usize,
    pub circles: usize,
    pub rigid_bodies: usize,
    pub active_pairs: usize,
    pub cast_pending: bool,
}

/// Timing breakdown for the last completed `update()`.
#[derive(Copy, Clone, Debug, Default)]
pub struct UpdateTiming {
    pub update_ms: f64,
    pub boxes_ms: f64,
    pub rays_ms: f64,
    pub circles_ms: f64,
    pub dispatch_ms: f64,

    pub events_emitted: usize,
    pub cast_points_dispatched: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_box_bounds_and_center() {
        let mut b = Aabb::default();
        b.setup(2.0, 3.0, 4.0, 6.0, 1, 1);
        assert_eq!((b.x1(), b.y1(), b.x2(), b.y2()), (2.0, 3.0, 6.0, 9.0));
        assert_eq!(b.center(), Vec2::new(4.0, 6.0));
        assert_eq!(b.center_x(), 4.0);
        assert_eq!(b.center_y(), 6.0);
    }

    #[test]
    fn test_ray_bounds_ignore_direction() {
        let mut r = Ray::default();
        r.setup(5.0, -1.0, -3.0, 4.0, 1, 1);
        assert_eq!((r.x1(), r.y1(), r.x2(), r.y2()), (-3.0, -1.0, 5.0, 4.0));
    }

    #[test]
    fn test_ray_angle_runs_from_p2_to_p1() {
        let r = Ray::segment(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_abs_diff_eq!(r.angle(), PI, epsilon = 1e-6);
        let r = Ray::segment(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0));
        assert_abs_diff_eq!(r.angle(), 3.0 * FRAC_PI_2, epsilon = 1e-6);
        let r = Ray::segment(Vec2::new(1.0, 1.0), Vec2::ZERO);
        assert_abs_diff_eq!(r.angle(), CIRC_4, epsilon = 1e-6);
    }

    #[test]
    fn test_box_edges_wind_counter_clockwise() {
        let mut b = Aabb::default();
        b.setup(0.0, 0.0, 2.0, 2.0, 1, 1);
        let outward: Vec<Vec2> = b
            .edges()
            .iter()
            .map(|e| {
                let h = e.heading();
                Vec2::new(h.y, -h.x)
            })
            .collect();
        assert_eq!(
            outward,
            vec![Vec2::new(0.0, -1.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0)]
        );
    }

    #[test]
    fn test_filter_is_one_directional() {
        let mut a = Collideable::default();
        let mut b = Collideable::default();
        a.mask = 1;
        a.filter = 2;
        b.mask = 2;
        b.filter = 0;
        assert!(a.collides_with(&b));
        assert!(!b.collides_with(&a));
    }

    #[test]
    fn test_release_clears_user_data() {
        let mut c = Circle::default();
        c.base.init(3);
        c.setup(1.0, 1.0, 2.0, 4, 4).set_user_data(99);
        assert!(!c.base.is_free());
        crate::pool::Poolable::release(&mut c);
        assert!(c.base.is_free());
        assert_eq!(c.base.user_data, None);
        assert_eq!(c.base.id(), 3);
    }

    #[test]
    fn test_collision_matches_either_order() {
        let a = BodyHandle::new(ShapeKind::Aabb, 0);
        let b = BodyHandle::new(ShapeKind::Ray, 0);
        let c = Collision { a, b, point: Vec2::ZERO, normal: Vec2::ZERO };
        assert!(c.involves(a, b));
        assert!(c.involves(b, a));
        assert_eq!(c.other(a), Some(b));
        assert_eq!(c.other(BodyHandle::new(ShapeKind::Circle, 0)), None);
    }
}
