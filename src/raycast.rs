//! Pending ray cast: hit collection across scan phases and nearest-first dispatch.

use glam::Vec2;

use crate::api::{NarrowphaseApi, RayCastCallback};
use crate::narrowphase::CollisionUtils;
use crate::pool::{Pool, Poolable};
use crate::types::*;

/// Scratch record of one hit.
#[derive(Copy, Clone, Debug)]
pub struct RayCastPoint {
    pub body: BodyHandle,
    pub point: Vec2,
    pub normal: Vec2,
    /// Distance from the cast origin.
    pub distance: f32,
    free: bool,
}

impl Poolable for RayCastPoint {
    fn new_obj() -> Self {
        Self {
            body: BodyHandle::new(ShapeKind::Aabb, 0),
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            distance: 0.0,
            free: true,
        }
    }

    fn is_free(&self) -> bool {
        self.free
    }

    fn release(&mut self) {
        self.free = true;
    }
}

pub(crate) struct RayCastState {
    /// Slot of the cast segment in the ray pool.
    pub ray: Option<usize>,
    callback: Option<Box<dyn RayCastCallback>>,
    points: Pool<RayCastPoint>,
    pub boxes_done: bool,
    pub rays_done: bool,
    pub circles_done: bool,
}

impl RayCastState {
    pub fn new(capacity: usize, grow_step: usize) -> Self {
        Self {
            ray: None,
            callback: None,
            points: Pool::with_capacity(capacity, grow_step),
            boxes_done: false,
            rays_done: false,
            circles_done: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.ray.is_some()
    }

    pub fn begin(&mut self, ray: usize, callback: Box<dyn RayCastCallback>) {
        self.ray = Some(ray);
        self.callback = Some(callback);
        self.boxes_done = false;
        self.rays_done = false;
        self.circles_done = false;
        self.points.clear();
    }

    /// Forget the cast. Returns the slot of its segment so the caller can release it.
    pub fn reset(&mut self) -> Option<usize> {
        self.callback = None;
        self.points.clear();
        self.boxes_done = false;
        self.rays_done = false;
        self.circles_done = false;
        self.ray.take()
    }

    pub fn ready(&self) -> bool {
        self.is_pending() && self.boxes_done && self.rays_done
    }

    pub fn collected(&self) -> usize {
        self.points.count_live()
    }

    fn push(&mut self, cast: &Ray, body: BodyHandle, point: Vec2, normal: Vec2) {
        // A corner lies on two edges; report it once.
        let dup = self.points.iter().any(|(_, p)| p.body == body && p.point == point);
        if dup {
            return;
        }
        let slot = self.points.next_free_extra();
        if let Some(p) = self.points.slot_mut(slot) {
            *p = RayCastPoint {
                body,
                point,
                normal,
                distance: cast.p1.distance(point),
                free: false,
            };
        }
    }

    /// Hits on the edges of `b` that face the cast.
    pub fn collect_box(&mut self, cast: &Ray, b: &Aabb) {
        if !cast.base.collides_with(&b.base) || !CollisionUtils::test_bounds(ShapeRef::Ray(cast), ShapeRef::Aabb(b)) {
            return;
        }
        for edge in b.edges() {
            if !CollisionUtils::test_ray_intersection(cast, &edge) {
                continue;
            }
            let Some(normal) = front_normal(cast, &edge) else {
                continue;
            };
            if let Some(point) = CollisionUtils::ray_intersection_point(cast, &edge) {
                self.push(cast, b.handle(), point, normal);
            }
        }
    }

    /// Crossing with another ray; the normal faces back toward the cast origin.
    pub fn collect_ray(&mut self, cast: &Ray, r: &Ray) {
        if !cast.base.collides_with(&r.base) || !CollisionUtils::test_ray_intersection(cast, r) {
            return;
        }
        let normal = match front_normal(cast, r) {
            Some(n) => n,
            None => -outward(r),
        };
        if let Some(point) = CollisionUtils::ray_intersection_point(cast, r) {
            self.push(cast, r.handle(), point, normal);
        }
    }

    /// Entry point into `c`; casts starting inside a circle do not hit it.
    pub fn collect_circle(&mut self, cast: &Ray, c: &Circle) {
        if !cast.base.collides_with(&c.base) {
            return;
        }
        let Some(t) = CollisionUtils::ray_circle_entry(cast, c) else {
            return;
        };
        let point = cast.p1 + (cast.p2 - cast.p1) * t;
        let normal = (point - c.pos).normalize_or_zero();
        self.push(cast, c.handle(), point, normal);
    }

    /// Deliver collected hits nearest first until the callback declines.
    /// Returns the number of callback invocations.
    pub fn dispatch(&mut self, cast: &Ray) -> usize {
        let mut hits: Vec<RayCastPoint> = self.points.iter().map(|(_, p)| *p).collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let len = cast.len();
        let mut calls = 0;
        if let Some(callback) = self.callback.as_mut() {
            for hit in &hits {
                let fraction = if len > 0.0 { hit.distance / len } else { 0.0 };
                calls += 1;
                if !callback.call(hit.body, hit.point, hit.normal, fraction) {
                    break;
                }
            }
        }
        log::debug!("ray cast dispatched {} of {} hits", calls, hits.len());
        calls
    }
}

/// Outward normal of an edge wound counter-clockwise: its heading turned clockwise.
fn outward(edge: &Ray) -> Vec2 {
    let h = edge.heading();
    Vec2::new(h.y, -h.x)
}

/// The edge's outward normal when the edge faces the cast, from the angle between them.
///
/// The cast's own heading runs from its far end back to its origin, so an edge
/// faces the cast exactly when the sine of the angle between them is negative.
fn front_normal(cast: &Ray, edge: &Ray) -> Option<Vec2> {
    let theta = CollisionUtils::angle_between_rays(cast, edge);
    (theta.sin() < 0.0).then(|| outward(edge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cast(x1: f32, y1: f32, x2: f32, y2: f32) -> Ray {
        let mut r = Ray::segment(Vec2::new(x1, y1), Vec2::new(x2, y2));
        r.base.filter = u32::MAX;
        r
    }

    fn bx(id: u32, x: f32, y: f32, w: f32, h: f32) -> Aabb {
        let mut b = Aabb::default();
        b.base.init(id);
        b.setup(x, y, w, h, 1, 0);
        b
    }

    type Hits = Rc<RefCell<Vec<(BodyHandle, Vec2, Vec2, f32)>>>;

    fn recorder(hits: &Hits, keep_going: bool) -> Box<dyn RayCastCallback> {
        let hits = hits.clone();
        Box::new(move |body: BodyHandle, point: Vec2, normal: Vec2, fraction: f32| {
            hits.borrow_mut().push((body, point, normal, fraction));
            keep_going
        })
    }

    #[test]
    fn test_box_hit_only_on_front_edge() {
        let c = cast(0.0, 0.0, 20.0, 0.0);
        let mut state = RayCastState::new(4, 5);
        state.collect_box(&c, &bx(0, 10.0, -1.0, 2.0, 2.0));
        assert_eq!(state.collected(), 1);
        let hits: Hits = Rc::default();
        state.begin(0, recorder(&hits, true));
        state.collect_box(&c, &bx(0, 10.0, -1.0, 2.0, 2.0));
        assert_eq!(state.dispatch(&c), 1);
        let (_, point, normal, fraction) = hits.borrow()[0];
        assert_abs_diff_eq!(point, Vec2::new(10.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(normal, Vec2::new(-1.0, 0.0), epsilon = 1e-6);
        assert_abs_diff_eq!(fraction, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_reverse_cast_hits_other_edge() {
        let c = cast(20.0, 0.0, 0.0, 0.0);
        let hits: Hits = Rc::default();
        let mut state = RayCastState::new(4, 5);
        state.begin(0, recorder(&hits, true));
        state.collect_box(&c, &bx(0, 10.0, -1.0, 2.0, 2.0));
        state.dispatch(&c);
        let (_, point, normal, fraction) = hits.borrow()[0];
        assert_abs_diff_eq!(point, Vec2::new(12.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(normal, Vec2::new(1.0, 0.0), epsilon = 1e-6);
        assert_abs_diff_eq!(fraction, 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_filtered_box_is_skipped() {
        let mut c = cast(0.0, 0.0, 20.0, 0.0);
        c.base.filter = 2;
        let mut state = RayCastState::new(4, 5);
        state.collect_box(&c, &bx(0, 10.0, -1.0, 2.0, 2.0));
        assert_eq!(state.collected(), 0);
    }

    #[test]
    fn test_dispatch_sorted_and_stops_early() {
        let c = cast(0.0, 0.5, 30.0, 0.5);
        let hits: Hits = Rc::default();
        let mut state = RayCastState::new(1, 5);
        state.begin(0, recorder(&hits, true));
        for (id, x) in [(0, 10.0), (1, 1.0), (2, 5.0)] {
            state.collect_box(&c, &bx(id, x, 0.0, 1.0, 1.0));
        }
        assert_eq!(state.dispatch(&c), 3);
        let ids: Vec<u32> = hits.borrow().iter().map(|h| h.0.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        let fractions: Vec<f32> = hits.borrow().iter().map(|h| h.3).collect();
        assert!(fractions.windows(2).all(|w| w[0] < w[1]));

        let hits: Hits = Rc::default();
        state.reset();
        state.begin(0, recorder(&hits, false));
        for (id, x) in [(0, 10.0), (1, 1.0), (2, 5.0)] {
            state.collect_box(&c, &bx(id, x, 0.0, 1.0, 1.0));
        }
        assert_eq!(state.dispatch(&c), 1);
        assert_eq!(hits.borrow()[0].0.id, 1);
    }

    #[test]
    fn test_ray_and_circle_hits() {
        let c = cast(0.0, 0.0, 10.0, 0.0);
        let mut target = Ray::segment(Vec2::new(4.0, -1.0), Vec2::new(4.0, 1.0));
        target.base.init(3);
        let mut circle = Circle::default();
        circle.base.init(0);
        circle.setup(8.0, 0.0, 1.0, 1, 0);

        let hits: Hits = Rc::default();
        let mut state = RayCastState::new(2, 5);
        state.begin(1, recorder(&hits, true));
        state.collect_ray(&c, &target);
        state.collect_circle(&c, &circle);
        assert_eq!(state.dispatch(&c), 2);
        let hits = hits.borrow();
        assert_eq!(hits[0].0, BodyHandle::new(ShapeKind::Ray, 3));
        assert_abs_diff_eq!(hits[0].2, Vec2::new(-1.0, 0.0), epsilon = 1e-6);
        assert_eq!(hits[1].0, BodyHandle::new(ShapeKind::Circle, 0));
        assert_abs_diff_eq!(hits[1].1, Vec2::new(7.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(hits[1].3, 0.7, epsilon = 1e-6);
    }

    #[test]
    fn test_reset_returns_slot() {
        let hits: Hits = Rc::default();
        let mut state = RayCastState::new(2, 5);
        state.begin(4, recorder(&hits, true));
        state.boxes_done = true;
        state.rays_done = true;
        assert!(state.ready());
        assert_eq!(state.reset(), Some(4));
        assert!(!state.is_pending());
        assert!(!state.ready());
    }
}
