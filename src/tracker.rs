use glam::Vec2;

use std::time::Instant;

use crate::api::{CollisionListener, CollisionTrackerApi, DebugRenderer, RayCastCallback};
use crate::debug;
use crate::error::TrackerError;
use crate::narrowphase::CollisionUtils;
use crate::pairs::PairBook;
use crate::pool::Pool;
use crate::raycast::RayCastState;
use crate::types::*;

/// Frame-driven collision tracker over pooled boxes, rays and circles.
pub struct CollisionTracker {
    pub cfg: TrackerConfig,
    pub frame_counter: u64,

    boxes: Pool<Aabb>,
    rays: Pool<Ray>,
    circles: Pool<Circle>,
    pairs: PairBook,
    cast: RayCastState,
    listener: Option<Box<dyn CollisionListener>>,

    rigid_bodies: usize,
    boxes_dormant: bool,
    rays_dormant: bool,
    circles_dormant: bool,

    // Timing for the last update (optional)
    last_timing: Option<UpdateTiming>,
}

impl CollisionTrackerApi for CollisionTracker {
    fn new(cfg: TrackerConfig) -> Self {
        Self {
            boxes: Pool::with_capacity(cfg.initial_capacity, cfg.grow_step),
            rays: Pool::with_capacity(cfg.initial_capacity, cfg.grow_step),
            circles: Pool::with_capacity(cfg.initial_capacity, cfg.grow_step),
            pairs: PairBook::new(cfg.pair_capacity, cfg.grow_step),
            cast: RayCastState::new(cfg.initial_capacity, cfg.grow_step),
            listener: None,
            rigid_bodies: 0,
            boxes_dormant: true,
            rays_dormant: true,
            circles_dormant: true,
            last_timing: None,
            frame_counter: 0,
            cfg,
        }
    }

    fn set_listener(&mut self, listener: Box<dyn CollisionListener>) {
        self.listener = Some(listener);
    }

    fn create_box(&mut self, x: f32, y: f32, w: f32, h: f32, sensor: bool) -> &mut Aabb {
        if !sensor {
            self.rigid_bodies += 1;
        }
        self.boxes_dormant = false;
        let (slot, b) = self.boxes.next_free_extra_mut();
        b.base.init(slot as u32);
        b.setup(x, y, w, h, 1, 0).set_velocity(0.0, 0.0).set_mass(1.0);
        b.sensor = sensor;
        log::debug!("created box {} at ({}, {}) size {}x{}", slot, x, y, w, h);
        b
    }

    fn create_ray(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Ray {
        self.rays_dormant = false;
        let (slot, r) = self.rays.next_free_extra_mut();
        r.base.init(slot as u32);
        r.setup(x1, y1, x2, y2, 1, 0);
        log::debug!("created ray {} ({}, {}) -> ({}, {})", slot, x1, y1, x2, y2);
        r
    }

    fn create_circle(&mut self, x: f32, y: f32, radius: f32, sensor: bool) -> &mut Circle {
        if !sensor {
            self.rigid_bodies += 1;
        }
        self.circles_dormant = false;
        let (slot, c) = self.circles.next_free_extra_mut();
        c.base.init(slot as u32);
        c.setup(x, y, radius, 1, 0).set_velocity(0.0, 0.0).set_mass(1.0);
        c.sensor = sensor;
        log::debug!("created circle {} at ({}, {}) r {}", slot, x, y, radius);
        c
    }

    fn destroy(&mut self, body: BodyHandle) -> Result<(), TrackerError> {
        let idx = body.id as usize;
        let rigid = match body.kind {
            ShapeKind::Aabb => self.boxes.get(idx).map(|b| !b.sensor),
            ShapeKind::Ray => self.rays.get(idx).filter(|r| !r.cast).map(|_| false),
            ShapeKind::Circle => self.circles.get(idx).map(|c| !c.sensor),
        };
        let Some(rigid) = rigid else {
            log::warn!("destroy of unknown body {:?}", body);
            return Err(TrackerError::UnknownBody(body));
        };

        let ended = match self.listener.as_mut() {
            Some(listener) => {
                let listener: &mut dyn CollisionListener = listener.as_mut();
                self.pairs.end_all(body, Some(listener))
            }
            None => self.pairs.end_all(body, None),
        };
        match body.kind {
            ShapeKind::Aabb => self.boxes.release(idx),
            ShapeKind::Ray => self.rays.release(idx),
            ShapeKind::Circle => self.circles.release(idx),
        };
        if rigid {
            self.rigid_bodies = self.rigid_bodies.saturating_sub(1);
        }
        self.refresh_dormancy();
        log::debug!("destroyed {:?}, ended {} pairs", body, ended);
        Ok(())
    }

    fn clear(&mut self) {
        self.finish_cast();
        self.boxes.clear();
        self.rays.clear();
        self.circles.clear();
        self.pairs.clear();
        self.rigid_bodies = 0;
        self.refresh_dormancy();
        log::debug!("tracker cleared");
    }

    fn update(&mut self) -> Result<(), TrackerError> {
        let mut listener = self.listener.take().ok_or(TrackerError::MissingListener)?;
        self.step(&mut *listener);
        self.listener = Some(listener);
        Ok(())
    }

    fn ray_cast(
        &mut self,
        from: Vec2,
        to: Vec2,
        filter: u32,
        callback: Box<dyn RayCastCallback>,
    ) -> Result<BodyHandle, TrackerError> {
        if self.cast.is_pending() {
            return Err(TrackerError::CastPending);
        }
        self.rays_dormant = false;
        let (slot, r) = self.rays.next_free_extra_mut();
        r.base.init(slot as u32);
        r.setup(from.x, from.y, to.x, to.y, 0, filter);
        r.cast = true;
        let handle = r.handle();
        self.cast.begin(slot, callback);
        log::debug!("ray cast {:?} -> {:?} filter {:#x} on ray {}", from, to, filter, slot);
        Ok(handle)
    }

    fn cancel_ray_cast(&mut self) -> bool {
        if !self.cast.is_pending() {
            return false;
        }
        self.finish_cast();
        log::debug!("ray cast cancelled");
        true
    }

    fn body(&self, handle: BodyHandle) -> Option<ShapeRef<'_>> {
        let idx = handle.id as usize;
        match handle.kind {
            ShapeKind::Aabb => self.boxes.get(idx).map(ShapeRef::Aabb),
            ShapeKind::Ray => self.rays.get(idx).map(ShapeRef::Ray),
            ShapeKind::Circle => self.circles.get(idx).map(ShapeRef::Circle),
        }
    }

    fn is_colliding(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.pairs.get(a, b).is_some()
    }

    fn rigid_bodies(&self) -> usize {
        self.rigid_bodies
    }

    fn is_dormant(&self) -> bool {
        self.boxes_dormant && self.rays_dormant && self.circles_dormant
    }

    fn is_ray_cast_pending(&self) -> bool {
        self.cast.is_pending()
    }

    fn stats(&self) -> TrackerStats {
        TrackerStats {
            boxes: self.boxes.count_live(),
            rays: self.rays.iter().filter(|(_, r)| !r.cast).count(),
            circles: self.circles.count_live(),
            rigid_bodies: self.rigid_bodies,
            active_pairs: self.pairs.len(),
            cast_pending: self.cast.is_pending(),
        }
    }

    fn draw_debug(&self, renderer: &mut dyn DebugRenderer) {
        for (_, b) in self.boxes.iter() {
            debug::outline_box(renderer, b);
        }
        for (_, r) in self.rays.iter() {
            debug::outline_ray(renderer, r);
        }
        for (_, c) in self.circles.iter() {
            debug::outline_circle(renderer, c, self.cfg.debug_circle_segments);
        }
    }
}

impl CollisionTracker {
    pub fn aabb(&self, id: u32) -> Option<&Aabb> {
        self.boxes.get(id as usize)
    }

    pub fn aabb_mut(&mut self, id: u32) -> Option<&mut Aabb> {
        self.boxes.get_mut(id as usize)
    }

    pub fn ray(&self, id: u32) -> Option<&Ray> {
        self.rays.get(id as usize)
    }

    /// The segment of a pending cast is not handed out.
    pub fn ray_mut(&mut self, id: u32) -> Option<&mut Ray> {
        self.rays.get_mut(id as usize).filter(|r| !r.cast)
    }

    pub fn circle(&self, id: u32) -> Option<&Circle> {
        self.circles.get(id as usize)
    }

    pub fn circle_mut(&mut self, id: u32) -> Option<&mut Circle> {
        self.circles.get_mut(id as usize)
    }

    /// Active pair records.
    pub fn collisions(&self) -> impl Iterator<Item = &Collision> {
        self.pairs.iter()
    }

    /// Return timing breakdown for the last `update`.
    pub fn timing(&self) -> Option<UpdateTiming> {
        self.last_timing
    }

    fn refresh_dormancy(&mut self) {
        self.boxes_dormant = self.boxes.is_dormant();
        self.rays_dormant = self.rays.is_dormant();
        self.circles_dormant = self.circles.is_dormant();
    }

    fn step(&mut self, listener: &mut dyn CollisionListener) {
        self.frame_counter = self.frame_counter.wrapping_add(1);
        if self.is_dormant() {
            return;
        }
        let t_all = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        let mut timing = UpdateTiming::default();

        let t0 = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        timing.events_emitted += self.update_boxes(listener);
        timing.boxes_ms = elapsed_ms(t0);

        let t1 = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        timing.events_emitted += self.update_rays(listener);
        timing.rays_ms = elapsed_ms(t1);

        let t2 = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        timing.events_emitted += self.update_circles(listener);
        timing.circles_ms = elapsed_ms(t2);

        if self.cast.ready() {
            let t3 = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
            timing.cast_points_dispatched = self.dispatch_cast();
            timing.dispatch_ms = elapsed_ms(t3);
        } else if self.cast.is_pending() {
            log::debug!("ray cast waiting on boxes, {} hits so far", self.cast.collected());
        }

        if let Some(t_all) = t_all {
            timing.update_ms = t_all.elapsed().as_secs_f64() * 1000.0;
            self.last_timing = Some(timing);
        }
    }

    /// Box pairs with response, integration, then box-ray and box-circle
    /// bookkeeping and cast collection.
    fn update_boxes(&mut self, listener: &mut dyn CollisionListener) -> usize {
        if self.boxes_dormant {
            return 0;
        }
        let Self { boxes, rays, circles, pairs, cast, .. } = self;
        let cast_ray = if cast.boxes_done { None } else { cast.ray.and_then(|s| rays.slot(s)) };
        let mut events = 0;

        for i in 0..boxes.capacity() {
            if !boxes.is_live(i) {
                continue;
            }
            for j in 0..boxes.capacity() {
                if i == j || !boxes.is_live(j) {
                    continue;
                }
                let (a, b) = boxes.pair_mut(i, j);
                let contact = check(ShapeRef::Aabb(a), ShapeRef::Aabb(b));
                events += pairs.track(a.handle(), b.handle(), contact, listener);
                if let Some(contact) = contact {
                    if !a.sensor && !b.sensor {
                        resolve(&mut a.pos, &mut a.vel, a.mass, b.vel, b.mass, contact.normal);
                    }
                }
            }

            let Some(a) = boxes.get_mut(i) else {
                continue;
            };
            for (_, c) in circles.iter() {
                let contact = check(ShapeRef::Aabb(a), ShapeRef::Circle(c));
                events += pairs.track(a.handle(), c.handle(), contact, listener);
                if let Some(contact) = contact {
                    if !a.sensor && !c.sensor {
                        resolve(&mut a.pos, &mut a.vel, a.mass, c.vel, c.mass, contact.normal);
                    }
                }
            }

            a.prev_pos = a.pos;
            a.pos += a.vel;

            for (_, r) in rays.iter() {
                if r.cast {
                    continue;
                }
                let contact = check(ShapeRef::Aabb(a), ShapeRef::Ray(r));
                events += pairs.track(a.handle(), r.handle(), contact, listener);
            }

            if let Some(ray) = cast_ray {
                cast.collect_box(ray, a);
            }
        }

        if cast_ray.is_some() {
            cast.boxes_done = true;
        }
        events
    }

    fn update_rays(&mut self, listener: &mut dyn CollisionListener) -> usize {
        if self.rays_dormant {
            return 0;
        }
        let Self { rays, pairs, cast, .. } = self;
        let cast_ray = if cast.rays_done { None } else { cast.ray.and_then(|s| rays.slot(s)) };
        let mut events = 0;

        for (i, a) in rays.iter() {
            if a.cast {
                continue;
            }
            for (j, b) in rays.iter() {
                if i == j || b.cast {
                    continue;
                }
                let contact = check(ShapeRef::Ray(a), ShapeRef::Ray(b));
                events += pairs.track(a.handle(), b.handle(), contact, listener);
            }
            if let Some(ray) = cast_ray {
                cast.collect_ray(ray, a);
            }
        }

        if cast_ray.is_some() {
            cast.rays_done = true;
        }
        events
    }

    fn update_circles(&mut self, listener: &mut dyn CollisionListener) -> usize {
        if self.circles_dormant {
            return 0;
        }
        let Self { boxes, rays, circles, pairs, cast, .. } = self;
        let cast_ray = if cast.circles_done { None } else { cast.ray.and_then(|s| rays.slot(s)) };
        let mut events = 0;

        for i in 0..circles.capacity() {
            if !circles.is_live(i) {
                continue;
            }
            for j in 0..circles.capacity() {
                if i == j || !circles.is_live(j) {
                    continue;
                }
                let (a, b) = circles.pair_mut(i, j);
                let contact = check(ShapeRef::Circle(a), ShapeRef::Circle(b));
                events += pairs.track(a.handle(), b.handle(), contact, listener);
                if let Some(contact) = contact {
                    if !a.sensor && !b.sensor {
                        resolve(&mut a.pos, &mut a.vel, a.mass, b.vel, b.mass, contact.normal);
                    }
                }
            }

            let Some(a) = circles.get_mut(i) else {
                continue;
            };
            for (_, b) in boxes.iter() {
                let contact = check(ShapeRef::Circle(a), ShapeRef::Aabb(b));
                events += pairs.track(a.handle(), b.handle(), contact, listener);
                if let Some(contact) = contact {
                    if !a.sensor && !b.sensor {
                        resolve(&mut a.pos, &mut a.vel, a.mass, b.vel, b.mass, contact.normal);
                    }
                }
            }

            a.prev_pos = a.pos;
            a.pos += a.vel;

            for (_, r) in rays.iter() {
                if r.cast {
                    continue;
                }
                let contact = check(ShapeRef::Circle(a), ShapeRef::Ray(r));
                events += pairs.track(a.handle(), r.handle(), contact, listener);
            }

            if let Some(ray) = cast_ray {
                cast.collect_circle(ray, a);
            }
        }

        if cast_ray.is_some() {
            cast.circles_done = true;
        }
        events
    }

    fn dispatch_cast(&mut self) -> usize {
        let calls = match self.cast.ray.and_then(|s| self.rays.slot(s)) {
            Some(ray) => self.cast.dispatch(ray),
            None => 0,
        };
        self.finish_cast();
        calls
    }

    /// Drop the pending cast and give its segment back to the ray pool.
    fn finish_cast(&mut self) {
        if let Some(slot) = self.cast.reset() {
            self.rays.release(slot);
            self.refresh_dormancy();
        }
    }
}

/// Ordered check of `a` against `b`: `a`'s filter must name `b`'s layer.
fn check(a: ShapeRef<'_>, b: ShapeRef<'_>) -> Option<Contact> {
    if !a.base().collides_with(b.base()) || !CollisionUtils::test_shapes(a, b) {
        return None;
    }
    Some(CollisionUtils::contact(a, b))
}

/// Push a body out along `normal`. Immovable bodies (mass 0) never move; an
/// immovable `other` stops the body outright, otherwise the push and the new
/// velocity are split by mass. This is not an impulse solver.
fn resolve(pos: &mut Vec2, vel: &mut Vec2, mass: f32, other_vel: Vec2, other_mass: f32, normal: Vec2) {
    if mass == 0.0 {
        return;
    }
    if other_mass == 0.0 {
        *pos += normal;
        *vel = Vec2::ZERO;
    } else {
        let m = mass + other_mass;
        *pos += normal * (other_mass / m);
        *vel = (*vel - other_vel + normal) / m;
    }
}

fn elapsed_ms(t: Option<Instant>) -> f64 {
    t.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DebugStyle;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder {
        begins: Rc<RefCell<Vec<(BodyHandle, BodyHandle)>>>,
        ends: Rc<RefCell<Vec<(BodyHandle, BodyHandle)>>>,
    }

    impl CollisionListener for Recorder {
        fn begin_collision(&mut self, c: &Collision) {
            self.begins.borrow_mut().push((c.a, c.b));
        }

        fn end_collision(&mut self, c: &Collision) {
            self.ends.borrow_mut().push((c.a, c.b));
        }
    }

    fn tracker() -> (CollisionTracker, Recorder) {
        let rec = Recorder::default();
        let mut t = CollisionTracker::new(TrackerConfig::default());
        t.set_listener(Box::new(rec.clone()));
        (t, rec)
    }

    #[test]
    fn test_update_without_listener_fails() {
        let mut t = CollisionTracker::new(TrackerConfig::default());
        t.create_box(0.0, 0.0, 1.0, 1.0, false);
        assert_eq!(t.update(), Err(TrackerError::MissingListener));
    }

    #[test]
    fn test_second_cast_rejected() {
        let (mut t, _) = tracker();
        let cb = |_: BodyHandle, _: Vec2, _: Vec2, _: f32| true;
        t.ray_cast(Vec2::ZERO, Vec2::X, 1, Box::new(cb)).unwrap();
        assert_eq!(
            t.ray_cast(Vec2::ZERO, Vec2::X, 1, Box::new(cb)),
            Err(TrackerError::CastPending)
        );
        assert!(t.cancel_ray_cast());
        assert!(!t.cancel_ray_cast());
        assert!(t.is_dormant());
    }

    #[test]
    fn test_destroy_unknown_body() {
        let (mut t, _) = tracker();
        let h = t.create_box(0.0, 0.0, 1.0, 1.0, false).handle();
        t.destroy(h).unwrap();
        assert_eq!(t.destroy(h), Err(TrackerError::UnknownBody(h)));
        let bogus = BodyHandle::new(ShapeKind::Circle, 99);
        assert_eq!(t.destroy(bogus), Err(TrackerError::UnknownBody(bogus)));
    }

    #[test]
    fn test_handles_unique_past_initial_capacity() {
        let (mut t, _) = tracker();
        let mut ids: Vec<u32> = (0..15)
            .map(|i| t.create_box(i as f32 * 3.0, 0.0, 1.0, 1.0, false).handle().id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 15);
        assert_eq!(t.rigid_bodies(), 15);
        assert_eq!(t.stats().boxes, 15);
    }

    #[test]
    fn test_no_events_without_overlap() {
        let (mut t, rec) = tracker();
        t.create_box(0.0, 0.0, 1.0, 1.0, false).set_mask(1, 1);
        t.create_box(5.0, 0.0, 1.0, 1.0, false).set_mask(1, 1);
        t.create_circle(20.0, 0.0, 1.0, false).set_mask(1, 1);
        t.update().unwrap();
        assert!(rec.begins.borrow().is_empty());
        assert!(rec.ends.borrow().is_empty());
    }

    #[test]
    fn test_destroy_ends_active_pairs() {
        let (mut t, rec) = tracker();
        let a = t.create_box(0.0, 0.0, 4.0, 4.0, true).set_mask(1, 1).handle();
        let b = t.create_box(1.0, 1.0, 1.0, 1.0, true).handle();
        t.update().unwrap();
        assert!(t.is_colliding(a, b));
        t.destroy(b).unwrap();
        assert_eq!(*rec.ends.borrow(), vec![(a, b)]);
        assert!(!t.is_colliding(a, b));
        assert_eq!(t.rigid_bodies(), 0);
    }

    #[test]
    fn test_clear_is_silent() {
        let (mut t, rec) = tracker();
        t.create_box(0.0, 0.0, 4.0, 4.0, false).set_mask(1, 1);
        t.create_box(1.0, 1.0, 1.0, 1.0, false);
        t.create_ray(10.0, 10.0, 11.0, 11.0);
        t.update().unwrap();
        assert_eq!(rec.begins.borrow().len(), 1);
        t.clear();
        assert!(rec.ends.borrow().is_empty());
        assert!(t.is_dormant());
        assert_eq!(t.stats(), TrackerStats::default());
        t.update().unwrap();
        assert!(rec.ends.borrow().is_empty());
    }

    #[test]
    fn test_sensor_reports_without_response() {
        let (mut t, rec) = tracker();
        t.create_box(0.0, 0.0, 2.0, 2.0, false).set_mask(1, 2).set_velocity(1.0, 0.0);
        t.create_box(1.0, 0.0, 2.0, 2.0, true).set_mask(2, 0);
        t.update().unwrap();
        assert_eq!(rec.begins.borrow().len(), 1);
        let a = t.aabb(0).unwrap();
        assert_eq!(a.pos, Vec2::new(1.0, 0.0));
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
        assert_eq!(t.rigid_bodies(), 1);
    }

    #[test]
    fn test_box_ray_pair_has_no_response() {
        let (mut t, rec) = tracker();
        let b = t.create_box(0.0, 0.0, 4.0, 4.0, false).set_mask(1, 2).handle();
        let r = t.create_ray(2.0, 2.0, 10.0, 2.0).set_mask(2, 0).handle();
        t.update().unwrap();
        assert_eq!(*rec.begins.borrow(), vec![(b, r)]);
        assert_eq!(t.aabb(0).unwrap().pos, Vec2::ZERO);
        t.ray_mut(r.id).unwrap().set_points(Vec2::new(20.0, 2.0), Vec2::new(30.0, 2.0));
        t.update().unwrap();
        assert_eq!(*rec.ends.borrow(), vec![(b, r)]);
    }

    #[test]
    fn test_create_destroy_churn_reuses_slot() {
        let (mut t, _) = tracker();
        for _ in 0..10_000 {
            let h = t.create_box(0.0, 0.0, 1.0, 1.0, false).handle();
            assert_eq!(h.id, 0);
            t.destroy(h).unwrap();
        }
        assert_eq!(t.boxes.capacity(), 10);
        assert!(t.is_dormant());
    }

    #[test]
    fn test_clear_drops_pending_cast() {
        let (mut t, _) = tracker();
        let cb = |_: BodyHandle, _: Vec2, _: Vec2, _: f32| true;
        let cast = t.ray_cast(Vec2::ZERO, Vec2::X, 1, Box::new(cb)).unwrap();
        t.clear();
        assert!(!t.is_ray_cast_pending());
        assert!(t.ray(cast.id).is_none());
        assert!(t.ray_cast(Vec2::ZERO, Vec2::X, 1, Box::new(cb)).is_ok());
    }

    #[test]
    fn test_timing_recorded_when_enabled() {
        let cfg = TrackerConfig { enable_timing: true, ..Default::default() };
        let mut t = CollisionTracker::new(cfg);
        t.set_listener(Box::new(Recorder::default()));
        t.create_box(0.0, 0.0, 1.0, 1.0, false);
        assert!(t.timing().is_none());
        t.update().unwrap();
        let timing = t.timing().unwrap();
        assert!(timing.update_ms >= 0.0);
        assert_eq!(timing.events_emitted, 0);
    }

    #[derive(Default)]
    struct Styles(Vec<DebugStyle>);

    impl DebugRenderer for Styles {
        fn line(&mut self, _from: Vec2, _to: Vec2, style: DebugStyle) {
            self.0.push(style);
        }
    }

    #[test]
    fn test_draw_debug_outlines_every_body() {
        let (mut t, _) = tracker();
        t.cfg.debug_circle_segments = 6;
        t.create_box(0.0, 0.0, 1.0, 1.0, false);
        t.create_box(3.0, 0.0, 1.0, 1.0, true);
        t.create_ray(0.0, 5.0, 5.0, 5.0);
        t.create_circle(10.0, 0.0, 1.0, false);
        let cb = |_: BodyHandle, _: Vec2, _: Vec2, _: f32| true;
        t.ray_cast(Vec2::ZERO, Vec2::new(0.0, 9.0), 1, Box::new(cb)).unwrap();
        let mut styles = Styles::default();
        t.draw_debug(&mut styles);
        let count = |s: DebugStyle| styles.0.iter().filter(|&&x| x == s).count();
        assert_eq!(count(DebugStyle::Rigid), 4 + 6);
        assert_eq!(count(DebugStyle::Sensor), 4);
        assert_eq!(count(DebugStyle::Ray), 1);
        assert_eq!(count(DebugStyle::Cast), 1);
    }
}
