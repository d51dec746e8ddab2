use glam::Vec2;

use std::f32::consts::PI;

use crate::api::NarrowphaseApi;
use crate::types::*;

/// Stateless geometric predicates. Every pairwise combination lives here so
/// shapes never test themselves.
pub struct CollisionUtils;

impl NarrowphaseApi for CollisionUtils {
    fn is_point_in_box(p: Vec2, b: &Aabb) -> bool {
        p.x >= b.x1() && p.x <= b.x2() && p.y >= b.y1() && p.y <= b.y2()
    }

    fn is_point_on_ray(p: Vec2, r: &Ray) -> bool {
        // Exact comparison: only holds for points that land on the segment without rounding.
        p.distance(r.p1) + p.distance(r.p2) == r.p1.distance(r.p2)
    }

    fn is_point_in_circle(p: Vec2, c: &Circle) -> bool {
        p.distance_squared(c.pos) <= c.radius * c.radius
    }

    fn test_box_intersection(a: &Aabb, b: &Aabb) -> bool {
        a.x1() < b.x2() && a.x2() > b.x1() && a.y1() < b.y2() && a.y2() > b.y1()
    }

    fn test_box_ray_intersection(b: &Aabb, r: &Ray) -> bool {
        if r.x2() < b.x1() || r.x1() > b.x2() || r.y2() < b.y1() || r.y1() > b.y2() {
            return false;
        }
        // Rays passing clean through without an endpoint inside are not reported.
        strictly_inside(b, r.p1) || strictly_inside(b, r.p2)
    }

    fn test_box_circle_intersection(b: &Aabb, c: &Circle) -> bool {
        let nearest = nearest_point_in_box(b, c.pos);
        (c.pos - nearest).length_squared() < c.radius * c.radius
    }

    fn test_ray_intersection(a: &Ray, b: &Ray) -> bool {
        let s = a.p2 - a.p1;
        let t = b.p2 - b.p1;
        let perp = s.perp_dot(t);
        if perp == 0.0 {
            // Parallel, collinear overlap included.
            return false;
        }
        let d = b.p1 - a.p1;
        let u = d.perp_dot(t) / perp;
        let v = d.perp_dot(s) / perp;
        (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v)
    }

    fn test_ray_circle_intersection(r: &Ray, c: &Circle) -> bool {
        match segment_circle_roots(r, c) {
            Some((t0, t1)) => t0 <= 1.0 && t1 >= 0.0,
            None => false,
        }
    }

    fn test_circle_intersection(a: &Circle, b: &Circle) -> bool {
        let rsum = a.radius + b.radius;
        a.pos.distance_squared(b.pos) < rsum * rsum
    }

    fn ray_intersection_point(a: &Ray, b: &Ray) -> Option<Vec2> {
        // Infinite lines through both segments.
        let s = a.p2 - a.p1;
        let t = b.p2 - b.p1;
        let perp = s.perp_dot(t);
        if perp == 0.0 {
            return None;
        }
        let u = (b.p1 - a.p1).perp_dot(t) / perp;
        Some(a.p1 + s * u)
    }

    fn ray_circle_entry(r: &Ray, c: &Circle) -> Option<f32> {
        let (t0, _) = segment_circle_roots(r, c)?;
        (0.0..=1.0).contains(&t0).then_some(t0)
    }

    fn angle_between_rays(a: &Ray, b: &Ray) -> f32 {
        let da = a.delta();
        let db = b.delta();
        da.y.atan2(da.x) - db.y.atan2(db.x)
    }

    fn box_intersection_normal(a: &Aabb, b: &Aabb) -> Vec2 {
        // Each edge check overwrites the previous one: bottom/left win over top/right.
        let mut n = Vec2::ZERO;
        if a.y1() < b.y2() && a.y2() > b.y2() {
            n = Vec2::new(0.0, b.y2() - a.y1());
        }
        if a.x1() < b.x2() && a.x2() > b.x2() {
            n = Vec2::new(b.x2() - a.x1(), 0.0);
        }
        if a.y2() > b.y1() && a.y1() < b.y1() {
            n = Vec2::new(0.0, b.y1() - a.y2());
        }
        if a.x2() > b.x1() && a.x1() < b.x1() {
            n = Vec2::new(b.x1() - a.x2(), 0.0);
        }
        n
    }

    fn box_ray_intersection_normal(b: &Aabb, r: &Ray) -> Vec2 {
        if r.p1.y == r.p2.y {
            let y = r.p1.y;
            return if b.center_y() >= y {
                Vec2::new(0.0, (y - b.y1()).max(0.0))
            } else {
                Vec2::new(0.0, (y - b.y2()).min(0.0))
            };
        }
        if r.p1.x == r.p2.x {
            let x = r.p1.x;
            return if b.center_x() >= x {
                Vec2::new((x - b.x1()).max(0.0), 0.0)
            } else {
                Vec2::new((x - b.x2()).min(0.0), 0.0)
            };
        }

        let line = r.angle() % PI;
        let slope = (r.p1.y - r.p2.y) / (r.p1.x - r.p2.x);
        if line < CIRC_4 || line > PI - CIRC_4 {
            // Mostly horizontal: push along y from the deepest bottom/top corner.
            let y_at = |x: f32| r.p1.y + (x - r.p1.x) * slope;
            let (ya, yb) = (y_at(b.x1()), y_at(b.x2()));
            if b.center_y() >= y_at(b.center_x()) {
                Vec2::new(0.0, (ya.max(yb) - b.y1()).max(0.0))
            } else {
                Vec2::new(0.0, (ya.min(yb) - b.y2()).min(0.0))
            }
        } else {
            let x_at = |y: f32| r.p1.x + (y - r.p1.y) / slope;
            let (xa, xb) = (x_at(b.y1()), x_at(b.y2()));
            if b.center_x() >= x_at(b.center_y()) {
                Vec2::new((xa.max(xb) - b.x1()).max(0.0), 0.0)
            } else {
                Vec2::new((xa.min(xb) - b.x2()).min(0.0), 0.0)
            }
        }
    }

    fn circle_intersection_normal(a: &Circle, b: &Circle) -> Vec2 {
        let d = a.pos - b.pos;
        let dist = d.length();
        if dist == 0.0 {
            // Coincident centers; undefined direction.
            return Vec2::ZERO;
        }
        d / dist * (a.radius + b.radius - dist).max(0.0)
    }

    fn circle_box_intersection_normal(c: &Circle, b: &Aabb) -> Vec2 {
        let d = c.pos - nearest_point_in_box(b, c.pos);
        let dist = d.length();
        if dist == 0.0 {
            return Vec2::ZERO;
        }
        d / dist * (c.radius - dist).max(0.0)
    }
}

impl CollisionUtils {
    /// Closed overlap of two shapes' bounds.
    pub fn test_bounds(a: ShapeRef<'_>, b: ShapeRef<'_>) -> bool {
        let (amin, amax) = a.bounds();
        let (bmin, bmax) = b.bounds();
        amin.x <= bmax.x && amax.x >= bmin.x && amin.y <= bmax.y && amax.y >= bmin.y
    }

    /// Predicate table keyed by the pair of shape tags.
    pub fn test_shapes(a: ShapeRef<'_>, b: ShapeRef<'_>) -> bool {
        use ShapeRef as S;
        match (a, b) {
            (S::Aabb(x), S::Aabb(y)) => Self::test_box_intersection(x, y),
            (S::Aabb(x), S::Ray(r)) | (S::Ray(r), S::Aabb(x)) => Self::test_box_ray_intersection(x, r),
            (S::Aabb(x), S::Circle(c)) | (S::Circle(c), S::Aabb(x)) => Self::test_box_circle_intersection(x, c),
            (S::Ray(p), S::Ray(q)) => Self::test_ray_intersection(p, q),
            (S::Ray(r), S::Circle(c)) | (S::Circle(c), S::Ray(r)) => Self::test_ray_circle_intersection(r, c),
            (S::Circle(p), S::Circle(q)) => Self::test_circle_intersection(p, q),
        }
    }

    /// Contact point and the normal that would move `a` out of `b`.
    pub fn contact(a: ShapeRef<'_>, b: ShapeRef<'_>) -> Contact {
        use ShapeRef as S;
        match (a, b) {
            (S::Aabb(x), S::Aabb(y)) => Contact {
                point: overlap_center(x, y),
                normal: Self::box_intersection_normal(x, y),
            },
            (S::Aabb(x), S::Ray(r)) => Contact {
                point: ray_point_in_box(x, r),
                normal: Self::box_ray_intersection_normal(x, r),
            },
            (S::Circle(c), S::Aabb(x)) => Contact {
                point: nearest_point_in_box(x, c.pos),
                normal: Self::circle_box_intersection_normal(c, x),
            },
            (S::Ray(p), S::Ray(q)) => Contact {
                point: Self::ray_intersection_point(p, q).unwrap_or(p.p1),
                normal: Vec2::ZERO,
            },
            (S::Ray(r), S::Circle(c)) => Contact {
                point: nearest_point_on_segment(r, c.pos),
                normal: Vec2::ZERO,
            },
            (S::Circle(p), S::Circle(q)) => Contact {
                point: q.pos + (p.pos - q.pos).normalize_or_zero() * q.radius,
                normal: Self::circle_intersection_normal(p, q),
            },
            (S::Ray(_), S::Aabb(_)) | (S::Aabb(_), S::Circle(_)) | (S::Circle(_), S::Ray(_)) => {
                let flipped = Self::contact(b, a);
                Contact { point: flipped.point, normal: -flipped.normal }
            }
        }
    }
}

fn strictly_inside(b: &Aabb, p: Vec2) -> bool {
    p.x > b.x1() && p.x < b.x2() && p.y > b.y1() && p.y < b.y2()
}

fn nearest_point_in_box(b: &Aabb, p: Vec2) -> Vec2 {
    // min/max rather than clamp: degenerate boxes must not panic.
    Vec2::new(p.x.max(b.x1()).min(b.x2()), p.y.max(b.y1()).min(b.y2()))
}

fn nearest_point_on_segment(r: &Ray, p: Vec2) -> Vec2 {
    let d = r.p2 - r.p1;
    let len2 = d.length_squared();
    if len2 == 0.0 {
        return r.p1;
    }
    let t = ((p - r.p1).dot(d) / len2).max(0.0).min(1.0);
    r.p1 + d * t
}

fn overlap_center(a: &Aabb, b: &Aabb) -> Vec2 {
    let x = (a.x1().max(b.x1()) + a.x2().min(b.x2())) * 0.5;
    let y = (a.y1().max(b.y1()) + a.y2().min(b.y2())) * 0.5;
    Vec2::new(x, y)
}

fn ray_point_in_box(b: &Aabb, r: &Ray) -> Vec2 {
    if strictly_inside(b, r.p1) {
        r.p1
    } else if strictly_inside(b, r.p2) {
        r.p2
    } else {
        nearest_point_in_box(b, (r.p1 + r.p2) * 0.5)
    }
}

/// Ordered roots of `|p1 + t (p2 - p1) - c|² = r²`, `None` for a miss or a zero-length ray.
fn segment_circle_roots(r: &Ray, c: &Circle) -> Option<(f32, f32)> {
    let d = r.p2 - r.p1;
    let m = r.p1 - c.pos;
    let a = d.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * m.dot(d);
    let cc = m.length_squared() - c.radius * c.radius;
    let disc = b * b - 4.0 * a * cc;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    Some(((-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)))
}
