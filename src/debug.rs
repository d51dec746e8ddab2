use glam::Vec2;

use std::f32::consts::TAU;

use crate::api::{DebugRenderer, DebugStyle};
use crate::types::*;

pub fn outline_box(r: &mut dyn DebugRenderer, b: &Aabb) {
    let style = if b.is_sensor() { DebugStyle::Sensor } else { DebugStyle::Rigid };
    for edge in b.edges() {
        r.line(edge.p2, edge.p1, style);
    }
}

pub fn outline_ray(r: &mut dyn DebugRenderer, ray: &Ray) {
    let style = if ray.is_cast() { DebugStyle::Cast } else { DebugStyle::Ray };
    r.line(ray.p1, ray.p2, style);
}

/// Circle as a regular polygon with `segments` sides (at least 3).
pub fn outline_circle(r: &mut dyn DebugRenderer, c: &Circle, segments: u32) {
    let style = if c.is_sensor() { DebugStyle::Sensor } else { DebugStyle::Rigid };
    let n = segments.max(3);
    let at = |k: u32| {
        let a = TAU * k as f32 / n as f32;
        c.pos + Vec2::new(a.cos(), a.sin()) * c.radius
    };
    for k in 0..n {
        r.line(at(k), at(k + 1), style);
    }
}
