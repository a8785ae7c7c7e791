//! Frame timing, the approach step shared by every fade, and a point-in-polygon
//! test for hit regions.

use bevy::math::Vec2;

/// `sqrt(3)`, the ratio between a hexagon's short diameter and its radius.
pub const SQRT_3: f32 = 1.732_050_8;

/// Frame rate the scheduler's frame delta is normalised against.
pub const REFERENCE_FPS: f32 = 60.0;

/// Converts wall-clock seconds into reference frames (`1.0` per frame at 60 Hz).
///
/// Negative or non-finite inputs yield `0.0` so a bad clock sample never
/// drives an animation backwards.
///
/// # Examples
/// ```
/// # use hex_veil::math::frames_elapsed;
/// assert!((frames_elapsed(1.0 / 60.0) - 1.0).abs() < 1e-6);
/// assert_eq!(frames_elapsed(-0.5), 0.0);
/// ```
pub fn frames_elapsed(delta_secs: f32) -> f32 {
    if delta_secs.is_finite() && delta_secs > 0.0 {
        delta_secs * REFERENCE_FPS
    } else {
        0.0
    }
}

/// One exponential-approach increment toward a target.
///
/// Returns `delta * speed * frame_delta`, with the blend factor saturated at
/// `1.0` so a long frame lands on the target instead of overshooting it.
pub fn approach_step(delta: f32, speed: f32, frame_delta: f32) -> f32 {
    let factor = (speed * frame_delta).clamp(0.0, 1.0);
    delta * factor
}

/// Whether `point` lies inside (or within `tolerance` of) a convex polygon.
///
/// Works for either winding order. Points on an edge count as inside.
pub fn point_in_convex_polygon(point: Vec2, polygon: &[Vec2], tolerance: f32) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0_f32;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let edge = b - a;
        let len = edge.length();
        if len <= f32::EPSILON {
            continue;
        }
        // Signed distance of the point from the edge line.
        let dist = edge.perp_dot(point - a) / len;
        if dist.abs() <= tolerance {
            continue;
        }
        if sign == 0.0 {
            sign = dist.signum();
        } else if dist.signum() != sign {
            return false;
        }
    }
    true
}
