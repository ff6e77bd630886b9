//! Progress coloring for trajectory points.
//!
//! Each point is colored by its ordinal position in the trajectory rather than
//! by its coordinates. The hue walks once around the color wheel every
//! [`HUE_CYCLE`] points at full saturation and value.

use glam::Vec3;

/// Number of points in one full hue cycle.
pub const HUE_CYCLE: usize = 1000;

/// Hue in `[0, 1)` for a trajectory of length `n`.
#[inline]
pub fn progress_hue(n: usize) -> f64 {
    (n % HUE_CYCLE) as f64 / HUE_CYCLE as f64
}

/// Color of the point that brought the trajectory to length `n`.
pub fn progress_color(n: usize) -> Vec3 {
    hsv_to_rgb(progress_hue(n), 1.0, 1.0)
}

/// Color from HSV values.
///
/// * `h` - 0.0 to 1.0 (wraps: red → yellow → green → cyan → blue → magenta → red)
/// * `s` - 0.0 (gray) to 1.0 (vivid)
/// * `v` - 0.0 (black) to 1.0 (bright)
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Vec3 {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new((r + m) as f32, (g + m) as f32, (b + m) as f32)
}
