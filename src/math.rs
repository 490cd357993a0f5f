//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec3` inputs, making them straightforward to unit-test.

use bevy::prelude::Vec3;

/// `√3`, the width-to-radius ratio of a pointy-top hexagon.
pub const SQRT_3: f32 = 1.732_050_8;

/// Maps a noise value from the standard `[-1, 1]` range into `[min, max]`.
///
/// Noise generators (e.g. `Perlin`) produce values centred around zero.
/// This linearly rescales to an arbitrary output range.
///
/// # Examples
/// ```
/// # use hex_world::math::map_noise_to_range;
/// assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
/// assert_eq!(map_noise_to_range( 1.0, 0.0, 10.0), 10.0);
/// assert_eq!(map_noise_to_range( 0.0, 2.0, 6.0),  4.0);
/// ```
pub fn map_noise_to_range(noise_val: f64, min: f32, max: f32) -> f32 {
    min + ((noise_val as f32 + 1.0) / 2.0) * (max - min)
}

/// Unclamped linear interpolation between `a` and `b`.
///
/// # Examples
/// ```
/// # use hex_world::math::lerp;
/// assert_eq!(lerp(0.0, 4.0, 0.5), 2.0);
/// assert_eq!(lerp(0.0, 4.0, 1.0), 4.0);
/// ```
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Area-weighted normal of a triangle: `(v1 - v0) × (v2 - v0)`.
///
/// The length is twice the triangle's area, so summing these per vertex
/// weights larger faces more heavily. Degenerate triangles yield `Vec3::ZERO`.
pub fn area_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0)
}

/// Computes the face normal of a triangle defined by three vertices.
///
/// Uses the cross product of edges `(v1 - v0)` and `(v2 - v0)`.
/// Returns `Vec3::ZERO` if the triangle is degenerate (collinear points).
pub fn compute_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    area_normal(v0, v1, v2).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── map_noise_to_range ──────────────────────────────────────────

    #[test]
    fn noise_min_maps_to_range_min() {
        assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn noise_max_maps_to_range_max() {
        assert_eq!(map_noise_to_range(1.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn noise_zero_maps_to_unit_midpoint() {
        let result = map_noise_to_range(0.0, 0.0, 1.0);
        assert!((result - 0.5).abs() < 1e-6);
    }

    // ── lerp ────────────────────────────────────────────────────────

    #[test]
    fn lerp_hits_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    }

    #[test]
    fn lerp_scales_band_count() {
        // Normalized height 0.4 over 2 bands lands in band 0.
        assert_eq!(lerp(0.0, 2.0, 0.4).floor() as usize, 0);
        assert_eq!(lerp(0.0, 2.0, 0.6).floor() as usize, 1);
    }

    // ── compute_normal ──────────────────────────────────────────────

    #[test]
    fn normal_of_xy_plane_triangle() {
        let n = compute_normal(Vec3::ZERO, Vec3::X, Vec3::Y);
        // Cross of X × Y = Z
        assert!((n - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn normal_of_xz_plane_triangle() {
        let n = compute_normal(Vec3::ZERO, Vec3::X, Vec3::Z);
        // Cross of X × Z = -Y
        assert!((n - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn degenerate_triangle_returns_zero() {
        // Collinear points
        let n = compute_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(n, Vec3::ZERO);
    }

    #[test]
    fn area_normal_length_is_twice_area() {
        let n = area_normal(Vec3::ZERO, Vec3::X * 2.0, Vec3::Z * 2.0);
        // Right triangle with legs 2 has area 2.
        assert!((n.length() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn sqrt_3_constant_is_accurate() {
        assert!((SQRT_3 - 3.0_f32.sqrt()).abs() < 1e-6);
    }
}
