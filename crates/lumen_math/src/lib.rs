//! Lumen math - the numeric building blocks of the path tracer.
//!
//! Scalar ranges, axis-aligned boxes and rays. Vector types come from
//! `glam` and are re-exported here.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Converts an angle in degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_to_radians() {
        assert!((degrees_to_radians(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(degrees_to_radians(0.0), 0.0);
    }
}
