//! Orthonormal basis built around a single direction.

use lumen_math::Vec3;

/// Orthonormal basis whose `w` axis is a given direction.
#[derive(Debug, Clone, Copy)]
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    /// Build a basis with `w` along `n` (which need not be normalized).
    pub fn new(n: Vec3) -> Self {
        let w = n.normalize();
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);

        Self { u, v, w }
    }

    pub fn u(&self) -> Vec3 {
        self.u
    }

    pub fn v(&self) -> Vec3 {
        self.v
    }

    pub fn w(&self) -> Vec3 {
        self.w
    }

    /// Map basis coordinates (weights of u, v, w) to world space.
    pub fn transform(&self, local: Vec3) -> Vec3 {
        local.x * self.u + local.y * self.v + local.z * self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onb_is_orthonormal() {
        for n in [Vec3::Y, Vec3::new(1.0, 0.1, 0.0), Vec3::new(-2.0, 3.0, 5.0)] {
            let onb = Onb::new(n);

            assert!((onb.u().length() - 1.0).abs() < 1e-5);
            assert!((onb.v().length() - 1.0).abs() < 1e-5);
            assert!(onb.u().dot(onb.v()).abs() < 1e-5);
            assert!(onb.u().dot(onb.w()).abs() < 1e-5);
            assert!(onb.v().dot(onb.w()).abs() < 1e-5);
            assert!((onb.w() - n.normalize()).length() < 1e-5);
        }
    }

    #[test]
    fn test_onb_transform_z_maps_to_w() {
        let onb = Onb::new(Vec3::new(0.0, 0.0, -3.0));
        assert!((onb.transform(Vec3::Z) - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
