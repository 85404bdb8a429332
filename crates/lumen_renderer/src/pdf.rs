//! Sampling densities over directions.
//!
//! A [`Pdf`] both evaluates the probability density of a direction and draws
//! directions distributed according to that density. The integrator mixes a
//! light-directed density with the material's own density (single-sample
//! multiple importance sampling).

use crate::{sampling, Hittable, Onb};
use lumen_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

/// A probability density over directions, paired with a sampler.
pub trait Pdf {
    /// Density of sampling `direction` (always >= 0).
    fn value(&self, direction: Vec3) -> f32;

    /// Draw a direction from this density.
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Uniform density over the whole sphere of directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3) -> f32 {
        1.0 / (4.0 * PI)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        sampling::random_unit_vector(rng)
    }
}

/// Cosine-weighted density over the hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self { uvw: Onb::new(w) }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let cosine_theta = direction.normalize().dot(self.uvw.w());
        (cosine_theta / PI).max(0.0)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.transform(sampling::random_cosine_direction(rng))
    }
}

/// Density of directions from `origin` toward a hittable (usually a light
/// aggregate), delegating to its `pdf_value` / `random_direction`.
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(objects: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { objects, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.objects.pdf_value(self.origin, direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.objects.random_direction(self.origin, rng)
    }
}

/// Equal-weight mixture of two densities.
///
/// `generate` picks one component with probability 0.5; `value` is always
/// the average of both components, which keeps the estimator unbiased
/// whichever component produced the sample.
pub struct MixturePdf<'a> {
    p: [&'a dyn Pdf; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { p: [p0, p1] }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.p[0].value(direction) + 0.5 * self.p[1].value(direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if sampling::gen_f32(rng) < 0.5 {
            self.p[0].generate(rng)
        } else {
            self.p[1].generate(rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Fixed density that always proposes the same direction.
    struct Fixed {
        density: f32,
        direction: Vec3,
    }

    impl Pdf for Fixed {
        fn value(&self, _direction: Vec3) -> f32 {
            self.density
        }

        fn generate(&self, _rng: &mut dyn RngCore) -> Vec3 {
            self.direction
        }
    }

    #[test]
    fn test_sphere_pdf_is_uniform() {
        let pdf = SpherePdf;
        assert!((pdf.value(Vec3::X) - 1.0 / (4.0 * PI)).abs() < 1e-6);
        assert_eq!(pdf.value(Vec3::X), pdf.value(Vec3::new(-3.0, 1.0, 2.0)));
    }

    #[test]
    fn test_cosine_pdf_value() {
        let pdf = CosinePdf::new(Vec3::Y);

        assert!((pdf.value(Vec3::Y) - 1.0 / PI).abs() < 1e-6);
        assert!((pdf.value(Vec3::new(0.0, 5.0, 0.0)) - 1.0 / PI).abs() < 1e-6);
        assert_eq!(pdf.value(Vec3::new(0.0, -1.0, 0.0)), 0.0);
        assert!(pdf.value(Vec3::X).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_pdf_generates_around_normal() {
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let pdf = CosinePdf::new(normal);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let d = pdf.generate(&mut rng);
            assert!(d.dot(normal) >= -1e-5);
            assert!(pdf.value(d) >= 0.0);
        }
    }

    #[test]
    fn test_mixture_value_is_average_of_components() {
        let a = Fixed { density: 0.2, direction: Vec3::X };
        let b = Fixed { density: 1.4, direction: Vec3::Y };
        let mixture = MixturePdf::new(&a, &b);

        assert!((mixture.value(Vec3::Z) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_mixture_draws_from_both_components() {
        let a = Fixed { density: 1.0, direction: Vec3::X };
        let b = Fixed { density: 1.0, direction: Vec3::Y };
        let mixture = MixturePdf::new(&a, &b);
        let mut rng = StdRng::seed_from_u64(1);

        let draws: Vec<Vec3> = (0..64).map(|_| mixture.generate(&mut rng)).collect();
        assert!(draws.contains(&Vec3::X));
        assert!(draws.contains(&Vec3::Y));
    }
}
