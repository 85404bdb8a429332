//! Planar parallelogram primitive and an axis-aligned box built from six of
//! them.

use crate::{sampling, HitRecord, Hittable, HittableList, Material, Ray};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Parallelogram spanned by edges `u` and `v` from corner `q`.
pub struct Quad<M: Material> {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n·n)`, maps a planar offset to (alpha, beta) coordinates
    w: Vec3,
    normal: Vec3,
    /// Plane offset: `normal · x = d`
    d: f32,
    area: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Quad<M> {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: M) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();

        // Bound both diagonals so that neither corner pair is missed
        let bbox = Aabb::surrounding(
            &Aabb::from_points(q, q + u + v),
            &Aabb::from_points(q + u, q + v),
        );

        Self {
            q,
            u,
            v,
            w: n / n.dot(n),
            normal,
            d: normal.dot(q),
            area: n.length(),
            material,
            bbox,
        }
    }
}

impl<M: Material + 'static> Hittable for Quad<M> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let intersection = ray.at(t);
        let planar = intersection - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, alpha, beta, &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let ray = Ray::new_simple(origin, direction);
        let Some(rec) = self.hit(&ray, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = direction.dot(rec.normal).abs() / direction.length();

        distance_squared / (cosine * self.area)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q
            + sampling::gen_f32(rng) * self.u
            + sampling::gen_f32(rng) * self.v;
        p - origin
    }
}

/// Closed axis-aligned box with opposite corners `a` and `b`, as six quads
/// with outward-facing normals.
pub fn make_box<M: Material + Clone + 'static>(a: Vec3, b: Vec3, material: M) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];

    let mut sides = HittableList::new();
    for (q, u, v) in faces {
        sides.add(Arc::new(Quad::new(q, u, v, material.clone())));
    }
    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn floor() -> Quad<Lambertian> {
        // 2x2 square in the y = 0 plane, normal +y
        Quad::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Lambertian::new(Vec3::ONE),
        )
    }

    #[test]
    fn test_quad_hit_and_uv() {
        let quad = floor();
        let ray = Ray::new_simple(Vec3::new(0.5, 2.0, 0.0), -Vec3::Y);

        let rec = quad
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray should hit quad");
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Y).length() < 1e-5);
        assert!((rec.u - 0.5).abs() < 1e-5);
        assert!((rec.v - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_quad_miss_outside_and_parallel() {
        let quad = floor();
        let ray_t = Interval::new(0.001, f32::INFINITY);

        let outside = Ray::new_simple(Vec3::new(3.0, 2.0, 0.0), -Vec3::Y);
        assert!(quad.hit(&outside, ray_t).is_none());

        let parallel = Ray::new_simple(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(quad.hit(&parallel, ray_t).is_none());
    }

    #[test]
    fn test_quad_pdf_value() {
        let quad = floor();
        // Straight down from height 2 onto an area-4 quad: 4 / (1 * 4)
        let pdf = quad.pdf_value(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);
        assert!((pdf - 1.0).abs() < 1e-4);

        let mut rng = StdRng::seed_from_u64(13);
        let origin = Vec3::new(0.3, 1.0, -0.2);
        for _ in 0..50 {
            let d = quad.random_direction(origin, &mut rng);
            assert!((origin + d).y.abs() < 1e-5);
            assert!(quad.pdf_value(origin, d) > 0.0);
        }
    }

    #[test]
    fn test_box_faces_point_outward() {
        let cube = make_box(Vec3::ONE, -Vec3::ONE, Lambertian::new(Vec3::ONE));
        assert_eq!(cube.len(), 6);

        let bbox = cube.bounding_box();
        assert!(bbox.x.contains(-1.0) && bbox.x.contains(1.0));
        assert!(bbox.z.contains(-1.0) && bbox.z.contains(1.0));

        let ray_t = Interval::new(0.001, f32::INFINITY);
        let axes = [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::X, -Vec3::Y, -Vec3::Z];
        for axis in axes {
            let ray = Ray::new_simple(axis * 5.0 + Vec3::splat(0.1), -axis);
            let rec = cube.hit(&ray, ray_t).expect("box face should be hit");
            assert!(rec.front_face, "face along {axis} points inward");
            assert!((rec.t - 4.0).abs() < 0.2);

            let inside = Ray::new_simple(Vec3::ZERO, axis);
            let rec = cube.hit(&inside, ray_t).expect("box is closed");
            assert!(!rec.front_face);
        }
    }
}
