//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.
//! Triangles are flat shaded and can also be importance-sampled as lights.

use crate::{sampling, HitRecord, Hittable, Material, Ray};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Determinants smaller than this mean the ray runs parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-7;

/// UV anchors blended by the barycentric weights at a hit.
const UV_A: Vec3 = Vec3::new(0.0, 0.0, -1.0);
const UV_B: Vec3 = Vec3::new(0.0, 1.0, -1.0);
const UV_C: Vec3 = Vec3::new(1.0, 0.0, -1.0);

/// A triangle primitive.
pub struct Triangle<M: Material> {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    area: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Triangle<M> {
    /// Create a new triangle from three vertices.
    ///
    /// The outward normal follows the winding `v0 -> v1 -> v2`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: M) -> Self {
        let n = (v1 - v0).cross(v2 - v0);

        let extent = |a: f32, b: f32, c: f32| Interval::new(a.min(b).min(c), a.max(b).max(c));
        let bbox = Aabb::new(
            extent(v0.x, v1.x, v2.x),
            extent(v0.y, v1.y, v2.y),
            extent(v0.z, v1.z, v2.z),
        );

        Self {
            v0,
            v1,
            v2,
            normal: n.normalize(),
            area: n.length() / 2.0,
            material,
            bbox,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f32 {
        self.area
    }
}

impl<M: Material + 'static> Hittable for Triangle<M> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let det = edge1.dot(h);

        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.contains(t) {
            return None;
        }

        let d = u * UV_A + v * UV_B + (1.0 - u - v) * UV_C;
        Some(HitRecord::new(ray, t, self.normal, d.x, d.y, &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Solid-angle density of hitting this triangle along `direction`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let ray = Ray::new_simple(origin, direction);
        let Some(rec) = self.hit(&ray, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = direction.dot(self.normal).abs() / direction.length();

        distance_squared / (cosine * self.area)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let r1 = sampling::gen_f32(rng);
        let r2 = sampling::gen_f32(rng);
        let p = self.v0 + r1 * (self.v1 - self.v0) + r2 * (self.v2 - self.v1);
        p - origin
    }
}
