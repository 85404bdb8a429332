//! Instancing decorators that present a moved or rotated view of a hittable.
//!
//! Each decorator owns one shared child and caches its own world-space
//! bounding box at construction. Rays are taken into the child's space,
//! the child is queried, and the hit is taken back out. The child itself
//! is never mutated.

use crate::{HitRecord, Hittable, Ray};
use lumen_math::{degrees_to_radians, Aabb, Interval, Mat3, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Translation by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box() + offset;
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        // Move the ray backwards by the offset
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.object.hit(&offset_ray, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random_direction(origin - self.offset, rng)
    }
}

/// Rotation about the vertical (y) axis.
///
/// The child has already oriented its normal against the object-space ray,
/// and a rotation preserves that, so its `front_face` is kept as is.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(object: Arc<dyn Hittable>, angle_degrees: f32) -> Self {
        let radians = degrees_to_radians(angle_degrees);
        let mut rotate = Self {
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
            bbox: Aabb::EMPTY,
            object,
        };

        let corners = rotate.object.bounding_box().corners();
        rotate.bbox = Aabb::from_corners(corners.map(|c| rotate.to_world(c)));
        rotate
    }

    /// World space to object space (inverse rotation).
    #[inline]
    fn to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Object space to world space (forward rotation).
    #[inline]
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let rotated = Ray::new(
            self.to_object(ray.origin()),
            self.to_object(ray.direction()),
            ray.time(),
        );

        let mut rec = self.object.hit(&rotated, ray_t)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object
            .pdf_value(self.to_object(origin), self.to_object(direction))
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.to_world(self.object.random_direction(self.to_object(origin), rng))
    }
}

/// General rotation composed of rotations about x, then y, then z.
///
/// Angle conventions match [`RotateY`] for the y axis; x and z turn in the
/// opposite sense to `glam`'s right-handed `from_rotation_*`. Unlike
/// `RotateY`, the hit orientation is re-derived from the object-space ray
/// and the rotated normal instead of reusing the child's `front_face`.
pub struct Rotate {
    object: Arc<dyn Hittable>,
    forward: Mat3,
    inverse: Mat3,
    bbox: Aabb,
}

impl Rotate {
    pub fn new(object: Arc<dyn Hittable>, angle_x: f32, angle_y: f32, angle_z: f32) -> Self {
        let rx = Mat3::from_rotation_x(-degrees_to_radians(angle_x));
        let ry = Mat3::from_rotation_y(degrees_to_radians(angle_y));
        let rz = Mat3::from_rotation_z(-degrees_to_radians(angle_z));

        let forward = rz * ry * rx;
        // Orthonormal, so the transpose is the exact inverse
        let inverse = forward.transpose();

        let corners = object.bounding_box().corners();
        let bbox = Aabb::from_corners(corners.map(|c| forward * c));

        Self {
            object,
            forward,
            inverse,
            bbox,
        }
    }
}

impl Hittable for Rotate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let rotated = Ray::new(
            self.inverse * ray.origin(),
            self.inverse * ray.direction(),
            ray.time(),
        );

        let mut rec = self.object.hit(&rotated, ray_t)?;
        rec.p = self.forward * rec.p;
        let normal = self.forward * rec.normal;
        rec.set_face_normal(&rotated, normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object
            .pdf_value(self.inverse * origin, self.inverse * direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.forward * self.object.random_direction(self.inverse * origin, rng)
    }
}
