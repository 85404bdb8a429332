//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree over shared hittables. Construction sorts by bounding-box
//! centroid along the axis of largest centroid spread and splits at the
//! median.

use crate::{HitRecord, Hittable, HittableList, Ray};
use lumen_math::{Aabb, Interval};
use std::sync::Arc;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        objects: Vec<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        log::debug!("Building BVH over {} primitives", objects.len());
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    /// Create a BVH over the members of a list. The list is left untouched.
    pub fn from_list(list: &HittableList) -> Self {
        Self::new(list.objects().to_vec())
    }

    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let n = objects.len();

        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        // Split axis from centroid spread, not from the full bounds
        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let right_objects = objects.split_off(n / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let mut closest = None;
                let mut closest_so_far = ray_t.max;
                for obj in objects {
                    if let Some(rec) = obj.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                        closest_so_far = rec.t;
                        closest = Some(rec);
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sphere_at(center: Vec3, radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(center, radius, Lambertian::new(Vec3::splat(0.5))))
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert!(bvh.hit(&Ray::default(), Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_bvh_single_sphere() {
        let bvh = BvhNode::new(vec![sphere_at(Vec3::new(0.0, 0.0, -1.0), 0.5)]);
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_some());
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres = (0..10)
            .map(|i| sphere_at(Vec3::new(i as f32, 0.0, -5.0), 0.5))
            .collect();
        let bvh = BvhNode::new(spheres);
        assert!(matches!(bvh, BvhNode::Branch { .. }));

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray should hit sphere at x=5");

        // Sphere at z=-5, radius 0.5
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut list = HittableList::new();
        for _ in 0..40 {
            let center = Vec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-15.0..-5.0),
            );
            list.add(sphere_at(center, rng.gen_range(0.2..1.0)));
        }
        let bvh = BvhNode::from_list(&list);
        assert_eq!(list.len(), 40);

        let ray_t = Interval::new(0.001, f32::INFINITY);
        for _ in 0..200 {
            let target = Vec3::new(rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0), -10.0);
            let ray = Ray::new_simple(Vec3::ZERO, target);

            let expected = list.hit(&ray, ray_t).map(|rec| rec.t);
            let actual = bvh.hit(&ray, ray_t).map(|rec| rec.t);
            match (expected, actual) {
                (None, None) => {}
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-4),
                other => panic!("bvh disagrees with list: {other:?}"),
            }
        }
    }

    #[test]
    fn test_bvh_bbox_covers_members() {
        let spheres = (0..9)
            .map(|i| sphere_at(Vec3::new(0.0, i as f32 * 2.0, 0.0), 1.0))
            .collect();
        let bvh = BvhNode::new(spheres);

        let bbox = bvh.bounding_box();
        assert!(bbox.y.contains(-1.0));
        assert!(bbox.y.contains(17.0));
    }
}
