//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer with importance-sampled direct lighting.
//! Scenes are built from shared [`Hittable`]s (triangles, spheres, quads,
//! lists, BVHs and transform decorators) and rendered scanline-parallel.

mod bvh;
mod camera;
mod hittable;
mod material;
mod onb;
mod output;
mod pdf;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod transform;
mod triangle;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Absorber, Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterKind,
    ScatterRecord,
};
pub use onb::Onb;
pub use output::{save, save_png, write_ppm, OutputError, OutputResult};
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, SpherePdf};
pub use quad::{make_box, Quad};
pub use renderer::{color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, ImageBuffer};
pub use sampling::{
    gen_f32, gen_f32_range, random_cosine_direction, random_in_unit_disk, random_to_sphere,
    random_unit_vector,
};
pub use sphere::Sphere;
pub use transform::{Rotate, RotateY, Translate};
pub use triangle::Triangle;

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
