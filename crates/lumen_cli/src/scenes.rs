//! Built-in demo scenes.

use std::sync::Arc;

use lumen_math::Vec3;
use lumen_renderer::{
    make_box, BvhNode, Camera, Color, Dielectric, DiffuseLight, Hittable, HittableList,
    Lambertian, Material, Metal, Quad, Rotate, RotateY, Sphere, Translate, Triangle,
};

use crate::config::SceneKind;

/// A renderable scene: geometry, the subset of it sampled as lights, and a
/// camera framing it.
pub struct Scene {
    pub world: BvhNode,
    pub lights: HittableList,
    pub camera: Camera,
}

pub fn build(kind: SceneKind) -> Scene {
    match kind {
        SceneKind::Cornell => cornell_box(),
        SceneKind::Triangles => triangles(),
    }
}

/// Shared camera for the 555-unit box: looking in through the open side.
fn box_camera() -> Camera {
    Camera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Color::ZERO)
}

/// The five inward-facing walls of the box, open towards -z.
fn box_walls() -> HittableList {
    let red = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));

    let mut walls = HittableList::new();
    walls.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(0.0, 555.0, 0.0),
        green,
    )));
    walls.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(0.0, 0.0, -555.0),
        Vec3::new(0.0, 555.0, 0.0),
        red,
    )));
    walls.add(Arc::new(Quad::new(
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    walls.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    walls.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white,
    )));
    walls
}

fn ceiling_light(emit: Color) -> Arc<dyn Hittable> {
    Arc::new(Quad::new(
        Vec3::new(213.0, 554.0, 227.0),
        Vec3::new(130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 105.0),
        DiffuseLight::new(emit),
    ))
}

fn cornell_box() -> Scene {
    let mut world = box_walls();
    let light = ceiling_light(Color::splat(15.0));
    world.add(light.clone());

    let aluminum = Arc::new(Metal::new(Color::new(0.8, 0.85, 0.88), 0.0));
    let tall_box: Arc<dyn Hittable> = Arc::new(make_box(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        aluminum,
    ));
    let tall_box: Arc<dyn Hittable> = Arc::new(RotateY::new(tall_box, 15.0));
    world.add(Arc::new(Translate::new(tall_box, Vec3::new(265.0, 0.0, 295.0))));

    let glass: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        Dielectric::new(1.5),
    ));
    world.add(glass.clone());

    // Sample the glass sphere too, so caustics under it converge
    let mut lights = HittableList::from(light);
    lights.add(glass);

    Scene {
        world: BvhNode::from_list(&world),
        lights,
        camera: box_camera(),
    }
}

/// Regular tetrahedron with edge `size`, standing on the y = 0 plane with
/// one corner at the origin. Faces are wound so their normals point out.
fn tetrahedron<M: Material + Clone + 'static>(size: f32, material: M) -> HittableList {
    let a = Vec3::ZERO;
    let b = Vec3::new(size, 0.0, 0.0);
    let c = Vec3::new(0.5 * size, 0.0, 0.75f32.sqrt() * size);
    let d = Vec3::new(0.5 * size, (2.0f32 / 3.0).sqrt() * size, c.z / 3.0);

    let mut faces = HittableList::new();
    for (v0, v1, v2) in [(a, b, c), (a, d, b), (b, d, c), (a, c, d)] {
        faces.add(Arc::new(Triangle::new(v0, v1, v2, material.clone())));
    }
    faces
}

fn triangles() -> Scene {
    let mut world = box_walls();

    let ceiling = ceiling_light(Color::splat(7.0));
    let wall: Arc<dyn Hittable> = Arc::new(Quad::new(
        Vec3::new(1.0, 213.0, 330.0),
        Vec3::new(0.0, 0.0, -105.0),
        Vec3::new(0.0, 130.0, 0.0),
        DiffuseLight::new(Color::splat(5.0)),
    ));
    let lamp: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(420.0, 420.0, 160.0),
        30.0,
        DiffuseLight::new(Color::new(1.0, 0.67, 0.26) * 12.0),
    ));
    world.add(ceiling.clone());
    world.add(wall.clone());
    world.add(lamp.clone());

    let gray = Arc::new(Lambertian::new(Color::splat(0.5)));
    let tetra: Arc<dyn Hittable> = Arc::new(tetrahedron(220.0, gray));
    let tetra: Arc<dyn Hittable> = Arc::new(Rotate::new(tetra, 0.0, 35.0, 0.0));
    world.add(Arc::new(Translate::new(tetra, Vec3::new(120.0, 0.0, 200.0))));

    // Small tilted prism of two triangles, turned on all three axes
    let copper = Arc::new(Metal::new(Color::new(0.85, 0.55, 0.4), 0.15));
    let mut panel = HittableList::new();
    panel.add(Arc::new(Triangle::new(
        Vec3::new(-60.0, 0.0, 0.0),
        Vec3::new(60.0, 0.0, 0.0),
        Vec3::new(0.0, 120.0, 0.0),
        copper.clone(),
    )));
    panel.add(Arc::new(Triangle::new(
        Vec3::new(60.0, 0.0, 0.0),
        Vec3::new(-60.0, 0.0, 0.0),
        Vec3::new(0.0, -120.0, 0.0),
        copper,
    )));
    let panel: Arc<dyn Hittable> = Arc::new(Rotate::new(Arc::new(panel), 20.0, -30.0, 10.0));
    world.add(Arc::new(Translate::new(panel, Vec3::new(390.0, 200.0, 330.0))));

    let mut lights = HittableList::from(ceiling);
    lights.add(wall);
    lights.add(lamp);

    Scene {
        world: BvhNode::from_list(&world),
        lights,
        camera: box_camera(),
    }
}
