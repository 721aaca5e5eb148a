//! End-to-end renders of small analytic scenes.

use rad_accel::Bvh;
use rad_bsdfs::Diffuse;
use rad_core::camera::PerspectiveCamera;
use rad_core::common::*;
use rad_core::film::Film;
use rad_core::geometry::{Point3f, Ray, Vector3f};
use rad_core::light::ArcLight;
use rad_core::medium::ArcMedium;
use rad_core::renderer::{ArcRenderer, Renderer};
use rad_core::scene::{ArcScene, Scene};
use rad_core::shape::ArcShape;
use rad_core::spectrum::Spectrum;
use rad_core::texture::ConstantTexture;
use rad_lights::{DiffuseAreaLight, PointLight};
use rad_media::HomogeneousMedium;
use rad_renderers::{AoRenderer, DirectRenderer, JobState, RenderJob, RenderOptions};
use rad_samplers::IndependentSampler;
use rad_shapes::Sphere;
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn look_at_camera(eye: Point3f) -> Arc<PerspectiveCamera> {
    Arc::new(PerspectiveCamera::new(
        eye,
        Point3f::default(),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        1.0,
    ))
}

/// Unit sphere at the origin, diffuse albedo `rho`, point light on the +z
/// axis at `light_z` with intensity `intensity`.
fn sphere_and_point_light(rho: Float, light_z: Float, intensity: Float) -> ArcScene {
    let sphere: ArcShape = Arc::new(Sphere::new(Point3f::default(), 1.0));
    let shapes = vec![Arc::clone(&sphere)];
    let accel = Arc::new(Bvh::new(shapes.clone()));
    let bsdf: rad_core::bsdf::ArcBsdf = Arc::new(Diffuse::new(Arc::new(ConstantTexture::new(
        Spectrum::splat(rho),
    ))));
    let light: ArcLight = Arc::new(PointLight::new(
        Point3f::new(0.0, 0.0, light_z),
        Spectrum::splat(intensity),
    ));
    Arc::new(Scene::new(
        accel,
        shapes,
        vec![light],
        Vec::new(),
        look_at_camera(Point3f::new(0.0, 0.0, 3.0)),
        &[],
        &[(0, bsdf)],
        &[],
        None,
    ))
}

#[test]
fn direct_lighting_matches_the_closed_form() {
    // Camera ray down the z-axis hits the sphere at (0, 0, 1) with normal +z.
    // The point light is head-on, so L = rho/pi * cos(0) * I / d^2.
    let rho = 0.6;
    let intensity = 20.0;
    let scene = sphere_and_point_light(rho, 5.0, intensity);
    let renderer = DirectRenderer::new(1);
    let mut sampler = IndependentSampler::new(7);
    let ray = Ray::new(
        Point3f::new(0.0, 0.0, 3.0),
        Vector3f::new(0.0, 0.0, -1.0),
        0.0,
        INFINITY,
    );

    let mut sum = Spectrum::ZERO;
    let n = 64;
    for _ in 0..n {
        let l = renderer.li(&ray, &scene, &mut sampler);
        assert!(l.is_valid());
        sum += l;
    }
    let mean = sum / n as Float;
    let expected = rho * INV_PI * intensity / 16.0;
    assert!(
        float_cmp::approx_eq!(Float, mean.g, expected, epsilon = 1e-3),
        "mean = {}, expected = {expected}",
        mean.g
    );
}

#[test]
fn worker_count_does_not_change_the_image() {
    init_logging();
    let scene = sphere_and_point_light(0.5, 4.0, 10.0);
    let renderer: ArcRenderer = Arc::new(DirectRenderer::new(1));
    let options = |workers| RenderOptions {
        samples_per_pixel: 4,
        tile_size: 8,
        workers,
    };

    let mut images = Vec::new();
    for workers in [1, 3] {
        let film = Arc::new(Film::new(32, 24));
        let mut job = RenderJob::new(
            Arc::clone(&scene),
            Arc::clone(&renderer),
            Arc::clone(&film),
            Box::new(IndependentSampler::new(0)),
            options(workers),
        );
        job.start();
        job.wait();
        assert!(job.is_complete());
        assert_eq!(job.tiles_completed(), 4 * 3);
        images.push(film.to_vec());
    }
    assert_eq!(images[0], images[1]);
}

#[test]
fn stop_terminates_quickly_with_a_valid_buffer() {
    init_logging();
    let scene = sphere_and_point_light(0.5, 4.0, 10.0);
    let renderer: ArcRenderer = Arc::new(AoRenderer::new(64, 0.0));
    let film = Arc::new(Film::new(64, 64));
    let mut job = RenderJob::new(
        Arc::clone(&scene),
        renderer,
        Arc::clone(&film),
        Box::new(IndependentSampler::new(1)),
        RenderOptions {
            samples_per_pixel: 512,
            tile_size: 16,
            workers: 2,
        },
    );
    job.start();
    job.stop();
    job.wait();
    assert!(matches!(job.state(), JobState::Stopped | JobState::Complete));
    for p in film.to_vec() {
        assert!(p.is_valid());
    }
}

#[test]
fn absorbing_medium_attenuates_surface_emission() {
    // Emissive unit sphere seen through a purely absorbing medium: the
    // expected radiance is Le * exp(-sigma_a * distance). Tracking terminates
    // absorbed paths, so the estimate converges to the analytic transmittance.
    let sphere: ArcShape = Arc::new(Sphere::new(Point3f::default(), 1.0));
    let shapes = vec![Arc::clone(&sphere)];
    let accel = Arc::new(Bvh::new(shapes.clone()));
    let radiance = 2.0;
    let light: ArcLight = Arc::new(DiffuseAreaLight::new(
        Arc::clone(&sphere),
        Arc::new(ConstantTexture::new(Spectrum::splat(radiance))),
    ));
    let sigma_a = 0.5;
    let medium: ArcMedium = Arc::new(HomogeneousMedium::new(
        Spectrum::splat(sigma_a),
        Spectrum::ZERO,
        0.0,
    ));
    let scene = Arc::new(Scene::new(
        accel,
        shapes,
        vec![light],
        vec![medium],
        look_at_camera(Point3f::new(0.0, 0.0, 4.0)),
        &[(0, 0)],
        &[],
        &[(0, 0)],
        Some(0),
    ));
    assert!(scene.interior_medium_for_shape(0).is_some());

    let renderer = DirectRenderer::new(1);
    let mut sampler = IndependentSampler::new(42);
    let ray = Ray::new(
        Point3f::new(0.0, 0.0, 4.0),
        Vector3f::new(0.0, 0.0, -1.0),
        0.0,
        INFINITY,
    );
    let mut sum = 0.0;
    let n = 40_000;
    for _ in 0..n {
        let l = renderer.li(&ray, &scene, &mut sampler);
        assert!(l.is_valid());
        sum += l.g;
    }
    let mean = sum / n as Float;
    // Camera at z = 4 hits the sphere at z = 1, so the optical depth is 1.5.
    let expected = radiance * (-sigma_a * 3.0).exp();
    assert!(
        (mean - expected).abs() < 0.05 * expected,
        "mean = {mean}, expected = {expected}"
    );
}
