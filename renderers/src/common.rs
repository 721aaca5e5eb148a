//! Shared direct-lighting estimation.
//!
//! Both the surface and the medium estimator combine one light sample with
//! one scattering sample under the power heuristic. Delta lights skip the
//! MIS weight on the light side and are unreachable from the scattering
//! side; delta BSDF lobes are the mirror case.

use rad_core::bsdf::{Bsdf, BsdfContext, LobeType};
use rad_core::common::*;
use rad_core::geometry::{abs_cos_theta, Ray, Vector3f};
use rad_core::interaction::{MediumInteraction, SurfaceInteraction, RAY_EPSILON};
use rad_core::light::{DirectionSample, ReferencePoint};
use rad_core::medium::Medium;
use rad_core::sampler::Sampler;
use rad_core::sampling::power_heuristic;
use rad_core::scene::Scene;
use rad_core::spectrum::Spectrum;

/// Outcome of tracking a camera ray through a participating medium.
pub enum MediumEvent {
    /// The ray crossed the medium segment; the weight is the ratio-tracking
    /// transmittance estimate.
    Escaped(Spectrum),

    /// A real scattering event, with the accumulated path weight (the
    /// scattering coefficient and all tracking ratios folded in).
    Scattered(MediumInteraction, Spectrum),
}

/// Index of the largest channel, used to pick the tracking channel.
fn dominant_channel(s: &Spectrum) -> usize {
    if s.r >= s.g && s.r >= s.b {
        0
    } else if s.g >= s.b {
        1
    } else {
        2
    }
}

/// Track a ray through a medium with null-collision (delta) tracking.
///
/// Free flights are sampled against the majorant; each collision is a real
/// scatter with probability `σt/majorant` in the tracking channel, otherwise
/// a null collision whose weight keeps the estimator unbiased. The ray's
/// `t_max` must already be clipped to the first surface hit.
///
/// * `medium`  - The medium.
/// * `ray`     - The clipped camera ray.
/// * `sampler` - Sample source.
pub fn sample_medium_event(
    medium: &dyn Medium,
    ray: &Ray,
    sampler: &mut dyn Sampler,
) -> MediumEvent {
    let channel = dominant_channel(&medium.majorant());
    let mut weight = Spectrum::ONE;
    let mut segment = *ray;
    loop {
        let Some(mi) = medium.sample_interaction(&segment, sampler.next_1d(), channel) else {
            return MediumEvent::Escaped(weight);
        };
        let (tr, pdf) = medium.eval_tr_and_pdf(&mi, INFINITY);
        let step = tr / pdf;
        let m = mi.majorant[channel];
        let p_real = if m > 0.0 {
            (mi.sigma_t[channel] / m).min(1.0)
        } else {
            0.0
        };
        if p_real > 0.0 && sampler.next_1d() < p_real {
            let beta = weight * step * mi.sigma_s / p_real;
            return MediumEvent::Scattered(mi, beta);
        }
        weight = weight * step * mi.sigma_n / (1.0 - p_real);
        if weight.max_channel() <= 0.0 {
            return MediumEvent::Escaped(Spectrum::ZERO);
        }
        segment = Ray {
            t_min: mi.t,
            ..segment
        };
    }
}

/// Ratio-tracking transmittance estimate along a shadow ray.
///
/// * `medium`  - The medium.
/// * `ray`     - The shadow ray, clipped to the light sample.
/// * `sampler` - Sample source.
pub fn transmittance(medium: &dyn Medium, ray: &Ray, sampler: &mut dyn Sampler) -> Spectrum {
    let channel = dominant_channel(&medium.majorant());
    let mut weight = Spectrum::ONE;
    let mut segment = *ray;
    loop {
        let Some(mi) = medium.sample_interaction(&segment, sampler.next_1d(), channel) else {
            // Survival past the segment cancels against its own density.
            return weight;
        };
        let (tr, pdf) = medium.eval_tr_and_pdf(&mi, INFINITY);
        weight = weight * (tr / pdf) * mi.sigma_n;
        if weight.max_channel() <= 0.0 {
            return Spectrum::ZERO;
        }
        segment = Ray {
            t_min: mi.t,
            ..segment
        };
    }
}

/// One-sample MIS estimate of direct lighting at a surface point.
///
/// * `scene`   - The scene.
/// * `si`      - The shaded surface interaction.
/// * `bsdf`    - The surface material.
/// * `sampler` - Sample source.
pub fn estimate_direct_surface(
    scene: &Scene,
    si: &SurfaceInteraction,
    bsdf: &dyn Bsdf,
    sampler: &mut dyn Sampler,
) -> Spectrum {
    let ctx = BsdfContext::default();
    let r = ReferencePoint::on_surface(si.p, si.n);
    let mut l = Spectrum::ZERO;

    // Light sampling.
    if let Some((_, ds, radiance)) = scene.sample_light_direction(&r, sampler) {
        if !radiance.is_black() && ds.pdf > 0.0 {
            let wi = si.frame.to_local(&ds.wi);
            let f = bsdf.eval(&ctx, si, &wi) * abs_cos_theta(&wi);
            if !f.is_black() && !scene.is_occluded_dir(&r, &ds) {
                let weight = if ds.delta {
                    1.0
                } else {
                    power_heuristic(1, ds.pdf, 1, bsdf.pdf(&ctx, si, &wi))
                };
                l += f * radiance * (weight / ds.pdf);
            }
        }
    }

    // BSDF sampling; only area emitters are reachable this way.
    let u_lobe = sampler.next_1d();
    let u_dir = sampler.next_2d();
    let (bs, f_over_pdf) = bsdf.sample(&ctx, si, u_lobe, &u_dir);
    if bs.is_valid() && !f_over_pdf.is_black() && !bs.lobe.contains(LobeType::NULL) {
        let wi_world = si.frame.to_world(&bs.wi);
        let ray = si.spawn_ray(&wi_world);
        if let Some(hit) = scene.intersect(&ray) {
            if let Some(light_index) = scene.light_index_for_shape(hit.shape_index) {
                let emitted = scene.emission(&hit);
                if !emitted.is_black() {
                    let weight = if bs.lobe.contains(LobeType::DELTA) {
                        1.0
                    } else {
                        let toward = DirectionSample {
                            wi: wi_world,
                            distance: hit.t,
                            pdf: 0.0,
                            delta: false,
                        };
                        let light_pdf = scene.pdf_light_direction(light_index, &r, &toward);
                        power_heuristic(1, bs.pdf, 1, light_pdf)
                    };
                    l += f_over_pdf * emitted * weight;
                }
            }
        }
    }
    l
}

/// One-sample MIS estimate of direct lighting at a medium scattering point.
/// Shadow and phase rays are attenuated through the same medium.
///
/// * `scene`   - The scene.
/// * `medium`  - The medium containing the scattering point.
/// * `mi`      - The scattering point.
/// * `wo`      - World-space direction toward the viewer.
/// * `sampler` - Sample source.
pub fn estimate_direct_medium(
    scene: &Scene,
    medium: &dyn Medium,
    mi: &MediumInteraction,
    wo: &Vector3f,
    sampler: &mut dyn Sampler,
) -> Spectrum {
    let r = ReferencePoint::in_medium(mi.p);
    let mut l = Spectrum::ZERO;

    // Light sampling.
    if let Some((_, ds, radiance)) = scene.sample_light_direction(&r, sampler) {
        if !radiance.is_black() && ds.pdf > 0.0 {
            let phase = mi.phase.p(wo, &ds.wi);
            if phase > 0.0 && !scene.is_occluded_dir(&r, &ds) {
                let shadow = Ray::new(mi.p, ds.wi, RAY_EPSILON, ds.distance);
                let tr = transmittance(medium, &shadow, sampler);
                let weight = if ds.delta {
                    1.0
                } else {
                    power_heuristic(1, ds.pdf, 1, phase)
                };
                l += radiance * tr * (phase * weight / ds.pdf);
            }
        }
    }

    // Phase sampling; the phase value equals its own density, so the sampled
    // throughput is one.
    let u = sampler.next_2d();
    let (wi, phase) = mi.phase.sample_p(wo, &u);
    if phase > 0.0 {
        let ray = Ray::new(mi.p, wi, RAY_EPSILON, INFINITY);
        if let Some(hit) = scene.intersect(&ray) {
            if let Some(light_index) = scene.light_index_for_shape(hit.shape_index) {
                let emitted = scene.emission(&hit);
                if !emitted.is_black() {
                    let toward = DirectionSample {
                        wi,
                        distance: hit.t,
                        pdf: 0.0,
                        delta: false,
                    };
                    let light_pdf = scene.pdf_light_direction(light_index, &r, &toward);
                    let weight = power_heuristic(1, phase, 1, light_pdf);
                    let tr = transmittance(medium, &ray.clipped(hit.t), sampler);
                    l += emitted * tr * weight;
                }
            }
        }
    }
    l
}
