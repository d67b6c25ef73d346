//! Single torso/head tube for the `tube` body style.

use avatarforge_spec::{BodyPartDescriptor, CapMode, Recipe};
use glam::Vec3;

use crate::anatomy::BodyFrame;
use crate::config::{SolverConfig, TubeBand};
use crate::line::{create_line, sample_t};

/// Descriptor name of the torso/head tube.
pub const TORSO_TUBE: &str = "TorsoTube";

/// Radius at `t` along the profile, linear between neighboring bands.
///
/// Values outside the first/last band hold the end radius. An empty profile
/// yields 1.0.
pub fn band_radius(bands: &[TubeBand], t: f32) -> f32 {
    let (Some(first), Some(last)) = (bands.first(), bands.last()) else {
        return 1.0;
    };
    if t <= first.t {
        return first.radius;
    }
    if t >= last.t {
        return last.radius;
    }
    for pair in bands.windows(2) {
        let (lo, hi) = (&pair[0], &pair[1]);
        if t >= lo.t && t <= hi.t {
            let span = hi.t - lo.t;
            if span <= f32::EPSILON {
                return hi.radius;
            }
            let local = (t - lo.t) / span;
            return lo.radius + (hi.radius - lo.radius) * local;
        }
    }
    last.radius
}

/// Builds the pelvis-to-crown tube.
pub fn generate_torso_tube(
    frame: &BodyFrame,
    recipe: &Recipe,
    config: &SolverConfig,
    color: &str,
) -> BodyPartDescriptor {
    let samples = config.tube_samples;
    let path = create_line(frame.pelvis, frame.crown, samples);
    let radii = (0..samples)
        .map(|i| band_radius(&config.tube_bands, sample_t(i, samples)) * recipe.width_scale)
        .collect();

    BodyPartDescriptor::tube(TORSO_TUBE, path, radii, color)
        .with_scale(Vec3::new(1.0, 1.0, config.tube_depth_ratio))
        .with_cap_mode(CapMode::Both)
}
