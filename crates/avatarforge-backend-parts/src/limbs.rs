//! Limb tube generation, shared by arms and legs on both sides.

use std::f32::consts::PI;

use avatarforge_spec::{BodyPartDescriptor, CapMode, Side};
use glam::{Quat, Vec3};

use crate::anatomy::LimbAnatomy;
use crate::line::sample_t;

/// Samples per limb path: origin joint, mid joint, extremity.
pub const LIMB_SAMPLES: usize = 3;

/// Pose applied to a limb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbPose {
    /// Swing in degrees about the limb's swing axis.
    pub swing_deg: f32,
    /// Fraction of the swing undone at the mid joint.
    pub bend_ratio: f32,
}

/// Builds the limb path: origin, mid, distal.
///
/// The whole limb swings about the origin joint, then the distal segment
/// counter-rotates about the mid joint by `-swing * bend_ratio`.
pub fn limb_path(anatomy: &LimbAnatomy, side: Side, pose: LimbPose) -> [Vec3; LIMB_SAMPLES] {
    let mirror = side.mirror();
    let axis = anatomy.kind.swing_axis();
    let direction = anatomy.kind.rest_direction(mirror);
    let angle = anatomy.kind.swing_angle(pose.swing_deg, mirror);

    let swing = Quat::from_axis_angle(axis, angle);
    let bend = Quat::from_axis_angle(axis, -angle * pose.bend_ratio);

    let origin = anatomy.origin_for(side);
    let mid = origin + swing * (direction * anatomy.upper_length);
    let distal = mid + bend * (swing * (direction * anatomy.lower_length));

    [origin, mid, distal]
}

/// Radius per limb sample: `base + bulge * sin(pi * t)`, last sample tapered.
pub fn limb_radii(anatomy: &LimbAnatomy, taper_factor: f32) -> Vec<f32> {
    (0..LIMB_SAMPLES)
        .map(|i| {
            let t = sample_t(i, LIMB_SAMPLES);
            let radius = anatomy.base_radius + anatomy.bulge * (PI * t).sin();
            let radius = if i == LIMB_SAMPLES - 1 {
                radius * taper_factor
            } else {
                radius
            };
            radius.max(0.0)
        })
        .collect()
}

/// Builds the descriptor for one limb.
pub fn generate_limb(
    anatomy: &LimbAnatomy,
    side: Side,
    pose: LimbPose,
    taper_factor: f32,
    color: &str,
) -> BodyPartDescriptor {
    BodyPartDescriptor::tube(
        anatomy.kind.part_name(side),
        limb_path(anatomy, side, pose).to_vec(),
        limb_radii(anatomy, taper_factor),
        color,
    )
    .with_cap_mode(CapMode::Both)
}
