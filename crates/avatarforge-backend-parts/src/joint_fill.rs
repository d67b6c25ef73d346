//! Joint-fill balls that hide seams where limb tubes meet.

use std::f32::consts::PI;

use avatarforge_spec::{BodyPartDescriptor, CapMode, Side};
use glam::Vec3;

use crate::anatomy::LimbKind;
use crate::line::{create_line, sample_t};

/// A joint that receives a fill ball, anchored to a limb path sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointFillSite {
    pub name: &'static str,
    pub limb: LimbKind,
    pub side: Side,
    /// Sample of the limb path the ball is centered on.
    pub path_index: usize,
}

/// Shoulders, elbows, hips and knees.
pub const JOINT_FILL_SITES: [JointFillSite; 8] = [
    JointFillSite { name: "JointLeftShoulder", limb: LimbKind::Arm, side: Side::Left, path_index: 0 },
    JointFillSite { name: "JointRightShoulder", limb: LimbKind::Arm, side: Side::Right, path_index: 0 },
    JointFillSite { name: "JointLeftElbow", limb: LimbKind::Arm, side: Side::Left, path_index: 1 },
    JointFillSite { name: "JointRightElbow", limb: LimbKind::Arm, side: Side::Right, path_index: 1 },
    JointFillSite { name: "JointLeftHip", limb: LimbKind::Leg, side: Side::Left, path_index: 0 },
    JointFillSite { name: "JointRightHip", limb: LimbKind::Leg, side: Side::Right, path_index: 0 },
    JointFillSite { name: "JointLeftKnee", limb: LimbKind::Leg, side: Side::Left, path_index: 1 },
    JointFillSite { name: "JointRightKnee", limb: LimbKind::Leg, side: Side::Right, path_index: 1 },
];

/// Builds a ball: a short vertical path whose radius goes 0, max, 0.
pub fn joint_ball(name: &str, anchor: Vec3, max_radius: f32, samples: usize, color: &str) -> BodyPartDescriptor {
    let path = create_line(Vec3::NEG_Y * max_radius, Vec3::Y * max_radius, samples);
    let radii = (0..samples)
        .map(|i| (max_radius * (PI * sample_t(i, samples)).sin()).max(0.0))
        .collect();
    BodyPartDescriptor::tube(name, path, radii, color)
        .with_origin(anchor)
        .with_cap_mode(CapMode::None)
}

/// Builds fill balls for every site whose limb is present in `limbs`.
///
/// Anchors use clamped path lookups, so a short limb path still yields a
/// ball at its last sample.
pub fn generate_joint_fills(
    limbs: &[BodyPartDescriptor],
    samples: usize,
    radius_scale: f32,
    color: &str,
) -> Vec<BodyPartDescriptor> {
    JOINT_FILL_SITES
        .iter()
        .filter_map(|site| {
            let limb_name = site.limb.part_name(site.side);
            let Some(limb) = limbs.iter().find(|d| d.name == limb_name) else {
                log::debug!("no {} path, skipping {}", limb_name, site.name);
                return None;
            };
            let anchor = limb.anchor_point(site.path_index)?;
            let max_radius = limb.radius_at(site.path_index) * radius_scale;
            Some(joint_ball(site.name, anchor, max_radius, samples, color))
        })
        .collect()
}
