//! Skeleton-relative morphology scaling.
//!
//! Recipe multipliers map to local joint scales: legs stretch on Y with a
//! damped thickness, arms stretch on X (T-pose), hands and feet undo their
//! parent's scale, the head scales uniformly and clavicles widen on X. The
//! root rises with leg length so the feet stay on the ground.

use avatarforge_spec::{CanonicalJoint, JointTable, Recipe, Skeleton};
use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Root height correction per unit of leg length change.
pub const HEIGHT_FACTOR: f32 = 90.0;

/// Fraction of the thickness change applied to legs.
pub const LEG_THICKNESS_DAMPING: f32 = 0.5;

/// Per-joint local scales computed from a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphologyScales {
    pub joint_scales: Vec<(CanonicalJoint, Vec3)>,
    /// Vertical offset applied to root joints.
    pub root_offset_y: f32,
}

fn recip(value: f32) -> f32 {
    if value.abs() > f32::EPSILON {
        1.0 / value
    } else {
        1.0
    }
}

impl MorphologyScales {
    /// Computes the scale table for a recipe.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        use CanonicalJoint::*;

        let leg = recipe.leg_length;
        let arm = recipe.arm_length;
        let thick = recipe.thickness;
        let leg_thick = 1.0 + (thick - 1.0) * LEG_THICKNESS_DAMPING;

        let leg_scale = Vec3::new(leg_thick, leg, leg_thick);
        let foot_scale = Vec3::new(recip(leg_thick), recip(leg), recip(leg_thick));
        let arm_scale = Vec3::new(arm, thick, thick);
        let hand_scale = Vec3::new(recip(arm), recip(thick), recip(thick));
        let clavicle_scale = Vec3::new(recipe.shoulder_width, 1.0, 1.0);

        let joint_scales = vec![
            (LeftUpLeg, leg_scale),
            (RightUpLeg, leg_scale),
            (LeftLeg, leg_scale),
            (RightLeg, leg_scale),
            (LeftFoot, foot_scale),
            (RightFoot, foot_scale),
            (LeftArm, arm_scale),
            (RightArm, arm_scale),
            (LeftForeArm, arm_scale),
            (RightForeArm, arm_scale),
            (LeftHand, hand_scale),
            (RightHand, hand_scale),
            (Head, Vec3::splat(recipe.head_size)),
            (LeftShoulder, clavicle_scale),
            (RightShoulder, clavicle_scale),
        ];

        Self {
            joint_scales,
            root_offset_y: (leg - 1.0) * HEIGHT_FACTOR,
        }
    }

    /// Local scale for a canonical joint, identity when unscaled.
    pub fn scale_for(&self, joint: CanonicalJoint) -> Vec3 {
        self.joint_scales
            .iter()
            .find(|(j, _)| *j == joint)
            .map(|(_, scale)| *scale)
            .unwrap_or(Vec3::ONE)
    }

    /// Scales keyed by skeleton index. Joints the rig lacks are skipped.
    pub fn resolve(&self, table: &JointTable) -> Vec<(usize, Vec3)> {
        self.joint_scales
            .iter()
            .filter_map(|(joint, scale)| table.resolve(*joint).map(|index| (index, *scale)))
            .collect()
    }

    /// World transforms of every joint with the scales applied.
    ///
    /// The skeleton itself is not modified.
    pub fn world_transforms(&self, skeleton: &Skeleton) -> Vec<Affine3A> {
        let mut local_scales = vec![Vec3::ONE; skeleton.len()];
        for (index, scale) in self.resolve(skeleton.joint_table()) {
            local_scales[index] = scale;
        }

        let joints = skeleton.joints();
        let mut world = vec![Affine3A::IDENTITY; joints.len()];
        for &index in skeleton.evaluation_order() {
            let joint = &joints[index];
            let local = Affine3A::from_scale_rotation_translation(
                local_scales[index],
                joint.rest_rotation.unwrap_or(Quat::IDENTITY),
                joint.rest_translation,
            );
            world[index] = match usize::try_from(joint.parent_index) {
                Ok(parent) => world[parent] * local,
                Err(_) => Affine3A::from_translation(Vec3::Y * self.root_offset_y) * local,
            };
        }
        world
    }
}
