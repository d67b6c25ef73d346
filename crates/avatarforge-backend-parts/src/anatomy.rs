//! Body proportions and limb anatomy data.
//!
//! Distances are in centimeters with the avatar standing on `y = 0`, facing
//! `+Z`, arms out along `±X` (T-pose). The left side of the body is `+X`.

use avatarforge_spec::{Recipe, Side};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;

/// Neutral body proportions, scaled by the recipe multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestProportions {
    pub ankle_height: f32,
    pub shin_length: f32,
    pub thigh_length: f32,
    /// Pelvis center above the hip joints.
    pub pelvis_offset: f32,
    /// Hip joints to shoulder line.
    pub torso_length: f32,
    pub neck_length: f32,
    pub head_length: f32,
    /// Shoulder joint distance from the center line.
    pub shoulder_offset: f32,
    /// Hip joint distance from the center line.
    pub hip_offset: f32,
    pub upper_arm_length: f32,
    pub forearm_length: f32,
}

impl Default for RestProportions {
    fn default() -> Self {
        Self {
            ankle_height: 8.0,
            shin_length: 42.0,
            thigh_length: 42.0,
            pelvis_offset: 3.0,
            torso_length: 53.0,
            neck_length: 5.0,
            head_length: 28.0,
            shoulder_offset: 18.0,
            hip_offset: 9.0,
            upper_arm_length: 27.0,
            forearm_length: 25.0,
        }
    }
}

/// Recipe-scaled body landmarks. Sided landmarks are stored for the left side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFrame {
    pub pelvis: Vec3,
    pub crown: Vec3,
    pub shoulder: Vec3,
    pub hip: Vec3,
    pub upper_arm_length: f32,
    pub forearm_length: f32,
    pub thigh_length: f32,
    pub shin_length: f32,
}

impl BodyFrame {
    /// Scales the neutral proportions by the recipe multipliers.
    pub fn new(recipe: &Recipe, proportions: &RestProportions) -> Self {
        let height = recipe.height_scale;
        let width = recipe.width_scale;

        let thigh_length = proportions.thigh_length * recipe.leg_length * height;
        let shin_length = proportions.shin_length * recipe.leg_length * height;
        let hip_y = proportions.ankle_height * height + shin_length + thigh_length;
        let shoulder_y = hip_y + proportions.torso_length * height;
        let crown_y = shoulder_y
            + proportions.neck_length * height
            + proportions.head_length * height * recipe.head_size;

        Self {
            pelvis: Vec3::new(0.0, hip_y + proportions.pelvis_offset * height, 0.0),
            crown: Vec3::new(0.0, crown_y, 0.0),
            shoulder: Vec3::new(
                proportions.shoulder_offset * recipe.shoulder_width * width,
                shoulder_y,
                0.0,
            ),
            hip: Vec3::new(proportions.hip_offset * width, hip_y, 0.0),
            upper_arm_length: proportions.upper_arm_length * recipe.arm_length * height,
            forearm_length: proportions.forearm_length * recipe.arm_length * height,
            thigh_length,
            shin_length,
        }
    }
}

/// Limb family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimbKind {
    Arm,
    Leg,
}

impl LimbKind {
    /// Descriptor name for the limb on `side`.
    pub fn part_name(&self, side: Side) -> &'static str {
        match (self, side) {
            (LimbKind::Arm, Side::Left) => "LeftArm",
            (LimbKind::Arm, Side::Right) => "RightArm",
            (LimbKind::Leg, Side::Left) => "LeftLeg",
            (LimbKind::Leg, Side::Right) => "RightLeg",
        }
    }

    /// Rest direction from the origin joint toward the extremity.
    pub fn rest_direction(&self, mirror: f32) -> Vec3 {
        match self {
            LimbKind::Arm => Vec3::new(mirror, 0.0, 0.0),
            LimbKind::Leg => Vec3::NEG_Y,
        }
    }

    /// Swing rotation axis.
    pub fn swing_axis(&self) -> Vec3 {
        match self {
            LimbKind::Arm => Vec3::Z,
            LimbKind::Leg => Vec3::X,
        }
    }

    /// Signed swing angle in radians for a recipe swing in degrees.
    ///
    /// Positive arm swing lowers both arms; positive leg swing moves the
    /// foot forward (`+Z`).
    pub fn swing_angle(&self, swing_deg: f32, mirror: f32) -> f32 {
        match self {
            LimbKind::Arm => -mirror * swing_deg.to_radians(),
            LimbKind::Leg => -swing_deg.to_radians(),
        }
    }
}

/// Everything the limb generator needs for one limb family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbAnatomy {
    pub kind: LimbKind,
    /// Origin joint on the left side.
    pub origin: Vec3,
    pub upper_length: f32,
    pub lower_length: f32,
    pub base_radius: f32,
    pub bulge: f32,
}

impl LimbAnatomy {
    /// Arm anatomy from the body frame.
    pub fn arm(frame: &BodyFrame, recipe: &Recipe, config: &SolverConfig) -> Self {
        let girth = recipe.thickness * recipe.width_scale;
        Self {
            kind: LimbKind::Arm,
            origin: frame.shoulder,
            upper_length: frame.upper_arm_length,
            lower_length: frame.forearm_length,
            base_radius: config.arm_radius * girth,
            bulge: config.arm_bulge * girth,
        }
    }

    /// Leg anatomy from the body frame.
    pub fn leg(frame: &BodyFrame, recipe: &Recipe, config: &SolverConfig) -> Self {
        let girth = recipe.thickness * recipe.width_scale;
        Self {
            kind: LimbKind::Leg,
            origin: frame.hip,
            upper_length: frame.thigh_length,
            lower_length: frame.shin_length,
            base_radius: config.leg_radius * girth,
            bulge: config.leg_bulge * girth,
        }
    }

    /// Origin joint mirrored to `side`.
    pub fn origin_for(&self, side: Side) -> Vec3 {
        Vec3::new(self.origin.x * side.mirror(), self.origin.y, self.origin.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_frame_landmarks() {
        let frame = BodyFrame::new(&Recipe::default(), &RestProportions::default());
        assert_eq!(frame.hip, Vec3::new(9.0, 92.0, 0.0));
        assert_eq!(frame.pelvis.y, 95.0);
        assert_eq!(frame.shoulder, Vec3::new(18.0, 145.0, 0.0));
        assert_eq!(frame.crown.y, 178.0);
    }

    #[test]
    fn test_leg_length_raises_hips() {
        let recipe = Recipe {
            leg_length: 1.5,
            ..Default::default()
        };
        let frame = BodyFrame::new(&recipe, &RestProportions::default());
        assert_eq!(frame.thigh_length, 63.0);
        assert_eq!(frame.hip.y, 8.0 + 63.0 + 63.0);
    }

    #[test]
    fn test_shoulder_width_moves_shoulders_only() {
        let recipe = Recipe {
            shoulder_width: 2.0,
            ..Default::default()
        };
        let frame = BodyFrame::new(&recipe, &RestProportions::default());
        assert_eq!(frame.shoulder.x, 36.0);
        assert_eq!(frame.hip.x, 9.0);
    }

    #[test]
    fn test_swing_angles_mirror_arms_only() {
        assert_eq!(
            LimbKind::Arm.swing_angle(90.0, 1.0),
            -LimbKind::Arm.swing_angle(90.0, -1.0)
        );
        assert_eq!(
            LimbKind::Leg.swing_angle(30.0, 1.0),
            LimbKind::Leg.swing_angle(30.0, -1.0)
        );
    }
}
