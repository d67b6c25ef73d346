//! Recipe to descriptor list.

use avatarforge_spec::{BodyPartDescriptor, BodyStyle, MaterialClass, Recipe, Side};

use crate::anatomy::{BodyFrame, LimbAnatomy};
use crate::config::SolverConfig;
use crate::joint_fill::generate_joint_fills;
use crate::limbs::{generate_limb, LimbPose};
use crate::slots::{generate_slot_markers, normalize_color};
use crate::tube::generate_torso_tube;
use crate::weapons::generate_weapons;

/// Solves a recipe with the default configuration.
///
/// # Example
/// ```
/// use avatarforge_backend_parts::solve;
/// use avatarforge_spec::Recipe;
///
/// let recipe = Recipe {
///     torso_slot: "PlateArmor".to_string(),
///     metal_color: "#C0C0C0".to_string(),
///     ..Default::default()
/// };
/// let parts = solve(&recipe);
/// assert_eq!(parts.len(), 1);
/// assert_eq!(parts[0].name, "Torso_PlateArmor");
/// assert_eq!(parts[0].color, "#C0C0C0");
/// ```
pub fn solve(recipe: &Recipe) -> Vec<BodyPartDescriptor> {
    solve_with_config(recipe, &SolverConfig::default())
}

/// Solves a recipe into an ordered descriptor list.
///
/// Order: limbs (LeftArm, RightArm, LeftLeg, RightLeg), torso tube, joint
/// fills, weapons, then equipment markers Head through Feet. Pure and
/// deterministic; a recipe with nothing enabled yields an empty list.
pub fn solve_with_config(recipe: &Recipe, config: &SolverConfig) -> Vec<BodyPartDescriptor> {
    let mut parts = Vec::new();
    let skin = normalize_color(recipe.color_for(MaterialClass::Skin));

    if recipe.body_style.has_limbs() || recipe.joint_fill {
        let frame = BodyFrame::new(recipe, &config.proportions);
        let limbs = build_limbs(&frame, recipe, config, &skin);

        if recipe.body_style.has_limbs() {
            parts.extend(limbs.iter().cloned());
        }
        if recipe.body_style == BodyStyle::Tube {
            parts.push(generate_torso_tube(&frame, recipe, config, &skin));
        }
        if recipe.joint_fill {
            parts.extend(generate_joint_fills(
                &limbs,
                config.joint_fill_samples,
                config.joint_fill_scale,
                &skin,
            ));
        }
    }

    parts.extend(generate_weapons(recipe));
    parts.extend(generate_slot_markers(recipe));

    log::debug!("solved recipe '{}' into {} descriptors", recipe.name, parts.len());
    parts
}

fn build_limbs(
    frame: &BodyFrame,
    recipe: &Recipe,
    config: &SolverConfig,
    color: &str,
) -> Vec<BodyPartDescriptor> {
    let arm = LimbAnatomy::arm(frame, recipe, config);
    let leg = LimbAnatomy::leg(frame, recipe, config);
    let arm_pose = LimbPose {
        swing_deg: recipe.arm_swing_deg,
        bend_ratio: recipe.bend_ratio,
    };
    let leg_pose = LimbPose {
        swing_deg: recipe.leg_swing_deg,
        bend_ratio: recipe.bend_ratio,
    };

    [
        (&arm, Side::Left, arm_pose),
        (&arm, Side::Right, arm_pose),
        (&leg, Side::Left, leg_pose),
        (&leg, Side::Right, leg_pose),
    ]
    .into_iter()
    .map(|(anatomy, side, pose)| generate_limb(anatomy, side, pose, config.taper_factor, color))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatarforge_spec::EquipmentSlot;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn names(parts: &[BodyPartDescriptor]) -> Vec<&str> {
        parts.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_empty_recipe_yields_nothing() {
        assert!(solve(&Recipe::default()).is_empty());
    }

    #[test]
    fn test_full_output_order() {
        let recipe = Recipe {
            body_style: BodyStyle::Tube,
            joint_fill: true,
            has_sword: true,
            has_shield: true,
            ..Default::default()
        }
        .with_slot(EquipmentSlot::Feet, "LeatherBoots")
        .with_slot(EquipmentSlot::Head, "PlateHelm");

        let parts = solve(&recipe);
        assert_eq!(
            names(&parts),
            vec![
                "LeftArm",
                "RightArm",
                "LeftLeg",
                "RightLeg",
                "TorsoTube",
                "JointLeftShoulder",
                "JointRightShoulder",
                "JointLeftElbow",
                "JointRightElbow",
                "JointLeftHip",
                "JointRightHip",
                "JointLeftKnee",
                "JointRightKnee",
                "SwordHilt",
                "SwordGuard",
                "SwordBlade",
                "ShieldPlate",
                "ShieldHandle",
                "Head_PlateHelm",
                "Feet_LeatherBoots",
            ]
        );
    }

    #[test]
    fn test_limbs_style_has_no_tube() {
        let parts = solve(&Recipe {
            body_style: BodyStyle::Limbs,
            ..Default::default()
        });
        assert_eq!(names(&parts), vec!["LeftArm", "RightArm", "LeftLeg", "RightLeg"]);
        assert!(parts.iter().all(|p| p.color == "#D2B48C"));
    }

    #[test]
    fn test_joint_fill_without_limb_geometry() {
        let parts = solve(&Recipe {
            joint_fill: true,
            ..Default::default()
        });
        assert_eq!(parts.len(), 8);
        assert!(parts.iter().all(|p| p.name.starts_with("Joint") && p.origin.is_some()));
    }

    #[test]
    fn test_plate_armor_scenario() {
        let parts = solve(&Recipe {
            torso_slot: "PlateArmor".to_string(),
            metal_color: "#C0C0C0".to_string(),
            ..Default::default()
        });
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "Torso_PlateArmor");
        assert_eq!(parts[0].color, "#C0C0C0");
        assert!(parts[0].path.is_empty());
        assert!(parts[0].radii.is_empty());
    }

    #[test]
    fn test_solve_deterministic() {
        let recipe = Recipe {
            body_style: BodyStyle::Tube,
            joint_fill: true,
            has_spear: true,
            arm_swing_deg: 35.0,
            bend_ratio: 0.3,
            ..Default::default()
        };
        assert_eq!(solve(&recipe), solve(&recipe));
    }

    fn slot_type() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("None".to_string()),
            Just("PlateArmor".to_string()),
            Just("LeatherVest".to_string()),
            Just("ChainMail".to_string()),
            "[A-Za-z_]{0,12}",
        ]
    }

    proptest! {
        #[test]
        fn solve_is_total(
            style in prop_oneof![Just(BodyStyle::None), Just(BodyStyle::Limbs), Just(BodyStyle::Tube)],
            joint_fill in any::<bool>(),
            has_sword in any::<bool>(),
            has_spear in any::<bool>(),
            has_shield in any::<bool>(),
            leg_length in -2.0f32..4.0,
            arm_swing_deg in -720.0f32..720.0,
            bend_ratio in -1.0f32..2.0,
            torso in slot_type(),
            feet in slot_type(),
        ) {
            let recipe = Recipe {
                body_style: style,
                joint_fill,
                has_sword,
                has_spear,
                has_shield,
                leg_length,
                arm_swing_deg,
                bend_ratio,
                torso_slot: torso,
                feet_slot: feet,
                ..Default::default()
            };
            let parts = solve(&recipe);
            let markers = parts.iter().filter(|p| p.is_equipment()).count();
            prop_assert!(markers <= recipe.active_slots().count());
            prop_assert_eq!(parts.is_empty(), recipe.is_empty());
        }
    }
}
