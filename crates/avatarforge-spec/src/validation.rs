//! Recipe validation.
//!
//! The solver accepts any recipe and never fails; validation is the
//! opt-in gate callers run before persisting or sharing a recipe.

use std::sync::OnceLock;

use regex::Regex;

use crate::equipment::{is_none_type, EquipmentSlot};
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::recipe::Recipe;

/// Regex pattern for recipe colors.
pub const HEX_COLOR_PATTERN: &str = r"^#[0-9A-Fa-f]{6}$";

/// Allowed swing range in degrees for arms and legs.
pub const SWING_RANGE_DEG: (f32, f32) = (-180.0, 180.0);

static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();

fn hex_color_regex() -> &'static Regex {
    HEX_COLOR_REGEX.get_or_init(|| Regex::new(HEX_COLOR_PATTERN).expect("invalid regex pattern"))
}

/// Validates a recipe and returns a validation result.
///
/// # Example
/// ```
/// use avatarforge_spec::recipe::Recipe;
/// use avatarforge_spec::validation::validate_recipe;
///
/// let recipe = Recipe {
///     torso_slot: "PlateArmor".to_string(),
///     ..Default::default()
/// };
/// assert!(validate_recipe(&recipe).is_ok());
/// ```
pub fn validate_recipe(recipe: &Recipe) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_colors(recipe, &mut result);
    validate_multipliers(recipe, &mut result);
    validate_pose(recipe, &mut result);
    check_slot_warnings(recipe, &mut result);

    result
}

fn validate_colors(recipe: &Recipe, result: &mut ValidationResult) {
    let colors = [
        ("skin_color", &recipe.skin_color),
        ("cloth_color", &recipe.cloth_color),
        ("leather_color", &recipe.leather_color),
        ("metal_color", &recipe.metal_color),
        ("chain_color", &recipe.chain_color),
        ("wood_color", &recipe.wood_color),
    ];
    for (field, value) in colors {
        if !hex_color_regex().is_match(value) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidColor,
                format!("color must match '{}', got '{}'", HEX_COLOR_PATTERN, value),
                field,
            ));
        }
    }
}

fn validate_multipliers(recipe: &Recipe, result: &mut ValidationResult) {
    let multipliers = [
        ("height_scale", recipe.height_scale),
        ("width_scale", recipe.width_scale),
        ("shoulder_width", recipe.shoulder_width),
        ("leg_length", recipe.leg_length),
        ("arm_length", recipe.arm_length),
        ("head_size", recipe.head_size),
        ("thickness", recipe.thickness),
    ];
    for (field, value) in multipliers {
        if !value.is_finite() || value <= 0.0 {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidMultiplier,
                format!("multiplier must be positive and finite, got {}", value),
                field,
            ));
        }
    }
}

fn validate_pose(recipe: &Recipe, result: &mut ValidationResult) {
    let (min, max) = SWING_RANGE_DEG;
    for (field, value) in [
        ("arm_swing_deg", recipe.arm_swing_deg),
        ("leg_swing_deg", recipe.leg_swing_deg),
    ] {
        if !(min..=max).contains(&value) {
            result.add_error(ValidationError::with_path(
                ErrorCode::PoseOutOfRange,
                format!("swing must be within [{}, {}] degrees, got {}", min, max, value),
                field,
            ));
        }
    }

    if !(0.0..=1.0).contains(&recipe.bend_ratio) {
        result.add_error(ValidationError::with_path(
            ErrorCode::PoseOutOfRange,
            format!("bend_ratio must be within [0, 1], got {}", recipe.bend_ratio),
            "bend_ratio",
        ));
    }
}

fn check_slot_warnings(recipe: &Recipe, result: &mut ValidationResult) {
    for slot in EquipmentSlot::ALL {
        let type_name = recipe.slot_type(slot);
        if is_none_type(type_name) {
            continue;
        }
        let field = format!("{}_slot", slot.as_str().to_ascii_lowercase());

        if type_name.contains('_') {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::SlotTypeUnderscore,
                format!(
                    "slot type '{}' contains '_'; only the text before it is kept",
                    type_name
                ),
                field.clone(),
            ));
        }

        let (class, matched) = slot.classify(type_name);
        if !matched {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::UnknownSlotMaterial,
                format!(
                    "slot type '{}' matches no material keyword, using {:?}",
                    type_name, class
                ),
                field,
            ));
        }
    }
}
