//! The avatar recipe: a flat record of user-chosen sliders, enums and colors.
//!
//! Every field has a default that means "absent" (slot = `"None"`, weapon =
//! `false`, body style = `none`), so an empty JSON object is a valid recipe
//! that produces no geometry.

use serde::{Deserialize, Serialize};

use crate::equipment::{is_none_type, EquipmentSlot, MaterialClass, NONE_TYPE};
use crate::error::SpecError;

/// Procedural body geometry emitted by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyStyle {
    /// No procedural body; the skinned base mesh is the body.
    #[default]
    None,
    /// Tube limbs (arms and legs).
    Limbs,
    /// Tube limbs plus one banded torso/head tube.
    Tube,
}

impl BodyStyle {
    /// Returns true when limb tubes are generated.
    pub fn has_limbs(&self) -> bool {
        matches!(self, BodyStyle::Limbs | BodyStyle::Tube)
    }
}

/// Full set of user-chosen avatar parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Recipe {
    /// Display name.
    pub name: String,

    // Morphology multipliers
    /// Overall height multiplier.
    pub height_scale: f32,
    /// Overall width multiplier.
    pub width_scale: f32,
    /// Clavicle width multiplier.
    pub shoulder_width: f32,
    /// Leg length multiplier.
    pub leg_length: f32,
    /// Arm length multiplier.
    pub arm_length: f32,
    /// Uniform head multiplier.
    pub head_size: f32,
    /// Limb thickness multiplier.
    pub thickness: f32,

    // Procedural body
    /// Which procedural body geometry to emit.
    pub body_style: BodyStyle,
    /// Emit joint-fill balls at shoulders, elbows, hips and knees.
    pub joint_fill: bool,
    /// Arm swing in degrees (0 = T-pose, positive lowers the arms).
    pub arm_swing_deg: f32,
    /// Leg swing in degrees (positive swings forward).
    pub leg_swing_deg: f32,
    /// Fraction of the swing undone at the distal segment (fake elbow/knee bend).
    pub bend_ratio: f32,

    // Equipment slots
    pub head_slot: String,
    pub shoulders_slot: String,
    pub torso_slot: String,
    pub arms_slot: String,
    pub hands_slot: String,
    pub legs_slot: String,
    pub feet_slot: String,

    // Arsenal
    pub has_sword: bool,
    pub has_spear: bool,
    pub has_shield: bool,

    // Material colors
    pub skin_color: String,
    pub cloth_color: String,
    pub leather_color: String,
    pub metal_color: String,
    pub chain_color: String,
    pub wood_color: String,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            name: "Character".to_string(),
            height_scale: 1.0,
            width_scale: 1.0,
            shoulder_width: 1.0,
            leg_length: 1.0,
            arm_length: 1.0,
            head_size: 1.0,
            thickness: 1.0,
            body_style: BodyStyle::None,
            joint_fill: false,
            arm_swing_deg: 0.0,
            leg_swing_deg: 0.0,
            bend_ratio: 0.0,
            head_slot: NONE_TYPE.to_string(),
            shoulders_slot: NONE_TYPE.to_string(),
            torso_slot: NONE_TYPE.to_string(),
            arms_slot: NONE_TYPE.to_string(),
            hands_slot: NONE_TYPE.to_string(),
            legs_slot: NONE_TYPE.to_string(),
            feet_slot: NONE_TYPE.to_string(),
            has_sword: false,
            has_spear: false,
            has_shield: false,
            skin_color: "#D2B48C".to_string(),
            cloth_color: "#3B5998".to_string(),
            leather_color: "#3D2B1F".to_string(),
            metal_color: "#A8A9AD".to_string(),
            chain_color: "#7D7F83".to_string(),
            wood_color: "#8B5A2B".to_string(),
        }
    }
}

impl Recipe {
    /// Parses a recipe from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the recipe to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Converts the recipe to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, SpecError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Type string selected for a slot.
    pub fn slot_type(&self, slot: EquipmentSlot) -> &str {
        match slot {
            EquipmentSlot::Head => &self.head_slot,
            EquipmentSlot::Shoulders => &self.shoulders_slot,
            EquipmentSlot::Torso => &self.torso_slot,
            EquipmentSlot::Arms => &self.arms_slot,
            EquipmentSlot::Hands => &self.hands_slot,
            EquipmentSlot::Legs => &self.legs_slot,
            EquipmentSlot::Feet => &self.feet_slot,
        }
    }

    /// Returns a copy with `slot` set to `type_name`.
    pub fn with_slot(mut self, slot: EquipmentSlot, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        match slot {
            EquipmentSlot::Head => self.head_slot = type_name,
            EquipmentSlot::Shoulders => self.shoulders_slot = type_name,
            EquipmentSlot::Torso => self.torso_slot = type_name,
            EquipmentSlot::Arms => self.arms_slot = type_name,
            EquipmentSlot::Hands => self.hands_slot = type_name,
            EquipmentSlot::Legs => self.legs_slot = type_name,
            EquipmentSlot::Feet => self.feet_slot = type_name,
        }
        self
    }

    /// Slots with a non-`"None"` selection, in solver order.
    pub fn active_slots(&self) -> impl Iterator<Item = (EquipmentSlot, &str)> + '_ {
        EquipmentSlot::ALL
            .into_iter()
            .map(move |slot| (slot, self.slot_type(slot)))
            .filter(|(_, type_name)| !is_none_type(type_name))
    }

    /// Configured color for a material class.
    pub fn color_for(&self, class: MaterialClass) -> &str {
        match class {
            MaterialClass::Skin => &self.skin_color,
            MaterialClass::Cloth => &self.cloth_color,
            MaterialClass::Leather => &self.leather_color,
            MaterialClass::Metal => &self.metal_color,
            MaterialClass::Chain => &self.chain_color,
            MaterialClass::Wood => &self.wood_color,
        }
    }

    /// Returns true when the recipe asks for no geometry at all.
    pub fn is_empty(&self) -> bool {
        !self.body_style.has_limbs()
            && !self.joint_fill
            && !self.has_sword
            && !self.has_spear
            && !self.has_shield
            && self.active_slots().next().is_none()
    }
}
