//! Garment pipeline configuration.
//!
//! Material and slot presets are data. Every knob has a default matching the
//! stock humanoid rig, and any subset can be overridden from JSON.

use avatarforge_spec::{CanonicalJoint, EquipmentSlot, MaterialClass};
use serde::{Deserialize, Serialize};

use crate::error::GarmentResult;
use crate::extract::{HeightBand, NormalConvention};
use crate::region::RegionId;

/// Per-material finishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPreset {
    /// Base inflation distance in mesh units.
    pub inflation: f32,
    /// Smoothing passes after extraction.
    pub smoothing_iterations: u32,
    /// Whether open borders get a thickened rim.
    pub rim: bool,
}

impl MaterialPreset {
    pub fn new(inflation: f32, smoothing_iterations: u32, rim: bool) -> Self {
        Self {
            inflation,
            smoothing_iterations,
            rim,
        }
    }
}

/// One preset per material class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialPresets {
    pub skin: MaterialPreset,
    pub cloth: MaterialPreset,
    pub leather: MaterialPreset,
    pub metal: MaterialPreset,
    pub chain: MaterialPreset,
    pub wood: MaterialPreset,
}

impl Default for MaterialPresets {
    fn default() -> Self {
        Self {
            skin: MaterialPreset::new(0.5, 0, false),
            cloth: MaterialPreset::new(1.2, 0, false),
            leather: MaterialPreset::new(1.4, 4, true),
            metal: MaterialPreset::new(2.5, 2, true),
            chain: MaterialPreset::new(1.6, 2, true),
            wood: MaterialPreset::new(1.4, 2, true),
        }
    }
}

impl MaterialPresets {
    /// Preset for a material class.
    pub fn get(&self, class: MaterialClass) -> &MaterialPreset {
        match class {
            MaterialClass::Skin => &self.skin,
            MaterialClass::Cloth => &self.cloth,
            MaterialClass::Leather => &self.leather,
            MaterialClass::Metal => &self.metal,
            MaterialClass::Chain => &self.chain,
            MaterialClass::Wood => &self.wood,
        }
    }
}

/// Inflation pinned for one material class within a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInflation {
    pub material: MaterialClass,
    pub inflation: f32,
}

/// Where a slot's garment sits on the body and how far it floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPreset {
    /// Target regions.
    pub regions: Vec<RegionId>,
    /// Joints a partially matching triangle must touch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_joints: Option<Vec<CanonicalJoint>>,
    /// Joints that reject any triangle they dominate a vertex of.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_joints: Vec<CanonicalJoint>,
    #[serde(default)]
    pub height_band: HeightBand,
    /// Per-material inflation, checked first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub material_inflation: Vec<MaterialInflation>,
    /// Inflation for materials without an entry; the material preset
    /// applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_override: Option<f32>,
    /// Added after the inflation is picked.
    #[serde(default)]
    pub inflation_bonus: f32,
    /// Replaces the material's smoothing pass count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothing_override: Option<u32>,
}

impl SlotPreset {
    fn on(regions: &[RegionId]) -> Self {
        Self {
            regions: regions.to_vec(),
            include_joints: None,
            exclude_joints: Vec::new(),
            height_band: HeightBand::UNBOUNDED,
            material_inflation: Vec::new(),
            inflation_override: None,
            inflation_bonus: 0.0,
            smoothing_override: None,
        }
    }

    fn include(mut self, joints: &[CanonicalJoint]) -> Self {
        self.include_joints = Some(joints.to_vec());
        self
    }

    fn exclude(mut self, joints: &[CanonicalJoint]) -> Self {
        self.exclude_joints = joints.to_vec();
        self
    }

    fn pin(mut self, material: MaterialClass, inflation: f32) -> Self {
        self.material_inflation.push(MaterialInflation { material, inflation });
        self
    }

    /// Resolves the inflation distance for a material.
    pub fn inflation_for(&self, class: MaterialClass, materials: &MaterialPresets) -> f32 {
        let base = self
            .material_inflation
            .iter()
            .find(|entry| entry.material == class)
            .map(|entry| entry.inflation)
            .or(self.inflation_override)
            .unwrap_or(materials.get(class).inflation);
        base + self.inflation_bonus
    }

    /// Resolves the smoothing pass count for a material.
    pub fn smoothing_for(&self, class: MaterialClass, materials: &MaterialPresets) -> u32 {
        self.smoothing_override
            .unwrap_or(materials.get(class).smoothing_iterations)
    }
}

/// One preset per equipment slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotPresets {
    pub head: SlotPreset,
    pub shoulders: SlotPreset,
    pub torso: SlotPreset,
    pub arms: SlotPreset,
    pub hands: SlotPreset,
    pub legs: SlotPreset,
    pub feet: SlotPreset,
}

impl Default for SlotPresets {
    fn default() -> Self {
        use CanonicalJoint::*;
        use RegionId::{HeadNeck, LeftArm as LArm, LeftLeg as LLeg, RightArm as RArm, RightLeg as RLeg, Torso};

        Self {
            head: SlotPreset {
                inflation_override: Some(1.5),
                ..SlotPreset::on(&[HeadNeck])
            }
            .pin(MaterialClass::Cloth, 1.25),
            shoulders: SlotPreset {
                inflation_bonus: 0.5,
                ..SlotPreset::on(&[Torso, LArm, RArm])
            }
            .include(&[LeftShoulder, LeftArm, RightShoulder, RightArm])
            .exclude(&[
                Hips,
                Spine,
                Spine1,
                Spine2,
                Neck,
                LeftForeArm,
                LeftHand,
                RightForeArm,
                RightHand,
            ]),
            torso: SlotPreset::on(&[Torso]).include(&[Hips, Spine, Spine1, Spine2, Neck]),
            arms: SlotPreset::on(&[LArm, RArm])
                .include(&[LeftArm, LeftForeArm, RightArm, RightForeArm])
                .exclude(&[LeftHand, RightHand]),
            hands: SlotPreset {
                inflation_bonus: 0.1,
                smoothing_override: Some(5),
                ..SlotPreset::on(&[LArm, RArm])
            }
            .include(&[LeftHand, RightHand])
            .exclude(&[LeftArm, LeftForeArm, RightArm, RightForeArm]),
            legs: SlotPreset::on(&[Torso, LLeg, RLeg])
                .exclude(&[Spine, Spine1, Spine2, Neck, LeftShoulder, RightShoulder])
                .pin(MaterialClass::Cloth, 1.2),
            feet: SlotPreset {
                height_band: HeightBand::below(45.0),
                inflation_override: Some(2.4),
                ..SlotPreset::on(&[LLeg, RLeg])
            }
            .pin(MaterialClass::Metal, 2.6)
            .pin(MaterialClass::Cloth, 1.4),
        }
    }
}

impl SlotPresets {
    /// Preset for a slot.
    pub fn get(&self, slot: EquipmentSlot) -> &SlotPreset {
        match slot {
            EquipmentSlot::Head => &self.head,
            EquipmentSlot::Shoulders => &self.shoulders,
            EquipmentSlot::Torso => &self.torso,
            EquipmentSlot::Arms => &self.arms,
            EquipmentSlot::Hands => &self.hands,
            EquipmentSlot::Legs => &self.legs,
            EquipmentSlot::Feet => &self.feet,
        }
    }
}

/// Garment pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarmentConfig {
    /// Region matches a triangle needs (1 to 3).
    pub min_region_matches: usize,
    /// Global inflation multiplier for meshes not authored in centimetres.
    pub inflation_scale: f32,
    pub normal_convention: NormalConvention,
    /// UV scale for tri-planar projection.
    pub triplanar_scale: f32,
    /// Share of the old position kept per smoothing pass.
    pub smoothing_retention: f32,
    /// Rim displacement as a fraction of the inflation.
    pub rim_ratio: f32,
    pub unclassified_as_torso: bool,
    pub materials: MaterialPresets,
    pub slots: SlotPresets,
}

impl Default for GarmentConfig {
    fn default() -> Self {
        Self {
            min_region_matches: 2,
            inflation_scale: 1.0,
            normal_convention: NormalConvention::Outward,
            triplanar_scale: 0.01,
            smoothing_retention: 0.5,
            rim_ratio: 0.3,
            unclassified_as_torso: true,
            materials: MaterialPresets::default(),
            slots: SlotPresets::default(),
        }
    }
}

impl GarmentConfig {
    /// Parses a configuration from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> GarmentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_material_defaults() {
        let m = MaterialPresets::default();
        assert_eq!(m.get(MaterialClass::Metal).smoothing_iterations, 2);
        assert_eq!(m.get(MaterialClass::Chain).smoothing_iterations, 2);
        assert_eq!(m.get(MaterialClass::Leather).smoothing_iterations, 4);
        assert_eq!(m.get(MaterialClass::Cloth).smoothing_iterations, 0);
        assert!(!m.get(MaterialClass::Cloth).rim);
        assert!(!m.get(MaterialClass::Skin).rim);
        assert!(m.get(MaterialClass::Metal).rim);
    }

    #[test]
    fn test_slot_inflation_resolution() {
        let config = GarmentConfig::default();
        let m = &config.materials;
        let slots = &config.slots;

        assert_eq!(slots.torso.inflation_for(MaterialClass::Metal, m), 2.5);
        assert_eq!(slots.shoulders.inflation_for(MaterialClass::Metal, m), 3.0);
        assert_eq!(slots.head.inflation_for(MaterialClass::Cloth, m), 1.25);
        assert_eq!(slots.head.inflation_for(MaterialClass::Metal, m), 1.5);
        assert_eq!(slots.feet.inflation_for(MaterialClass::Metal, m), 2.6);
        assert_eq!(slots.feet.inflation_for(MaterialClass::Cloth, m), 1.4);
        assert_eq!(slots.feet.inflation_for(MaterialClass::Leather, m), 2.4);
        assert!((slots.hands.inflation_for(MaterialClass::Leather, m) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_hands_smoothing_override() {
        let config = GarmentConfig::default();
        assert_eq!(config.slots.hands.smoothing_for(MaterialClass::Metal, &config.materials), 5);
        assert_eq!(config.slots.torso.smoothing_for(MaterialClass::Leather, &config.materials), 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GarmentConfig::from_json(
            r#"{"min_region_matches": 1, "normal_convention": "inward", "materials": {"cloth": {"inflation": 0.8, "smoothing_iterations": 1, "rim": true}}}"#,
        )
        .unwrap();
        assert_eq!(config.min_region_matches, 1);
        assert_eq!(config.normal_convention, NormalConvention::Inward);
        assert_eq!(config.materials.cloth, MaterialPreset::new(0.8, 1, true));
        assert_eq!(config.materials.metal, MaterialPresets::default().metal);
        assert_eq!(config.slots, SlotPresets::default());
        assert_eq!(config.rim_ratio, 0.3);
    }

    #[test]
    fn test_slot_preset_json() {
        let json = r#"{"regions": ["head_neck"], "exclude_joints": ["Neck"], "height_band": {"min": 150.0}}"#;
        let preset: SlotPreset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.regions, vec![RegionId::HeadNeck]);
        assert_eq!(preset.exclude_joints, vec![CanonicalJoint::Neck]);
        assert_eq!(preset.height_band.min, Some(150.0));
        assert_eq!(preset.include_joints, None);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = GarmentConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GarmentConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        use avatarforge_spec::BackendError;
        let err = GarmentConfig::from_json("{").unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
