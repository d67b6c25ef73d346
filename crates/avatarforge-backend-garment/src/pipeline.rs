//! Per-slot garment build: plan, extract, smooth, rim.

use avatarforge_spec::{EquipmentName, JointTable, MaterialClass};

use crate::config::GarmentConfig;
use crate::extract::{extract_garment, ExtractionParams, JointSet};
use crate::garment::GarmentMesh;
use crate::material::GarmentMaterial;
use crate::mesh::BaseMesh;
use crate::region::{RegionSet, VertexClassification};
use crate::rim::thicken_rim;
use crate::smooth::smooth;

/// Fully resolved build settings for one equipment piece.
#[derive(Debug, Clone, PartialEq)]
pub struct GarmentPlan {
    pub equipment: EquipmentName,
    pub material: MaterialClass,
    pub params: ExtractionParams,
    pub smoothing_iterations: u32,
    pub rim: bool,
}

impl GarmentPlan {
    /// Resolves slot and material presets against a rig.
    ///
    /// Canonical joints the rig lacks are dropped from the joint filters.
    pub fn resolve(equipment: &EquipmentName, table: &JointTable, config: &GarmentConfig) -> Self {
        let material = equipment.material();
        let slot = config.slots.get(equipment.slot);

        let params = ExtractionParams {
            regions: RegionSet::new(&slot.regions),
            inflation: slot.inflation_for(material, &config.materials),
            min_region_matches: config.min_region_matches,
            include_joints: slot
                .include_joints
                .as_ref()
                .map(|joints| JointSet::from_canonical(table, joints)),
            exclude_joints: JointSet::from_canonical(table, &slot.exclude_joints),
            height_band: slot.height_band,
            inflation_scale: config.inflation_scale,
            normal_convention: config.normal_convention,
            triplanar_scale: config.triplanar_scale,
            unclassified_as_torso: config.unclassified_as_torso,
        };

        let rim = config.materials.get(material).rim
            && !matches!(material, MaterialClass::Cloth | MaterialClass::Skin);

        Self {
            equipment: equipment.clone(),
            material,
            params,
            smoothing_iterations: slot.smoothing_for(material, &config.materials),
            rim,
        }
    }
}

/// Builds one finished garment, or `None` when the slot covers no triangle
/// of this mesh.
pub fn build_garment(
    mesh: &BaseMesh,
    classification: &VertexClassification,
    equipment: &EquipmentName,
    color: &str,
    config: &GarmentConfig,
) -> Option<GarmentMesh> {
    let plan = GarmentPlan::resolve(equipment, mesh.skeleton().joint_table(), config);
    build_planned(mesh, classification, &plan, color, config)
}

/// Builds a garment from an already resolved plan.
pub fn build_planned(
    mesh: &BaseMesh,
    classification: &VertexClassification,
    plan: &GarmentPlan,
    color: &str,
    config: &GarmentConfig,
) -> Option<GarmentMesh> {
    let name = GarmentMesh::scene_name(plan.equipment.slot, &plan.equipment.type_name);
    let Some(buffers) = extract_garment(mesh, classification, &plan.params) else {
        log::debug!("'{}' covers no triangles, skipped", name);
        return None;
    };

    let mut garment = GarmentMesh::new(
        name,
        plan.equipment.slot,
        GarmentMaterial::new(plan.material, color),
        buffers,
        mesh.skeleton().clone(),
    );
    smooth(&mut garment, plan.smoothing_iterations, config.smoothing_retention);
    if plan.rim {
        thicken_rim(
            &mut garment,
            plan.params.inflation,
            config.rim_ratio,
            config.inflation_scale,
        );
    }

    log::info!(
        "built '{}': {} vertices, {} triangles",
        garment.name,
        garment.vertex_count(),
        garment.triangle_count()
    );
    Some(garment)
}
