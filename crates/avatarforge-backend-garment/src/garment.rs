//! Finished garment meshes.

use std::sync::Arc;

use avatarforge_spec::{EquipmentSlot, Skeleton};

use crate::extract::GarmentBuffers;
use crate::material::GarmentMaterial;

/// An independently skinned sub-mesh for one equipment slot.
///
/// Owns its buffers. The skeleton is shared with the base mesh and the other
/// garments and is never modified by the pipeline.
#[derive(Debug, Clone)]
pub struct GarmentMesh {
    /// Scene name, `armor_<Slot>_<Type>`.
    pub name: String,
    pub slot: EquipmentSlot,
    pub material: GarmentMaterial,
    pub buffers: GarmentBuffers,
    skeleton: Arc<Skeleton>,
}

impl GarmentMesh {
    /// Wraps extracted buffers.
    pub fn new(
        name: impl Into<String>,
        slot: EquipmentSlot,
        material: GarmentMaterial,
        buffers: GarmentBuffers,
        skeleton: Arc<Skeleton>,
    ) -> Self {
        Self {
            name: name.into(),
            slot,
            material,
            buffers,
            skeleton,
        }
    }

    /// Scene name for a slot and type.
    pub fn scene_name(slot: EquipmentSlot, type_name: &str) -> String {
        format!("armor_{}_{}", slot, type_name)
    }

    /// Skeleton the joint indices refer to.
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.buffers.vertex_count()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.buffers.triangle_count()
    }
}
