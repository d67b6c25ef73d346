//! Skinned base mesh and its serialized snapshot.

use std::sync::Arc;

use avatarforge_spec::{SkeletalJoint, Skeleton};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{GarmentError, GarmentResult};
use crate::normals::compute_normals;
use crate::region::RegionId;

/// Joint influences per vertex.
pub const INFLUENCES: usize = 4;

/// Flat-buffer snapshot of a skinned body mesh as exported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseMeshSnapshot {
    /// `x, y, z` per vertex.
    pub positions: Vec<f32>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
    /// Four joint indices per vertex.
    pub joint_indices: Vec<u32>,
    /// Four weights per vertex.
    pub joint_weights: Vec<f32>,
    /// `x, y, z` per vertex; computed when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<f32>>,
    /// `u, v` per vertex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvs: Option<Vec<f32>>,
    /// Precomputed region per vertex; bypasses classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_ids: Option<Vec<u8>>,
    /// Joint hierarchy the weights refer to.
    pub joints: Vec<SkeletalJoint>,
}

impl BaseMeshSnapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> GarmentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A validated skinned body mesh.
#[derive(Debug, Clone)]
pub struct BaseMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Option<Vec<Vec2>>,
    pub indices: Vec<u32>,
    pub joint_indices: Vec<[u32; INFLUENCES]>,
    pub joint_weights: Vec<[f32; INFLUENCES]>,
    /// Region ids shipped with the mesh, if any.
    pub region_ids: Option<Vec<RegionId>>,
    skeleton: Arc<Skeleton>,
}

fn check_len(buffer: &'static str, actual: usize, expected: usize) -> GarmentResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(GarmentError::buffer_length(buffer, expected, actual))
    }
}

fn vec3s(flat: &[f32]) -> Vec<Vec3> {
    flat.chunks_exact(3).map(Vec3::from_slice).collect()
}

impl BaseMesh {
    /// Validates a snapshot and builds the mesh and its skeleton.
    ///
    /// Buffer lengths, triangle indices and weighted joint indices are
    /// checked; normals are computed when the snapshot has none.
    pub fn from_snapshot(snapshot: BaseMeshSnapshot) -> GarmentResult<Self> {
        if snapshot.positions.len() % 3 != 0 {
            return Err(GarmentError::buffer_length(
                "positions",
                snapshot.positions.len() / 3 * 3,
                snapshot.positions.len(),
            ));
        }
        let vertex_count = snapshot.positions.len() / 3;

        if snapshot.indices.len() % 3 != 0 {
            return Err(GarmentError::buffer_length(
                "indices",
                snapshot.indices.len() / 3 * 3,
                snapshot.indices.len(),
            ));
        }
        check_len("joint_indices", snapshot.joint_indices.len(), vertex_count * INFLUENCES)?;
        check_len("joint_weights", snapshot.joint_weights.len(), vertex_count * INFLUENCES)?;
        if let Some(normals) = &snapshot.normals {
            check_len("normals", normals.len(), vertex_count * 3)?;
        }
        if let Some(uvs) = &snapshot.uvs {
            check_len("uvs", uvs.len(), vertex_count * 2)?;
        }
        if let Some(regions) = &snapshot.region_ids {
            check_len("region_ids", regions.len(), vertex_count)?;
        }

        let region_ids = snapshot
            .region_ids
            .map(|ids| {
                ids.into_iter()
                    .enumerate()
                    .map(|(vertex, id)| {
                        RegionId::from_u8(id).ok_or(GarmentError::InvalidRegion { vertex, id })
                    })
                    .collect::<GarmentResult<Vec<_>>>()
            })
            .transpose()?;

        let skeleton = Arc::new(Skeleton::new(snapshot.joints)?);
        let positions = vec3s(&snapshot.positions);
        let normals = snapshot.normals.as_deref().map(vec3s);
        let uvs = snapshot
            .uvs
            .map(|flat| flat.chunks_exact(2).map(Vec2::from_slice).collect());

        let joint_indices = snapshot
            .joint_indices
            .chunks_exact(INFLUENCES)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        let joint_weights = snapshot
            .joint_weights
            .chunks_exact(INFLUENCES)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();

        let mut mesh = Self::new(
            positions,
            snapshot.indices,
            joint_indices,
            joint_weights,
            normals,
            skeleton,
        )?;
        mesh.uvs = uvs;
        mesh.region_ids = region_ids;
        Ok(mesh)
    }

    /// Builds a mesh from typed buffers.
    pub fn new(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        joint_indices: Vec<[u32; INFLUENCES]>,
        joint_weights: Vec<[f32; INFLUENCES]>,
        normals: Option<Vec<Vec3>>,
        skeleton: Arc<Skeleton>,
    ) -> GarmentResult<Self> {
        let vertex_count = positions.len();
        check_len("joint_indices", joint_indices.len(), vertex_count)?;
        check_len("joint_weights", joint_weights.len(), vertex_count)?;

        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GarmentError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        let joint_count = skeleton.len();
        for (vertex, (joints, weights)) in joint_indices.iter().zip(joint_weights.iter()).enumerate() {
            for (&joint, &weight) in joints.iter().zip(weights.iter()) {
                if weight > 0.0 && joint as usize >= joint_count {
                    return Err(GarmentError::JointOutOfRange {
                        vertex,
                        joint,
                        joint_count,
                    });
                }
            }
        }

        let normals = match normals {
            Some(normals) => {
                check_len("normals", normals.len(), vertex_count)?;
                normals
            }
            None => compute_normals(&positions, &indices),
        };

        log::info!(
            "loaded base mesh: {} vertices, {} triangles, {} joints",
            vertex_count,
            indices.len() / 3,
            joint_count
        );

        Ok(Self {
            positions,
            normals,
            uvs: None,
            indices,
            joint_indices,
            joint_weights,
            region_ids: None,
            skeleton,
        })
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Shared skeleton.
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }
}
