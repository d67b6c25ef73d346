//! Region/joint filtered sub-mesh extraction with normal inflation.

use std::collections::HashMap;

use avatarforge_spec::{CanonicalJoint, JointTable};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::mesh::{BaseMesh, INFLUENCES};
use crate::normals::compute_normals;
use crate::region::{RegionSet, VertexClassification};

/// Sign applied to the inflation displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalConvention {
    /// Source normals point away from the body.
    #[default]
    Outward,
    /// Source normals point into the body (flipped exports).
    Inward,
}

impl NormalConvention {
    /// Displacement sign.
    pub fn sign(&self) -> f32 {
        match self {
            NormalConvention::Outward => 1.0,
            NormalConvention::Inward => -1.0,
        }
    }
}

/// Sorted set of skeleton joint indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JointSet(Vec<usize>);

impl JointSet {
    /// Creates a set from joint indices.
    pub fn new(mut joints: Vec<usize>) -> Self {
        joints.sort_unstable();
        joints.dedup();
        Self(joints)
    }

    /// Resolves canonical joints through the rig's table, skipping the ones
    /// the rig lacks.
    pub fn from_canonical(table: &JointTable, joints: &[CanonicalJoint]) -> Self {
        Self::new(table.resolve_all(joints))
    }

    /// Returns true when the dominant joint is in the set.
    pub fn contains(&self, joint: Option<usize>) -> bool {
        joint.is_some_and(|j| self.0.binary_search(&j).is_ok())
    }

    /// Returns true when the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joint indices in ascending order.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Vertical clip band in mesh-local Y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeightBand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,
}

impl HeightBand {
    /// No clipping.
    pub const UNBOUNDED: HeightBand = HeightBand {
        min: None,
        max: None,
    };

    /// Keeps everything at or below `max`.
    pub fn below(max: f32) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Returns true when `y` lies inside the band.
    pub fn contains(&self, y: f32) -> bool {
        self.min.map_or(true, |min| y >= min) && self.max.map_or(true, |max| y <= max)
    }
}

/// Everything that decides which triangles a garment keeps and how far it
/// floats off the body.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionParams {
    /// Target regions.
    pub regions: RegionSet,
    /// Displacement along the source normal.
    pub inflation: f32,
    /// Vertices of a triangle that must be in a target region (1 to 3).
    pub min_region_matches: usize,
    /// When set, at least one dominant joint of a partially matching
    /// triangle must be in this set.
    pub include_joints: Option<JointSet>,
    /// Any dominant joint in this set rejects the triangle.
    pub exclude_joints: JointSet,
    /// Clip band on un-inflated Y.
    pub height_band: HeightBand,
    /// Global multiplier on `inflation` (mesh unit conversion).
    pub inflation_scale: f32,
    pub normal_convention: NormalConvention,
    /// Tri-planar UV scale used when the mesh has no UVs.
    pub triplanar_scale: f32,
    /// Count unclassified vertices as torso.
    pub unclassified_as_torso: bool,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            regions: RegionSet::default(),
            inflation: 0.0,
            min_region_matches: 2,
            include_joints: None,
            exclude_joints: JointSet::default(),
            height_band: HeightBand::UNBOUNDED,
            inflation_scale: 1.0,
            normal_convention: NormalConvention::Outward,
            triplanar_scale: 0.01,
            unclassified_as_torso: true,
        }
    }
}

impl ExtractionParams {
    /// Parameters targeting `regions` with the given inflation.
    pub fn new(regions: RegionSet, inflation: f32) -> Self {
        Self {
            regions,
            inflation,
            ..Default::default()
        }
    }

    /// Region-match threshold clamped to 1..=3.
    pub fn region_threshold(&self) -> usize {
        self.min_region_matches.clamp(1, 3)
    }
}

/// Vertex and index buffers of an extracted garment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GarmentBuffers {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub uvs: Vec<Vec2>,
    pub joint_indices: Vec<[u32; INFLUENCES]>,
    pub joint_weights: Vec<[f32; INFLUENCES]>,
    pub normals: Vec<Vec3>,
    /// Base-mesh vertex each garment vertex came from.
    pub source_vertices: Vec<u32>,
}

impl GarmentBuffers {
    /// Buffers for raw geometry bound rigidly to joint 0.
    pub fn from_triangles(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let count = positions.len();
        let normals = compute_normals(&positions, &indices);
        Self {
            positions,
            indices,
            uvs: vec![Vec2::ZERO; count],
            joint_indices: vec![[0; INFLUENCES]; count],
            joint_weights: vec![[1.0, 0.0, 0.0, 0.0]; count],
            normals,
            source_vertices: (0..count as u32).collect(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recomputes area-weighted normals from the current positions.
    pub fn recompute_normals(&mut self) {
        self.normals = compute_normals(&self.positions, &self.indices);
    }

    /// BLAKE3 hash over every buffer, as lowercase hex.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for p in self.positions.iter().chain(self.normals.iter()) {
            for c in p.to_array() {
                hasher.update(&c.to_le_bytes());
            }
        }
        for uv in &self.uvs {
            for c in uv.to_array() {
                hasher.update(&c.to_le_bytes());
            }
        }
        for i in self.indices.iter().chain(self.source_vertices.iter()) {
            hasher.update(&i.to_le_bytes());
        }
        for (joints, weights) in self.joint_indices.iter().zip(self.joint_weights.iter()) {
            for j in joints {
                hasher.update(&j.to_le_bytes());
            }
            for w in weights {
                hasher.update(&w.to_le_bytes());
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Tri-planar UV: project on the plane facing the dominant normal axis.
pub fn triplanar_uv(position: Vec3, normal: Vec3, scale: f32) -> Vec2 {
    let n = normal.abs();
    let uv = if n.x >= n.y && n.x >= n.z {
        Vec2::new(position.z, position.y)
    } else if n.y >= n.z {
        Vec2::new(position.x, position.z)
    } else {
        Vec2::new(position.x, position.y)
    };
    uv * scale
}

/// Returns true when the triangle passes the region and joint filters.
pub fn admits_triangle(
    tri: [usize; 3],
    classification: &VertexClassification,
    params: &ExtractionParams,
) -> bool {
    let matches = tri
        .iter()
        .filter(|&&v| {
            params
                .regions
                .matches(classification.regions[v], params.unclassified_as_torso)
        })
        .count();
    if matches < params.region_threshold() {
        return false;
    }

    let dominant = tri.map(|v| classification.dominant[v]);
    if dominant.iter().any(|j| params.exclude_joints.contains(*j)) {
        return false;
    }
    if let Some(include) = &params.include_joints {
        if matches < 3 && !dominant.iter().any(|j| include.contains(*j)) {
            return false;
        }
    }
    true
}

/// Extracts and inflates the part of `mesh` selected by `params`.
///
/// Returns `None` when no triangle is admitted.
pub fn extract_garment(
    mesh: &BaseMesh,
    classification: &VertexClassification,
    params: &ExtractionParams,
) -> Option<GarmentBuffers> {
    let displacement = params.normal_convention.sign() * params.inflation * params.inflation_scale;
    let mut buffers = GarmentBuffers::default();
    let mut index_map: HashMap<usize, u32> = HashMap::new();

    for tri in mesh.indices.chunks_exact(3) {
        let tri = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if !admits_triangle(tri, classification, params) {
            continue;
        }
        if !tri
            .iter()
            .all(|&v| params.height_band.contains(mesh.positions[v].y))
        {
            continue;
        }

        for v in tri {
            let next = buffers.positions.len() as u32;
            let index = *index_map.entry(v).or_insert_with(|| {
                let position = mesh.positions[v];
                let normal = mesh.normals[v];
                buffers.positions.push(position + normal * displacement);
                buffers.uvs.push(match &mesh.uvs {
                    Some(uvs) => uvs[v],
                    None => triplanar_uv(position, normal, params.triplanar_scale),
                });
                buffers.joint_indices.push(mesh.joint_indices[v]);
                buffers.joint_weights.push(mesh.joint_weights[v]);
                buffers.source_vertices.push(v as u32);
                next
            });
            buffers.indices.push(index);
        }
    }

    if buffers.indices.is_empty() {
        return None;
    }
    buffers.recompute_normals();
    Some(buffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionId;
    use avatarforge_spec::{SkeletalJoint, Skeleton};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// Two triangles in the z = 0 plane: the first fully torso (joint 0),
    /// the second with one torso vertex and two arm vertices (joint 1).
    fn strip() -> (BaseMesh, VertexClassification) {
        let skeleton = Arc::new(
            Skeleton::new(vec![
                SkeletalJoint::new("Spine", -1, Vec3::ZERO),
                SkeletalJoint::new("LeftArm", 0, Vec3::X),
            ])
            .unwrap(),
        );
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
        ];
        let joints = vec![[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0], [1, 0, 0, 0]];
        let weights = vec![[1.0, 0.0, 0.0, 0.0]; 5];
        let mesh = BaseMesh::new(positions, vec![0, 1, 2, 1, 4, 3], joints, weights, None, skeleton)
            .unwrap();
        let classification = VertexClassification::classify(&mesh);
        (mesh, classification)
    }

    fn torso(k: usize) -> ExtractionParams {
        ExtractionParams {
            min_region_matches: k,
            ..ExtractionParams::new(RegionSet::new(&[RegionId::Torso]), 0.5)
        }
    }

    #[test]
    fn test_classification_of_strip() {
        let (_, c) = strip();
        assert_eq!(
            c.regions,
            vec![
                RegionId::Torso,
                RegionId::Torso,
                RegionId::Torso,
                RegionId::LeftArm,
                RegionId::LeftArm
            ]
        );
    }

    #[test]
    fn test_full_match_admitted_for_every_k() {
        let (_, c) = strip();
        for k in 1..=3 {
            assert!(admits_triangle([0, 1, 2], &c, &torso(k)), "k = {}", k);
        }
    }

    #[test]
    fn test_no_match_never_admitted() {
        let (mesh, c) = strip();
        let params = |k| ExtractionParams {
            min_region_matches: k,
            ..ExtractionParams::new(RegionSet::new(&[RegionId::HeadNeck]), 0.5)
        };
        for k in 1..=3 {
            assert!(!admits_triangle([0, 1, 2], &c, &params(k)));
            assert!(extract_garment(&mesh, &c, &params(k)).is_none());
        }
    }

    #[test]
    fn test_partial_match_depends_on_k() {
        let (_, c) = strip();
        assert!(admits_triangle([1, 3, 4], &c, &torso(1)));
        assert!(!admits_triangle([1, 3, 4], &c, &torso(2)));
    }

    #[test]
    fn test_inflation_along_normal_and_dedup() {
        let (mesh, c) = strip();
        let garment = extract_garment(&mesh, &c, &torso(2)).unwrap();
        assert_eq!(garment.triangle_count(), 1);
        assert_eq!(garment.vertex_count(), 3);
        assert_eq!(garment.source_vertices, vec![0, 1, 2]);
        assert!(garment.positions.iter().all(|p| (p.z - 0.5).abs() < 1e-6));

        let inward = ExtractionParams {
            normal_convention: NormalConvention::Inward,
            inflation_scale: 2.0,
            ..torso(2)
        };
        let garment = extract_garment(&mesh, &c, &inward).unwrap();
        assert!(garment.positions.iter().all(|p| (p.z + 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_shared_vertices_deduplicated() {
        let (mesh, c) = strip();
        let garment = extract_garment(&mesh, &c, &torso(1)).unwrap();
        assert_eq!(garment.triangle_count(), 2);
        assert_eq!(garment.vertex_count(), 5);
        assert_eq!(garment.indices, vec![0, 1, 2, 1, 3, 4]);
    }

    #[test]
    fn test_height_band_drops_whole_triangles() {
        let (mesh, c) = strip();
        let params = ExtractionParams {
            height_band: HeightBand::below(0.5),
            ..torso(1)
        };
        assert!(extract_garment(&mesh, &c, &params).is_none());
    }

    #[test]
    fn test_joint_filters() {
        let (mesh, c) = strip();
        let exclude_arm = ExtractionParams {
            exclude_joints: JointSet::new(vec![1]),
            ..torso(1)
        };
        let garment = extract_garment(&mesh, &c, &exclude_arm).unwrap();
        assert_eq!(garment.triangle_count(), 1);

        let include_arm = ExtractionParams {
            include_joints: Some(JointSet::new(vec![1])),
            ..torso(1)
        };
        // The fully matching triangle bypasses the inclusion set.
        let garment = extract_garment(&mesh, &c, &include_arm).unwrap();
        assert_eq!(garment.triangle_count(), 2);

        let include_none = ExtractionParams {
            include_joints: Some(JointSet::new(vec![7])),
            ..torso(1)
        };
        let garment = extract_garment(&mesh, &c, &include_none).unwrap();
        assert_eq!(garment.source_vertices, vec![0, 1, 2]);
    }

    #[test]
    fn test_triplanar_uv_axes() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(triplanar_uv(p, Vec3::X, 1.0), Vec2::new(3.0, 2.0));
        assert_eq!(triplanar_uv(p, Vec3::NEG_Y, 1.0), Vec2::new(1.0, 3.0));
        assert_eq!(triplanar_uv(p, Vec3::Z, 0.5), Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_extraction_deterministic() {
        let (mesh, c) = strip();
        let a = extract_garment(&mesh, &c, &torso(1)).unwrap();
        let b = extract_garment(&mesh, &c, &torso(1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_joint_set_from_canonical() {
        let table = JointTable::from_names(["Hips", "LeftHand"]);
        let set = JointSet::from_canonical(
            &table,
            &[CanonicalJoint::RightHand, CanonicalJoint::LeftHand],
        );
        assert_eq!(set.as_slice(), &[1]);
        assert!(set.contains(Some(1)));
        assert!(!set.contains(None));
    }
}
