//! Anatomical region classification of base-mesh vertices.
//!
//! Every joint gets a region once, from its normalized name. A vertex takes
//! the region of its dominant joint: the influence with the largest weight,
//! ties going to the lowest joint index. Vertices with no weight at all are
//! [`RegionId::Unclassified`].

use avatarforge_spec::skeleton::normalize_rig_name;
use avatarforge_spec::Skeleton;
use serde::{Deserialize, Serialize};

use crate::mesh::{BaseMesh, INFLUENCES};

/// Coarse anatomical zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RegionId {
    HeadNeck = 0,
    Torso = 1,
    LeftArm = 2,
    RightArm = 3,
    LeftLeg = 4,
    RightLeg = 5,
    Unclassified = 6,
}

impl RegionId {
    /// Number of regions.
    pub const COUNT: usize = 7;

    /// All regions in id order.
    pub const ALL: [RegionId; Self::COUNT] = [
        RegionId::HeadNeck,
        RegionId::Torso,
        RegionId::LeftArm,
        RegionId::RightArm,
        RegionId::LeftLeg,
        RegionId::RightLeg,
        RegionId::Unclassified,
    ];

    /// Region for a raw id, `None` when out of range.
    pub fn from_u8(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Region of a joint, by substring rules on its normalized name.
    ///
    /// Head, neck, eye and jaw take priority; shoulders and clavicles count
    /// as torso. Sided finger and palm bones belong to the arm, toe balls to
    /// the leg.
    pub fn for_joint_name(name: &str) -> RegionId {
        let normalized = normalize_rig_name(name);
        let has = |keys: &[&str]| keys.iter().any(|k| normalized.contains(k));

        if has(&["head", "neck", "eye", "jaw"]) {
            return RegionId::HeadNeck;
        }
        if has(&["shoulder", "clavicle", "collar"]) {
            return RegionId::Torso;
        }

        let side = if normalized.starts_with("left") {
            Some(true)
        } else if normalized.starts_with("right") {
            Some(false)
        } else {
            None
        };
        if let Some(left) = side {
            if has(&[
                "arm", "hand", "elbow", "wrist", "palm", "finger", "thumb", "index", "middle",
                "ring", "pinky",
            ]) {
                return if left { RegionId::LeftArm } else { RegionId::RightArm };
            }
            if has(&["leg", "thigh", "calf", "shin", "knee", "foot", "toe", "ankle", "ball"]) {
                return if left { RegionId::LeftLeg } else { RegionId::RightLeg };
            }
        }

        if has(&["hips", "hip", "pelvis", "spine", "chest", "abdomen"]) {
            return RegionId::Torso;
        }
        RegionId::Unclassified
    }
}

/// A set of target regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionSet(u8);

impl RegionSet {
    /// Creates a set from a list of regions.
    pub fn new(regions: &[RegionId]) -> Self {
        let mut set = Self::default();
        for region in regions {
            set.insert(*region);
        }
        set
    }

    /// Adds a region.
    pub fn insert(&mut self, region: RegionId) {
        self.0 |= 1 << region as u8;
    }

    /// Returns true when `region` is in the set.
    pub fn contains(&self, region: RegionId) -> bool {
        self.0 & (1 << region as u8) != 0
    }

    /// Returns true when no region is in the set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true when a vertex in `region` counts toward this set.
    ///
    /// With `unclassified_as_torso`, unclassified vertices count as torso.
    pub fn matches(&self, region: RegionId, unclassified_as_torso: bool) -> bool {
        self.contains(region)
            || (unclassified_as_torso
                && region == RegionId::Unclassified
                && self.contains(RegionId::Torso))
    }

    /// Regions in id order.
    pub fn regions(&self) -> Vec<RegionId> {
        RegionId::ALL
            .into_iter()
            .filter(|r| self.contains(*r))
            .collect()
    }
}

/// Dominant joint of one vertex.
///
/// Largest weight wins; equal weights go to the lower joint index. All-zero
/// weights have no dominant joint.
pub fn dominant_joint(indices: &[u32; INFLUENCES], weights: &[f32; INFLUENCES]) -> Option<usize> {
    let mut best: Option<(u32, f32)> = None;
    for (&joint, &weight) in indices.iter().zip(weights.iter()) {
        if weight <= 0.0 {
            continue;
        }
        best = match best {
            Some((best_joint, best_weight))
                if weight < best_weight || (weight == best_weight && joint >= best_joint) =>
            {
                Some((best_joint, best_weight))
            }
            _ => Some((joint, weight)),
        };
    }
    best.map(|(joint, _)| joint as usize)
}

/// Per-vertex classification, computed once per base-mesh load.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexClassification {
    /// Region per vertex.
    pub regions: Vec<RegionId>,
    /// Dominant joint per vertex.
    pub dominant: Vec<Option<usize>>,
}

impl VertexClassification {
    /// Classifies every vertex of `mesh`.
    ///
    /// Region ids shipped with the mesh are used as-is; dominant joints are
    /// always computed.
    pub fn classify(mesh: &BaseMesh) -> Self {
        let dominant: Vec<_> = mesh
            .joint_indices
            .iter()
            .zip(mesh.joint_weights.iter())
            .map(|(indices, weights)| dominant_joint(indices, weights))
            .collect();

        let regions = match &mesh.region_ids {
            Some(provided) => provided.clone(),
            None => {
                let joint_regions = joint_regions(mesh.skeleton());
                dominant
                    .iter()
                    .map(|joint| {
                        joint
                            .and_then(|j| joint_regions.get(j).copied())
                            .unwrap_or(RegionId::Unclassified)
                    })
                    .collect()
            }
        };

        let classification = Self { regions, dominant };
        log::debug!("region histogram: {:?}", classification.histogram());
        classification
    }

    /// Vertex count per region, in id order.
    pub fn histogram(&self) -> [usize; RegionId::COUNT] {
        let mut counts = [0; RegionId::COUNT];
        for region in &self.regions {
            counts[*region as usize] += 1;
        }
        counts
    }
}

/// Region of every joint in the skeleton, by joint index.
pub fn joint_regions(skeleton: &Skeleton) -> Vec<RegionId> {
    skeleton
        .joints()
        .iter()
        .map(|joint| RegionId::for_joint_name(&joint.name))
        .collect()
}
