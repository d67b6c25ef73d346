//! Skinning validity checks for finished garments.
//!
//! Garments must stay renderable however the shared skeleton is rescaled:
//! - **Error**: mismatched buffer lengths, triangle indices past the vertex
//!   list, weighted joints past the skeleton, weights not summing to one
//! - **Warning**: zero-area triangles

use serde::{Deserialize, Serialize};

use crate::garment::GarmentMesh;
use crate::normals::triangle_area;

/// Allowed deviation of a vertex's weight sum from 1.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-3;

/// Triangles below this area are reported as degenerate.
pub const DEGENERATE_AREA: f32 = 1e-10;

/// Severity level for skinning issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One problem found in a garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinningIssue {
    /// Rule identifier, e.g. "skin/weight-sum".
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    /// Offending element, e.g. "vertex:12" or "triangle:3".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_range: Option<String>,
}

impl SkinningIssue {
    /// Creates an issue with the required fields.
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location: None,
            actual_value: None,
            expected_range: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_actual_value(mut self, value: impl Into<String>) -> Self {
        self.actual_value = Some(value.into());
        self
    }

    pub fn with_expected_range(mut self, range: impl Into<String>) -> Self {
        self.expected_range = Some(range.into());
        self
    }
}

/// Runs every skinning rule over a garment.
///
/// Buffer length mismatches stop the per-element rules, which would index
/// out of bounds otherwise.
pub fn check_skinning(garment: &GarmentMesh) -> Vec<SkinningIssue> {
    let mut issues = check_buffer_lengths(garment);
    if !issues.is_empty() {
        return issues;
    }
    issues.extend(check_index_range(garment));
    issues.extend(check_joint_range(garment));
    issues.extend(check_weight_sums(garment));
    issues.extend(check_degenerate_faces(garment));
    issues
}

/// Returns true when no error-level issue is present.
pub fn is_valid(issues: &[SkinningIssue]) -> bool {
    issues.iter().all(|issue| issue.severity < Severity::Error)
}

fn check_buffer_lengths(garment: &GarmentMesh) -> Vec<SkinningIssue> {
    let b = &garment.buffers;
    let expected = b.positions.len();
    let lengths = [
        ("normals", b.normals.len()),
        ("uvs", b.uvs.len()),
        ("joint_indices", b.joint_indices.len()),
        ("joint_weights", b.joint_weights.len()),
        ("source_vertices", b.source_vertices.len()),
    ];

    let mut issues: Vec<_> = lengths
        .into_iter()
        .filter(|(_, len)| *len != expected)
        .map(|(name, len)| {
            SkinningIssue::new(
                "skin/buffer-length",
                Severity::Error,
                format!("buffer '{}' does not match the vertex count", name),
            )
            .with_location(name)
            .with_actual_value(len.to_string())
            .with_expected_range(expected.to_string())
        })
        .collect();

    if b.indices.len() % 3 != 0 {
        issues.push(
            SkinningIssue::new("skin/buffer-length", Severity::Error, "index count is not a multiple of 3")
                .with_location("indices")
                .with_actual_value(b.indices.len().to_string()),
        );
    }
    issues
}

fn check_index_range(garment: &GarmentMesh) -> Vec<SkinningIssue> {
    let vertex_count = garment.vertex_count();
    garment
        .buffers
        .indices
        .chunks_exact(3)
        .enumerate()
        .filter_map(|(tri, idx)| {
            let bad = idx.iter().copied().find(|&i| i as usize >= vertex_count)?;
            Some(
                SkinningIssue::new("skin/index-range", Severity::Error, "triangle references a missing vertex")
                    .with_location(format!("triangle:{}", tri))
                    .with_actual_value(bad.to_string())
                    .with_expected_range(format!("[0, {})", vertex_count)),
            )
        })
        .collect()
}

fn check_joint_range(garment: &GarmentMesh) -> Vec<SkinningIssue> {
    let joint_count = garment.skeleton().len();
    let b = &garment.buffers;
    let mut issues = Vec::new();
    for (vertex, (joints, weights)) in b.joint_indices.iter().zip(b.joint_weights.iter()).enumerate() {
        let bad = joints
            .iter()
            .zip(weights.iter())
            .find(|(&j, &w)| w > 0.0 && j as usize >= joint_count);
        if let Some((&joint, _)) = bad {
            issues.push(
                SkinningIssue::new("skin/joint-range", Severity::Error, "weighted influence references a missing joint")
                    .with_location(format!("vertex:{}", vertex))
                    .with_actual_value(joint.to_string())
                    .with_expected_range(format!("[0, {})", joint_count)),
            );
        }
    }
    issues
}

fn check_weight_sums(garment: &GarmentMesh) -> Vec<SkinningIssue> {
    garment
        .buffers
        .joint_weights
        .iter()
        .enumerate()
        .filter_map(|(vertex, weights)| {
            let sum: f32 = weights.iter().sum();
            if sum.is_finite() && (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
                return None;
            }
            Some(
                SkinningIssue::new("skin/weight-sum", Severity::Error, "joint weights do not sum to 1")
                    .with_location(format!("vertex:{}", vertex))
                    .with_actual_value(format!("{:.4}", sum))
                    .with_expected_range(format!("1 +/- {}", WEIGHT_SUM_TOLERANCE)),
            )
        })
        .collect()
}

fn check_degenerate_faces(garment: &GarmentMesh) -> Vec<SkinningIssue> {
    let b = &garment.buffers;
    b.indices
        .chunks_exact(3)
        .enumerate()
        .filter_map(|(tri, idx)| {
            let a = b.positions.get(idx[0] as usize)?;
            let bv = b.positions.get(idx[1] as usize)?;
            let c = b.positions.get(idx[2] as usize)?;
            let area = triangle_area(*a, *bv, *c);
            (area < DEGENERATE_AREA).then(|| {
                SkinningIssue::new("skin/degenerate-face", Severity::Warning, "triangle has zero area")
                    .with_location(format!("triangle:{}", tri))
                    .with_actual_value(format!("{:e}", area))
            })
        })
        .collect()
}
