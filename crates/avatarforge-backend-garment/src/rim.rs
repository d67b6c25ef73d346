//! Rim thickening along open garment borders.
//!
//! An edge used by exactly one triangle is a boundary edge. Pushing its
//! vertices a little further out gives cut garment borders (sleeve ends,
//! collars, boot tops) visible thickness.

use std::collections::HashMap;

use crate::garment::GarmentMesh;

/// Boundary edges as sorted `(low, high)` pairs, in ascending order.
pub fn boundary_edges(indices: &[u32]) -> Vec<(u32, u32)> {
    let mut edge_count: HashMap<(u32, u32), usize> = HashMap::new();
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = if a < b { (a, b) } else { (b, a) };
            *edge_count.entry(key).or_insert(0) += 1;
        }
    }

    let mut edges: Vec<_> = edge_count
        .into_iter()
        .filter(|(_, count)| *count == 1)
        .map(|(edge, _)| edge)
        .collect();
    edges.sort_unstable();
    edges
}

/// Vertices touching at least one boundary edge, ascending.
pub fn boundary_vertices(indices: &[u32]) -> Vec<u32> {
    let mut vertices: Vec<u32> = boundary_edges(indices)
        .into_iter()
        .flat_map(|(a, b)| [a, b])
        .collect();
    vertices.sort_unstable();
    vertices.dedup();
    vertices
}

/// Displaces boundary vertices along their current normals by
/// `inflation * rim_ratio * inflation_scale`, then recomputes normals.
///
/// Returns the number of moved vertices. Closed meshes are left untouched.
pub fn thicken_rim(mesh: &mut GarmentMesh, inflation: f32, rim_ratio: f32, inflation_scale: f32) -> usize {
    let rim = boundary_vertices(&mesh.buffers.indices);
    if rim.is_empty() {
        return 0;
    }

    let offset = inflation * rim_ratio * inflation_scale;
    let buffers = &mut mesh.buffers;
    for &v in &rim {
        let v = v as usize;
        if let (Some(position), Some(normal)) = (buffers.positions.get(v).copied(), buffers.normals.get(v)) {
            buffers.positions[v] = position + *normal * offset;
        }
    }
    buffers.recompute_normals();

    log::debug!("thickened {} rim vertices on '{}'", rim.len(), mesh.name);
    rim.len()
}
