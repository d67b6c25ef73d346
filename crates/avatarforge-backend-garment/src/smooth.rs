//! Iterative 1-ring relaxation of garment surfaces.

use glam::Vec3;

use crate::garment::GarmentMesh;

/// Sorted, de-duplicated 1-ring neighbors of every vertex.
pub fn vertex_neighbors(vertex_count: usize, indices: &[u32]) -> Vec<Vec<u32>> {
    let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if (a as usize) < vertex_count && (b as usize) < vertex_count && a != b {
                neighbors[a as usize].push(b);
                neighbors[b as usize].push(a);
            }
        }
    }
    for ring in &mut neighbors {
        ring.sort_unstable();
        ring.dedup();
    }
    neighbors
}

/// Relaxes positions in place.
///
/// Each iteration reads only the previous iteration's positions:
/// `new = retention * old + (1 - retention) * mean(neighbors)`. Vertices
/// without neighbors keep their position.
pub fn smooth_positions(positions: &mut [Vec3], neighbors: &[Vec<u32>], iterations: u32, retention: f32) {
    for _ in 0..iterations {
        let previous = positions.to_vec();
        for (i, ring) in neighbors.iter().enumerate() {
            if ring.is_empty() {
                continue;
            }
            let sum: Vec3 = ring.iter().map(|&n| previous[n as usize]).sum();
            let mean = sum / ring.len() as f32;
            positions[i] = previous[i] * retention + mean * (1.0 - retention);
        }
    }
}

/// Smooths a garment, then recomputes its normals once.
///
/// Zero iterations leave the mesh untouched.
pub fn smooth(mesh: &mut GarmentMesh, iterations: u32, retention: f32) {
    if iterations == 0 {
        return;
    }
    let buffers = &mut mesh.buffers;
    let neighbors = vertex_neighbors(buffers.positions.len(), &buffers.indices);
    smooth_positions(&mut buffers.positions, &neighbors, iterations, retention);
    buffers.recompute_normals();
    log::debug!("smoothed '{}' with {} iteration(s)", mesh.name, iterations);
}
