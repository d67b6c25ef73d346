//! Area-weighted vertex normals.

use glam::Vec3;

/// Computes smooth vertex normals from triangle faces.
///
/// Each face contributes its un-normalized cross product, so larger faces
/// weigh more. Vertices with no faces (or only degenerate ones) get `+Y`.
/// Triangles with out-of-range indices are ignored.
pub fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut accum = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }
    accum
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

/// Area of the triangle `(a, b, c)`.
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    (b - a).cross(c - a).length() * 0.5
}
