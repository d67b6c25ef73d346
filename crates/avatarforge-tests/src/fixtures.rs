//! Synthetic bodies and shapes for integration tests.
//!
//! The humanoid body is a set of open cylinders (torso, head, arms, legs)
//! skinned to a 20-joint Mixamo-style rig, in centimetres with the feet at
//! y = 0. Faces wind outward and the shipped normals point away from each
//! cylinder's axis.

use std::collections::HashMap;
use std::sync::Arc;

use avatarforge_backend_garment::{
    BaseMesh, BaseMeshSnapshot, GarmentBuffers, GarmentMaterial, GarmentMesh,
};
use avatarforge_spec::{EquipmentSlot, MaterialClass, SkeletalJoint, Skeleton};
use glam::Vec3;

/// Vertices per cylinder ring.
pub const SEGMENTS: usize = 16;

/// Torso cylinder radius; the body's vertical axis is x = z = 0.
pub const TORSO_RADIUS: f32 = 15.0;

/// Joint indices of the humanoid rig.
pub mod joints {
    pub const HIPS: u32 = 0;
    pub const SPINE: u32 = 1;
    pub const SPINE1: u32 = 2;
    pub const SPINE2: u32 = 3;
    pub const NECK: u32 = 4;
    pub const HEAD: u32 = 5;
    pub const LEFT_ARM: u32 = 7;
    pub const LEFT_FORE_ARM: u32 = 8;
    pub const LEFT_HAND: u32 = 9;
    pub const RIGHT_ARM: u32 = 11;
    pub const RIGHT_FORE_ARM: u32 = 12;
    pub const RIGHT_HAND: u32 = 13;
    pub const LEFT_UP_LEG: u32 = 14;
    pub const LEFT_LEG: u32 = 15;
    pub const LEFT_FOOT: u32 = 16;
    pub const RIGHT_UP_LEG: u32 = 17;
    pub const RIGHT_LEG: u32 = 18;
    pub const RIGHT_FOOT: u32 = 19;
}

/// Mixamo-named humanoid rig with local rest translations.
pub fn humanoid_joints() -> Vec<SkeletalJoint> {
    let joint = |name: &str, parent: i32, x: f32, y: f32| {
        SkeletalJoint::new(format!("mixamorig:{}", name), parent, Vec3::new(x, y, 0.0))
    };
    vec![
        joint("Hips", -1, 0.0, 95.0),
        joint("Spine", 0, 0.0, 10.0),
        joint("Spine1", 1, 0.0, 12.0),
        joint("Spine2", 2, 0.0, 13.0),
        joint("Neck", 3, 0.0, 15.0),
        joint("Head", 4, 0.0, 10.0),
        joint("LeftShoulder", 3, 6.0, 12.0),
        joint("LeftArm", 6, 12.0, 0.0),
        joint("LeftForeArm", 7, 27.0, 0.0),
        joint("LeftHand", 8, 25.0, 0.0),
        joint("RightShoulder", 3, -6.0, 12.0),
        joint("RightArm", 10, -12.0, 0.0),
        joint("RightForeArm", 11, -27.0, 0.0),
        joint("RightHand", 12, -25.0, 0.0),
        joint("LeftUpLeg", 0, 9.0, -3.0),
        joint("LeftLeg", 14, 0.0, -42.0),
        joint("LeftFoot", 15, 0.0, -42.0),
        joint("RightUpLeg", 0, -9.0, -3.0),
        joint("RightLeg", 17, 0.0, -42.0),
        joint("RightFoot", 18, 0.0, -42.0),
    ]
}

/// The humanoid rig as a shared skeleton.
pub fn humanoid_skeleton() -> Arc<Skeleton> {
    Arc::new(Skeleton::new(humanoid_joints()).expect("humanoid rig is acyclic"))
}

fn rigid(joint: u32) -> ([u32; 4], [f32; 4]) {
    ([joint, 0, 0, 0], [1.0, 0.0, 0.0, 0.0])
}

/// Flat buffers of a synthetic skinned body.
#[derive(Debug, Clone, Default)]
pub struct BodyFixture {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub joint_indices: Vec<[u32; 4]>,
    pub joint_weights: Vec<[f32; 4]>,
}

impl BodyFixture {
    /// Torso, head, two arms and two legs.
    pub fn humanoid() -> Self {
        use joints::*;
        let mut body = Self::default();

        // Torso: blended with the joint above, dominant stays below.
        body.add_tube(Vec3::new(0.0, 92.0, 0.0), Vec3::Y, 53.0, TORSO_RADIUS, 12, |c| {
            let (joint, above) = if c.y < 100.0 {
                (HIPS, SPINE)
            } else if c.y < 115.0 {
                (SPINE, SPINE1)
            } else if c.y < 128.0 {
                (SPINE1, SPINE2)
            } else {
                (SPINE2, NECK)
            };
            ([joint, above, 0, 0], [0.75, 0.25, 0.0, 0.0])
        });

        body.add_tube(Vec3::new(0.0, 145.0, 0.0), Vec3::Y, 33.0, 9.0, 8, |c| {
            rigid(if c.y < 155.0 { NECK } else { HEAD })
        });

        for (sign, [arm, fore, hand]) in [
            (1.0f32, [LEFT_ARM, LEFT_FORE_ARM, LEFT_HAND]),
            (-1.0, [RIGHT_ARM, RIGHT_FORE_ARM, RIGHT_HAND]),
        ] {
            body.add_tube(Vec3::new(18.0 * sign, 142.0, 0.0), Vec3::X * sign, 57.0, 4.5, 24, |c| {
                let x = c.x.abs();
                rigid(if x < 45.0 {
                    arm
                } else if x < 70.0 {
                    fore
                } else {
                    hand
                })
            });
        }

        for (sign, [up, leg, foot]) in [
            (1.0f32, [LEFT_UP_LEG, LEFT_LEG, LEFT_FOOT]),
            (-1.0, [RIGHT_UP_LEG, RIGHT_LEG, RIGHT_FOOT]),
        ] {
            body.add_tube(Vec3::new(9.0 * sign, 0.0, 0.0), Vec3::Y, 92.0, 6.5, 24, |c| {
                rigid(if c.y > 50.0 {
                    up
                } else if c.y > 8.0 {
                    leg
                } else {
                    foot
                })
            });
        }
        body
    }

    /// Appends an open cylinder of `rings` rings from `start` along `axis`.
    ///
    /// `bind` receives each ring's center and returns that ring's influences.
    pub fn add_tube(
        &mut self,
        start: Vec3,
        axis: Vec3,
        length: f32,
        radius: f32,
        rings: usize,
        bind: impl Fn(Vec3) -> ([u32; 4], [f32; 4]),
    ) {
        let (positions, normals, indices) = cylinder(start, axis, length, radius, rings, SEGMENTS);
        let base = self.positions.len() as u32;
        for ring in 0..rings {
            let center = start + axis * length * ring as f32 / (rings - 1) as f32;
            let (joints, weights) = bind(center);
            for _ in 0..SEGMENTS {
                self.joint_indices.push(joints);
                self.joint_weights.push(weights);
            }
        }
        self.positions.extend(positions);
        self.normals.extend(normals);
        self.indices.extend(indices.into_iter().map(|i| i + base));
    }

    /// Validated base mesh on the humanoid skeleton.
    pub fn to_base_mesh(&self) -> BaseMesh {
        BaseMesh::new(
            self.positions.clone(),
            self.indices.clone(),
            self.joint_indices.clone(),
            self.joint_weights.clone(),
            Some(self.normals.clone()),
            humanoid_skeleton(),
        )
        .expect("fixture body is valid")
    }

    /// Flat-buffer snapshot, as a host would export it.
    pub fn to_snapshot(&self) -> BaseMeshSnapshot {
        let flat3 = |v: &[Vec3]| v.iter().flat_map(|p| p.to_array()).collect::<Vec<f32>>();
        BaseMeshSnapshot {
            positions: flat3(&self.positions),
            indices: self.indices.clone(),
            joint_indices: self.joint_indices.iter().flatten().copied().collect(),
            joint_weights: self.joint_weights.iter().flatten().copied().collect(),
            normals: Some(flat3(&self.normals)),
            uvs: None,
            region_ids: None,
            joints: humanoid_joints(),
        }
    }
}

/// Open cylinder with outward winding and outward normals.
///
/// Returns positions, normals and indices.
pub fn cylinder(
    start: Vec3,
    axis: Vec3,
    length: f32,
    radius: f32,
    rings: usize,
    segments: usize,
) -> (Vec<Vec3>, Vec<Vec3>, Vec<u32>) {
    let axis = axis.normalize();
    let helper = if axis.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
    let u = (helper - axis * axis.dot(helper)).normalize();
    let v = axis.cross(u);

    let mut positions = Vec::with_capacity(rings * segments);
    let mut normals = Vec::with_capacity(rings * segments);
    for ring in 0..rings {
        let center = start + axis * length * ring as f32 / (rings - 1) as f32;
        for s in 0..segments {
            let theta = std::f32::consts::TAU * s as f32 / segments as f32;
            let normal = u * theta.cos() + v * theta.sin();
            positions.push(center + normal * radius);
            normals.push(normal);
        }
    }

    let mut indices = Vec::new();
    let seg = segments as u32;
    for ring in 0..rings as u32 - 1 {
        for s in 0..seg {
            let a = ring * seg + s;
            let b = ring * seg + (s + 1) % seg;
            let c = a + seg;
            let d = b + seg;
            indices.extend_from_slice(&[a, b, d, a, d, c]);
        }
    }
    (positions, normals, indices)
}

/// Unit-radius open tube along +Y.
pub fn open_tube(rings: usize, segments: usize) -> (Vec<Vec3>, Vec<u32>) {
    let (positions, _, indices) = cylinder(Vec3::ZERO, Vec3::Y, (rings - 1) as f32, 1.0, rings, segments);
    (positions, indices)
}

/// Icosphere by midpoint subdivision of an icosahedron, outward winding.
///
/// The vertex set is symmetric under `p -> -p`.
pub fn icosphere(subdivisions: u32, radius: f32) -> (Vec<Vec3>, Vec<u32>) {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let mut positions: Vec<Vec3> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();
    let mut indices: Vec<u32> = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| {
            let key = if a < b { (a, b) } else { (b, a) };
            *midpoints.entry(key).or_insert_with(|| {
                let mid = ((positions[a as usize] + positions[b as usize]) * 0.5).normalize();
                positions.push(mid);
                positions.len() as u32 - 1
            })
        };

        let mut next = Vec::with_capacity(indices.len() * 4);
        for tri in indices.chunks_exact(3) {
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            next.extend_from_slice(&[a, ab, ca, b, bc, ab, c, ca, bc, ab, bc, ca]);
        }
        indices = next;
    }

    (positions.into_iter().map(|p| p * radius).collect(), indices)
}

/// Pushes every vertex radially by an even, position-derived amount, so the
/// noisy shape keeps its `p -> -p` symmetry.
pub fn radial_noise(positions: &[Vec3], amplitude: f32) -> Vec<Vec3> {
    positions
        .iter()
        .map(|p| {
            let n = (7.0 * p.x).sin() * (5.0 * p.y).sin() + 0.5 * (3.0 * p.z).cos();
            *p * (1.0 + amplitude * n)
        })
        .collect()
}

/// Garment over raw geometry, rigidly bound to the rig's hips.
pub fn rigid_garment(positions: Vec<Vec3>, indices: Vec<u32>) -> GarmentMesh {
    GarmentMesh::new(
        "armor_Torso_PlateArmor",
        EquipmentSlot::Torso,
        GarmentMaterial::new(MaterialClass::Metal, "#C0C0C0"),
        GarmentBuffers::from_triangles(positions, indices),
        humanoid_skeleton(),
    )
}

/// Distance from the body's vertical axis.
pub fn radial_distance(p: Vec3) -> f32 {
    Vec3::new(p.x, 0.0, p.z).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatarforge_backend_garment::normals::compute_normals;
    use avatarforge_backend_garment::{RegionId, VertexClassification};

    #[test]
    fn test_cylinder_winding_matches_normals() {
        for axis in [Vec3::Y, Vec3::X, Vec3::NEG_X] {
            let (positions, normals, indices) = cylinder(Vec3::ZERO, axis, 10.0, 2.0, 3, SEGMENTS);
            let computed = compute_normals(&positions, &indices);
            for (n, c) in normals.iter().zip(computed.iter()) {
                assert!(n.dot(*c) > 0.9, "axis {:?}: {:?} vs {:?}", axis, n, c);
            }
        }
    }

    #[test]
    fn test_icosphere_counts() {
        let (positions, indices) = icosphere(2, 1.0);
        assert_eq!(positions.len(), 162);
        assert_eq!(indices.len(), 320 * 3);
        let normals = compute_normals(&positions, &indices);
        assert!(positions.iter().zip(normals.iter()).all(|(p, n)| p.dot(*n) > 0.0));
    }

    #[test]
    fn test_humanoid_regions() {
        let mesh = BodyFixture::humanoid().to_base_mesh();
        let classification = VertexClassification::classify(&mesh);
        let histogram = classification.histogram();
        assert_eq!(histogram[RegionId::Torso as usize], 12 * SEGMENTS);
        assert_eq!(histogram[RegionId::HeadNeck as usize], 8 * SEGMENTS);
        assert_eq!(histogram[RegionId::LeftArm as usize], 24 * SEGMENTS);
        assert_eq!(histogram[RegionId::RightLeg as usize], 24 * SEGMENTS);
        assert_eq!(histogram[RegionId::Unclassified as usize], 0);
    }
}
