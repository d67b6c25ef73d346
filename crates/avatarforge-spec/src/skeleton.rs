//! Skeleton types, rig-name canonicalization, and the one-time hierarchy sort.
//!
//! Rig exports name the same humanoid joints differently (`mixamorig:LeftArm`,
//! `upper_arm_l`, `Bip01 L UpperArm`, ...). Names are canonicalized once when
//! a [`Skeleton`] is built; everything downstream looks joints up through the
//! enum-keyed [`JointTable`].

use std::collections::VecDeque;

use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::SkeletonError;

/// A joint as delivered by the rig snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletalJoint {
    /// Joint name as exported by the rig.
    pub name: String,
    /// Parent joint index, -1 for roots.
    pub parent_index: i32,
    /// Rest translation relative to the parent.
    pub rest_translation: Vec3,
    /// Rest rotation relative to the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_rotation: Option<Quat>,
}

impl SkeletalJoint {
    /// Creates a joint with no rest rotation.
    pub fn new(name: impl Into<String>, parent_index: i32, rest_translation: Vec3) -> Self {
        Self {
            name: name.into(),
            parent_index,
            rest_translation,
            rest_rotation: None,
        }
    }

    fn local_transform(&self) -> Affine3A {
        Affine3A::from_rotation_translation(
            self.rest_rotation.unwrap_or(Quat::IDENTITY),
            self.rest_translation,
        )
    }
}

/// Canonical humanoid joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalJoint {
    Hips,
    Spine,
    Spine1,
    Spine2,
    Neck,
    Head,
    LeftShoulder,
    LeftArm,
    LeftForeArm,
    LeftHand,
    RightShoulder,
    RightArm,
    RightForeArm,
    RightHand,
    LeftUpLeg,
    LeftLeg,
    LeftFoot,
    RightUpLeg,
    RightLeg,
    RightFoot,
}

/// Body side of a sided joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Mirror sign along X (+1 left, -1 right).
    pub fn mirror(&self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl CanonicalJoint {
    /// Number of canonical joints.
    pub const COUNT: usize = 20;

    /// All canonical joints in table order.
    pub const ALL: [CanonicalJoint; Self::COUNT] = [
        CanonicalJoint::Hips,
        CanonicalJoint::Spine,
        CanonicalJoint::Spine1,
        CanonicalJoint::Spine2,
        CanonicalJoint::Neck,
        CanonicalJoint::Head,
        CanonicalJoint::LeftShoulder,
        CanonicalJoint::LeftArm,
        CanonicalJoint::LeftForeArm,
        CanonicalJoint::LeftHand,
        CanonicalJoint::RightShoulder,
        CanonicalJoint::RightArm,
        CanonicalJoint::RightForeArm,
        CanonicalJoint::RightHand,
        CanonicalJoint::LeftUpLeg,
        CanonicalJoint::LeftLeg,
        CanonicalJoint::LeftFoot,
        CanonicalJoint::RightUpLeg,
        CanonicalJoint::RightLeg,
        CanonicalJoint::RightFoot,
    ];

    /// Canonical (Mixamo-style) joint name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalJoint::Hips => "Hips",
            CanonicalJoint::Spine => "Spine",
            CanonicalJoint::Spine1 => "Spine1",
            CanonicalJoint::Spine2 => "Spine2",
            CanonicalJoint::Neck => "Neck",
            CanonicalJoint::Head => "Head",
            CanonicalJoint::LeftShoulder => "LeftShoulder",
            CanonicalJoint::LeftArm => "LeftArm",
            CanonicalJoint::LeftForeArm => "LeftForeArm",
            CanonicalJoint::LeftHand => "LeftHand",
            CanonicalJoint::RightShoulder => "RightShoulder",
            CanonicalJoint::RightArm => "RightArm",
            CanonicalJoint::RightForeArm => "RightForeArm",
            CanonicalJoint::RightHand => "RightHand",
            CanonicalJoint::LeftUpLeg => "LeftUpLeg",
            CanonicalJoint::LeftLeg => "LeftLeg",
            CanonicalJoint::LeftFoot => "LeftFoot",
            CanonicalJoint::RightUpLeg => "RightUpLeg",
            CanonicalJoint::RightLeg => "RightLeg",
            CanonicalJoint::RightFoot => "RightFoot",
        }
    }

    fn table_index(&self) -> usize {
        *self as usize
    }

    /// Canonicalizes a rig joint name.
    ///
    /// Returns `None` for joints outside the canonical set (fingers, toes,
    /// twist bones, rig roots).
    pub fn from_rig_name(name: &str) -> Option<Self> {
        let normalized = normalize_rig_name(name);
        match normalized.as_str() {
            "hips" | "hip" | "pelvis" => return Some(CanonicalJoint::Hips),
            "spine" | "spine0" | "spine00" | "abdomen" => return Some(CanonicalJoint::Spine),
            "spine1" | "spine01" | "spine001" => return Some(CanonicalJoint::Spine1),
            "spine2" | "spine02" | "spine002" | "chest" | "upperchest" => {
                return Some(CanonicalJoint::Spine2)
            }
            "neck" | "neck1" | "neck01" => return Some(CanonicalJoint::Neck),
            "head" => return Some(CanonicalJoint::Head),
            _ => {}
        }

        let (side, stem) = if let Some(stem) = normalized.strip_prefix("left") {
            (Side::Left, stem)
        } else if let Some(stem) = normalized.strip_prefix("right") {
            (Side::Right, stem)
        } else {
            return None;
        };
        Self::sided(side, stem)
    }

    fn sided(side: Side, stem: &str) -> Option<Self> {
        use CanonicalJoint::*;
        let pick = |left: CanonicalJoint, right: CanonicalJoint| match side {
            Side::Left => left,
            Side::Right => right,
        };
        let joint = match stem {
            "shoulder" | "clavicle" | "collar" => pick(LeftShoulder, RightShoulder),
            "arm" | "upperarm" => pick(LeftArm, RightArm),
            "forearm" | "lowerarm" | "elbow" => pick(LeftForeArm, RightForeArm),
            "hand" | "wrist" => pick(LeftHand, RightHand),
            "upleg" | "thigh" | "upperleg" => pick(LeftUpLeg, RightUpLeg),
            "leg" | "calf" | "shin" | "lowerleg" | "knee" => pick(LeftLeg, RightLeg),
            "foot" | "ankle" => pick(LeftFoot, RightFoot),
            _ => return None,
        };
        Some(joint)
    }

    /// Body side, `None` for center-line joints.
    pub fn side(&self) -> Option<Side> {
        use CanonicalJoint::*;
        match self {
            Hips | Spine | Spine1 | Spine2 | Neck | Head => None,
            LeftShoulder | LeftArm | LeftForeArm | LeftHand | LeftUpLeg | LeftLeg | LeftFoot => {
                Some(Side::Left)
            }
            _ => Some(Side::Right),
        }
    }
}

impl std::fmt::Display for CanonicalJoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const SIDED_STEMS: [&str; 18] = [
    "shoulder", "clavicle", "collar", "arm", "upperarm", "forearm", "lowerarm", "elbow", "hand",
    "wrist", "upleg", "thigh", "upperleg", "leg", "calf", "shin", "lowerleg", "foot",
];

/// Normalizes a rig joint name to lowercase alphanumerics with the body
/// side, if any, moved to a `left`/`right` prefix.
///
/// Handles namespace prefixes (`mixamorig:`, `Armature|`), `DEF-` and
/// `Bip01` prefixes, and `_l`/`.R`/`L_` side markers:
///
/// ```
/// use avatarforge_spec::skeleton::normalize_rig_name;
///
/// assert_eq!(normalize_rig_name("mixamorig:LeftForeArm"), "leftforearm");
/// assert_eq!(normalize_rig_name("upper_arm_l"), "leftupperarm");
/// assert_eq!(normalize_rig_name("Bip01 R Thigh"), "rightthigh");
/// assert_eq!(normalize_rig_name("DEF-hand.L"), "lefthand");
/// ```
pub fn normalize_rig_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let mut rest = lower
        .rsplit(|c| c == ':' || c == '|')
        .next()
        .unwrap_or("")
        .trim();
    for prefix in ["mixamorig", "def-", "def_", "bip001", "bip01"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());
        }
    }

    let mut side = None;
    let mut body = rest;
    for (marker, marker_side) in [
        ("_l", Side::Left),
        (".l", Side::Left),
        ("-l", Side::Left),
        (" l", Side::Left),
        ("_r", Side::Right),
        (".r", Side::Right),
        ("-r", Side::Right),
        (" r", Side::Right),
    ] {
        if let Some(stripped) = body.strip_suffix(marker) {
            side = Some(marker_side);
            body = stripped;
            break;
        }
    }
    if side.is_none() {
        for (marker, marker_side) in [
            ("l_", Side::Left),
            ("l ", Side::Left),
            ("l.", Side::Left),
            ("r_", Side::Right),
            ("r ", Side::Right),
            ("r.", Side::Right),
        ] {
            if let Some(stripped) = body.strip_prefix(marker) {
                side = Some(marker_side);
                body = stripped;
                break;
            }
        }
    }

    let alnum: String = body.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    match side {
        Some(side) => format!("{}{}", side.prefix(), alnum),
        None => {
            // "lthigh" style: single-letter side glued to a sided stem
            for (letter, letter_side) in [('l', Side::Left), ('r', Side::Right)] {
                if let Some(stem) = alnum.strip_prefix(letter) {
                    if SIDED_STEMS.contains(&stem) {
                        return format!("{}{}", letter_side.prefix(), stem);
                    }
                }
            }
            alnum
        }
    }
}

/// Canonical joint to skeleton index lookup, built once per skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JointTable {
    slots: [Option<usize>; CanonicalJoint::COUNT],
}

impl JointTable {
    /// Builds the table from rig joint names. The first joint that
    /// canonicalizes to a given canonical joint wins.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = Self::default();
        for (index, name) in names.into_iter().enumerate() {
            let Some(joint) = CanonicalJoint::from_rig_name(name) else {
                continue;
            };
            let slot = &mut table.slots[joint.table_index()];
            if slot.is_none() {
                *slot = Some(index);
            } else {
                log::debug!("duplicate rig joint '{}' for {}, keeping first", name, joint);
            }
        }
        table
    }

    /// Skeleton index of a canonical joint; `None` when the rig lacks it.
    pub fn resolve(&self, joint: CanonicalJoint) -> Option<usize> {
        self.slots[joint.table_index()]
    }

    /// Resolves every joint that exists on this rig, skipping the rest.
    pub fn resolve_all(&self, joints: &[CanonicalJoint]) -> Vec<usize> {
        joints
            .iter()
            .filter_map(|joint| {
                let resolved = self.resolve(*joint);
                if resolved.is_none() {
                    log::debug!("joint {} not present on this rig, skipping", joint);
                }
                resolved
            })
            .collect()
    }

    /// Number of canonical joints present on the rig.
    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// A validated joint hierarchy.
///
/// Joint indices keep the snapshot order (skin weights reference them);
/// the parent-before-child order is computed once and stored separately.
#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: Vec<SkeletalJoint>,
    order: Vec<usize>,
    table: JointTable,
    rest_world: Vec<Affine3A>,
}

impl Skeleton {
    /// Builds a skeleton, sorting the hierarchy topologically.
    ///
    /// Parents may appear after their children in `joints`.
    pub fn new(joints: Vec<SkeletalJoint>) -> Result<Self, SkeletonError> {
        let order = topological_order(&joints)?;
        let table = JointTable::from_names(joints.iter().map(|j| j.name.as_str()));

        let mut rest_world = vec![Affine3A::IDENTITY; joints.len()];
        for &index in &order {
            let joint = &joints[index];
            let local = joint.local_transform();
            rest_world[index] = match usize::try_from(joint.parent_index) {
                Ok(parent) => rest_world[parent] * local,
                Err(_) => local,
            };
        }

        log::debug!(
            "skeleton built: {} joints, {} canonical",
            joints.len(),
            table.resolved_count()
        );

        Ok(Self {
            joints,
            order,
            table,
            rest_world,
        })
    }

    /// Joints in snapshot order.
    pub fn joints(&self) -> &[SkeletalJoint] {
        &self.joints
    }

    /// Number of joints.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Returns true when the skeleton has no joints.
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joint indices in parent-before-child order.
    pub fn evaluation_order(&self) -> &[usize] {
        &self.order
    }

    /// Canonical joint lookup table.
    pub fn joint_table(&self) -> &JointTable {
        &self.table
    }

    /// Rest-pose world position of a joint.
    pub fn rest_world_position(&self, index: usize) -> Option<Vec3> {
        self.rest_world
            .get(index)
            .map(|transform| Vec3::from(transform.translation))
    }

    /// Rest-pose world position of a canonical joint, if the rig has it.
    pub fn canonical_position(&self, joint: CanonicalJoint) -> Option<Vec3> {
        self.rest_world_position(self.table.resolve(joint)?)
    }
}

fn topological_order(joints: &[SkeletalJoint]) -> Result<Vec<usize>, SkeletonError> {
    let count = joints.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut queue = VecDeque::new();

    for (index, joint) in joints.iter().enumerate() {
        if joint.parent_index == -1 {
            queue.push_back(index);
            continue;
        }
        match usize::try_from(joint.parent_index) {
            Ok(parent) if parent < count => children[parent].push(index),
            _ => {
                return Err(SkeletonError::DanglingParent {
                    joint: joint.name.clone(),
                    parent_index: joint.parent_index,
                })
            }
        }
    }

    let mut order = Vec::with_capacity(count);
    while let Some(index) = queue.pop_front() {
        order.push(index);
        queue.extend(children[index].iter().copied());
    }

    if order.len() < count {
        let mut visited = vec![false; count];
        for &index in &order {
            visited[index] = true;
        }
        let stuck = visited.iter().position(|v| !v).unwrap_or(0);
        return Err(SkeletonError::Cycle {
            joint: joints[stuck].name.clone(),
        });
    }

    Ok(order)
}
