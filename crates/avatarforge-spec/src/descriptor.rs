//! Body-part descriptors: the only boundary between the solver and everything downstream.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::equipment::EquipmentName;
use crate::skeleton::CanonicalJoint;

/// Which ends of a tube are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapMode {
    None,
    Start,
    End,
    #[default]
    Both,
}

impl CapMode {
    /// Returns true when the first ring is capped.
    pub fn caps_start(&self) -> bool {
        matches!(self, CapMode::Start | CapMode::Both)
    }

    /// Returns true when the last ring is capped.
    pub fn caps_end(&self) -> bool {
        matches!(self, CapMode::End | CapMode::Both)
    }
}

/// One unit of solver output: raw tube geometry or an equipment-slot marker.
///
/// # Radii convention
///
/// - no radii: radius 1.0 everywhere
/// - one radius: uniform
/// - `radii.len() == path.len()`: one radius per sample
/// - any other length: linear start/end taper between the first and last
///   value, sampled at `t = i / (n - 1)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPartDescriptor {
    /// Role name; equipment markers use `"<Slot>_<Type>"`.
    pub name: String,
    /// Tube centerline, possibly empty.
    #[serde(default)]
    pub path: Vec<Vec3>,
    /// Radius samples, see the radii convention.
    #[serde(default)]
    pub radii: Vec<f32>,
    /// Non-uniform post-scale.
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    /// `#RRGGBB` color.
    pub color: String,
    /// Local attach-point offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Vec3>,
    /// Tube end caps.
    #[serde(default)]
    pub cap_mode: CapMode,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl BodyPartDescriptor {
    /// Creates an equipment-slot marker with no geometry.
    pub fn marker(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: Vec::new(),
            radii: Vec::new(),
            scale: Vec3::ONE,
            color: color.into(),
            origin: None,
            cap_mode: CapMode::None,
        }
    }

    /// Creates a tube descriptor.
    pub fn tube(
        name: impl Into<String>,
        path: Vec<Vec3>,
        radii: Vec<f32>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path,
            radii,
            scale: Vec3::ONE,
            color: color.into(),
            origin: None,
            cap_mode: CapMode::Both,
        }
    }

    /// Sets the post-scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the local attach offset.
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Sets the cap mode.
    pub fn with_cap_mode(mut self, cap_mode: CapMode) -> Self {
        self.cap_mode = cap_mode;
        self
    }

    /// Parses the name as an equipment marker.
    pub fn equipment(&self) -> Option<EquipmentName> {
        EquipmentName::parse(&self.name)
    }

    /// Returns true for equipment markers routed to the garment pipeline.
    pub fn is_equipment(&self) -> bool {
        self.equipment().is_some()
    }

    /// Returns true when the descriptor carries tube geometry.
    pub fn is_geometry(&self) -> bool {
        self.path.len() >= 2
    }

    /// Radius at path sample `index`, following the radii convention.
    ///
    /// Out-of-range indices are clamped to the last sample.
    pub fn radius_at(&self, index: usize) -> f32 {
        match self.radii.len() {
            0 => 1.0,
            1 => self.radii[0],
            len if len == self.path.len() => self.radii[index.min(len - 1)],
            len => {
                let samples = self.path.len();
                if samples < 2 {
                    return self.radii[0];
                }
                let t = index.min(samples - 1) as f32 / (samples - 1) as f32;
                self.radii[0] * (1.0 - t) + self.radii[len - 1] * t
            }
        }
    }

    /// Path point at `index`, clamped to the valid range.
    ///
    /// Returns `None` only for an empty path.
    pub fn anchor_point(&self, index: usize) -> Option<Vec3> {
        clamped_point(&self.path, index)
    }
}

/// Path point at `index`, clamped to the valid range.
pub fn clamped_point(path: &[Vec3], index: usize) -> Option<Vec3> {
    let last = path.len().checked_sub(1)?;
    Some(path[index.min(last)])
}

/// Hand attach point for arsenal parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachPoint;

impl AttachPoint {
    /// Joint an arsenal part should follow, if any.
    ///
    /// Swords and spears go in the right hand, shields in the left. Other
    /// parts (limbs, tubes, equipment markers) are not hand-attached.
    pub fn for_part(name: &str) -> Option<CanonicalJoint> {
        if name.contains("Sword") || name.contains("Spear") {
            Some(CanonicalJoint::RightHand)
        } else if name.contains("Shield") {
            Some(CanonicalJoint::LeftHand)
        } else {
            None
        }
    }
}

/// External seam that turns tube descriptors into renderable geometry.
pub trait TubeMesher {
    /// Renderer-side geometry handle.
    type Output;

    /// Meshes one geometry descriptor. Only called when `is_geometry()` holds.
    fn mesh_tube(&mut self, descriptor: &BodyPartDescriptor) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(0.0, i as f32, 0.0)).collect()
    }

    #[test]
    fn test_radius_per_sample() {
        let d = BodyPartDescriptor::tube("Limb", path(3), vec![1.0, 2.0, 3.0], "#FFFFFF");
        assert_eq!(d.radius_at(0), 1.0);
        assert_eq!(d.radius_at(2), 3.0);
        assert_eq!(d.radius_at(10), 3.0);
    }

    #[test]
    fn test_radius_taper_endpoints() {
        let d = BodyPartDescriptor::tube("Blade", path(5), vec![2.0, 0.0], "#FFFFFF");
        assert_eq!(d.radius_at(0), 2.0);
        assert_eq!(d.radius_at(2), 1.0);
        assert_eq!(d.radius_at(4), 0.0);
    }

    #[test]
    fn test_radius_uniform_and_missing() {
        let d = BodyPartDescriptor::tube("Pole", path(4), vec![0.5], "#FFFFFF");
        assert_eq!(d.radius_at(3), 0.5);
        let d = BodyPartDescriptor::tube("Pole", path(4), vec![], "#FFFFFF");
        assert_eq!(d.radius_at(3), 1.0);
    }

    #[test]
    fn test_anchor_point_clamped() {
        let d = BodyPartDescriptor::tube("Arm", path(3), vec![1.0], "#FFFFFF");
        assert_eq!(d.anchor_point(1), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(d.anchor_point(99), Some(Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(BodyPartDescriptor::marker("Torso_Shirt", "#FFFFFF").anchor_point(0), None);
    }

    #[test]
    fn test_equipment_routing() {
        let marker = BodyPartDescriptor::marker("Torso_PlateArmor", "#C0C0C0");
        assert!(marker.is_equipment());
        assert!(!marker.is_geometry());

        let blade = BodyPartDescriptor::tube("SwordBlade", path(3), vec![1.0], "#C0C0C0");
        assert!(!blade.is_equipment());
        assert!(blade.is_geometry());
    }

    #[test]
    fn test_attach_points() {
        assert_eq!(AttachPoint::for_part("SwordBlade"), Some(CanonicalJoint::RightHand));
        assert_eq!(AttachPoint::for_part("SpearHead"), Some(CanonicalJoint::RightHand));
        assert_eq!(AttachPoint::for_part("ShieldPlate"), Some(CanonicalJoint::LeftHand));
        assert_eq!(AttachPoint::for_part("LeftArm"), None);
    }

    /// Records the ring radii a renderer would sweep.
    struct RingRecorder;

    impl TubeMesher for RingRecorder {
        type Output = Vec<(Vec3, f32)>;

        fn mesh_tube(&mut self, descriptor: &BodyPartDescriptor) -> Self::Output {
            (0..descriptor.path.len())
                .map(|i| (descriptor.path[i] * descriptor.scale, descriptor.radius_at(i)))
                .collect()
        }
    }

    #[test]
    fn test_mesher_only_sees_geometry() {
        let parts = vec![
            BodyPartDescriptor::tube("SpearShaft", path(4), vec![1.0, 0.5], "#8B5A2B")
                .with_scale(Vec3::new(1.0, 2.0, 1.0)),
            BodyPartDescriptor::marker("Head_ClothHood", "#3B5998"),
        ];
        let mut mesher = RingRecorder;
        let rings: Vec<_> = parts
            .iter()
            .filter(|d| d.is_geometry())
            .map(|d| mesher.mesh_tube(d))
            .collect();

        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0][3], (Vec3::new(0.0, 6.0, 0.0), 0.5));
    }

    #[test]
    fn test_descriptor_serde_defaults() {
        let d: BodyPartDescriptor =
            serde_json::from_str(r##"{"name": "Torso_Shirt", "color": "#3B5998"}"##).unwrap();
        assert!(d.path.is_empty());
        assert_eq!(d.scale, Vec3::ONE);
        assert_eq!(d.cap_mode, CapMode::Both);
        assert_eq!(d.origin, None);
    }
}
