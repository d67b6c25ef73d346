//! AvatarForge canonical types.
//!
//! This crate holds the data that flows between the geometry solver and the
//! garment pipeline: the user [`Recipe`], the [`BodyPartDescriptor`] list the
//! solver emits, equipment slot naming, colors, and the skeleton model with
//! its canonical joint table.
//!
//! # Example
//!
//! ```
//! use avatarforge_spec::{Recipe, EquipmentName, EquipmentSlot};
//! use avatarforge_spec::validation::validate_recipe;
//! use avatarforge_spec::hash::canonical_recipe_hash;
//!
//! let recipe = Recipe::from_json(r##"{"torso_slot": "PlateArmor", "metal_color": "#C0C0C0"}"##).unwrap();
//! assert!(validate_recipe(&recipe).is_ok());
//!
//! let name = EquipmentName::parse("Torso_PlateArmor").unwrap();
//! assert_eq!(name.slot, EquipmentSlot::Torso);
//!
//! let hash = canonical_recipe_hash(&recipe).unwrap();
//! assert_eq!(hash.len(), 64);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types
//! - [`color`]: `#RRGGBB` parsing and formatting
//! - [`equipment`]: Equipment slots, material classes, descriptor names
//! - [`recipe`]: The recipe record
//! - [`descriptor`]: Solver output and the tube meshing seam
//! - [`skeleton`]: Joints, canonical joint table, hierarchy sort
//! - [`validation`]: Recipe validation
//! - [`hash`]: Canonical hashing

pub mod color;
pub mod descriptor;
pub mod equipment;
pub mod error;
pub mod hash;
pub mod recipe;
pub mod skeleton;
pub mod validation;

pub use color::Color;
pub use descriptor::{AttachPoint, BodyPartDescriptor, CapMode, TubeMesher};
pub use equipment::{EquipmentName, EquipmentSlot, MaterialClass};
pub use error::{
    BackendError, ErrorCode, SkeletonError, SpecError, ValidationError, ValidationResult,
    ValidationWarning, WarningCode,
};
pub use recipe::{BodyStyle, Recipe};
pub use skeleton::{CanonicalJoint, JointTable, Side, SkeletalJoint, Skeleton};
