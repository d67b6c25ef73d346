//! AvatarForge Garment Backend
//!
//! Builds independently skinned armor and clothing meshes from a skinned
//! base body. Each occupied equipment slot becomes one garment:
//!
//! 1. **Classify** - every base vertex gets a coarse anatomical region from
//!    its dominant skin joint, once per base-mesh load
//! 2. **Extract** - triangles in the slot's regions that pass the joint and
//!    height filters are copied out and pushed along their normals
//! 3. **Smooth** - material-dependent 1-ring relaxation
//! 4. **Rim** - open borders of stiff materials are thickened
//!
//! Garments keep the base mesh's joint indices and weights verbatim and share
//! its skeleton, so they follow any pose or morphology applied to it.
//!
//! # Example
//!
//! ```
//! use avatarforge_backend_garment::{AvatarSession, BaseMeshSnapshot};
//! use avatarforge_spec::{EquipmentSlot, Recipe, SkeletalJoint};
//! use glam::Vec3;
//!
//! let snapshot = BaseMeshSnapshot {
//!     positions: vec![0.0, 100.0, 5.0, 10.0, 100.0, 5.0, 0.0, 120.0, 5.0],
//!     indices: vec![0, 1, 2],
//!     joint_indices: vec![0; 12],
//!     joint_weights: vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
//!     normals: None,
//!     uvs: None,
//!     region_ids: None,
//!     joints: vec![SkeletalJoint::new("Spine", -1, Vec3::new(0.0, 100.0, 0.0))],
//! };
//!
//! let mut session = AvatarSession::new();
//! session.load_base(snapshot)?;
//! let recipe = Recipe::default().with_slot(EquipmentSlot::Torso, "ClothShirt");
//! let garments = session.apply_recipe(&recipe)?;
//! assert_eq!(garments[0].name, "armor_Torso_ClothShirt");
//! # Ok::<(), avatarforge_backend_garment::GarmentError>(())
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod garment;
pub mod lint;
pub mod material;
pub mod mesh;
pub mod normals;
pub mod pipeline;
pub mod region;
pub mod rim;
pub mod session;
pub mod smooth;

pub use config::{GarmentConfig, MaterialPreset, SlotPreset};
pub use error::{GarmentError, GarmentResult};
pub use extract::{extract_garment, ExtractionParams, GarmentBuffers, HeightBand, JointSet, NormalConvention};
pub use garment::GarmentMesh;
pub use lint::{check_skinning, SkinningIssue};
pub use material::GarmentMaterial;
pub use mesh::{BaseMesh, BaseMeshSnapshot};
pub use pipeline::{build_garment, GarmentPlan};
pub use region::{RegionId, RegionSet, VertexClassification};
pub use rim::{boundary_edges, thicken_rim};
pub use session::AvatarSession;
pub use smooth::smooth;
