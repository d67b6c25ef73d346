//! AvatarForge End-to-End Test Infrastructure
//!
//! Integration tests for the full recipe to garment flow:
//!
//! - **Pipeline**: recipe -> descriptors -> garments on a synthetic body
//! - **Determinism**: identical inputs give byte-identical garment buffers
//! - **Session lifecycle**: load, equip, re-equip, unequip, reload
//! - **Morphology**: garments stay validly skinned under skeleton rescaling
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p avatarforge-tests
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{garment_fingerprint, verify_determinism, DeterminismResult};
pub use fixtures::{humanoid_skeleton, BodyFixture};
