//! AvatarForge Body-Part Solver
//!
//! Turns a [`Recipe`](avatarforge_spec::Recipe) into an ordered list of
//! [`BodyPartDescriptor`](avatarforge_spec::BodyPartDescriptor)s: tube limbs,
//! an optional torso/head tube, joint-fill balls, hand-held weapons, and one
//! marker per occupied equipment slot.
//!
//! The solver is a pure function. It never fails and never reads global
//! state; the same recipe and configuration always produce the same list.
//!
//! # Example
//!
//! ```
//! use avatarforge_backend_parts::{solve, create_line};
//! use avatarforge_spec::{BodyStyle, Recipe};
//! use glam::Vec3;
//!
//! let recipe = Recipe {
//!     body_style: BodyStyle::Limbs,
//!     has_sword: true,
//!     ..Default::default()
//! };
//! let parts = solve(&recipe);
//! assert_eq!(parts[0].name, "LeftArm");
//!
//! assert_eq!(create_line(Vec3::ZERO, Vec3::ONE, 2), vec![Vec3::ZERO, Vec3::ONE]);
//! ```

pub mod anatomy;
pub mod config;
pub mod joint_fill;
pub mod limbs;
pub mod line;
pub mod morphology;
pub mod slots;
pub mod solve;
pub mod tube;
pub mod weapons;

pub use config::{SolverConfig, TubeBand};
pub use line::create_line;
pub use morphology::MorphologyScales;
pub use solve::{solve, solve_with_config};
