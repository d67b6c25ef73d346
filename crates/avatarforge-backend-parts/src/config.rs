//! Solver tuning parameters.

use serde::{Deserialize, Serialize};

use crate::anatomy::RestProportions;

/// One radius key of the torso/head tube profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubeBand {
    /// Band name (pelvis, waist, chest, neck, head, crown).
    pub name: String,
    /// Position along the pelvis-to-crown path, 0.0 to 1.0.
    pub t: f32,
    /// Radius at this band before width scaling.
    pub radius: f32,
}

impl TubeBand {
    /// Creates a band key.
    pub fn new(name: impl Into<String>, t: f32, radius: f32) -> Self {
        Self {
            name: name.into(),
            t,
            radius,
        }
    }
}

/// Default torso/head tube profile, ordered by `t`.
pub fn default_tube_bands() -> Vec<TubeBand> {
    vec![
        TubeBand::new("pelvis", 0.0, 14.0),
        TubeBand::new("waist", 0.22, 11.5),
        TubeBand::new("chest", 0.48, 15.5),
        TubeBand::new("neck", 0.66, 5.5),
        TubeBand::new("head", 0.84, 10.0),
        TubeBand::new("crown", 1.0, 3.0),
    ]
}

/// Configuration for the geometry solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Radius multiplier applied to the last limb sample (wrist/ankle), below 1.0.
    pub taper_factor: f32,
    /// Base arm radius before thickness scaling.
    pub arm_radius: f32,
    /// Mid-arm bulge added on top of the base radius.
    pub arm_bulge: f32,
    /// Base leg radius before thickness scaling.
    pub leg_radius: f32,
    /// Mid-leg bulge added on top of the base radius.
    pub leg_bulge: f32,
    /// Samples per joint-fill ball.
    pub joint_fill_samples: usize,
    /// Joint-fill radius relative to the limb radius at the anchor.
    pub joint_fill_scale: f32,
    /// Samples along the torso/head tube.
    pub tube_samples: usize,
    /// Torso/head tube radius profile.
    pub tube_bands: Vec<TubeBand>,
    /// Front-to-back depth of the torso tube relative to its width.
    pub tube_depth_ratio: f32,
    /// Neutral body proportions.
    pub proportions: RestProportions,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            taper_factor: 0.7,
            arm_radius: 4.5,
            arm_bulge: 1.0,
            leg_radius: 6.5,
            leg_bulge: 1.5,
            joint_fill_samples: 5,
            joint_fill_scale: 1.05,
            tube_samples: 16,
            tube_bands: default_tube_bands(),
            tube_depth_ratio: 0.7,
            proportions: RestProportions::default(),
        }
    }
}

impl SolverConfig {
    /// Parses a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
