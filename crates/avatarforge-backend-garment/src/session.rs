//! Explicit per-avatar context: loaded base mesh plus current garments.

use avatarforge_backend_parts::solve_with_config;
use avatarforge_backend_parts::SolverConfig;
use avatarforge_spec::{BodyPartDescriptor, Recipe};

use crate::config::GarmentConfig;
use crate::error::{GarmentError, GarmentResult};
use crate::garment::GarmentMesh;
use crate::lint::{check_skinning, Severity};
use crate::mesh::{BaseMesh, BaseMeshSnapshot};
use crate::pipeline::build_garment;
use crate::region::VertexClassification;

/// A base mesh with its per-load classification cache.
#[derive(Debug, Clone)]
pub struct LoadedBase {
    pub mesh: BaseMesh,
    pub classification: VertexClassification,
}

/// Owns everything the renderer needs for one avatar.
///
/// Garments are rebuilt in full on every equipment change; the previous set
/// is dropped before the new one is built.
#[derive(Debug, Default)]
pub struct AvatarSession {
    solver: SolverConfig,
    config: GarmentConfig,
    base: Option<LoadedBase>,
    descriptors: Vec<BodyPartDescriptor>,
    garments: Vec<GarmentMesh>,
}

impl AvatarSession {
    /// Creates an empty session with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session with explicit configuration.
    pub fn with_config(solver: SolverConfig, config: GarmentConfig) -> Self {
        Self {
            solver,
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &GarmentConfig {
        &self.config
    }

    /// Replaces the garment configuration. Existing garments are kept until
    /// the next apply.
    pub fn set_config(&mut self, config: GarmentConfig) {
        self.config = config;
    }

    /// Validates and loads a base mesh snapshot.
    ///
    /// Replaces any previous base and drops its garments.
    pub fn load_base(&mut self, snapshot: BaseMeshSnapshot) -> GarmentResult<&LoadedBase> {
        let mesh = BaseMesh::from_snapshot(snapshot)?;
        Ok(self.load_base_mesh(mesh))
    }

    /// Loads an already validated base mesh and classifies its vertices.
    pub fn load_base_mesh(&mut self, mesh: BaseMesh) -> &LoadedBase {
        self.clear_garments();
        let classification = VertexClassification::classify(&mesh);
        self.base.insert(LoadedBase {
            mesh,
            classification,
        })
    }

    /// The loaded base, if any.
    pub fn base(&self) -> Option<&LoadedBase> {
        self.base.as_ref()
    }

    /// Replaces the kept descriptors and rebuilds garments for every
    /// equipment descriptor.
    ///
    /// Non-equipment descriptors are ignored. Slots that cover no triangles
    /// of the base produce no garment.
    pub fn apply_descriptors(&mut self, descriptors: &[BodyPartDescriptor]) -> GarmentResult<&[GarmentMesh]> {
        self.descriptors = descriptors.to_vec();
        self.rebuild_garments()
    }

    /// Solves a recipe and rebuilds garments from the result.
    ///
    /// The descriptors are kept for the renderer's tube geometry.
    pub fn apply_recipe(&mut self, recipe: &Recipe) -> GarmentResult<&[GarmentMesh]> {
        self.descriptors = solve_with_config(recipe, &self.solver);
        self.rebuild_garments()
    }

    fn rebuild_garments(&mut self) -> GarmentResult<&[GarmentMesh]> {
        self.clear_garments();
        let base = self.base.as_ref().ok_or(GarmentError::NoBaseMesh)?;

        let mut garments = Vec::new();
        for descriptor in &self.descriptors {
            let Some(equipment) = descriptor.equipment() else {
                continue;
            };
            let Some(garment) = build_garment(
                &base.mesh,
                &base.classification,
                &equipment,
                &descriptor.color,
                &self.config,
            ) else {
                continue;
            };

            for issue in check_skinning(&garment) {
                match issue.severity {
                    Severity::Error => log::warn!(
                        "{}: {} ({}) at {}",
                        garment.name,
                        issue.message,
                        issue.rule_id,
                        issue.location.as_deref().unwrap_or("-")
                    ),
                    Severity::Warning => log::debug!("{}: {} ({})", garment.name, issue.message, issue.rule_id),
                }
            }
            garments.push(garment);
        }

        self.garments = garments;
        Ok(&self.garments)
    }

    /// Descriptors from the last `apply_recipe` or `apply_descriptors`.
    pub fn descriptors(&self) -> &[BodyPartDescriptor] {
        &self.descriptors
    }

    /// Current garments.
    pub fn garments(&self) -> &[GarmentMesh] {
        &self.garments
    }

    /// Drops every garment.
    pub fn clear_garments(&mut self) {
        if !self.garments.is_empty() {
            log::debug!("disposing {} garment(s)", self.garments.len());
            self.garments.clear();
        }
    }
}
