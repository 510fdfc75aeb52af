//! Bridge between a [`MultiPatch`](crate::patch::MultiPatch) and the mesh
//! generated from it.
//!
//! A regeneration cycle is
//! `begin_model_part → create_nodes → add_elements / add_conditions → end_model_part`.
//! Once ready, field values move between the two sides with
//! [`synchronize_forward`](MultiPatchModelPart::synchronize_forward) (patches →
//! mesh) and [`synchronize_backward`](MultiPatchModelPart::synchronize_backward)
//! (mesh → patches).
//!
//! The readiness checks are soft: gated operations return early without an
//! error. Entity creation is refused once the model part is ready, and
//! synchronization is skipped until it is.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::algs::entity_factory::{EntityRequest, create_entities_from_fe_space};
use crate::bridge_error::BridgeError;
use crate::config::BridgeOptions;
use crate::mesh::entity::EntityContainer;
use crate::mesh::model_part::Mesh;
use crate::mesh::properties::Properties;
use crate::mesh::registry::{EntityCatalog, EntityRegistry};
use crate::patch::boundary::BoundarySide;
use crate::patch::control_grid::{ControlGrid, ControlPoint, Variable};
use crate::patch::fe_space::{BSplineFESpace, FESpace};
use crate::patch::multipatch::SharedMultiPatch;
use crate::topology::point::NodeIdMap;

/// Lifecycle state of a [`MultiPatchModelPart`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BridgeState {
    /// No cycle started yet.
    Uninitialized,
    /// Between `begin_model_part` and `end_model_part`.
    Building,
    /// Mesh finalized.
    Ready,
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Owns the generated mesh and shares the multipatch it was built from.
#[derive(Debug)]
pub struct MultiPatchModelPart {
    multipatch: SharedMultiPatch,
    mesh: Mesh,
    catalog: EntityCatalog,
    options: BridgeOptions,
    node_map: NodeIdMap,
    state: BridgeState,
}

impl MultiPatchModelPart {
    /// # Errors
    /// `InvalidOptions` if `options` fail validation.
    pub fn new(
        multipatch: SharedMultiPatch,
        catalog: EntityCatalog,
        options: BridgeOptions,
    ) -> Result<Self, BridgeError> {
        options.validate()?;
        let node_map = options.node_id_map()?;
        Ok(Self {
            multipatch,
            mesh: Mesh::new(options.model_part_name.clone()),
            catalog,
            options,
            node_map,
            state: BridgeState::Uninitialized,
        })
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Mutable mesh access, e.g. for a solver writing nodal values.
    #[inline]
    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    #[inline]
    pub fn multipatch(&self) -> &SharedMultiPatch {
        &self.multipatch
    }

    #[inline]
    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    #[inline]
    pub fn catalog_mut(&mut self) -> &mut EntityCatalog {
        &mut self.catalog
    }

    #[inline]
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    #[inline]
    pub fn node_id_map(&self) -> &NodeIdMap {
        &self.node_map
    }

    #[inline]
    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// True once the multipatch is enumerated and the mesh is finalized.
    pub fn is_ready(&self) -> bool {
        self.state == BridgeState::Ready && self.multipatch.read().is_enumerated()
    }

    /// Start a regeneration cycle: re-enumerate the multipatch and replace
    /// the mesh with an empty one of the same name.
    pub fn begin_model_part(&mut self) -> Result<(), BridgeError> {
        let start = self.timer();
        self.state = BridgeState::Building;
        let size = self.multipatch.write().enumerate()?;
        self.mesh = Mesh::new(self.options.model_part_name.clone());
        log::info!(
            "Begin model part `{}`: {size} equations",
            self.options.model_part_name
        );
        self.log_elapsed(start, "begin_model_part");
        Ok(())
    }

    /// Create one node per equation id at its control point.
    ///
    /// Returns the number of nodes created.
    pub fn create_nodes(&mut self) -> Result<usize, BridgeError> {
        let start = self.timer();
        let mp = self.multipatch.read();
        let size = mp.equation_system_size();
        for eq in 0..size {
            let (patch_id, local) = mp.equation_id_location(eq)?;
            let point = mp.patch(patch_id)?.control_points().get(local)?;
            self.mesh
                .create_node(self.node_map.node_id(eq), point.coordinates())?;
        }
        drop(mp);
        log::debug!("{size} nodes are created");
        self.log_elapsed(start, "create_nodes");
        Ok(size)
    }

    /// Create one element per cell of patch `patch_id`.
    ///
    /// Returns the new elements; empty (and no mesh change) if the model
    /// part is already ready.
    pub fn add_elements(
        &mut self,
        patch_id: usize,
        type_name: &str,
        starting_id: usize,
        property_id: usize,
    ) -> Result<EntityContainer, BridgeError> {
        if self.is_ready() {
            log::debug!("model part is ready, no elements added for patch {patch_id}");
            return Ok(EntityContainer::new());
        }
        let start = self.timer();
        let properties = self.mesh.get_properties(property_id);
        let mp = self.multipatch.read();
        let patch = mp.patch(patch_id)?;
        let new = self.synthesize(
            patch.fe_space(),
            patch.control_points(),
            Kind::Element,
            type_name,
            starting_id,
            properties,
        )?;
        drop(mp);
        let all = self.mesh.elements_mut();
        all.append(&new);
        all.unique();
        log::info!(
            "{} elements of type {type_name} are generated for patch {patch_id}",
            new.len()
        );
        self.log_elapsed(start, "add_elements");
        Ok(new)
    }

    /// Create one condition per cell of the boundary of patch `patch_id`
    /// on `side`.
    ///
    /// Returns the new conditions; empty (and no mesh change) if the model
    /// part is already ready.
    pub fn add_conditions(
        &mut self,
        patch_id: usize,
        side: BoundarySide,
        type_name: &str,
        starting_id: usize,
        property_id: usize,
    ) -> Result<EntityContainer, BridgeError> {
        if self.is_ready() {
            log::debug!("model part is ready, no conditions added for patch {patch_id}");
            return Ok(EntityContainer::new());
        }
        let start = self.timer();
        let properties = self.mesh.get_properties(property_id);
        let boundary = self
            .multipatch
            .read()
            .patch(patch_id)?
            .construct_boundary_patch(side)?;
        let new = self.synthesize(
            boundary.fe_space(),
            boundary.control_points(),
            Kind::Condition,
            type_name,
            starting_id,
            properties,
        )?;
        let all = self.mesh.conditions_mut();
        all.append(&new);
        all.unique();
        log::info!(
            "{} conditions of type {type_name} are generated for side {side} of patch {patch_id}",
            new.len()
        );
        self.log_elapsed(start, "add_conditions");
        Ok(new)
    }

    /// Finalize the mesh. No-op if already ready.
    pub fn end_model_part(&mut self) {
        if self.state == BridgeState::Ready {
            return;
        }
        self.state = BridgeState::Ready;
        log::info!("End model part `{}`: {}", self.options.model_part_name, self.mesh);
    }

    /// Copy `variable` from every patch's field grid to the mesh nodes.
    ///
    /// Skipped while the model part is not ready.
    pub fn synchronize_forward(&mut self, variable: &Variable) -> Result<(), BridgeError> {
        if !self.is_ready() {
            log::debug!("model part is not ready, forward synchronization of {variable} skipped");
            return Ok(());
        }
        let start = self.timer();
        let mp = self.multipatch.read();
        for eq in 0..mp.equation_system_size() {
            let (patch_id, local) = mp.equation_id_location(eq)?;
            let value = mp.patch(patch_id)?.field(variable)?.get(local)?;
            self.mesh
                .set_solution_step_value(variable, self.node_map.node_id(eq), value)?;
        }
        drop(mp);
        self.log_elapsed(start, "synchronize_forward");
        Ok(())
    }

    /// Copy `variable` from the mesh nodes back into every patch, creating
    /// missing field grids.
    ///
    /// Skipped while the model part is not ready.
    pub fn synchronize_backward(&mut self, variable: &Variable) -> Result<(), BridgeError> {
        if !self.is_ready() {
            log::debug!("model part is not ready, backward synchronization of {variable} skipped");
            return Ok(());
        }
        let start = self.timer();
        let mut mp = self.multipatch.write();
        for patch in mp.iter_mut() {
            let ids = patch.fe_space().function_indices().to_vec();
            let grid = patch.create_field(variable);
            for (local, eq) in ids.into_iter().enumerate() {
                let value = self
                    .mesh
                    .solution_step_value(variable, self.node_map.node_id(eq))?;
                grid.set(local, value)?;
            }
        }
        drop(mp);
        self.log_elapsed(start, "synchronize_backward");
        Ok(())
    }

    fn synthesize(
        &self,
        space: &BSplineFESpace,
        control_points: &ControlGrid<ControlPoint>,
        kind: Kind,
        type_name: &str,
        starting_id: usize,
        properties: Arc<Properties>,
    ) -> Result<EntityContainer, BridgeError> {
        let registry: &EntityRegistry = match kind {
            Kind::Element => &self.catalog.elements,
            Kind::Condition => &self.catalog.conditions,
        };
        let request = EntityRequest {
            type_name,
            starting_id,
            properties,
            default_integration_method: self.options.default_integration_method,
        };
        create_entities_from_fe_space(
            space,
            control_points,
            &self.mesh,
            registry,
            &self.node_map,
            &request,
        )
    }

    fn timer(&self) -> Option<Instant> {
        self.options.profile.then(Instant::now)
    }

    fn log_elapsed(&self, start: Option<Instant>, what: &str) {
        if let Some(t) = start {
            log::debug!("{what} completed in {:.6} s", t.elapsed().as_secs_f64());
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum Kind {
    Element,
    Condition,
}

impl fmt::Display for MultiPatchModelPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiPatchModelPart `{}` ({}): {} nodes, {} elements, {} conditions, {} patches",
            self.options.model_part_name,
            self.state,
            self.mesh.number_of_nodes(),
            self.mesh.number_of_elements(),
            self.mesh.number_of_conditions(),
            self.multipatch.read().len()
        )
    }
}
