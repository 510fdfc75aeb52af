//! In-memory host mesh: nodes, nodal values, entities and property records.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::bridge_error::BridgeError;
use crate::data::atlas::Atlas;
use crate::data::coordinates::Coordinates;
use crate::data::section::Section;
use crate::mesh::entity::EntityContainer;
use crate::mesh::properties::Properties;
use crate::patch::control_grid::Variable;
use crate::topology::point::NodeId;

/// Nodal values of one variable.
#[derive(Clone, Debug)]
struct NodalVariable {
    variable: Variable,
    values: Section<f64>,
}

/// Discrete mesh consumed by the solver.
#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    coordinates: Coordinates,
    nodal: BTreeMap<String, NodalVariable>,
    elements: EntityContainer,
    conditions: EntityContainer,
    properties: BTreeMap<usize, Arc<Properties>>,
}

impl Mesh {
    /// Empty mesh.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::spatial(),
            nodal: BTreeMap::new(),
            elements: EntityContainer::new(),
            conditions: EntityContainer::new(),
            properties: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a node. Every registered nodal variable gets a zero value for it.
    pub fn create_node(&mut self, id: NodeId, xyz: [f64; 3]) -> Result<NodeId, BridgeError> {
        if self.has_node(id) {
            return Err(BridgeError::DuplicateNode(id));
        }
        self.coordinates.try_add_point(id, &xyz)?;
        for nv in self.nodal.values_mut() {
            nv.values.try_add_point(id, nv.variable.components())?;
        }
        Ok(id)
    }

    #[inline]
    pub fn has_node(&self, id: NodeId) -> bool {
        self.coordinates.section().atlas().contains(id)
    }

    pub fn node_coordinates(&self, id: NodeId) -> Result<&[f64], BridgeError> {
        self.coordinates
            .try_restrict(id)
            .map_err(|_| BridgeError::MissingNode(id))
    }

    #[inline]
    pub fn number_of_nodes(&self) -> usize {
        self.coordinates.len()
    }

    /// Node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.coordinates.section().atlas().points()
    }

    /// Register a nodal variable, zero at every existing node. No-op if the
    /// variable is already registered.
    pub fn add_nodal_variable(&mut self, variable: &Variable) -> Result<(), BridgeError> {
        if self.nodal.contains_key(variable.name()) {
            return Ok(());
        }
        let mut atlas = Atlas::default();
        for id in self.node_ids() {
            atlas.try_insert(id, variable.components())?;
        }
        self.nodal.insert(
            variable.name().to_owned(),
            NodalVariable {
                variable: variable.clone(),
                values: Section::new(atlas),
            },
        );
        Ok(())
    }

    pub fn has_nodal_variable(&self, variable: &Variable) -> bool {
        self.nodal.contains_key(variable.name())
    }

    /// Current value of `variable` at node `id`.
    pub fn solution_step_value(
        &self,
        variable: &Variable,
        id: NodeId,
    ) -> Result<&[f64], BridgeError> {
        let nv = self
            .nodal
            .get(variable.name())
            .ok_or_else(|| BridgeError::MissingVariable(variable.name().to_owned()))?;
        nv.values
            .try_restrict(id)
            .map_err(|_| BridgeError::MissingNode(id))
    }

    /// Overwrite the value of `variable` at node `id`, registering the
    /// variable on first use.
    pub fn set_solution_step_value(
        &mut self,
        variable: &Variable,
        id: NodeId,
        value: &[f64],
    ) -> Result<(), BridgeError> {
        if !self.has_node(id) {
            return Err(BridgeError::MissingNode(id));
        }
        self.add_nodal_variable(variable)?;
        match self.nodal.get_mut(variable.name()) {
            Some(nv) => nv.values.try_set(id, value),
            None => Err(BridgeError::MissingVariable(variable.name().to_owned())),
        }
    }

    #[inline]
    pub fn elements(&self) -> &EntityContainer {
        &self.elements
    }

    #[inline]
    pub fn elements_mut(&mut self) -> &mut EntityContainer {
        &mut self.elements
    }

    #[inline]
    pub fn conditions(&self) -> &EntityContainer {
        &self.conditions
    }

    #[inline]
    pub fn conditions_mut(&mut self) -> &mut EntityContainer {
        &mut self.conditions
    }

    #[inline]
    pub fn number_of_elements(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn number_of_conditions(&self) -> usize {
        self.conditions.len()
    }

    /// Property record `id`, created empty if it does not exist yet.
    pub fn get_properties(&mut self, id: usize) -> Arc<Properties> {
        self.properties
            .entry(id)
            .or_insert_with(|| Arc::new(Properties::new(id)))
            .clone()
    }

    /// Install a property record, replacing any record with the same id.
    /// Entities created earlier keep the record they were built with.
    pub fn set_properties(&mut self, properties: Properties) {
        self.properties
            .insert(properties.id(), Arc::new(properties));
    }

    pub fn has_properties(&self, id: usize) -> bool {
        self.properties.contains_key(&id)
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mesh `{}`: {} nodes, {} elements, {} conditions",
            self.name,
            self.number_of_nodes(),
            self.number_of_elements(),
            self.number_of_conditions()
        )
    }
}
