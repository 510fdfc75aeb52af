//! A single parametric patch: FE space, control points and fields.

use std::collections::BTreeMap;
use std::fmt;

use crate::bridge_error::BridgeError;
use crate::patch::boundary::BoundarySide;
use crate::patch::control_grid::{ControlGrid, ControlPoint, FieldGrid, Variable};
use crate::patch::fe_space::{BSplineFESpace, FESpace};

/// One smooth parametric piece of a multipatch model.
#[derive(Clone, Debug)]
pub struct Patch {
    id: usize,
    space: BSplineFESpace,
    control_points: ControlGrid<ControlPoint>,
    fields: BTreeMap<String, FieldGrid>,
}

impl Patch {
    /// # Errors
    /// `SizeMismatch` if the control grid does not hold one point per
    /// basis function.
    pub fn new(
        id: usize,
        space: BSplineFESpace,
        control_points: ControlGrid<ControlPoint>,
    ) -> Result<Self, BridgeError> {
        if control_points.len() != space.total_number() {
            return Err(BridgeError::SizeMismatch {
                expected: space.total_number(),
                found: control_points.len(),
            });
        }
        Ok(Self {
            id,
            space,
            control_points,
            fields: BTreeMap::new(),
        })
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.space.dimension()
    }

    #[inline]
    pub fn fe_space(&self) -> &BSplineFESpace {
        &self.space
    }

    #[inline]
    pub(crate) fn fe_space_mut(&mut self) -> &mut BSplineFESpace {
        &mut self.space
    }

    /// Number of control points (= basis functions).
    #[inline]
    pub fn total_number(&self) -> usize {
        self.space.total_number()
    }

    #[inline]
    pub fn control_points(&self) -> &ControlGrid<ControlPoint> {
        &self.control_points
    }

    #[inline]
    pub fn control_points_mut(&mut self) -> &mut ControlGrid<ControlPoint> {
        &mut self.control_points
    }

    /// Grid of `variable`, creating a zero grid if the patch has none yet.
    pub fn create_field(&mut self, variable: &Variable) -> &mut FieldGrid {
        let n = self.total_number();
        self.fields
            .entry(variable.name().to_owned())
            .or_insert_with(|| FieldGrid::zeros(variable.clone(), n))
    }

    /// Install a field grid, replacing any grid of the same variable.
    pub fn set_field(&mut self, grid: FieldGrid) -> Result<(), BridgeError> {
        if grid.len() != self.total_number() {
            return Err(BridgeError::SizeMismatch {
                expected: self.total_number(),
                found: grid.len(),
            });
        }
        self.fields
            .insert(grid.variable().name().to_owned(), grid);
        Ok(())
    }

    pub fn has_field(&self, variable: &Variable) -> bool {
        self.fields.contains_key(variable.name())
    }

    pub fn field(&self, variable: &Variable) -> Result<&FieldGrid, BridgeError> {
        self.fields
            .get(variable.name())
            .ok_or_else(|| self.missing_field(variable))
    }

    pub fn field_mut(&mut self, variable: &Variable) -> Result<&mut FieldGrid, BridgeError> {
        let missing = self.missing_field(variable);
        self.fields.get_mut(variable.name()).ok_or(missing)
    }

    /// Names of the fields carried by this patch, sorted.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Patch of one dimension lower on `side`.
    ///
    /// The boundary patch keeps the parent's id and global function ids, and
    /// carries the control points and fields restricted to the side.
    pub fn construct_boundary_patch(&self, side: BoundarySide) -> Result<Patch, BridgeError> {
        let (space, locals) = self.space.boundary_space(side)?;
        let control_points = self.control_points.select(&locals)?;
        let fields = self
            .fields
            .iter()
            .map(|(name, grid)| Ok((name.clone(), grid.select(&locals)?)))
            .collect::<Result<BTreeMap<_, _>, BridgeError>>()?;
        Ok(Patch {
            id: self.id,
            space,
            control_points,
            fields,
        })
    }

    fn missing_field(&self, variable: &Variable) -> BridgeError {
        BridgeError::MissingField {
            patch: self.id,
            field: variable.name().to_owned(),
        }
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Patch {} ({}D, {} control points",
            self.id,
            self.dimension(),
            self.total_number()
        )?;
        for d in 0..self.dimension() {
            write!(f, ", p{d}={}", self.space.order(d))?;
        }
        f.write_str(")")
    }
}
