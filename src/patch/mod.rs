//! Parametric side of the bridge: patches, their FE spaces and the
//! multipatch numbering.

pub mod boundary;
pub mod control_grid;
pub mod fe_space;
pub mod multipatch;
pub mod patch;

pub use boundary::BoundarySide;
pub use control_grid::{ControlGrid, ControlPoint, FieldGrid, Variable};
pub use fe_space::{BSplineFESpace, Cell, FESpace};
pub use multipatch::{Interface, MultiPatch, SharedMultiPatch};
pub use patch::Patch;
