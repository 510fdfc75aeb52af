//! BridgeError: Unified error type for multipatch-bridge public APIs
//!
//! Every fallible operation of the crate reports through this enum. Errors are
//! fatal at the point of detection: an operation either fully succeeds or
//! returns one of these variants. The readiness-gated bridge operations are
//! not errors at all; they return early and leave state untouched.

use thiserror::Error;

use crate::topology::point::NodeId;

/// Coarse classification of [`BridgeError`] variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied an argument the operation cannot accept.
    InvalidArgument,
    /// An index fell outside of a container's bounds.
    OutOfRange,
    /// A structural precondition was violated.
    Logic,
    /// A referenced node, patch, field, variable or record does not exist.
    Lookup,
}

/// Unified error type for multipatch-bridge operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BridgeError {
    /// Attempted to construct a NodeId with a zero value (invalid).
    #[error("NodeId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidNodeId,
    /// The entity type name is not registered in the catalog.
    #[error("Entity ({kind}) `{name}` is not registered")]
    UnknownEntityType { kind: &'static str, name: String },
    /// Bridge options failed validation.
    #[error("Invalid bridge options: {0}")]
    InvalidOptions(String),
    /// Knot values do not form a valid open knot vector.
    #[error("Invalid knot vector: {0}")]
    InvalidKnotVector(String),
    /// Knot access past the end of the array.
    #[error("Knot index {index} out of range (size {len})")]
    KnotIndexOutOfRange { index: usize, len: usize },
    /// Requested span does not exist.
    #[error("The span index {span} exceeds the number of spans ({nspans}) of the knot vector")]
    SpanIndexOutOfRange { span: usize, nspans: usize },
    /// Two knot arrays have different sizes.
    #[error("Knot vectors differ in size: {left} != {right}")]
    KnotCountMismatch { left: usize, right: usize },
    /// Two knot arrays differ at a given location.
    #[error("The knot vector is different at loc {index}: {left} != {right}")]
    KnotMismatch { index: usize, left: f64, right: f64 },
    /// Control or field grid access past the end.
    #[error("Grid index {index} out of range (size {len})")]
    GridIndexOutOfRange { index: usize, len: usize },
    /// A grid, weight list or value slice has the wrong length.
    #[error("Size mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: usize, found: usize },
    /// Equation id beyond the equation system size.
    #[error("Equation id {id} out of range (system size {size})")]
    EquationIdOutOfRange { id: usize, size: usize },
    /// The multipatch has not been enumerated since its last modification.
    #[error("Multipatch is not enumerated")]
    NotEnumerated,
    /// No patch with this id.
    #[error("Patch {0} not found")]
    MissingPatch(usize),
    /// A patch with this id already exists.
    #[error("Patch {0} already exists")]
    DuplicatePatch(usize),
    /// Boundary side is not defined for the patch dimension.
    #[error("Boundary side {side} is not valid for a {dimension}-dimensional patch")]
    InvalidBoundarySide { side: String, dimension: usize },
    /// Two glued boundaries are not conforming.
    #[error("Interface mismatch: {0}")]
    InterfaceMismatch(String),
    /// The patch has no field grid for the variable.
    #[error("Patch {patch} has no grid function for `{field}`")]
    MissingField { patch: usize, field: String },
    /// Node lookup failed.
    #[error("Node {0} not found")]
    MissingNode(NodeId),
    /// A node with this id was already created.
    #[error("Node {0} already exists")]
    DuplicateNode(NodeId),
    /// Nodal values requested for a variable never registered on the mesh.
    #[error("Nodal variable `{0}` is not registered")]
    MissingVariable(String),
    /// Point is already registered in an atlas.
    #[error("Duplicate point {0} in atlas")]
    DuplicatePoint(NodeId),
    /// Point is not registered in an atlas.
    #[error("Point {0} not found in atlas")]
    MissingAtlasPoint(NodeId),
    /// Atlas slices must be non-empty.
    #[error("Atlas slice length must be non-zero")]
    ZeroLengthSlice,
    /// Slice length differs from the atlas entry.
    #[error("Slice length mismatch at point {point}: expected {expected}, found {found}")]
    SliceLengthMismatch {
        point: NodeId,
        expected: usize,
        found: usize,
    },
    /// Geometry data inconsistent with the node list.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Nodal variable with no components.
    #[error("Invalid variable `{0}`: at least one component is required")]
    InvalidVariable(String),
    /// Matrix storage whose dimensions and buffers disagree.
    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),
}

impl BridgeError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        use BridgeError::*;
        match self {
            InvalidNodeId
            | UnknownEntityType { .. }
            | InvalidOptions(_)
            | InvalidKnotVector(_)
            | InvalidBoundarySide { .. }
            | InterfaceMismatch(_)
            | DuplicatePatch(_)
            | DuplicateNode(_)
            | DuplicatePoint(_)
            | ZeroLengthSlice
            | InvalidGeometry(_)
            | InvalidVariable(_)
            | InvalidMatrix(_) => ErrorKind::InvalidArgument,
            KnotIndexOutOfRange { .. }
            | GridIndexOutOfRange { .. }
            | EquationIdOutOfRange { .. } => ErrorKind::OutOfRange,
            SpanIndexOutOfRange { .. }
            | KnotCountMismatch { .. }
            | KnotMismatch { .. }
            | SizeMismatch { .. }
            | SliceLengthMismatch { .. }
            | NotEnumerated => ErrorKind::Logic,
            MissingPatch(_)
            | MissingField { .. }
            | MissingNode(_)
            | MissingVariable(_)
            | MissingAtlasPoint(_) => ErrorKind::Lookup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let e = BridgeError::UnknownEntityType {
            kind: "Element",
            name: "Foo".into(),
        };
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            BridgeError::KnotIndexOutOfRange { index: 3, len: 3 }.kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(
            BridgeError::SpanIndexOutOfRange { span: 4, nspans: 3 }.kind(),
            ErrorKind::Logic
        );
        assert_eq!(BridgeError::MissingPatch(2).kind(), ErrorKind::Lookup);
    }

    #[test]
    fn messages_name_the_offender() {
        let e = BridgeError::UnknownEntityType {
            kind: "Condition",
            name: "FaceLoad".into(),
        };
        assert_eq!(
            e.to_string(),
            "Entity (Condition) `FaceLoad` is not registered"
        );
    }
}
