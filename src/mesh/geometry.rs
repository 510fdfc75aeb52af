//! Isogeometric geometry carried by each mesh entity.
//!
//! The geometry stores what a shape-function evaluator needs: the entity's
//! nodes, their weights, the cell's compressed extraction operator and the
//! polynomial orders. Row `i` of the extraction operator, weight `i` and node
//! `i` all refer to the same anchor.

use crate::bridge_error::BridgeError;
use crate::nurbs::extraction::CompressedMatrix;
use crate::topology::point::NodeId;

/// Node list plus Bézier extraction data of one cell.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IsogeometricGeometry {
    nodes: Vec<NodeId>,
    weights: Vec<f64>,
    extraction: CompressedMatrix,
    orders: [usize; 3],
    max_integration_method: i32,
}

impl IsogeometricGeometry {
    /// Geometry over `nodes` with no extraction data yet.
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    /// Attach weights, extraction operator, orders and integration setting.
    ///
    /// # Errors
    /// `SizeMismatch` if the weight count differs from the node count,
    /// `InvalidGeometry` if the operator rows do not match the nodes.
    pub fn assign_geometry_data(
        &mut self,
        weights: Vec<f64>,
        extraction: CompressedMatrix,
        orders: [usize; 3],
        max_integration_method: i32,
    ) -> Result<(), BridgeError> {
        if weights.len() != self.nodes.len() {
            return Err(BridgeError::SizeMismatch {
                expected: self.nodes.len(),
                found: weights.len(),
            });
        }
        if extraction.rows() != self.nodes.len() {
            return Err(BridgeError::InvalidGeometry(format!(
                "extraction operator has {} rows for {} nodes",
                extraction.rows(),
                self.nodes.len()
            )));
        }
        self.weights = weights;
        self.extraction = extraction;
        self.orders = orders;
        self.max_integration_method = max_integration_method;
        Ok(())
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn extraction_operator(&self) -> &CompressedMatrix {
        &self.extraction
    }

    /// Polynomial order per direction, 0 for absent directions.
    #[inline]
    pub fn orders(&self) -> [usize; 3] {
        self.orders
    }

    #[inline]
    pub fn max_integration_method(&self) -> i32 {
        self.max_integration_method
    }

    /// Number of parametric directions with a non-zero order.
    pub fn local_dimension(&self) -> usize {
        self.orders.iter().filter(|&&p| p > 0).count()
    }
}
