//! Finite-element spaces over patches and the parametric cells they expose.
//!
//! A space numbers its basis functions locally (`0..total_number`, first
//! direction fastest) and carries a local → global table that the multipatch
//! enumeration rewrites. Cells report their supported functions ("anchors")
//! as global ids, row-aligned with the cell's extraction operator.

use hashbrown::HashMap;
use itertools::Itertools;

use crate::bridge_error::BridgeError;
use crate::nurbs::extraction::{
    CompressedMatrix, ExtractionOperator, bezier_extraction_1d, span_starts,
    validate_open_knot_vector,
};
use crate::nurbs::knot_array::KnotArray1D;
use crate::patch::boundary::BoundarySide;

/// Highest parametric dimension a space may have.
pub const MAX_DIMENSION: usize = 3;

/// One parametric cell of a finite-element space.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    id: usize,
    anchors: Vec<usize>,
    extraction: ExtractionOperator,
}

impl Cell {
    pub fn new(id: usize, anchors: Vec<usize>, extraction: ExtractionOperator) -> Self {
        Self {
            id,
            anchors,
            extraction,
        }
    }

    /// Position of the cell within its space (u fastest).
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Global ids of the supported functions, in extraction-operator row order.
    #[inline]
    pub fn supported_anchors(&self) -> &[usize] {
        &self.anchors
    }

    #[inline]
    pub fn extraction_operator(&self) -> &ExtractionOperator {
        &self.extraction
    }

    pub fn compressed_extraction_operator(&self) -> CompressedMatrix {
        self.extraction.compress()
    }
}

/// Cell provider consumed by the entity factory.
pub trait FESpace {
    /// Parametric dimension.
    fn dimension(&self) -> usize;

    /// Polynomial order in `dir`; 0 beyond the dimension.
    fn order(&self, dir: usize) -> usize;

    /// Number of functions in `dir`; 0 beyond the dimension.
    fn number(&self, dir: usize) -> usize;

    /// Total number of basis functions.
    fn total_number(&self) -> usize;

    /// Global id of every local function.
    fn function_indices(&self) -> &[usize];

    /// Local index of a global function id, if this space carries it.
    fn local_id(&self, global: usize) -> Option<usize>;

    /// All parametric cells, u fastest.
    fn construct_cells(&self) -> Result<Vec<Cell>, BridgeError>;
}

/// Tensor-product B-spline space over open knot vectors.
#[derive(Clone, Debug)]
pub struct BSplineFESpace {
    knots: Vec<KnotArray1D<f64>>,
    orders: Vec<usize>,
    numbers: Vec<usize>,
    function_ids: Vec<usize>,
    local_ids: HashMap<usize, usize>,
}

impl BSplineFESpace {
    /// Build a space from one knot vector and order per direction.
    ///
    /// Function ids start out as the identity numbering.
    pub fn new(knots: Vec<KnotArray1D<f64>>, orders: Vec<usize>) -> Result<Self, BridgeError> {
        if knots.len() != orders.len() {
            return Err(BridgeError::SizeMismatch {
                expected: knots.len(),
                found: orders.len(),
            });
        }
        if knots.len() > MAX_DIMENSION {
            return Err(BridgeError::InvalidKnotVector(format!(
                "{} parametric directions exceed the maximum of {MAX_DIMENSION}",
                knots.len()
            )));
        }
        let mut numbers = Vec::with_capacity(knots.len());
        for (k, &p) in knots.iter().zip(&orders) {
            let n = k.size().saturating_sub(p + 1);
            validate_open_knot_vector(k, p, n)?;
            numbers.push(n);
        }
        let total: usize = numbers.iter().product();
        let mut space = Self {
            knots,
            orders,
            numbers,
            function_ids: Vec::new(),
            local_ids: HashMap::new(),
        };
        space.reset_function_indices((0..total).collect())?;
        Ok(space)
    }

    /// Zero-dimensional space: a single function with global id `global`.
    pub fn point(global: usize) -> Self {
        let mut local_ids = HashMap::new();
        local_ids.insert(global, 0);
        Self {
            knots: Vec::new(),
            orders: Vec::new(),
            numbers: Vec::new(),
            function_ids: vec![global],
            local_ids,
        }
    }

    /// Knot vector of `dir`.
    pub fn knot_vector(&self, dir: usize) -> Option<&KnotArray1D<f64>> {
        self.knots.get(dir)
    }

    /// Replace the local → global table.
    pub fn reset_function_indices(&mut self, ids: Vec<usize>) -> Result<(), BridgeError> {
        let expected = self.total_number();
        if ids.len() != expected {
            return Err(BridgeError::SizeMismatch {
                expected,
                found: ids.len(),
            });
        }
        self.local_ids = ids.iter().enumerate().map(|(l, &g)| (g, l)).collect();
        self.function_ids = ids;
        Ok(())
    }

    /// Flat local index of a tensor index (first direction fastest).
    pub fn flat_index(&self, tensor: &[usize]) -> usize {
        tensor
            .iter()
            .zip(&self.numbers)
            .rev()
            .fold(0, |acc, (&i, &n)| acc * n + i)
    }

    /// Local indices of the functions sitting on `side`, ordered with the
    /// remaining directions first-fastest.
    pub fn boundary_local_indices(&self, side: BoundarySide) -> Result<Vec<usize>, BridgeError> {
        let dir = self.side_direction(side)?;
        let fixed = if side.is_max() { self.numbers[dir] - 1 } else { 0 };
        let ranges = self
            .numbers
            .iter()
            .enumerate()
            .map(|(d, &n)| if d == dir { fixed..fixed + 1 } else { 0..n })
            .rev();
        // multi_cartesian_product varies the last iterator fastest
        Ok(ranges
            .multi_cartesian_product()
            .map(|mut rev_tensor| {
                rev_tensor.reverse();
                self.flat_index(&rev_tensor)
            })
            .collect())
    }

    /// Space of one dimension lower living on `side`, keeping the global ids
    /// of the parent. Also returns the parent-local indices it was built from.
    pub fn boundary_space(&self, side: BoundarySide) -> Result<(Self, Vec<usize>), BridgeError> {
        let dir = self.side_direction(side)?;
        let locals = self.boundary_local_indices(side)?;
        let ids: Vec<usize> = locals.iter().map(|&l| self.function_ids[l]).collect();
        if self.dimension() == 1 {
            return Ok((Self::point(ids[0]), locals));
        }
        let keep = |d: &usize| *d != dir;
        let knots = (0..self.dimension())
            .filter(keep)
            .map(|d| self.knots[d].clone())
            .collect();
        let orders = (0..self.dimension())
            .filter(keep)
            .map(|d| self.orders[d])
            .collect();
        let mut space = Self::new(knots, orders)?;
        space.reset_function_indices(ids)?;
        Ok((space, locals))
    }

    fn side_direction(&self, side: BoundarySide) -> Result<usize, BridgeError> {
        let dir = side.direction();
        if dir >= self.dimension() {
            return Err(BridgeError::InvalidBoundarySide {
                side: side.to_string(),
                dimension: self.dimension(),
            });
        }
        Ok(dir)
    }
}

impl FESpace for BSplineFESpace {
    fn dimension(&self) -> usize {
        self.knots.len()
    }

    fn order(&self, dir: usize) -> usize {
        self.orders.get(dir).copied().unwrap_or(0)
    }

    fn number(&self, dir: usize) -> usize {
        self.numbers.get(dir).copied().unwrap_or(0)
    }

    fn total_number(&self) -> usize {
        self.numbers.iter().product()
    }

    fn function_indices(&self) -> &[usize] {
        &self.function_ids
    }

    fn local_id(&self, global: usize) -> Option<usize> {
        self.local_ids.get(&global).copied()
    }

    fn construct_cells(&self) -> Result<Vec<Cell>, BridgeError> {
        if self.dimension() == 0 {
            return Ok(vec![Cell::new(
                0,
                self.function_ids.clone(),
                ExtractionOperator::identity(1),
            )]);
        }

        // (span start, operator) pairs per direction
        let mut per_dir = Vec::with_capacity(self.dimension());
        for (k, &p) in self.knots.iter().zip(&self.orders) {
            let ops = bezier_extraction_1d(k, p)?;
            let starts = span_starts(k, p);
            if ops.len() != starts.len() {
                return Err(BridgeError::InvalidKnotVector(format!(
                    "{} extraction operators for {} spans",
                    ops.len(),
                    starts.len()
                )));
            }
            per_dir.push(starts.into_iter().zip(ops).collect::<Vec<_>>());
        }

        let cells = per_dir
            .iter()
            .rev()
            .map(|spans| spans.iter())
            .multi_cartesian_product()
            .enumerate()
            .map(|(id, rev_spans)| {
                // rev_spans runs from the slowest direction to u
                let extraction = rev_spans
                    .iter()
                    .map(|(_, op)| op.clone())
                    .reduce(|acc, op| acc.kron(&op))
                    .unwrap_or_else(|| ExtractionOperator::identity(1));
                let ranges = rev_spans
                    .iter()
                    .zip(self.orders.iter().rev())
                    .map(|((start, _), &p)| start - p..=*start);
                let anchors = ranges
                    .multi_cartesian_product()
                    .map(|mut tensor| {
                        tensor.reverse();
                        self.function_ids[self.flat_index(&tensor)]
                    })
                    .collect();
                Cell::new(id, anchors, extraction)
            })
            .collect();
        Ok(cells)
    }
}
