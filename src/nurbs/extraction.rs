//! Bézier extraction operators.
//!
//! An extraction operator maps the B-spline functions supported on one cell
//! (rows, in anchor order) to the cell's local Bernstein basis (columns).
//! [`bezier_extraction_1d`] computes the per-span operators of an open knot
//! vector; tensor-product cells combine them with [`ExtractionOperator::kron`].

use itertools::Itertools;

use crate::bridge_error::BridgeError;
use crate::nurbs::knot_array::KnotArray1D;

/// Dense row-major extraction operator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "DenseRepr")]
pub struct ExtractionOperator {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[derive(serde::Deserialize)]
struct DenseRepr {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<DenseRepr> for ExtractionOperator {
    type Error = BridgeError;

    fn try_from(raw: DenseRepr) -> Result<Self, Self::Error> {
        Self::from_row_major(raw.rows, raw.cols, raw.data)
    }
}

impl ExtractionOperator {
    /// `n × n` identity.
    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self {
            rows: n,
            cols: n,
            data,
        }
    }

    /// Build from row-major values.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, BridgeError> {
        if data.len() != rows * cols {
            return Err(BridgeError::SizeMismatch {
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry `(row, col)`, `None` outside the matrix.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    // callers stay inside rows × cols
    #[inline]
    fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Row-major values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Kronecker product `self ⊗ rhs`.
    ///
    /// With `self` the operator of a slower-varying direction and `rhs` the
    /// faster one, row `i * rhs.rows + j` pairs row `i` of `self` with row `j`
    /// of `rhs`.
    pub fn kron(&self, rhs: &Self) -> Self {
        let rows = self.rows * rhs.rows;
        let cols = self.cols * rhs.cols;
        let mut out = Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        };
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.at(i, k);
                if a == 0.0 {
                    continue;
                }
                for j in 0..rhs.rows {
                    for l in 0..rhs.cols {
                        out.set(i * rhs.rows + j, k * rhs.cols + l, a * rhs.at(j, l));
                    }
                }
            }
        }
        out
    }

    /// Compressed sparse row form, exact zeros dropped.
    pub fn compress(&self) -> CompressedMatrix {
        let mut row_ptr = Vec::with_capacity(self.rows + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);
        for r in 0..self.rows {
            for c in 0..self.cols {
                let v = self.at(r, c);
                if v != 0.0 {
                    col_idx.push(c);
                    values.push(v);
                }
            }
            row_ptr.push(values.len());
        }
        CompressedMatrix {
            rows: self.rows,
            cols: self.cols,
            row_ptr,
            col_idx,
            values,
        }
    }
}

/// Compressed sparse row matrix.
///
/// `row_ptr` has `rows + 1` non-decreasing entries starting at 0 and ending at
/// the number of stored values; every column index is below `cols`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "CsrRepr")]
pub struct CompressedMatrix {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl Default for CompressedMatrix {
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            row_ptr: vec![0],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }
}

#[derive(serde::Deserialize)]
struct CsrRepr {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl TryFrom<CsrRepr> for CompressedMatrix {
    type Error = BridgeError;

    fn try_from(raw: CsrRepr) -> Result<Self, Self::Error> {
        let invalid = |msg: String| Err(BridgeError::InvalidMatrix(msg));
        if raw.row_ptr.len() != raw.rows + 1 {
            return invalid(format!(
                "{} row pointers for {} rows",
                raw.row_ptr.len(),
                raw.rows
            ));
        }
        if raw.col_idx.len() != raw.values.len() {
            return invalid(format!(
                "{} column indices for {} values",
                raw.col_idx.len(),
                raw.values.len()
            ));
        }
        if raw.row_ptr.first() != Some(&0) || raw.row_ptr.last() != Some(&raw.values.len()) {
            return invalid("row pointers must run from 0 to the value count".into());
        }
        if raw.row_ptr.iter().tuple_windows().any(|(a, b)| a > b) {
            return invalid("row pointers must be non-decreasing".into());
        }
        if let Some(&c) = raw.col_idx.iter().find(|&&c| c >= raw.cols) {
            return invalid(format!("column {c} outside {} columns", raw.cols));
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            row_ptr: raw.row_ptr,
            col_idx: raw.col_idx,
            values: raw.values,
        })
    }
}

impl CompressedMatrix {
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Entry `(row, col)`, zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.rows {
            return 0.0;
        }
        let (start, end) = (self.row_ptr[row], self.row_ptr[row + 1]);
        self.col_idx[start..end]
            .iter()
            .position(|&c| c == col)
            .map_or(0.0, |k| self.values[start + k])
    }

    /// Stored `(col, value)` pairs of one row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = if row < self.rows {
            (self.row_ptr[row], self.row_ptr[row + 1])
        } else {
            (0, 0)
        };
        self.col_idx[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }

    /// Expand back to a dense operator.
    pub fn to_dense(&self) -> ExtractionOperator {
        let mut out = ExtractionOperator {
            rows: self.rows,
            cols: self.cols,
            data: vec![0.0; self.rows * self.cols],
        };
        for r in 0..self.rows {
            for (c, v) in self.row(r) {
                out.set(r, c, v);
            }
        }
        out
    }
}

/// Check that `knots` is an open knot vector of degree `order` for `n`
/// functions: `n + order + 1` knots, end knots repeated exactly `order + 1`
/// times, interior multiplicity at most `order`.
pub fn validate_open_knot_vector(
    knots: &KnotArray1D<f64>,
    order: usize,
    n: usize,
) -> Result<(), BridgeError> {
    let invalid = |msg: String| Err(BridgeError::InvalidKnotVector(msg));
    if order == 0 {
        return invalid("order must be at least 1".into());
    }
    let u = knots.values();
    if u.len() != n + order + 1 {
        return invalid(format!(
            "expected {} knots for {n} functions of order {order}, found {}",
            n + order + 1,
            u.len()
        ));
    }
    if n <= order {
        return invalid(format!("{n} functions cannot carry order {order}"));
    }
    let (first, last) = (u[0], u[u.len() - 1]);
    if first >= last {
        return invalid("knot vector has no non-empty span".into());
    }
    let open_start = u[..=order].iter().all(|&k| k == first) && u[order + 1] != first;
    let open_end = u[n..].iter().all(|&k| k == last) && u[n - 1] != last;
    if !open_start || !open_end {
        return invalid(format!("end knots must be repeated exactly {} times", order + 1));
    }
    let interior = &u[order + 1..n];
    for (value, run) in interior.iter().dedup_with_count().map(|(c, v)| (v, c)) {
        if run > order {
            return invalid(format!(
                "interior knot {value} has multiplicity {run} > {order}"
            ));
        }
    }
    Ok(())
}

/// Per-span Bézier extraction operators of an open knot vector.
///
/// Returns one `(order+1) × (order+1)` operator per distinct span, in
/// ascending parametric order. Rows follow the supported functions
/// `k-order ..= k` of the span starting at knot `k`.
pub fn bezier_extraction_1d(
    knots: &KnotArray1D<f64>,
    order: usize,
) -> Result<Vec<ExtractionOperator>, BridgeError> {
    let p = order;
    let n = knots.size().saturating_sub(p + 1);
    validate_open_knot_vector(knots, p, n)?;
    // 1-based knot access keeps the recurrence readable
    let kn = |i: usize| knots[i - 1];

    let mut ops = vec![ExtractionOperator::identity(p + 1)];
    let mut alphas = vec![0.0; p];
    let mut a = p + 1;
    let mut b = a + 1;
    let mut nb = 0usize;
    while b <= n {
        ops.push(ExtractionOperator::identity(p + 1));
        let i = b;
        while b <= n && kn(b + 1) == kn(b) {
            b += 1;
        }
        let mult = b - i + 1;
        if mult < p {
            let numer = kn(b) - kn(a);
            for j in (mult + 1..=p).rev() {
                alphas[j - mult - 1] = numer / (kn(a + j) - kn(a));
            }
            let r = p - mult;
            for j in 1..=r {
                let save = r - j;
                let s = mult + j;
                for k in (s..=p).rev() {
                    let alpha = alphas[k - s];
                    let cur = &mut ops[nb];
                    for row in 0..=p {
                        let v = alpha * cur.at(row, k) + (1.0 - alpha) * cur.at(row, k - 1);
                        cur.set(row, k, v);
                    }
                }
                if b <= n {
                    for t in 0..=j {
                        let v = ops[nb].at(p - j + t, p);
                        ops[nb + 1].set(save + t, save, v);
                    }
                }
            }
        }
        nb += 1;
        if b <= n {
            a = b;
            b += 1;
        }
    }
    ops.truncate(nb + 1);
    Ok(ops)
}

/// First knot index `k` of every distinct span (`knots[k] < knots[k+1]`),
/// ascending. The span's supported functions are `k-order ..= k`.
pub fn span_starts(knots: &KnotArray1D<f64>, order: usize) -> Vec<usize> {
    let n = knots.size().saturating_sub(order + 1);
    (order..n).filter(|&k| knots[k] < knots[k + 1]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn knots(values: &[f64]) -> KnotArray1D<f64> {
        values.iter().copied().collect()
    }

    fn assert_close(a: &ExtractionOperator, expected: &[f64]) {
        assert_eq!(a.as_slice().len(), expected.len());
        for (x, y) in a.as_slice().iter().zip(expected) {
            assert!((x - y).abs() < 1e-12, "{:?} != {:?}", a.as_slice(), expected);
        }
    }

    #[test]
    fn single_bezier_element_is_identity() {
        let ops = bezier_extraction_1d(&knots(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]), 2).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0], ExtractionOperator::identity(3));
    }

    #[test]
    fn linear_elements_are_identity() {
        let ops = bezier_extraction_1d(&knots(&[0.0, 0.0, 1.0, 2.0, 2.0]), 1).unwrap();
        assert_eq!(ops.len(), 2);
        for op in &ops {
            assert_eq!(*op, ExtractionOperator::identity(2));
        }
    }

    #[test]
    fn quadratic_two_elements() {
        let ops = bezier_extraction_1d(&knots(&[0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0]), 2).unwrap();
        assert_eq!(ops.len(), 2);
        assert_close(&ops[0], &[1.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.0, 0.0, 0.5]);
        assert_close(&ops[1], &[0.5, 0.0, 0.0, 0.5, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn columns_sum_to_one() {
        // partition of unity carries over to the Bernstein coefficients
        let k = knots(&[0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 2.0, 3.0, 3.0, 3.0, 3.0]);
        let ops = bezier_extraction_1d(&k, 3).unwrap();
        assert_eq!(ops.len(), k.nspans());
        for op in &ops {
            for c in 0..op.cols() {
                let sum: f64 = (0..op.rows()).filter_map(|r| op.get(r, c)).sum();
                assert!((sum - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn span_starts_skip_repeated_knots() {
        let k = knots(&[0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
        assert_eq!(span_starts(&k, 2), vec![2, 4]);
        assert_eq!(bezier_extraction_1d(&k, 2).unwrap().len(), 2);
    }

    #[test]
    fn rejects_non_open_vectors() {
        assert!(bezier_extraction_1d(&knots(&[0.0, 1.0, 2.0, 3.0]), 1).is_err());
        assert!(bezier_extraction_1d(&knots(&[0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0]), 1).is_err());
    }

    #[test]
    fn kron_and_compress() {
        let a = ExtractionOperator::from_row_major(2, 2, vec![1.0, 0.5, 0.0, 0.5]).unwrap();
        let i = ExtractionOperator::identity(2);
        let k = a.kron(&i);
        assert_eq!((k.rows(), k.cols()), (4, 4));
        assert_eq!(k.get(0, 2), Some(0.5));
        assert_eq!(k.get(1, 3), Some(0.5));
        assert_eq!(k.get(0, 1), Some(0.0));
        assert_eq!(k.get(4, 0), None);
        assert_eq!(k.get(0, 4), None);

        let c = k.compress();
        assert_eq!(c.nnz(), 6);
        assert_eq!(c.get(3, 3), 0.5);
        assert_eq!(c.to_dense(), k);
    }

    #[test]
    fn dense_load_checks_shape() {
        let op: ExtractionOperator =
            serde_json::from_str(r#"{"rows":1,"cols":2,"data":[0.5,0.5]}"#).unwrap();
        assert_eq!(op.get(0, 1), Some(0.5));
        assert!(
            serde_json::from_str::<ExtractionOperator>(r#"{"rows":2,"cols":2,"data":[1.0]}"#)
                .is_err()
        );
    }

    #[test]
    fn compressed_load_checks_row_pointers() {
        let c = ExtractionOperator::from_row_major(2, 2, vec![1.0, 0.0, 0.25, 0.75])
            .unwrap()
            .compress();
        let back: CompressedMatrix =
            serde_json::from_str(&serde_json::to_string(&c).unwrap()).unwrap();
        assert_eq!(back, c);
        let empty: CompressedMatrix =
            serde_json::from_str(&serde_json::to_string(&CompressedMatrix::default()).unwrap())
                .unwrap();
        assert_eq!(empty.rows(), 0);

        for bad in [
            // pointer past the stored values
            r#"{"rows":1,"cols":2,"row_ptr":[0,5],"col_idx":[0],"values":[1.0]}"#,
            // too few pointers
            r#"{"rows":2,"cols":2,"row_ptr":[0,1],"col_idx":[0],"values":[1.0]}"#,
            // decreasing pointers
            r#"{"rows":2,"cols":2,"row_ptr":[0,2,1],"col_idx":[0,1],"values":[1.0,1.0]}"#,
            // column outside the matrix
            r#"{"rows":1,"cols":2,"row_ptr":[0,1],"col_idx":[2],"values":[1.0]}"#,
            // index and value counts differ
            r#"{"rows":1,"cols":2,"row_ptr":[0,1],"col_idx":[0,1],"values":[1.0]}"#,
        ] {
            let err = serde_json::from_str::<CompressedMatrix>(bad).unwrap_err();
            assert!(err.to_string().starts_with("Invalid matrix"), "{bad}: {err}");
        }
    }

    fn cox_de_boor(u: &[f64], i: usize, p: usize, t: f64) -> f64 {
        if p == 0 {
            return if u[i] <= t && t < u[i + 1] { 1.0 } else { 0.0 };
        }
        let mut v = 0.0;
        let left = u[i + p] - u[i];
        if left > 0.0 {
            v += (t - u[i]) / left * cox_de_boor(u, i, p - 1, t);
        }
        let right = u[i + p + 1] - u[i + 1];
        if right > 0.0 {
            v += (u[i + p + 1] - t) / right * cox_de_boor(u, i + 1, p - 1, t);
        }
        v
    }

    fn bernstein(p: usize, k: usize, xi: f64) -> f64 {
        let binom = (0..k).fold(1.0, |acc, j| acc * (p - j) as f64 / (j + 1) as f64);
        binom * xi.powi(k as i32) * (1.0 - xi).powi((p - k) as i32)
    }

    fn open_knots() -> impl Strategy<Value = (usize, Vec<f64>)> {
        (2usize..=4)
            .prop_flat_map(|p| {
                (
                    Just(p),
                    prop::collection::vec((0.25f64..2.0, 1..=p), 1..4),
                    0.25f64..2.0,
                )
            })
            .prop_map(|(p, interior, last)| {
                let mut u = vec![0.0; p + 1];
                let mut x = 0.0;
                for (step, mult) in interior {
                    x += step;
                    u.extend(std::iter::repeat_n(x, mult));
                }
                x += last;
                u.extend(std::iter::repeat_n(x, p + 1));
                (p, u)
            })
    }

    proptest! {
        #[test]
        fn extraction_reproduces_bspline_basis((p, u) in open_knots()) {
            let k = knots(&u);
            let ops = bezier_extraction_1d(&k, p).unwrap();
            let starts = span_starts(&k, p);
            prop_assert_eq!(ops.len(), starts.len());
            for (op, &s) in ops.iter().zip(&starts) {
                let (a, b) = (u[s], u[s + 1]);
                for xi in [0.1, 0.5, 0.9] {
                    let t = a + xi * (b - a);
                    for r in 0..=p {
                        let exact = cox_de_boor(&u, s - p + r, p, t);
                        let extracted: f64 = (0..=p)
                            .map(|c| op.get(r, c).unwrap_or(0.0) * bernstein(p, c, xi))
                            .sum();
                        prop_assert!(
                            (exact - extracted).abs() < 1e-9,
                            "span {} row {} at {}: {} != {}", s, r, t, exact, extracted
                        );
                    }
                }
            }
        }
    }
}
