//! Ordered knot container for one parametric direction.
//!
//! - knots are always sorted ascending by value;
//! - the index of a knot starts from 0 and always equals its position;
//! - knots may repeat (multiplicity). A *span* runs between two consecutive
//!   distinct values, not between consecutive knots.
//!
//! Knots are owned by an arena inside the array and addressed through stable
//! [`KnotId`] handles, so a caller can hold on to a knot while more knots are
//! inserted around it.

use std::fmt;
use std::ops::Index;

use itertools::Itertools;
use num_traits::Float;

use crate::bridge_error::BridgeError;
use crate::debug_invariants::DebugInvariants;
use crate::nurbs::knot::{Knot, KnotId};

/// Knot vector in one parametric direction.
#[derive(Clone, Debug, Default)]
pub struct KnotArray1D<T> {
    arena: Vec<Knot<T>>,
    order: Vec<KnotId>,
}

impl<T: Float> KnotArray1D<T> {
    /// Empty knot array.
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Remove every knot. Previously returned [`KnotId`]s become invalid.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.order.clear();
    }

    /// Insert a knot and return its handle, whether or not the value repeats.
    ///
    /// The new knot goes after every existing knot of equal value, so equal
    /// knots keep their relative order. All indices are renumbered.
    ///
    /// # Errors
    /// `InvalidKnotVector` if `value` is NaN.
    pub fn create_knot(&mut self, value: T) -> Result<KnotId, BridgeError> {
        if value.is_nan() {
            return Err(BridgeError::InvalidKnotVector(
                "knot value must not be NaN".into(),
            ));
        }
        let pos = self
            .order
            .partition_point(|id| self.arena[id.0].value() <= value);
        let id = KnotId(self.arena.len());
        self.arena.push(Knot::new(value));
        self.order.insert(pos, id);
        self.renumber();
        Ok(id)
    }

    /// Insert a knot unless one already lies strictly within `tol` of `value`,
    /// in which case the existing knot is returned and nothing changes.
    pub fn create_unique_knot(&mut self, value: T, tol: T) -> Result<KnotId, BridgeError> {
        if let Some(&id) = self
            .order
            .iter()
            .find(|id| (value - self.arena[id.0].value()).abs() < tol)
        {
            return Ok(id);
        }
        self.create_knot(value)
    }

    /// Knot at position `i`.
    ///
    /// # Errors
    /// `KnotIndexOutOfRange` when `i >= size()`.
    pub fn knot_at(&self, i: usize) -> Result<&Knot<T>, BridgeError> {
        self.order
            .get(i)
            .map(|id| &self.arena[id.0])
            .ok_or(BridgeError::KnotIndexOutOfRange {
                index: i,
                len: self.order.len(),
            })
    }

    /// Knot behind a handle, if the handle belongs to this array.
    #[inline]
    pub fn knot(&self, id: KnotId) -> Option<&Knot<T>> {
        self.arena.get(id.0)
    }

    /// Number of knots, repeats included.
    #[inline]
    pub fn size(&self) -> usize {
        self.order.len()
    }

    /// Alias of [`size`](Self::size).
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the array holds no knot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of value changes walking left to right.
    ///
    /// A constant (or empty) array has 0 spans.
    pub fn nspans(&self) -> usize {
        self.iter()
            .tuple_windows()
            .filter(|(l, r)| r.value() != l.value())
            .count()
    }

    /// The two knots bounding the `i_span`-th value change (1-based): the
    /// last knot of the left run and the first knot of the right run.
    ///
    /// # Errors
    /// `SpanIndexOutOfRange` when `i_span` is 0 or exceeds [`nspans`](Self::nspans).
    pub fn span(&self, i_span: usize) -> Result<(&Knot<T>, &Knot<T>), BridgeError> {
        self.iter()
            .tuple_windows()
            .filter(|(l, r)| r.value() != l.value())
            .nth(i_span.wrapping_sub(1))
            .ok_or_else(|| BridgeError::SpanIndexOutOfRange {
                span: i_span,
                nspans: self.nspans(),
            })
    }

    /// Knots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Knot<T>> + Clone + '_ {
        self.order.iter().map(move |id| &self.arena[id.0])
    }

    /// Knot values in ascending order.
    pub fn values(&self) -> Vec<T> {
        self.iter().map(Knot::value).collect()
    }

    /// Distinct knot values in ascending order.
    pub fn unique_values(&self) -> Vec<T> {
        self.iter().map(Knot::value).dedup().collect()
    }

    /// First position where the two arrays disagree, comparing all `size()`
    /// values. Arrays of different size disagree at `min(size)`.
    pub fn first_mismatch(&self, other: &Self) -> Option<usize> {
        let common = self
            .iter()
            .zip(other.iter())
            .position(|(a, b)| a.value() != b.value());
        match common {
            Some(i) => Some(i),
            None if self.size() != other.size() => Some(self.size().min(other.size())),
            None => None,
        }
    }

    /// Fail with a logic error naming the first difference between two arrays.
    pub fn ensure_matches(&self, other: &Self) -> Result<(), BridgeError> {
        if self.size() != other.size() {
            return Err(BridgeError::KnotCountMismatch {
                left: self.size(),
                right: other.size(),
            });
        }
        match self.first_mismatch(other) {
            None => Ok(()),
            Some(index) => Err(BridgeError::KnotMismatch {
                index,
                left: self[index].to_f64().unwrap_or(f64::NAN),
                right: other[index].to_f64().unwrap_or(f64::NAN),
            }),
        }
    }

    /// Compare against a plain list of values.
    pub fn eq_values(&self, values: &[T]) -> bool {
        self.size() == values.len() && self.iter().zip(values).all(|(k, &v)| k.value() == v)
    }

    fn renumber(&mut self) {
        for (index, id) in self.order.iter().enumerate() {
            self.arena[id.0].update_index(index);
        }
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_invariants();
    }
}

impl<T: Float> DebugInvariants for KnotArray1D<T> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "KnotArray1D invalid");
    }

    fn validate_invariants(&self) -> Result<(), BridgeError> {
        for (pos, knot) in self.iter().enumerate() {
            if knot.index() != pos {
                return Err(BridgeError::InvalidKnotVector(format!(
                    "knot at position {pos} carries index {}",
                    knot.index()
                )));
            }
        }
        if let Some((l, r)) = self
            .iter()
            .tuple_windows()
            .find(|(l, r)| r.value() < l.value())
        {
            return Err(BridgeError::InvalidKnotVector(format!(
                "knots {} and {} are out of order",
                l.index(),
                r.index()
            )));
        }
        Ok(())
    }
}

impl<T: Float> PartialEq for KnotArray1D<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.first_mismatch(other).is_none()
    }
}

impl<T: Float> FromIterator<T> for KnotArray1D<T> {
    /// Builds an array by inserting every value; NaN values are skipped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut knots = Self::new();
        for value in iter {
            if knots.create_knot(value).is_err() {
                log::warn!("skipping NaN knot value");
            }
        }
        knots
    }
}

/// Value access by position.
///
/// # Panics
/// Panics if `i >= size()`; use [`KnotArray1D::knot_at`] for a checked lookup.
impl<T: Float> Index<usize> for KnotArray1D<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        let id = self.order[i];
        &self.arena[id.0].value
    }
}

impl<T: Float + fmt::Display> fmt::Display for KnotArray1D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for knot in self.iter() {
            write!(f, " {knot}")?;
        }
        Ok(())
    }
}
