//! A single parametric breakpoint.

use std::fmt;

/// Stable handle to a knot inside the [`KnotArray1D`](super::KnotArray1D)
/// that created it.
///
/// The handle survives later insertions; the knot's [`Knot::index`] does not.
/// Handles are invalidated by [`KnotArray1D::clear`](super::KnotArray1D::clear).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KnotId(pub(crate) usize);

/// A knot value together with its current position in the owning array.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Knot<T> {
    pub(crate) value: T,
    pub(crate) index: usize,
}

impl<T: Copy> Knot<T> {
    pub(crate) fn new(value: T) -> Self {
        Self { value, index: 0 }
    }

    /// Parametric value.
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    /// Current position in the owning array; recomputed on every insertion.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn update_index(&mut self, index: usize) {
        self.index = index;
    }
}

impl<T: fmt::Display> fmt::Display for Knot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.index, self.value)
    }
}
