//! Knot vectors and Bézier extraction.

pub mod extraction;
pub mod knot;
pub mod knot_array;

pub use extraction::{
    CompressedMatrix, ExtractionOperator, bezier_extraction_1d, span_starts,
    validate_open_knot_vector,
};
pub use knot::{Knot, KnotId};
pub use knot_array::KnotArray1D;
