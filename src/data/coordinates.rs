//! Node coordinates: a section with three values per node.

use crate::bridge_error::BridgeError;
use crate::data::atlas::Atlas;
use crate::data::section::Section;
use crate::topology::point::NodeId;

const SPATIAL_DIM: usize = 3;

/// Cartesian coordinates of mesh nodes.
#[derive(Clone, Debug)]
pub struct Coordinates {
    section: Section<f64>,
}

impl Coordinates {
    /// Empty store for 3D nodes.
    pub fn spatial() -> Self {
        Self {
            section: Section::new(Atlas::default()),
        }
    }

    /// Underlying section.
    #[inline]
    pub fn section(&self) -> &Section<f64> {
        &self.section
    }

    /// `[x, y, z]` of node `p`.
    #[inline]
    pub fn try_restrict(&self, p: NodeId) -> Result<&[f64], BridgeError> {
        self.section.try_restrict(p)
    }

    /// Add node `p`; `coords` must hold exactly three values.
    pub fn try_add_point(&mut self, p: NodeId, coords: &[f64]) -> Result<(), BridgeError> {
        if coords.len() != SPATIAL_DIM {
            return Err(BridgeError::SliceLengthMismatch {
                point: p,
                expected: SPATIAL_DIM,
                found: coords.len(),
            });
        }
        self.section.try_add_point(p, SPATIAL_DIM)?;
        self.section.try_set(p, coords)
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.section.atlas().len()
    }

    /// No node added yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.section.atlas().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_read_back() {
        let mut c = Coordinates::spatial();
        let p = NodeId::new(4).unwrap();
        c.try_add_point(p, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(c.try_restrict(p).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn planar_points_are_rejected() {
        let mut c = Coordinates::spatial();
        let p = NodeId::new(4).unwrap();
        assert!(matches!(
            c.try_add_point(p, &[1.0, 2.0]),
            Err(BridgeError::SliceLengthMismatch { expected: 3, found: 2, .. })
        ));
        assert!(c.is_empty());
    }
}
