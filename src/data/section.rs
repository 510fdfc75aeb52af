//! Section: per-node data storage over an atlas.
//!
//! The `Section<V>` type couples an [`Atlas`] (mapping nodes to slices in a
//! contiguous array) with a `Vec<V>` holding the actual data. The mesh keeps
//! one section per nodal variable.

use crate::bridge_error::BridgeError;
use crate::data::atlas::Atlas;
use crate::topology::point::NodeId;

/// Storage for per-node data, backed by an `Atlas`.
#[derive(Clone, Debug, Default)]
pub struct Section<V> {
    atlas: Atlas,
    data: Vec<V>,
}

impl<V: Clone + Default> Section<V> {
    /// Construct a new `Section` given an existing `Atlas`.
    ///
    /// Initializes the data buffer with `V::default()` for every slot.
    pub fn new(atlas: Atlas) -> Self {
        let data = vec![V::default(); atlas.total_len()];
        Section { atlas, data }
    }

    /// Read-only view of the atlas.
    #[inline]
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    /// Read-only view of the data slice for node `p`.
    #[inline]
    pub fn try_restrict(&self, p: NodeId) -> Result<&[V], BridgeError> {
        let (offset, len) = self.atlas.get(p).ok_or(BridgeError::MissingAtlasPoint(p))?;
        Ok(&self.data[offset..offset + len])
    }

    /// Mutable view of the data slice for node `p`.
    #[inline]
    pub fn try_restrict_mut(&mut self, p: NodeId) -> Result<&mut [V], BridgeError> {
        let (offset, len) = self.atlas.get(p).ok_or(BridgeError::MissingAtlasPoint(p))?;
        Ok(&mut self.data[offset..offset + len])
    }

    /// Overwrite the data slice at node `p` with `val`.
    ///
    /// # Errors
    /// `MissingAtlasPoint` if `p` is unknown, `SliceLengthMismatch` if
    /// `val.len()` differs from the registered slice length.
    pub fn try_set(&mut self, p: NodeId, val: &[V]) -> Result<(), BridgeError> {
        let target = self.try_restrict_mut(p)?;
        if target.len() != val.len() {
            return Err(BridgeError::SliceLengthMismatch {
                point: p,
                expected: target.len(),
                found: val.len(),
            });
        }
        target.clone_from_slice(val);
        Ok(())
    }

    /// Add a new node to the section, growing the data buffer with defaults.
    pub fn try_add_point(&mut self, p: NodeId, len: usize) -> Result<(), BridgeError> {
        self.atlas.try_insert(p, len)?;
        self.data.resize(self.atlas.total_len(), V::default());
        Ok(())
    }
}
