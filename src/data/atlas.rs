//! Atlas: node → `(offset, len)` in a flat value buffer.
//!
//! Node coordinates and nodal solution-step values are both packed this way,
//! one atlas per buffer.

use hashbrown::HashMap;

use crate::bridge_error::BridgeError;
use crate::debug_invariants::DebugInvariants;
use crate::topology::point::NodeId;

/// Slice layout of a node-indexed buffer.
///
/// Slices are laid out back to back in insertion order, so the offset of a
/// node is the sum of the lengths inserted before it and `total_len` is the
/// next free offset. Every slice is non-empty.
#[derive(Clone, Debug, Default)]
pub struct Atlas {
    slots: HashMap<NodeId, (usize, usize)>,
    order: Vec<NodeId>,
    total_len: usize,
}

impl Atlas {
    /// Append node `p` with a slice of `len` values; returns its offset.
    ///
    /// # Errors
    /// `ZeroLengthSlice` for `len == 0`, `DuplicatePoint` if `p` is already
    /// laid out.
    pub fn try_insert(&mut self, p: NodeId, len: usize) -> Result<usize, BridgeError> {
        if len == 0 {
            return Err(BridgeError::ZeroLengthSlice);
        }
        if self.slots.contains_key(&p) {
            return Err(BridgeError::DuplicatePoint(p));
        }
        let offset = self.total_len;
        self.slots.insert(p, (offset, len));
        self.order.push(p);
        self.total_len += len;
        #[cfg(feature = "check-invariants")]
        self.debug_assert_invariants();
        Ok(offset)
    }

    /// `(offset, len)` of node `p`.
    #[inline]
    pub fn get(&self, p: NodeId) -> Option<(usize, usize)> {
        self.slots.get(&p).copied()
    }

    /// Whether `p` has a slot.
    #[inline]
    pub fn contains(&self, p: NodeId) -> bool {
        self.slots.contains_key(&p)
    }

    /// Number of nodes (not values).
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// No node laid out yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Length of the buffer this atlas describes.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Nodes in insertion order.
    #[inline]
    pub fn points(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }
}

impl DebugInvariants for Atlas {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Atlas invalid");
    }

    /// Walks `order` and checks that each slot starts where the previous one
    /// ended.
    fn validate_invariants(&self) -> Result<(), BridgeError> {
        if self.order.len() != self.slots.len() {
            return Err(BridgeError::SizeMismatch {
                expected: self.slots.len(),
                found: self.order.len(),
            });
        }
        let end = self.order.iter().try_fold(0usize, |next, &p| {
            let (offset, len) = self.get(p).ok_or(BridgeError::MissingAtlasPoint(p))?;
            if len == 0 {
                return Err(BridgeError::ZeroLengthSlice);
            }
            if offset != next {
                return Err(BridgeError::SizeMismatch {
                    expected: next,
                    found: offset,
                });
            }
            Ok(next + len)
        })?;
        if end != self.total_len {
            return Err(BridgeError::SizeMismatch {
                expected: end,
                found: self.total_len,
            });
        }
        Ok(())
    }
}
