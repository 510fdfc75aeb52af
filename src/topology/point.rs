//! `NodeId`: a strong, zero-cost handle for mesh nodes
//!
//! Every mesh node is identified by an opaque identifier. `NodeId` wraps a
//! nonzero `u64` so that 0 stays reserved as an invalid or sentinel value.
//!
//! This module provides:
//! - A transparent `NodeId` newtype around `NonZeroU64`.
//! - [`NodeIdMap`], the one transform between global equation ids of a
//!   multipatch and node ids of the mesh. Node creation, entity synthesis and
//!   both synchronization directions go through the same map.

use std::{fmt, num::NonZeroU64};

use crate::bridge_error::BridgeError;

/// Identifier of a mesh node.
///
/// # Memory layout
/// This type is `repr(transparent)`, meaning it has the same ABI and
/// alignment as its single field (`NonZeroU64`).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// Creates a new `NodeId` from a raw `u64` value.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidNodeId`] if `raw == 0`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use multipatch_bridge::topology::point::NodeId;
    /// let p = NodeId::new(1).unwrap();
    /// assert_eq!(p.get(), 1);
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, BridgeError> {
        NonZeroU64::new(raw)
            .map(NodeId)
            .ok_or(BridgeError::InvalidNodeId)
    }

    /// Returns the inner `u64` value of this `NodeId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.get()).finish()
    }
}

/// Prints the numeric ID without any wrapper text.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Order-preserving transform from equation ids to node ids.
///
/// `node = equation_id + offset`, with `offset >= 1` so every equation id
/// (including 0) lands on a valid [`NodeId`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeIdMap {
    offset: NonZeroU64,
}

impl NodeIdMap {
    /// Build the map for a given offset.
    pub fn new(offset: u64) -> Result<Self, BridgeError> {
        let offset = NonZeroU64::new(offset).ok_or_else(|| {
            BridgeError::InvalidOptions("node id offset must be at least 1".into())
        })?;
        Ok(Self { offset })
    }

    /// The configured offset.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset.get()
    }

    /// Node id for a global equation id.
    #[inline]
    pub fn node_id(&self, equation_id: usize) -> NodeId {
        // offset >= 1, so the sum is never zero
        NodeId(self.offset.saturating_add(equation_id as u64))
    }

    /// Equation id for a node id, if the node lies in the mapped range.
    #[inline]
    pub fn equation_id(&self, node: NodeId) -> Option<usize> {
        node.get()
            .checked_sub(self.offset.get())
            .and_then(|eq| usize::try_from(eq).ok())
    }
}

impl Default for NodeIdMap {
    fn default() -> Self {
        Self {
            offset: NonZeroU64::MIN,
        }
    }
}
