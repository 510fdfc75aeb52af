//! Identifiers shared by the mesh side of the bridge.
//!
//! Nodes are addressed by [`NodeId`]; the [`NodeIdMap`] ties them to the
//! global equation numbering of a multipatch.

pub mod point;

pub use point::{NodeId, NodeIdMap};
