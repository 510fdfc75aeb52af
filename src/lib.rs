//! # multipatch-bridge
//!
//! multipatch-bridge connects isogeometric multipatch models to the discrete
//! meshes a finite-element solver works on. Patches are described by knot
//! vectors and weighted control points; the bridge turns them into nodes,
//! elements and conditions, and keeps nodal fields synchronized between the
//! two representations.
//!
//! ## Features
//! - `KnotArray1D`: sorted knot container with stable handles, unique
//!   insertion under a tolerance and span queries
//! - Bézier extraction of open knot vectors and tensor-product B-spline spaces
//! - Multipatch numbering with conforming interfaces (glued functions share
//!   one equation id)
//! - `MultiPatchModelPart`: mesh regeneration lifecycle plus forward/backward
//!   field synchronization
//! - Entity types are supplied through a name → constructor registry
//!
//! ## Usage
//!
//! ```
//! use multipatch_bridge::prelude::*;
//!
//! let knots: KnotArray1D<f64> = [0.0, 0.0, 1.0, 2.0, 2.0].into_iter().collect();
//! let space = BSplineFESpace::new(vec![knots], vec![1])?;
//! let points = (0..3)
//!     .map(|i| ControlPoint::new(i as f64, 0.0, 0.0, 1.0))
//!     .collect();
//! let mut mp = MultiPatch::new();
//! mp.add_patch(Patch::new(1, space, ControlGrid::unstructured(points))?)?;
//!
//! let mut catalog = EntityCatalog::new();
//! catalog.elements.register_isogeometric("Bezier1D");
//!
//! let mut bridge = MultiPatchModelPart::new(mp.into_shared(), catalog, BridgeOptions::default())?;
//! bridge.begin_model_part()?;
//! bridge.create_nodes()?;
//! let elements = bridge.add_elements(1, "Bezier1D", 1, 0)?;
//! bridge.end_model_part();
//! assert_eq!(elements.len(), 2);
//! assert!(bridge.is_ready());
//! # Ok::<(), multipatch_bridge::BridgeError>(())
//! ```
//!
//! ## Invariant checking
//! Enable `check-invariants` to validate knot arrays and atlases after every
//! mutation in release builds; `strict-invariants` implies it.

pub mod algs;
pub mod bridge_error;
pub mod config;
pub mod data;
pub mod debug_invariants;
pub mod mesh;
pub mod multipatch_model_part;
pub mod nurbs;
pub mod patch;
pub mod topology;

pub use bridge_error::{BridgeError, ErrorKind};
pub use config::BridgeOptions;
pub use debug_invariants::DebugInvariants;
pub use multipatch_model_part::{BridgeState, MultiPatchModelPart};

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::entity_factory::{EntityRequest, create_entities_from_fe_space};
    pub use crate::bridge_error::{BridgeError, ErrorKind};
    pub use crate::config::BridgeOptions;
    pub use crate::data::{Atlas, Coordinates, Section};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh::{
        Entity, EntityCatalog, EntityContainer, EntityFlags, EntityRegistry,
        IsogeometricEntity, IsogeometricGeometry, Mesh, Properties,
    };
    pub use crate::multipatch_model_part::{BridgeState, MultiPatchModelPart};
    pub use crate::nurbs::{
        CompressedMatrix, ExtractionOperator, Knot, KnotArray1D, KnotId, bezier_extraction_1d,
    };
    pub use crate::patch::{
        BSplineFESpace, BoundarySide, Cell, ControlGrid, ControlPoint, FESpace, FieldGrid,
        MultiPatch, Patch, SharedMultiPatch, Variable,
    };
    pub use crate::topology::{NodeId, NodeIdMap};
}
