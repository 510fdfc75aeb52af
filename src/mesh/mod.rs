//! Host mesh side of the bridge.

pub mod entity;
pub mod geometry;
pub mod model_part;
pub mod properties;
pub mod registry;

pub use entity::{Entity, EntityContainer, EntityFlags, IsogeometricEntity};
pub use geometry::IsogeometricGeometry;
pub use model_part::Mesh;
pub use properties::Properties;
pub use registry::{EntityCatalog, EntityConstructor, EntityRegistry};
