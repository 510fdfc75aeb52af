//! Data module: atlas, sections and coordinates over mesh nodes
#![warn(missing_docs)]

pub mod atlas;
pub mod coordinates;
pub mod section;

pub use atlas::Atlas;
pub use coordinates::Coordinates;
pub use section::Section;
