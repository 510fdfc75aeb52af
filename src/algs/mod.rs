//! Algorithms that build mesh entities from parametric spaces.

pub mod entity_factory;

pub use entity_factory::{EntityRequest, create_entities_from_fe_space};
