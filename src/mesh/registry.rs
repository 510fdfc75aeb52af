//! Name → constructor registries for elements and conditions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::bridge_error::BridgeError;
use crate::mesh::entity::{Entity, IsogeometricEntity};
use crate::mesh::geometry::IsogeometricGeometry;
use crate::mesh::properties::Properties;

/// Builds one entity from its id, geometry and property record.
pub type EntityConstructor =
    Arc<dyn Fn(usize, IsogeometricGeometry, Arc<Properties>) -> Box<dyn Entity> + Send + Sync>;

/// Registry of entity constructors for one entity kind.
#[derive(Clone)]
pub struct EntityRegistry {
    kind: &'static str,
    constructors: BTreeMap<String, EntityConstructor>,
}

impl EntityRegistry {
    /// Empty registry; `kind` names the entity kind in error messages.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            constructors: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Register (or replace) a constructor.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(usize, IsogeometricGeometry, Arc<Properties>) -> Box<dyn Entity>
            + Send
            + Sync
            + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    /// Register `name` as a plain [`IsogeometricEntity`].
    pub fn register_isogeometric(&mut self, name: impl Into<String>) {
        let name = name.into();
        let type_name = name.clone();
        self.register(name, move |id, geometry, properties| {
            Box::new(IsogeometricEntity::new(
                id,
                type_name.clone(),
                geometry,
                properties,
            ))
        });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Fail with `UnknownEntityType` unless `name` is registered.
    pub fn ensure_registered(&self, name: &str) -> Result<(), BridgeError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(BridgeError::UnknownEntityType {
                kind: self.kind,
                name: name.to_owned(),
            })
        }
    }

    /// Instantiate an entity of type `name`.
    pub fn create(
        &self,
        name: &str,
        id: usize,
        geometry: IsogeometricGeometry,
        properties: Arc<Properties>,
    ) -> Result<Box<dyn Entity>, BridgeError> {
        let ctor = self
            .constructors
            .get(name)
            .ok_or_else(|| BridgeError::UnknownEntityType {
                kind: self.kind,
                name: name.to_owned(),
            })?;
        Ok(ctor(id, geometry, properties))
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("kind", &self.kind)
            .field("names", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Element and condition registries handed to the bridge.
#[derive(Clone, Debug)]
pub struct EntityCatalog {
    pub elements: EntityRegistry,
    pub conditions: EntityRegistry,
}

impl EntityCatalog {
    pub fn new() -> Self {
        Self {
            elements: EntityRegistry::new("Element"),
            conditions: EntityRegistry::new("Condition"),
        }
    }
}

impl Default for EntityCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_rejected() {
        let catalog = EntityCatalog::new();
        let err = catalog
            .conditions
            .create("FaceLoad", 1, IsogeometricGeometry::default(), Arc::new(Properties::new(0)))
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::UnknownEntityType {
                kind: "Condition",
                name: "FaceLoad".into()
            }
        );
        assert!(catalog.elements.ensure_registered("Anything").is_err());
    }

    #[test]
    fn registered_constructors_are_used() {
        let mut reg = EntityRegistry::new("Element");
        reg.register_isogeometric("KinematicLinearBezier2D");
        reg.register("Custom", |id, g, p| {
            Box::new(IsogeometricEntity::new(id * 10, "Custom", g, p))
        });
        assert_eq!(
            reg.names().collect::<Vec<_>>(),
            vec!["Custom", "KinematicLinearBezier2D"]
        );
        let props = Arc::new(Properties::new(4));
        let e = reg
            .create("KinematicLinearBezier2D", 7, IsogeometricGeometry::default(), props.clone())
            .unwrap();
        assert_eq!(e.id(), 7);
        assert_eq!(e.type_name(), "KinematicLinearBezier2D");
        assert_eq!(e.properties().id(), 4);
        let c = reg
            .create("Custom", 2, IsogeometricGeometry::default(), props)
            .unwrap();
        assert_eq!(c.id(), 20);
    }
}
