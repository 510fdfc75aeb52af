//! Mesh entities (elements and conditions) and their containers.

use std::fmt;
use std::sync::Arc;

use crate::mesh::geometry::IsogeometricGeometry;
use crate::mesh::properties::Properties;

/// Activation state of an entity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EntityFlags {
    pub active: bool,
    pub activation_level: i32,
    pub is_inactive: bool,
}

impl EntityFlags {
    /// Freshly created, active entity.
    pub const ACTIVE: EntityFlags = EntityFlags {
        active: true,
        activation_level: 0,
        is_inactive: false,
    };
}

/// Behaviour shared by elements and conditions.
pub trait Entity: fmt::Debug + Send + Sync {
    fn id(&self) -> usize;

    /// Registered type name this entity was created from.
    fn type_name(&self) -> &str;

    fn geometry(&self) -> &IsogeometricGeometry;

    fn properties(&self) -> &Arc<Properties>;

    fn flags(&self) -> EntityFlags;

    fn set_flags(&mut self, flags: EntityFlags);
}

/// Default entity: stores what it is given.
#[derive(Clone, Debug)]
pub struct IsogeometricEntity {
    id: usize,
    type_name: String,
    geometry: IsogeometricGeometry,
    properties: Arc<Properties>,
    flags: EntityFlags,
}

impl IsogeometricEntity {
    pub fn new(
        id: usize,
        type_name: impl Into<String>,
        geometry: IsogeometricGeometry,
        properties: Arc<Properties>,
    ) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            geometry,
            properties,
            flags: EntityFlags::default(),
        }
    }
}

impl Entity for IsogeometricEntity {
    fn id(&self) -> usize {
        self.id
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn geometry(&self) -> &IsogeometricGeometry {
        &self.geometry
    }

    fn properties(&self) -> &Arc<Properties> {
        &self.properties
    }

    fn flags(&self) -> EntityFlags {
        self.flags
    }

    fn set_flags(&mut self, flags: EntityFlags) {
        self.flags = flags;
    }
}

/// Ordered collection of entities, unique by id after [`unique`](Self::unique).
#[derive(Clone, Debug, Default)]
pub struct EntityContainer {
    items: Vec<Arc<dyn Entity>>,
}

impl EntityContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Arc<dyn Entity>) {
        self.items.push(entity);
    }

    /// Append every entity of `other`, keeping their order.
    pub fn append(&mut self, other: &EntityContainer) {
        self.items.extend(other.items.iter().cloned());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Entity>> {
        self.items.iter()
    }

    /// Entity ids in container order.
    pub fn ids(&self) -> Vec<usize> {
        self.items.iter().map(|e| e.id()).collect()
    }

    /// First entity with id `id`.
    pub fn get(&self, id: usize) -> Option<&Arc<dyn Entity>> {
        self.items.iter().find(|e| e.id() == id)
    }

    /// Sort by id and drop every entity whose id repeats an earlier one.
    ///
    /// Returns the number of entities removed.
    pub fn unique(&mut self) -> usize {
        let before = self.items.len();
        // stable sort keeps the first-inserted entity of each id in front
        self.items.sort_by_key(|e| e.id());
        self.items.dedup_by_key(|e| e.id());
        let removed = before - self.items.len();
        if removed > 0 {
            log::warn!("{removed} entities with duplicate ids were removed");
        }
        removed
    }
}

impl<'a> IntoIterator for &'a EntityContainer {
    type Item = &'a Arc<dyn Entity>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Entity>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Arc<dyn Entity>> for EntityContainer {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Entity>>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
