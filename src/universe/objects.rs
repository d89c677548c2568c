//! Object storage and typed queries

use ahash::AHashMap;

use super::object::{ObjectType, UniverseObject};
use crate::core::types::ObjectId;

/// Storage for all universe objects
///
/// Iteration follows insertion order so repeated evaluations over the same
/// store see candidates in the same order.
#[derive(Debug, Clone)]
pub struct ObjectMap {
    objects: AHashMap<ObjectId, UniverseObject>,
    order: Vec<ObjectId>,
}

impl ObjectMap {
    pub fn new() -> Self {
        Self {
            objects: AHashMap::new(),
            order: Vec::new(),
        }
    }

    /// Add an object; returns the object back if its id is taken
    pub fn insert(&mut self, object: UniverseObject) -> Result<(), UniverseObject> {
        if self.objects.contains_key(&object.id) {
            return Err(object);
        }
        self.order.push(object.id);
        self.objects.insert(object.id, object);
        Ok(())
    }

    pub fn get(&self, id: ObjectId) -> Option<&UniverseObject> {
        self.objects.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Option<&mut UniverseObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Iterate over all objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &UniverseObject> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Iterate over objects satisfying a type, pseudo-types included
    pub fn of_type(&self, object_type: ObjectType) -> impl Iterator<Item = &UniverseObject> {
        self.iter().filter(move |obj| obj.is_type(object_type))
    }

    /// Resolve a list of ids, skipping unknown ones
    pub fn find<'a, 'b>(
        &'a self,
        ids: impl IntoIterator<Item = &'b ObjectId>,
    ) -> Vec<&'a UniverseObject> {
        ids.into_iter().filter_map(|id| self.objects.get(id)).collect()
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectMap {
    fn default() -> Self {
        Self::new()
    }
}
