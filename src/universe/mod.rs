//! Read-only object store consulted by conditions
//!
//! Objects reference each other only through ids. Containers must be
//! inserted before their contents; `insert` records the content id on the
//! container so containment can be queried from either side.

pub mod design;
pub mod empire;
pub mod object;
pub mod objects;
pub mod species;
mod starlanes;

pub use design::{DesignRegistry, PartType, ShipDesign, ShipPartClass};
pub use empire::{
    BuildType, DiplomaticStatus, Empire, EmpireManager, ProductionItem, ResourceType,
};
pub use object::{
    BuildingData, FleetData, Meter, MeterType, ObjectKind, ObjectType, PlanetData,
    PlanetEnvironment, PlanetSize, PlanetType, ShipData, StarType, SystemData, UniverseObject,
    Visibility,
};
pub use objects::ObjectMap;
pub use species::{Species, SpeciesManager};

use crate::core::error::{EngineError, Result};
use crate::core::types::{ObjectId, Turn};

#[derive(Debug, Clone, Default)]
pub struct Universe {
    objects: ObjectMap,
    pub empires: EmpireManager,
    pub species: SpeciesManager,
    pub designs: DesignRegistry,
    current_turn: Turn,
}

impl Universe {
    pub fn new(current_turn: Turn) -> Self {
        Self {
            current_turn,
            ..Default::default()
        }
    }

    pub fn current_turn(&self) -> Turn {
        self.current_turn
    }

    pub fn set_current_turn(&mut self, turn: Turn) {
        self.current_turn = turn;
    }

    pub fn objects(&self) -> &ObjectMap {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&UniverseObject> {
        self.objects.get(id)
    }

    /// Add an object and register it with its containers
    pub fn insert(&mut self, object: UniverseObject) -> Result<()> {
        if self.objects.contains(object.id) {
            return Err(EngineError::DuplicateObject(object.id));
        }

        let id = object.id;
        let mut containers = Vec::new();
        if object.system_id.is_valid() && object.as_system().is_none() {
            containers.push(object.system_id);
        }
        match &object.kind {
            ObjectKind::Ship(ship) if ship.fleet_id.is_valid() => containers.push(ship.fleet_id),
            ObjectKind::Building(building) if building.planet_id.is_valid() => {
                containers.push(building.planet_id)
            }
            _ => {}
        }
        if let Some(&missing) = containers.iter().find(|c| !self.objects.contains(**c)) {
            return Err(EngineError::ObjectNotFound(missing));
        }

        for container_id in containers {
            if let Some(container) = self.objects.get_mut(container_id) {
                match &mut container.kind {
                    ObjectKind::System(system) => {
                        system.contents.insert(id);
                    }
                    ObjectKind::Fleet(fleet) => {
                        fleet.ships.insert(id);
                    }
                    ObjectKind::Planet(planet) => {
                        planet.buildings.insert(id);
                    }
                    _ => tracing::warn!(container = %container_id, object = %id, "Container cannot hold objects"),
                }
            }
        }

        tracing::debug!(object = %id, kind = object.object_type().name(), "Inserted object");
        self.objects
            .insert(object)
            .map_err(|rejected| EngineError::DuplicateObject(rejected.id))
    }

    /// The planet itself, or the planet a building stands on
    pub fn planet_of<'a>(&'a self, obj: &'a UniverseObject) -> Option<&'a UniverseObject> {
        match &obj.kind {
            ObjectKind::Planet(_) => Some(obj),
            ObjectKind::Building(building) => self
                .object(building.planet_id)
                .filter(|planet| planet.as_planet().is_some()),
            _ => None,
        }
    }

    /// The fleet itself, or the fleet a ship belongs to
    pub fn fleet_of<'a>(&'a self, obj: &'a UniverseObject) -> Option<&'a UniverseObject> {
        match &obj.kind {
            ObjectKind::Fleet(_) => Some(obj),
            ObjectKind::Ship(ship) => self
                .object(ship.fleet_id)
                .filter(|fleet| fleet.as_fleet().is_some()),
            _ => None,
        }
    }

    /// The system itself, or the system the object is in
    pub fn system_of<'a>(&'a self, obj: &'a UniverseObject) -> Option<&'a UniverseObject> {
        if obj.as_system().is_some() {
            return Some(obj);
        }
        self.object(obj.system_id)
            .filter(|system| system.as_system().is_some())
    }

    /// Id of the system an object is at, counting systems as at themselves
    pub fn system_id_of(&self, obj: &UniverseObject) -> ObjectId {
        if obj.as_system().is_some() {
            obj.id
        } else {
            obj.system_id
        }
    }

    pub fn design_of(&self, obj: &UniverseObject) -> Option<&ShipDesign> {
        obj.as_ship().and_then(|ship| self.designs.design(ship.design_id))
    }

    /// Species of a planet, of the planet under a building, or of a ship crew
    pub fn species_of(&self, obj: &UniverseObject) -> Option<&Species> {
        let name = match &obj.kind {
            ObjectKind::Building(_) => self.planet_of(obj)?.species_name()?,
            _ => obj.species_name()?,
        };
        self.species.get(name)
    }

    /// Check that every id an object or empire refers to exists
    pub fn validate(&self) -> Result<()> {
        for obj in self.objects.iter() {
            if obj.system_id.is_valid() && !self.objects.contains(obj.system_id) {
                return Err(EngineError::ObjectNotFound(obj.system_id));
            }
            if let Some(owner) = obj.owner {
                if self.empires.get(owner).is_none() {
                    return Err(EngineError::UnknownEmpire(owner));
                }
            }
            if let Some(&missing) = obj
                .contained_object_ids()
                .iter()
                .find(|id| !self.objects.contains(**id))
            {
                return Err(EngineError::ObjectNotFound(missing));
            }
        }
        Ok(())
    }
}
