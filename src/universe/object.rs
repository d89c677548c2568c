//! Universe objects and their per-kind payloads

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{DesignId, EmpireId, ObjectId, Position, Turn};

/// Object type as named by scripts
///
/// `PopCenter` and `ProdCenter` are pseudo-types: no object reports them as
/// its own type, but planets satisfy both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Building,
    Ship,
    Fleet,
    Planet,
    PopCenter,
    ProdCenter,
    System,
    Field,
}

impl ObjectType {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectType::Building => "Building",
            ObjectType::Ship => "Ship",
            ObjectType::Fleet => "Fleet",
            ObjectType::Planet => "Planet",
            ObjectType::PopCenter => "PopulationCenter",
            ObjectType::ProdCenter => "ProductionCenter",
            ObjectType::System => "System",
            ObjectType::Field => "Field",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlanetType {
    Swamp,
    Toxic,
    Inferno,
    Radiated,
    Barren,
    Tundra,
    Desert,
    Terran,
    Ocean,
    Asteroids,
    GasGiant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlanetSize {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Asteroids,
    GasGiant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlanetEnvironment {
    Uninhabitable,
    Hostile,
    Poor,
    Adequate,
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StarType {
    Blue,
    White,
    Yellow,
    Orange,
    Red,
    Neutron,
    BlackHole,
    NoStar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MeterType {
    Population,
    TargetPopulation,
    Industry,
    Research,
    Influence,
    Happiness,
    Construction,
    Supply,
    Stealth,
    Detection,
    Defense,
    Shield,
    Structure,
    MaxStructure,
    Fuel,
    Speed,
    Capacity,
    SecondaryStat,
}

/// Visibility an empire has of an object
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Visibility {
    #[default]
    NoVisibility,
    Basic,
    Partial,
    Full,
}

/// A meter keeps the value it had at the start of the turn next to the value
/// effects may already have changed this turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    pub initial: f64,
    pub current: f64,
}

impl Meter {
    pub fn new(value: f64) -> Self {
        Self {
            initial: value,
            current: value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetData {
    pub planet_type: PlanetType,
    pub size: PlanetSize,
    pub species: Option<String>,
    pub focus: Option<String>,
    pub buildings: BTreeSet<ObjectId>,
}

impl PlanetData {
    pub fn new(planet_type: PlanetType, size: PlanetSize) -> Self {
        Self {
            planet_type,
            size,
            species: None,
            focus: None,
            buildings: BTreeSet::new(),
        }
    }

    pub fn with_species(mut self, species: &str) -> Self {
        self.species = Some(species.to_string());
        self
    }

    pub fn with_focus(mut self, focus: &str) -> Self {
        self.focus = Some(focus.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipData {
    pub fleet_id: ObjectId,
    pub design_id: DesignId,
    pub species: Option<String>,
    pub produced_by: Option<EmpireId>,
    /// Planet this ship has been ordered to bombard
    pub ordered_bombarded: ObjectId,
    /// Meters of individual parts, keyed by part name
    pub part_meters: BTreeMap<(String, MeterType), Meter>,
}

impl ShipData {
    pub fn new(fleet_id: ObjectId, design_id: DesignId) -> Self {
        Self {
            fleet_id,
            design_id,
            species: None,
            produced_by: None,
            ordered_bombarded: ObjectId::INVALID,
            part_meters: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetData {
    pub ships: BTreeSet<ObjectId>,
    pub prev_system: ObjectId,
    pub next_system: ObjectId,
}

impl Default for FleetData {
    fn default() -> Self {
        Self {
            ships: BTreeSet::new(),
            prev_system: ObjectId::INVALID,
            next_system: ObjectId::INVALID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemData {
    pub star: StarType,
    pub contents: BTreeSet<ObjectId>,
    /// Systems joined to this one by a starlane
    pub lanes: BTreeSet<ObjectId>,
}

impl SystemData {
    pub fn new(star: StarType) -> Self {
        Self {
            star,
            contents: BTreeSet::new(),
            lanes: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingData {
    pub building_type: String,
    pub planet_id: ObjectId,
    pub produced_by: Option<EmpireId>,
}

impl BuildingData {
    pub fn new(building_type: &str, planet_id: ObjectId) -> Self {
        Self {
            building_type: building_type.to_string(),
            planet_id,
            produced_by: None,
        }
    }
}

/// Per-kind payload of a universe object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Planet(PlanetData),
    Ship(ShipData),
    Fleet(FleetData),
    System(SystemData),
    Building(BuildingData),
    Field,
}

/// A simulation entity as seen by conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseObject {
    pub id: ObjectId,
    pub name: String,
    pub owner: Option<EmpireId>,
    pub position: Position,
    /// System the object is in, or `ObjectId::INVALID` when in deep space
    pub system_id: ObjectId,
    pub created_on_turn: Turn,
    /// Special name to the turn it was added
    pub specials: BTreeMap<String, Turn>,
    pub tags: BTreeSet<String>,
    pub meters: AHashMap<MeterType, Meter>,
    pub visibility: AHashMap<EmpireId, Visibility>,
    pub kind: ObjectKind,
}

impl UniverseObject {
    pub fn new(id: ObjectId, name: &str, kind: ObjectKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            owner: None,
            position: Position::default(),
            system_id: ObjectId::INVALID,
            created_on_turn: 0,
            specials: BTreeMap::new(),
            tags: BTreeSet::new(),
            meters: AHashMap::new(),
            visibility: AHashMap::new(),
            kind,
        }
    }

    pub fn owned_by(mut self, empire: EmpireId) -> Self {
        self.owner = Some(empire);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn in_system(mut self, system_id: ObjectId) -> Self {
        self.system_id = system_id;
        self
    }

    pub fn created_on(mut self, turn: Turn) -> Self {
        self.created_on_turn = turn;
        self
    }

    pub fn with_special(mut self, name: &str, turn_added: Turn) -> Self {
        self.specials.insert(name.to_string(), turn_added);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self
    }

    pub fn with_meter(mut self, meter_type: MeterType, meter: Meter) -> Self {
        self.meters.insert(meter_type, meter);
        self
    }

    pub fn visible_to(mut self, empire: EmpireId, visibility: Visibility) -> Self {
        self.visibility.insert(empire, visibility);
        self
    }

    /// The concrete type of this object; never a pseudo-type
    pub fn object_type(&self) -> ObjectType {
        match self.kind {
            ObjectKind::Planet(_) => ObjectType::Planet,
            ObjectKind::Ship(_) => ObjectType::Ship,
            ObjectKind::Fleet(_) => ObjectType::Fleet,
            ObjectKind::System(_) => ObjectType::System,
            ObjectKind::Building(_) => ObjectType::Building,
            ObjectKind::Field => ObjectType::Field,
        }
    }

    pub fn is_type(&self, object_type: ObjectType) -> bool {
        match object_type {
            ObjectType::PopCenter | ObjectType::ProdCenter => {
                matches!(self.kind, ObjectKind::Planet(_))
            }
            other => self.object_type() == other,
        }
    }

    pub fn as_planet(&self) -> Option<&PlanetData> {
        match &self.kind {
            ObjectKind::Planet(planet) => Some(planet),
            _ => None,
        }
    }

    pub fn as_ship(&self) -> Option<&ShipData> {
        match &self.kind {
            ObjectKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_fleet(&self) -> Option<&FleetData> {
        match &self.kind {
            ObjectKind::Fleet(fleet) => Some(fleet),
            _ => None,
        }
    }

    pub fn as_system(&self) -> Option<&SystemData> {
        match &self.kind {
            ObjectKind::System(system) => Some(system),
            _ => None,
        }
    }

    pub fn as_building(&self) -> Option<&BuildingData> {
        match &self.kind {
            ObjectKind::Building(building) => Some(building),
            _ => None,
        }
    }

    pub fn is_owned_by(&self, empire: EmpireId) -> bool {
        self.owner == Some(empire)
    }

    /// Immediate container: the fleet of a ship, the planet of a building,
    /// otherwise the system the object is in.
    pub fn container_id(&self) -> ObjectId {
        match &self.kind {
            ObjectKind::Ship(ship) if ship.fleet_id.is_valid() => ship.fleet_id,
            ObjectKind::Building(building) if building.planet_id.is_valid() => building.planet_id,
            ObjectKind::System(_) => ObjectId::INVALID,
            _ => self.system_id,
        }
    }

    /// Ids of the objects directly inside this one
    pub fn contained_object_ids(&self) -> &BTreeSet<ObjectId> {
        static EMPTY: OnceLock<BTreeSet<ObjectId>> = OnceLock::new();
        match &self.kind {
            ObjectKind::Planet(planet) => &planet.buildings,
            ObjectKind::Fleet(fleet) => &fleet.ships,
            ObjectKind::System(system) => &system.contents,
            _ => EMPTY.get_or_init(BTreeSet::new),
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.contained_object_ids().contains(&id)
    }

    pub fn meter(&self, meter_type: MeterType) -> Option<&Meter> {
        self.meters.get(&meter_type)
    }

    pub fn visibility_for(&self, empire: EmpireId) -> Visibility {
        self.visibility.get(&empire).copied().unwrap_or_default()
    }

    /// Species living on a planet or crewing a ship
    pub fn species_name(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::Planet(planet) => planet.species.as_deref(),
            ObjectKind::Ship(ship) => ship.species.as_deref(),
            _ => None,
        }
        .filter(|name| !name.is_empty())
    }

    pub fn produced_by(&self) -> Option<EmpireId> {
        match &self.kind {
            ObjectKind::Ship(ship) => ship.produced_by,
            ObjectKind::Building(building) => building.produced_by,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_types_match_planets_only() {
        let planet = UniverseObject::new(
            ObjectId(1),
            "Terra",
            ObjectKind::Planet(PlanetData::new(PlanetType::Terran, PlanetSize::Medium)),
        );
        let fleet = UniverseObject::new(ObjectId(2), "Fleet", ObjectKind::Fleet(FleetData::default()));

        assert!(planet.is_type(ObjectType::PopCenter));
        assert!(planet.is_type(ObjectType::ProdCenter));
        assert_eq!(planet.object_type(), ObjectType::Planet);
        assert!(!fleet.is_type(ObjectType::PopCenter));
    }

    #[test]
    fn test_container_follows_kind() {
        let ship = UniverseObject::new(
            ObjectId(5),
            "Scout",
            ObjectKind::Ship(ShipData::new(ObjectId(4), DesignId(0))),
        )
        .in_system(ObjectId(1));
        assert_eq!(ship.container_id(), ObjectId(4));

        let planet = UniverseObject::new(
            ObjectId(2),
            "Terra",
            ObjectKind::Planet(PlanetData::new(PlanetType::Terran, PlanetSize::Medium)),
        )
        .in_system(ObjectId(1));
        assert_eq!(planet.container_id(), ObjectId(1));
    }

    #[test]
    fn test_contained_ids_empty_for_leaf_objects() {
        let field = UniverseObject::new(ObjectId(9), "Nebula", ObjectKind::Field);
        assert!(field.contained_object_ids().is_empty());
        assert!(!field.contains(ObjectId(1)));
    }

    #[test]
    fn test_missing_visibility_defaults_to_none() {
        let field = UniverseObject::new(ObjectId(9), "Nebula", ObjectKind::Field)
            .visible_to(EmpireId(1), Visibility::Partial);
        assert_eq!(field.visibility_for(EmpireId(1)), Visibility::Partial);
        assert_eq!(field.visibility_for(EmpireId(2)), Visibility::NoVisibility);
    }

    #[test]
    fn test_empty_species_name_is_none() {
        let planet = UniverseObject::new(
            ObjectId(1),
            "Terra",
            ObjectKind::Planet(PlanetData::new(PlanetType::Terran, PlanetSize::Medium).with_species("")),
        );
        assert_eq!(planet.species_name(), None);
    }
}
