//! Object properties readable by value references

use serde::{Deserialize, Serialize};

use crate::core::types::{DesignId, EmpireId, ObjectId};
use crate::universe::{
    MeterType, ObjectKind, ObjectType, PlanetSize, PlanetType, StarType, Universe, UniverseObject,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    Id,
    Owner,
    SystemId,
    ContainerId,
    CreationTurn,
    Age,
    X,
    Y,
    Name,
    Species,
    Focus,
    PlanetType,
    PlanetSize,
    ObjectType,
    StarType,
    DesignId,
    FleetId,
    PlanetId,
    ProducedByEmpire,
    BuildingType,
    /// Current value of a meter
    Meter(MeterType),
    /// Value of a meter at the start of the turn
    InitialMeter(MeterType),
}

impl Property {
    pub fn name(&self) -> String {
        match self {
            Property::Id => "ID".into(),
            Property::Owner => "Owner".into(),
            Property::SystemId => "SystemID".into(),
            Property::ContainerId => "ContainerID".into(),
            Property::CreationTurn => "CreationTurn".into(),
            Property::Age => "Age".into(),
            Property::X => "X".into(),
            Property::Y => "Y".into(),
            Property::Name => "Name".into(),
            Property::Species => "Species".into(),
            Property::Focus => "Focus".into(),
            Property::PlanetType => "PlanetType".into(),
            Property::PlanetSize => "PlanetSize".into(),
            Property::ObjectType => "ObjectType".into(),
            Property::StarType => "StarType".into(),
            Property::DesignId => "DesignID".into(),
            Property::FleetId => "FleetID".into(),
            Property::PlanetId => "PlanetID".into(),
            Property::ProducedByEmpire => "ProducedByEmpireID".into(),
            Property::BuildingType => "BuildingType".into(),
            Property::Meter(meter) => format!("{meter:?}"),
            Property::InitialMeter(meter) => format!("Initial{meter:?}"),
        }
    }
}

/// A property value before conversion to the type a reference expects
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i32),
    Real(f64),
    Text(String),
    Object(ObjectId),
    Empire(EmpireId),
    Design(DesignId),
    ObjectType(ObjectType),
    PlanetType(PlanetType),
    PlanetSize(PlanetSize),
    StarType(StarType),
}

/// Read a property; `None` when it does not apply to this object
pub fn read(obj: &UniverseObject, property: Property, universe: &Universe) -> Option<PropertyValue> {
    let value = match property {
        Property::Id => PropertyValue::Object(obj.id),
        Property::Owner => PropertyValue::Empire(obj.owner?),
        Property::SystemId => PropertyValue::Object(universe.system_id_of(obj)),
        Property::ContainerId => PropertyValue::Object(obj.container_id()),
        Property::CreationTurn => PropertyValue::Int(obj.created_on_turn),
        Property::Age => PropertyValue::Int(universe.current_turn() - obj.created_on_turn),
        Property::X => PropertyValue::Real(obj.position.x),
        Property::Y => PropertyValue::Real(obj.position.y),
        Property::Name => PropertyValue::Text(obj.name.clone()),
        Property::Species => match &obj.kind {
            ObjectKind::Building(_) => {
                PropertyValue::Text(universe.planet_of(obj)?.species_name()?.to_string())
            }
            _ => PropertyValue::Text(obj.species_name()?.to_string()),
        },
        Property::Focus => {
            PropertyValue::Text(universe.planet_of(obj)?.as_planet()?.focus.clone()?)
        }
        Property::PlanetType => {
            PropertyValue::PlanetType(universe.planet_of(obj)?.as_planet()?.planet_type)
        }
        Property::PlanetSize => PropertyValue::PlanetSize(universe.planet_of(obj)?.as_planet()?.size),
        Property::ObjectType => PropertyValue::ObjectType(obj.object_type()),
        Property::StarType => PropertyValue::StarType(universe.system_of(obj)?.as_system()?.star),
        Property::DesignId => PropertyValue::Design(obj.as_ship()?.design_id),
        Property::FleetId => PropertyValue::Object(universe.fleet_of(obj)?.id),
        Property::PlanetId => PropertyValue::Object(universe.planet_of(obj)?.id),
        Property::ProducedByEmpire => PropertyValue::Empire(obj.produced_by()?),
        Property::BuildingType => PropertyValue::Text(obj.as_building()?.building_type.clone()),
        Property::Meter(meter) => PropertyValue::Real(obj.meter(meter)?.current),
        Property::InitialMeter(meter) => PropertyValue::Real(obj.meter(meter)?.initial),
    };
    Some(value)
}
