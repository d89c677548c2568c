//! Empires, diplomacy and the per-empire state conditions query

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::object::Meter;
use crate::core::types::{DesignId, EmpireId, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiplomaticStatus {
    War,
    Peace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
    Building,
    Ship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Industry,
    Research,
    Influence,
}

/// One entry of an empire's production queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionItem {
    pub build_type: BuildType,
    /// Building type name; empty for ships
    pub name: String,
    pub design_id: DesignId,
    pub location: ObjectId,
    pub blocksize: i32,
}

impl ProductionItem {
    pub fn building(name: &str, location: ObjectId) -> Self {
        Self {
            build_type: BuildType::Building,
            name: name.to_string(),
            design_id: DesignId::INVALID,
            location,
            blocksize: 1,
        }
    }

    pub fn ship(design_id: DesignId, location: ObjectId, blocksize: i32) -> Self {
        Self {
            build_type: BuildType::Ship,
            name: String::new(),
            design_id,
            location,
            blocksize,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Empire {
    pub id: EmpireId,
    pub name: String,
    pub capital_id: ObjectId,
    pub techs: BTreeSet<String>,
    pub production_queue: Vec<ProductionItem>,
    /// Disjoint groups of mutually supply-connected systems
    pub resource_supply_groups: Vec<BTreeSet<ObjectId>>,
    pub fleet_supplyable_systems: BTreeSet<ObjectId>,
    pub explored_systems: BTreeSet<ObjectId>,
    pub stockpiles: BTreeMap<ResourceType, f64>,
    /// Empire-wide meters keyed by script name
    pub meters: BTreeMap<String, Meter>,
    pub available_building_types: BTreeSet<String>,
    pub available_designs: BTreeSet<DesignId>,
}

impl Empire {
    pub fn new(id: EmpireId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            capital_id: ObjectId::INVALID,
            techs: BTreeSet::new(),
            production_queue: Vec::new(),
            resource_supply_groups: Vec::new(),
            fleet_supplyable_systems: BTreeSet::new(),
            explored_systems: BTreeSet::new(),
            stockpiles: BTreeMap::new(),
            meters: BTreeMap::new(),
            available_building_types: BTreeSet::new(),
            available_designs: BTreeSet::new(),
        }
    }

    pub fn has_tech(&self, name: &str) -> bool {
        self.techs.contains(name)
    }

    pub fn building_type_available(&self, name: &str) -> bool {
        self.available_building_types.contains(name)
    }

    pub fn ship_design_available(&self, id: DesignId) -> bool {
        self.available_designs.contains(&id)
    }

    pub fn meter(&self, name: &str) -> Option<&Meter> {
        self.meters.get(name)
    }

    pub fn has_explored(&self, system_id: ObjectId) -> bool {
        self.explored_systems.contains(&system_id)
    }

    /// True if some supply group holds both systems
    pub fn supply_connected(&self, a: ObjectId, b: ObjectId) -> bool {
        self.resource_supply_groups
            .iter()
            .any(|group| group.contains(&a) && group.contains(&b))
    }
}

/// Registry of empires and the diplomatic status between them
#[derive(Debug, Clone, Default)]
pub struct EmpireManager {
    empires: BTreeMap<EmpireId, Empire>,
    diplomacy: AHashMap<(EmpireId, EmpireId), DiplomaticStatus>,
}

impl EmpireManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, empire: Empire) {
        self.empires.insert(empire.id, empire);
    }

    pub fn get(&self, id: EmpireId) -> Option<&Empire> {
        self.empires.get(&id)
    }

    pub fn get_mut(&mut self, id: EmpireId) -> Option<&mut Empire> {
        self.empires.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Empire> {
        self.empires.values()
    }

    fn key(a: EmpireId, b: EmpireId) -> (EmpireId, EmpireId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn set_status(&mut self, a: EmpireId, b: EmpireId, status: DiplomaticStatus) {
        self.diplomacy.insert(Self::key(a, b), status);
    }

    /// Status between two empires; pairs never set are at war
    pub fn status(&self, a: EmpireId, b: EmpireId) -> DiplomaticStatus {
        self.diplomacy
            .get(&Self::key(a, b))
            .copied()
            .unwrap_or(DiplomaticStatus::War)
    }

    /// True if the object is the capital of any empire
    pub fn is_capital(&self, id: ObjectId) -> bool {
        id.is_valid() && self.empires.values().any(|e| e.capital_id == id)
    }
}
