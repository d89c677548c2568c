//! Ship designs and the part catalog

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::DesignId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShipPartClass {
    ShortRange,
    Missiles,
    Fighters,
    PointDefense,
    Shield,
    Armour,
    Detector,
    Stealth,
    Fuel,
    Colony,
    Troops,
    Speed,
    General,
}

impl ShipPartClass {
    pub fn is_weapon(&self) -> bool {
        matches!(
            self,
            ShipPartClass::ShortRange
                | ShipPartClass::Missiles
                | ShipPartClass::Fighters
                | ShipPartClass::PointDefense
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartType {
    pub name: String,
    pub class: ShipPartClass,
    pub capacity: f64,
}

impl PartType {
    pub fn new(name: &str, class: ShipPartClass, capacity: f64) -> Self {
        Self {
            name: name.to_string(),
            class,
            capacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDesign {
    pub id: DesignId,
    pub name: String,
    pub hull: String,
    /// Part names by slot; empty strings are unfilled slots
    pub parts: Vec<String>,
    /// Shipped with the content rather than created by a player
    pub premade: bool,
    pub monster: bool,
}

impl ShipDesign {
    pub fn new(id: DesignId, name: &str, hull: &str, parts: &[&str]) -> Self {
        Self {
            id,
            name: name.to_string(),
            hull: hull.to_string(),
            parts: parts.iter().map(|p| p.to_string()).collect(),
            premade: false,
            monster: false,
        }
    }

    pub fn filled_parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(String::as_str).filter(|p| !p.is_empty())
    }
}

/// Designs by id plus the part types they are built from
#[derive(Debug, Clone, Default)]
pub struct DesignRegistry {
    designs: BTreeMap<DesignId, ShipDesign>,
    parts: BTreeMap<String, PartType>,
}

impl DesignRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_design(&mut self, design: ShipDesign) {
        self.designs.insert(design.id, design);
    }

    pub fn insert_part(&mut self, part: PartType) {
        self.parts.insert(part.name.clone(), part);
    }

    pub fn design(&self, id: DesignId) -> Option<&ShipDesign> {
        self.designs.get(&id)
    }

    pub fn premade_design(&self, name: &str) -> Option<&ShipDesign> {
        self.designs.values().find(|d| d.premade && d.name == name)
    }

    pub fn part(&self, name: &str) -> Option<&PartType> {
        self.parts.get(name)
    }

    /// True if the design carries a weapon part with positive capacity
    pub fn is_armed(&self, design: &ShipDesign) -> bool {
        design
            .filled_parts()
            .filter_map(|name| self.part(name))
            .any(|part| part.class.is_weapon() && part.capacity > 0.0)
    }
}
