//! Species catalog

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::object::{PlanetEnvironment, PlanetType};
use crate::core::types::ObjectId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub homeworlds: BTreeSet<ObjectId>,
    pub environments: BTreeMap<PlanetType, PlanetEnvironment>,
    pub can_colonize: bool,
    pub can_produce_ships: bool,
}

impl Species {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            homeworlds: BTreeSet::new(),
            environments: BTreeMap::new(),
            can_colonize: true,
            can_produce_ships: true,
        }
    }

    /// Environment on a planet type; unlisted types are uninhabitable
    pub fn environment_for(&self, planet_type: PlanetType) -> PlanetEnvironment {
        self.environments
            .get(&planet_type)
            .copied()
            .unwrap_or(PlanetEnvironment::Uninhabitable)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesManager {
    species: BTreeMap<String, Species>,
}

impl SpeciesManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, species: Species) {
        self.species.insert(species.name.clone(), species);
    }

    pub fn get(&self, name: &str) -> Option<&Species> {
        self.species.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.values()
    }

    /// True if the planet is the homeworld of any species
    pub fn is_any_homeworld(&self, planet_id: ObjectId) -> bool {
        self.species.values().any(|s| s.homeworlds.contains(&planet_id))
    }
}
