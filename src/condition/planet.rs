//! Planet, species and star conditions
//!
//! Buildings answer these through the planet they stand on.

use super::context::ScriptingContext;
use super::describe::{describe, indent, list};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use super::object::{candidates_of_types, name_matches, resolve_names};
use super::ObjectSet;
use crate::universe::{self, ObjectType, Universe, UniverseObject};
use crate::value_ref::{
    all_invariance, descriptions, eval_all, eval_opt, opt_invariance, RefValue, ValueRef,
};

/// Resolve a list of enum parameters; fails when none of them resolve
fn resolve_list<T: RefValue>(values: &[ValueRef<T>], ctx: &ScriptingContext<'_>) -> Option<Vec<T>> {
    let resolved = eval_all(values, ctx);
    if resolved.is_empty() && !values.is_empty() {
        return None;
    }
    Some(resolved)
}

fn species_name_of<'a>(universe: &'a Universe, candidate: &'a UniverseObject) -> Option<&'a str> {
    match candidate.as_building() {
        Some(_) => universe.planet_of(candidate)?.species_name(),
        None => candidate.species_name(),
    }
}

fn planet_data_of<'a>(universe: &'a Universe, candidate: &'a UniverseObject) -> Option<&'a universe::PlanetData> {
    universe.planet_of(candidate)?.as_planet()
}

fn planet_candidates<'a>(ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
    candidates_of_types(ctx, &[ObjectType::Planet, ObjectType::Building])
}

/// Planets (and their buildings) of any of the given types
#[derive(Debug)]
pub struct PlanetType {
    types: Vec<ValueRef<universe::PlanetType>>,
}

impl PlanetType {
    pub fn new(types: Vec<ValueRef<universe::PlanetType>>) -> Self {
        Self { types }
    }

    pub fn of(types: &[universe::PlanetType]) -> Self {
        Self::new(types.iter().map(|t| ValueRef::Constant(*t)).collect())
    }
}

impl SimpleMatch for PlanetType {
    type Params<'a> = Vec<universe::PlanetType>;
    const NAME: &'static str = "PlanetType";

    fn param_invariance(&self) -> Invariants {
        all_invariance(&self.types)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Vec<universe::PlanetType>> {
        resolve_list(&self.types, ctx)
    }

    fn test<'a>(&self, types: &Vec<universe::PlanetType>, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        planet_data_of(ctx.universe, candidate).is_some_and(|p| types.contains(&p.planet_type))
    }
}

simple_condition!(PlanetType {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        planet_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_PLANET_TYPE", negated, &[list(&descriptions(&self.types))])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Planet type = {}\n", indent(level), list(&descriptions(&self.types)))
    }
});

/// Planets (and their buildings) of any of the given sizes
#[derive(Debug)]
pub struct PlanetSize {
    sizes: Vec<ValueRef<universe::PlanetSize>>,
}

impl PlanetSize {
    pub fn new(sizes: Vec<ValueRef<universe::PlanetSize>>) -> Self {
        Self { sizes }
    }

    pub fn of(sizes: &[universe::PlanetSize]) -> Self {
        Self::new(sizes.iter().map(|s| ValueRef::Constant(*s)).collect())
    }
}

impl SimpleMatch for PlanetSize {
    type Params<'a> = Vec<universe::PlanetSize>;
    const NAME: &'static str = "PlanetSize";

    fn param_invariance(&self) -> Invariants {
        all_invariance(&self.sizes)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Vec<universe::PlanetSize>> {
        resolve_list(&self.sizes, ctx)
    }

    fn test<'a>(&self, sizes: &Vec<universe::PlanetSize>, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        planet_data_of(ctx.universe, candidate).is_some_and(|p| sizes.contains(&p.size))
    }
}

simple_condition!(PlanetSize {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        planet_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_PLANET_SIZE", negated, &[list(&descriptions(&self.sizes))])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Planet size = {}\n", indent(level), list(&descriptions(&self.sizes)))
    }
});

/// Planets whose environment for a species is one of the given ones
///
/// Without a species parameter the planet's own species is used. Unknown or
/// missing species see every planet as uninhabitable.
#[derive(Debug)]
pub struct PlanetEnvironment {
    environments: Vec<ValueRef<universe::PlanetEnvironment>>,
    species: Option<ValueRef<String>>,
}

impl PlanetEnvironment {
    pub fn new(
        environments: Vec<ValueRef<universe::PlanetEnvironment>>,
        species: Option<ValueRef<String>>,
    ) -> Self {
        Self {
            environments,
            species,
        }
    }

    pub fn of(environments: &[universe::PlanetEnvironment], species: Option<&str>) -> Self {
        Self::new(
            environments.iter().map(|e| ValueRef::Constant(*e)).collect(),
            species.map(|s| ValueRef::Constant(s.to_string())),
        )
    }
}

impl SimpleMatch for PlanetEnvironment {
    type Params<'a> = (Vec<universe::PlanetEnvironment>, Option<String>);
    const NAME: &'static str = "PlanetEnvironment";

    fn param_invariance(&self) -> Invariants {
        all_invariance(&self.environments) & opt_invariance(&self.species)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Self::Params<'a>> {
        Some((resolve_list(&self.environments, ctx)?, eval_opt(&self.species, ctx)?))
    }

    fn test<'a>(
        &self,
        (environments, species): &Self::Params<'a>,
        candidate: &'a UniverseObject,
        ctx: &ScriptingContext<'a>,
    ) -> bool {
        let Some(planet) = ctx.universe.planet_of(candidate) else {
            return false;
        };
        let Some(data) = planet.as_planet() else {
            return false;
        };
        let species_name = species.as_deref().or_else(|| planet.species_name());
        let environment = species_name
            .and_then(|name| ctx.universe.species.get(name))
            .map_or(universe::PlanetEnvironment::Uninhabitable, |s| {
                s.environment_for(data.planet_type)
            });
        environments.contains(&environment)
    }
}

simple_condition!(PlanetEnvironment {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        planet_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        let species = self
            .species
            .as_ref()
            .map_or_else(|| "its species".to_string(), ValueRef::description);
        describe(
            "DESC_PLANET_ENVIRONMENT",
            negated,
            &[list(&descriptions(&self.environments)), species],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        let mut text = format!(
            "{}Planet environment = {}",
            indent(level),
            list(&descriptions(&self.environments))
        );
        if let Some(species) = &self.species {
            text += &format!(" species = {}", species.description());
        }
        text + "\n"
    }
});

/// Planets, ships and buildings on planets inhabited by one of the species;
/// no names means any species
#[derive(Debug, Default)]
pub struct Species {
    names: Vec<ValueRef<String>>,
}

impl Species {
    pub fn new(names: Vec<ValueRef<String>>) -> Self {
        Self { names }
    }

    pub fn named(names: &[&str]) -> Self {
        Self::new(names.iter().map(|n| ValueRef::Constant(n.to_string())).collect())
    }
}

impl SimpleMatch for Species {
    type Params<'a> = Option<Vec<String>>;
    const NAME: &'static str = "Species";

    fn param_invariance(&self) -> Invariants {
        all_invariance(&self.names)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Option<Vec<String>>> {
        resolve_names(&self.names, ctx)
    }

    fn test<'a>(&self, names: &Option<Vec<String>>, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        species_name_of(ctx.universe, candidate).is_some_and(|species| name_matches(names, species))
    }
}

simple_condition!(Species {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Planet, ObjectType::Ship, ObjectType::Building])
    }

    fn description(&self, negated: bool) -> String {
        if self.names.is_empty() {
            return describe("DESC_SPECIES_ANY", negated, &[]);
        }
        describe("DESC_SPECIES", negated, &[list(&descriptions(&self.names))])
    }

    fn dump_at(&self, level: usize) -> String {
        if self.names.is_empty() {
            return format!("{}Species\n", indent(level));
        }
        format!("{}Species name = {}\n", indent(level), list(&descriptions(&self.names)))
    }
});

/// Planets (and their buildings) with one of the given foci
#[derive(Debug)]
pub struct FocusType {
    names: Vec<ValueRef<String>>,
}

impl FocusType {
    pub fn new(names: Vec<ValueRef<String>>) -> Self {
        Self { names }
    }

    pub fn named(names: &[&str]) -> Self {
        Self::new(names.iter().map(|n| ValueRef::Constant(n.to_string())).collect())
    }
}

impl SimpleMatch for FocusType {
    type Params<'a> = Vec<String>;
    const NAME: &'static str = "FocusType";

    fn param_invariance(&self) -> Invariants {
        all_invariance(&self.names)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Vec<String>> {
        resolve_list(&self.names, ctx)
    }

    fn test<'a>(&self, names: &Vec<String>, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        planet_data_of(ctx.universe, candidate)
            .and_then(|p| p.focus.as_deref())
            .is_some_and(|focus| names.iter().any(|n| n == focus))
    }
}

simple_condition!(FocusType {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        planet_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_FOCUS_TYPE", negated, &[list(&descriptions(&self.names))])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Focus type = {}\n", indent(level), list(&descriptions(&self.names)))
    }
});

/// Objects in a system whose star is one of the given types
#[derive(Debug)]
pub struct StarType {
    types: Vec<ValueRef<universe::StarType>>,
}

impl StarType {
    pub fn new(types: Vec<ValueRef<universe::StarType>>) -> Self {
        Self { types }
    }

    pub fn of(types: &[universe::StarType]) -> Self {
        Self::new(types.iter().map(|t| ValueRef::Constant(*t)).collect())
    }
}

impl SimpleMatch for StarType {
    type Params<'a> = Vec<universe::StarType>;
    const NAME: &'static str = "StarType";

    fn param_invariance(&self) -> Invariants {
        all_invariance(&self.types)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Vec<universe::StarType>> {
        resolve_list(&self.types, ctx)
    }

    fn test<'a>(&self, types: &Vec<universe::StarType>, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        ctx.universe
            .system_of(candidate)
            .and_then(UniverseObject::as_system)
            .is_some_and(|system| types.contains(&system.star))
    }
}

simple_condition!(StarType {
    fn description(&self, negated: bool) -> String {
        describe("DESC_STAR_TYPE", negated, &[list(&descriptions(&self.types))])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Star type = {}\n", indent(level), list(&descriptions(&self.types)))
    }
});

/// Objects whose species can found colonies
#[derive(Debug, Default)]
pub struct CanColonize;

impl SimpleMatch for CanColonize {
    type Params<'a> = ();
    const NAME: &'static str = "CanColonize";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn resolve<'a>(&self, _: &ScriptingContext<'a>) -> Option<()> {
        Some(())
    }

    fn test<'a>(&self, _: &(), candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        ctx.universe.species_of(candidate).is_some_and(|s| s.can_colonize)
    }
}

simple_condition!(CanColonize {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Planet, ObjectType::Ship, ObjectType::Building])
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_CAN_COLONIZE", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}CanColonize\n", indent(level))
    }
});

/// Objects whose species can build ships
#[derive(Debug, Default)]
pub struct CanProduceShips;

impl SimpleMatch for CanProduceShips {
    type Params<'a> = ();
    const NAME: &'static str = "CanProduceShips";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn resolve<'a>(&self, _: &ScriptingContext<'a>) -> Option<()> {
        Some(())
    }

    fn test<'a>(&self, _: &(), candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        ctx.universe.species_of(candidate).is_some_and(|s| s.can_produce_ships)
    }
}

simple_condition!(CanProduceShips {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Planet, ObjectType::Ship, ObjectType::Building])
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_CAN_PRODUCE_SHIPS", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}CanProduceShips\n", indent(level))
    }
});
