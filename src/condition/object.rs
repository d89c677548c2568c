//! Conditions on object identity, type, and intrinsic properties

use super::context::ScriptingContext;
use super::describe::{describe, indent, list};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use super::{Condition, ObjectSet};
use crate::core::config::config;
use crate::core::types::ObjectId;
use crate::universe::{ObjectType, UniverseObject};
use crate::value_ref::{
    all_invariance, descriptions, eval_all, eval_opt, opt_description, opt_invariance, ValueRef,
};

/// Objects of any of the given types
pub(crate) fn candidates_of_types<'a>(
    ctx: &ScriptingContext<'a>,
    types: &[ObjectType],
) -> ObjectSet<'a> {
    ctx.universe
        .objects()
        .iter()
        .filter(|obj| types.iter().any(|t| obj.is_type(*t)))
        .collect()
}

/// Resolve a name list; an empty list means "any" and resolves to `None`
pub(crate) fn resolve_names(
    names: &[ValueRef<String>],
    ctx: &ScriptingContext<'_>,
) -> Option<Option<Vec<String>>> {
    if names.is_empty() {
        return Some(None);
    }
    let resolved = eval_all(names, ctx);
    if resolved.is_empty() {
        return None;
    }
    Some(Some(resolved))
}

pub(crate) fn name_matches(names: &Option<Vec<String>>, name: &str) -> bool {
    names.as_ref().map_or(true, |names| names.iter().any(|n| n == name))
}

/// Whether a single value parameter may be resolved once for a whole pass
pub(crate) fn resolvable_once<T: crate::value_ref::RefValue>(
    value: &ValueRef<T>,
    ctx: &ScriptingContext<'_>,
) -> bool {
    let inv = value.invariance();
    inv.local_candidate && (ctx.root_candidate.is_some() || inv.root_candidate)
}

/// The source object of the context
#[derive(Debug, Default)]
pub struct Source;

impl SimpleMatch for Source {
    type Params<'a> = &'a UniverseObject;
    const NAME: &'static str = "Source";

    fn param_invariance(&self) -> Invariants {
        Invariants {
            source: false,
            ..Invariants::ALL
        }
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<&'a UniverseObject> {
        ctx.source
    }

    fn test<'a>(&self, source: &&'a UniverseObject, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate.id == source.id
    }
}

simple_condition!(Source {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        ctx.source.into_iter().collect()
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_SOURCE", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Source\n", indent(level))
    }
});

/// The outermost candidate of the current nested evaluation
#[derive(Debug, Default)]
pub struct RootCandidate;

impl SimpleMatch for RootCandidate {
    type Params<'a> = &'a UniverseObject;
    const NAME: &'static str = "RootCandidate";

    fn param_invariance(&self) -> Invariants {
        Invariants {
            root_candidate: false,
            ..Invariants::ALL
        }
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<&'a UniverseObject> {
        ctx.root_candidate
    }

    fn test<'a>(&self, root: &&'a UniverseObject, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate.id == root.id
    }
}

simple_condition!(RootCandidate {
    fn description(&self, negated: bool) -> String {
        describe("DESC_ROOT_CANDIDATE", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}RootCandidate\n", indent(level))
    }
});

/// The effect target of the context
#[derive(Debug, Default)]
pub struct Target;

impl SimpleMatch for Target {
    type Params<'a> = &'a UniverseObject;
    const NAME: &'static str = "Target";

    fn param_invariance(&self) -> Invariants {
        Invariants {
            target: false,
            ..Invariants::ALL
        }
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<&'a UniverseObject> {
        ctx.effect_target
    }

    fn test<'a>(&self, target: &&'a UniverseObject, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate.id == target.id
    }
}

simple_condition!(Target {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        ctx.effect_target.into_iter().collect()
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_TARGET", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Target\n", indent(level))
    }
});

/// The object with a given id
#[derive(Debug)]
pub struct ObjectIdIs {
    id: ValueRef<ObjectId>,
}

impl ObjectIdIs {
    pub fn new(id: ValueRef<ObjectId>) -> Self {
        Self { id }
    }
}

impl From<i32> for ObjectIdIs {
    fn from(id: i32) -> Self {
        Self::new(ValueRef::Constant(ObjectId(id)))
    }
}

impl SimpleMatch for ObjectIdIs {
    type Params<'a> = ObjectId;
    const NAME: &'static str = "ObjectID";

    fn param_invariance(&self) -> Invariants {
        self.id.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<ObjectId> {
        self.id.eval(ctx)
    }

    fn test<'a>(&self, id: &ObjectId, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        id.is_valid() && candidate.id == *id
    }
}

simple_condition!(ObjectIdIs {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        if !resolvable_once(&self.id, ctx) {
            return ctx.universe.objects().iter().collect();
        }
        self.id
            .eval(&ctx.without_candidate())
            .and_then(|id| ctx.object(id))
            .into_iter()
            .collect()
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_OBJECT_ID", negated, &[self.id.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Object id = {}\n", indent(level), self.id.description())
    }
});

/// Objects of a type; the pseudo-types match planets
#[derive(Debug)]
pub struct Type {
    object_type: ValueRef<ObjectType>,
}

impl Type {
    pub fn new(object_type: ValueRef<ObjectType>) -> Self {
        Self { object_type }
    }
}

impl From<ObjectType> for Type {
    fn from(object_type: ObjectType) -> Self {
        Self::new(ValueRef::Constant(object_type))
    }
}

impl SimpleMatch for Type {
    type Params<'a> = ObjectType;
    const NAME: &'static str = "Type";

    fn param_invariance(&self) -> Invariants {
        self.object_type.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<ObjectType> {
        self.object_type.eval(ctx)
    }

    fn test<'a>(&self, object_type: &ObjectType, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate.is_type(*object_type)
    }
}

simple_condition!(Type {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        if !resolvable_once(&self.object_type, ctx) {
            return ctx.universe.objects().iter().collect();
        }
        match self.object_type.eval(&ctx.without_candidate()) {
            Some(object_type) => candidates_of_types(ctx, &[object_type]),
            None => Vec::new(),
        }
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_TYPE", negated, &[self.object_type.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        let name = match &self.object_type {
            ValueRef::Constant(t) => t.name().to_string(),
            other => format!("ObjectType type = {}", other.description()),
        };
        format!("{}{}\n", indent(level), name)
    }
});

/// Buildings of the given types; no names means any building
#[derive(Debug, Default)]
pub struct Building {
    names: Vec<ValueRef<String>>,
}

impl Building {
    pub fn new(names: Vec<ValueRef<String>>) -> Self {
        Self { names }
    }

    pub fn named(names: &[&str]) -> Self {
        Self::new(names.iter().map(|n| ValueRef::Constant(n.to_string())).collect())
    }
}

impl SimpleMatch for Building {
    type Params<'a> = Option<Vec<String>>;
    const NAME: &'static str = "Building";

    fn param_invariance(&self) -> Invariants {
        all_invariance(&self.names)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Option<Vec<String>>> {
        resolve_names(&self.names, ctx)
    }

    fn test<'a>(&self, names: &Option<Vec<String>>, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate
            .as_building()
            .is_some_and(|b| name_matches(names, &b.building_type))
    }
}

simple_condition!(Building {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Building])
    }

    fn description(&self, negated: bool) -> String {
        if self.names.is_empty() {
            return describe("DESC_BUILDING_ANY", negated, &[]);
        }
        describe("DESC_BUILDING", negated, &[list(&descriptions(&self.names))])
    }

    fn dump_at(&self, level: usize) -> String {
        if self.names.is_empty() {
            return format!("{}Building\n", indent(level));
        }
        format!("{}Building name = {}\n", indent(level), list(&descriptions(&self.names)))
    }
});

/// Objects carrying a special, optionally added within a turn range
#[derive(Debug, Default)]
pub struct HasSpecial {
    name: Option<ValueRef<String>>,
    since_low: Option<ValueRef<i32>>,
    since_high: Option<ValueRef<i32>>,
}

impl HasSpecial {
    pub fn new(name: Option<ValueRef<String>>) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(Some(ValueRef::Constant(name.to_string())))
    }

    /// Restrict to specials added between two turns
    pub fn added_between(mut self, low: Option<ValueRef<i32>>, high: Option<ValueRef<i32>>) -> Self {
        self.since_low = low;
        self.since_high = high;
        self
    }

    fn has_turn_range(&self) -> bool {
        self.since_low.is_some() || self.since_high.is_some()
    }
}

impl SimpleMatch for HasSpecial {
    type Params<'a> = (Option<String>, i32, i32);
    const NAME: &'static str = "HasSpecial";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.name) & opt_invariance(&self.since_low) & opt_invariance(&self.since_high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(Option<String>, i32, i32)> {
        let cfg = config();
        Some((
            eval_opt(&self.name, ctx)?,
            cfg.turn_low(eval_opt(&self.since_low, ctx)?),
            cfg.turn_high(eval_opt(&self.since_high, ctx)?),
        ))
    }

    fn test<'a>(
        &self,
        (name, low, high): &(Option<String>, i32, i32),
        candidate: &'a UniverseObject,
        _: &ScriptingContext<'a>,
    ) -> bool {
        match name.as_deref() {
            None | Some("") => !candidate.specials.is_empty(),
            Some(name) => candidate
                .specials
                .get(name)
                .is_some_and(|added| low <= added && added <= high),
        }
    }
}

simple_condition!(HasSpecial {
    fn description(&self, negated: bool) -> String {
        let Some(name) = &self.name else {
            return describe("DESC_HAS_SPECIAL_ANY", negated, &[]);
        };
        if !self.has_turn_range() {
            return describe("DESC_HAS_SPECIAL", negated, &[name.description()]);
        }
        let cfg = config();
        describe(
            "DESC_HAS_SPECIAL_TURNS",
            negated,
            &[
                name.description(),
                opt_description(&self.since_low, &cfg.before_first_turn.to_string()),
                opt_description(&self.since_high, &cfg.impossibly_large_turn.to_string()),
            ],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        let mut text = format!("{}HasSpecial", indent(level));
        if let Some(name) = &self.name {
            text += &format!(" name = \"{}\"", name.description());
        }
        if let Some(low) = &self.since_low {
            text += &format!(" low = {}", low.description());
        }
        if let Some(high) = &self.since_high {
            text += &format!(" high = {}", high.description());
        }
        text + "\n"
    }
});

/// Objects carrying a tag
#[derive(Debug)]
pub struct HasTag {
    name: ValueRef<String>,
}

impl HasTag {
    pub fn new(name: ValueRef<String>) -> Self {
        Self { name }
    }

    pub fn named(name: &str) -> Self {
        Self::new(ValueRef::Constant(name.to_string()))
    }
}

impl SimpleMatch for HasTag {
    type Params<'a> = String;
    const NAME: &'static str = "HasTag";

    fn param_invariance(&self) -> Invariants {
        self.name.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<String> {
        self.name.eval(ctx)
    }

    fn test<'a>(&self, name: &String, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate.tags.contains(name)
    }
}

simple_condition!(HasTag {
    fn description(&self, negated: bool) -> String {
        describe("DESC_HAS_TAG", negated, &[self.name.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}HasTag name = \"{}\"\n", indent(level), self.name.description())
    }
});

/// Planets that are the capital of some empire
#[derive(Debug, Default)]
pub struct Capital;

impl SimpleMatch for Capital {
    type Params<'a> = ();
    const NAME: &'static str = "Capital";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn resolve<'a>(&self, _: &ScriptingContext<'a>) -> Option<()> {
        Some(())
    }

    fn test<'a>(&self, _: &(), candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        ctx.universe.empires.is_capital(candidate.id)
    }
}

simple_condition!(Capital {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Planet])
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_CAPITAL", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Capital\n", indent(level))
    }
});

/// Ships of a monster design
#[derive(Debug, Default)]
pub struct Monster;

impl SimpleMatch for Monster {
    type Params<'a> = ();
    const NAME: &'static str = "Monster";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn resolve<'a>(&self, _: &ScriptingContext<'a>) -> Option<()> {
        Some(())
    }

    fn test<'a>(&self, _: &(), candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        ctx.universe
            .design_of(candidate)
            .is_some_and(|design| design.monster)
    }
}

simple_condition!(Monster {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Ship])
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_MONSTER", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Monster\n", indent(level))
    }
});

/// Ships whose design carries a working weapon
#[derive(Debug, Default)]
pub struct Armed;

impl SimpleMatch for Armed {
    type Params<'a> = ();
    const NAME: &'static str = "Armed";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn resolve<'a>(&self, _: &ScriptingContext<'a>) -> Option<()> {
        Some(())
    }

    fn test<'a>(&self, _: &(), candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        let designs = &ctx.universe.designs;
        ctx.universe
            .design_of(candidate)
            .is_some_and(|design| designs.is_armed(design))
    }
}

simple_condition!(Armed {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Ship])
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_ARMED", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Armed\n", indent(level))
    }
});

/// Objects not about to leave their system
///
/// Only fleets (and ships, through their fleet) move; everything else is
/// stationary.
#[derive(Debug, Default)]
pub struct Stationary;

impl SimpleMatch for Stationary {
    type Params<'a> = ();
    const NAME: &'static str = "Stationary";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn resolve<'a>(&self, _: &ScriptingContext<'a>) -> Option<()> {
        Some(())
    }

    fn test<'a>(&self, _: &(), candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        let Some(fleet_obj) = ctx.universe.fleet_of(candidate) else {
            return true;
        };
        let Some(fleet) = fleet_obj.as_fleet() else {
            return true;
        };
        !(fleet.next_system.is_valid() && fleet.next_system != fleet_obj.system_id)
    }
}

simple_condition!(Stationary {
    fn description(&self, negated: bool) -> String {
        describe("DESC_STATIONARY", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Stationary\n", indent(level))
    }
});

/// Planets (or buildings on planets) that are a species homeworld
///
/// With no names any species counts; unknown species never match.
#[derive(Debug, Default)]
pub struct Homeworld {
    names: Vec<ValueRef<String>>,
}

impl Homeworld {
    pub fn new(names: Vec<ValueRef<String>>) -> Self {
        Self { names }
    }

    pub fn of(species: &[&str]) -> Self {
        Self::new(species.iter().map(|n| ValueRef::Constant(n.to_string())).collect())
    }
}

impl SimpleMatch for Homeworld {
    type Params<'a> = Option<Vec<String>>;
    const NAME: &'static str = "Homeworld";

    fn param_invariance(&self) -> Invariants {
        all_invariance(&self.names)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Option<Vec<String>>> {
        resolve_names(&self.names, ctx)
    }

    fn test<'a>(&self, names: &Option<Vec<String>>, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        let Some(planet) = ctx.universe.planet_of(candidate) else {
            return false;
        };
        let species = &ctx.universe.species;
        match names {
            None => species.is_any_homeworld(planet.id),
            Some(names) => names.iter().any(|name| {
                species
                    .get(name)
                    .is_some_and(|s| s.homeworlds.contains(&planet.id))
            }),
        }
    }
}

simple_condition!(Homeworld {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Planet, ObjectType::Building])
    }

    fn description(&self, negated: bool) -> String {
        if self.names.is_empty() {
            return describe("DESC_HOMEWORLD_ANY", negated, &[]);
        }
        describe("DESC_HOMEWORLD", negated, &[list(&descriptions(&self.names))])
    }

    fn dump_at(&self, level: usize) -> String {
        if self.names.is_empty() {
            return format!("{}HomeWorld\n", indent(level));
        }
        format!("{}HomeWorld name = {}\n", indent(level), list(&descriptions(&self.names)))
    }
});

/// Planets some matching ship has been ordered to bombard
#[derive(Debug)]
pub struct OrderedBombarded {
    by: Box<dyn Condition>,
}

impl OrderedBombarded {
    pub fn new(by: Box<dyn Condition>) -> Self {
        Self { by }
    }
}

impl SimpleMatch for OrderedBombarded {
    type Params<'a> = ObjectSet<'a>;
    const NAME: &'static str = "OrderedBombarded";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn subcondition_invariance(&self) -> Invariants {
        self.by.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<ObjectSet<'a>> {
        Some(self.by.eval_all(ctx))
    }

    fn test<'a>(&self, bombarders: &ObjectSet<'a>, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate.as_planet().is_some()
            && bombarders
                .iter()
                .filter_map(|obj| obj.as_ship())
                .any(|ship| ship.ordered_bombarded == candidate.id)
    }
}

simple_condition!(OrderedBombarded {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Planet])
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_ORDERED_BOMBARDED", negated, &[self.by.description(false)])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}OrderedBombardedBy condition =\n{}", indent(level), self.by.dump_at(level + 1))
    }
});
