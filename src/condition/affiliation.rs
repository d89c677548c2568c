//! Conditions relating objects to empires

use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use super::object::candidates_of_types;
use super::ObjectSet;
use crate::core::types::{DesignId, EmpireId};
use crate::universe::{DiplomaticStatus, Empire, ObjectType, UniverseObject, Visibility};
use crate::value_ref::{eval_opt, opt_invariance, ValueRef};

pub(crate) fn resolve_empire<'a>(
    empire: &ValueRef<EmpireId>,
    ctx: &ScriptingContext<'a>,
    condition: &'static str,
) -> Option<&'a Empire> {
    let id = empire.eval(ctx)?;
    let found = ctx.universe.empires.get(id);
    if found.is_none() {
        tracing::debug!(condition, empire = %id, "Unknown empire");
    }
    found
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affiliation {
    /// Owned by the empire itself
    TheEmpire,
    /// Owned by an empire at war with it
    EnemyOf,
    /// Owned by an empire at peace with it
    AllyOf,
    /// Owned by any empire
    AnyEmpire,
}

impl Affiliation {
    pub fn name(&self) -> &'static str {
        match self {
            Affiliation::TheEmpire => "TheEmpire",
            Affiliation::EnemyOf => "EnemyOf",
            Affiliation::AllyOf => "AllyOf",
            Affiliation::AnyEmpire => "AnyEmpire",
        }
    }
}

/// Owned objects related to an empire by diplomacy
///
/// Without an empire (or with `EmpireId::ALL`) enemies match every owned
/// object and allies match none. An empire id with no registered empire
/// matches nothing, as do unowned objects.
#[derive(Debug)]
pub struct EmpireAffiliation {
    empire: Option<ValueRef<EmpireId>>,
    affiliation: Affiliation,
}

impl EmpireAffiliation {
    pub fn new(affiliation: Affiliation, empire: Option<ValueRef<EmpireId>>) -> Self {
        Self {
            empire,
            affiliation,
        }
    }

    pub fn owned_by(empire: i32) -> Self {
        Self::new(Affiliation::TheEmpire, Some(ValueRef::Constant(EmpireId(empire))))
    }
}

impl SimpleMatch for EmpireAffiliation {
    type Params<'a> = Option<EmpireId>;
    const NAME: &'static str = "EmpireAffiliation";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.empire)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Option<EmpireId>> {
        let empire = eval_opt(&self.empire, ctx)?.filter(|e| *e != EmpireId::ALL);
        if let Some(id) = empire {
            if ctx.universe.empires.get(id).is_none() {
                tracing::debug!(condition = Self::NAME, empire = %id, "Unknown empire");
                return None;
            }
        }
        Some(empire)
    }

    fn test<'a>(&self, empire: &Option<EmpireId>, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        let Some(owner) = candidate.owner else {
            return false;
        };
        let status = |empire: EmpireId| ctx.universe.empires.status(empire, owner);
        match (self.affiliation, *empire) {
            (Affiliation::AnyEmpire, _) => true,
            (Affiliation::TheEmpire, empire) => empire == Some(owner),
            (Affiliation::EnemyOf, None) => true,
            (Affiliation::AllyOf, None) => false,
            (_, Some(empire)) if empire == owner => false,
            (Affiliation::EnemyOf, Some(empire)) => status(empire) == DiplomaticStatus::War,
            (Affiliation::AllyOf, Some(empire)) => status(empire) == DiplomaticStatus::Peace,
        }
    }
}

simple_condition!(EmpireAffiliation {
    fn description(&self, negated: bool) -> String {
        let empire = self
            .empire
            .as_ref()
            .map_or_else(|| "any empire".to_string(), ValueRef::description);
        let key = match self.affiliation {
            Affiliation::TheEmpire => "DESC_OWNED_BY",
            Affiliation::EnemyOf => "DESC_OWNED_BY_ENEMY",
            Affiliation::AllyOf => "DESC_OWNED_BY_ALLY",
            Affiliation::AnyEmpire => "DESC_OWNED_BY_ANY",
        };
        describe(key, negated, &[empire])
    }

    fn dump_at(&self, level: usize) -> String {
        let mut text = format!("{}OwnedBy affiliation = {}", indent(level), self.affiliation.name());
        if let Some(empire) = &self.empire {
            text += &format!(" empire = {}", empire.description());
        }
        text + "\n"
    }
});

/// Objects an empire has any visibility of
#[derive(Debug)]
pub struct VisibleToEmpire {
    empire: ValueRef<EmpireId>,
}

impl VisibleToEmpire {
    pub fn new(empire: ValueRef<EmpireId>) -> Self {
        Self { empire }
    }
}

impl SimpleMatch for VisibleToEmpire {
    type Params<'a> = EmpireId;
    const NAME: &'static str = "VisibleToEmpire";

    fn param_invariance(&self) -> Invariants {
        self.empire.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<EmpireId> {
        self.empire.eval(ctx)
    }

    fn test<'a>(&self, empire: &EmpireId, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate.visibility_for(*empire) > Visibility::NoVisibility
    }
}

simple_condition!(VisibleToEmpire {
    fn description(&self, negated: bool) -> String {
        describe("DESC_VISIBLE_TO_EMPIRE", negated, &[self.empire.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}VisibleToEmpire empire = {}\n", indent(level), self.empire.description())
    }
});

/// Ships and buildings produced by an empire
#[derive(Debug)]
pub struct ProducedByEmpire {
    empire: ValueRef<EmpireId>,
}

impl ProducedByEmpire {
    pub fn new(empire: ValueRef<EmpireId>) -> Self {
        Self { empire }
    }
}

impl SimpleMatch for ProducedByEmpire {
    type Params<'a> = EmpireId;
    const NAME: &'static str = "ProducedByEmpire";

    fn param_invariance(&self) -> Invariants {
        self.empire.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<EmpireId> {
        self.empire.eval(ctx)
    }

    fn test<'a>(&self, empire: &EmpireId, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate.produced_by() == Some(*empire)
    }
}

simple_condition!(ProducedByEmpire {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Ship, ObjectType::Building])
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_PRODUCED_BY_EMPIRE", negated, &[self.empire.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}ProducedByEmpire empire = {}\n", indent(level), self.empire.description())
    }
});

/// Systems an empire has explored
#[derive(Debug)]
pub struct ExploredByEmpire {
    empire: ValueRef<EmpireId>,
}

impl ExploredByEmpire {
    pub fn new(empire: ValueRef<EmpireId>) -> Self {
        Self { empire }
    }
}

impl SimpleMatch for ExploredByEmpire {
    type Params<'a> = &'a Empire;
    const NAME: &'static str = "ExploredByEmpire";

    fn param_invariance(&self) -> Invariants {
        self.empire.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<&'a Empire> {
        resolve_empire(&self.empire, ctx, Self::NAME)
    }

    fn test<'a>(&self, empire: &&'a Empire, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        empire.has_explored(candidate.id)
    }
}

simple_condition!(ExploredByEmpire {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::System])
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_EXPLORED_BY_EMPIRE", negated, &[self.empire.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}ExploredByEmpire empire = {}\n", indent(level), self.empire.description())
    }
});

/// Objects whose owner has researched a tech
#[derive(Debug)]
pub struct OwnerHasTech {
    name: ValueRef<String>,
}

impl OwnerHasTech {
    pub fn new(name: ValueRef<String>) -> Self {
        Self { name }
    }

    pub fn named(name: &str) -> Self {
        Self::new(ValueRef::Constant(name.to_string()))
    }
}

impl SimpleMatch for OwnerHasTech {
    type Params<'a> = String;
    const NAME: &'static str = "OwnerHasTech";

    fn param_invariance(&self) -> Invariants {
        self.name.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<String> {
        self.name.eval(ctx)
    }

    fn test<'a>(&self, tech: &String, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        candidate
            .owner
            .and_then(|owner| ctx.universe.empires.get(owner))
            .is_some_and(|empire| empire.has_tech(tech))
    }
}

simple_condition!(OwnerHasTech {
    fn description(&self, negated: bool) -> String {
        describe("DESC_OWNER_HAS_TECH", negated, &[self.name.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}OwnerHasTech name = \"{}\"\n", indent(level), self.name.description())
    }
});

/// Objects whose owner can currently produce a building type
#[derive(Debug)]
pub struct OwnerHasBuildingTypeAvailable {
    name: ValueRef<String>,
}

impl OwnerHasBuildingTypeAvailable {
    pub fn new(name: ValueRef<String>) -> Self {
        Self { name }
    }

    pub fn named(name: &str) -> Self {
        Self::new(ValueRef::Constant(name.to_string()))
    }
}

impl SimpleMatch for OwnerHasBuildingTypeAvailable {
    type Params<'a> = String;
    const NAME: &'static str = "OwnerHasBuildingTypeAvailable";

    fn param_invariance(&self) -> Invariants {
        self.name.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<String> {
        self.name.eval(ctx)
    }

    fn test<'a>(&self, name: &String, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        candidate
            .owner
            .and_then(|owner| ctx.universe.empires.get(owner))
            .is_some_and(|empire| empire.building_type_available(name))
    }
}

simple_condition!(OwnerHasBuildingTypeAvailable {
    fn description(&self, negated: bool) -> String {
        describe("DESC_OWNER_HAS_BUILDING_TYPE", negated, &[self.name.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}OwnerHasBuildingTypeAvailable name = \"{}\"\n",
            indent(level),
            self.name.description()
        )
    }
});

/// Objects whose owner can currently produce a ship design
#[derive(Debug)]
pub struct OwnerHasShipDesignAvailable {
    design_id: ValueRef<DesignId>,
}

impl OwnerHasShipDesignAvailable {
    pub fn new(design_id: ValueRef<DesignId>) -> Self {
        Self { design_id }
    }
}

impl From<i32> for OwnerHasShipDesignAvailable {
    fn from(id: i32) -> Self {
        Self::new(DesignId(id).into())
    }
}

impl SimpleMatch for OwnerHasShipDesignAvailable {
    type Params<'a> = DesignId;
    const NAME: &'static str = "OwnerHasShipDesignAvailable";

    fn param_invariance(&self) -> Invariants {
        self.design_id.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<DesignId> {
        self.design_id.eval(ctx)
    }

    fn test<'a>(&self, id: &DesignId, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        candidate
            .owner
            .and_then(|owner| ctx.universe.empires.get(owner))
            .is_some_and(|empire| empire.ship_design_available(*id))
    }
}

simple_condition!(OwnerHasShipDesignAvailable {
    fn description(&self, negated: bool) -> String {
        describe("DESC_OWNER_HAS_SHIP_DESIGN", negated, &[self.design_id.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}OwnerHasShipDesignAvailable id = {}\n",
            indent(level),
            self.design_id.description()
        )
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::testing::{fixture, matching_ids, object, rng};
    use crate::condition::Condition;
    use crate::value_ref::{Property, ReferenceType};

    fn affiliation(affiliation: Affiliation, empire: Option<i32>) -> EmpireAffiliation {
        EmpireAffiliation::new(affiliation, empire.map(|e| ValueRef::Constant(EmpireId(e))))
    }

    #[test]
    fn test_owned_by() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(matching_ids(&EmpireAffiliation::owned_by(1), &ctx), vec![11, 13, 40, 41, 42]);
        assert!(matching_ids(&affiliation(Affiliation::TheEmpire, None), &ctx).is_empty());
    }

    #[test]
    fn test_enemy_and_ally_follow_diplomacy() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(matching_ids(&affiliation(Affiliation::EnemyOf, Some(1)), &ctx), vec![21]);
        assert_eq!(matching_ids(&affiliation(Affiliation::AllyOf, Some(1)), &ctx), vec![31]);
        assert_eq!(
            matching_ids(&affiliation(Affiliation::EnemyOf, Some(2)), &ctx),
            vec![11, 13, 31, 40, 41, 42]
        );
    }

    #[test]
    fn test_all_empires_sentinel() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let owned = vec![11, 13, 21, 31, 40, 41, 42];
        assert_eq!(matching_ids(&affiliation(Affiliation::EnemyOf, None), &ctx), owned);
        assert_eq!(matching_ids(&affiliation(Affiliation::EnemyOf, Some(-1)), &ctx), owned);
        assert!(matching_ids(&affiliation(Affiliation::AllyOf, None), &ctx).is_empty());
        assert_eq!(matching_ids(&affiliation(Affiliation::AnyEmpire, None), &ctx), owned);
    }

    #[test]
    fn test_unregistered_empire_matches_nothing() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        for relation in [
            Affiliation::TheEmpire,
            Affiliation::EnemyOf,
            Affiliation::AllyOf,
            Affiliation::AnyEmpire,
        ] {
            let condition = affiliation(relation, Some(99));
            assert!(matching_ids(&condition, &ctx).is_empty(), "{}", condition.dump());
            assert!(!condition.matches_one(&ctx, object(&universe, 21)));
        }
    }

    #[test]
    fn test_same_owner_as_source() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng).with_source(object(&universe, 21));
        let condition = EmpireAffiliation::new(
            Affiliation::TheEmpire,
            Some(ValueRef::variable(ReferenceType::Source, Property::Owner)),
        );
        assert!(!condition.is_source_invariant());
        assert_eq!(matching_ids(&condition, &ctx), vec![21]);

        let unowned_source = ScriptingContext::new(&universe, &rng).with_source(object(&universe, 12));
        assert!(matching_ids(&condition, &unowned_source).is_empty());
    }

    #[test]
    fn test_visibility_and_production() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(matching_ids(&VisibleToEmpire::new(EmpireId(2).into()), &ctx), vec![11]);
        assert!(matching_ids(&VisibleToEmpire::new(EmpireId(3).into()), &ctx).is_empty());
        assert_eq!(matching_ids(&ProducedByEmpire::new(EmpireId(1).into()), &ctx), vec![13, 41]);
    }

    #[test]
    fn test_explored_and_tech() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(matching_ids(&ExploredByEmpire::new(EmpireId(1).into()), &ctx), vec![1, 2]);
        assert!(matching_ids(&ExploredByEmpire::new(EmpireId(9).into()), &ctx).is_empty());
        assert_eq!(
            matching_ids(&OwnerHasTech::named("SHP_WEAPON_1_1"), &ctx),
            vec![11, 13, 40, 41, 42]
        );
    }

    #[test]
    fn test_owner_availability() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let terran_owned = vec![11, 13, 40, 41, 42];
        assert_eq!(
            matching_ids(&OwnerHasBuildingTypeAvailable::named("BLD_MILITARY_COMMAND"), &ctx),
            terran_owned
        );
        assert!(matching_ids(&OwnerHasBuildingTypeAvailable::named("BLD_GAS_GIANT_GEN"), &ctx).is_empty());
        assert_eq!(matching_ids(&OwnerHasShipDesignAvailable::from(100), &ctx), terran_owned);
        assert_eq!(matching_ids(&OwnerHasShipDesignAvailable::from(101), &ctx), vec![21]);
        assert!(matching_ids(&OwnerHasShipDesignAvailable::from(102), &ctx).is_empty());
        assert_eq!(
            OwnerHasShipDesignAvailable::from(100).dump(),
            "OwnerHasShipDesignAvailable id = 100\n"
        );
    }

    #[test]
    fn test_dump() {
        assert_eq!(
            affiliation(Affiliation::EnemyOf, Some(1)).dump(),
            "OwnedBy affiliation = EnemyOf empire = 1\n"
        );
        assert_eq!(
            affiliation(Affiliation::AllyOf, Some(1)).description(false),
            "is owned by an ally of 1"
        );
    }
}
