//! Supply network conditions
//!
//! Supply ranges and resource groups are computed elsewhere each turn and
//! read here as stored on the empire.

use super::affiliation::resolve_empire;
use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use super::{Condition, ObjectSet};
use crate::core::types::{EmpireId, ObjectId};
use crate::universe::{Empire, UniverseObject};
use crate::value_ref::ValueRef;

/// Objects in a system where the empire can resupply fleets
#[derive(Debug)]
pub struct FleetSupplyableByEmpire {
    empire: ValueRef<EmpireId>,
}

impl FleetSupplyableByEmpire {
    pub fn new(empire: ValueRef<EmpireId>) -> Self {
        Self { empire }
    }
}

impl From<i32> for FleetSupplyableByEmpire {
    fn from(empire: i32) -> Self {
        Self::new(EmpireId(empire).into())
    }
}

impl SimpleMatch for FleetSupplyableByEmpire {
    type Params<'a> = &'a Empire;
    const NAME: &'static str = "FleetSupplyableByEmpire";

    fn param_invariance(&self) -> Invariants {
        self.empire.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<&'a Empire> {
        resolve_empire(&self.empire, ctx, Self::NAME)
    }

    fn test<'a>(&self, empire: &&'a Empire, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        empire
            .fleet_supplyable_systems
            .contains(&ctx.universe.system_id_of(candidate))
    }
}

simple_condition!(FleetSupplyableByEmpire {
    fn description(&self, negated: bool) -> String {
        describe("DESC_FLEET_SUPPLYABLE", negated, &[self.empire.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}ResupplyableBy empire = {}\n", indent(level), self.empire.description())
    }
});

/// Objects sharing a resource supply group of the empire with some
/// subcondition match
#[derive(Debug)]
pub struct ResourceSupplyConnectedByEmpire {
    empire: ValueRef<EmpireId>,
    condition: Box<dyn Condition>,
}

impl ResourceSupplyConnectedByEmpire {
    pub fn new(empire: ValueRef<EmpireId>, condition: Box<dyn Condition>) -> Self {
        Self { empire, condition }
    }
}

impl SimpleMatch for ResourceSupplyConnectedByEmpire {
    /// The empire and the systems of the subcondition matches
    type Params<'a> = (&'a Empire, Vec<ObjectId>);
    const NAME: &'static str = "ResourceSupplyConnectedByEmpire";

    fn param_invariance(&self) -> Invariants {
        self.empire.invariance()
    }

    fn subcondition_invariance(&self) -> Invariants {
        self.condition.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(&'a Empire, Vec<ObjectId>)> {
        let empire = resolve_empire(&self.empire, ctx, Self::NAME)?;
        let from: ObjectSet<'a> = self.condition.eval_all(&ctx.without_candidate());
        let mut systems: Vec<ObjectId> = from
            .iter()
            .map(|obj| ctx.universe.system_id_of(obj))
            .filter(ObjectId::is_valid)
            .collect();
        systems.sort_unstable();
        systems.dedup();
        Some((empire, systems))
    }

    fn test<'a>(
        &self,
        (empire, systems): &(&'a Empire, Vec<ObjectId>),
        candidate: &'a UniverseObject,
        ctx: &ScriptingContext<'a>,
    ) -> bool {
        let at = ctx.universe.system_id_of(candidate);
        at.is_valid() && systems.iter().any(|&system| empire.supply_connected(system, at))
    }
}

simple_condition!(ResourceSupplyConnectedByEmpire {
    fn description(&self, negated: bool) -> String {
        describe(
            "DESC_RESOURCE_SUPPLY_CONNECTED",
            negated,
            &[self.empire.description(), self.condition.description(false)],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}ResourceSupplyConnectedBy empire = {} condition =\n{}",
            indent(level),
            self.empire.description(),
            self.condition.dump_at(level + 1)
        )
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::testing::{fixture, matching_ids, rng};
    use crate::condition::ObjectIdIs;

    #[test]
    fn test_fleet_supplyable() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(
            matching_ids(&FleetSupplyableByEmpire::from(1), &ctx),
            vec![1, 2, 11, 12, 13, 31, 40, 41, 42]
        );
        assert!(matching_ids(&FleetSupplyableByEmpire::from(2), &ctx).is_empty());
        assert!(matching_ids(&FleetSupplyableByEmpire::from(9), &ctx).is_empty());
    }

    #[test]
    fn test_resource_supply_groups() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let connected = |empire: i32, to: i32| {
            ResourceSupplyConnectedByEmpire::new(EmpireId(empire).into(), Box::new(ObjectIdIs::from(to)))
        };
        assert_eq!(
            matching_ids(&connected(1, 31), &ctx),
            vec![1, 2, 11, 12, 13, 31, 40, 41, 42]
        );
        assert_eq!(matching_ids(&connected(2, 21), &ctx), vec![3, 21]);
        assert!(matching_ids(&connected(1, 21), &ctx).is_empty());
        assert!(matching_ids(&connected(1, 50), &ctx).is_empty());
    }

    #[test]
    fn test_dump() {
        let condition = ResourceSupplyConnectedByEmpire::new(EmpireId(1).into(), Box::new(ObjectIdIs::from(11)));
        assert_eq!(
            condition.dump(),
            "ResourceSupplyConnectedBy empire = 1 condition =\n    Object id = 11\n"
        );
    }
}
