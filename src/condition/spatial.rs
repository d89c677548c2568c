//! Position, starlane distance, and containment conditions
//!
//! Each node resolves its subcondition matches once per pass when its
//! parameters allow, then tests candidates against that fixed set.

use ahash::AHashMap;

use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use super::object::candidates_of_types;
use super::{Condition, ObjectSet};
use crate::core::types::ObjectId;
use crate::universe::{ObjectType, UniverseObject};
use crate::value_ref::{eval_opt, opt_invariance, ValueRef};

/// Ids of a match set, sorted for binary search
fn sorted_ids(objects: &ObjectSet<'_>) -> Vec<ObjectId> {
    let mut ids: Vec<ObjectId> = objects.iter().map(|obj| obj.id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Objects within straight-line `distance` of some subcondition match
#[derive(Debug)]
pub struct WithinDistance {
    distance: ValueRef<f64>,
    condition: Box<dyn Condition>,
}

impl WithinDistance {
    pub fn new(distance: ValueRef<f64>, condition: Box<dyn Condition>) -> Self {
        Self { distance, condition }
    }
}

impl SimpleMatch for WithinDistance {
    /// Subcondition matches and the squared distance threshold
    type Params<'a> = (ObjectSet<'a>, f64);
    const NAME: &'static str = "WithinDistance";

    fn param_invariance(&self) -> Invariants {
        self.distance.invariance()
    }

    fn subcondition_invariance(&self) -> Invariants {
        self.condition.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(ObjectSet<'a>, f64)> {
        // negative and NaN thresholds match nothing
        let distance = self.distance.eval(ctx).filter(|d| *d >= 0.0)?;
        let from = self.condition.eval_all(&ctx.without_candidate());
        Some((from, distance * distance))
    }

    fn test<'a>(
        &self,
        (from, distance2): &(ObjectSet<'a>, f64),
        candidate: &'a UniverseObject,
        _: &ScriptingContext<'a>,
    ) -> bool {
        from.iter()
            .any(|obj| obj.position.distance_squared(&candidate.position) <= *distance2)
    }
}

simple_condition!(WithinDistance {
    fn description(&self, negated: bool) -> String {
        describe(
            "DESC_WITHIN_DISTANCE",
            negated,
            &[self.distance.description(), self.condition.description(false)],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}WithinDistance distance = {} condition =\n{}",
            indent(level),
            self.distance.description(),
            self.condition.dump_at(level + 1)
        )
    }
});

/// Objects at most `jumps` starlane jumps from some subcondition match
///
/// A limit of zero asks for objects at exactly the same position, with no
/// path search. Objects in disconnected parts of the lane network are never
/// within any limit of each other.
#[derive(Debug)]
pub struct WithinStarlaneJumps {
    jumps: ValueRef<i32>,
    condition: Box<dyn Condition>,
}

impl WithinStarlaneJumps {
    pub fn new(jumps: ValueRef<i32>, condition: Box<dyn Condition>) -> Self {
        Self { jumps, condition }
    }
}

/// Resolved reach of a `WithinStarlaneJumps` node
#[derive(Debug)]
pub(crate) enum JumpReach<'a> {
    /// Limit of zero: the subcondition matches themselves
    SamePosition(ObjectSet<'a>),
    /// Systems within the limit of some match
    Systems(AHashMap<ObjectId, u32>),
}

impl SimpleMatch for WithinStarlaneJumps {
    type Params<'a> = JumpReach<'a>;
    const NAME: &'static str = "WithinStarlaneJumps";

    fn param_invariance(&self) -> Invariants {
        self.jumps.invariance()
    }

    fn subcondition_invariance(&self) -> Invariants {
        self.condition.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<JumpReach<'a>> {
        // negative limits match nothing
        let limit = u32::try_from(self.jumps.eval(ctx)?).ok()?;
        let from = self.condition.eval_all(&ctx.without_candidate());
        if limit == 0 {
            return Some(JumpReach::SamePosition(from));
        }
        Some(JumpReach::Systems(ctx.universe.systems_within_jumps(from, limit)))
    }

    fn test<'a>(
        &self,
        reach: &JumpReach<'a>,
        candidate: &'a UniverseObject,
        ctx: &ScriptingContext<'a>,
    ) -> bool {
        match reach {
            JumpReach::SamePosition(from) => {
                from.iter().any(|obj| obj.position == candidate.position)
            }
            JumpReach::Systems(reached) => ctx
                .universe
                .lane_anchors(candidate)
                .iter()
                .any(|anchor| reached.contains_key(anchor)),
        }
    }
}

simple_condition!(WithinStarlaneJumps {
    fn description(&self, negated: bool) -> String {
        describe(
            "DESC_WITHIN_STARLANE_JUMPS",
            negated,
            &[self.jumps.description(), self.condition.description(false)],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}WithinStarlaneJumps jumps = {} condition =\n{}",
            indent(level),
            self.jumps.description(),
            self.condition.dump_at(level + 1)
        )
    }
});

/// Objects in the given system, or in any system when none is given
///
/// Systems count as being in themselves.
#[derive(Debug, Default)]
pub struct InSystem {
    system_id: Option<ValueRef<ObjectId>>,
}

impl InSystem {
    pub fn new(system_id: Option<ValueRef<ObjectId>>) -> Self {
        Self { system_id }
    }

    pub fn any() -> Self {
        Self::default()
    }
}

impl From<i32> for InSystem {
    fn from(id: i32) -> Self {
        Self::new(Some(ObjectId(id).into()))
    }
}

impl SimpleMatch for InSystem {
    type Params<'a> = Option<ObjectId>;
    const NAME: &'static str = "InSystem";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.system_id)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Option<ObjectId>> {
        eval_opt(&self.system_id, ctx)
    }

    fn test<'a>(
        &self,
        system_id: &Option<ObjectId>,
        candidate: &'a UniverseObject,
        ctx: &ScriptingContext<'a>,
    ) -> bool {
        let at = ctx.universe.system_id_of(candidate);
        match system_id {
            None => at.is_valid(),
            Some(id) => at.is_valid() && at == *id,
        }
    }
}

simple_condition!(InSystem {
    fn description(&self, negated: bool) -> String {
        match &self.system_id {
            Some(id) => describe("DESC_IN_SYSTEM", negated, &[id.description()]),
            None => describe("DESC_IN_SYSTEM_ANY", negated, &[]),
        }
    }

    fn dump_at(&self, level: usize) -> String {
        match &self.system_id {
            Some(id) => format!("{}InSystem id = {}\n", indent(level), id.description()),
            None => format!("{}InSystem\n", indent(level)),
        }
    }
});

/// Objects directly containing some subcondition match
#[derive(Debug)]
pub struct Contains {
    condition: Box<dyn Condition>,
}

impl Contains {
    pub fn new(condition: Box<dyn Condition>) -> Self {
        Self { condition }
    }
}

impl SimpleMatch for Contains {
    type Params<'a> = Vec<ObjectId>;
    const NAME: &'static str = "Contains";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn subcondition_invariance(&self) -> Invariants {
        self.condition.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Vec<ObjectId>> {
        Some(sorted_ids(&self.condition.eval_all(&ctx.without_candidate())))
    }

    fn test<'a>(&self, matched: &Vec<ObjectId>, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        let contents = candidate.contained_object_ids();
        if contents.len() < matched.len() {
            contents.iter().any(|id| matched.binary_search(id).is_ok())
        } else {
            matched.iter().any(|id| contents.contains(id))
        }
    }
}

simple_condition!(Contains {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Fleet, ObjectType::Planet, ObjectType::System])
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_CONTAINS", negated, &[self.condition.description(false)])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Contains condition =\n{}", indent(level), self.condition.dump_at(level + 1))
    }
});

/// Objects whose system or immediate container matches the subcondition
#[derive(Debug)]
pub struct ContainedBy {
    condition: Box<dyn Condition>,
}

impl ContainedBy {
    pub fn new(condition: Box<dyn Condition>) -> Self {
        Self { condition }
    }
}

/// Direct containers of an object: its system and its immediate container
fn containers_of(candidate: &UniverseObject) -> Vec<ObjectId> {
    let mut containers = Vec::with_capacity(2);
    let system_id = candidate.system_id;
    if system_id.is_valid() && system_id != candidate.id {
        containers.push(system_id);
    }
    let container_id = candidate.container_id();
    if container_id.is_valid() && container_id != system_id {
        containers.push(container_id);
    }
    containers
}

impl SimpleMatch for ContainedBy {
    type Params<'a> = Vec<ObjectId>;
    const NAME: &'static str = "ContainedBy";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn subcondition_invariance(&self) -> Invariants {
        self.condition.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Vec<ObjectId>> {
        Some(sorted_ids(&self.condition.eval_all(&ctx.without_candidate())))
    }

    fn test<'a>(&self, matched: &Vec<ObjectId>, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        let containers = containers_of(candidate);
        if containers.len() < matched.len() {
            containers.iter().any(|id| matched.binary_search(id).is_ok())
        } else {
            matched.iter().any(|id| containers.contains(id))
        }
    }
}

simple_condition!(ContainedBy {
    fn description(&self, negated: bool) -> String {
        describe("DESC_CONTAINED_BY", negated, &[self.condition.description(false)])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}ContainedBy condition =\n{}", indent(level), self.condition.dump_at(level + 1))
    }
});

/// Systems that could take a new starlane to every system the subcondition
/// matches
///
/// A system fails when it is one of those systems, already has a lane to
/// one of them, or the subcondition matches no system at all.
#[derive(Debug)]
pub struct CanAddStarlaneConnection {
    condition: Box<dyn Condition>,
}

impl CanAddStarlaneConnection {
    pub fn new(condition: Box<dyn Condition>) -> Self {
        Self { condition }
    }
}

impl SimpleMatch for CanAddStarlaneConnection {
    /// Sorted ids of the matched systems
    type Params<'a> = Vec<ObjectId>;
    const NAME: &'static str = "CanAddStarlaneConnection";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn subcondition_invariance(&self) -> Invariants {
        self.condition.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Vec<ObjectId>> {
        let mut systems = self.condition.eval_all(&ctx.without_candidate());
        systems.retain(|obj| obj.as_system().is_some());
        Some(sorted_ids(&systems))
    }

    fn test<'a>(&self, targets: &Vec<ObjectId>, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        let Some(system) = candidate.as_system() else {
            return false;
        };
        !targets.is_empty()
            && targets
                .iter()
                .all(|id| *id != candidate.id && !system.lanes.contains(id))
    }
}

simple_condition!(CanAddStarlaneConnection {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::System])
    }

    fn description(&self, negated: bool) -> String {
        describe(
            "DESC_CAN_ADD_STARLANE_CONNECTION",
            negated,
            &[self.condition.description(false)],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}CanAddStarlaneConnection condition =\n{}",
            indent(level),
            self.condition.dump_at(level + 1)
        )
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::testing::{fixture, matching_ids, rng};
    use crate::condition::{ObjectIdIs, Type};
    use crate::value_ref::{Property, ReferenceType};

    fn sol() -> Box<dyn Condition> {
        Box::new(ObjectIdIs::from(1))
    }

    #[test]
    fn test_within_distance() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let near_sol = WithinDistance::new(10.0.into(), sol());
        assert_eq!(matching_ids(&near_sol, &ctx), vec![1, 2, 11, 12, 13, 31, 40, 41, 42, 60]);
        let nothing = WithinDistance::new(10.0.into(), Box::new(ObjectIdIs::from(999)));
        assert!(matching_ids(&nothing, &ctx).is_empty());
    }

    #[test]
    fn test_within_distance_per_candidate_threshold() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let own_x = ValueRef::variable(ReferenceType::LocalCandidate, Property::X);
        let condition = WithinDistance::new(own_x, sol());
        assert!(!condition.param_invariance().local_candidate);
        assert_eq!(
            matching_ids(&condition, &ctx),
            vec![1, 2, 3, 11, 12, 13, 21, 31, 40, 41, 42, 50, 51]
        );
    }

    #[test]
    fn test_starlane_jump_boundary() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let kronos = || Box::new(ObjectIdIs::from(3));

        let two = matching_ids(&WithinStarlaneJumps::new(2.into(), kronos()), &ctx);
        assert!(two.contains(&1));
        let one = matching_ids(&WithinStarlaneJumps::new(1.into(), kronos()), &ctx);
        assert!(!one.contains(&1));
        assert_eq!(one, vec![2, 3, 21, 31, 50, 51]);
    }

    #[test]
    fn test_zero_jumps_is_colocation() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(
            matching_ids(&WithinStarlaneJumps::new(0.into(), sol()), &ctx),
            vec![1, 11, 12, 13, 40, 41, 42]
        );
        assert!(matching_ids(&WithinStarlaneJumps::new((-1).into(), sol()), &ctx).is_empty());
    }

    #[test]
    fn test_disconnected_systems_never_within_jumps() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let isolated = WithinStarlaneJumps::new(i32::MAX.into(), Box::new(ObjectIdIs::from(4)));
        assert_eq!(matching_ids(&isolated, &ctx), vec![4]);
    }

    #[test]
    fn test_jumps_from_several_matches() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let sol_or_isolated = crate::condition::Or::new(vec![sol(), Box::new(ObjectIdIs::from(4))]).unwrap();
        let near = WithinStarlaneJumps::new(1.into(), Box::new(sol_or_isolated));
        // the monster fleet sits on the Alpha - Kronos lane, one jump from Sol
        assert_eq!(
            matching_ids(&near, &ctx),
            vec![1, 2, 4, 11, 12, 13, 31, 40, 41, 42, 50, 51]
        );
    }

    #[test]
    fn test_can_add_starlane_connection() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let to_kronos = CanAddStarlaneConnection::new(Box::new(ObjectIdIs::from(3)));
        assert_eq!(matching_ids(&to_kronos, &ctx), vec![1, 4]);
        let to_planets = CanAddStarlaneConnection::new(Box::new(Type::from(ObjectType::Planet)));
        assert!(matching_ids(&to_planets, &ctx).is_empty());
        let to_every_system = CanAddStarlaneConnection::new(Box::new(Type::from(ObjectType::System)));
        assert!(matching_ids(&to_every_system, &ctx).is_empty());
        assert_eq!(
            to_kronos.dump(),
            "CanAddStarlaneConnection condition =\n    Object id = 3\n"
        );
    }

    #[test]
    fn test_in_system() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(matching_ids(&InSystem::from(2), &ctx), vec![2, 31]);
        assert_eq!(
            matching_ids(&InSystem::any(), &ctx),
            vec![1, 2, 3, 4, 11, 12, 13, 21, 31, 40, 41, 42]
        );
        assert!(matching_ids(&InSystem::from(-1), &ctx).is_empty());
        assert_eq!(InSystem::any().description(true), "is not in a system");
    }

    #[test]
    fn test_contains() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(matching_ids(&Contains::new(Box::new(ObjectIdIs::from(11))), &ctx), vec![1]);
        assert_eq!(matching_ids(&Contains::new(Box::new(ObjectIdIs::from(13))), &ctx), vec![1, 11]);
        assert!(matching_ids(&Contains::new(Box::new(ObjectIdIs::from(999))), &ctx).is_empty());
        assert_eq!(
            matching_ids(&Contains::new(Box::new(Type::from(ObjectType::Ship))), &ctx),
            vec![1, 40, 50]
        );
    }

    #[test]
    fn test_contained_by() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(
            matching_ids(&ContainedBy::new(sol()), &ctx),
            vec![11, 12, 13, 40, 41, 42]
        );
        assert_eq!(matching_ids(&ContainedBy::new(Box::new(ObjectIdIs::from(40))), &ctx), vec![41, 42]);
        assert_eq!(matching_ids(&ContainedBy::new(Box::new(ObjectIdIs::from(11))), &ctx), vec![13]);
    }

    #[test]
    fn test_dump_nests_subcondition() {
        let condition = WithinStarlaneJumps::new(2.into(), sol());
        assert_eq!(condition.dump(), "WithinStarlaneJumps jumps = 2 condition =\n    Object id = 1\n");
        assert_eq!(
            Contains::new(sol()).description(false),
            "contains an object that is object 1"
        );
    }
}
