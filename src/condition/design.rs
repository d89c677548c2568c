//! Ship design composition conditions

use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use super::object::candidates_of_types;
use super::ObjectSet;
use crate::core::types::DesignId;
use crate::universe::{ObjectType, ShipDesign, ShipPartClass, UniverseObject};
use crate::value_ref::{eval_opt, opt_description, opt_invariance, ValueRef};

/// Count range of a part condition; absent bounds mean "at least one"
fn resolve_count_range(
    low: &Option<ValueRef<i32>>,
    high: &Option<ValueRef<i32>>,
    ctx: &ScriptingContext<'_>,
) -> Option<(i32, i32)> {
    let low = eval_opt(low, ctx)?.map_or(1, |v| v.max(0));
    let high = eval_opt(high, ctx)?.unwrap_or(i32::MAX);
    Some((low, high))
}

fn design_of<'a>(ctx: &ScriptingContext<'a>, candidate: &'a UniverseObject) -> Option<&'a ShipDesign> {
    ctx.universe.design_of(candidate)
}

fn ship_candidates<'a>(ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
    candidates_of_types(ctx, &[ObjectType::Ship])
}

fn count_in_range(count: usize, (low, high): (i32, i32)) -> bool {
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    low <= count && count <= high
}

/// Ships whose design uses the named hull
#[derive(Debug)]
pub struct DesignHasHull {
    name: ValueRef<String>,
}

impl DesignHasHull {
    pub fn new(name: ValueRef<String>) -> Self {
        Self { name }
    }

    pub fn named(name: &str) -> Self {
        Self::new(ValueRef::Constant(name.to_string()))
    }
}

impl SimpleMatch for DesignHasHull {
    type Params<'a> = String;
    const NAME: &'static str = "DesignHasHull";

    fn param_invariance(&self) -> Invariants {
        self.name.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<String> {
        self.name.eval(ctx)
    }

    fn test<'a>(&self, hull: &String, candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        design_of(ctx, candidate).is_some_and(|design| &design.hull == hull)
    }
}

simple_condition!(DesignHasHull {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        ship_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_DESIGN_HAS_HULL", negated, &[self.name.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}DesignHasHull name = \"{}\"\n", indent(level), self.name.description())
    }
});

/// Ships carrying between `low` and `high` copies of a part
///
/// An empty part name counts every filled slot.
#[derive(Debug)]
pub struct DesignHasPart {
    name: ValueRef<String>,
    low: Option<ValueRef<i32>>,
    high: Option<ValueRef<i32>>,
}

impl DesignHasPart {
    pub fn new(name: ValueRef<String>, low: Option<ValueRef<i32>>, high: Option<ValueRef<i32>>) -> Self {
        Self { name, low, high }
    }

    pub fn named(name: &str) -> Self {
        Self::new(ValueRef::Constant(name.to_string()), None, None)
    }

    pub fn count_between(name: &str, low: i32, high: i32) -> Self {
        Self::new(ValueRef::Constant(name.to_string()), Some(low.into()), Some(high.into()))
    }
}

impl SimpleMatch for DesignHasPart {
    type Params<'a> = (String, (i32, i32));
    const NAME: &'static str = "DesignHasPart";

    fn param_invariance(&self) -> Invariants {
        self.name.invariance() & opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(String, (i32, i32))> {
        Some((self.name.eval(ctx)?, resolve_count_range(&self.low, &self.high, ctx)?))
    }

    fn test<'a>(
        &self,
        (name, range): &(String, (i32, i32)),
        candidate: &'a UniverseObject,
        ctx: &ScriptingContext<'a>,
    ) -> bool {
        let Some(design) = design_of(ctx, candidate) else {
            return false;
        };
        let count = design
            .filled_parts()
            .filter(|part| name.is_empty() || part == name)
            .count();
        count_in_range(count, *range)
    }
}

simple_condition!(DesignHasPart {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        ship_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        describe(
            "DESC_DESIGN_HAS_PART",
            negated,
            &[
                opt_description(&self.low, "1"),
                opt_description(&self.high, "any number"),
                self.name.description(),
            ],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}DesignHasPart low = {} high = {} name = \"{}\"\n",
            indent(level),
            opt_description(&self.low, "1"),
            opt_description(&self.high, &i32::MAX.to_string()),
            self.name.description()
        )
    }
});

/// Ships carrying between `low` and `high` parts of a class
#[derive(Debug)]
pub struct DesignHasPartClass {
    class: ShipPartClass,
    low: Option<ValueRef<i32>>,
    high: Option<ValueRef<i32>>,
}

impl DesignHasPartClass {
    pub fn new(class: ShipPartClass, low: Option<ValueRef<i32>>, high: Option<ValueRef<i32>>) -> Self {
        Self { class, low, high }
    }
}

impl SimpleMatch for DesignHasPartClass {
    type Params<'a> = (i32, i32);
    const NAME: &'static str = "DesignHasPartClass";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(i32, i32)> {
        resolve_count_range(&self.low, &self.high, ctx)
    }

    fn test<'a>(&self, range: &(i32, i32), candidate: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        let Some(design) = design_of(ctx, candidate) else {
            return false;
        };
        let count = design
            .filled_parts()
            .filter_map(|name| ctx.universe.designs.part(name))
            .filter(|part| part.class == self.class)
            .count();
        count_in_range(count, *range)
    }
}

simple_condition!(DesignHasPartClass {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        ship_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        describe(
            "DESC_DESIGN_HAS_PART_CLASS",
            negated,
            &[
                opt_description(&self.low, "1"),
                opt_description(&self.high, "any number"),
                format!("{:?}", self.class),
            ],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}DesignHasPartClass low = {} high = {} class = {:?}\n",
            indent(level),
            opt_description(&self.low, "1"),
            opt_description(&self.high, &i32::MAX.to_string()),
            self.class
        )
    }
});

/// Ships of the premade design with the given name
#[derive(Debug)]
pub struct PredefinedShipDesign {
    name: String,
}

impl PredefinedShipDesign {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl SimpleMatch for PredefinedShipDesign {
    type Params<'a> = &'a ShipDesign;
    const NAME: &'static str = "PredefinedShipDesign";

    fn param_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<&'a ShipDesign> {
        let design = ctx.universe.designs.premade_design(&self.name);
        if design.is_none() {
            tracing::debug!(design = %self.name, "Unknown premade design");
        }
        design
    }

    fn test<'a>(&self, premade: &&'a ShipDesign, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate
            .as_ship()
            .is_some_and(|ship| ship.design_id == premade.id)
    }
}

simple_condition!(PredefinedShipDesign {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        ship_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_PREDEFINED_SHIP_DESIGN", negated, &[self.name.clone()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}DesignName name = \"{}\"\n", indent(level), self.name)
    }
});

/// Ships of the design with the given id
#[derive(Debug)]
pub struct NumberedShipDesign {
    id: ValueRef<DesignId>,
}

impl NumberedShipDesign {
    pub fn new(id: ValueRef<DesignId>) -> Self {
        Self { id }
    }
}

impl From<i32> for NumberedShipDesign {
    fn from(id: i32) -> Self {
        Self::new(ValueRef::Constant(DesignId(id)))
    }
}

impl SimpleMatch for NumberedShipDesign {
    type Params<'a> = DesignId;
    const NAME: &'static str = "NumberedShipDesign";

    fn param_invariance(&self) -> Invariants {
        self.id.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<DesignId> {
        self.id.eval(ctx).filter(|id| id.is_valid())
    }

    fn test<'a>(&self, id: &DesignId, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate.as_ship().is_some_and(|ship| ship.design_id == *id)
    }
}

simple_condition!(NumberedShipDesign {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        ship_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_NUMBERED_SHIP_DESIGN", negated, &[self.id.description()])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}NumberedShipDesign design_id = {}\n", indent(level), self.id.description())
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::testing::{fixture, matching_ids, rng};
    use crate::condition::Condition;

    #[test]
    fn test_hull() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(matching_ids(&DesignHasHull::named("SH_BASIC_MEDIUM"), &ctx), vec![41]);
        assert!(matching_ids(&DesignHasHull::named("SH_XENTRONIUM"), &ctx).is_empty());
    }

    #[test]
    fn test_part_counts() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(matching_ids(&DesignHasPart::named("SR_WEAPON_1_1"), &ctx), vec![41]);
        assert_eq!(
            matching_ids(&DesignHasPart::count_between("SR_WEAPON_1_1", 3, 5), &ctx),
            Vec::<i32>::new()
        );
        assert_eq!(
            matching_ids(&DesignHasPart::count_between("SR_WEAPON_1_1", 2, 2), &ctx),
            vec![41]
        );
        // empty slots are not counted as parts
        assert_eq!(matching_ids(&DesignHasPart::count_between("", 1, 1), &ctx), vec![42]);
        assert_eq!(matching_ids(&DesignHasPart::count_between("", 0, 0), &ctx), vec![51]);
    }

    #[test]
    fn test_part_class() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let armour = DesignHasPartClass::new(ShipPartClass::Armour, None, None);
        assert_eq!(matching_ids(&armour, &ctx), vec![41]);
        let no_weapons = DesignHasPartClass::new(ShipPartClass::ShortRange, Some(0.into()), Some(0.into()));
        assert_eq!(matching_ids(&no_weapons, &ctx), vec![42, 51]);
    }

    #[test]
    fn test_premade_and_numbered() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert_eq!(matching_ids(&PredefinedShipDesign::new("SM_KRAKEN_1"), &ctx), vec![51]);
        // player designs are not premade
        assert!(matching_ids(&PredefinedShipDesign::new("Warship"), &ctx).is_empty());
        assert_eq!(matching_ids(&NumberedShipDesign::from(101), &ctx), vec![42]);
        assert!(matching_ids(&NumberedShipDesign::from(-1), &ctx).is_empty());
    }

    #[test]
    fn test_dump() {
        assert_eq!(
            DesignHasPart::count_between("SR_WEAPON_1_1", 1, 2).dump(),
            "DesignHasPart low = 1 high = 2 name = \"SR_WEAPON_1_1\"\n"
        );
        assert_eq!(NumberedShipDesign::from(7).dump(), "NumberedShipDesign design_id = 7\n");
    }
}
