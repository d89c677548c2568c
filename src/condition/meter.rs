//! Meter, stockpile and free value range conditions
//!
//! Object meters are compared by their initial value so that results do not
//! change while effects are being applied during a turn.

use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use super::object::candidates_of_types;
use super::ObjectSet;
use crate::core::config::config;
use crate::core::types::EmpireId;
use crate::universe::{MeterType, ObjectType, ResourceType, UniverseObject};
use crate::value_ref::{eval_opt, opt_description, opt_invariance, ValueRef};

type Range = (f64, f64);

fn resolve_range(
    low: &Option<ValueRef<f64>>,
    high: &Option<ValueRef<f64>>,
    ctx: &ScriptingContext<'_>,
) -> Option<Range> {
    let large = config().large_meter_value;
    Some((
        eval_opt(low, ctx)?.unwrap_or(-large),
        eval_opt(high, ctx)?.unwrap_or(large),
    ))
}

fn in_range(value: f64, (low, high): Range) -> bool {
    low <= value && value <= high
}

fn range_descriptions(low: &Option<ValueRef<f64>>, high: &Option<ValueRef<f64>>) -> [String; 2] {
    let large = config().large_meter_value;
    [
        opt_description(low, &(-large).to_string()),
        opt_description(high, &large.to_string()),
    ]
}

fn dump_bounds(low: &Option<ValueRef<f64>>, high: &Option<ValueRef<f64>>) -> String {
    let mut text = String::new();
    if let Some(low) = low {
        text += &format!(" low = {}", low.description());
    }
    if let Some(high) = high {
        text += &format!(" high = {}", high.description());
    }
    text
}

/// Objects whose initial meter value lies in a range
#[derive(Debug)]
pub struct MeterValue {
    meter: MeterType,
    low: Option<ValueRef<f64>>,
    high: Option<ValueRef<f64>>,
}

impl MeterValue {
    pub fn new(meter: MeterType, low: Option<ValueRef<f64>>, high: Option<ValueRef<f64>>) -> Self {
        Self { meter, low, high }
    }

    pub fn between(meter: MeterType, low: f64, high: f64) -> Self {
        Self::new(meter, Some(low.into()), Some(high.into()))
    }
}

impl SimpleMatch for MeterValue {
    type Params<'a> = Range;
    const NAME: &'static str = "MeterValue";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Range> {
        resolve_range(&self.low, &self.high, ctx)
    }

    fn test<'a>(&self, range: &Range, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate
            .meter(self.meter)
            .is_some_and(|meter| in_range(meter.initial, *range))
    }
}

simple_condition!(MeterValue {
    fn description(&self, negated: bool) -> String {
        let [low, high] = range_descriptions(&self.low, &self.high);
        describe("DESC_METER_VALUE", negated, &[format!("{:?}", self.meter), low, high])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}{:?}{}\n", indent(level), self.meter, dump_bounds(&self.low, &self.high))
    }
});

/// Ships whose meter for one of their parts lies in a range
///
/// Part meters have no separate initial value worth comparing; the current
/// value is used.
#[derive(Debug)]
pub struct ShipPartMeterValue {
    part: String,
    meter: MeterType,
    low: Option<ValueRef<f64>>,
    high: Option<ValueRef<f64>>,
}

impl ShipPartMeterValue {
    pub fn new(
        part: &str,
        meter: MeterType,
        low: Option<ValueRef<f64>>,
        high: Option<ValueRef<f64>>,
    ) -> Self {
        Self {
            part: part.to_string(),
            meter,
            low,
            high,
        }
    }
}

impl SimpleMatch for ShipPartMeterValue {
    type Params<'a> = Range;
    const NAME: &'static str = "ShipPartMeterValue";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Range> {
        resolve_range(&self.low, &self.high, ctx)
    }

    fn test<'a>(&self, range: &Range, candidate: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        candidate
            .as_ship()
            .and_then(|ship| ship.part_meters.get(&(self.part.clone(), self.meter)))
            .is_some_and(|meter| in_range(meter.current, *range))
    }
}

simple_condition!(ShipPartMeterValue {
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        candidates_of_types(ctx, &[ObjectType::Ship])
    }

    fn description(&self, negated: bool) -> String {
        let [low, high] = range_descriptions(&self.low, &self.high);
        describe(
            "DESC_SHIP_PART_METER_VALUE",
            negated,
            &[self.part.clone(), format!("{:?}", self.meter), low, high],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}ShipPartMeter part = \"{}\" meter = {:?}{}\n",
            indent(level),
            self.part,
            self.meter,
            dump_bounds(&self.low, &self.high)
        )
    }
});

/// Stockpiled resources of an empire lie in a range
///
/// Without an empire parameter the candidate's owner is used, so unowned
/// objects never match. An empire without a stockpile entry holds zero.
#[derive(Debug)]
pub struct EmpireStockpileValue {
    empire: Option<ValueRef<EmpireId>>,
    resource: ResourceType,
    low: Option<ValueRef<f64>>,
    high: Option<ValueRef<f64>>,
}

impl EmpireStockpileValue {
    pub fn new(
        empire: Option<ValueRef<EmpireId>>,
        resource: ResourceType,
        low: Option<ValueRef<f64>>,
        high: Option<ValueRef<f64>>,
    ) -> Self {
        Self {
            empire,
            resource,
            low,
            high,
        }
    }
}

impl SimpleMatch for EmpireStockpileValue {
    type Params<'a> = (Option<EmpireId>, Range);
    const NAME: &'static str = "EmpireStockpileValue";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.empire) & opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(Option<EmpireId>, Range)> {
        Some((eval_opt(&self.empire, ctx)?, resolve_range(&self.low, &self.high, ctx)?))
    }

    fn test<'a>(
        &self,
        (empire, range): &(Option<EmpireId>, Range),
        candidate: &'a UniverseObject,
        ctx: &ScriptingContext<'a>,
    ) -> bool {
        let Some(empire_id) = empire.or(candidate.owner) else {
            return false;
        };
        let Some(empire) = ctx.universe.empires.get(empire_id) else {
            tracing::debug!(empire = %empire_id, "Unknown empire");
            return false;
        };
        let amount = empire.stockpiles.get(&self.resource).copied().unwrap_or(0.0);
        in_range(amount, *range)
    }
}

simple_condition!(EmpireStockpileValue {
    fn description(&self, negated: bool) -> String {
        let [low, high] = range_descriptions(&self.low, &self.high);
        let empire = opt_description(&self.empire, "of the owner");
        describe(
            "DESC_EMPIRE_STOCKPILE",
            negated,
            &[empire, format!("{:?}", self.resource), low, high],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        let mut text = format!("{}EmpireStockpile", indent(level));
        if let Some(empire) = &self.empire {
            text += &format!(" empire = {}", empire.description());
        }
        format!(
            "{text} resource = {:?}{}\n",
            self.resource,
            dump_bounds(&self.low, &self.high)
        )
    }
});

/// An empire meter's current value lies in a range
///
/// Without an empire parameter the candidate's owner is used. Unknown
/// empires and missing meters never match.
#[derive(Debug)]
pub struct EmpireMeterValue {
    empire: Option<ValueRef<EmpireId>>,
    meter: String,
    low: Option<ValueRef<f64>>,
    high: Option<ValueRef<f64>>,
}

impl EmpireMeterValue {
    pub fn new(
        empire: Option<ValueRef<EmpireId>>,
        meter: &str,
        low: Option<ValueRef<f64>>,
        high: Option<ValueRef<f64>>,
    ) -> Self {
        Self {
            empire,
            meter: meter.to_string(),
            low,
            high,
        }
    }
}

impl SimpleMatch for EmpireMeterValue {
    type Params<'a> = (Option<EmpireId>, Range);
    const NAME: &'static str = "EmpireMeterValue";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.empire) & opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(Option<EmpireId>, Range)> {
        Some((eval_opt(&self.empire, ctx)?, resolve_range(&self.low, &self.high, ctx)?))
    }

    fn test<'a>(
        &self,
        (empire, range): &(Option<EmpireId>, Range),
        candidate: &'a UniverseObject,
        ctx: &ScriptingContext<'a>,
    ) -> bool {
        let Some(empire_id) = empire.or(candidate.owner) else {
            return false;
        };
        ctx.universe
            .empires
            .get(empire_id)
            .and_then(|empire| empire.meter(&self.meter))
            .is_some_and(|meter| in_range(meter.current, *range))
    }
}

simple_condition!(EmpireMeterValue {
    fn description(&self, negated: bool) -> String {
        let [low, high] = range_descriptions(&self.low, &self.high);
        let empire = opt_description(&self.empire, "of the owner");
        describe(
            "DESC_EMPIRE_METER_VALUE",
            negated,
            &[empire, self.meter.clone(), low, high],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        let mut text = format!("{}EmpireMeterValue", indent(level));
        if let Some(empire) = &self.empire {
            text += &format!(" empire = {}", empire.description());
        }
        format!("{text} meter = {}{}\n", self.meter, dump_bounds(&self.low, &self.high))
    }
});

/// A free-standing value lies in a range
///
/// The value may refer to the candidate, making this a per-object test.
#[derive(Debug)]
pub struct ValueTest {
    value: ValueRef<f64>,
    low: Option<ValueRef<f64>>,
    high: Option<ValueRef<f64>>,
}

impl ValueTest {
    pub fn new(value: ValueRef<f64>, low: Option<ValueRef<f64>>, high: Option<ValueRef<f64>>) -> Self {
        Self { value, low, high }
    }
}

impl SimpleMatch for ValueTest {
    type Params<'a> = (f64, Range);
    const NAME: &'static str = "ValueTest";

    fn param_invariance(&self) -> Invariants {
        self.value.invariance() & opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(f64, Range)> {
        Some((self.value.eval(ctx)?, resolve_range(&self.low, &self.high, ctx)?))
    }

    fn test<'a>(&self, &(value, range): &(f64, Range), _: &'a UniverseObject, _: &ScriptingContext<'a>) -> bool {
        in_range(value, range)
    }
}

simple_condition!(ValueTest {
    fn description(&self, negated: bool) -> String {
        let [low, high] = range_descriptions(&self.low, &self.high);
        describe("DESC_VALUE_TEST", negated, &[self.value.description(), low, high])
    }

    fn dump_at(&self, level: usize) -> String {
        format!(
            "{}ValueTest value = {}{}\n",
            indent(level),
            self.value.description(),
            dump_bounds(&self.low, &self.high)
        )
    }
});
