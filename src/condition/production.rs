//! Production queue conditions

use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use crate::core::types::{DesignId, EmpireId, ObjectId};
use crate::universe::{BuildType, Empire, UniverseObject};
use crate::value_ref::{eval_opt, opt_description, opt_invariance, ValueRef};

/// Objects where between `low` and `high` matching items are enqueued
///
/// Items count with their block size. A missing empire sums the queues of
/// every empire. With neither bound given at least one item must be queued.
#[derive(Debug)]
pub struct Enqueued {
    build_type: Option<BuildType>,
    name: Option<String>,
    design_id: Option<ValueRef<DesignId>>,
    empire: Option<ValueRef<EmpireId>>,
    low: Option<ValueRef<i32>>,
    high: Option<ValueRef<i32>>,
}

impl Enqueued {
    /// Items of any kind
    pub fn any() -> Self {
        Self {
            build_type: None,
            name: None,
            design_id: None,
            empire: None,
            low: None,
            high: None,
        }
    }

    /// Buildings, optionally of one type
    pub fn building(name: Option<&str>) -> Self {
        Self {
            build_type: Some(BuildType::Building),
            name: name.map(str::to_string),
            ..Self::any()
        }
    }

    /// Ships, optionally of one design
    pub fn ship(design_id: Option<ValueRef<DesignId>>) -> Self {
        Self {
            build_type: Some(BuildType::Ship),
            design_id,
            ..Self::any()
        }
    }

    pub fn by_empire(mut self, empire: ValueRef<EmpireId>) -> Self {
        self.empire = Some(empire);
        self
    }

    pub fn count_between(mut self, low: Option<ValueRef<i32>>, high: Option<ValueRef<i32>>) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    fn default_low(&self) -> i32 {
        if self.low.is_none() && self.high.is_none() {
            1
        } else {
            0
        }
    }

    fn count_on_queue(&self, empire: &Empire, location: ObjectId, design_id: Option<DesignId>) -> i32 {
        empire
            .production_queue
            .iter()
            .filter(|item| item.location == location)
            .filter(|item| self.build_type.map_or(true, |t| t == item.build_type))
            .filter(|item| match item.build_type {
                BuildType::Building => self.name.as_ref().map_or(true, |n| *n == item.name),
                BuildType::Ship => design_id.map_or(true, |d| d == item.design_id),
            })
            .map(|item| item.blocksize)
            .sum()
    }
}

/// Resolved design filter, empire filter and count range
type EnqueuedParams = (Option<DesignId>, Option<EmpireId>, (i32, i32));

impl SimpleMatch for Enqueued {
    type Params<'a> = EnqueuedParams;
    const NAME: &'static str = "Enqueued";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.design_id)
            & opt_invariance(&self.empire)
            & opt_invariance(&self.low)
            & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<EnqueuedParams> {
        let design_id = eval_opt(&self.design_id, ctx)?;
        let empire = eval_opt(&self.empire, ctx)?.filter(|e| *e != EmpireId::ALL);
        let low = eval_opt(&self.low, ctx)?.unwrap_or_else(|| self.default_low());
        let high = eval_opt(&self.high, ctx)?.unwrap_or(i32::MAX);
        Some((design_id, empire, (low, high)))
    }

    fn test<'a>(
        &self,
        &(design_id, empire, (low, high)): &EnqueuedParams,
        candidate: &'a UniverseObject,
        ctx: &ScriptingContext<'a>,
    ) -> bool {
        let empires = &ctx.universe.empires;
        let count = match empire {
            None => empires
                .iter()
                .map(|e| self.count_on_queue(e, candidate.id, design_id))
                .sum(),
            Some(id) => match empires.get(id) {
                Some(e) => self.count_on_queue(e, candidate.id, design_id),
                None => {
                    tracing::debug!(empire = %id, "Unknown empire");
                    return false;
                }
            },
        };
        low <= count && count <= high
    }
}

simple_condition!(Enqueued {
    fn description(&self, negated: bool) -> String {
        let what = match (&self.name, &self.design_id) {
            (Some(name), _) => name.clone(),
            (None, Some(design)) => design.description(),
            (None, None) => match self.build_type {
                Some(BuildType::Building) => "buildings".to_string(),
                Some(BuildType::Ship) => "ships".to_string(),
                None => "items".to_string(),
            },
        };
        describe(
            "DESC_ENQUEUED",
            negated,
            &[
                opt_description(&self.low, &self.default_low().to_string()),
                opt_description(&self.high, &i32::MAX.to_string()),
                what,
                opt_description(&self.empire, "any empire"),
            ],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        let mut text = format!("{}Enqueued", indent(level));
        match self.build_type {
            Some(BuildType::Building) => {
                text += " type = Building";
                if let Some(name) = &self.name {
                    text += &format!(" name = \"{name}\"");
                }
            }
            Some(BuildType::Ship) => {
                text += " type = Ship";
                if let Some(design) = &self.design_id {
                    text += &format!(" design = {}", design.description());
                }
            }
            None => {}
        }
        if let Some(empire) = &self.empire {
            text += &format!(" empire = {}", empire.description());
        }
        if let Some(low) = &self.low {
            text += &format!(" low = {}", low.description());
        }
        if let Some(high) = &self.high {
            text += &format!(" high = {}", high.description());
        }
        text + "\n"
    }
});
