//! Turn-range conditions

use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use crate::core::config::config;
use crate::universe::UniverseObject;
use crate::value_ref::{eval_opt, opt_description, opt_invariance, ValueRef};

fn resolve_turn_range(
    low: &Option<ValueRef<i32>>,
    high: &Option<ValueRef<i32>>,
    ctx: &ScriptingContext<'_>,
) -> Option<(i32, i32)> {
    let cfg = config();
    Some((
        cfg.turn_low(eval_opt(low, ctx)?),
        cfg.turn_high(eval_opt(high, ctx)?),
    ))
}

fn dump_range(name: &str, low: &Option<ValueRef<i32>>, high: &Option<ValueRef<i32>>, level: usize) -> String {
    let mut text = format!("{}{}", indent(level), name);
    if let Some(low) = low {
        text += &format!(" low = {}", low.description());
    }
    if let Some(high) = high {
        text += &format!(" high = {}", high.description());
    }
    text + "\n"
}

/// Matches everything or nothing depending on the current turn
#[derive(Debug)]
pub struct Turn {
    low: Option<ValueRef<i32>>,
    high: Option<ValueRef<i32>>,
}

impl Turn {
    pub fn new(low: Option<ValueRef<i32>>, high: Option<ValueRef<i32>>) -> Self {
        Self { low, high }
    }

    pub fn between(low: i32, high: i32) -> Self {
        Self::new(Some(low.into()), Some(high.into()))
    }
}

impl SimpleMatch for Turn {
    type Params<'a> = (i32, i32);
    const NAME: &'static str = "Turn";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(i32, i32)> {
        resolve_turn_range(&self.low, &self.high, ctx)
    }

    fn test<'a>(&self, &(low, high): &(i32, i32), _: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        let turn = ctx.current_turn();
        low <= turn && turn <= high
    }
}

simple_condition!(Turn {
    fn description(&self, negated: bool) -> String {
        let cfg = config();
        describe(
            "DESC_TURN",
            negated,
            &[
                opt_description(&self.low, &cfg.before_first_turn.to_string()),
                opt_description(&self.high, &cfg.impossibly_large_turn.to_string()),
            ],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        dump_range("Turn", &self.low, &self.high, level)
    }
});

/// Objects created within a turn range
#[derive(Debug)]
pub struct CreatedOnTurn {
    low: Option<ValueRef<i32>>,
    high: Option<ValueRef<i32>>,
}

impl CreatedOnTurn {
    pub fn new(low: Option<ValueRef<i32>>, high: Option<ValueRef<i32>>) -> Self {
        Self { low, high }
    }
}

impl SimpleMatch for CreatedOnTurn {
    type Params<'a> = (i32, i32);
    const NAME: &'static str = "CreatedOnTurn";

    fn param_invariance(&self) -> Invariants {
        opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<(i32, i32)> {
        resolve_turn_range(&self.low, &self.high, ctx)
    }

    fn test<'a>(
        &self,
        &(low, high): &(i32, i32),
        candidate: &'a UniverseObject,
        _: &ScriptingContext<'a>,
    ) -> bool {
        low <= candidate.created_on_turn && candidate.created_on_turn <= high
    }
}

simple_condition!(CreatedOnTurn {
    fn description(&self, negated: bool) -> String {
        let cfg = config();
        describe(
            "DESC_CREATED_ON_TURN",
            negated,
            &[
                opt_description(&self.low, &cfg.before_first_turn.to_string()),
                opt_description(&self.high, &cfg.impossibly_large_turn.to_string()),
            ],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        dump_range("CreatedOnTurn", &self.low, &self.high, level)
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::testing::{fixture, matching_ids, rng};
    use crate::condition::Condition;
    use crate::value_ref::{Property, ReferenceType};

    #[test]
    fn test_turn_matches_only_current_turn() {
        let mut universe = fixture();
        let rng = rng();
        let total = universe.objects().len();

        for turn in [4, 5, 6] {
            universe.set_current_turn(turn);
            let ctx = ScriptingContext::new(&universe, &rng);
            let matched = matching_ids(&Turn::between(5, 5), &ctx);
            let expected = if turn == 5 { total } else { 0 };
            assert_eq!(matched.len(), expected, "turn {turn}");
        }
    }

    #[test]
    fn test_turn_open_ended() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let after_start = Turn::new(Some(3.into()), None);
        let before_start = Turn::new(None, Some(3.into()));
        assert_eq!(matching_ids(&after_start, &ctx).len(), universe.objects().len());
        assert!(matching_ids(&before_start, &ctx).is_empty());
    }

    #[test]
    fn test_created_on_turn_range() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let condition = CreatedOnTurn::new(Some(4.into()), Some(6.into()));
        assert_eq!(matching_ids(&condition, &ctx), vec![12, 13]);
    }

    #[test]
    fn test_created_on_turn_relative_to_candidate() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let own_turn = ValueRef::variable(ReferenceType::LocalCandidate, Property::CreationTurn);
        let condition = CreatedOnTurn::new(Some(own_turn.clone()), Some(own_turn));
        assert!(!condition.param_invariance().local_candidate);
        assert_eq!(matching_ids(&condition, &ctx).len(), universe.objects().len());
    }

    #[test]
    fn test_dump_and_description() {
        let condition = Turn::between(5, 7);
        assert_eq!(condition.dump(), "Turn low = 5 high = 7\n");
        assert_eq!(
            condition.description(false),
            "the current turn is between 5 and 7"
        );
        assert_eq!(Turn::new(None, None).dump_at(1), "    Turn\n");
    }
}
