//! Random acceptance

use rand::Rng;

use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::Invariants;
use super::leaf::SimpleMatch;
use crate::universe::UniverseObject;
use crate::value_ref::ValueRef;

/// Each candidate matches independently with probability `p`
///
/// `p` is clamped to `[0, 1]`. Draws come from the context generator, so a
/// fixed seed reproduces the same selection.
#[derive(Debug)]
pub struct Chance {
    probability: ValueRef<f64>,
}

impl Chance {
    pub fn new(probability: ValueRef<f64>) -> Self {
        Self { probability }
    }
}

impl From<f64> for Chance {
    fn from(probability: f64) -> Self {
        Self::new(ValueRef::Constant(probability))
    }
}

impl SimpleMatch for Chance {
    type Params<'a> = f64;
    const NAME: &'static str = "Chance";

    fn param_invariance(&self) -> Invariants {
        self.probability.invariance()
    }

    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<f64> {
        self.probability
            .eval(ctx)
            .filter(|p| !p.is_nan())
            .map(|p| p.clamp(0.0, 1.0))
    }

    fn test<'a>(&self, &probability: &f64, _: &'a UniverseObject, ctx: &ScriptingContext<'a>) -> bool {
        // gen::<f64>() is in [0, 1), so zero never matches and one always does
        ctx.rng.borrow_mut().gen::<f64>() < probability
    }
}

simple_condition!(Chance {
    fn description(&self, negated: bool) -> String {
        let probability = match &self.probability {
            ValueRef::Constant(p) => format!("{}%", p.clamp(0.0, 1.0) * 100.0),
            other => other.description(),
        };
        describe("DESC_CHANCE", negated, &[probability])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Random probability = {}\n", indent(level), self.probability.description())
    }
});

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use rand::SeedableRng;

    use super::*;
    use crate::condition::testing::{fixture, matching_ids, rng};
    use crate::condition::Condition;
    use crate::core::config::EvalRng;

    #[test]
    fn test_bounds() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        assert!(matching_ids(&Chance::from(0.0), &ctx).is_empty());
        assert_eq!(matching_ids(&Chance::from(1.0), &ctx).len(), universe.objects().len());
        assert!(matching_ids(&Chance::from(-3.0), &ctx).is_empty());
        assert_eq!(matching_ids(&Chance::from(7.0), &ctx).len(), universe.objects().len());
    }

    #[test]
    fn test_same_seed_same_selection() {
        let universe = fixture();
        let pick = |seed: u64| {
            let rng = RefCell::new(EvalRng::seed_from_u64(seed));
            let ctx = ScriptingContext::new(&universe, &rng);
            matching_ids(&Chance::from(0.5), &ctx)
        };
        assert_eq!(pick(7), pick(7));
        assert_eq!(pick(11), pick(11));
    }

    #[test]
    fn test_description() {
        assert_eq!(Chance::from(0.25).description(false), "with 25% probability");
        assert_eq!(Chance::from(0.25).dump(), "Random probability = 0.25\n");
    }
}
