//! Shared evaluation for leaf conditions
//!
//! A leaf resolves its parameters into a value and tests candidates against
//! it. When the parameters cannot vary between candidates they are resolved
//! once per pass; otherwise each candidate is tested with itself in context.

use super::context::ScriptingContext;
use super::invariance::Invariants;
use super::partition::{eval_each, transfer};
use super::{Condition, ObjectSet, SearchDomain};
use crate::universe::UniverseObject;

pub(crate) trait SimpleMatch: Condition {
    /// Resolved parameters, possibly borrowing objects from the universe
    type Params<'a>;

    const NAME: &'static str;

    /// Invariance of the value-reference parameters
    fn param_invariance(&self) -> Invariants;

    /// Invariance contributed by subconditions
    fn subcondition_invariance(&self) -> Invariants {
        Invariants::ALL
    }

    /// `None` when a parameter cannot be resolved; nothing matches then
    fn resolve<'a>(&self, ctx: &ScriptingContext<'a>) -> Option<Self::Params<'a>>;

    fn test<'a>(
        &self,
        params: &Self::Params<'a>,
        candidate: &'a UniverseObject,
        ctx: &ScriptingContext<'a>,
    ) -> bool;
}

pub(crate) fn node_invariance<L: SimpleMatch>(leaf: &L) -> Invariants {
    (leaf.param_invariance() & leaf.subcondition_invariance().for_node()).for_node()
}

pub(crate) fn eval_leaf<'a, L: SimpleMatch>(
    leaf: &L,
    ctx: &ScriptingContext<'a>,
    matches: &mut ObjectSet<'a>,
    non_matches: &mut ObjectSet<'a>,
    domain: SearchDomain,
) {
    let simple_eval_safe = leaf.param_invariance().local_candidate
        && (ctx.root_candidate.is_some() || leaf.is_root_invariant());

    if !simple_eval_safe {
        eval_each(leaf, ctx, matches, non_matches, domain);
        return;
    }

    let local = ctx.without_candidate();
    let params = leaf.resolve(&local);
    if params.is_none() {
        tracing::debug!(condition = L::NAME, "Parameters unresolved; no candidate matches");
    }
    transfer(matches, non_matches, domain, |candidate| {
        params
            .as_ref()
            .is_some_and(|p| leaf.test(p, candidate, &local))
    });
}

pub(crate) fn match_leaf<'a, L: SimpleMatch>(leaf: &L, local: &ScriptingContext<'a>) -> bool {
    let Some(candidate) = local.local_candidate else {
        tracing::error!(condition = L::NAME, "Match requested without a candidate object");
        return false;
    };
    leaf.resolve(local)
        .is_some_and(|p| leaf.test(&p, candidate, local))
}

/// Implement the evaluation half of `Condition` for a `SimpleMatch` leaf;
/// the remaining trait items are passed through.
macro_rules! simple_condition {
    ($ty:ty { $($rest:tt)* }) => {
        impl $crate::condition::Condition for $ty {
            fn eval<'a>(
                &self,
                ctx: &$crate::condition::ScriptingContext<'a>,
                matches: &mut $crate::condition::ObjectSet<'a>,
                non_matches: &mut $crate::condition::ObjectSet<'a>,
                domain: $crate::condition::SearchDomain,
            ) {
                $crate::condition::leaf::eval_leaf(self, ctx, matches, non_matches, domain)
            }

            fn match_local(&self, local: &$crate::condition::ScriptingContext<'_>) -> bool {
                $crate::condition::leaf::match_leaf(self, local)
            }

            fn invariance(&self) -> $crate::condition::Invariants {
                $crate::condition::leaf::node_invariance(self)
            }

            $($rest)*
        }
    };
}
