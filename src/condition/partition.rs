//! Two-set partition evaluator shared by every node

use super::context::ScriptingContext;
use super::{Condition, ObjectSet, SearchDomain};
use crate::universe::UniverseObject;

/// Move objects of the searched set whose test result says they belong in
/// the other set. The other set is never scanned.
///
/// Removal overwrites the slot with the last element, so the searched set
/// loses its order.
pub fn transfer<'a, F>(
    matches: &mut ObjectSet<'a>,
    non_matches: &mut ObjectSet<'a>,
    domain: SearchDomain,
    mut test: F,
) where
    F: FnMut(&'a UniverseObject) -> bool,
{
    let (from, to) = match domain {
        SearchDomain::Matches => (matches, non_matches),
        SearchDomain::NonMatches => (non_matches, matches),
    };
    let stays_when = domain == SearchDomain::Matches;

    let mut i = 0;
    while i < from.len() {
        let candidate = from[i];
        if test(candidate) != stays_when {
            to.push(candidate);
            from.swap_remove(i);
        } else {
            i += 1;
        }
    }
}

/// Move the whole searched set when one verdict applies to every object
pub fn transfer_all<'a>(
    matches: &mut ObjectSet<'a>,
    non_matches: &mut ObjectSet<'a>,
    domain: SearchDomain,
    matched: bool,
) {
    match (domain, matched) {
        (SearchDomain::NonMatches, true) => matches.append(non_matches),
        (SearchDomain::Matches, false) => non_matches.append(matches),
        _ => {}
    }
}

/// Test every searched object individually with the candidate in context
pub fn eval_each<'a, C: Condition + ?Sized>(
    condition: &C,
    ctx: &ScriptingContext<'a>,
    matches: &mut ObjectSet<'a>,
    non_matches: &mut ObjectSet<'a>,
    domain: SearchDomain,
) {
    transfer(matches, non_matches, domain, |candidate| {
        condition.match_local(&ctx.with_candidate(candidate))
    });
}
